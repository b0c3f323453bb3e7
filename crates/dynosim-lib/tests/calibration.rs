use dynosim_lib::{
    project_build, Confidence, Drivetrain, EngineArchitecture, Error, MeasuredOverride, Metric,
    ModCatalog, ProjectedPerformance, ProjectionRequest, SourceOrigin, Vehicle,
};

fn turbo_sedan() -> Vehicle {
    Vehicle {
        name: "awd turbo sedan".to_string(),
        stock_hp: 291.0,
        stock_torque: 290.0,
        curb_weight_lbs: 3483.0,
        engine_architecture: EngineArchitecture::Turbocharged,
        stock_boost_psi: Some(21.0),
        stock_zero_to_sixty: 4.9,
        stock_quarter_mile: 13.5,
        stock_braking_60_to_0_ft: 109.0,
        stock_lateral_g: 0.96,
        drivetrain: Drivetrain::Awd,
    }
}

fn origin(perf: &ProjectedPerformance, metric: Metric) -> SourceOrigin {
    perf.source(metric).expect("metric is tagged").origin
}

#[test]
fn measured_horsepower_recalibrates_dependent_metrics() {
    let catalog = ModCatalog::builtin();
    let build = ["intake", "stage2-tune"];

    let estimated_request = ProjectionRequest::new(turbo_sedan(), build);
    let estimated = project_build(catalog, &estimated_request).expect("estimate projects");

    let measured_request = ProjectionRequest::new(turbo_sedan(), build).with_override(
        MeasuredOverride::new(Metric::Hp, 352.0)
            .with_source("dynojet")
            .with_confidence(Confidence::High),
    );
    let perf = project_build(catalog, &measured_request).expect("measured projects");

    assert_eq!(perf.final_hp, 352.0);
    let hp_source = perf.source(Metric::Hp).expect("hp is tagged");
    assert_eq!(hp_source.origin, SourceOrigin::Measured);
    assert_eq!(hp_source.label, "dynojet");
    assert_eq!(hp_source.confidence, Some(Confidence::High));

    // Torque tracks the measured figure, not the estimate.
    assert_eq!(perf.final_torque, 351.0);
    for metric in [
        Metric::Torque,
        Metric::PowerToWeight,
        Metric::ZeroToSixty,
        Metric::QuarterMileEt,
        Metric::QuarterMileTrapMph,
    ] {
        assert_eq!(origin(&perf, metric), SourceOrigin::Calibrated, "{metric}");
    }
    for metric in [
        Metric::BoostPsi,
        Metric::VolumetricEfficiency,
        Metric::WeightDelta,
        Metric::BrakingDistance,
        Metric::LateralG,
    ] {
        assert_eq!(origin(&perf, metric), SourceOrigin::Estimated, "{metric}");
    }

    // The dyno read higher than the estimate, so the car gets quicker.
    assert!(perf.final_hp > estimated.final_hp);
    assert!(perf.zero_to_sixty < estimated.zero_to_sixty);
    assert!(perf.quarter_mile_trap_mph > estimated.quarter_mile_trap_mph);
}

#[test]
fn directly_measured_dependents_are_not_recalibrated() {
    let request = ProjectionRequest::new(turbo_sedan(), ["stage3-tune"])
        .with_override(MeasuredOverride::new(Metric::Hp, 340.0).with_source("dynojet"))
        .with_override(
            MeasuredOverride::new(Metric::QuarterMileEt, 11.9).with_source("dragy"),
        );
    let perf = project_build(ModCatalog::builtin(), &request).expect("projects");

    // The elapsed time came off a timing box; the hp override must not
    // clobber it.
    assert_eq!(perf.quarter_mile_et, 11.9);
    assert_eq!(origin(&perf, Metric::QuarterMileEt), SourceOrigin::Measured);
    assert_eq!(origin(&perf, Metric::QuarterMileTrapMph), SourceOrigin::Calibrated);
}

#[test]
fn later_overrides_of_the_same_metric_win() {
    let request = ProjectionRequest::new(turbo_sedan(), ["stage2-tune"])
        .with_override(MeasuredOverride::new(Metric::Hp, 340.0).with_source("mainline"))
        .with_override(MeasuredOverride::new(Metric::Hp, 352.0).with_source("dynojet"));
    let perf = project_build(ModCatalog::builtin(), &request).expect("projects");

    assert_eq!(perf.final_hp, 352.0);
    assert_eq!(perf.source(Metric::Hp).expect("tagged").label, "dynojet");
}

#[test]
fn measured_weight_delta_recalibrates_braking() {
    let request = ProjectionRequest::new(turbo_sedan(), Vec::<String>::new())
        .with_override(MeasuredOverride::new(Metric::WeightDelta, -120.0).with_source("scales"));
    let perf = project_build(ModCatalog::builtin(), &request).expect("projects");

    assert_eq!(perf.weight_delta_lbs, -120.0);
    assert_eq!(origin(&perf, Metric::WeightDelta), SourceOrigin::Measured);

    // 120 lb off the car shortens the stop and the launch.
    assert!(perf.braking_60_to_0_ft < 109.0);
    assert_eq!(origin(&perf, Metric::BrakingDistance), SourceOrigin::Calibrated);
    assert!(perf.zero_to_sixty < 4.9);
    assert_eq!(origin(&perf, Metric::BoostPsi), SourceOrigin::Estimated);
}

#[test]
fn invalid_override_fails_the_whole_projection() {
    let request = ProjectionRequest::new(turbo_sedan(), ["intake"])
        .with_override(MeasuredOverride::new(Metric::Hp, -10.0));
    let err = project_build(ModCatalog::builtin(), &request).expect_err("override is invalid");

    match err {
        Error::InvalidProjection { message } => assert!(message.contains("must be positive")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn projections_round_trip_through_json() {
    let request = ProjectionRequest::new(
        turbo_sedan(),
        ["intake", "stage3-tune", "coilovers", "tires-200tw"],
    )
    .with_override(
        MeasuredOverride::new(Metric::Hp, 362.0)
            .with_source("dynojet")
            .with_confidence(Confidence::High),
    );
    let perf = project_build(ModCatalog::builtin(), &request).expect("projects");

    let json = serde_json::to_string(&perf).expect("serializes");
    let back: ProjectedPerformance = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(perf, back);

    // Wire names follow the snake_case metric spellings.
    let value: serde_json::Value = serde_json::from_str(&json).expect("parses");
    assert_eq!(value["strategy"], "pressure-ratio");
    assert_eq!(value["data_sources"]["hp"]["origin"], "measured");
    assert_eq!(value["data_sources"]["hp"]["confidence"], "high");
    assert_eq!(value["data_sources"]["lateral_g"]["origin"], "estimated");
    assert!(value["hp_gain_by_category"]["tune"].is_number());
}
