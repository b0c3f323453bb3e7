//! Integration tests for the dynosim CLI.
//!
//! These tests use `assert_cmd` to drive the compiled binary end to end:
//! catalog listing, projections in text and JSON form, strategy comparison,
//! measured overrides, and error reporting for bad builds.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use tempfile::tempdir;

fn fixture_catalog() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures/mod_catalog.csv")
        .canonicalize()
        .expect("catalog fixture present")
}

fn cli() -> Command {
    let mut cmd = cargo_bin_cmd!("dynosim-cli");
    cmd.env("RUST_LOG", "error");
    cmd
}

/// Flag set describing a 291 hp AWD turbo sedan.
fn turbo_sedan_flags() -> [&'static str; 10] {
    [
        "--hp",
        "291",
        "--torque",
        "290",
        "--weight",
        "3483",
        "--architecture",
        "turbo",
        "--boost",
        "21",
    ]
}

#[test]
fn help_lists_subcommands() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("project"))
        .stdout(contains("compare"))
        .stdout(contains("mods"));
}

#[test]
fn mods_lists_the_builtin_catalog() {
    cli()
        .arg("mods")
        .assert()
        .success()
        .stdout(contains("Available modifications (27):"))
        .stdout(contains("Key"))
        .stdout(contains("Category"))
        .stdout(contains("stage3-tune"))
        .stdout(contains("turbo-upgrade-existing"))
        .stdout(contains("rear-seat-delete"));
}

#[test]
fn mods_lists_a_catalog_loaded_from_csv() {
    cli()
        .arg("--catalog")
        .arg(fixture_catalog())
        .arg("mods")
        .assert()
        .success()
        .stdout(contains("Available modifications (7):"))
        .stdout(contains("cold-air-intake"))
        .stdout(contains("shop-tune-e85"));
}

#[test]
fn project_renders_a_text_summary() {
    let mut cmd = cli();
    cmd.arg("project")
        .args(turbo_sedan_flags())
        .args(["intake", "stage3-tune"]);
    cmd.assert()
        .success()
        .stdout(contains("Projection: project car (pressure-ratio strategy)"))
        .stdout(contains("Power: 291 hp -> 343 hp (+52 hp)"))
        .stdout(contains("Gains by category:"))
        .stdout(contains("[estimated]"));
}

#[test]
fn project_emits_machine_readable_json() {
    let mut cmd = cli();
    cmd.args(["--format", "json", "project"])
        .args(turbo_sedan_flags())
        .args(["intake", "stage3-tune"]);
    let assert = cmd.assert().success();

    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON output");
    assert_eq!(value["vehicle"], "project car");
    assert_eq!(value["strategy"], "pressure-ratio");
    assert_eq!(value["stock_hp"], 291.0);
    assert_eq!(value["final_hp"], 343.0);
    assert_eq!(value["gains"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["metrics"].as_array().map(Vec::len), Some(11));
}

#[test]
fn rich_format_uses_markdown_emphasis() {
    let mut cmd = cli();
    cmd.args(["--format", "rich", "project"])
        .args(turbo_sedan_flags())
        .arg("intake");
    cmd.assert()
        .success()
        .stdout(contains("**Projection**"))
        .stdout(contains("**Power**"));
}

#[test]
fn compare_shows_both_strategies_side_by_side() {
    let mut cmd = cli();
    cmd.arg("compare")
        .args(turbo_sedan_flags())
        .args(["intake", "stage3-tune"]);
    cmd.assert()
        .success()
        .stdout(contains("Strategy comparison: project car (291 hp stock)"))
        .stdout(contains("flat-gain"))
        .stdout(contains("pressure-ratio"))
        .stdout(contains("397 hp"))
        .stdout(contains("343 hp"))
        .stdout(contains("Strategy spread:"));
}

#[test]
fn overrides_tag_metrics_as_measured() {
    let mut cmd = cli();
    cmd.arg("project")
        .args(turbo_sedan_flags())
        .args(["intake", "--override", "hp=352:dynojet:high"]);
    cmd.assert()
        .success()
        .stdout(contains("352 hp"))
        .stdout(contains("[measured: dynojet, high]"))
        .stdout(contains("[calibrated]"));
}

#[test]
fn malformed_overrides_are_rejected() {
    let mut cmd = cli();
    cmd.arg("project")
        .args(turbo_sedan_flags())
        .args(["intake", "--override", "hp-352"]);
    cmd.assert()
        .failure()
        .stderr(contains("metric=value"));
}

#[test]
fn vehicle_json_file_supplies_the_baseline() {
    let temp_dir = tempdir().expect("create temp dir");
    let vehicle_path = temp_dir.path().join("sedan.json");
    fs::write(
        &vehicle_path,
        r#"{
            "name": "awd turbo sedan",
            "stock_hp": 291.0,
            "stock_torque": 290.0,
            "curb_weight_lbs": 3483.0,
            "engine_architecture": "turbocharged",
            "stock_boost_psi": 21.0,
            "stock_zero_to_sixty": 4.9,
            "stock_quarter_mile": 13.5,
            "stock_braking_60_to_0_ft": 109.0,
            "stock_lateral_g": 0.96,
            "drivetrain": "awd"
        }"#,
    )
    .expect("write vehicle file");

    let mut cmd = cli();
    cmd.args(["project", "--vehicle"])
        .arg(&vehicle_path)
        .args(["intake", "stage3-tune"]);
    cmd.assert()
        .success()
        .stdout(contains("Projection: awd turbo sedan"))
        .stdout(contains("Power: 291 hp -> 343 hp (+52 hp)"));
}

#[test]
fn custom_catalog_replaces_the_builtin() {
    let temp_dir = tempdir().expect("create temp dir");
    let catalog_path = temp_dir.path().join("catalog.csv");
    let mut file = fs::File::create(&catalog_path).expect("create catalog");
    writeln!(file, "key,category,base_gain,boost_delta_psi").expect("write header");
    writeln!(file, "big-turbo,turbo,95,12").expect("write row");
    drop(file);

    let mut cmd = cli();
    cmd.arg("--catalog").arg(&catalog_path).args([
        "--format",
        "json",
        "project",
        "--hp",
        "300",
        "--torque",
        "280",
        "--weight",
        "3100",
        "big-turbo",
    ]);
    let assert = cmd.assert().success();
    let value: serde_json::Value =
        serde_json::from_slice(&assert.get_output().stdout).expect("valid JSON output");
    // 12 psi over atmospheric projects past the turbo cap, so the gain clamps.
    assert_eq!(value["final_hp"], 460.0);

    // Built-in keys are gone once a file catalog is active.
    let mut cmd = cli();
    cmd.arg("--catalog").arg(&catalog_path).args([
        "project", "--hp", "300", "--torque", "280", "--weight", "3100", "intake",
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("unknown modification: intake"));
}

#[test]
fn unknown_modifications_fail_with_suggestions() {
    let mut cmd = cli();
    cmd.args([
        "project",
        "--hp",
        "182",
        "--torque",
        "176",
        "--weight",
        "2800",
        "trubo-upgrade-existing",
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("unknown modification: trubo-upgrade-existing"))
        .stderr(contains("turbo-upgrade-existing"));
}

#[test]
fn project_requires_a_vehicle_definition() {
    cli()
        .args(["project", "intake"])
        .assert()
        .failure()
        .stderr(contains("required"));
}

#[test]
fn boost_on_a_naturally_aspirated_vehicle_is_rejected() {
    let mut cmd = cli();
    cmd.args([
        "project", "--hp", "182", "--torque", "176", "--weight", "2800", "--boost", "8", "intake",
    ]);
    cmd.assert()
        .failure()
        .stderr(contains("naturally aspirated"));
}
