//! Build projection for modified vehicles.
//!
//! This module provides:
//! - [`StrategyKind`] - Supported power projection strategies
//! - [`ProjectionConfig`] - Strategy selection and per-category gain caps
//! - [`ProjectionRequest`] - High-level projection request
//! - [`ProjectedPerformance`] - Projected build result with per-metric source tags
//! - [`project_build`] - Main entry point for computing projections
//! - [`compare_strategies`] - Side-by-side run of both strategies
//!
//! # Strategy Pattern
//!
//! Power projection uses the Strategy pattern via the [`PowerStrategy`] trait.
//! Each model (flat-gain, pressure-ratio) is encapsulated in its own struct,
//! allowing new models to be added without modifying the core orchestration
//! logic.
//!
//! # Example
//!
//! ```
//! use dynosim_lib::catalog::ModCatalog;
//! use dynosim_lib::projection::{project_build, ProjectionRequest};
//! use dynosim_lib::vehicle::{Drivetrain, EngineArchitecture, Vehicle};
//!
//! let vehicle = Vehicle {
//!     name: "project car".to_string(),
//!     stock_hp: 291.0,
//!     stock_torque: 290.0,
//!     curb_weight_lbs: 3483.0,
//!     engine_architecture: EngineArchitecture::Turbocharged,
//!     stock_boost_psi: Some(21.0),
//!     stock_zero_to_sixty: 4.9,
//!     stock_quarter_mile: 13.5,
//!     stock_braking_60_to_0_ft: 109.0,
//!     stock_lateral_g: 0.96,
//!     drivetrain: Drivetrain::Awd,
//! };
//!
//! let request = ProjectionRequest::new(vehicle, ["intake", "stage2-tune"]);
//! let perf = project_build(ModCatalog::builtin(), &request).unwrap();
//! assert!(perf.final_hp > 291.0);
//! ```

pub mod aggregate;
pub mod calibration;
pub mod kinematics;
mod state;
mod strategy;

pub use aggregate::{
    architecture_scaled, reject_duplicates, resolve_tune_hierarchy, CategoryCaps, CategoryTotals,
    ChassisPercents,
};
pub use calibration::{Confidence, MeasuredOverride, Metric, MetricSource, SourceOrigin};
pub use state::{EngineState, STOCK_VE_PERCENT};
pub use strategy::{
    select_strategy, FlatGainStrategy, PowerFigures, PowerStrategy, PressureRatioStrategy,
    ATMOSPHERIC_PSI,
};

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{ModCatalog, ModCategory, Modification};
use crate::error::Result;
use crate::vehicle::Vehicle;

/// Supported power projection strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StrategyKind {
    /// Legacy additive model (catalog gains, architecture multiplier).
    #[serde(rename = "flat-gain")]
    FlatGain,
    /// Pressure-ratio physics model (authoritative).
    #[default]
    #[serde(rename = "pressure-ratio")]
    PressureRatio,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            StrategyKind::FlatGain => "flat-gain",
            StrategyKind::PressureRatio => "pressure-ratio",
        };
        f.write_str(value)
    }
}

/// Configuration applied during projection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectionConfig {
    pub strategy: StrategyKind,
    pub caps: CategoryCaps,
}

impl ProjectionConfig {
    /// Validate the configuration for correctness.
    pub fn validate(&self) -> Result<()> {
        self.caps.validate()
    }
}

/// High-level projection request.
#[derive(Debug, Clone)]
pub struct ProjectionRequest {
    pub vehicle: Vehicle,
    /// Catalog keys for the build, in install order. Order never affects the
    /// result.
    pub modifications: Vec<String>,
    /// Measured figures that supersede computed metrics.
    pub overrides: Vec<MeasuredOverride>,
    pub config: ProjectionConfig,
}

impl ProjectionRequest {
    /// Convenience constructor using the default strategy and caps.
    pub fn new(
        vehicle: Vehicle,
        modifications: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            vehicle,
            modifications: modifications.into_iter().map(Into::into).collect(),
            overrides: Vec::new(),
            config: ProjectionConfig::default(),
        }
    }

    /// Select the projection strategy.
    pub fn with_strategy(mut self, strategy: StrategyKind) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Replace the per-category gain caps.
    pub fn with_caps(mut self, caps: CategoryCaps) -> Self {
        self.config.caps = caps;
        self
    }

    /// Attach a measured override.
    pub fn with_override(mut self, measured: MeasuredOverride) -> Self {
        self.overrides.push(measured);
        self
    }
}

/// Projected performance for one build.
///
/// Power figures are whole horsepower; kinematic figures keep full precision
/// and are rounded by renderers. Every metric has an entry in
/// `data_sources`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPerformance {
    pub vehicle_name: String,
    pub strategy: StrategyKind,
    /// Final crank horsepower, whole.
    pub final_hp: f64,
    /// Final torque in lb-ft, whole.
    pub final_torque: f64,
    /// Final boost pressure in PSI.
    pub final_boost_psi: f64,
    /// Final volumetric efficiency in percent.
    pub final_ve: f64,
    /// Weight change over stock in pounds (negative = lighter).
    pub weight_delta_lbs: f64,
    /// Capped horsepower gain per power category, whole.
    pub hp_gain_by_category: BTreeMap<ModCategory, f64>,
    pub zero_to_sixty: f64,
    pub quarter_mile_et: f64,
    pub quarter_mile_trap_mph: f64,
    pub braking_60_to_0_ft: f64,
    pub lateral_g: f64,
    pub power_to_weight: f64,
    /// Provenance tag for every projected metric.
    pub data_sources: BTreeMap<Metric, MetricSource>,
}

impl ProjectedPerformance {
    /// Total horsepower gained over stock.
    pub fn total_gain_hp(&self) -> f64 {
        self.hp_gain_by_category.values().sum()
    }

    /// Read a metric by name.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Hp => self.final_hp,
            Metric::Torque => self.final_torque,
            Metric::BoostPsi => self.final_boost_psi,
            Metric::VolumetricEfficiency => self.final_ve,
            Metric::WeightDelta => self.weight_delta_lbs,
            Metric::ZeroToSixty => self.zero_to_sixty,
            Metric::QuarterMileEt => self.quarter_mile_et,
            Metric::QuarterMileTrapMph => self.quarter_mile_trap_mph,
            Metric::BrakingDistance => self.braking_60_to_0_ft,
            Metric::LateralG => self.lateral_g,
            Metric::PowerToWeight => self.power_to_weight,
        }
    }

    /// The provenance tag for a metric.
    pub fn source(&self, metric: Metric) -> Option<&MetricSource> {
        self.data_sources.get(&metric)
    }

    pub(crate) fn set_metric(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Hp => self.final_hp = value,
            Metric::Torque => self.final_torque = value,
            Metric::BoostPsi => self.final_boost_psi = value,
            Metric::VolumetricEfficiency => self.final_ve = value,
            Metric::WeightDelta => self.weight_delta_lbs = value,
            Metric::ZeroToSixty => self.zero_to_sixty = value,
            Metric::QuarterMileEt => self.quarter_mile_et = value,
            Metric::QuarterMileTrapMph => self.quarter_mile_trap_mph = value,
            Metric::BrakingDistance => self.braking_60_to_0_ft = value,
            Metric::LateralG => self.lateral_g = value,
            Metric::PowerToWeight => self.power_to_weight = value,
        }
    }
}

/// Both strategies run over the same request, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub flat_gain: ProjectedPerformance,
    pub pressure_ratio: ProjectedPerformance,
}

impl StrategyComparison {
    /// Horsepower difference between the legacy and physics models.
    pub fn hp_spread(&self) -> f64 {
        self.flat_gain.final_hp - self.pressure_ratio.final_hp
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Resolve build keys against the catalog, failing fast on the first unknown.
fn resolve_modifications<'a>(
    catalog: &'a ModCatalog,
    keys: &[String],
) -> Result<Vec<&'a Modification>> {
    keys.iter().map(|key| catalog.lookup(key)).collect()
}

// =============================================================================
// Main Entry Point
// =============================================================================

/// Project performance for a vehicle with a set of modifications.
///
/// This is the main entry point for projection. It:
/// 1. Validates the vehicle and configuration
/// 2. Resolves modification keys against the catalog
/// 3. Rejects duplicates and resolves the tune hierarchy
/// 4. Accumulates engine state and aggregates category totals
/// 5. Runs the selected power strategy
/// 6. Rounds power figures and derives kinematics
/// 7. Applies measured overrides and tags every metric's source
///
/// The request is either fully projected or fails with the first error; no
/// partial result is ever returned.
pub fn project_build(
    catalog: &ModCatalog,
    request: &ProjectionRequest,
) -> Result<ProjectedPerformance> {
    let vehicle = &request.vehicle;

    // Step 1: Validate inputs
    vehicle.validate()?;
    request.config.validate()?;

    // Step 2: Resolve modification keys
    let mods = resolve_modifications(catalog, &request.modifications)?;

    // Step 3: Reject duplicates, then resolve the tune hierarchy
    reject_duplicates(&mods)?;
    let mut accepted = resolve_tune_hierarchy(&mods);
    // Accumulate in key order, not install order, so floating-point sums are
    // bit-identical across permutations of the same build.
    accepted.sort_by(|a, b| a.key.cmp(&b.key));

    tracing::debug!(
        "projecting '{}' with {} accepted modifications ({} strategy)",
        vehicle.name,
        accepted.len(),
        request.config.strategy
    );

    // Step 4: Accumulate engine state and category totals
    let mut state = EngineState::for_vehicle(vehicle);
    for entry in &accepted {
        state.apply_modification(entry)?;
    }
    let totals = CategoryTotals::from_mods(&accepted);
    let chassis = ChassisPercents::from_totals(&totals, &request.config.caps);

    // Step 5: Run the power strategy
    let strategy = select_strategy(request.config.strategy);
    let figures = strategy.project_power(vehicle, &totals, &state, &request.config.caps)?;

    // Step 6: Round power at final aggregation. The final figure is the sum
    // of the rounded category gains so the reported breakdown always adds up.
    let hp_gain_by_category: BTreeMap<ModCategory, f64> = figures
        .hp_gain_by_category
        .iter()
        .map(|(category, gain)| (*category, gain.round()))
        .collect();
    let final_hp = vehicle.stock_hp + hp_gain_by_category.values().sum::<f64>();
    let final_torque = (vehicle.stock_torque * (final_hp / vehicle.stock_hp)).round();

    // Step 7: Derive kinematics from the projected figures
    let block = kinematics::derive_kinematics(kinematics::KinematicParams {
        vehicle,
        final_hp,
        weight_delta_lbs: state.weight_delta_lbs(),
        tire_grip_pct: chassis.tire_grip_pct,
        total_grip_pct: chassis.total_grip_pct,
        braking_pct: chassis.braking_pct,
    })?;

    // Step 8: Assemble the record with every metric tagged as estimated
    let data_sources: BTreeMap<Metric, MetricSource> = Metric::ALL
        .into_iter()
        .map(|metric| (metric, MetricSource::estimated()))
        .collect();

    let mut perf = ProjectedPerformance {
        vehicle_name: vehicle.name.clone(),
        strategy: request.config.strategy,
        final_hp,
        final_torque,
        final_boost_psi: state.boost_psi(),
        final_ve: state.volumetric_efficiency(),
        weight_delta_lbs: state.weight_delta_lbs(),
        hp_gain_by_category,
        zero_to_sixty: block.zero_to_sixty,
        quarter_mile_et: block.quarter_mile_et,
        quarter_mile_trap_mph: block.quarter_mile_trap_mph,
        braking_60_to_0_ft: block.braking_60_to_0_ft,
        lateral_g: block.lateral_g,
        power_to_weight: block.power_to_weight,
        data_sources,
    };

    // Step 9: Apply measured overrides and recompute dependents
    calibration::apply_overrides(&mut perf, vehicle, &request.overrides, chassis)?;

    // Step 10: Every metric must carry a source tag
    calibration::verify_source_coverage(&perf)?;

    Ok(perf)
}

/// Run both strategies over the same request for side-by-side comparison.
pub fn compare_strategies(
    catalog: &ModCatalog,
    request: &ProjectionRequest,
) -> Result<StrategyComparison> {
    let mut flat_request = request.clone();
    flat_request.config.strategy = StrategyKind::FlatGain;
    let mut physics_request = request.clone();
    physics_request.config.strategy = StrategyKind::PressureRatio;

    Ok(StrategyComparison {
        flat_gain: project_build(catalog, &flat_request)?,
        pressure_ratio: project_build(catalog, &physics_request)?,
    })
}
