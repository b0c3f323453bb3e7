//! Measured-data calibration and per-metric source tagging.
//!
//! Every metric in a projection carries a [`MetricSource`] tag. Purely
//! computed metrics are `estimated`; a user-supplied [`MeasuredOverride`]
//! marks its metric `measured` and triggers recomputation of the metrics
//! derived from it, which are then tagged `calibrated`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vehicle::Vehicle;

use super::aggregate::ChassisPercents;
use super::kinematics::{derive_kinematics, KinematicParams};
use super::ProjectedPerformance;

/// A projected metric. Keys the per-metric source tags and addresses
/// overrides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Hp,
    Torque,
    BoostPsi,
    VolumetricEfficiency,
    WeightDelta,
    ZeroToSixty,
    QuarterMileEt,
    QuarterMileTrapMph,
    BrakingDistance,
    LateralG,
    PowerToWeight,
}

impl Metric {
    /// All metrics a projection reports, in display order.
    pub const ALL: [Metric; 11] = [
        Metric::Hp,
        Metric::Torque,
        Metric::BoostPsi,
        Metric::VolumetricEfficiency,
        Metric::WeightDelta,
        Metric::ZeroToSixty,
        Metric::QuarterMileEt,
        Metric::QuarterMileTrapMph,
        Metric::BrakingDistance,
        Metric::LateralG,
        Metric::PowerToWeight,
    ];

    /// Metrics recomputed when this metric is overridden with a measurement.
    ///
    /// Only horsepower and weight feed other figures; everything else is a
    /// leaf of the derivation graph.
    pub fn dependents(self) -> &'static [Metric] {
        match self {
            Metric::Hp => &[
                Metric::Torque,
                Metric::PowerToWeight,
                Metric::ZeroToSixty,
                Metric::QuarterMileEt,
                Metric::QuarterMileTrapMph,
            ],
            Metric::WeightDelta => &[
                Metric::PowerToWeight,
                Metric::ZeroToSixty,
                Metric::QuarterMileEt,
                Metric::QuarterMileTrapMph,
                Metric::BrakingDistance,
            ],
            _ => &[],
        }
    }

    /// Parse a metric name as written on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hp" | "horsepower" => Some(Metric::Hp),
            "torque" | "tq" => Some(Metric::Torque),
            "boost" | "boost_psi" => Some(Metric::BoostPsi),
            "ve" | "volumetric_efficiency" => Some(Metric::VolumetricEfficiency),
            "weight" | "weight_delta" => Some(Metric::WeightDelta),
            "zero_to_sixty" | "0-60" | "0_60" => Some(Metric::ZeroToSixty),
            "quarter_mile_et" | "et" => Some(Metric::QuarterMileEt),
            "quarter_mile_trap_mph" | "trap" => Some(Metric::QuarterMileTrapMph),
            "braking_distance" | "braking" | "60-0" => Some(Metric::BrakingDistance),
            "lateral_g" | "grip" => Some(Metric::LateralG),
            "power_to_weight" | "pwr" => Some(Metric::PowerToWeight),
            _ => None,
        }
    }

    /// Short label used in renderings.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Hp => "horsepower",
            Metric::Torque => "torque",
            Metric::BoostPsi => "boost",
            Metric::VolumetricEfficiency => "volumetric efficiency",
            Metric::WeightDelta => "weight delta",
            Metric::ZeroToSixty => "0-60 mph",
            Metric::QuarterMileEt => "1/4 mile ET",
            Metric::QuarterMileTrapMph => "1/4 mile trap",
            Metric::BrakingDistance => "60-0 braking",
            Metric::LateralG => "lateral grip",
            Metric::PowerToWeight => "power-to-weight",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a metric's value was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOrigin {
    /// Purely computed from catalog data.
    Estimated,
    /// Recomputed from at least one measured figure.
    Calibrated,
    /// Directly measured.
    Measured,
}

/// Reported trust in a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Parse a confidence level as written on the command line.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Confidence::Low),
            "medium" | "med" => Some(Confidence::Medium),
            "high" => Some(Confidence::High),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        write!(f, "{name}")
    }
}

/// Provenance tag attached to every projected metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSource {
    pub origin: SourceOrigin,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
}

impl MetricSource {
    /// Tag for a purely computed metric.
    pub fn estimated() -> Self {
        Self {
            origin: SourceOrigin::Estimated,
            label: "estimated".to_string(),
            confidence: None,
        }
    }

    /// Tag for a metric recomputed from measured data.
    pub fn calibrated() -> Self {
        Self {
            origin: SourceOrigin::Calibrated,
            label: "calibrated".to_string(),
            confidence: None,
        }
    }

    /// Tag for a directly measured metric.
    pub fn measured(label: impl Into<String>, confidence: Confidence) -> Self {
        Self {
            origin: SourceOrigin::Measured,
            label: label.into(),
            confidence: Some(confidence),
        }
    }
}

/// A real-world measurement that supersedes the computed value of one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredOverride {
    pub metric: Metric,
    pub value: f64,
    /// Where the measurement came from ("dynojet", "vbox", ...).
    pub source_label: String,
    pub confidence: Confidence,
}

impl MeasuredOverride {
    /// Create an override with the default source label and confidence.
    pub fn new(metric: Metric, value: f64) -> Self {
        Self {
            metric,
            value,
            source_label: "measured".to_string(),
            confidence: Confidence::Medium,
        }
    }

    /// Set the source label.
    pub fn with_source(mut self, label: impl Into<String>) -> Self {
        self.source_label = label.into();
        self
    }

    /// Set the confidence level.
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Validate the measurement for correctness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProjection`] when the value is non-finite, or
    /// non-positive for any metric other than the signed weight delta.
    pub fn validate(&self) -> Result<()> {
        if !self.value.is_finite() {
            return Err(Error::InvalidProjection {
                message: format!("measured {} must be finite", self.metric),
            });
        }
        if self.metric != Metric::WeightDelta && self.value <= 0.0 {
            return Err(Error::InvalidProjection {
                message: format!(
                    "measured {} must be positive, got {}",
                    self.metric, self.value
                ),
            });
        }
        if self.source_label.trim().is_empty() {
            return Err(Error::InvalidProjection {
                message: "override source label must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Apply measured overrides to a computed projection, recomputing dependents.
///
/// Overridden metrics take the measured value and a `measured` tag.
/// Dependents of horsepower and weight are re-derived from the effective
/// figures and tagged `calibrated`, unless they are themselves directly
/// measured. Later overrides of the same metric win.
pub(crate) fn apply_overrides(
    perf: &mut ProjectedPerformance,
    vehicle: &Vehicle,
    overrides: &[MeasuredOverride],
    chassis: ChassisPercents,
) -> Result<()> {
    if overrides.is_empty() {
        return Ok(());
    }

    for o in overrides {
        o.validate()?;
    }

    let mut measured: Vec<Metric> = Vec::new();
    for o in overrides {
        if measured.contains(&o.metric) {
            tracing::debug!("override for {} replaces an earlier one", o.metric);
        } else {
            measured.push(o.metric);
        }
        perf.set_metric(o.metric, o.value);
        perf.data_sources.insert(
            o.metric,
            MetricSource::measured(o.source_label.clone(), o.confidence),
        );
    }

    let recompute: BTreeSet<Metric> = measured
        .iter()
        .flat_map(|m| m.dependents().iter().copied())
        .filter(|m| !measured.contains(m))
        .collect();

    if recompute.is_empty() {
        return Ok(());
    }

    let block = derive_kinematics(KinematicParams {
        vehicle,
        final_hp: perf.final_hp,
        weight_delta_lbs: perf.weight_delta_lbs,
        tire_grip_pct: chassis.tire_grip_pct,
        total_grip_pct: chassis.total_grip_pct,
        braking_pct: chassis.braking_pct,
    })?;

    for metric in recompute {
        let value = match metric {
            // Torque tracks the horsepower ratio against stock.
            Metric::Torque => {
                (vehicle.stock_torque * (perf.final_hp / vehicle.stock_hp)).round()
            }
            Metric::PowerToWeight => block.power_to_weight,
            Metric::ZeroToSixty => block.zero_to_sixty,
            Metric::QuarterMileEt => block.quarter_mile_et,
            Metric::QuarterMileTrapMph => block.quarter_mile_trap_mph,
            Metric::BrakingDistance => block.braking_60_to_0_ft,
            other => {
                return Err(Error::InvalidProjection {
                    message: format!("metric {other} is not recomputable"),
                })
            }
        };
        perf.set_metric(metric, value);
        perf.data_sources.insert(metric, MetricSource::calibrated());
        tracing::debug!("recalibrated {metric} from measured data");
    }

    Ok(())
}

/// Check the hard output invariant: every metric carries a source tag.
pub(crate) fn verify_source_coverage(perf: &ProjectedPerformance) -> Result<()> {
    for metric in Metric::ALL {
        if !perf.data_sources.contains_key(&metric) {
            tracing::error!("projection finished without a source tag for {metric}");
            return Err(Error::InvalidProjection {
                message: format!("metric {metric} is missing a data source tag"),
            });
        }
    }
    Ok(())
}
