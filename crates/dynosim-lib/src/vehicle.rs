//! Vehicle reference data.
//!
//! A [`Vehicle`] describes the stock baseline that every projection is anchored
//! to: rated power, curb weight, induction architecture, and the measured
//! stock performance figures. Projections never mutate the vehicle; all build
//! state accumulates in [`crate::projection::EngineState`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Engine induction architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EngineArchitecture {
    #[default]
    NaturallyAspirated,
    Turbocharged,
    Supercharged,
}

impl EngineArchitecture {
    /// Flat responsiveness multiplier applied to power-category gains by the
    /// flat-gain strategy. Forced-induction platforms extract more from the
    /// same bolt-on than a naturally aspirated engine.
    pub fn flat_multiplier(self) -> f64 {
        match self {
            EngineArchitecture::NaturallyAspirated => 1.0,
            EngineArchitecture::Supercharged => 1.2,
            EngineArchitecture::Turbocharged => 1.3,
        }
    }

    /// Efficiency factor applied to ideal pressure-ratio gains by the
    /// pressure-ratio strategy. Real intake tracts lose some of the ideal
    /// gain to heat soak and pumping losses; positive-displacement blowers
    /// keep slightly more of it than turbochargers.
    pub fn boost_efficiency(self) -> f64 {
        match self {
            EngineArchitecture::Supercharged => 0.82,
            EngineArchitecture::NaturallyAspirated | EngineArchitecture::Turbocharged => 0.78,
        }
    }

    /// Whether the architecture runs positive manifold pressure from the factory.
    pub fn is_forced_induction(self) -> bool {
        !matches!(self, EngineArchitecture::NaturallyAspirated)
    }
}

impl fmt::Display for EngineArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineArchitecture::NaturallyAspirated => "naturally aspirated",
            EngineArchitecture::Turbocharged => "turbocharged",
            EngineArchitecture::Supercharged => "supercharged",
        };
        write!(f, "{name}")
    }
}

/// Driven-wheel layout. Determines the traction factor used by the launch
/// correlations in [`crate::projection::kinematics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Drivetrain {
    Fwd,
    #[default]
    Rwd,
    Awd,
}

impl Drivetrain {
    /// Baseline traction factor on stock street tires.
    pub fn traction_base(self) -> f64 {
        match self {
            Drivetrain::Fwd => 0.042,
            Drivetrain::Rwd => 0.048,
            Drivetrain::Awd => 0.055,
        }
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Drivetrain::Fwd => "FWD",
            Drivetrain::Rwd => "RWD",
            Drivetrain::Awd => "AWD",
        };
        write!(f, "{name}")
    }
}

/// Stock vehicle definition used as the projection baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    /// Rated crank horsepower.
    pub stock_hp: f64,
    /// Rated torque in lb-ft.
    pub stock_torque: f64,
    /// Curb weight in pounds.
    pub curb_weight_lbs: f64,
    pub engine_architecture: EngineArchitecture,
    /// Factory boost pressure in PSI. `None` for naturally aspirated vehicles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_boost_psi: Option<f64>,
    /// Measured stock 0-60 mph time in seconds.
    pub stock_zero_to_sixty: f64,
    /// Measured stock quarter-mile elapsed time in seconds.
    pub stock_quarter_mile: f64,
    /// Measured stock 60-0 mph braking distance in feet.
    pub stock_braking_60_to_0_ft: f64,
    /// Measured stock lateral grip in g.
    pub stock_lateral_g: f64,
    pub drivetrain: Drivetrain,
}

impl Vehicle {
    /// Validate the stock baseline for correctness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidVehicle`] when the name is empty, any stock
    /// figure is non-positive or non-finite, or a boost pressure is reported
    /// for a naturally aspirated vehicle.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidVehicle {
                message: "vehicle name must not be empty".to_string(),
            });
        }

        let fields = [
            (self.stock_hp, "stock_hp"),
            (self.stock_torque, "stock_torque"),
            (self.curb_weight_lbs, "curb_weight_lbs"),
            (self.stock_zero_to_sixty, "stock_zero_to_sixty"),
            (self.stock_quarter_mile, "stock_quarter_mile"),
            (self.stock_braking_60_to_0_ft, "stock_braking_60_to_0_ft"),
            (self.stock_lateral_g, "stock_lateral_g"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidVehicle {
                    message: format!("{field} must be a finite positive number"),
                });
            }
        }

        if let Some(boost) = self.stock_boost_psi {
            if !boost.is_finite() || boost < 0.0 {
                return Err(Error::InvalidVehicle {
                    message: "stock_boost_psi must be finite and non-negative".to_string(),
                });
            }
            if boost > 0.0 && !self.engine_architecture.is_forced_induction() {
                return Err(Error::InvalidVehicle {
                    message: "naturally aspirated vehicles cannot report stock boost".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Boost baseline that seeds per-projection engine state. Naturally
    /// aspirated vehicles start from atmospheric (0 PSI gauge).
    pub fn stock_boost_baseline(&self) -> f64 {
        self.stock_boost_psi.unwrap_or(0.0)
    }

    /// Weight in US tons (2000 lbs), the unit used for power-to-weight.
    pub fn curb_weight_tons(&self) -> f64 {
        self.curb_weight_lbs / 2000.0
    }
}
