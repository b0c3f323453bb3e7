//! Per-projection engine state accumulation.

use crate::catalog::Modification;
use crate::error::{Error, Result};
use crate::vehicle::Vehicle;

/// Volumetric efficiency assumed for an unmodified engine, in percent.
pub const STOCK_VE_PERCENT: f64 = 85.0;

/// Mutable accumulator for a single projection pass.
///
/// Seeded from the vehicle's stock baseline and owned by one projection call;
/// it is never shared across calls, so concurrent projections against the same
/// catalog cannot observe each other's deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    stock_boost_psi: f64,
    boost_psi: f64,
    volumetric_efficiency: f64,
    weight_delta_lbs: f64,
}

impl EngineState {
    /// Seed state from a vehicle's stock baseline.
    pub fn for_vehicle(vehicle: &Vehicle) -> Self {
        let boost = vehicle.stock_boost_baseline();
        Self {
            stock_boost_psi: boost,
            boost_psi: boost,
            volumetric_efficiency: STOCK_VE_PERCENT,
            weight_delta_lbs: 0.0,
        }
    }

    /// Apply one modification's deltas to the accumulator.
    ///
    /// Boost and VE only ever increase; weight deltas are signed. Catalog
    /// validation already rejects negative boost/VE deltas, so hitting that
    /// case here means the entry bypassed load-time checks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalogEntry`] for a negative or non-finite
    /// boost/VE delta.
    pub fn apply_delta(
        &mut self,
        boost_delta_psi: f64,
        ve_delta: f64,
        weight_delta_lbs: f64,
    ) -> Result<()> {
        if !boost_delta_psi.is_finite() || boost_delta_psi < 0.0 {
            return Err(Error::InvalidCatalogEntry {
                message: format!("boost delta must be finite and non-negative, got {boost_delta_psi}"),
            });
        }
        if !ve_delta.is_finite() || ve_delta < 0.0 {
            return Err(Error::InvalidCatalogEntry {
                message: format!("VE delta must be finite and non-negative, got {ve_delta}"),
            });
        }
        if !weight_delta_lbs.is_finite() {
            return Err(Error::InvalidCatalogEntry {
                message: "weight delta must be finite".to_string(),
            });
        }

        self.boost_psi += boost_delta_psi;
        self.volumetric_efficiency += ve_delta;
        self.weight_delta_lbs += weight_delta_lbs;
        Ok(())
    }

    /// Apply a catalog entry's deltas.
    pub fn apply_modification(&mut self, entry: &Modification) -> Result<()> {
        self.apply_delta(entry.boost_delta_psi, entry.ve_delta, entry.weight_delta_lbs)
    }

    /// Stock boost pressure this state was seeded with, in PSI.
    pub fn stock_boost_psi(&self) -> f64 {
        self.stock_boost_psi
    }

    /// Accumulated boost pressure, in PSI.
    pub fn boost_psi(&self) -> f64 {
        self.boost_psi
    }

    /// Boost gained over stock, in PSI.
    pub fn boost_delta_psi(&self) -> f64 {
        self.boost_psi - self.stock_boost_psi
    }

    /// Accumulated volumetric efficiency, in percent.
    pub fn volumetric_efficiency(&self) -> f64 {
        self.volumetric_efficiency
    }

    /// Accumulated weight change over stock, in pounds (negative = lighter).
    pub fn weight_delta_lbs(&self) -> f64 {
        self.weight_delta_lbs
    }
}
