//! Power projection strategies implementing the Strategy pattern.
//!
//! This module provides the `PowerStrategy` trait and implementations for the
//! two projection models: the legacy flat-gain baseline and the
//! pressure-ratio physics model. The strategy pattern allows adding new
//! models without modifying the `project_build` orchestrator.

use std::collections::BTreeMap;

use crate::catalog::ModCategory;
use crate::error::Result;
use crate::vehicle::Vehicle;

use super::aggregate::{architecture_scaled, CategoryCaps, CategoryTotals};
use super::state::EngineState;
use super::StrategyKind;

/// Atmospheric pressure at sea level, in PSI. Base of the pressure ratio.
pub const ATMOSPHERIC_PSI: f64 = 14.7;

/// Unrounded power figures produced by a strategy.
///
/// Rounding to whole horsepower happens once, at final aggregation, so
/// intermediate math never accumulates rounding error.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerFigures {
    /// Final crank horsepower, unrounded.
    pub final_hp: f64,
    /// Capped horsepower gain per power category, unrounded.
    pub hp_gain_by_category: BTreeMap<ModCategory, f64>,
}

impl PowerFigures {
    /// Total horsepower gained over stock.
    pub fn total_gain(&self) -> f64 {
        self.hp_gain_by_category.values().sum()
    }
}

/// Trait for power projection strategies.
///
/// Each implementation encapsulates one model of how modifications turn into
/// horsepower. Strategies receive pre-aggregated category totals and the
/// accumulated engine state; they never see raw build order.
pub trait PowerStrategy: Send + Sync {
    /// The strategy identifier.
    fn kind(&self) -> StrategyKind;

    /// Project final horsepower and per-category gains for one build.
    fn project_power(
        &self,
        vehicle: &Vehicle,
        totals: &CategoryTotals,
        state: &EngineState,
        caps: &CategoryCaps,
    ) -> Result<PowerFigures>;
}

/// Legacy flat-gain model.
///
/// Every entry contributes its catalog `base_gain` directly. Power categories
/// are scaled by the engine architecture multiplier, then clamped to the
/// category cap. Known to run optimistic on heavily boosted builds; kept as
/// the comparison baseline.
#[derive(Debug, Clone, Default)]
pub struct FlatGainStrategy;

impl PowerStrategy for FlatGainStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::FlatGain
    }

    fn project_power(
        &self,
        vehicle: &Vehicle,
        totals: &CategoryTotals,
        _state: &EngineState,
        caps: &CategoryCaps,
    ) -> Result<PowerFigures> {
        let mut gains = BTreeMap::new();
        for category in totals.categories() {
            if !category.is_power() {
                continue;
            }
            let raw = totals.gain_sum(category);
            let scaled = architecture_scaled(category, raw, vehicle.engine_architecture);
            gains.insert(category, caps.clamp(category, scaled));
        }

        let final_hp = vehicle.stock_hp + gains.values().sum::<f64>();
        Ok(PowerFigures {
            final_hp,
            hp_gain_by_category: gains,
        })
    }
}

/// Pressure-ratio physics model. The authoritative strategy.
///
/// Boost-driven entries gain power from the manifold pressure ratio:
///
/// ```text
/// PR   = (14.7 + new_boost) / (14.7 + stock_boost)
/// gain = stock_hp * (PR - 1) * efficiency
/// ```
///
/// where `efficiency` derates the ideal gain for intake-tract and heat
/// losses. The total boost gain is attributed to categories by their share of
/// the boost delta. Non-boost entries compound percentage gains (relative to
/// stock power) against the running total, so later parts build on earlier
/// ones within their category.
#[derive(Debug, Clone, Default)]
pub struct PressureRatioStrategy;

impl PowerStrategy for PressureRatioStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::PressureRatio
    }

    fn project_power(
        &self,
        vehicle: &Vehicle,
        totals: &CategoryTotals,
        state: &EngineState,
        caps: &CategoryCaps,
    ) -> Result<PowerFigures> {
        let efficiency = vehicle.engine_architecture.boost_efficiency();
        let total_boost_delta = state.boost_delta_psi();

        let boost_gain_total = if total_boost_delta > 0.0 {
            let pressure_ratio = (ATMOSPHERIC_PSI + state.boost_psi())
                / (ATMOSPHERIC_PSI + state.stock_boost_psi());
            vehicle.stock_hp * (pressure_ratio - 1.0) * efficiency
        } else {
            0.0
        };
        tracing::debug!(
            "pressure-ratio boost gain: {:.1} hp over {:.1} psi delta",
            boost_gain_total,
            total_boost_delta
        );

        // First pass: attribute the boost gain by each category's share of
        // the boost delta, clamping to category caps.
        let mut gains: BTreeMap<ModCategory, f64> = BTreeMap::new();
        let mut capped_boost_total = 0.0;
        for category in totals.categories() {
            let delta = totals.boost_delta(category);
            if delta <= 0.0 {
                continue;
            }
            let share = boost_gain_total * (delta / total_boost_delta);
            let capped = caps.clamp(category, share);
            gains.insert(category, capped);
            capped_boost_total += capped;
        }

        // Second pass: compound non-boost percentage gains against the
        // running total, then clamp the combined category gain.
        let running = vehicle.stock_hp + capped_boost_total;
        for category in totals.categories() {
            if !category.is_power() {
                continue;
            }
            let flat = totals.flat_gains(category);
            if flat.is_empty() {
                continue;
            }
            let factor: f64 = flat
                .iter()
                .map(|gain| 1.0 + gain / vehicle.stock_hp)
                .product();
            let pct_gain = running * (factor - 1.0);
            let combined = gains.get(&category).copied().unwrap_or(0.0) + pct_gain;
            gains.insert(category, caps.clamp(category, combined));
        }

        let final_hp = vehicle.stock_hp + gains.values().sum::<f64>();
        Ok(PowerFigures {
            final_hp,
            hp_gain_by_category: gains,
        })
    }
}

/// Select the strategy implementation for a given kind.
pub fn select_strategy(kind: StrategyKind) -> Box<dyn PowerStrategy> {
    match kind {
        StrategyKind::FlatGain => Box::new(FlatGainStrategy),
        StrategyKind::PressureRatio => Box::new(PressureRatioStrategy),
    }
}
