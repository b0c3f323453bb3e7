//! Category aggregation, tune hierarchy, and gain caps.
//!
//! Build order never changes a projection: accepted modifications are
//! re-sorted by key before any figure is accumulated, so floating-point
//! results are bit-identical across permutations of the same build.

use std::collections::BTreeMap;

use crate::catalog::{ModCategory, Modification};
use crate::error::{Error, Result};
use crate::vehicle::EngineArchitecture;

/// Reject builds that list the same non-tune modification key more than
/// once. Installing an identical part twice has no defined physical effect.
///
/// Tune keys are exempt: repeats and stacked stages are both collapsed by
/// [`resolve_tune_hierarchy`]. Comparison is against normalized keys,
/// matching catalog lookup.
pub fn reject_duplicates(mods: &[&Modification]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for entry in mods {
        if entry.category == ModCategory::Tune {
            continue;
        }
        let key = crate::catalog::loader::normalize_key(&entry.key);
        if !seen.insert(key) {
            return Err(Error::DuplicateModification {
                key: entry.key.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve the tune hierarchy: when a build contains several tunes, only the
/// highest tier contributes, exactly once. Lower tiers and repeated copies
/// of the winner are dropped entirely (power, boost, VE, and weight),
/// mirroring how a re-flash replaces the previous map.
///
/// Ties on tier rank break on key so the survivor does not depend on build
/// order.
pub fn resolve_tune_hierarchy<'a>(mods: &[&'a Modification]) -> Vec<&'a Modification> {
    let winner = mods
        .iter()
        .filter(|m| m.category == ModCategory::Tune)
        .max_by(|a, b| {
            a.tier_rank
                .cmp(&b.tier_rank)
                .then_with(|| a.key.cmp(&b.key))
        })
        .map(|m| m.key.as_str());

    let mut winner_kept = false;
    let mut accepted = Vec::with_capacity(mods.len());
    for entry in mods {
        if entry.category == ModCategory::Tune {
            if winner_kept || Some(entry.key.as_str()) != winner {
                tracing::debug!(
                    "tune hierarchy dropped '{}' in favor of '{}'",
                    entry.key,
                    winner.unwrap_or_default()
                );
                continue;
            }
            winner_kept = true;
        }
        accepted.push(*entry);
    }
    accepted
}

/// Per-category figures for the accepted modifications of one build.
#[derive(Debug, Clone, Default)]
pub struct CategoryTotals {
    /// Every entry's base gain, keyed by category.
    all_gains: BTreeMap<ModCategory, Vec<f64>>,
    /// Base gains of entries whose power comes from `base_gain` rather than
    /// a boost delta.
    flat_gains: BTreeMap<ModCategory, Vec<f64>>,
    /// Summed boost deltas, keyed by category.
    boost_deltas: BTreeMap<ModCategory, f64>,
}

impl CategoryTotals {
    /// Group accepted modifications by category.
    pub fn from_mods(mods: &[&Modification]) -> Self {
        let mut sorted: Vec<&Modification> = mods.to_vec();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));

        let mut totals = Self::default();
        for entry in sorted {
            totals
                .all_gains
                .entry(entry.category)
                .or_default()
                .push(entry.base_gain);
            if !entry.is_boost_driven() {
                totals
                    .flat_gains
                    .entry(entry.category)
                    .or_default()
                    .push(entry.base_gain);
            }
            if entry.boost_delta_psi > 0.0 {
                *totals.boost_deltas.entry(entry.category).or_default() +=
                    entry.boost_delta_psi;
            }
        }
        totals
    }

    /// Categories present in the build, in enum order.
    pub fn categories(&self) -> impl Iterator<Item = ModCategory> + '_ {
        self.all_gains.keys().copied()
    }

    /// Sum of every entry's base gain in a category.
    pub fn gain_sum(&self, category: ModCategory) -> f64 {
        self.all_gains
            .get(&category)
            .map(|gains| gains.iter().sum())
            .unwrap_or(0.0)
    }

    /// Base gains of non-boost-driven entries in a category, in key order.
    pub fn flat_gains(&self, category: ModCategory) -> &[f64] {
        self.flat_gains
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Summed boost delta contributed by a category, in PSI.
    pub fn boost_delta(&self, category: ModCategory) -> f64 {
        self.boost_deltas.get(&category).copied().unwrap_or(0.0)
    }

    /// Total boost delta across all categories, in PSI.
    pub fn total_boost_delta(&self) -> f64 {
        self.boost_deltas.values().sum()
    }

    /// Number of accepted entries in a category.
    pub fn entry_count(&self, category: ModCategory) -> usize {
        self.all_gains.get(&category).map(Vec::len).unwrap_or(0)
    }
}

/// Per-category ceilings on aggregated gains.
///
/// Power-category caps are whole horsepower; chassis-category caps are
/// percent. The weight category is uncapped since its deltas are signed
/// weight changes, not gains.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCaps {
    caps: BTreeMap<ModCategory, f64>,
}

impl Default for CategoryCaps {
    fn default() -> Self {
        let mut caps = BTreeMap::new();
        // Horsepower ceilings for power categories.
        caps.insert(ModCategory::Intake, 15.0);
        caps.insert(ModCategory::Exhaust, 45.0);
        caps.insert(ModCategory::Tune, 130.0);
        caps.insert(ModCategory::Turbo, 160.0);
        caps.insert(ModCategory::Intercooler, 25.0);
        caps.insert(ModCategory::Fuel, 60.0);
        caps.insert(ModCategory::Cooling, 10.0);
        // Percent ceilings for chassis categories.
        caps.insert(ModCategory::Brakes, 30.0);
        caps.insert(ModCategory::Suspension, 15.0);
        caps.insert(ModCategory::Aero, 8.0);
        caps.insert(ModCategory::Tire, 12.0);
        Self { caps }
    }
}

impl CategoryCaps {
    /// Validate that every configured cap is finite and positive.
    pub fn validate(&self) -> Result<()> {
        for (category, cap) in &self.caps {
            if !cap.is_finite() || *cap <= 0.0 {
                return Err(Error::InvalidCatalogEntry {
                    message: format!("cap for category '{category}' must be a finite positive number"),
                });
            }
        }
        Ok(())
    }

    /// The ceiling for a category, or `None` if the category is uncapped.
    pub fn cap_for(&self, category: ModCategory) -> Option<f64> {
        self.caps.get(&category).copied()
    }

    /// Replace the ceiling for one category.
    pub fn with_cap(mut self, category: ModCategory, cap: f64) -> Self {
        self.caps.insert(category, cap);
        self
    }

    /// Clamp an aggregated gain to the category ceiling.
    pub fn clamp(&self, category: ModCategory, gain: f64) -> f64 {
        match self.cap_for(category) {
            Some(cap) if gain > cap => {
                tracing::debug!(
                    "capped {category} gain {gain:.1} to category ceiling {cap:.1}"
                );
                cap
            }
            _ => gain,
        }
    }
}

/// Capped chassis percentages extracted from category totals.
///
/// Tire grip is kept separate from the combined figure because the launch
/// correlation only cares about the driven contact patch.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisPercents {
    pub tire_grip_pct: f64,
    pub total_grip_pct: f64,
    pub braking_pct: f64,
}

impl ChassisPercents {
    /// Clamp each chassis category to its cap and combine the grip figures.
    pub fn from_totals(totals: &CategoryTotals, caps: &CategoryCaps) -> Self {
        let suspension = caps.clamp(
            ModCategory::Suspension,
            totals.gain_sum(ModCategory::Suspension),
        );
        let aero = caps.clamp(ModCategory::Aero, totals.gain_sum(ModCategory::Aero));
        let tire = caps.clamp(ModCategory::Tire, totals.gain_sum(ModCategory::Tire));
        let braking = caps.clamp(ModCategory::Brakes, totals.gain_sum(ModCategory::Brakes));
        Self {
            tire_grip_pct: tire,
            total_grip_pct: suspension + aero + tire,
            braking_pct: braking,
        }
    }
}

/// Scale a category gain by the engine architecture multiplier.
///
/// Applies to power categories only; cooling and chassis gains pass through
/// unchanged.
pub fn architecture_scaled(
    category: ModCategory,
    gain: f64,
    architecture: EngineArchitecture,
) -> f64 {
    if category.takes_architecture_multiplier() {
        gain * architecture.flat_multiplier()
    } else {
        gain
    }
}
