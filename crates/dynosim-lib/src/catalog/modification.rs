//! Catalog entry type and validation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::category::ModCategory;

/// A single part or tune in the modification catalog.
///
/// `base_gain` is whole horsepower for power categories and a percentage
/// improvement for chassis categories (braking distance reduction, grip
/// increase). Boost and volumetric-efficiency deltas are always additive
/// improvements; weight deltas are signed (negative means the part sheds
/// weight).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modification {
    pub key: String,
    pub category: ModCategory,
    pub base_gain: f64,
    pub boost_delta_psi: f64,
    pub ve_delta: f64,
    pub weight_delta_lbs: f64,
    /// Position in the tune hierarchy. `Some` for tune entries only; higher
    /// ranks supersede lower ones within a build.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier_rank: Option<u8>,
}

impl Modification {
    /// Validate a catalog entry for correctness.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCatalogEntry`] when the key is empty, a gain or
    /// delta is non-finite, a boost or VE delta is negative, or the tier rank
    /// disagrees with the category (tunes must carry one, nothing else may).
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::InvalidCatalogEntry {
                message: "modification key must not be empty".to_string(),
            });
        }

        let fields = [
            (self.base_gain, "base_gain"),
            (self.boost_delta_psi, "boost_delta_psi"),
            (self.ve_delta, "ve_delta"),
        ];

        for (value, field) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidCatalogEntry {
                    message: format!(
                        "{field} for '{}' must be finite and non-negative",
                        self.key
                    ),
                });
            }
        }

        if !self.weight_delta_lbs.is_finite() {
            return Err(Error::InvalidCatalogEntry {
                message: format!("weight_delta_lbs for '{}' must be finite", self.key),
            });
        }

        match (self.category, self.tier_rank) {
            (ModCategory::Tune, None) => Err(Error::InvalidCatalogEntry {
                message: format!("tune '{}' must carry a tier rank", self.key),
            }),
            (ModCategory::Tune, Some(0)) => Err(Error::InvalidCatalogEntry {
                message: format!("tune '{}' tier rank must be at least 1", self.key),
            }),
            (category, Some(_)) if category != ModCategory::Tune => {
                Err(Error::InvalidCatalogEntry {
                    message: format!(
                        "'{}' is not a tune and must not carry a tier rank",
                        self.key
                    ),
                })
            }
            _ => Ok(()),
        }
    }

    /// Whether the pressure-ratio strategy derives this entry's power gain
    /// from its boost delta instead of its flat `base_gain`.
    pub fn is_boost_driven(&self) -> bool {
        self.boost_delta_psi > 0.0
    }
}
