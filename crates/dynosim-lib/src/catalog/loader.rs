//! Modification catalog loading and lookup.
//!
//! Catalogs load from CSV files or from the builtin table compiled into the
//! library. Every entry is validated at load time so projection code can
//! assume well-formed reference data.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use once_cell::sync::Lazy;

use crate::error::{Error, Result};

use super::category::ModCategory;
use super::modification::Modification;

/// Maximum number of fuzzy-match suggestions attached to an unknown-key error.
const MAX_SUGGESTIONS: usize = 3;

/// Minimum Jaro-Winkler similarity for a key to count as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.80;

static BUILTIN: Lazy<ModCatalog> = Lazy::new(|| {
    ModCatalog::from_entries(builtin_entries()).expect("builtin modification catalog is valid")
});

/// Collection of modification definitions keyed by normalized key.
#[derive(Debug, Clone, Default)]
pub struct ModCatalog {
    mods: HashMap<String, Modification>,
    source: Option<PathBuf>,
}

impl ModCatalog {
    /// The builtin catalog compiled into the library.
    ///
    /// Loaded once and shared; lookups take `&self`, so concurrent projections
    /// can read it without synchronization.
    pub fn builtin() -> &'static ModCatalog {
        &BUILTIN
    }

    /// Load a modification catalog from a CSV file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let mut catalog = Self::from_reader(file)?;
        catalog.source = Some(path.to_path_buf());
        Ok(catalog)
    }

    /// Load a modification catalog from a reader (e.g., file or in-memory buffer).
    ///
    /// Required columns: `key`, `category`, `base_gain`. Optional columns
    /// (`boost_delta_psi`, `ve_delta`, `weight_delta_lbs`, `tier_rank`)
    /// default to zero or empty when absent.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::Fields).from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|err| Error::InvalidCatalogEntry {
                message: format!("failed to read catalog headers: {err}"),
            })?
            .clone();

        // Helper to normalize header strings for robust matching. Spacing,
        // underscores, and case all collapse so "HP Gain" matches "hp_gain".
        let normalize = |s: &str| {
            s.to_ascii_lowercase()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
        };

        let normalized_headers: Vec<String> = headers.iter().map(&normalize).collect();

        // Mapping of canonical field name -> possible header synonyms (normalized)
        let synonyms: &[(&str, &[&str])] = &[
            ("key", &["key", "mod", "modification", "part", "name"]),
            ("category", &["category", "cat", "type"]),
            (
                "base_gain",
                &["base_gain", "gain", "gain_hp", "hp_gain", "base_gain_hp"],
            ),
            (
                "boost_delta_psi",
                &["boost_delta_psi", "boost_delta", "boost_psi", "boost"],
            ),
            ("ve_delta", &["ve_delta", "ve_gain", "ve"]),
            (
                "weight_delta_lbs",
                &["weight_delta_lbs", "weight_delta", "weight_lbs", "weight"],
            ),
            ("tier_rank", &["tier_rank", "tier", "stage"]),
        ];

        use std::collections::BTreeMap;
        let mut index_map: BTreeMap<&str, usize> = BTreeMap::new();

        for (canon, alts) in synonyms {
            'outer: for alt in *alts {
                let alt_n = normalize(alt);
                for (i, h) in normalized_headers.iter().enumerate() {
                    if h == &alt_n {
                        index_map.insert(*canon, i);
                        break 'outer;
                    }
                }
            }
        }

        let required = ["key", "category", "base_gain"];
        let missing: Vec<&str> = required
            .into_iter()
            .filter(|c| !index_map.contains_key(c))
            .collect();

        if !missing.is_empty() {
            return Err(Error::InvalidCatalogEntry {
                message: format!(
                    "catalog missing required columns: {}. Available: {}",
                    missing.join(", "),
                    headers
                        .iter()
                        .map(|h| h.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            });
        }

        let mut mods = HashMap::new();

        let mut row_num: usize = 1; // header is typically line 1
        for result in csv_reader.records() {
            row_num += 1;
            let record = result.map_err(|e| Error::InvalidCatalogEntry {
                message: e.to_string(),
            })?;
            let row = row_num as u64;

            let get = |field: &str| -> Option<String> {
                index_map
                    .get(field)
                    .and_then(|&i| record.get(i))
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
            };

            let key = get("key").ok_or_else(|| Error::InvalidCatalogEntry {
                message: format!("missing modification key at row {row}"),
            })?;

            let category_cell = get("category").ok_or_else(|| Error::InvalidCatalogEntry {
                message: format!("missing category for '{key}' at row {row}"),
            })?;
            let category =
                ModCategory::parse(&category_cell).ok_or_else(|| Error::InvalidCatalogEntry {
                    message: format!(
                        "unknown category '{category_cell}' for '{key}' at row {row}"
                    ),
                })?;

            let parse_f64 = |field: &str, default: f64| -> Result<f64> {
                match get(field) {
                    Some(cell) => cell.parse::<f64>().map_err(|e| Error::InvalidCatalogEntry {
                        message: format!("invalid {field} for '{key}' at row {row}: {e}"),
                    }),
                    None => Ok(default),
                }
            };

            let base_gain = match get("base_gain") {
                Some(cell) => cell.parse::<f64>().map_err(|e| Error::InvalidCatalogEntry {
                    message: format!("invalid base_gain for '{key}' at row {row}: {e}"),
                })?,
                None => {
                    return Err(Error::InvalidCatalogEntry {
                        message: format!("missing base_gain for '{key}' at row {row}"),
                    })
                }
            };
            let boost_delta_psi = parse_f64("boost_delta_psi", 0.0)?;
            let ve_delta = parse_f64("ve_delta", 0.0)?;
            let weight_delta_lbs = parse_f64("weight_delta_lbs", 0.0)?;

            let tier_rank = match get("tier_rank") {
                Some(cell) => Some(cell.parse::<u8>().map_err(|e| {
                    Error::InvalidCatalogEntry {
                        message: format!("invalid tier_rank for '{key}' at row {row}: {e}"),
                    }
                })?),
                None => None,
            };

            let entry = Modification {
                key: key.clone(),
                category,
                base_gain,
                boost_delta_psi,
                ve_delta,
                weight_delta_lbs,
                tier_rank,
            };

            entry.validate()?;

            let normalized = normalize_key(&entry.key);
            if mods.contains_key(&normalized) {
                return Err(Error::DuplicateModification { key: normalized });
            }
            mods.insert(normalized, entry);
        }

        Ok(Self { mods, source: None })
    }

    /// Build a catalog from already-constructed entries, validating each one.
    pub fn from_entries(entries: Vec<Modification>) -> Result<Self> {
        let mut mods = HashMap::new();
        for entry in entries {
            entry.validate()?;
            let normalized = normalize_key(&entry.key);
            if mods.contains_key(&normalized) {
                return Err(Error::DuplicateModification { key: normalized });
            }
            mods.insert(normalized, entry);
        }
        Ok(Self { mods, source: None })
    }

    /// Get a modification by key (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&Modification> {
        self.mods.get(&normalize_key(key))
    }

    /// Look up a modification, failing with fuzzy-match suggestions when the
    /// key is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownModification`] carrying up to three
    /// closest-matching catalog keys.
    pub fn lookup(&self, key: &str) -> Result<&Modification> {
        self.get(key).ok_or_else(|| Error::UnknownModification {
            key: key.trim().to_string(),
            suggestions: self.suggestions_for(key),
        })
    }

    /// Closest catalog keys to a misspelled key, best match first.
    pub fn suggestions_for(&self, key: &str) -> Vec<String> {
        let needle = normalize_key(key);
        let mut scored: Vec<(f64, &str)> = self
            .mods
            .values()
            .map(|m| (strsim::jaro_winkler(&needle, &normalize_key(&m.key)), m.key.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(_, key)| key.to_string())
            .collect()
    }

    /// Get a sorted list of all modification keys.
    pub fn keys_sorted(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.mods.values().map(|m| m.key.clone()).collect();
        keys.sort();
        keys
    }

    /// Get all modifications sorted by key.
    pub fn mods_sorted(&self) -> Vec<&Modification> {
        let mut mods: Vec<&Modification> = self.mods.values().collect();
        mods.sort_by(|a, b| a.key.cmp(&b.key));
        mods
    }

    /// Number of entries in the catalog.
    pub fn len(&self) -> usize {
        self.mods.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.mods.is_empty()
    }

    /// Get the source path if the catalog was loaded from a file.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

/// Normalize a modification key for case-insensitive lookup.
pub(crate) fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// The builtin catalog table. Gains are whole horsepower for power categories
/// and percent for chassis categories.
fn builtin_entries() -> Vec<Modification> {
    let power = |key: &str, category: ModCategory, gain: f64, boost: f64, ve: f64, weight: f64| {
        Modification {
            key: key.to_string(),
            category,
            base_gain: gain,
            boost_delta_psi: boost,
            ve_delta: ve,
            weight_delta_lbs: weight,
            tier_rank: None,
        }
    };
    let tune = |key: &str, gain: f64, boost: f64, tier: u8| Modification {
        key: key.to_string(),
        category: ModCategory::Tune,
        base_gain: gain,
        boost_delta_psi: boost,
        ve_delta: 0.0,
        weight_delta_lbs: 0.0,
        tier_rank: Some(tier),
    };
    let chassis = |key: &str, category: ModCategory, pct: f64, weight: f64| Modification {
        key: key.to_string(),
        category,
        base_gain: pct,
        boost_delta_psi: 0.0,
        ve_delta: 0.0,
        weight_delta_lbs: weight,
        tier_rank: None,
    };

    vec![
        power("intake", ModCategory::Intake, 12.0, 0.0, 1.5, -2.0),
        power("exhaust-catback", ModCategory::Exhaust, 15.0, 0.0, 1.0, -8.0),
        power("headers", ModCategory::Exhaust, 10.0, 0.0, 1.2, -5.0),
        power("downpipe", ModCategory::Exhaust, 18.0, 0.0, 1.5, -3.0),
        tune("stage1-tune", 25.0, 2.0, 1),
        tune("stage2-tune", 45.0, 4.0, 2),
        tune("stage3-tune", 70.0, 6.0, 3),
        power("intercooler", ModCategory::Intercooler, 15.0, 0.0, 1.0, 12.0),
        power(
            "turbo-upgrade-existing",
            ModCategory::Turbo,
            90.0,
            8.0,
            0.0,
            18.0,
        ),
        power("turbo-kit-na", ModCategory::Turbo, 110.0, 7.0, 0.0, 55.0),
        power("supercharger-kit", ModCategory::Turbo, 95.0, 6.0, 0.0, 48.0),
        power("flex-fuel-e85", ModCategory::Fuel, 35.0, 0.0, 0.0, 4.0),
        power("fuel-injectors-upgrade", ModCategory::Fuel, 8.0, 0.0, 0.0, 0.0),
        power("fuel-pump-upgrade", ModCategory::Fuel, 5.0, 0.0, 0.0, 2.0),
        power("radiator-upgrade", ModCategory::Cooling, 3.0, 0.0, 0.0, 6.0),
        power("oil-cooler", ModCategory::Cooling, 2.0, 0.0, 0.0, 8.0),
        chassis("coilovers", ModCategory::Suspension, 8.0, -10.0),
        chassis("sway-bars", ModCategory::Suspension, 4.0, 5.0),
        chassis("big-brake-kit", ModCategory::Brakes, 18.0, -4.0),
        chassis("brake-pads-track", ModCategory::Brakes, 8.0, 0.0),
        chassis("tires-200tw", ModCategory::Tire, 6.0, 0.0),
        chassis("tires-r-compound", ModCategory::Tire, 10.0, 0.0),
        chassis("front-splitter", ModCategory::Aero, 3.0, 7.0),
        chassis("rear-wing", ModCategory::Aero, 4.0, 12.0),
        chassis("carbon-hood", ModCategory::Weight, 0.0, -18.0),
        chassis("rear-seat-delete", ModCategory::Weight, 0.0, -45.0),
        chassis("lightweight-battery", ModCategory::Weight, 0.0, -25.0),
    ]
}
