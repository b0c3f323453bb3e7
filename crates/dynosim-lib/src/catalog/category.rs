//! Modification categories and their projection semantics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category assigned to every catalog entry. Resolved once at load time so
/// projection code never re-derives it from the key.
///
/// Power categories contribute horsepower; chassis categories contribute
/// percentage improvements to braking or grip. The [`Weight`](Self::Weight)
/// category contributes only through its weight delta.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ModCategory {
    Intake,
    Exhaust,
    Tune,
    Turbo,
    Intercooler,
    Fuel,
    Cooling,
    Suspension,
    Brakes,
    Weight,
    Aero,
    Tire,
}

impl ModCategory {
    /// All categories, in display order.
    pub const ALL: [ModCategory; 12] = [
        ModCategory::Intake,
        ModCategory::Exhaust,
        ModCategory::Tune,
        ModCategory::Turbo,
        ModCategory::Intercooler,
        ModCategory::Fuel,
        ModCategory::Cooling,
        ModCategory::Suspension,
        ModCategory::Brakes,
        ModCategory::Weight,
        ModCategory::Aero,
        ModCategory::Tire,
    ];

    /// Parse a catalog cell into a category (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "intake" => Some(ModCategory::Intake),
            "exhaust" => Some(ModCategory::Exhaust),
            "tune" => Some(ModCategory::Tune),
            "turbo" => Some(ModCategory::Turbo),
            "intercooler" => Some(ModCategory::Intercooler),
            "fuel" => Some(ModCategory::Fuel),
            "cooling" => Some(ModCategory::Cooling),
            "suspension" => Some(ModCategory::Suspension),
            "brakes" => Some(ModCategory::Brakes),
            "weight" => Some(ModCategory::Weight),
            "aero" => Some(ModCategory::Aero),
            "tire" | "tires" => Some(ModCategory::Tire),
            _ => None,
        }
    }

    /// Whether entries in this category contribute horsepower.
    pub fn is_power(self) -> bool {
        matches!(
            self,
            ModCategory::Intake
                | ModCategory::Exhaust
                | ModCategory::Tune
                | ModCategory::Turbo
                | ModCategory::Intercooler
                | ModCategory::Fuel
                | ModCategory::Cooling
        )
    }

    /// Whether the flat-gain strategy scales this category by the engine
    /// architecture multiplier. Cooling gains are flat auxiliary recovery and
    /// are excluded along with every chassis category.
    pub fn takes_architecture_multiplier(self) -> bool {
        self.is_power() && self != ModCategory::Cooling
    }

    /// Whether entries in this category improve lateral grip.
    pub fn affects_grip(self) -> bool {
        matches!(
            self,
            ModCategory::Suspension | ModCategory::Aero | ModCategory::Tire
        )
    }

    /// Short label used in renderings and logs.
    pub fn label(self) -> &'static str {
        match self {
            ModCategory::Intake => "intake",
            ModCategory::Exhaust => "exhaust",
            ModCategory::Tune => "tune",
            ModCategory::Turbo => "turbo",
            ModCategory::Intercooler => "intercooler",
            ModCategory::Fuel => "fuel",
            ModCategory::Cooling => "cooling",
            ModCategory::Suspension => "suspension",
            ModCategory::Brakes => "brakes",
            ModCategory::Weight => "weight",
            ModCategory::Aero => "aero",
            ModCategory::Tire => "tire",
        }
    }
}

impl fmt::Display for ModCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(ModCategory::parse("Intake"), Some(ModCategory::Intake));
        assert_eq!(ModCategory::parse(" TURBO "), Some(ModCategory::Turbo));
        assert_eq!(ModCategory::parse("tires"), Some(ModCategory::Tire));
        assert_eq!(ModCategory::parse("nitrous"), None);
    }

    #[test]
    fn power_categories_contribute_horsepower() {
        assert!(ModCategory::Intake.is_power());
        assert!(ModCategory::Fuel.is_power());
        assert!(ModCategory::Cooling.is_power());
        assert!(!ModCategory::Brakes.is_power());
        assert!(!ModCategory::Weight.is_power());
    }

    #[test]
    fn architecture_multiplier_excludes_cooling_and_chassis() {
        assert!(ModCategory::Tune.takes_architecture_multiplier());
        assert!(ModCategory::Turbo.takes_architecture_multiplier());
        assert!(!ModCategory::Cooling.takes_architecture_multiplier());
        assert!(!ModCategory::Suspension.takes_architecture_multiplier());
        assert!(!ModCategory::Weight.takes_architecture_multiplier());
    }

    #[test]
    fn grip_categories_are_suspension_aero_tire() {
        let grip: Vec<ModCategory> = ModCategory::ALL
            .into_iter()
            .filter(|c| c.affects_grip())
            .collect();
        assert_eq!(
            grip,
            vec![ModCategory::Suspension, ModCategory::Aero, ModCategory::Tire]
        );
    }

    #[test]
    fn every_category_round_trips_through_its_label() {
        for category in ModCategory::ALL {
            assert_eq!(ModCategory::parse(category.label()), Some(category));
        }
    }
}
