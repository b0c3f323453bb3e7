//! Mods command handler for listing the modification catalog.

use anyhow::Result;

use dynosim_lib::{ModCatalog, ModCategory};

/// Handle the mods subcommand.
///
/// Lists every modification in the active catalog, built-in or loaded from a
/// CSV file via `--catalog`.
pub fn handle_list_mods(catalog: &ModCatalog) -> Result<()> {
    print_mod_catalog(catalog);
    Ok(())
}

/// Print the modification catalog to stdout in a formatted table.
///
/// The gain column is horsepower for power categories and a percentage for
/// chassis categories.
fn print_mod_catalog(catalog: &ModCatalog) {
    let mods = catalog.mods_sorted();
    if mods.is_empty() {
        println!("No modifications available in catalog.");
        return;
    }

    println!("Available modifications ({}):", mods.len());
    println!(
        "{:<24} {:<12} {:>10} {:>12} {:>7} {:>12} {:>5}",
        "Key", "Category", "Gain", "Boost (psi)", "VE (%)", "Weight (lb)", "Tier"
    );
    for modification in mods {
        let tier = modification
            .tier_rank
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<24} {:<12} {:>10} {:>12.1} {:>7.1} {:>+12.0} {:>5}",
            modification.key,
            modification.category.label(),
            format_gain(modification.category, modification.base_gain),
            modification.boost_delta_psi,
            modification.ve_delta,
            modification.weight_delta_lbs,
            tier
        );
    }
}

fn format_gain(category: ModCategory, base_gain: f64) -> String {
    if category.is_power() {
        format!("{base_gain:.0} hp")
    } else {
        format!("{base_gain:.1}%")
    }
}
