//! Output format selection and result rendering.
//!
//! Projections themselves are rendered by `dynosim_lib::output`; this module
//! maps the `--format` flag onto those renderers and owns the side-by-side
//! strategy comparison table, which only exists at the CLI level.

use anyhow::Result;
use clap::ValueEnum;

use dynosim_lib::output::format_metric;
use dynosim_lib::{
    Metric, PerformanceRenderMode, PerformanceSummary, ProjectedPerformance, StrategyComparison,
    Vehicle,
};

/// Output format for projection results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text with metric and gain tables.
    Text,
    /// Markdown-flavoured text for chat clients and docs.
    Rich,
    /// Machine-readable JSON.
    Json,
}

/// Render a single projection in the requested format.
pub fn render_projection(
    vehicle: &Vehicle,
    perf: &ProjectedPerformance,
    format: OutputFormat,
) -> Result<()> {
    let summary = PerformanceSummary::from_projection(vehicle, perf);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => print!("{}", summary.render(PerformanceRenderMode::PlainText)),
        OutputFormat::Rich => print!("{}", summary.render(PerformanceRenderMode::RichText)),
    }
    Ok(())
}

/// Render a strategy comparison in the requested format.
pub fn render_comparison(
    vehicle: &Vehicle,
    comparison: &StrategyComparison,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(comparison)?),
        OutputFormat::Text | OutputFormat::Rich => print_comparison_table(vehicle, comparison),
    }
    Ok(())
}

/// Print both strategies side by side, one row per metric.
fn print_comparison_table(vehicle: &Vehicle, comparison: &StrategyComparison) {
    let flat = &comparison.flat_gain;
    let physics = &comparison.pressure_ratio;

    println!(
        "Strategy comparison: {} ({:.0} hp stock)",
        vehicle.name, vehicle.stock_hp
    );
    println!(
        "{:<22} {:>16} {:>16}",
        "Metric", "flat-gain", "pressure-ratio"
    );
    for metric in Metric::ALL {
        println!(
            "{:<22} {:>16} {:>16}",
            metric.label(),
            format_metric(metric, flat.metric(metric)),
            format_metric(metric, physics.metric(metric)),
        );
    }
    println!();
    println!(
        "Strategy spread: {:.0} hp (flat-gain {:.0} hp vs pressure-ratio {:.0} hp)",
        comparison.hp_spread(),
        flat.final_hp,
        physics.final_hp
    );
}
