//! Presentation helpers for projected performance.

use std::fmt::Write;

use serde::Serialize;

use crate::catalog::ModCategory;
use crate::projection::{
    Metric, MetricSource, ProjectedPerformance, SourceOrigin, StrategyKind, STOCK_VE_PERCENT,
};
use crate::vehicle::Vehicle;

/// Presentation style for turning a [`PerformanceSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceRenderMode {
    PlainText,
    RichText,
}

/// One power category's contribution, for the gain breakdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GainLine {
    pub category: ModCategory,
    pub gain_hp: f64,
}

/// One projected metric with its stock anchor and provenance.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricLine {
    pub metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    pub projected: f64,
    pub source: MetricSource,
}

/// Structured representation of a projection that higher-level consumers can
/// serialise or render as text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PerformanceSummary {
    pub vehicle: String,
    pub strategy: StrategyKind,
    pub stock_hp: f64,
    pub final_hp: f64,
    pub total_gain_hp: f64,
    pub gains: Vec<GainLine>,
    pub metrics: Vec<MetricLine>,
}

impl PerformanceSummary {
    /// Convert a [`ProjectedPerformance`] into a structured summary.
    pub fn from_projection(vehicle: &Vehicle, perf: &ProjectedPerformance) -> Self {
        let mut gains: Vec<GainLine> = perf
            .hp_gain_by_category
            .iter()
            .map(|(category, gain)| GainLine {
                category: *category,
                gain_hp: *gain,
            })
            .collect();
        gains.sort_by(|a, b| {
            b.gain_hp
                .total_cmp(&a.gain_hp)
                .then_with(|| a.category.cmp(&b.category))
        });

        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| MetricLine {
                metric,
                stock: stock_metric(vehicle, metric),
                projected: perf.metric(metric),
                source: perf
                    .source(metric)
                    .cloned()
                    .unwrap_or_else(MetricSource::estimated),
            })
            .collect();

        Self {
            vehicle: vehicle.name.clone(),
            strategy: perf.strategy,
            stock_hp: vehicle.stock_hp,
            final_hp: perf.final_hp,
            total_gain_hp: perf.total_gain_hp(),
            gains,
            metrics,
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: PerformanceRenderMode) -> String {
        match mode {
            PerformanceRenderMode::PlainText => self.render_plain(),
            PerformanceRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Projection: {} ({} strategy)",
            self.vehicle, self.strategy
        );
        let _ = writeln!(
            buffer,
            "Power: {:.0} hp -> {:.0} hp ({:+.0} hp)",
            self.stock_hp, self.final_hp, self.total_gain_hp
        );

        if !self.gains.is_empty() {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "Gains by category:");
            let max_gain = self.gains.first().map(|g| g.gain_hp).unwrap_or(0.0);
            for line in &self.gains {
                let _ = writeln!(
                    buffer,
                    "  {:<12} {:>4.0} hp  {}",
                    line.category.label(),
                    line.gain_hp,
                    gain_bar(line.gain_hp, max_gain, '#')
                );
            }
        }

        let _ = writeln!(buffer);
        let _ = writeln!(buffer, "Metrics:");
        for line in &self.metrics {
            let stock = match line.stock {
                Some(stock) => format!("(stock {})", format_metric(line.metric, stock)),
                None => String::new(),
            };
            let _ = writeln!(
                buffer,
                "  {:<22} {:>14} {:<22} {}",
                line.metric.label(),
                format_metric(line.metric, line.projected),
                stock,
                source_badge(&line.source)
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Projection**: _{}_ (`{}`)",
            self.vehicle, self.strategy
        );
        let _ = writeln!(
            buffer,
            "**Power**: {:.0} hp -> **{:.0} hp** ({:+.0} hp)",
            self.stock_hp, self.final_hp, self.total_gain_hp
        );
        let max_gain = self.gains.first().map(|g| g.gain_hp).unwrap_or(0.0);
        for line in &self.gains {
            let _ = writeln!(
                buffer,
                "* **{}** {:.0} hp {}",
                line.category.label(),
                line.gain_hp,
                gain_bar(line.gain_hp, max_gain, '\u{2588}')
            );
        }
        for line in &self.metrics {
            let _ = writeln!(
                buffer,
                "* {}: **{}** {}",
                line.metric.label(),
                format_metric(line.metric, line.projected),
                source_badge(&line.source)
            );
        }
        buffer
    }
}

/// Format a metric value with its customary unit and precision.
pub fn format_metric(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Hp => format!("{value:.0} hp"),
        Metric::Torque => format!("{value:.0} lb-ft"),
        Metric::BoostPsi => format!("{value:.1} psi"),
        Metric::VolumetricEfficiency => format!("{value:.1}%"),
        Metric::WeightDelta => format!("{value:+.0} lb"),
        Metric::ZeroToSixty | Metric::QuarterMileEt => format!("{value:.2} s"),
        Metric::QuarterMileTrapMph => format!("{value:.1} mph"),
        Metric::BrakingDistance => format!("{value:.0} ft"),
        Metric::LateralG => format!("{value:.2} g"),
        Metric::PowerToWeight => format!("{value:.1} hp/ton"),
    }
}

/// Provenance badge appended to a rendered metric.
pub fn source_badge(source: &MetricSource) -> String {
    match source.origin {
        SourceOrigin::Estimated => "[estimated]".to_string(),
        SourceOrigin::Calibrated => "[calibrated]".to_string(),
        SourceOrigin::Measured => match source.confidence {
            Some(confidence) => format!("[measured: {}, {confidence}]", source.label),
            None => format!("[measured: {}]", source.label),
        },
    }
}

fn gain_bar(gain: f64, max_gain: f64, glyph: char) -> String {
    if gain <= 0.0 || max_gain <= 0.0 {
        return String::new();
    }
    let width = ((gain / max_gain) * 24.0).round().max(1.0) as usize;
    std::iter::repeat(glyph).take(width).collect()
}

/// Stock anchor for a metric, where the vehicle carries one.
fn stock_metric(vehicle: &Vehicle, metric: Metric) -> Option<f64> {
    match metric {
        Metric::Hp => Some(vehicle.stock_hp),
        Metric::Torque => Some(vehicle.stock_torque),
        Metric::BoostPsi => Some(vehicle.stock_boost_baseline()),
        Metric::VolumetricEfficiency => Some(STOCK_VE_PERCENT),
        Metric::ZeroToSixty => Some(vehicle.stock_zero_to_sixty),
        Metric::QuarterMileEt => Some(vehicle.stock_quarter_mile),
        Metric::BrakingDistance => Some(vehicle.stock_braking_60_to_0_ft),
        Metric::LateralG => Some(vehicle.stock_lateral_g),
        Metric::PowerToWeight => {
            Some(vehicle.stock_hp / (vehicle.curb_weight_lbs / 2000.0))
        }
        // No stock measurement exists for these.
        Metric::WeightDelta | Metric::QuarterMileTrapMph => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModCatalog;
    use crate::projection::{
        project_build, Confidence, MeasuredOverride, ProjectionRequest,
    };
    use crate::test_helpers::turbo_vehicle;

    fn summary_for(keys: &[&str]) -> PerformanceSummary {
        let vehicle = turbo_vehicle();
        let request = ProjectionRequest::new(vehicle.clone(), keys.iter().copied());
        let perf = project_build(ModCatalog::builtin(), &request).unwrap();
        PerformanceSummary::from_projection(&vehicle, &perf)
    }

    #[test]
    fn summary_orders_gains_descending() {
        let summary = summary_for(&["intake", "stage3-tune", "exhaust-catback"]);
        for pair in summary.gains.windows(2) {
            assert!(pair[0].gain_hp >= pair[1].gain_hp);
        }
        assert!(summary.total_gain_hp > 0.0);
    }

    #[test]
    fn plain_rendering_includes_power_and_badges() {
        let rendered = summary_for(&["intake"]).render(PerformanceRenderMode::PlainText);
        assert!(rendered.contains("Projection: test turbo sedan"));
        assert!(rendered.contains("Gains by category:"));
        assert!(rendered.contains("intake"));
        assert!(rendered.contains("[estimated]"));
        assert!(rendered.contains('#'));
    }

    #[test]
    fn rich_rendering_uses_markdown_emphasis() {
        let rendered = summary_for(&["intake"]).render(PerformanceRenderMode::RichText);
        assert!(rendered.contains("**Projection**"));
        assert!(rendered.starts_with("**"));
        assert!(rendered.contains('\u{2588}'));
    }

    #[test]
    fn measured_metrics_render_their_source() {
        let vehicle = turbo_vehicle();
        let request = ProjectionRequest::new(vehicle.clone(), ["intake"]).with_override(
            MeasuredOverride::new(Metric::Hp, 312.0)
                .with_source("dynojet")
                .with_confidence(Confidence::High),
        );
        let perf = project_build(ModCatalog::builtin(), &request).unwrap();
        let rendered = PerformanceSummary::from_projection(&vehicle, &perf)
            .render(PerformanceRenderMode::PlainText);
        assert!(rendered.contains("[measured: dynojet, high]"));
        assert!(rendered.contains("[calibrated]"));
    }

    #[test]
    fn trap_speed_and_weight_delta_have_no_stock_anchor() {
        let summary = summary_for(&[]);
        for line in &summary.metrics {
            match line.metric {
                Metric::QuarterMileTrapMph | Metric::WeightDelta => {
                    assert!(line.stock.is_none())
                }
                _ => assert!(line.stock.is_some(), "{} should anchor", line.metric),
            }
        }
    }

    #[test]
    fn format_metric_uses_customary_units() {
        assert_eq!(format_metric(Metric::Hp, 457.0), "457 hp");
        assert_eq!(format_metric(Metric::BoostPsi, 24.96), "25.0 psi");
        assert_eq!(format_metric(Metric::WeightDelta, -31.0), "-31 lb");
        assert_eq!(format_metric(Metric::WeightDelta, 12.0), "+12 lb");
        assert_eq!(format_metric(Metric::ZeroToSixty, 4.147), "4.15 s");
        assert_eq!(format_metric(Metric::LateralG, 0.96), "0.96 g");
    }
}
