//! dynosim library entry points.
//!
//! This crate projects the performance of a modified vehicle: it loads a
//! modification catalog, accumulates build state, runs a power projection
//! strategy, and derives acceleration, braking, and grip figures with
//! per-metric provenance tags. Higher-level consumers (the CLI) should only
//! depend on the functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod catalog;
pub mod error;
pub mod output;
pub mod projection;
pub mod vehicle;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use catalog::{ModCatalog, ModCategory, Modification};
pub use error::{Error, Result};
pub use output::{PerformanceRenderMode, PerformanceSummary};
pub use projection::{
    compare_strategies, project_build, CategoryCaps, Confidence, EngineState, MeasuredOverride,
    Metric, MetricSource, ProjectedPerformance, ProjectionConfig, ProjectionRequest, SourceOrigin,
    StrategyComparison, StrategyKind,
};
pub use vehicle::{Drivetrain, EngineArchitecture, Vehicle};
