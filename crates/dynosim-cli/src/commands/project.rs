//! Project and compare command handlers.
//!
//! Both subcommands share one argument set: a vehicle baseline (from flags or
//! a JSON file), an ordered list of modification keys, and optional measured
//! overrides. `project` runs the configured strategy; `compare` runs both.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, ValueEnum};

use dynosim_lib::projection::kinematics::{
    quarter_mile_et_correlation, traction_factor, zero_to_sixty_correlation,
};
use dynosim_lib::{
    compare_strategies, project_build, Confidence, Drivetrain, EngineArchitecture,
    MeasuredOverride, Metric, ModCatalog, ProjectionRequest, StrategyKind, Vehicle,
};

use crate::output::{self, OutputFormat};

/// Stock 60-0 braking distance assumed when no figure is supplied.
const DEFAULT_BRAKING_FT: f64 = 125.0;
/// Stock lateral grip assumed when no figure is supplied.
const DEFAULT_LATERAL_G: f64 = 0.90;

/// Shared argument set for the `project` and `compare` subcommands.
#[derive(Args, Debug, Clone)]
pub struct ProjectCommandArgs {
    /// Load the vehicle baseline from a JSON file instead of flags.
    #[arg(long, value_name = "JSON")]
    pub vehicle: Option<PathBuf>,

    /// Vehicle display name.
    #[arg(long, default_value = "project car")]
    pub name: String,

    /// Rated crank horsepower.
    #[arg(long, required_unless_present = "vehicle")]
    pub hp: Option<f64>,

    /// Rated torque in lb-ft.
    #[arg(long, required_unless_present = "vehicle")]
    pub torque: Option<f64>,

    /// Curb weight in pounds.
    #[arg(long, required_unless_present = "vehicle")]
    pub weight: Option<f64>,

    /// Engine induction architecture.
    #[arg(long, value_enum, default_value = "na")]
    pub architecture: ArchitectureArg,

    /// Factory boost pressure in PSI, for forced-induction vehicles.
    #[arg(long)]
    pub boost: Option<f64>,

    /// Driven-wheel layout.
    #[arg(long, value_enum, default_value = "rwd")]
    pub drivetrain: DrivetrainArg,

    /// Measured stock 0-60 mph time in seconds. Estimated when omitted.
    #[arg(long = "zero-to-sixty", value_name = "SECONDS")]
    pub zero_to_sixty: Option<f64>,

    /// Measured stock quarter-mile ET in seconds. Estimated when omitted.
    #[arg(long = "quarter-mile", value_name = "SECONDS")]
    pub quarter_mile: Option<f64>,

    /// Measured stock 60-0 mph braking distance in feet.
    #[arg(long, value_name = "FEET")]
    pub braking: Option<f64>,

    /// Measured stock lateral grip in g.
    #[arg(long = "lateral-g", value_name = "G")]
    pub lateral_g: Option<f64>,

    /// Power projection strategy.
    #[arg(long, value_enum, default_value = "pressure-ratio")]
    pub strategy: StrategyArg,

    /// Measured override, repeatable. Later overrides of a metric win.
    #[arg(long = "override", value_name = "METRIC=VALUE[:LABEL[:CONFIDENCE]]")]
    pub overrides: Vec<String>,

    /// Modification keys to install, in any order.
    #[arg(value_name = "MOD")]
    pub mods: Vec<String>,
}

impl ProjectCommandArgs {
    /// Build the projection request described by the arguments.
    pub fn to_request(&self) -> Result<ProjectionRequest> {
        let vehicle = self.resolve_vehicle()?;
        let mut request = ProjectionRequest::new(vehicle, self.mods.iter().cloned())
            .with_strategy(self.strategy.to_kind());
        for raw in &self.overrides {
            request = request.with_override(parse_override(raw)?);
        }
        Ok(request)
    }

    /// Resolve the stock baseline from `--vehicle` or from the flag set.
    ///
    /// Missing launch figures are synthesised from the raw correlations so a
    /// vehicle can be described with nothing more than power, torque, and
    /// weight.
    fn resolve_vehicle(&self) -> Result<Vehicle> {
        if let Some(path) = &self.vehicle {
            let payload = fs::read_to_string(path)
                .with_context(|| format!("failed to read vehicle file {}", path.display()))?;
            return serde_json::from_str(&payload)
                .with_context(|| format!("failed to parse vehicle file {}", path.display()));
        }

        let (hp, torque, weight) = match (self.hp, self.torque, self.weight) {
            (Some(hp), Some(torque), Some(weight)) => (hp, torque, weight),
            _ => {
                return Err(anyhow!(
                    "--hp, --torque, and --weight are required without --vehicle"
                ))
            }
        };

        let drivetrain = self.drivetrain.to_drivetrain();
        let zero_to_sixty = match self.zero_to_sixty {
            Some(value) => value,
            None => zero_to_sixty_correlation(hp, weight, traction_factor(drivetrain, 0.0))?,
        };
        let quarter_mile = match self.quarter_mile {
            Some(value) => value,
            None => quarter_mile_et_correlation(hp, weight)?,
        };

        Ok(Vehicle {
            name: self.name.clone(),
            stock_hp: hp,
            stock_torque: torque,
            curb_weight_lbs: weight,
            engine_architecture: self.architecture.to_architecture(),
            stock_boost_psi: self.boost,
            stock_zero_to_sixty: zero_to_sixty,
            stock_quarter_mile: quarter_mile,
            stock_braking_60_to_0_ft: self.braking.unwrap_or(DEFAULT_BRAKING_FT),
            stock_lateral_g: self.lateral_g.unwrap_or(DEFAULT_LATERAL_G),
            drivetrain,
        })
    }
}

/// Handle the project subcommand.
pub fn handle_project_command(
    catalog: &ModCatalog,
    args: &ProjectCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = args.to_request()?;
    let perf = project_build(catalog, &request)?;
    output::render_projection(&request.vehicle, &perf, format)
}

/// Handle the compare subcommand.
pub fn handle_compare_command(
    catalog: &ModCatalog,
    args: &ProjectCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let request = args.to_request()?;
    let comparison = compare_strategies(catalog, &request)?;
    output::render_comparison(&request.vehicle, &comparison, format)
}

/// Parse a `metric=value[:label[:confidence]]` override expression.
pub fn parse_override(raw: &str) -> Result<MeasuredOverride> {
    let (metric_part, value_part) = raw.split_once('=').ok_or_else(|| {
        anyhow!("override '{raw}' must look like metric=value[:label[:confidence]]")
    })?;
    let metric = Metric::parse(metric_part)
        .ok_or_else(|| anyhow!("unknown metric '{metric_part}' in override '{raw}'"))?;

    let mut pieces = value_part.splitn(3, ':');
    let value_text = pieces.next().unwrap_or_default();
    let value: f64 = value_text
        .parse()
        .with_context(|| format!("invalid value '{value_text}' in override '{raw}'"))?;

    let mut measured = MeasuredOverride::new(metric, value);
    if let Some(label) = pieces.next() {
        measured = measured.with_source(label);
    }
    if let Some(confidence_text) = pieces.next() {
        let confidence = Confidence::parse(confidence_text)
            .ok_or_else(|| anyhow!("unknown confidence '{confidence_text}' in override '{raw}'"))?;
        measured = measured.with_confidence(confidence);
    }
    Ok(measured)
}

/// Engine architecture as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ArchitectureArg {
    Na,
    Turbo,
    Supercharged,
}

impl ArchitectureArg {
    fn to_architecture(self) -> EngineArchitecture {
        match self {
            ArchitectureArg::Na => EngineArchitecture::NaturallyAspirated,
            ArchitectureArg::Turbo => EngineArchitecture::Turbocharged,
            ArchitectureArg::Supercharged => EngineArchitecture::Supercharged,
        }
    }
}

/// Driven-wheel layout as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DrivetrainArg {
    Fwd,
    Rwd,
    Awd,
}

impl DrivetrainArg {
    fn to_drivetrain(self) -> Drivetrain {
        match self {
            DrivetrainArg::Fwd => Drivetrain::Fwd,
            DrivetrainArg::Rwd => Drivetrain::Rwd,
            DrivetrainArg::Awd => Drivetrain::Awd,
        }
    }
}

/// Power projection strategy as written on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    FlatGain,
    PressureRatio,
}

impl StrategyArg {
    fn to_kind(self) -> StrategyKind {
        match self {
            StrategyArg::FlatGain => StrategyKind::FlatGain,
            StrategyArg::PressureRatio => StrategyKind::PressureRatio,
        }
    }
}
