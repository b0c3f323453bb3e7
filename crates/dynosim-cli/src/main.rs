use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use dynosim_cli::commands::mods::handle_list_mods;
use dynosim_cli::commands::project::{
    handle_compare_command, handle_project_command, ProjectCommandArgs,
};
use dynosim_cli::output::OutputFormat;
use dynosim_lib::ModCatalog;

#[derive(Parser, Debug)]
#[command(author, version, about = "Vehicle build performance projection")]
struct Cli {
    /// Replace the built-in modification catalog with a CSV file.
    #[arg(long, value_name = "CSV")]
    catalog: Option<PathBuf>,

    /// Output format for results.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the performance of a modified build.
    Project(ProjectCommandArgs),
    /// Run both projection strategies on a build, side by side.
    Compare(ProjectCommandArgs),
    /// List the modifications available in the catalog.
    Mods,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;

    match cli.command {
        Command::Project(args) => handle_project_command(&catalog, &args, cli.format),
        Command::Compare(args) => handle_compare_command(&catalog, &args, cli.format),
        Command::Mods => handle_list_mods(&catalog),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ModCatalog> {
    match path {
        Some(path) => ModCatalog::from_path(path).with_context(|| {
            format!(
                "failed to load modification catalog from {}",
                path.display()
            )
        }),
        None => Ok(ModCatalog::builtin().clone()),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
