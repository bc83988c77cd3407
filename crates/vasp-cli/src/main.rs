//! # vasp CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vasp_cli::form::{run_form, FormArgs};
use vasp_cli::report::{run_report, ReportArgs};
use vasp_cli::sectors::{run_sectors, SectorsArgs};
use vasp_cli::sheet::{run_csv, CsvArgs};

/// Pakistan VASP directory toolkit.
///
/// Inspects and validates sector schemas, renders the sector-specific form,
/// converts company sheets, and builds directory reports.
#[derive(Parser, Debug)]
#[command(name = "vasp", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// YAML sector registry to use instead of the built-in one.
    #[arg(long, global = true, value_name = "FILE")]
    registry: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List, show, dump, or validate sector schemas.
    Sectors(SectorsArgs),

    /// Render the sector-specific form section as text.
    Form(FormArgs),

    /// Import or export company sheets.
    Csv(CsvArgs),

    /// Summary report over a JSON company list.
    Report(ReportArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = vasp_cli::load_registry(cli.registry.as_deref()).and_then(|registry| {
        match &cli.command {
            Commands::Sectors(args) => run_sectors(args, &registry),
            Commands::Form(args) => run_form(args, &registry),
            Commands::Csv(args) => run_csv(args, &registry),
            Commands::Report(args) => run_report(args, &registry),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
