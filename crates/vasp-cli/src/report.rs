//! # Report Subcommand
//!
//! Prints the directory summary report for a JSON array of companies.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vasp_directory::DirectoryReport;
use vasp_sector::SectorRegistry;

/// Arguments for the `vasp report` subcommand.
#[derive(Args, Debug)]
pub struct ReportArgs {
    /// JSON array of company profiles.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the report; stdout when omitted.
    #[arg(long, value_name = "FILE")]
    pub out: Option<PathBuf>,
}

/// Execute the report subcommand.
pub fn run_report(args: &ReportArgs, registry: &SectorRegistry) -> Result<u8> {
    let companies = crate::read_companies(&args.input)?;
    let report = DirectoryReport::build(registry, &companies);
    tracing::info!(
        companies = report.summary.total_companies,
        sectors = report.by_sector.len(),
        "report built"
    );
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    crate::write_output(args.out.as_deref(), &format!("{json}\n"))?;
    Ok(0)
}
