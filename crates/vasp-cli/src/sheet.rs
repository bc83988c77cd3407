//! # CSV Subcommand
//!
//! Converts between the directory's company sheet and a JSON array of
//! company profiles.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use vasp_core::SectorId;
use vasp_directory::csv_io::{companies_to_csv, import_companies, sector_details_to_csv};
use vasp_directory::{ImportOptions, ImportReport};
use vasp_sector::SectorRegistry;

/// Arguments for the `vasp csv` subcommand.
#[derive(Args, Debug)]
pub struct CsvArgs {
    #[command(subcommand)]
    pub command: CsvCommand,
}

#[derive(Subcommand, Debug)]
pub enum CsvCommand {
    /// Parse a company sheet and write the valid rows as JSON.
    Import {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Where to write the JSON array; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Sector assigned to rows without one.
        #[arg(long, value_name = "SECTOR")]
        default_sector: Option<String>,

        /// Row limit; the sheet is refused when it has more rows.
        #[arg(long, default_value_t = vasp_directory::csv_io::MAX_IMPORT_ROWS)]
        max_rows: usize,
    },

    /// Write a JSON array of companies as a CSV sheet.
    Export {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Write the sector-details sheet instead of the company sheet.
        #[arg(long)]
        sector_details: bool,

        /// Where to write the CSV; stdout when omitted.
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Execute the csv subcommand.
///
/// `import` returns 1 when any row was rejected; the valid rows are still
/// written.
pub fn run_csv(args: &CsvArgs, registry: &SectorRegistry) -> Result<u8> {
    match &args.command {
        CsvCommand::Import {
            input,
            out,
            default_sector,
            max_rows,
        } => {
            let mut options = ImportOptions {
                max_rows: *max_rows,
                ..ImportOptions::default()
            };
            if let Some(sector) = default_sector {
                let sector = SectorId::new(sector.as_str())
                    .with_context(|| format!("invalid default sector {sector:?}"))?;
                options.default_sectors = vec![sector];
            }

            let file = File::open(input)
                .with_context(|| format!("failed to open {}", input.display()))?;
            let report = import_companies(file, registry, &options)
                .with_context(|| format!("failed to import {}", input.display()))?;

            let json = serde_json::to_string_pretty(&report.imported)
                .context("failed to serialize companies")?;
            crate::write_output(out.as_deref(), &format!("{json}\n"))?;
            eprint!("{}", import_summary(&report));
            Ok(if report.errors.is_empty() { 0 } else { 1 })
        }
        CsvCommand::Export {
            input,
            sector_details,
            out,
        } => {
            let companies = crate::read_companies(input)?;
            let csv = if *sector_details {
                sector_details_to_csv(registry, &companies)?
            } else {
                companies_to_csv(&companies)?
            };
            crate::write_output(out.as_deref(), &csv)?;
            Ok(0)
        }
    }
}

/// Human-readable import outcome, one line per rejected row.
pub fn import_summary(report: &ImportReport) -> String {
    let mut summary = format!(
        "Imported {} compan{}, rejected {} row(s)\n",
        report.imported.len(),
        if report.imported.len() == 1 { "y" } else { "ies" },
        report.errors.len()
    );
    for error in &report.errors {
        summary.push_str(&format!("  Row {}: {}\n", error.row, error.message));
    }
    summary
}
