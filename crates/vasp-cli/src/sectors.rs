//! # Sectors Subcommand
//!
//! Inspect the sector registry and validate registry documents.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use vasp_core::SectorId;
use vasp_sector::{SchemaError, SectorRegistry};

/// Arguments for the `vasp sectors` subcommand.
#[derive(Args, Debug)]
pub struct SectorsArgs {
    #[command(subcommand)]
    pub command: SectorsCommand,
}

#[derive(Subcommand, Debug)]
pub enum SectorsCommand {
    /// Print the id and title of every sector.
    List,

    /// Print one sector schema as JSON.
    Show {
        /// Sector id, e.g. `custody-services`.
        sector: String,
    },

    /// Print the whole registry as a YAML document.
    Dump,

    /// Check a YAML registry document against the schema invariants.
    Validate {
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

/// Execute the sectors subcommand.
///
/// Returns exit code: 0 on success, 1 for an unknown sector or an invalid
/// registry document.
pub fn run_sectors(args: &SectorsArgs, registry: &SectorRegistry) -> Result<u8> {
    match &args.command {
        SectorsCommand::List => {
            print!("{}", list_text(registry));
            Ok(0)
        }
        SectorsCommand::Show { sector } => {
            let schema = SectorId::new(sector.as_str())
                .ok()
                .and_then(|id| registry.lookup(&id));
            match schema {
                Some(schema) => {
                    let json = serde_json::to_string_pretty(schema)
                        .context("failed to serialize schema")?;
                    println!("{json}");
                    Ok(0)
                }
                None => {
                    println!("Unknown sector: {sector}");
                    Ok(1)
                }
            }
        }
        SectorsCommand::Dump => {
            print!("{}", registry.to_yaml_string()?);
            Ok(0)
        }
        SectorsCommand::Validate { path } => {
            let (code, report) = validate_report(SectorRegistry::from_path(path))?;
            println!("{}: {report}", path.display());
            Ok(code)
        }
    }
}

/// One `id<TAB>title` line per sector, in registry order.
pub fn list_text(registry: &SectorRegistry) -> String {
    registry
        .schemas()
        .iter()
        .map(|s| format!("{}\t{}\n", s.sector_id, s.title))
        .collect()
}

/// Exit code and report text for a registry load. Invariant violations and
/// YAML errors are validation failures; I/O errors are operational.
fn validate_report(loaded: Result<SectorRegistry, SchemaError>) -> Result<(u8, String)> {
    match loaded {
        Ok(registry) => Ok((0, format!("OK ({} sectors)", registry.len()))),
        Err(SchemaError::Invalid { violations }) => {
            let mut report = format!("{} violation(s)", violations.len());
            for violation in &violations {
                report.push_str(&format!("\n  FAIL: {violation}"));
            }
            Ok((1, report))
        }
        Err(err @ SchemaError::Yaml(_)) => Ok((1, format!("FAIL: {err}"))),
        Err(err) => Err(err.into()),
    }
}
