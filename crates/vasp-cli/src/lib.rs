//! # vasp-cli — Command-Line Tool for the VASP Directory
//!
//! Provides the `vasp` command-line interface over the sector form engine
//! and the directory's file formats.
//!
//! ## Subcommands
//!
//! - `vasp sectors` — list, show, dump or validate sector schemas.
//! - `vasp form` — render the sector-specific section as plain text.
//! - `vasp csv` — import a company sheet to JSON, export JSON to CSV.
//! - `vasp report` — summary report over a JSON company list.
//!
//! ```bash
//! vasp sectors validate registry.yaml
//! vasp form exchange-services custody-services --data details.json
//! vasp csv import companies.csv --out companies.json
//! vasp report companies.json
//! ```
//!
//! Every subcommand returns an exit code: 0 on success, 1 when the input
//! was read but failed validation. Operational errors (unreadable files,
//! malformed JSON) surface as `Err` and exit with 2.

pub mod form;
pub mod report;
pub mod sectors;
pub mod sheet;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use vasp_directory::NewCompany;
use vasp_sector::SectorRegistry;

/// The registry at `path`, or the built-in one.
pub fn load_registry(path: Option<&Path>) -> Result<SectorRegistry> {
    match path {
        Some(path) => {
            SectorRegistry::from_path(path)
                .with_context(|| format!("failed to load sector registry {}", path.display()))
        }
        None => Ok(SectorRegistry::builtin().clone()),
    }
}

/// Read a JSON array of company profiles.
pub fn read_companies(path: &Path) -> Result<Vec<NewCompany>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON array of companies", path.display()))
}

/// Write `contents` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, contents: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}
