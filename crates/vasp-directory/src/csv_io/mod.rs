//! # CSV Interchange
//!
//! The directory's spreadsheet formats:
//!
//! - **Company sheet**: one row per company, columns [`COMPANY_HEADERS`].
//!   Written by [`write_companies`], read back by [`import_companies`].
//! - **Sector-details sheet**: one row per stored sector field, columns
//!   [`SECTOR_DETAIL_HEADERS`]. Export only.
//!
//! Quoting follows RFC 4180 via the `csv` crate. Lists are joined with `"; "`.

mod export;
mod import;

use thiserror::Error;

pub use export::{companies_to_csv, sector_details_to_csv, write_companies, write_sector_details};
pub use import::{import_companies, ImportOptions, ImportReport, RowError, MAX_IMPORT_ROWS};

/// Columns of the company sheet, in order.
pub const COMPANY_HEADERS: [&str; 16] = [
    "Company Name",
    "Sectors",
    "Year Founded",
    "Founder/CEO Name",
    "Headquarters Location",
    "Pakistan Operations",
    "Website",
    "Contact Email",
    "Number of Employees",
    "Total Funding (PKR)",
    "Key Partnerships",
    "Company Description",
    "SECP Registration Number",
    "PVARA License Number",
    "License Status",
    "AML/CFT Compliance Rating",
];

/// Columns of the sector-details sheet.
pub const SECTOR_DETAIL_HEADERS: [&str; 4] = ["Company Name", "Sector", "Field", "Value"];

/// Separator for list cells.
pub const LIST_SEPARATOR: &str = "; ";

/// Errors that abort a whole CSV read or write.
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("missing required column {0:?}")]
    MissingColumn(&'static str),

    /// Reading stops at the first row past the limit.
    #[error("CSV has more than {max} company rows; at most {max} can be imported at once")]
    TooManyRows { max: usize },
}
