//! # vasp-directory — The VASP Company Directory
//!
//! Company records, grouped by the regulatory sectors they operate in:
//!
//! - [`company`]: the record, its profile, licence status and AML rating.
//! - [`directory`]: in-memory store keyed by slug, with filtered listing.
//! - [`csv_io`]: company and sector-details sheets, and bulk import.
//! - [`report`]: headline counts and per-sector breakdown.
//!
//! Sector details inside a company are the [`vasp_sector::PerSectorData`]
//! the sector form produces. They are sanitised on every write against the
//! company's assigned sectors and the registry's schemas.

pub mod company;
pub mod csv_io;
pub mod directory;
pub mod report;

pub use company::{AmlRating, Company, CompanyError, LicenseStatus, NewCompany};
pub use csv_io::{CsvError, ImportOptions, ImportReport, RowError};
pub use directory::{CompanyFilter, Directory, DirectoryError};
pub use report::DirectoryReport;
