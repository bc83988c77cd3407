//! # API Route Modules
//!
//! - `sectors` — read-only sector schema registry.
//! - `companies` — company directory CRUD with filtered listing.
//! - `sheets` — company and sector-details CSV export, bulk CSV import.
//! - `forms` — server-side sector form sessions: selection, expand/collapse,
//!   field edits against a draft, and save back to the company.
//! - `reports` — summary report for the regulator.

pub mod companies;
pub mod forms;
pub mod reports;
pub mod sectors;
pub mod sheets;
