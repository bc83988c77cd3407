//! # vasp-core — Foundational Types for the VASP Directory
//!
//! Every other crate in the workspace depends on `vasp-core`; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `SectorId`, `FieldKey`, `CompanyId`
//!    and `CompanySlug` are distinct types with validated constructors. A field
//!    key can never be passed where a sector id is expected.
//!
//! 2. **One value type for dynamic fields.** [`FieldValue`] is the closed set of
//!    shapes a sector-specific field can hold. Serialized untagged, so stored
//!    records read as plain JSON (`"Hybrid"`, `42.5`, `null`, `["a", "b"]`).
//!
//! 3. **Truthiness is defined once.** Conditional fields consult
//!    [`FieldValue::is_truthy`]; no other crate reimplements the rule.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vasp-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod value;

pub use error::ValidationError;
pub use identity::{CompanyId, CompanySlug, FieldKey, SectorId};
pub use value::FieldValue;
