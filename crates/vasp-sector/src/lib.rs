//! # vasp-sector — Sector-Specific Form Engine
//!
//! Each regulatory sector a VASP is licensed for carries its own set of
//! extra detail fields. This crate describes those fields and drives the
//! form that collects them:
//!
//! - **Registry** ([`registry`]): immutable `SectorId -> SectorSchema`
//!   mapping. The ten PVARA sectors ship built in; a YAML document can
//!   replace them after passing the same invariant checks.
//!
//! - **Renderer** ([`render`]): one field plus the sector's current values
//!   becomes a [`FieldView`]; a [`FieldEdit`] on that view becomes a
//!   [`FieldChange`]. Conditional fields are re-evaluated on every call.
//!
//! - **Section controller** ([`section`]): walks the selected sectors,
//!   keeps expand/collapse state, and routes edits to the caller.
//!
//! ## Data Ownership
//!
//! The engine never mutates the caller's [`PerSectorData`]. Every edit is
//! reported as a [`FieldChange`]; the caller merges it with
//! [`PerSectorData::apply`] and passes the new value back on the next render.

mod builtin;
pub mod data;
pub mod registry;
pub mod render;
pub mod schema;
pub mod section;

pub use data::{FieldChange, PerSectorData, SectorValues};
pub use registry::{check_schemas, RegistryDocument, SchemaError, SchemaViolation, SectorRegistry};
pub use render::{Control, EditError, FieldEdit, FieldRenderer, FieldView};
pub use schema::{FieldDescriptor, FieldKind, SectorIcon, SectorSchema};
pub use section::{SectionController, SectionState, SectionView, SectionsView};
