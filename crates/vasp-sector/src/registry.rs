//! # Sector Schema Registry
//!
//! Immutable mapping from [`SectorId`] to [`SectorSchema`]. Lookups for
//! sectors without a schema return `None`; callers render nothing for them.
//!
//! ## Construction
//!
//! - [`SectorRegistry::builtin`] — the ten authored PVARA sectors.
//! - [`SectorRegistry::new`] — from schemas, checking every invariant below.
//! - [`SectorRegistry::from_yaml_str`] / [`SectorRegistry::from_path`] — from a
//!   registry document (`sectors: [...]`), then [`SectorRegistry::new`].
//!
//! ## Invariants
//!
//! - Sector ids are unique across the registry.
//! - Field keys are unique within a sector.
//! - `conditional_on` names another field of the same sector.
//! - `select` / `multi-select` declare at least one option, with no duplicates.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vasp_core::{FieldKey, SectorId};

use crate::builtin;
use crate::schema::SectorSchema;

// ─── Errors ──────────────────────────────────────────────────────────

/// A single broken invariant in a set of sector schemas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaViolation {
    #[error("sector {sector} is declared more than once")]
    DuplicateSector { sector: SectorId },

    #[error("sector {sector} declares field {field} more than once")]
    DuplicateField { sector: SectorId, field: FieldKey },

    #[error("field {sector}.{field} is conditional on {target}, which is not a field of {sector}")]
    UnknownConditional {
        sector: SectorId,
        field: FieldKey,
        target: FieldKey,
    },

    #[error("field {sector}.{field} is conditional on itself")]
    SelfConditional { sector: SectorId, field: FieldKey },

    #[error("field {sector}.{field} has no options")]
    MissingOptions { sector: SectorId, field: FieldKey },

    #[error("field {sector}.{field} lists option {option:?} more than once")]
    DuplicateOption {
        sector: SectorId,
        field: FieldKey,
        option: String,
    },
}

/// Errors building a registry.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// One or more schemas break registry invariants.
    #[error("{}", summarize(.violations))]
    Invalid { violations: Vec<SchemaViolation> },

    /// The registry document is not valid YAML or does not match the layout.
    #[error("failed to parse sector registry: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The registry file could not be read.
    #[error("failed to read sector registry at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn summarize(violations: &[SchemaViolation]) -> String {
    match violations.first() {
        Some(first) => format!("{} schema violation(s); first: {first}", violations.len()),
        None => "schema violations".to_string(),
    }
}

// ─── Document ────────────────────────────────────────────────────────

/// On-disk layout of a registry override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryDocument {
    pub sectors: Vec<SectorSchema>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// Immutable sector schema registry.
#[derive(Debug, Clone)]
pub struct SectorRegistry {
    /// Schemas in authored order.
    schemas: Vec<SectorSchema>,
    index: BTreeMap<SectorId, usize>,
}

impl SectorRegistry {
    /// Build a registry, rejecting schemas that break any invariant.
    pub fn new(schemas: Vec<SectorSchema>) -> Result<Self, SchemaError> {
        let violations = check_schemas(&schemas);
        if !violations.is_empty() {
            return Err(SchemaError::Invalid { violations });
        }
        let index = schemas
            .iter()
            .enumerate()
            .map(|(i, s)| (s.sector_id.clone(), i))
            .collect();
        Ok(Self { schemas, index })
    }

    /// The authored PVARA sector registry.
    pub fn builtin() -> &'static SectorRegistry {
        static BUILTIN: OnceLock<SectorRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let schemas = builtin::schemas();
            let index = schemas
                .iter()
                .enumerate()
                .map(|(i, s)| (s.sector_id.clone(), i))
                .collect();
            SectorRegistry { schemas, index }
        })
    }

    /// Parse and validate a registry document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SchemaError> {
        let doc: RegistryDocument = serde_yaml::from_str(yaml)?;
        Self::new(doc.sectors)
    }

    /// Read, parse and validate a registry document from disk.
    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let registry = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            sectors = registry.len(),
            "loaded sector registry"
        );
        Ok(registry)
    }

    /// Schema for `sector`, or `None` if the sector has no schema.
    pub fn lookup(&self, sector: &SectorId) -> Option<&SectorSchema> {
        self.index.get(sector).map(|&i| &self.schemas[i])
    }

    /// Whether a schema exists for `sector`.
    pub fn contains(&self, sector: &SectorId) -> bool {
        self.index.contains_key(sector)
    }

    /// All schemas in authored order.
    pub fn schemas(&self) -> &[SectorSchema] {
        &self.schemas
    }

    /// All sector ids in authored order.
    pub fn sector_ids(&self) -> impl Iterator<Item = &SectorId> {
        self.schemas.iter().map(|s| &s.sector_id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Serialize back into the registry document layout.
    pub fn to_yaml_string(&self) -> Result<String, SchemaError> {
        let doc = RegistryDocument {
            sectors: self.schemas.clone(),
        };
        Ok(serde_yaml::to_string(&doc)?)
    }
}

/// Check schemas against every registry invariant, collecting all violations.
pub fn check_schemas(schemas: &[SectorSchema]) -> Vec<SchemaViolation> {
    let mut violations = Vec::new();
    let mut seen_sectors = BTreeSet::new();

    for schema in schemas {
        let sector = &schema.sector_id;
        if !seen_sectors.insert(sector.clone()) {
            violations.push(SchemaViolation::DuplicateSector {
                sector: sector.clone(),
            });
        }

        let mut keys = BTreeSet::new();
        for field in &schema.fields {
            if !keys.insert(field.key.clone()) {
                violations.push(SchemaViolation::DuplicateField {
                    sector: sector.clone(),
                    field: field.key.clone(),
                });
            }

            if let Some(options) = field.kind.options() {
                if options.is_empty() {
                    violations.push(SchemaViolation::MissingOptions {
                        sector: sector.clone(),
                        field: field.key.clone(),
                    });
                }
                let mut seen = BTreeSet::new();
                for option in options {
                    if !seen.insert(option.as_str()) {
                        violations.push(SchemaViolation::DuplicateOption {
                            sector: sector.clone(),
                            field: field.key.clone(),
                            option: option.clone(),
                        });
                    }
                }
            }
        }

        for field in &schema.fields {
            let Some(target) = &field.conditional_on else {
                continue;
            };
            if target == &field.key {
                violations.push(SchemaViolation::SelfConditional {
                    sector: sector.clone(),
                    field: field.key.clone(),
                });
            } else if !keys.contains(target) {
                violations.push(SchemaViolation::UnknownConditional {
                    sector: sector.clone(),
                    field: field.key.clone(),
                    target: target.clone(),
                });
            }
        }
    }

    violations
}
