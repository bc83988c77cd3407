//! # Error Types
//!
//! Validation failures for domain primitives. Subsystem crates define their
//! own `thiserror` enums and wrap this one where a primitive is parsed.

use thiserror::Error;

/// A domain primitive failed format validation at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Sector identifiers are lowercase slugs (`exchange-services`).
    #[error("invalid sector id {0:?}: expected a lowercase slug of letters, digits and '-'")]
    InvalidSectorId(String),

    /// Field keys are snake_case identifiers (`daily_trading_volume_pkr`).
    #[error("invalid field key {0:?}: expected lowercase letters, digits and '_'")]
    InvalidFieldKey(String),

    /// Company slugs follow the sector slug rules.
    #[error("invalid company slug {0:?}")]
    InvalidCompanySlug(String),
}
