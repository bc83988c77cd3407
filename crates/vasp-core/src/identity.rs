//! # Identity Newtypes
//!
//! Sector ids, field keys and company identifiers. String-based identifiers
//! validate their format at construction and on deserialization, so a value
//! of one of these types is always well formed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

fn is_slug(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with('-')
        && !s.ends_with('-')
        && !s.contains("--")
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

// ---------------------------------------------------------------------------
// SectorId
// ---------------------------------------------------------------------------

/// Regulatory sector identifier, e.g. `exchange-services`.
///
/// # Validation
///
/// - Non-empty, lowercase ASCII letters, digits and `-`
/// - No leading, trailing or doubled `-`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SectorId(String);

impl SectorId {
    /// Create a sector id, validating the slug format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidSectorId`] for anything that is not a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_slug(&s) {
            return Err(ValidationError::InvalidSectorId(s));
        }
        Ok(Self(s))
    }

    /// Access the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SectorId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SectorId> for String {
    fn from(id: SectorId) -> Self {
        id.0
    }
}

impl std::str::FromStr for SectorId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for SectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for SectorId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// FieldKey
// ---------------------------------------------------------------------------

/// Key of one field within a sector schema, e.g. `insurance_amount_pkr`.
///
/// Unique within its sector only; the same key may appear in two sectors
/// (both token sectors carry `reserve_audit_frequency`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldKey(String);

impl FieldKey {
    /// Create a field key, validating the snake_case format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidFieldKey`] if the key is empty, starts
    /// with a digit, or contains anything but `a-z`, `0-9` and `_`.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let valid = s
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && s.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(ValidationError::InvalidFieldKey(s));
        }
        Ok(Self(s))
    }

    /// Access the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FieldKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FieldKey> for String {
    fn from(key: FieldKey) -> Self {
        key.0
    }
}

impl std::str::FromStr for FieldKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for FieldKey {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

// ---------------------------------------------------------------------------
// Company identifiers
// ---------------------------------------------------------------------------

/// Unique identifier for a company record in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(Uuid);

impl CompanyId {
    /// Create a new random company identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a company identifier from an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CompanyId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL slug of a company, derived from its name (`Binance Pakistan` → `binance-pakistan`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CompanySlug(String);

impl CompanySlug {
    /// Wrap an already-formatted slug.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCompanySlug`] if the value is not a slug.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_slug(&s) {
            return Err(ValidationError::InvalidCompanySlug(s));
        }
        Ok(Self(s))
    }

    /// Derive a slug from a display name.
    ///
    /// Lowercases, collapses every run of non-alphanumeric characters into a
    /// single `-`, and trims `-` from both ends.
    ///
    /// # Errors
    ///
    /// Fails when the name contains no ASCII letters or digits at all.
    pub fn from_name(name: &str) -> Result<Self, ValidationError> {
        let mut slug = String::with_capacity(name.len());
        for c in name.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            return Err(ValidationError::InvalidCompanySlug(name.to_string()));
        }
        Ok(Self(slug))
    }

    /// Access the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CompanySlug {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CompanySlug> for String {
    fn from(slug: CompanySlug) -> Self {
        slug.0
    }
}

impl std::fmt::Display for CompanySlug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
