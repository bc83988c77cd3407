//! # Per-Sector Data
//!
//! The caller-owned store of sector detail values. Both types are plain
//! values: the engine reads them and asks for new versions through
//! [`PerSectorData::apply`], never mutating the caller's copy.
//!
//! Deserialization skips what it cannot use instead of failing: entries
//! whose key is not a valid sector id or field key, and sectors whose
//! value is not an object, are dropped with a warning.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use vasp_core::{FieldKey, FieldValue, SectorId};

use crate::registry::SectorRegistry;

static EMPTY: SectorValues = SectorValues(BTreeMap::new());

/// Field values of one sector, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SectorValues(BTreeMap<FieldKey, FieldValue>);

impl SectorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared empty value set, used for sectors with no data yet.
    pub fn empty() -> &'static SectorValues {
        &EMPTY
    }

    pub fn get(&self, key: &FieldKey) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: FieldKey, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key, value.into());
        self
    }

    pub fn insert(&mut self, key: FieldKey, value: FieldValue) {
        self.0.insert(key, value);
    }

    /// Truthiness of `key`; a missing key is falsy.
    pub fn is_truthy(&self, key: &FieldKey) -> bool {
        self.0.get(key).is_some_and(FieldValue::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de> Deserialize<'de> for SectorValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, FieldValue>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| match FieldKey::new(key) {
                Ok(key) => Some((key, value)),
                Err(err) => {
                    tracing::warn!(%err, "dropping stored value with invalid field key");
                    None
                }
            })
            .collect())
    }
}

/// A stored sector entry: field values, or anything else.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSector {
    Values(SectorValues),
    Other(IgnoredAny),
}

impl FromIterator<(FieldKey, FieldValue)> for SectorValues {
    fn from_iter<I: IntoIterator<Item = (FieldKey, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single field update emitted by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldChange {
    pub sector: SectorId,
    pub field: FieldKey,
    pub value: FieldValue,
}

/// Sector detail values for every sector of one company.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PerSectorData(BTreeMap<SectorId, SectorValues>);

impl PerSectorData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `sector`, if any were ever recorded.
    pub fn sector(&self, sector: &SectorId) -> Option<&SectorValues> {
        self.0.get(sector)
    }

    /// Values for `sector`, or the shared empty set.
    pub fn values_or_empty(&self, sector: &SectorId) -> &SectorValues {
        self.0.get(sector).unwrap_or(SectorValues::empty())
    }

    /// Builder-style insert of a whole sector.
    pub fn with_sector(mut self, sector: SectorId, values: SectorValues) -> Self {
        self.0.insert(sector, values);
        self
    }

    /// A new value with `change` merged in. `self` is left untouched; every
    /// other sector and field carries over as-is.
    pub fn apply(&self, change: &FieldChange) -> PerSectorData {
        let mut next = self.clone();
        next.0
            .entry(change.sector.clone())
            .or_default()
            .insert(change.field.clone(), change.value.clone());
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SectorId, &SectorValues)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Drop values the company cannot own: sectors outside `assigned`,
    /// sectors without a schema, and keys the sector's schema does not declare.
    pub fn sanitized(&self, registry: &SectorRegistry, assigned: &[SectorId]) -> PerSectorData {
        let mut kept = BTreeMap::new();
        for (sector, values) in &self.0 {
            if !assigned.contains(sector) {
                tracing::debug!(%sector, "dropping details for unassigned sector");
                continue;
            }
            let Some(schema) = registry.lookup(sector) else {
                tracing::debug!(%sector, "dropping details for sector without schema");
                continue;
            };
            let values: SectorValues = values
                .iter()
                .filter(|(key, _)| schema.has_field(key))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            if !values.is_empty() {
                kept.insert(sector.clone(), values);
            }
        }
        PerSectorData(kept)
    }
}

impl<'de> Deserialize<'de> for PerSectorData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, StoredSector>::deserialize(deserializer)?;
        let mut data = BTreeMap::new();
        for (sector, stored) in raw {
            let sector = match SectorId::new(sector) {
                Ok(sector) => sector,
                Err(err) => {
                    tracing::warn!(%err, "dropping sector details with invalid sector id");
                    continue;
                }
            };
            match stored {
                StoredSector::Values(values) => {
                    data.insert(sector, values);
                }
                StoredSector::Other(IgnoredAny) => {
                    tracing::warn!(%sector, "dropping sector details that are not an object");
                }
            }
        }
        Ok(Self(data))
    }
}

impl FromIterator<(SectorId, SectorValues)> for PerSectorData {
    fn from_iter<I: IntoIterator<Item = (SectorId, SectorValues)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
