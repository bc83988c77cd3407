//! # Sector Schema Types
//!
//! A [`SectorSchema`] is the authored description of the extra fields a
//! regulatory sector requires. Each [`FieldDescriptor`] carries a closed
//! [`FieldKind`]: one variant per control type, each holding only the
//! payload that control needs. Renderers match on it exhaustively.
//!
//! ## YAML Layout
//!
//! ```yaml
//! sector_id: custody-services
//! title: Custody Services Details
//! icon: shield
//! fields:
//!   - key: insurance_coverage
//!     label: Insurance Coverage
//!     type: boolean
//!   - key: insurance_amount_pkr
//!     label: Insurance Coverage Amount (PKR)
//!     type: number
//!     conditional_on: insurance_coverage
//! ```

use serde::{Deserialize, Serialize};

use vasp_core::{FieldKey, FieldValue, SectorId};

fn default_min() -> Option<f64> {
    Some(0.0)
}

fn default_rows() -> u8 {
    3
}

/// Control type of a field, with the payload relevant to that control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FieldKind {
    /// Single-line free text.
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Numeric input. Empty input is stored as `null`.
    Number {
        /// Increment for the spinner; `1` when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        step: Option<f64>,
        /// Floor passed to the control. Not enforced on stored values.
        #[serde(default = "default_min")]
        min: Option<f64>,
    },
    /// Exactly one of `options`, or nothing.
    Select { options: Vec<String> },
    /// Any subset of `options`, kept in the order they were checked.
    MultiSelect { options: Vec<String> },
    /// A growable list of free-form entries.
    MultiInput {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    /// Yes/no checkbox. Absent reads as unchecked.
    Boolean,
    /// Multi-line free text.
    #[serde(rename = "textarea")]
    TextArea {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        #[serde(default = "default_rows")]
        rows: u8,
    },
}

impl FieldKind {
    /// Wire name of the kind, as used in the YAML `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Number { .. } => "number",
            Self::Select { .. } => "select",
            Self::MultiSelect { .. } => "multi-select",
            Self::MultiInput { .. } => "multi-input",
            Self::Boolean => "boolean",
            Self::TextArea { .. } => "textarea",
        }
    }

    /// Declared options for `select` and `multi-select`.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            Self::Select { options } | Self::MultiSelect { options } => Some(options),
            _ => None,
        }
    }

    /// Value a field of this kind holds before anyone has touched it.
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Text { .. } | Self::TextArea { .. } | Self::Select { .. } => {
                FieldValue::Text(String::new())
            }
            Self::Number { .. } => FieldValue::Null,
            Self::MultiSelect { .. } | Self::MultiInput { .. } => FieldValue::List(Vec::new()),
            Self::Boolean => FieldValue::Bool(false),
        }
    }
}

/// Static definition of one input within a sector schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique within the owning sector.
    pub key: FieldKey,
    /// Human-readable label.
    pub label: String,
    /// Control type and its payload.
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Help text shown under the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sibling field (same sector) that must be truthy for this one to show.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_on: Option<FieldKey>,
}

impl FieldDescriptor {
    /// Create a descriptor with no description and no condition.
    pub fn new(key: FieldKey, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            description: None,
            conditional_on: None,
        }
    }

    /// Attach help text.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Make this field conditional on a sibling.
    pub fn conditional_on(mut self, controller: FieldKey) -> Self {
        self.conditional_on = Some(controller);
        self
    }
}

/// Icon shown next to a sector header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectorIcon {
    Briefcase,
    TrendingUp,
    Shield,
    Globe,
    DollarSign,
    Clock,
    Coins,
    Building,
    /// Used by the empty-state placeholder.
    Database,
}

impl SectorIcon {
    /// Stable name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Briefcase => "briefcase",
            Self::TrendingUp => "trending-up",
            Self::Shield => "shield",
            Self::Globe => "globe",
            Self::DollarSign => "dollar-sign",
            Self::Clock => "clock",
            Self::Coins => "coins",
            Self::Building => "building",
            Self::Database => "database",
        }
    }
}

impl std::fmt::Display for SectorIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The field schema of one regulatory sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorSchema {
    pub sector_id: SectorId,
    /// Header title, e.g. "Exchange Services Details".
    pub title: String,
    pub icon: SectorIcon,
    /// Fields in display order.
    pub fields: Vec<FieldDescriptor>,
}

impl SectorSchema {
    /// Find a field by key.
    pub fn field(&self, key: &FieldKey) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| &f.key == key)
    }

    /// Whether the schema declares `key`.
    pub fn has_field(&self, key: &FieldKey) -> bool {
        self.field(key).is_some()
    }
}
