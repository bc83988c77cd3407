//! # Field Renderer
//!
//! Turns one [`FieldDescriptor`] plus the current values of its sector into a
//! [`FieldView`], and turns a [`FieldEdit`] on that view back into a
//! [`FieldChange`].
//!
//! The renderer is stateless. Visibility of conditional fields is decided on
//! every call from the values passed in, so toggling a controlling field
//! shows or hides its dependents on the next render without touching any
//! stored value.
//!
//! Values of the wrong shape for their field kind are read as the kind's
//! default. Nothing here validates business rules: a stored option that is no
//! longer offered simply renders with nothing selected.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use vasp_core::{FieldKey, FieldValue, SectorId};

use crate::data::{FieldChange, SectorValues};
use crate::schema::{FieldDescriptor, FieldKind};

/// Label of the leading empty entry of every select control.
pub const SELECT_PLACEHOLDER: &str = "Select an option";

/// Caption next to a boolean checkbox.
pub const BOOLEAN_CAPTION: &str = "Yes";

// ─── View model ──────────────────────────────────────────────────────

/// One entry of a select control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// One checkbox of a multi-select checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub label: String,
    pub checked: bool,
}

/// The input control for a field, with its current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "snake_case")]
pub enum Control {
    TextInput {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
    NumberInput {
        /// `None` renders as an empty input.
        value: Option<f64>,
        step: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
    },
    Select {
        selected: String,
        /// Starts with the empty placeholder entry.
        options: Vec<SelectOption>,
    },
    Checklist { items: Vec<ChecklistItem> },
    EntryList {
        entries: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        add_label: String,
    },
    Checkbox { checked: bool, caption: String },
    TextArea {
        value: String,
        rows: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

/// A rendered field: label block plus control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    pub key: FieldKey,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Wire name of the field kind.
    pub kind: String,
    #[serde(flatten)]
    pub control: Control,
}

// ─── Edits ───────────────────────────────────────────────────────────

/// A user action on a rendered control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FieldEdit {
    /// Replace the text of a text or textarea field.
    SetText { value: String },
    /// Raw contents of a number input. Blank clears the field.
    SetNumber { input: String },
    /// Pick a select option; `""` picks the placeholder.
    Choose { option: String },
    /// Check or uncheck one multi-select option.
    ToggleOption { option: String, checked: bool },
    /// Add an empty entry to a multi-input list.
    AppendEntry,
    EditEntry { index: usize, value: String },
    RemoveEntry { index: usize },
    /// Set a boolean checkbox.
    SetChecked { checked: bool },
}

impl FieldEdit {
    /// Stable name of the edit, matching the serialized `op` tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetText { .. } => "set_text",
            Self::SetNumber { .. } => "set_number",
            Self::Choose { .. } => "choose",
            Self::ToggleOption { .. } => "toggle_option",
            Self::AppendEntry => "append_entry",
            Self::EditEntry { .. } => "edit_entry",
            Self::RemoveEntry { .. } => "remove_entry",
            Self::SetChecked { .. } => "set_checked",
        }
    }
}

/// Reasons an edit cannot be turned into a change.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("sector {sector} has no schema")]
    UnknownSector { sector: SectorId },

    #[error("sector {sector} has no field {field}")]
    UnknownField { sector: SectorId, field: FieldKey },

    #[error("field {sector}.{field} is hidden until {controller} is set")]
    HiddenField {
        sector: SectorId,
        field: FieldKey,
        controller: FieldKey,
    },

    #[error("cannot apply {edit} to {kind} field {field}")]
    KindMismatch {
        field: FieldKey,
        kind: &'static str,
        edit: &'static str,
    },

    #[error("{option:?} is not an option of field {field}")]
    OptionNotOffered { field: FieldKey, option: String },

    #[error("entry {index} of field {field} does not exist (len {len})")]
    IndexOutOfRange {
        field: FieldKey,
        index: usize,
        len: usize,
    },

    #[error("{input:?} is not a number (field {field})")]
    InvalidNumber { field: FieldKey, input: String },
}

// ─── Renderer ────────────────────────────────────────────────────────

/// Renders the fields of one sector against that sector's current values.
#[derive(Debug, Clone, Copy)]
pub struct FieldRenderer<'a> {
    sector: &'a SectorId,
    values: &'a SectorValues,
}

impl<'a> FieldRenderer<'a> {
    pub fn new(sector: &'a SectorId, values: &'a SectorValues) -> Self {
        Self { sector, values }
    }

    /// Whether `field` is shown: unconditional, or its controller is truthy.
    ///
    /// Only the immediate controller is consulted. A controller that is itself
    /// hidden still counts if its stored value is truthy.
    pub fn is_visible(&self, field: &FieldDescriptor) -> bool {
        match &field.conditional_on {
            Some(controller) => self.values.is_truthy(controller),
            None => true,
        }
    }

    /// The view for `field`, or `None` when its condition is not met.
    pub fn render(&self, field: &FieldDescriptor) -> Option<FieldView> {
        if !self.is_visible(field) {
            return None;
        }
        let current = self.values.get(&field.key);
        Some(FieldView {
            key: field.key.clone(),
            label: field.label.clone(),
            description: field.description.clone(),
            kind: field.kind.type_name().to_string(),
            control: control_for(field, current),
        })
    }

    /// Compute the change produced by `edit` on `field`.
    pub fn edit(&self, field: &FieldDescriptor, edit: FieldEdit) -> Result<FieldChange, EditError> {
        if let Some(controller) = &field.conditional_on {
            if !self.values.is_truthy(controller) {
                return Err(EditError::HiddenField {
                    sector: self.sector.clone(),
                    field: field.key.clone(),
                    controller: controller.clone(),
                });
            }
        }
        let current = self.values.get(&field.key);
        let value = next_value(field, current, edit)?;
        Ok(FieldChange {
            sector: self.sector.clone(),
            field: field.key.clone(),
            value,
        })
    }
}

fn current_text(current: Option<&FieldValue>) -> String {
    current
        .and_then(FieldValue::as_text)
        .unwrap_or_default()
        .to_string()
}

fn current_list(current: Option<&FieldValue>) -> Vec<String> {
    current
        .and_then(FieldValue::as_list)
        .map(<[String]>::to_vec)
        .unwrap_or_default()
}

/// `Add <last word of label>`.
fn add_label(label: &str) -> String {
    let last = label.split(' ').last().unwrap_or(label);
    format!("Add {last}")
}

fn control_for(field: &FieldDescriptor, current: Option<&FieldValue>) -> Control {
    match &field.kind {
        FieldKind::Text { placeholder } => Control::TextInput {
            value: current_text(current),
            placeholder: placeholder.clone(),
        },
        FieldKind::Number { step, min } => Control::NumberInput {
            value: current.and_then(FieldValue::as_number),
            step: step.unwrap_or(1.0),
            min: *min,
        },
        FieldKind::Select { options } => {
            let selected = current_text(current);
            let mut entries = Vec::with_capacity(options.len() + 1);
            entries.push(SelectOption {
                value: String::new(),
                label: SELECT_PLACEHOLDER.to_string(),
                selected: selected.is_empty(),
            });
            entries.extend(options.iter().map(|option| SelectOption {
                value: option.clone(),
                label: option.clone(),
                selected: *option == selected,
            }));
            Control::Select {
                selected,
                options: entries,
            }
        }
        FieldKind::MultiSelect { options } => {
            let chosen = current_list(current);
            Control::Checklist {
                items: options
                    .iter()
                    .map(|option| ChecklistItem {
                        label: option.clone(),
                        checked: chosen.contains(option),
                    })
                    .collect(),
            }
        }
        FieldKind::MultiInput { placeholder } => Control::EntryList {
            entries: current_list(current),
            placeholder: placeholder.clone(),
            add_label: add_label(&field.label),
        },
        FieldKind::Boolean => Control::Checkbox {
            checked: current.and_then(FieldValue::as_bool).unwrap_or(false),
            caption: BOOLEAN_CAPTION.to_string(),
        },
        FieldKind::TextArea { placeholder, rows } => Control::TextArea {
            value: current_text(current),
            rows: *rows,
            placeholder: placeholder.clone(),
        },
    }
}

fn next_value(
    field: &FieldDescriptor,
    current: Option<&FieldValue>,
    edit: FieldEdit,
) -> Result<FieldValue, EditError> {
    let key = &field.key;
    match (&field.kind, edit) {
        (FieldKind::Text { .. } | FieldKind::TextArea { .. }, FieldEdit::SetText { value }) => {
            Ok(FieldValue::Text(value))
        }

        (FieldKind::Number { .. }, FieldEdit::SetNumber { input }) => parse_number(key, &input),

        (FieldKind::Select { options }, FieldEdit::Choose { option }) => {
            if !option.is_empty() && !options.contains(&option) {
                return Err(EditError::OptionNotOffered {
                    field: key.clone(),
                    option,
                });
            }
            Ok(FieldValue::Text(option))
        }

        (FieldKind::MultiSelect { options }, FieldEdit::ToggleOption { option, checked }) => {
            if !options.contains(&option) {
                return Err(EditError::OptionNotOffered {
                    field: key.clone(),
                    option,
                });
            }
            let mut chosen = current_list(current);
            if checked {
                if !chosen.contains(&option) {
                    chosen.push(option);
                }
            } else {
                chosen.retain(|v| *v != option);
            }
            Ok(FieldValue::List(chosen))
        }

        (FieldKind::MultiInput { .. }, FieldEdit::AppendEntry) => {
            let mut entries = current_list(current);
            entries.push(String::new());
            Ok(FieldValue::List(entries))
        }

        (FieldKind::MultiInput { .. }, FieldEdit::EditEntry { index, value }) => {
            let mut entries = current_list(current);
            let len = entries.len();
            let slot = entries.get_mut(index).ok_or(EditError::IndexOutOfRange {
                field: key.clone(),
                index,
                len,
            })?;
            *slot = value;
            Ok(FieldValue::List(entries))
        }

        (FieldKind::MultiInput { .. }, FieldEdit::RemoveEntry { index }) => {
            let mut entries = current_list(current);
            if index >= entries.len() {
                return Err(EditError::IndexOutOfRange {
                    field: key.clone(),
                    index,
                    len: entries.len(),
                });
            }
            entries.remove(index);
            Ok(FieldValue::List(entries))
        }

        (FieldKind::Boolean, FieldEdit::SetChecked { checked }) => Ok(FieldValue::Bool(checked)),

        (kind, edit) => Err(EditError::KindMismatch {
            field: key.clone(),
            kind: kind.type_name(),
            edit: edit.as_str(),
        }),
    }
}

/// Blank input clears to `Null`; anything else must parse as a finite number.
fn parse_number(field: &FieldKey, input: &str) -> Result<FieldValue, EditError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(FieldValue::Null);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(FieldValue::Number(n)),
        _ => Err(EditError::InvalidNumber {
            field: field.clone(),
            input: input.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SectorRegistry;
    use proptest::prelude::*;

    fn sid(s: &str) -> SectorId {
        SectorId::new(s).unwrap()
    }

    fn key(s: &str) -> FieldKey {
        FieldKey::new(s).unwrap()
    }

    fn field(sector: &str, k: &str) -> FieldDescriptor {
        SectorRegistry::builtin()
            .lookup(&sid(sector))
            .and_then(|s| s.field(&key(k)))
            .cloned()
            .unwrap()
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::list(items.iter().copied())
    }

    #[test]
    fn select_offers_placeholder_first() {
        let sector = sid("exchange-services");
        let values = SectorValues::new();
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("exchange-services", "exchange_type"))
            .unwrap();
        match view.control {
            Control::Select { selected, options } => {
                assert_eq!(selected, "");
                assert_eq!(options.len(), 4);
                assert_eq!(options[0].label, SELECT_PLACEHOLDER);
                assert!(options[0].selected);
                assert_eq!(options[3].value, "Hybrid");
            }
            other => panic!("expected select, got {other:?}"),
        }
    }

    #[test]
    fn stale_select_value_shows_nothing_selected() {
        let sector = sid("exchange-services");
        let values = SectorValues::new().with(key("exchange_type"), "Peer-to-Peer");
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("exchange-services", "exchange_type"))
            .unwrap();
        let Control::Select { options, .. } = view.control else {
            panic!("expected select");
        };
        assert!(options.iter().all(|o| !o.selected));
    }

    #[test]
    fn wrong_shape_reads_as_default() {
        let sector = sid("custody-services");
        let values = SectorValues::new().with(key("insurance_coverage"), "yes please");
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("custody-services", "insurance_coverage"))
            .unwrap();
        assert_eq!(
            view.control,
            Control::Checkbox {
                checked: false,
                caption: "Yes".into()
            }
        );
    }

    #[test]
    fn number_defaults() {
        let sector = sid("lending-borrowing");
        let values = SectorValues::new();
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("lending-borrowing", "average_interest_rate"))
            .unwrap();
        assert_eq!(
            view.control,
            Control::NumberInput {
                value: None,
                step: 0.01,
                min: Some(0.0)
            }
        );
    }

    #[test]
    fn clearing_a_number_yields_null() {
        let sector = sid("exchange-services");
        let values = SectorValues::new().with(key("daily_trading_volume_pkr"), 125_000.0);
        let change = FieldRenderer::new(&sector, &values)
            .edit(
                &field("exchange-services", "daily_trading_volume_pkr"),
                FieldEdit::SetNumber { input: "  ".into() },
            )
            .unwrap();
        assert_eq!(change.value, FieldValue::Null);
    }

    #[test]
    fn number_input_parses_or_rejects() {
        let sector = sid("asset-management");
        let values = SectorValues::new();
        let renderer = FieldRenderer::new(&sector, &values);
        let aum = field("asset-management", "aum_pkr");

        let change = renderer
            .edit(&aum, FieldEdit::SetNumber { input: "1500000".into() })
            .unwrap();
        assert_eq!(change.value, FieldValue::Number(1_500_000.0));

        for bad in ["abc", "NaN", "inf"] {
            let err = renderer
                .edit(&aum, FieldEdit::SetNumber { input: bad.into() })
                .unwrap_err();
            assert!(matches!(err, EditError::InvalidNumber { .. }), "{bad}");
        }
    }

    #[test]
    fn multi_input_add_label_uses_last_word() {
        let sector = sid("exchange-services");
        let values = SectorValues::new();
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("exchange-services", "supported_trading_pairs"))
            .unwrap();
        assert_eq!(
            view.control,
            Control::EntryList {
                entries: vec![],
                placeholder: Some("e.g., BTC/PKR, ETH/USDT".into()),
                add_label: "Add Pairs".into(),
            }
        );
    }

    #[test]
    fn multi_input_append_edit_remove() {
        let sector = sid("exchange-services");
        let pairs = field("exchange-services", "supported_trading_pairs");

        let values = SectorValues::new().with(key("supported_trading_pairs"), list(&["BTC/PKR"]));
        let change = FieldRenderer::new(&sector, &values)
            .edit(&pairs, FieldEdit::AppendEntry)
            .unwrap();
        assert_eq!(change.value, list(&["BTC/PKR", ""]));

        let values = SectorValues::new().with(key("supported_trading_pairs"), change.value);
        let change = FieldRenderer::new(&sector, &values)
            .edit(
                &pairs,
                FieldEdit::EditEntry {
                    index: 1,
                    value: "ETH/USDT".into(),
                },
            )
            .unwrap();
        assert_eq!(change.value, list(&["BTC/PKR", "ETH/USDT"]));

        let values = SectorValues::new().with(key("supported_trading_pairs"), change.value);
        let err = FieldRenderer::new(&sector, &values)
            .edit(&pairs, FieldEdit::RemoveEntry { index: 2 })
            .unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                field: key("supported_trading_pairs"),
                index: 2,
                len: 2
            }
        );
    }

    #[test]
    fn select_rejects_unknown_option_but_allows_placeholder() {
        let sector = sid("derivatives");
        let values = SectorValues::new();
        let renderer = FieldRenderer::new(&sector, &values);
        let settlement = field("derivatives", "settlement_mechanism");

        assert!(matches!(
            renderer.edit(&settlement, FieldEdit::Choose { option: "T+5".into() }),
            Err(EditError::OptionNotOffered { .. })
        ));
        let change = renderer
            .edit(&settlement, FieldEdit::Choose { option: String::new() })
            .unwrap();
        assert_eq!(change.value, FieldValue::text(""));
    }

    #[test]
    fn edit_kind_mismatch() {
        let sector = sid("custody-services");
        let values = SectorValues::new();
        let err = FieldRenderer::new(&sector, &values)
            .edit(
                &field("custody-services", "insurance_coverage"),
                FieldEdit::SetText { value: "yes".into() },
            )
            .unwrap_err();
        assert_eq!(
            err,
            EditError::KindMismatch {
                field: key("insurance_coverage"),
                kind: "boolean",
                edit: "set_text",
            }
        );
    }

    #[test]
    fn hidden_field_renders_nothing_and_refuses_edits() {
        let sector = sid("custody-services");
        let amount = field("custody-services", "insurance_amount_pkr");
        let values = SectorValues::new().with(key("insurance_amount_pkr"), 250_000.0);
        let renderer = FieldRenderer::new(&sector, &values);

        assert!(renderer.render(&amount).is_none());
        assert!(matches!(
            renderer.edit(&amount, FieldEdit::SetNumber { input: "1".into() }),
            Err(EditError::HiddenField { .. })
        ));
    }

    #[test]
    fn edit_json_shape() {
        let edit: FieldEdit =
            serde_json::from_str(r#"{"op":"toggle_option","option":"Market Orders","checked":true}"#)
                .unwrap();
        assert_eq!(
            edit,
            FieldEdit::ToggleOption {
                option: "Market Orders".into(),
                checked: true
            }
        );
        let append: FieldEdit = serde_json::from_str(r#"{"op":"append_entry"}"#).unwrap();
        assert_eq!(append, FieldEdit::AppendEntry);
    }

    #[test]
    fn view_json_flattens_control() {
        let sector = sid("custody-services");
        let values = SectorValues::new().with(key("insurance_coverage"), true);
        let view = FieldRenderer::new(&sector, &values)
            .render(&field("custody-services", "insurance_coverage"))
            .unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["control"], "checkbox");
        assert_eq!(json["checked"], true);
        assert_eq!(json["kind"], "boolean");
    }

    const LEVERAGE: [&str; 7] = ["2x", "5x", "10x", "20x", "50x", "100x", "Custom"];

    proptest! {
        #[test]
        fn multi_select_check_then_uncheck_restores_list(
            picks in proptest::sample::subsequence(LEVERAGE.to_vec(), 0..7),
            extra in proptest::sample::select(LEVERAGE.to_vec()),
        ) {
            prop_assume!(!picks.contains(&extra));
            let sector = sid("derivatives");
            let leverage = field("derivatives", "leverage_levels");
            let original = list(&picks);

            let values = SectorValues::new().with(key("leverage_levels"), original.clone());
            let added = FieldRenderer::new(&sector, &values)
                .edit(&leverage, FieldEdit::ToggleOption { option: extra.into(), checked: true })
                .unwrap();

            let values = SectorValues::new().with(key("leverage_levels"), added.value);
            let removed = FieldRenderer::new(&sector, &values)
                .edit(&leverage, FieldEdit::ToggleOption { option: extra.into(), checked: false })
                .unwrap();

            prop_assert_eq!(removed.value, original);
        }

        #[test]
        fn multi_input_remove_shifts_later_entries(
            entries in proptest::collection::vec("[A-Z]{3}/[A-Z]{3}", 1..8),
            seed in any::<prop::sample::Index>(),
        ) {
            let index = seed.index(entries.len());
            let sector = sid("exchange-services");
            let pairs = field("exchange-services", "supported_trading_pairs");
            let values = SectorValues::new()
                .with(key("supported_trading_pairs"), FieldValue::List(entries.clone()));

            let change = FieldRenderer::new(&sector, &values)
                .edit(&pairs, FieldEdit::RemoveEntry { index })
                .unwrap();
            let after = change.value.as_list().unwrap().to_vec();

            prop_assert_eq!(after.len(), entries.len() - 1);
            prop_assert_eq!(&after[..index], &entries[..index]);
            prop_assert_eq!(&after[index..], &entries[index + 1..]);
        }
    }
}
