//! # Section Controller
//!
//! Walks the selected sectors, keeps per-sector expand/collapse state and
//! delegates each field to the [`FieldRenderer`].
//!
//! ## State Machine
//!
//! ```text
//!   first selected ──▶ Expanded ◀──toggle──▶ Collapsed
//! ```
//!
//! A sector enters `Expanded` the first time the controller sees it in the
//! selection. From then on only [`SectionController::toggle`] moves it. A
//! sector the user collapsed stays collapsed when other sectors are added,
//! and also when it is deselected and selected again.
//!
//! Sectors without a schema are skipped silently.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use vasp_core::{FieldKey, SectorId};

use crate::data::{FieldChange, PerSectorData};
use crate::registry::SectorRegistry;
use crate::render::{EditError, FieldEdit, FieldRenderer, FieldView};
use crate::schema::SectorIcon;

pub const EMPTY_MESSAGE: &str =
    "Select one or more sectors above to configure sector-specific details.";

pub const HEADING: &str = "Sector-Specific Configuration";

pub const INTRO: &str = "Based on your selected sectors, please provide additional details \
                         required for regulatory compliance and market analysis.";

/// Expand/collapse state of one sector section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionState {
    Collapsed,
    Expanded,
}

impl SectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collapsed => "collapsed",
            Self::Expanded => "expanded",
        }
    }
}

impl std::fmt::Display for SectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rendered sector section. `fields` is empty while collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionView {
    pub sector_id: SectorId,
    pub title: String,
    pub icon: SectorIcon,
    pub state: SectionState,
    pub fields: Vec<FieldView>,
}

/// Output of [`SectionController::render`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SectionsView {
    /// Nothing selected.
    Empty { icon: SectorIcon, message: String },
    Sections {
        heading: String,
        intro: String,
        sections: Vec<SectionView>,
    },
}

impl SectionsView {
    /// The rendered sections; empty for the placeholder.
    pub fn sections(&self) -> &[SectionView] {
        match self {
            Self::Empty { .. } => &[],
            Self::Sections { sections, .. } => sections,
        }
    }

    /// Find a rendered section by sector.
    pub fn section(&self, sector: &SectorId) -> Option<&SectionView> {
        self.sections().iter().find(|s| &s.sector_id == sector)
    }
}

/// Per-session expansion state for the sector sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionController {
    expanded: BTreeSet<SectorId>,
    /// Every sector ever synced, so reselection does not re-expand.
    seen: BTreeSet<SectorId>,
}

impl SectionController {
    /// Start with every initially selected sector expanded.
    pub fn new(selected: &[SectorId]) -> Self {
        let mut controller = Self::default();
        controller.sync_selection(selected);
        controller
    }

    /// Expand sectors appearing in `selected` for the first time.
    pub fn sync_selection(&mut self, selected: &[SectorId]) {
        for sector in selected {
            if self.seen.insert(sector.clone()) {
                self.expanded.insert(sector.clone());
            }
        }
    }

    /// Flip the state of `sector` and return the new state.
    pub fn toggle(&mut self, sector: &SectorId) -> SectionState {
        self.seen.insert(sector.clone());
        if self.expanded.remove(sector) {
            SectionState::Collapsed
        } else {
            self.expanded.insert(sector.clone());
            SectionState::Expanded
        }
    }

    pub fn state(&self, sector: &SectorId) -> SectionState {
        if self.expanded.contains(sector) {
            SectionState::Expanded
        } else {
            SectionState::Collapsed
        }
    }

    pub fn is_expanded(&self, sector: &SectorId) -> bool {
        self.expanded.contains(sector)
    }

    /// Render the section view for `selected`, syncing expansion first.
    pub fn render(
        &mut self,
        registry: &SectorRegistry,
        selected: &[SectorId],
        data: &PerSectorData,
    ) -> SectionsView {
        if selected.is_empty() {
            return SectionsView::Empty {
                icon: SectorIcon::Database,
                message: EMPTY_MESSAGE.to_string(),
            };
        }
        self.sync_selection(selected);

        let mut sections = Vec::with_capacity(selected.len());
        for sector in selected {
            let Some(schema) = registry.lookup(sector) else {
                tracing::debug!(%sector, "skipping sector without schema");
                continue;
            };
            let state = self.state(sector);
            let fields = match state {
                SectionState::Collapsed => Vec::new(),
                SectionState::Expanded => {
                    let renderer = FieldRenderer::new(sector, data.values_or_empty(sector));
                    schema
                        .fields
                        .iter()
                        .filter_map(|field| renderer.render(field))
                        .collect()
                }
            };
            sections.push(SectionView {
                sector_id: sector.clone(),
                title: schema.title.clone(),
                icon: schema.icon,
                state,
                fields,
            });
        }

        SectionsView::Sections {
            heading: HEADING.to_string(),
            intro: INTRO.to_string(),
            sections,
        }
    }

    /// Route an edit on `sector`.`field` to the renderer and report the
    /// resulting change through `on_change`, exactly once on success.
    ///
    /// Expansion state is not consulted: a collapsed section's fields are
    /// still editable programmatically.
    pub fn handle_edit(
        &self,
        registry: &SectorRegistry,
        data: &PerSectorData,
        sector: &SectorId,
        field: &FieldKey,
        edit: FieldEdit,
        mut on_change: impl FnMut(FieldChange),
    ) -> Result<(), EditError> {
        let schema = registry
            .lookup(sector)
            .ok_or_else(|| EditError::UnknownSector {
                sector: sector.clone(),
            })?;
        let descriptor = schema.field(field).ok_or_else(|| EditError::UnknownField {
            sector: sector.clone(),
            field: field.clone(),
        })?;
        let change = FieldRenderer::new(sector, data.values_or_empty(sector)).edit(descriptor, edit)?;
        tracing::debug!(%sector, %field, "field changed");
        on_change(change);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SectorValues;
    use crate::render::{ChecklistItem, Control};
    use vasp_core::FieldValue;

    fn sid(s: &str) -> SectorId {
        SectorId::new(s).unwrap()
    }

    fn key(s: &str) -> FieldKey {
        FieldKey::new(s).unwrap()
    }

    fn registry() -> &'static SectorRegistry {
        SectorRegistry::builtin()
    }

    /// Apply one edit the way a caller would: merge the change into a new store.
    fn edit(
        controller: &SectionController,
        data: &PerSectorData,
        sector: &str,
        field: &str,
        edit: FieldEdit,
    ) -> PerSectorData {
        let mut next = None;
        controller
            .handle_edit(registry(), data, &sid(sector), &key(field), edit, |change| {
                next = Some(data.apply(&change));
            })
            .unwrap();
        next.unwrap()
    }

    fn checked_options(view: &SectionsView, sector: &str, field: &str) -> Vec<String> {
        let section = view.section(&sid(sector)).unwrap();
        let field = section.fields.iter().find(|f| f.key == field).unwrap();
        match &field.control {
            Control::Checklist { items } => items
                .iter()
                .filter(|i| i.checked)
                .map(|i| i.label.clone())
                .collect(),
            other => panic!("expected checklist, got {other:?}"),
        }
    }

    #[test]
    fn empty_selection_renders_placeholder() {
        let mut controller = SectionController::default();
        let view = controller.render(registry(), &[], &PerSectorData::new());
        assert_eq!(
            view,
            SectionsView::Empty {
                icon: SectorIcon::Database,
                message: EMPTY_MESSAGE.into()
            }
        );
    }

    #[test]
    fn unknown_sectors_are_skipped() {
        let selected = [sid("mining-pools"), sid("derivatives"), sid("nft-lounges")];
        let mut controller = SectionController::new(&selected);
        let view = controller.render(registry(), &selected, &PerSectorData::new());
        let ids: Vec<&str> = view.sections().iter().map(|s| s.sector_id.as_str()).collect();
        assert_eq!(ids, vec!["derivatives"]);
    }

    #[test]
    fn only_unknown_sectors_render_heading_without_sections() {
        let selected = [sid("mining-pools")];
        let mut controller = SectionController::new(&selected);
        let view = controller.render(registry(), &selected, &PerSectorData::new());
        assert!(matches!(view, SectionsView::Sections { .. }));
        assert!(view.sections().is_empty());
    }

    #[test]
    fn exchange_services_with_empty_data() {
        let selected = [sid("exchange-services")];
        let mut controller = SectionController::new(&selected);
        let data = PerSectorData::new();
        let view = controller.render(registry(), &selected, &data);

        let section = view.section(&sid("exchange-services")).unwrap();
        assert_eq!(section.title, "Exchange Services Details");
        assert_eq!(section.icon, SectorIcon::Globe);
        assert_eq!(section.state, SectionState::Expanded);

        let keys: Vec<&str> = section.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "exchange_type",
                "supported_trading_pairs",
                "daily_trading_volume_pkr",
                "order_types_supported"
            ]
        );

        let Control::Select { selected, options } = &section.fields[0].control else {
            panic!("exchange_type should be a select");
        };
        assert_eq!(selected, "");
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Select an option", "Centralized", "Decentralized", "Hybrid"]
        );

        assert!(matches!(
            &section.fields[1].control,
            Control::EntryList { entries, add_label, .. } if entries.is_empty() && add_label == "Add Pairs"
        ));
        assert!(matches!(
            section.fields[2].control,
            Control::NumberInput { value: None, .. }
        ));
        let Control::Checklist { items } = &section.fields[3].control else {
            panic!("order_types_supported should be a checklist");
        };
        assert_eq!(items.len(), 7);
        assert!(items.iter().all(|i| !i.checked));
    }

    #[test]
    fn exchange_services_check_two_then_uncheck_one() {
        let selected = [sid("exchange-services")];
        let mut controller = SectionController::new(&selected);
        let order_types = |option: &str, checked: bool| FieldEdit::ToggleOption {
            option: option.into(),
            checked,
        };

        let data = PerSectorData::new();
        let data = edit(&controller, &data, "exchange-services", "order_types_supported", order_types("Market Orders", true));
        let data = edit(&controller, &data, "exchange-services", "order_types_supported", order_types("Limit Orders", true));
        assert_eq!(
            data.values_or_empty(&sid("exchange-services"))
                .get(&key("order_types_supported")),
            Some(&FieldValue::list(["Market Orders", "Limit Orders"]))
        );

        let data = edit(&controller, &data, "exchange-services", "order_types_supported", order_types("Market Orders", false));
        assert_eq!(
            data.values_or_empty(&sid("exchange-services"))
                .get(&key("order_types_supported")),
            Some(&FieldValue::list(["Limit Orders"]))
        );

        let view = controller.render(registry(), &selected, &data);
        assert_eq!(
            checked_options(&view, "exchange-services", "order_types_supported"),
            vec!["Limit Orders".to_string()]
        );
    }

    #[test]
    fn custody_insurance_amount_follows_coverage() {
        let selected = [sid("custody-services")];
        let mut controller = SectionController::new(&selected);
        let visible = |view: &SectionsView| {
            view.section(&sid("custody-services"))
                .unwrap()
                .fields
                .iter()
                .any(|f| f.key == "insurance_amount_pkr")
        };

        let data = PerSectorData::new();
        assert!(!visible(&controller.render(registry(), &selected, &data)));

        let data = edit(&controller, &data, "custody-services", "insurance_coverage", FieldEdit::SetChecked { checked: true });
        assert!(visible(&controller.render(registry(), &selected, &data)));

        let data = edit(
            &controller,
            &data,
            "custody-services",
            "insurance_amount_pkr",
            FieldEdit::SetNumber { input: "250000".into() },
        );
        let data = edit(&controller, &data, "custody-services", "audit_frequency", FieldEdit::Choose { option: "Quarterly".into() });

        let data = edit(&controller, &data, "custody-services", "insurance_coverage", FieldEdit::SetChecked { checked: false });
        assert!(!visible(&controller.render(registry(), &selected, &data)));

        // Hiding leaves every stored value in place.
        let custody = data.values_or_empty(&sid("custody-services"));
        assert_eq!(
            custody.get(&key("insurance_amount_pkr")),
            Some(&FieldValue::Number(250_000.0))
        );
        assert_eq!(
            custody.get(&key("audit_frequency")),
            Some(&FieldValue::text("Quarterly"))
        );
    }

    #[test]
    fn new_sectors_expand_and_collapsed_ones_stay_collapsed() {
        let a = sid("custody-services");
        let b = sid("derivatives");
        let mut controller = SectionController::new(&[a.clone()]);
        assert_eq!(controller.toggle(&a), SectionState::Collapsed);

        let data = PerSectorData::new();
        let view = controller.render(registry(), &[a.clone(), b.clone()], &data);
        assert_eq!(view.section(&a).unwrap().state, SectionState::Collapsed);
        assert!(view.section(&a).unwrap().fields.is_empty());
        assert_eq!(view.section(&b).unwrap().state, SectionState::Expanded);

        // Deselect and reselect: still collapsed.
        controller.render(registry(), &[b.clone()], &data);
        let view = controller.render(registry(), &[a.clone(), b.clone()], &data);
        assert_eq!(view.section(&a).unwrap().state, SectionState::Collapsed);

        assert_eq!(controller.toggle(&a), SectionState::Expanded);
        assert!(controller.is_expanded(&a));
    }

    #[test]
    fn toggle_never_touches_data() {
        let selected = [sid("fiat-tokens")];
        let mut controller = SectionController::new(&selected);
        let data = PerSectorData::new().with_sector(
            sid("fiat-tokens"),
            SectorValues::new().with(key("redemption_policy"), "T+1 at par"),
        );
        let before = data.clone();
        controller.toggle(&sid("fiat-tokens"));
        controller.render(registry(), &selected, &data);
        assert_eq!(data, before);
    }

    #[test]
    fn fields_render_against_their_own_sector_only() {
        // Both token sectors declare reserve_audit_frequency.
        let selected = [sid("fiat-tokens"), sid("asset-tokens")];
        let mut controller = SectionController::new(&selected);
        let data = PerSectorData::new().with_sector(
            sid("fiat-tokens"),
            SectorValues::new().with(key("reserve_audit_frequency"), "Daily"),
        );
        let view = controller.render(registry(), &selected, &data);
        let selected_of = |sector: &str| {
            let section = view.section(&sid(sector)).unwrap();
            let field = section
                .fields
                .iter()
                .find(|f| f.key == "reserve_audit_frequency")
                .unwrap();
            match &field.control {
                Control::Select { selected, .. } => selected.clone(),
                other => panic!("expected select, got {other:?}"),
            }
        };
        assert_eq!(selected_of("fiat-tokens"), "Daily");
        assert_eq!(selected_of("asset-tokens"), "");
    }

    #[test]
    fn handle_edit_errors_do_not_call_back() {
        let controller = SectionController::new(&[sid("derivatives")]);
        let data = PerSectorData::new();
        let mut calls = 0;

        let err = controller
            .handle_edit(
                registry(),
                &data,
                &sid("mining-pools"),
                &key("hash_rate"),
                FieldEdit::SetText { value: "x".into() },
                |_| calls += 1,
            )
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownSector { .. }));

        let err = controller
            .handle_edit(
                registry(),
                &data,
                &sid("derivatives"),
                &key("hash_rate"),
                FieldEdit::SetText { value: "x".into() },
                |_| calls += 1,
            )
            .unwrap_err();
        assert!(matches!(err, EditError::UnknownField { .. }));
        assert_eq!(calls, 0);
    }

    #[test]
    fn checklist_order_follows_options_not_selection() {
        let selected = [sid("derivatives")];
        let mut controller = SectionController::new(&selected);
        let data = PerSectorData::new().with_sector(
            sid("derivatives"),
            SectorValues::new().with(key("leverage_levels"), FieldValue::list(["10x", "2x"])),
        );
        let view = controller.render(registry(), &selected, &data);
        let field = &view.section(&sid("derivatives")).unwrap().fields[1];
        let Control::Checklist { items } = &field.control else {
            panic!("expected checklist");
        };
        assert_eq!(
            items[..3],
            [
                ChecklistItem { label: "2x".into(), checked: true },
                ChecklistItem { label: "5x".into(), checked: false },
                ChecklistItem { label: "10x".into(), checked: true },
            ]
        );
    }

    #[test]
    fn sections_view_json_shape() {
        let mut controller = SectionController::default();
        let json = serde_json::to_value(controller.render(registry(), &[], &PerSectorData::new())).unwrap();
        assert_eq!(json["state"], "empty");
        assert_eq!(json["icon"], "database");
    }
}
