//! # Form Subcommand
//!
//! Renders the sector-specific section of the company editor as plain
//! text, from a list of selected sectors and optional stored details.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vasp_core::value::format_number;
use vasp_core::SectorId;
use vasp_sector::render::SELECT_PLACEHOLDER;
use vasp_sector::{
    Control, FieldView, PerSectorData, SectionController, SectionState, SectionsView,
    SectorRegistry,
};

/// Arguments for the `vasp form` subcommand.
#[derive(Args, Debug)]
pub struct FormArgs {
    /// Selected sectors, in display order.
    #[arg(value_name = "SECTOR")]
    pub sectors: Vec<String>,

    /// JSON object of sector details: `{ "<sector>": { "<field>": value } }`.
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Render these sectors collapsed.
    #[arg(long, value_name = "SECTOR")]
    pub collapse: Vec<String>,

    /// Print the view model as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute the form subcommand.
///
/// Returns exit code 1 if a sector id is malformed.
pub fn run_form(args: &FormArgs, registry: &SectorRegistry) -> Result<u8> {
    let mut selected = Vec::with_capacity(args.sectors.len());
    for raw in &args.sectors {
        match SectorId::new(raw.as_str()) {
            Ok(id) => selected.push(id),
            Err(err) => {
                println!("Invalid sector {raw:?}: {err}");
                return Ok(1);
            }
        }
    }
    for sector in selected.iter().filter(|s| !registry.contains(s)) {
        tracing::warn!(%sector, "sector has no schema and will not be rendered");
    }

    let data = match &args.data {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<PerSectorData>(&text)
                .with_context(|| format!("{} is not a sector details object", path.display()))?
        }
        None => PerSectorData::new(),
    };

    let mut controller = SectionController::new(&selected);
    for raw in &args.collapse {
        let sector = SectorId::new(raw.as_str())
            .with_context(|| format!("invalid sector {raw:?} in --collapse"))?;
        if controller.is_expanded(&sector) {
            controller.toggle(&sector);
        }
    }

    let view = controller.render(registry, &selected, &data);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("failed to serialize view")?
        );
    } else {
        print!("{}", render_text(&view));
    }
    Ok(0)
}

/// Plain-text rendering of a sections view.
pub fn render_text(view: &SectionsView) -> String {
    let mut out = String::new();
    match view {
        SectionsView::Empty { message, .. } => {
            let _ = writeln!(out, "{message}");
        }
        SectionsView::Sections {
            heading,
            intro,
            sections,
        } => {
            let _ = writeln!(out, "{heading}");
            let _ = writeln!(out, "{intro}");
            for section in sections {
                let marker = match section.state {
                    SectionState::Expanded => "[-]",
                    SectionState::Collapsed => "[+]",
                };
                let _ = writeln!(out);
                let _ = writeln!(out, "{marker} {} ({})", section.title, section.sector_id);
                for field in &section.fields {
                    write_field(&mut out, field);
                }
            }
        }
    }
    out
}

fn write_field(out: &mut String, field: &FieldView) {
    let _ = writeln!(out, "    {}: {}", field.label, control_text(&field.control));
    if let Some(description) = &field.description {
        let _ = writeln!(out, "        {description}");
    }
}

fn control_text(control: &Control) -> String {
    match control {
        Control::TextInput { value, placeholder } | Control::TextArea { value, placeholder, .. } => {
            match (value.is_empty(), placeholder) {
                (true, Some(placeholder)) => format!("({placeholder})"),
                _ => value.clone(),
            }
        }
        Control::NumberInput { value, .. } => value.map(format_number).unwrap_or_default(),
        Control::Select { options, .. } => options
            .iter()
            .find(|o| o.selected && !o.value.is_empty())
            .map(|o| o.label.clone())
            .unwrap_or_else(|| format!("<{SELECT_PLACEHOLDER}>")),
        Control::Checklist { items } => items
            .iter()
            .map(|i| format!("[{}] {}", if i.checked { "x" } else { " " }, i.label))
            .collect::<Vec<_>>()
            .join("  "),
        Control::EntryList {
            entries, add_label, ..
        } => {
            let mut parts: Vec<String> = entries.iter().map(|e| format!("\"{e}\"")).collect();
            parts.push(format!("[{add_label}]"));
            parts.join(" ")
        }
        Control::Checkbox { checked, caption } => {
            format!("[{}] {caption}", if *checked { "x" } else { " " })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasp_core::{FieldKey, FieldValue};
    use vasp_sector::SectorValues;

    fn sid(s: &str) -> SectorId {
        SectorId::new(s).unwrap()
    }

    fn key(s: &str) -> FieldKey {
        FieldKey::new(s).unwrap()
    }

    #[test]
    fn empty_selection_prints_placeholder() {
        let mut controller = SectionController::default();
        let view = controller.render(SectorRegistry::builtin(), &[], &PerSectorData::new());
        let text = render_text(&view);
        assert!(text.starts_with("Select one or more sectors"), "{text}");
    }

    #[test]
    fn collapsed_section_has_header_only() {
        let selected = vec![sid("custody-services")];
        let mut controller = SectionController::new(&selected);
        controller.toggle(&sid("custody-services"));
        let view = controller.render(SectorRegistry::builtin(), &selected, &PerSectorData::new());
        let text = render_text(&view);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.last().unwrap(), &"[+] Custody Services Details (custody-services)");
    }

    #[test]
    fn conditional_field_appears_with_controller() {
        let selected = vec![sid("custody-services")];
        let data = PerSectorData::new().with_sector(
            sid("custody-services"),
            SectorValues::new()
                .with(key("insurance_coverage"), true)
                .with(key("insurance_amount_pkr"), FieldValue::Number(1500000.0))
                .with(key("custody_type"), FieldValue::list(["Cold Storage"])),
        );
        let mut controller = SectionController::new(&selected);
        let text = render_text(&controller.render(SectorRegistry::builtin(), &selected, &data));
        assert!(text.contains("Insurance Coverage: [x] Yes"), "{text}");
        assert!(text.contains("Insurance Coverage Amount (PKR): 1500000"), "{text}");
        assert!(text.contains("[x] Cold Storage"), "{text}");

        let unchecked = PerSectorData::new();
        let text = render_text(&controller.render(SectorRegistry::builtin(), &selected, &unchecked));
        assert!(text.contains("Insurance Coverage: [ ] Yes"), "{text}");
        assert!(!text.contains("Insurance Coverage Amount"), "{text}");
    }

    #[test]
    fn unset_select_shows_placeholder() {
        let selected = vec![sid("custody-services")];
        let mut controller = SectionController::new(&selected);
        let text = render_text(&controller.render(
            SectorRegistry::builtin(),
            &selected,
            &PerSectorData::new(),
        ));
        assert!(
            text.contains("Audit Frequency for Custodied Assets: <Select an option>"),
            "{text}"
        );
    }
}
