use std::io;

use serde::{Deserialize, Serialize};

use vasp_core::SectorId;
use vasp_sector::SectorRegistry;

use super::CsvError;
use crate::company::NewCompany;

/// Largest number of company rows accepted in one import.
pub const MAX_IMPORT_ROWS: usize = 100;

/// Import settings.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Sectors assigned to rows whose `Sectors` cell is empty or absent.
    pub default_sectors: Vec<SectorId>,
    pub max_rows: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            default_sectors: Vec::new(),
            max_rows: MAX_IMPORT_ROWS,
        }
    }
}

/// A row that could not be turned into a valid company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet line number; the header is line 1.
    pub row: usize,
    pub message: String,
}

/// Outcome of an import: valid profiles plus per-row rejections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub imported: Vec<NewCompany>,
    pub errors: Vec<RowError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Sectors,
    YearFounded,
    Founder,
    Headquarters,
    PakistanOperations,
    Website,
    Email,
    Employees,
    Funding,
    Partnerships,
    Description,
    Secp,
    Pvara,
    LicenseStatus,
    AmlRating,
}

/// Accepts the export headers and the shorter names of the bulk-upload template.
fn column_for(header: &str) -> Option<Column> {
    let column = match header.trim().to_ascii_lowercase().as_str() {
        "company name" | "name" => Column::Name,
        "sectors" | "sector" => Column::Sectors,
        "year founded" => Column::YearFounded,
        "founder/ceo name" | "founder/ceo" => Column::Founder,
        "headquarters location" | "headquarters" => Column::Headquarters,
        "pakistan operations" => Column::PakistanOperations,
        "website" => Column::Website,
        "contact email" => Column::Email,
        "number of employees" | "employees" => Column::Employees,
        "total funding (pkr)" | "funding (pkr)" => Column::Funding,
        "key partnerships" | "partnerships" => Column::Partnerships,
        "company description" | "description" => Column::Description,
        "secp registration number" | "secp number" => Column::Secp,
        "pvara license number" | "pvara number" => Column::Pvara,
        "license status" => Column::LicenseStatus,
        "aml/cft compliance rating" => Column::AmlRating,
        _ => return None,
    };
    Some(column)
}

/// Read a company sheet.
///
/// Columns are matched by header name, case-insensitively; unknown columns
/// are ignored and every column but `Company Name` may be absent. Each row
/// is validated against `registry`. Bad rows are reported in
/// [`ImportReport::errors`] and do not stop the import.
///
/// # Errors
///
/// Fails as a whole when the header cannot be read, there is no
/// `Company Name` column, or there are more than `options.max_rows` rows.
pub fn import_companies<R: io::Read>(
    input: R,
    registry: &SectorRegistry,
    options: &ImportOptions,
) -> Result<ImportReport, CsvError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .trim(::csv::Trim::All)
        .flexible(true)
        .from_reader(input);

    let columns: Vec<Option<Column>> = reader.headers()?.iter().map(column_for).collect();
    if !columns.contains(&Some(Column::Name)) {
        return Err(CsvError::MissingColumn("Company Name"));
    }

    let mut report = ImportReport::default();
    for (i, record) in reader.records().enumerate() {
        if i >= options.max_rows {
            return Err(CsvError::TooManyRows {
                max: options.max_rows,
            });
        }
        let fallback_row = i + 2;
        let parsed = match record {
            Ok(record) => {
                let row = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(fallback_row);
                (row, parse_row(&columns, &record, options))
            }
            Err(err) => (fallback_row, Err(err.to_string())),
        };
        match parsed {
            (row, Ok(company)) => match company.validate(Some(registry)) {
                Ok(()) => report.imported.push(company),
                Err(err) => report.reject(row, err.to_string()),
            },
            (row, Err(message)) => report.reject(row, message),
        }
    }

    tracing::info!(
        imported = report.imported.len(),
        rejected = report.errors.len(),
        "company sheet imported"
    );
    Ok(report)
}

impl ImportReport {
    fn reject(&mut self, row: usize, message: String) {
        tracing::warn!(row, %message, "rejected CSV row");
        self.errors.push(RowError { row, message });
    }
}

fn parse_row(
    columns: &[Option<Column>],
    record: &::csv::StringRecord,
    options: &ImportOptions,
) -> Result<NewCompany, String> {
    let mut company = NewCompany::default();
    for (column, cell) in columns.iter().zip(record.iter()) {
        let Some(column) = column else {
            continue;
        };
        apply_cell(&mut company, *column, cell)?;
    }
    if company.sectors.is_empty() {
        company.sectors = options.default_sectors.clone();
    }
    Ok(company)
}

fn non_empty(cell: &str) -> Option<String> {
    (!cell.is_empty()).then(|| cell.to_string())
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Integer cell; thousands separators are tolerated.
fn parse_integer<T: std::str::FromStr>(header: &str, cell: &str) -> Result<Option<T>, String> {
    if cell.is_empty() {
        return Ok(None);
    }
    let digits: String = cell.chars().filter(|c| *c != ',' && *c != ' ').collect();
    digits
        .parse()
        .map(Some)
        .map_err(|_| format!("{header}: {cell:?} is not a whole number"))
}

fn parse_yes_no(cell: &str) -> Result<bool, String> {
    match cell.to_ascii_lowercase().as_str() {
        "" | "no" | "false" | "0" => Ok(false),
        "yes" | "true" | "1" => Ok(true),
        _ => Err(format!("Pakistan Operations: {cell:?} is not Yes or No")),
    }
}

fn apply_cell(company: &mut NewCompany, column: Column, cell: &str) -> Result<(), String> {
    match column {
        Column::Name => company.name = cell.to_string(),
        Column::Sectors => {
            company.sectors = cell
                .split([';', ','])
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| SectorId::new(s).map_err(|e| format!("Sectors: {e}")))
                .collect::<Result<_, _>>()?;
        }
        Column::YearFounded => company.year_founded = parse_integer("Year Founded", cell)?,
        Column::Founder => company.founder_ceo_name = non_empty(cell),
        Column::Headquarters => company.headquarters_location = cell.to_string(),
        Column::PakistanOperations => company.pakistan_operations = parse_yes_no(cell)?,
        Column::Website => company.website = non_empty(cell),
        Column::Email => company.contact_email = non_empty(cell),
        Column::Employees => company.employee_count = parse_integer("Number of Employees", cell)?,
        Column::Funding => company.total_funding_pkr = parse_integer("Total Funding (PKR)", cell)?,
        Column::Partnerships => company.key_partnerships = split_list(cell),
        Column::Description => company.company_description = cell.to_string(),
        Column::Secp => company.secp_registration_number = non_empty(cell),
        Column::Pvara => company.pvara_license_number = non_empty(cell),
        Column::LicenseStatus => {
            company.license_status = cell.parse().map_err(|e| format!("License Status: {e}"))?;
        }
        Column::AmlRating => {
            company.aml_cft_compliance_rating = cell
                .parse()
                .map_err(|e| format!("AML/CFT Compliance Rating: {e}"))?;
        }
    }
    Ok(())
}
