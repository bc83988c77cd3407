use std::io;

use vasp_sector::SectorRegistry;

use super::{CsvError, COMPANY_HEADERS, LIST_SEPARATOR, SECTOR_DETAIL_HEADERS};
use crate::company::NewCompany;

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

fn company_row(company: &NewCompany) -> [String; 16] {
    [
        company.name.clone(),
        company
            .sectors
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR),
        opt(&company.year_founded),
        opt(&company.founder_ceo_name),
        company.headquarters_location.clone(),
        yes_no(company.pakistan_operations).to_string(),
        opt(&company.website),
        opt(&company.contact_email),
        opt(&company.employee_count),
        opt(&company.total_funding_pkr),
        company.key_partnerships.join(LIST_SEPARATOR),
        company.company_description.clone(),
        opt(&company.secp_registration_number),
        opt(&company.pvara_license_number),
        company.license_status.to_string(),
        company.aml_cft_compliance_rating.to_string(),
    ]
}

/// Write the company sheet. The header row is always written.
pub fn write_companies<'a, W: io::Write>(
    companies: impl IntoIterator<Item = &'a NewCompany>,
    out: W,
) -> Result<(), CsvError> {
    let mut writer = ::csv::Writer::from_writer(out);
    writer.write_record(COMPANY_HEADERS)?;
    let mut rows = 0usize;
    for company in companies {
        writer.write_record(company_row(company))?;
        rows += 1;
    }
    writer.flush()?;
    tracing::debug!(rows, "wrote company sheet");
    Ok(())
}

/// Write the sector-details sheet.
///
/// For each company, each assigned sector with a schema, and each field of
/// that schema in declared order, one row is written if the company has a
/// stored value for the field. `Field` is the field label; `Value` renders
/// lists joined with `"; "`, booleans as `Yes`/`No` and null as empty.
pub fn write_sector_details<'a, W: io::Write>(
    registry: &SectorRegistry,
    companies: impl IntoIterator<Item = &'a NewCompany>,
    out: W,
) -> Result<(), CsvError> {
    let mut writer = ::csv::Writer::from_writer(out);
    writer.write_record(SECTOR_DETAIL_HEADERS)?;
    for company in companies {
        for sector in &company.sectors {
            let Some(schema) = registry.lookup(sector) else {
                continue;
            };
            let Some(values) = company.sector_details.sector(sector) else {
                continue;
            };
            for field in &schema.fields {
                if let Some(value) = values.get(&field.key) {
                    writer.write_record([
                        company.name.as_str(),
                        sector.as_str(),
                        field.label.as_str(),
                        value.to_display_string().as_str(),
                    ])?;
                }
            }
        }
    }
    writer.flush()?;
    Ok(())
}

fn into_string(write: impl FnOnce(&mut Vec<u8>) -> Result<(), CsvError>) -> Result<String, CsvError> {
    let mut buf = Vec::new();
    write(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

/// The company sheet as a string.
pub fn companies_to_csv<'a>(
    companies: impl IntoIterator<Item = &'a NewCompany>,
) -> Result<String, CsvError> {
    into_string(|buf| write_companies(companies, buf))
}

/// The sector-details sheet as a string.
pub fn sector_details_to_csv<'a>(
    registry: &SectorRegistry,
    companies: impl IntoIterator<Item = &'a NewCompany>,
) -> Result<String, CsvError> {
    into_string(|buf| write_sector_details(registry, companies, buf))
}
