//! # CSV Export & Import API
//!
//! The company and sector-details sheets as downloads, and bulk creation
//! of companies from an uploaded company sheet.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vasp_core::SectorId;
use vasp_directory::csv_io::{companies_to_csv, import_companies, sector_details_to_csv};
use vasp_directory::{Company, ImportOptions, RowError};

use crate::error::AppError;
use crate::extractors::extract_query;
use crate::state::AppState;

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Query string of the import endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    /// Sector assigned to rows with no `Sectors` cell.
    #[serde(default)]
    pub default_sector: Option<String>,
}

/// Outcome of a bulk import.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    /// Companies added to the directory.
    #[schema(value_type = Vec<Object>)]
    pub created: Vec<Company>,
    /// Rows that failed to parse or validate.
    #[schema(value_type = Vec<Object>)]
    pub rejected: Vec<RowError>,
    /// Valid rows whose company could not be stored, e.g. a slug already taken.
    pub conflicts: Vec<String>,
}

/// Build the CSV router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/exports/companies.csv", get(export_companies))
        .route("/v1/exports/sector-details.csv", get(export_sector_details))
        .route("/v1/imports/companies", post(import_company_sheet))
}

fn csv_download(filename: &'static str, body: String) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

/// GET /v1/exports/companies.csv — The company sheet.
#[utoipa::path(
    get,
    path = "/v1/exports/companies.csv",
    responses(
        (status = 200, description = "Company sheet", content_type = "text/csv", body = String),
    ),
    tag = "csv"
)]
pub(crate) async fn export_companies(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let csv = {
        let directory = state.directory.read();
        companies_to_csv(directory.all().into_iter().map(|c| &c.profile))?
    };
    Ok(csv_download("vasp-companies.csv", csv))
}

/// GET /v1/exports/sector-details.csv — One row per stored sector field.
#[utoipa::path(
    get,
    path = "/v1/exports/sector-details.csv",
    responses(
        (status = 200, description = "Sector-details sheet", content_type = "text/csv", body = String),
    ),
    tag = "csv"
)]
pub(crate) async fn export_sector_details(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let csv = {
        let directory = state.directory.read();
        sector_details_to_csv(
            &state.registry,
            directory.all().into_iter().map(|c| &c.profile),
        )?
    };
    Ok(csv_download("vasp-sector-details.csv", csv))
}

/// POST /v1/imports/companies — Create companies from a company sheet.
///
/// Rows are independent: a bad row is reported and the rest still import.
#[utoipa::path(
    post,
    path = "/v1/imports/companies",
    params(("default_sector" = Option<String>, Query, description = "Sector for rows without one")),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Import outcome", body = ImportResponse),
        (status = 400, description = "Unreadable sheet or too many rows", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown default sector", body = crate::error::ErrorBody),
    ),
    tag = "csv"
)]
pub(crate) async fn import_company_sheet(
    State(state): State<AppState>,
    query: Result<Query<ImportParams>, QueryRejection>,
    body: String,
) -> Result<Json<ImportResponse>, AppError> {
    let params = extract_query(query)?;
    let mut options = ImportOptions::default();
    if let Some(sector) = params.default_sector.filter(|s| !s.trim().is_empty()) {
        let sector = SectorId::new(sector.trim())?;
        if !state.registry.contains(&sector) {
            return Err(AppError::Validation(format!("unknown sector {sector}")));
        }
        options.default_sectors = vec![sector];
    }

    let report = import_companies(body.as_bytes(), &state.registry, &options)?;

    let mut created = Vec::with_capacity(report.imported.len());
    let mut conflicts = Vec::new();
    {
        let mut directory = state.directory.write();
        for profile in report.imported {
            let name = profile.name.clone();
            match directory.create(profile) {
                Ok(company) => created.push(company),
                Err(err) => conflicts.push(format!("{name}: {err}")),
            }
        }
    }
    tracing::info!(
        created = created.len(),
        rejected = report.errors.len(),
        conflicts = conflicts.len(),
        "bulk import finished"
    );

    Ok(Json(ImportResponse {
        created,
        rejected: report.errors,
        conflicts,
    }))
}
