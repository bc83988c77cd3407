//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pakistan VASP Directory API",
        version = "0.1.0",
        description = "Sector schemas, company directory, CSV interchange, reports, and server-side sector form sessions.",
        license(name = "BUSL-1.1")
    ),
    paths(
        // Sectors
        crate::routes::sectors::list_sectors,
        crate::routes::sectors::get_sector,
        // Companies
        crate::routes::companies::create_company,
        crate::routes::companies::list_companies,
        crate::routes::companies::get_company,
        crate::routes::companies::update_company,
        crate::routes::companies::delete_company,
        // CSV
        crate::routes::sheets::export_companies,
        crate::routes::sheets::export_sector_details,
        crate::routes::sheets::import_company_sheet,
        // Form sessions
        crate::routes::forms::open_session,
        crate::routes::forms::get_session,
        crate::routes::forms::select_sectors,
        crate::routes::forms::toggle_section,
        crate::routes::forms::apply_edit,
        crate::routes::forms::save_session,
        crate::routes::forms::close_session,
        // Reports
        crate::routes::reports::summary,
    ),
    components(schemas(
        // Error types
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        // Sector DTOs
        crate::routes::sectors::SectorSummary,
        // CSV DTOs
        crate::routes::sheets::ImportResponse,
        // Form DTOs
        crate::routes::forms::FormSessionResponse,
        crate::routes::forms::SelectSectorsRequest,
        crate::routes::forms::EditRequest,
        crate::routes::forms::EditResponse,
    )),
    tags(
        (name = "sectors", description = "Sector schema registry"),
        (name = "companies", description = "Company directory"),
        (name = "csv", description = "CSV export and bulk import"),
        (name = "forms", description = "Sector-specific form sessions"),
        (name = "reports", description = "Directory reports"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
///
/// Serves the OpenAPI JSON document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json — Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_form_session_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v1/form-sessions/{id}/edits"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/sectors/{sector}"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/imports/companies"));
    }

    #[test]
    fn company_writes_declare_a_json_body() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        for (path, method) in [("/v1/companies", "post"), ("/v1/companies/{slug}", "put")] {
            let body = &doc["paths"][path][method]["requestBody"];
            assert!(
                body["content"]["application/json"].is_object(),
                "{method} {path}: {body}"
            );
        }
    }
}
