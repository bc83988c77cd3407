//! # Company Directory API
//!
//! CRUD over directory entries. Companies are addressed by slug; the slug
//! is derived from the name at creation and never changes.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use vasp_directory::{Company, CompanyFilter, NewCompany};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_query};
use crate::state::AppState;

/// Build the companies router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/companies", get(list_companies).post(create_company))
        .route(
            "/v1/companies/:slug",
            get(get_company).put(update_company).delete(delete_company),
        )
}

/// POST /v1/companies — Add a company to the directory.
#[utoipa::path(
    post,
    path = "/v1/companies",
    request_body(content = Object, description = "Company profile", content_type = "application/json"),
    responses(
        (status = 201, description = "Company created"),
        (status = 400, description = "Malformed body", body = crate::error::ErrorBody),
        (status = 409, description = "Slug already taken", body = crate::error::ErrorBody),
        (status = 422, description = "Profile failed validation", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn create_company(
    State(state): State<AppState>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let profile = extract_json(body)?;
    let company = state.directory.write().create(profile)?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /v1/companies — List companies, sorted by name.
#[utoipa::path(
    get,
    path = "/v1/companies",
    params(
        ("sector" = Option<String>, Query, description = "Only companies assigned to this sector"),
        ("pakistan_operations" = Option<bool>, Query, description = "Pakistan operations flag"),
        ("license_status" = Option<String>, Query, description = "Applied, Granted, Suspended, None or Under Review"),
        ("aml_rating" = Option<String>, Query, description = "High, Medium, Low or Not Assessed"),
        ("search" = Option<String>, Query, description = "Case-insensitive match on name or description"),
    ),
    responses(
        (status = 200, description = "Matching companies"),
        (status = 400, description = "Malformed query", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn list_companies(
    State(state): State<AppState>,
    query: Result<Query<CompanyFilter>, QueryRejection>,
) -> Result<Json<Vec<Company>>, AppError> {
    let filter = extract_query(query)?;
    let directory = state.directory.read();
    Ok(Json(directory.list(&filter).into_iter().cloned().collect()))
}

/// GET /v1/companies/:slug — One company.
#[utoipa::path(
    get,
    path = "/v1/companies/{slug}",
    params(("slug" = String, Path, description = "Company slug")),
    responses(
        (status = 200, description = "Company found"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn get_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Company>, AppError> {
    state
        .directory
        .read()
        .get(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("company {slug} not found")))
}

/// PUT /v1/companies/:slug — Replace a company's profile.
#[utoipa::path(
    put,
    path = "/v1/companies/{slug}",
    params(("slug" = String, Path, description = "Company slug")),
    request_body(content = Object, description = "Replacement company profile", content_type = "application/json"),
    responses(
        (status = 200, description = "Company updated"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Profile failed validation", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn update_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> Result<Json<Company>, AppError> {
    let profile = extract_json(body)?;
    let company = state.directory.write().update(&slug, profile)?;
    Ok(Json(company))
}

/// DELETE /v1/companies/:slug — Remove a company.
#[utoipa::path(
    delete,
    path = "/v1/companies/{slug}",
    params(("slug" = String, Path, description = "Company slug")),
    responses(
        (status = 204, description = "Company deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn delete_company(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    state.directory.write().delete(&slug)?;
    Ok(StatusCode::NO_CONTENT)
}
