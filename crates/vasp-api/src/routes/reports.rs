//! # Directory Reports API
//!
//! The regulator's summary: headline totals, per-sector breakdown and
//! companies grouped by licence status.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use vasp_directory::DirectoryReport;

use crate::state::AppState;

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/reports/summary", get(summary))
}

/// GET /v1/reports/summary — Summary report over every company.
#[utoipa::path(
    get,
    path = "/v1/reports/summary",
    responses(
        (status = 200, description = "Directory report"),
    ),
    tag = "reports"
)]
pub(crate) async fn summary(State(state): State<AppState>) -> Json<DirectoryReport> {
    let directory = state.directory.read();
    Json(DirectoryReport::build(
        &state.registry,
        directory.all().into_iter().map(|c| &c.profile),
    ))
}
