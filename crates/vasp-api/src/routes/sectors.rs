//! # Sector Schema API
//!
//! Read-only access to the sector registry the server was started with.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vasp_core::SectorId;
use vasp_sector::{SectorIcon, SectorSchema};

use crate::error::AppError;
use crate::state::AppState;

/// One registry entry, without its fields.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SectorSummary {
    #[schema(value_type = String)]
    pub sector_id: SectorId,
    pub title: String,
    #[schema(value_type = String)]
    pub icon: SectorIcon,
    pub field_count: usize,
}

impl From<&SectorSchema> for SectorSummary {
    fn from(schema: &SectorSchema) -> Self {
        Self {
            sector_id: schema.sector_id.clone(),
            title: schema.title.clone(),
            icon: schema.icon,
            field_count: schema.fields.len(),
        }
    }
}

/// Build the sectors router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/sectors", get(list_sectors))
        .route("/v1/sectors/:sector", get(get_sector))
}

/// GET /v1/sectors — Every sector in registry order.
#[utoipa::path(
    get,
    path = "/v1/sectors",
    responses(
        (status = 200, description = "Sector summaries", body = Vec<SectorSummary>),
    ),
    tag = "sectors"
)]
pub(crate) async fn list_sectors(State(state): State<AppState>) -> Json<Vec<SectorSummary>> {
    Json(state.registry.schemas().iter().map(SectorSummary::from).collect())
}

/// GET /v1/sectors/:sector — Full schema of one sector.
#[utoipa::path(
    get,
    path = "/v1/sectors/{sector}",
    params(("sector" = String, Path, description = "Sector id, e.g. exchange-services")),
    responses(
        (status = 200, description = "Sector schema"),
        (status = 404, description = "Unknown sector", body = crate::error::ErrorBody),
    ),
    tag = "sectors"
)]
pub(crate) async fn get_sector(
    State(state): State<AppState>,
    Path(sector): Path<String>,
) -> Result<Json<SectorSchema>, AppError> {
    SectorId::new(sector.as_str())
        .ok()
        .and_then(|id| state.registry.lookup(&id).cloned())
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("sector {sector} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use vasp_sector::SectorRegistry;

    #[test]
    fn summary_counts_fields() {
        let schema = SectorRegistry::builtin().schemas()[0].clone();
        let summary = SectorSummary::from(&schema);
        assert_eq!(summary.sector_id, schema.sector_id);
        assert_eq!(summary.field_count, schema.fields.len());
    }
}
