//! # Sector Form Sessions
//!
//! Server-side state for the sector-specific section of the company editor.
//! A session is opened over one company, holds the selected sectors, their
//! expand/collapse state and a draft of the sector details, and returns the
//! rendered [`SectionsView`] after every change. Nothing reaches the
//! directory until the session is saved. Sessions older than
//! [`SESSION_TTL_HOURS`](crate::state::SESSION_TTL_HOURS) are swept
//! whenever a new one is opened.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use vasp_core::{CompanySlug, FieldKey, SectorId};
use vasp_directory::Company;
use vasp_sector::{FieldChange, FieldEdit, SectionsView};

use crate::error::AppError;
use crate::extractors::{extract_json, extract_validated_json, Validate};
use crate::state::{AppState, FormSession};

// -- Request / Response DTOs --------------------------------------------------

/// A session and its current rendering.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FormSessionResponse {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub company: CompanySlug,
    #[schema(value_type = Vec<String>)]
    pub selected: Vec<SectorId>,
    #[schema(value_type = Object)]
    pub view: SectionsView,
}

impl FormSessionResponse {
    fn render(session: &mut FormSession, state: &AppState) -> Self {
        let view = session.render(&state.registry);
        Self {
            id: session.id,
            company: session.company.clone(),
            selected: session.selected.clone(),
            view,
        }
    }
}

/// Replace the selected sectors.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectSectorsRequest {
    #[schema(value_type = Vec<String>)]
    pub sectors: Vec<SectorId>,
}

impl Validate for SelectSectorsRequest {
    fn validate(&self) -> Result<(), String> {
        for (i, sector) in self.sectors.iter().enumerate() {
            if self.sectors[..i].contains(sector) {
                return Err(format!("sector {sector} selected twice"));
            }
        }
        Ok(())
    }
}

/// One user action on a rendered field.
#[derive(Debug, Deserialize, ToSchema)]
pub struct EditRequest {
    #[schema(value_type = String)]
    pub sector: SectorId,
    #[schema(value_type = String)]
    pub field: FieldKey,
    /// Tagged by `op`, e.g. `{"op": "set_checked", "checked": true}`.
    #[schema(value_type = Object)]
    pub edit: FieldEdit,
}

/// The change an edit produced and the view after merging it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EditResponse {
    #[schema(value_type = Object)]
    pub change: FieldChange,
    #[schema(value_type = Object)]
    pub view: SectionsView,
}

// -- Router -------------------------------------------------------------------

/// Build the form-session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/companies/:slug/form-sessions", post(open_session))
        .route("/v1/form-sessions/:id", get(get_session).delete(close_session))
        .route("/v1/form-sessions/:id/sectors", put(select_sectors))
        .route("/v1/form-sessions/:id/toggle/:sector", post(toggle_section))
        .route("/v1/form-sessions/:id/edits", post(apply_edit))
        .route("/v1/form-sessions/:id/save", post(save_session))
}

fn session_not_found(id: &Uuid) -> AppError {
    AppError::NotFound(format!("form session {id} not found"))
}

fn require_selected(session: &FormSession, sector: &SectorId) -> Result<(), AppError> {
    if session.selected.contains(sector) {
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "sector {sector} is not selected in form session {}",
            session.id
        )))
    }
}

// -- Handlers -----------------------------------------------------------------

/// POST /v1/companies/:slug/form-sessions — Open a form over a company.
#[utoipa::path(
    post,
    path = "/v1/companies/{slug}/form-sessions",
    params(("slug" = String, Path, description = "Company slug")),
    responses(
        (status = 201, description = "Session opened", body = FormSessionResponse),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn open_session(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<(StatusCode, Json<FormSessionResponse>), AppError> {
    state.sweep_expired_sessions();
    let mut session = {
        let directory = state.directory.read();
        let company = directory
            .get(&slug)
            .ok_or_else(|| AppError::NotFound(format!("company {slug} not found")))?;
        FormSession::open(
            company.slug.clone(),
            company.profile.sectors.clone(),
            company.profile.sector_details.clone(),
        )
    };
    let response = FormSessionResponse::render(&mut session, &state);
    tracing::debug!(session = %session.id, company = %session.company, "form session opened");
    state.form_sessions.insert(session.id, session);
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /v1/form-sessions/:id — Current rendering.
#[utoipa::path(
    get,
    path = "/v1/form-sessions/{id}",
    params(("id" = Uuid, Path, description = "Form session ID")),
    responses(
        (status = 200, description = "Session view", body = FormSessionResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormSessionResponse>, AppError> {
    let mut rendered = None;
    state
        .form_sessions
        .update(&id, |session| {
            rendered = Some(FormSessionResponse::render(session, &state));
        })
        .ok_or_else(|| session_not_found(&id))?;
    rendered.map(Json).ok_or_else(|| session_not_found(&id))
}

/// PUT /v1/form-sessions/:id/sectors — Replace the selected sectors.
///
/// Sectors selected for the first time open expanded. Draft values of
/// deselected sectors are kept until save.
#[utoipa::path(
    put,
    path = "/v1/form-sessions/{id}/sectors",
    params(("id" = Uuid, Path, description = "Form session ID")),
    request_body = SelectSectorsRequest,
    responses(
        (status = 200, description = "Session view", body = FormSessionResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Unknown or repeated sector", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn select_sectors(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<SelectSectorsRequest>, JsonRejection>,
) -> Result<Json<FormSessionResponse>, AppError> {
    let req = extract_validated_json(body)?;
    if let Some(unknown) = req.sectors.iter().find(|s| !state.registry.contains(s)) {
        return Err(AppError::Validation(format!("unknown sector {unknown}")));
    }
    state
        .form_sessions
        .try_update(&id, |session| -> Result<_, AppError> {
            session.selected = req.sectors;
            Ok(FormSessionResponse::render(session, &state))
        })
        .ok_or_else(|| session_not_found(&id))?
        .map(Json)
}

/// POST /v1/form-sessions/:id/toggle/:sector — Flip a section open or closed.
#[utoipa::path(
    post,
    path = "/v1/form-sessions/{id}/toggle/{sector}",
    params(
        ("id" = Uuid, Path, description = "Form session ID"),
        ("sector" = String, Path, description = "Selected sector id"),
    ),
    responses(
        (status = 200, description = "Session view", body = FormSessionResponse),
        (status = 404, description = "Session not found or sector not selected", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn toggle_section(
    State(state): State<AppState>,
    Path((id, sector)): Path<(Uuid, String)>,
) -> Result<Json<FormSessionResponse>, AppError> {
    let sector = SectorId::new(sector.as_str())
        .map_err(|_| AppError::NotFound(format!("sector {sector} not found")))?;
    state
        .form_sessions
        .try_update(&id, |session| -> Result<_, AppError> {
            require_selected(session, &sector)?;
            let now = session.controller.toggle(&sector);
            tracing::debug!(session = %id, %sector, state = %now, "section toggled");
            Ok(FormSessionResponse::render(session, &state))
        })
        .ok_or_else(|| session_not_found(&id))?
        .map(Json)
}

/// POST /v1/form-sessions/:id/edits — Apply one field edit to the draft.
#[utoipa::path(
    post,
    path = "/v1/form-sessions/{id}/edits",
    params(("id" = Uuid, Path, description = "Form session ID")),
    request_body = EditRequest,
    responses(
        (status = 200, description = "Change applied", body = EditResponse),
        (status = 404, description = "Unknown session, sector or field", body = crate::error::ErrorBody),
        (status = 409, description = "Field is hidden by its condition", body = crate::error::ErrorBody),
        (status = 422, description = "Edit does not fit the field", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn apply_edit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<EditResponse>, AppError> {
    let req = extract_json(body)?;
    state
        .form_sessions
        .try_update(&id, |session| -> Result<_, AppError> {
            require_selected(session, &req.sector)?;
            let mut emitted = None;
            session.controller.handle_edit(
                &state.registry,
                &session.draft,
                &req.sector,
                &req.field,
                req.edit,
                |change| emitted = Some(change),
            )?;
            let change = emitted
                .ok_or_else(|| AppError::Internal("edit accepted without a change".into()))?;
            session.draft = session.draft.apply(&change);
            let view = session.render(&state.registry);
            Ok(EditResponse { change, view })
        })
        .ok_or_else(|| session_not_found(&id))?
        .map(Json)
}

/// POST /v1/form-sessions/:id/save — Write sectors and draft to the company.
///
/// The stored details are sanitised against the saved sectors, so values
/// left behind by deselected sectors are dropped here. A successful save
/// closes the session; a failed one leaves it open for another attempt.
#[utoipa::path(
    post,
    path = "/v1/form-sessions/{id}/save",
    params(("id" = Uuid, Path, description = "Form session ID")),
    responses(
        (status = 200, description = "Company updated"),
        (status = 404, description = "Session or company not found", body = crate::error::ErrorBody),
        (status = 422, description = "No sectors selected", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn save_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let session = state
        .form_sessions
        .get(&id)
        .ok_or_else(|| session_not_found(&id))?;
    let slug = session.company.as_str();

    let mut directory = state.directory.write();
    let mut profile = directory
        .get(slug)
        .map(|c| c.profile.clone())
        .ok_or_else(|| AppError::NotFound(format!("company {slug} not found")))?;

    let company = if profile.sectors == session.selected {
        directory.update_sector_details(slug, session.draft)?
    } else {
        profile.sectors = session.selected;
        profile.sector_details = session.draft;
        directory.update(slug, profile)?
    };
    state.form_sessions.remove(&id);
    tracing::info!(session = %id, company = %company.slug, "form session saved");
    Ok(Json(company))
}

/// DELETE /v1/form-sessions/:id — Discard a session and its draft.
#[utoipa::path(
    delete,
    path = "/v1/form-sessions/{id}",
    params(("id" = Uuid, Path, description = "Form session ID")),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "forms"
)]
pub(crate) async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .form_sessions
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| session_not_found(&id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> SectorId {
        SectorId::new(s).unwrap()
    }

    #[test]
    fn select_request_rejects_duplicates() {
        let req = SelectSectorsRequest {
            sectors: vec![sid("derivatives"), sid("custody-services"), sid("derivatives")],
        };
        let err = req.validate().unwrap_err();
        assert!(err.contains("derivatives"), "{err}");
    }

    #[test]
    fn select_request_allows_empty() {
        let req = SelectSectorsRequest { sectors: vec![] };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn edit_request_parses_tagged_edit() {
        let req: EditRequest = serde_json::from_value(serde_json::json!({
            "sector": "custody-services",
            "field": "insurance_coverage",
            "edit": { "op": "set_checked", "checked": true }
        }))
        .unwrap();
        assert_eq!(req.sector, sid("custody-services"));
        assert_eq!(req.edit, FieldEdit::SetChecked { checked: true });
    }

    #[tokio::test]
    async fn save_closes_the_session() {
        let state = AppState::new();
        state
            .directory
            .write()
            .create(vasp_directory::NewCompany::new(
                "Rain Pakistan",
                "Karachi",
                vec![sid("exchange-services")],
            ))
            .unwrap();

        let (_, Json(opened)) = open_session(State(state.clone()), Path("rain-pakistan".into()))
            .await
            .unwrap();
        assert_eq!(state.form_sessions.len(), 1);

        save_session(State(state.clone()), Path(opened.id)).await.unwrap();
        assert!(state.form_sessions.is_empty());
        assert!(matches!(
            save_session(State(state), Path(opened.id)).await,
            Err(AppError::NotFound(_))
        ));
    }
}
