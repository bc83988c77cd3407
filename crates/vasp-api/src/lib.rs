//! # vasp-api — Axum API for the VASP Directory
//!
//! HTTP surface over the sector form engine and the company directory.
//!
//! ## API Surface
//!
//! | Prefix                         | Module                 | Domain                 |
//! |--------------------------------|------------------------|------------------------|
//! | `/v1/sectors/*`                | [`routes::sectors`]    | Sector schemas         |
//! | `/v1/companies/*`              | [`routes::companies`]  | Company directory      |
//! | `/v1/exports/*`, `/v1/imports/*` | [`routes::sheets`]   | CSV interchange        |
//! | `/v1/form-sessions/*`          | [`routes::forms`]      | Sector form sessions   |
//! | `/v1/reports/*`                | [`routes::reports`]    | Regulator reports      |
//!
//! ## Middleware Stack
//!
//! ```text
//! TraceLayer → Handler
//! ```
//!
//! ## OpenAPI
//!
//! Generated via utoipa derive macros at `/openapi.json`.

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::sectors::router())
        .merge(routes::companies::router())
        .merge(routes::sheets::router())
        .merge(routes::forms::router())
        .merge(routes::reports::router())
        .merge(openapi::router())
        .layer(middleware::tracing_layer::layer())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 once state is built; the router is only
/// served after that.
async fn readiness() -> &'static str {
    "ready"
}
