//! # HTTP Middleware
//!
//! - `tracing_layer` — per-request tracing spans via `tower_http::trace`.

pub mod tracing_layer;
