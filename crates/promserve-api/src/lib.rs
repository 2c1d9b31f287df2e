//! Promserve HTTP API
//!
//! This crate assembles the Axum router for Promserve: the static index
//! page and the Prometheus exposition endpoint, both wrapped in the request
//! instrumentation middleware.

pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
