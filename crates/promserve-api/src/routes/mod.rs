//! API routes

mod content;
pub mod metrics;

use axum::{Router, middleware::from_fn_with_state};
use promserve_metrics::track_metrics;

use crate::state::AppState;

/// Create the main router
///
/// Every route, the exposition endpoint included, is instrumented.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Static index page
        .merge(content::routes(&state.static_file))
        // Prometheus exposition
        .merge(metrics::routes(&state.metrics_path, state.metrics.clone()))
        .layer(from_fn_with_state(state.metrics, track_metrics))
}
