//! Prometheus metrics endpoint

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use promserve_metrics::HttpMetrics;

/// Content type of the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Create metrics routes mounted at `path`
pub fn routes(path: &str, metrics: HttpMetrics) -> Router {
    Router::new()
        .route(path, get(get_metrics))
        .with_state(metrics)
}

/// GET <metrics path> - Prometheus metrics endpoint
async fn get_metrics(State(metrics): State<HttpMetrics>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        metrics.render(),
    )
}
