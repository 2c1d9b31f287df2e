//! Request instrumentation middleware for Axum

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::debug;

use crate::capture::StatusCapture;
use crate::registry::HttpMetrics;

/// Route label used when the router matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Instrumentation middleware
///
/// Times the rest of the handler chain, captures the status it responds
/// with, and records the request into [`HttpMetrics`] keyed by the matched
/// route pattern. Must be installed with `Router::layer` (or
/// `route_layer`) so that routing has already happened.
///
/// Nothing is recorded if the handler chain panics.
pub async fn track_metrics(
    State(metrics): State<HttpMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let start = Instant::now();
    let mut capture = StatusCapture::new(next);

    let response = match capture.run(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };

    let status = capture.status();
    let elapsed = start.elapsed();
    metrics.record(&route, status, elapsed);

    debug!(
        "Recorded {} {} in {:.3}ms",
        route,
        status.as_u16(),
        elapsed.as_secs_f64() * 1000.0
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    use crate::registry::MetricsConfig;

    fn sample(rendered: &str, series: &str) -> Option<f64> {
        rendered.lines().find_map(|line| {
            line.strip_prefix(series)
                .and_then(|rest| rest.strip_prefix(' '))
                .and_then(|value| value.trim().parse().ok())
        })
    }

    fn test_app(metrics: HttpMetrics) -> Router {
        Router::new()
            .route("/", get(|| async { "index" }))
            .route("/items/{id}", get(|| async { StatusCode::NO_CONTENT }))
            .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
            .layer(from_fn_with_state(metrics, track_metrics))
    }

    async fn send(app: &Router, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_records_matched_route_pattern() {
        let metrics = HttpMetrics::new(&MetricsConfig::default()).unwrap();
        let app = test_app(metrics.clone());

        assert_eq!(send(&app, "/items/1").await, StatusCode::NO_CONTENT);
        assert_eq!(send(&app, "/items/2").await, StatusCode::NO_CONTENT);

        let rendered = metrics.render();
        assert_eq!(
            sample(&rendered, r#"http_requests_total{path="/items/{id}"}"#),
            Some(2.0)
        );
        assert_eq!(sample(&rendered, r#"response_status{status="204"}"#), Some(2.0));
        assert_eq!(
            sample(&rendered, r#"http_response_time_seconds_count{path="/items/{id}"}"#),
            Some(2.0)
        );
        assert!(!rendered.contains(r#"path="/items/1""#));
    }

    #[tokio::test]
    async fn test_records_handler_status() {
        let metrics = HttpMetrics::new(&MetricsConfig::default()).unwrap();
        let app = test_app(metrics.clone());

        assert_eq!(send(&app, "/teapot").await, StatusCode::IM_A_TEAPOT);
        assert_eq!(send(&app, "/").await, StatusCode::OK);

        let rendered = metrics.render();
        assert_eq!(sample(&rendered, r#"response_status{status="418"}"#), Some(1.0));
        assert_eq!(sample(&rendered, r#"response_status{status="200"}"#), Some(1.0));
        assert_eq!(sample(&rendered, r#"http_requests_total{path="/teapot"}"#), Some(1.0));
        assert_eq!(sample(&rendered, r#"http_requests_total{path="/"}"#), Some(1.0));
    }

    #[tokio::test]
    async fn test_unmatched_route_uses_constant_label() {
        let metrics = HttpMetrics::new(&MetricsConfig::default()).unwrap();
        let app = test_app(metrics.clone());

        assert_eq!(send(&app, "/nope/123").await, StatusCode::NOT_FOUND);

        let rendered = metrics.render();
        assert_eq!(
            sample(&rendered, r#"http_requests_total{path="unmatched"}"#),
            Some(1.0)
        );
        assert_eq!(sample(&rendered, r#"response_status{status="404"}"#), Some(1.0));
        assert_eq!(
            sample(&rendered, r#"http_response_time_seconds_count{path="unmatched"}"#),
            Some(1.0)
        );
        assert!(!rendered.contains(r#"path="/nope/123""#));
    }
}
