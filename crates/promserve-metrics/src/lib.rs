//! Promserve request metrics
//!
//! This crate provides the per-request instrumentation for Promserve:
//! a status-capturing wrapper around the downstream service, the
//! Prometheus-backed registry holding the HTTP series, and the Axum
//! middleware tying the two together.

pub mod capture;
pub mod error;
pub mod middleware;
pub mod registry;

pub use capture::StatusCapture;
pub use error::MetricsError;
pub use middleware::{track_metrics, UNMATCHED_ROUTE};
pub use registry::{
    HttpMetrics, MetricsConfig, DEFAULT_LATENCY_BUCKETS, LATENCY_SERIES, REQUESTS_SERIES,
    STATUS_SERIES,
};
