//! HTTP metrics registry
//!
//! Holds the three request series behind a dedicated Prometheus recorder.
//! The recorder is never installed as the global `metrics` recorder: every
//! write goes through [`metrics::with_local_recorder`], so each
//! [`HttpMetrics`] instance is an isolated registry that can be passed
//! around explicitly.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use metrics::{
    counter, describe_counter, describe_histogram, histogram, with_local_recorder, Unit,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use tracing::info;

use crate::error::MetricsError;

/// Requests served, labelled by route pattern
pub const REQUESTS_SERIES: &str = "http_requests_total";

/// Responses sent, labelled by status code
pub const STATUS_SERIES: &str = "response_status";

/// Request latency in seconds, labelled by route pattern
pub const LATENCY_SERIES: &str = "http_response_time_seconds";

/// Default latency buckets, matching the Prometheus client libraries
pub const DEFAULT_LATENCY_BUCKETS: [f64; 11] =
    [0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeriesKind {
    Counter,
    Histogram,
}

struct SeriesDescriptor {
    name: &'static str,
    help: &'static str,
    kind: SeriesKind,
}

const HTTP_SERIES: [SeriesDescriptor; 3] = [
    SeriesDescriptor {
        name: REQUESTS_SERIES,
        help: "Total number of HTTP requests.",
        kind: SeriesKind::Counter,
    },
    SeriesDescriptor {
        name: STATUS_SERIES,
        help: "HTTP response status code.",
        kind: SeriesKind::Counter,
    },
    SeriesDescriptor {
        name: LATENCY_SERIES,
        help: "HTTP request latencies in seconds.",
        kind: SeriesKind::Histogram,
    },
];

/// Metrics configuration
#[derive(Debug, Clone, Default)]
pub struct MetricsConfig {
    /// Histogram bucket upper bounds; `None` uses [`DEFAULT_LATENCY_BUCKETS`]
    pub latency_buckets: Option<Vec<f64>>,
}

/// Handle to the HTTP metrics registry
///
/// Cloning is cheap; all clones write to and render the same series.
#[derive(Clone)]
pub struct HttpMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
}

impl HttpMetrics {
    /// Create the registry and register the HTTP series
    ///
    /// Fails on invalid latency buckets; callers treat this as fatal.
    pub fn new(config: &MetricsConfig) -> Result<Self, MetricsError> {
        let buckets = config
            .latency_buckets
            .as_deref()
            .unwrap_or(&DEFAULT_LATENCY_BUCKETS);
        validate_buckets(buckets)?;

        // Without explicit buckets the exporter renders histograms as summaries
        let mut builder = PrometheusBuilder::new();
        for descriptor in HTTP_SERIES
            .iter()
            .filter(|d| d.kind == SeriesKind::Histogram)
        {
            builder =
                builder.set_buckets_for_metric(Matcher::Full(descriptor.name.to_string()), buckets)?;
        }

        let recorder = builder.build_recorder();
        let handle = recorder.handle();

        with_local_recorder(&recorder, || {
            for descriptor in &HTTP_SERIES {
                match descriptor.kind {
                    SeriesKind::Counter => describe_counter!(descriptor.name, descriptor.help),
                    SeriesKind::Histogram => {
                        describe_histogram!(descriptor.name, Unit::Seconds, descriptor.help)
                    }
                }
            }
        });

        info!(
            "Registered {} metric series: {}",
            HTTP_SERIES.len(),
            HTTP_SERIES
                .iter()
                .map(|d| d.name)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            inner: Arc::new(Inner {
                recorder,
                handle,
            }),
        })
    }

    /// Record one completed request
    pub fn record(&self, route: &str, status: StatusCode, elapsed: Duration) {
        let route = route.to_owned();
        let status = status.as_u16().to_string();

        with_local_recorder(&self.inner.recorder, move || {
            counter!(STATUS_SERIES, "status" => status).increment(1);
            counter!(REQUESTS_SERIES, "path" => route.clone()).increment(1);
            histogram!(LATENCY_SERIES, "path" => route).record(elapsed.as_secs_f64());
        });
    }

    /// Render all series in the Prometheus text exposition format
    pub fn render(&self) -> String {
        self.inner.handle.render()
    }
}

fn validate_buckets(buckets: &[f64]) -> Result<(), MetricsError> {
    if buckets.is_empty() {
        return Err(MetricsError::InvalidBuckets("no buckets given".to_string()));
    }
    if let Some(bound) = buckets.iter().find(|b| !b.is_finite()) {
        return Err(MetricsError::InvalidBuckets(format!(
            "bucket bound {} is not finite",
            bound
        )));
    }
    if let Some(pair) = buckets.windows(2).find(|w| w[0] >= w[1]) {
        return Err(MetricsError::InvalidBuckets(format!(
            "bucket bounds must be strictly increasing ({} >= {})",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
