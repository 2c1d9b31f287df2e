//! Metrics error types

use metrics_exporter_prometheus::BuildError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Invalid histogram buckets: {0}")]
    InvalidBuckets(String),

    #[error("Exporter error: {0}")]
    Exporter(#[from] BuildError),
}
