//! Application state

use promserve_metrics::HttpMetrics;
use std::path::PathBuf;

/// Everything the router needs to be assembled
#[derive(Clone)]
pub struct AppState {
    pub metrics: HttpMetrics,
    /// File served at `/`
    pub static_file: PathBuf,
    /// Path the exposition endpoint is mounted at
    pub metrics_path: String,
}

impl AppState {
    pub fn new(
        metrics: HttpMetrics,
        static_file: impl Into<PathBuf>,
        metrics_path: impl Into<String>,
    ) -> Self {
        Self {
            metrics,
            static_file: static_file.into(),
            metrics_path: metrics_path.into(),
        }
    }
}
