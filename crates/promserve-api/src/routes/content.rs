//! Static index page

use axum::{Router, routing::get_service};
use std::path::Path;
use tower_http::services::ServeFile;

/// Serve `static_file` at `/`
///
/// Content type is inferred from the file extension; a missing file
/// yields 404.
pub fn routes(static_file: &Path) -> Router {
    Router::new().route("/", get_service(ServeFile::new(static_file)))
}
