//! Serves the single-page application and its assets.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;

/// Files under the static root are served as they are. Every other path,
/// including ones that would leave the root, gets the entry document so the
/// front-end router can take over.
pub fn app_service(config: &StaticFilesConfig) -> ServeDir<ServeFile> {
    let root = Path::new(&config.root);
    ServeDir::new(root)
        .append_index_html_on_directories(false)
        .fallback(ServeFile::new(root.join(&config.index)))
}
