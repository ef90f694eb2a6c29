// src/core/catalog/file_source.rs

use std::path::{Path, PathBuf};
use tracing::debug;

use super::source::CatalogSource;
use crate::core::error::CatalogError;

// Reads catalog documents from a local directory, e.g. a checkout of the
// static site
pub struct FileSource {
    base: PathBuf,
}

impl FileSource {
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, location: &str) -> PathBuf {
        // `join` keeps absolute locations as they are
        self.base.join(location)
    }
}

impl CatalogSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<String, CatalogError> {
        let path = self.path_for(location);
        debug!(?path, "Reading catalog document");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CatalogError::Io {
                location: path.display().to_string(),
                source,
            })
    }
}
