// src/core/catalog/source.rs

use serde::Deserialize;
use std::future::Future;

use super::file_source::FileSource;
use super::http_source::HttpSource;
use crate::core::config::CatalogConfig;
use crate::core::error::CatalogError;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Http,
    File,
}

// Where catalog documents come from. `location` is whatever the config names
// (relative or absolute); each backend resolves it against its own base.
pub trait CatalogSource {
    fn fetch(&self, location: &str) -> impl Future<Output = Result<String, CatalogError>>;
}

// Backend picked from `catalog.backend`
pub enum AnySource {
    Http(HttpSource),
    File(FileSource),
}

impl AnySource {
    pub fn from_config(cfg: &CatalogConfig) -> Self {
        match cfg.backend {
            SourceKind::Http => AnySource::Http(HttpSource::new(&cfg.base)),
            SourceKind::File => AnySource::File(FileSource::new(&cfg.base)),
        }
    }
}

impl CatalogSource for AnySource {
    async fn fetch(&self, location: &str) -> Result<String, CatalogError> {
        match self {
            AnySource::Http(s) => s.fetch(location).await,
            AnySource::File(s) => s.fetch(location).await,
        }
    }
}
