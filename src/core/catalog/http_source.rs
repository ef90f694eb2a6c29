// src/core/catalog/http_source.rs

use tracing::debug;

use super::source::CatalogSource;
use crate::core::error::CatalogError;

pub struct HttpSource {
    http: reqwest::Client,
    base: String,
}

impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.into(),
        }
    }

    pub fn url_for(&self, location: &str) -> String {
        join_url(&self.base, location)
    }
}

// Absolute URLs pass through, anything else hangs off `base`
pub fn join_url(base: &str, location: &str) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    if base.is_empty() || base.ends_with('/') {
        format!("{base}{location}")
    } else {
        format!("{base}/{location}")
    }
}

impl CatalogSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<String, CatalogError> {
        let url = self.url_for(location);
        debug!(%url, "Fetching catalog document");

        let http_err = |source| CatalogError::Http {
            location: url.clone(),
            source,
        };
        let response = self.http.get(&url).send().await.map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                location: url.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(http_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_locations() {
        assert_eq!(join_url("https://h/x/", "a.csv"), "https://h/x/a.csv");
        assert_eq!(join_url("https://h/x", "a.csv"), "https://h/x/a.csv");
        assert_eq!(join_url("https://h/x/", "https://o/b.csv"), "https://o/b.csv");
    }
}
