// src/core/utils/image.rs
//! Image URL resolution for items, with a per-resolver cache.
//!
//! Miner pictures live in one of several folders on the content host; the
//! only way to find one is to probe each candidate in order. The first hit
//! wins, and a name with no hit (or only failed probes) resolves to the
//! fallback image. Either outcome is cached, so a name is probed at most once
//! per resolver.
//!
//! Public API:
//!   - ImageResolver::resolve(name) -> String (async, cached)
//!   - ImageResolver::rack_image_url / rack_thumbnail_url / level_overlay_url
//!   - ImageResolver::clear_cache()

use anyhow::Result;
use std::collections::HashMap;
use std::future::Future;
use tracing::{debug, warn};

use crate::core::catalog::Level;
use crate::core::catalog::http_source::join_url;
use crate::core::config::ImageConfig;

/// Answers "does this URL exist?" for the resolver.
pub trait ImageProbe {
    fn exists(&self, url: &str) -> impl Future<Output = Result<bool>>;
}

/// Probe backed by HTTP `HEAD` requests.
pub struct HttpProbe {
    http: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageProbe for HttpProbe {
    async fn exists(&self, url: &str) -> Result<bool> {
        let response = self.http.head(url).send().await?;
        Ok(response.status().is_success())
    }
}

pub struct ImageResolver<P> {
    probe: P,
    base: String,
    miner_dirs: Vec<String>,
    fallback: String,
    racks_dir: String,
    levels_dir: String,
    rack_thumbnail: String,
    // miner name -> resolved URL (hit or fallback)
    cache: HashMap<String, String>,
}

impl<P: ImageProbe> ImageResolver<P> {
    pub fn new(probe: P, cfg: &ImageConfig) -> Self {
        Self {
            probe,
            base: cfg.base().to_string(),
            miner_dirs: cfg.miner_dirs.clone(),
            fallback: cfg.fallback.clone(),
            racks_dir: cfg.racks_dir.clone(),
            levels_dir: cfg.levels_dir.clone(),
            rack_thumbnail: cfg.rack_thumbnail.clone(),
            cache: HashMap::new(),
        }
    }

    /// Candidate URLs for a miner, in probe order.
    pub fn candidates(&self, miner_name: &str) -> Vec<String> {
        let file = format!("{}.png", miner_name.replace(' ', "_"));
        self.miner_dirs
            .iter()
            .map(|dir| join_url(&self.base, &format!("{dir}{file}")))
            .collect()
    }

    pub async fn resolve(&mut self, miner_name: &str) -> String {
        if let Some(url) = self.cache.get(miner_name) {
            return url.clone();
        }

        let mut resolved = None;
        for url in self.candidates(miner_name) {
            match self.probe.exists(&url).await {
                Ok(true) => {
                    resolved = Some(url);
                    break;
                }
                Ok(false) => debug!(%url, "No image at candidate"),
                // Unreachable candidate: keep trying the others
                Err(e) => warn!(%url, error = %e, "Image probe failed"),
            }
        }

        let url = resolved.unwrap_or_else(|| {
            debug!(miner = miner_name, "No image found; using fallback");
            self.fallback_url()
        });
        self.cache.insert(miner_name.to_string(), url.clone());
        url
    }

    pub fn cached(&self, miner_name: &str) -> Option<&str> {
        self.cache.get(miner_name).map(String::as_str)
    }

    /// Clear the cache (public so callers can force a re-probe).
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn fallback_url(&self) -> String {
        join_url(&self.base, &self.fallback)
    }

    pub fn rack_image_url(&self, rack_name: &str) -> String {
        join_url(&self.base, &format!("{}{rack_name}.png", self.racks_dir))
    }

    pub fn rack_thumbnail_url(&self) -> String {
        join_url(&self.base, &self.rack_thumbnail)
    }

    pub fn level_overlay_url(&self, level: Level) -> String {
        join_url(&self.base, &format!("{}lvl{level}.png", self.levels_dir))
    }
}
