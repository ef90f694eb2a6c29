// src/core/app.rs

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info};

use super::catalog::{AnySource, CatalogLoader};
use super::config::Config;
use super::config_loader::default_setup_dir;
use super::planner::Planner;
use super::utils::image::{HttpProbe, ImageResolver};

// Session bootstrap: configuration first, then the catalog, then the planner
pub struct App {
    config: Config,
}

impl App {
    // Loads and validates configuration
    pub fn new() -> Result<Self> {
        info!("Initialising App");
        let config = Config::load().context("Loading application configuration")?;
        Ok(App { config })
    }

    pub fn with_config(config: Config) -> Self {
        App { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // A failed catalog load ends the session; there is no retry
    pub async fn start(&self) -> Result<Planner> {
        let source = AnySource::from_config(&self.config.catalog);
        let (catalog, rooms) = CatalogLoader::new(&source, &self.config.catalog)
            .load()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to load catalog"))
            .context("Loading catalog")?;

        let planner = Planner::new(catalog, rooms, self.config.rooms.clone())
            .context("Building planner")?;
        Ok(planner)
    }

    pub fn image_resolver(&self) -> ImageResolver<HttpProbe> {
        ImageResolver::new(HttpProbe::new(), &self.config.images)
    }

    // Where a setup file goes when the caller gives only a directory (or nothing)
    pub fn setup_path(&self, dir: Option<&Path>) -> PathBuf {
        dir.map(Path::to_path_buf)
            .unwrap_or_else(default_setup_dir)
            .join(&self.config.setup.file_name)
    }
}
