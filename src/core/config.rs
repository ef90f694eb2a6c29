// src/core/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::catalog::SourceKind;

use tracing::info;

use super::config_loader::config_paths;

const DEFAULT_BASE: &str = "https://raw.githubusercontent.com/WhoCares19/whocares19.github.io/main/";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CatalogConfig {
    pub backend: SourceKind,
    // URL prefix (http) or directory (file) every relative location is joined onto
    pub base: String,
    pub rooms: String,
    pub miners: String,
    pub racks: String,
    pub sets: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            backend: SourceKind::Http,
            base: DEFAULT_BASE.to_string(),
            rooms: "Rooms.json".to_string(),
            miners: "All_Miners.csv".to_string(),
            racks: "Racks.csv".to_string(),
            sets: Some("Sets.csv".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    // Falls back to `catalog.base` when unset
    pub base: Option<String>,
    // Probed in order, first hit wins
    pub miner_dirs: Vec<String>,
    pub fallback: String,
    pub racks_dir: String,
    pub levels_dir: String,
    pub rack_thumbnail: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        ImageConfig {
            base: None,
            miner_dirs: (1..=8).map(|n| format!("miners/miners{n}/")).collect(),
            fallback: "miners/default/default_miner.png".to_string(),
            racks_dir: "racks/".to_string(),
            levels_dir: "Levels/".to_string(),
            rack_thumbnail: "rack_thumbnail.png".to_string(),
        }
    }
}

impl ImageConfig {
    pub fn base(&self) -> &str {
        self.base.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RoomSettings {
    pub default_room: String,
    // Room cloned by "add room"; the first room is used when unset or unknown
    pub template_room: Option<String>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        RoomSettings {
            default_room: "Room 1".to_string(),
            template_room: Some("Room 2".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SetupConfig {
    pub file_name: String,
}

impl Default for SetupConfig {
    fn default() -> Self {
        SetupConfig {
            file_name: "mining_setup.json".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub images: ImageConfig,

    #[serde(default)]
    pub rooms: RoomSettings,

    #[serde(default)]
    pub setup: SetupConfig,
}

impl Config {
    // Loads system default and then overrides with user config, if present
    pub fn load() -> Result<Self> {
        let (system, user) = config_paths();
        info!(system = ?system, user = ?user, "Loading configuration paths");
        Self::load_from(&system, &user)
    }

    pub fn load_from(system: &Path, user: &Path) -> Result<Self> {
        // 1. Read system default, or fall back to built-in defaults
        let mut cfg = if system.exists() {
            info!(path = ?system, "Reading system default config");
            let base = fs::read_to_string(system)
                .with_context(|| format!("Reading system default config at {system:?}"))?;
            toml::from_str(&base).context("Parsing system default config")?
        } else {
            info!(path = ?system, "No system default config; using built-in defaults");
            Config::default()
        };

        // 2. If user config exists, replace every section it defines
        if user.exists() {
            info!(path = ?user, "Overlaying user configuration");
            let overlay = fs::read_to_string(user)
                .with_context(|| format!("Reading user config at {user:?}"))?;
            cfg.overlay(&overlay).context("Parsing user config")?;
        } else {
            info!(path = ?user, "No user config found; using defaults");
        }

        // 3. Fill inherited values, then validate
        let catalog_base = cfg.catalog.base.clone();
        cfg.fill_defaults(&catalog_base);
        cfg.validate()?;

        info!(?cfg, "Configuration loaded successfully");
        Ok(cfg)
    }

    fn overlay(&mut self, text: &str) -> Result<()> {
        let table: toml::Table = toml::from_str(text)?;
        let user: Config = toml::from_str(text)?;

        if table.contains_key("catalog") {
            self.catalog = user.catalog;
        }
        if table.contains_key("images") {
            self.images = user.images;
        }
        if table.contains_key("rooms") {
            self.rooms = user.rooms;
        }
        if table.contains_key("setup") {
            self.setup = user.setup;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.base.trim().is_empty() {
            anyhow::bail!("catalog.base must not be empty");
        }
        if self.rooms.default_room.trim().is_empty() {
            anyhow::bail!("rooms.default_room must not be empty");
        }
        if self.images.miner_dirs.is_empty() {
            anyhow::bail!("images.miner_dirs must list at least one folder");
        }
        if self.setup.file_name.trim().is_empty() {
            anyhow::bail!("setup.file_name must not be empty");
        }
        Ok(())
    }
}

pub trait FillDefaults {
    // Copies the catalog base into any section that leaves its own unset
    fn fill_defaults(&mut self, catalog_base: &str);
}

impl FillDefaults for ImageConfig {
    fn fill_defaults(&mut self, catalog_base: &str) {
        if self.base.as_deref().is_none_or(|b| b.trim().is_empty()) {
            self.base = Some(catalog_base.to_string());
        }
    }
}

impl FillDefaults for Config {
    fn fill_defaults(&mut self, catalog_base: &str) {
        self.images.fill_defaults(catalog_base);
    }
}
