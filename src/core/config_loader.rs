// src/core/config_loader.rs

use directories::BaseDirs;
use std::path::{Path, PathBuf};

// Environment override for the system default, mostly for packaging and tests
pub const SYSTEM_CONFIG_ENV: &str = "RIG_PLANNER_DEFAULT_CONFIG";

pub fn config_paths() -> (PathBuf, PathBuf) {
    // 1. System default: explicit override, then directory of the binary
    let mut system_default = match std::env::var_os(SYSTEM_CONFIG_ENV) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|d| d.join("default.toml")))
            .unwrap_or_else(|| PathBuf::from("default.toml")),
    };

    // **Fallback for development**
    // If the system default isn't there, use the project's
    // `config/default.toml` via CARGO_MANIFEST_DIR
    if !system_default.exists() {
        let fallback = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("config")
            .join("default.toml");
        if fallback.exists() {
            system_default = fallback;
        }
    }

    // 2. User override in XDG_CONFIG_HOME/rig-planner/config.toml
    let user_config = BaseDirs::new()
        .map(|d| d.config_dir().join("rig-planner").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config/config.toml"));

    (system_default, user_config)
}

// Directory exported setups land in when the caller doesn't pick one
pub fn default_setup_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.data_dir().join("rig-planner"))
        .unwrap_or_else(|| PathBuf::from("."))
}
