// src/core/mod.rs

pub mod app;
pub mod catalog;
pub mod config;
pub mod config_loader;
pub mod error;
pub mod inventory;
pub mod persistence;
pub mod placement;
pub mod planner;
pub mod power;
pub mod rules;
pub mod serde_helpers;

pub mod utils;
