// src/core/utils/mod.rs

pub mod image;
