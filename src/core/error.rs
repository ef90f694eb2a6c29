// src/core/error.rs
//! Typed errors raised by the planner core.
//!
//! Placement and room errors reject a single user action and never mutate
//! state. Catalog and setup errors abort a whole load or import, leaving the
//! previously valid in-memory state untouched.

use thiserror::Error;

use super::catalog::SlotSize;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlacementError {
    #[error("slot {slot_id} is already occupied; remove its contents first")]
    AlreadyOccupied { slot_id: String },

    #[error("a {slot_size} miner cannot be placed in {} slot {slot_id}", slot_kind(.is_container))]
    SlotIncompatible {
        slot_id: String,
        slot_size: SlotSize,
        is_container: bool,
    },

    #[error("unknown rack type: {0}")]
    UnknownRack(String),

    #[error("unknown miner type: {0}")]
    UnknownMiner(String),

    #[error("no rack placeholder with id {0}")]
    UnknownPlaceholder(String),

    #[error("no miner slot with id {0}; place its rack first")]
    UnknownSlot(String),

    #[error("nothing is placed in slot {0}")]
    NotPlaced(String),
}

fn slot_kind(is_container: &bool) -> &'static str {
    if *is_container { "container" } else { "leaf" }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoomError {
    #[error("unknown room: {0}")]
    UnknownRoom(String),

    #[error("no room available to use as a template")]
    NoTemplate,

    #[error("room configuration defines no rooms")]
    NoRooms,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error fetching {location}: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {location} returned status {status}")]
    Status { location: String, status: u16 },

    #[error("reading {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {location}: {source}")]
    Json {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing {location}: {message}")]
    Csv { location: String, message: String },

    #[error("{location} row {row}: invalid {field} value {value:?}")]
    InvalidField {
        location: String,
        row: usize,
        field: String,
        value: String,
    },

    #[error("rooms document {0} defines no rooms")]
    NoRooms(String),
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid setup document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("setup document defines no rooms")]
    NoRooms,

    #[error("setup document cannot be replayed: {0}")]
    Replay(#[from] PlacementError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
