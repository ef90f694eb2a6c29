// src/core/persistence.rs
//! Save/load of a full editor setup.
//!
//! The document mirrors what the web editor exports (`mining_setup.json`):
//! current room, placed racks (each with its miners), the flat miner map and
//! the complete room configuration. Power is never stored; it is recomputed
//! after a load.
//!
//! Loading never patches live state. The document is replayed into a fresh
//! store and only handed back once every rack and miner has been placed again.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::catalog::{Catalog, RoomsConfig};
use super::config::RoomSettings;
use super::error::SetupError;
use super::placement::{
    PlacedMiner, PlacedRack, PlacementStore, SlotId, place_miner_checked, place_rack_checked,
};

/// Serializable snapshot of an editor setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_room: Option<String>,
    #[serde(default)]
    pub placed_racks: IndexMap<SlotId, PlacedRack>,
    #[serde(default)]
    pub placed_miners: IndexMap<SlotId, PlacedMiner>,
    pub rooms_config: RoomsConfig,
}

/// State rebuilt from a document, ready to replace the live one
#[derive(Debug, Clone)]
pub struct RestoredSetup {
    pub current_room: String,
    pub rooms: RoomsConfig,
    pub store: PlacementStore,
}

pub fn serialize(current_room: &str, store: &PlacementStore, rooms: &RoomsConfig) -> SetupDocument {
    SetupDocument {
        current_room: Some(current_room.to_string()),
        placed_racks: store.racks().clone(),
        placed_miners: store.miners().clone(),
        rooms_config: rooms.clone(),
    }
}

pub fn to_json(doc: &SetupDocument) -> Result<String, SetupError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

pub fn parse(text: &str) -> Result<SetupDocument, SetupError> {
    Ok(serde_json::from_str(text)?)
}

pub fn deserialize(
    text: &str,
    catalog: &Catalog,
    settings: &RoomSettings,
) -> Result<RestoredSetup, SetupError> {
    restore(parse(text)?, catalog, settings)
}

/// Replays a document: racks in document order, then miners in slot order so
/// containers are filled before their children.
pub fn restore(
    doc: SetupDocument,
    catalog: &Catalog,
    settings: &RoomSettings,
) -> Result<RestoredSetup, SetupError> {
    let rooms = doc.rooms_config;
    if rooms.rooms.is_empty() {
        return Err(SetupError::NoRooms);
    }

    let current_room = match doc.current_room {
        Some(room) if rooms.contains(&room) => room,
        requested => {
            let fallback = fallback_room(&rooms, settings);
            warn!(?requested, %fallback, "Saved room unknown; falling back");
            fallback
        }
    };

    let mut store = PlacementStore::new();
    for (slot_id, rack) in &doc.placed_racks {
        place_rack_checked(&mut store, catalog, &rooms, slot_id, &rack.rack_type)?;
    }

    // The flat map is authoritative; nested entries only fill its gaps
    let mut miners: Vec<(SlotId, PlacedMiner)> = doc.placed_miners.into_iter().collect();
    for rack in doc.placed_racks.into_values() {
        for (slot_id, miner) in rack.miners {
            if !miners.iter().any(|(id, _)| *id == slot_id) {
                miners.push((slot_id, miner));
            }
        }
    }
    miners.sort_by_key(|(slot_id, _)| store.slot(slot_id).map_or(usize::MAX, |s| s.order));

    for (slot_id, miner) in &miners {
        place_miner_checked(&mut store, catalog, slot_id, &miner.miner_type, miner.level)?;
    }

    info!(
        %current_room,
        racks = store.racks().len(),
        miners = store.miners().len(),
        "Setup restored"
    );
    Ok(RestoredSetup {
        current_room,
        rooms,
        store,
    })
}

// Configured default room when it exists, otherwise the first room
pub fn fallback_room(rooms: &RoomsConfig, settings: &RoomSettings) -> String {
    if rooms.contains(&settings.default_room) {
        return settings.default_room.clone();
    }
    rooms.room_ids().next().unwrap_or_default().to_string()
}

pub fn write_file(dir: &Path, file_name: &str, doc: &SetupDocument) -> Result<PathBuf, SetupError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, to_json(doc)?)?;
    info!(?path, "Setup exported");
    Ok(path)
}

pub fn read_file(path: &Path) -> Result<String, SetupError> {
    Ok(fs::read_to_string(path)?)
}
