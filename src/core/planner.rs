// src/core/planner.rs

use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::catalog::{Catalog, Level, PlaceholderDefinition, RoomsConfig};
use super::config::RoomSettings;
use super::error::{PlacementError, RoomError, SetupError};
use super::persistence::{self, SetupDocument, fallback_room};
use super::placement::{PlacementStore, place_miner_checked, place_rack_checked};
use super::power::{NoSetBonus, PowerBreakdown, SetBonus, compute_breakdown};

// Owns the session: catalog, room layouts, current room and placements.
// Built once the catalog has loaded, so every operation can resolve names.
pub struct Planner {
    catalog: Catalog,
    rooms: RoomsConfig,
    settings: RoomSettings,
    current_room: String,
    store: PlacementStore,
    set_bonus: Box<dyn SetBonus>,
}

impl Planner {
    pub fn new(catalog: Catalog, rooms: RoomsConfig, settings: RoomSettings) -> Result<Self, RoomError> {
        if rooms.rooms.is_empty() {
            return Err(RoomError::NoRooms);
        }
        let current_room = if rooms.contains(&rooms.active_room) {
            rooms.active_room.clone()
        } else {
            fallback_room(&rooms, &settings)
        };
        info!(%current_room, rooms = rooms.rooms.len(), "Planner ready");

        Ok(Planner {
            catalog,
            rooms,
            settings,
            current_room,
            store: PlacementStore::new(),
            set_bonus: Box::new(NoSetBonus),
        })
    }

    pub fn with_set_bonus(mut self, rule: impl SetBonus + 'static) -> Self {
        self.set_bonus = Box::new(rule);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rooms(&self) -> &RoomsConfig {
        &self.rooms
    }

    pub fn current_room(&self) -> &str {
        &self.current_room
    }

    pub fn store(&self) -> &PlacementStore {
        &self.store
    }

    pub fn select_room(&mut self, room_id: &str) -> Result<(), RoomError> {
        if !self.rooms.contains(room_id) {
            return Err(RoomError::UnknownRoom(room_id.to_string()));
        }
        self.current_room = room_id.to_string();
        info!(room = room_id, "Room selected");
        Ok(())
    }

    // Clones the template room as "Room <n>", makes it active and selects it
    pub fn add_room(&mut self) -> Result<String, RoomError> {
        let template = self
            .settings
            .template_room
            .as_deref()
            .and_then(|id| self.rooms.rooms.get(id))
            .or_else(|| self.rooms.rooms.values().next())
            .cloned()
            .ok_or(RoomError::NoTemplate)?;

        let mut n = self.rooms.rooms.len() + 1;
        while self.rooms.contains(&format!("Room {n}")) {
            n += 1;
        }
        let room_id = format!("Room {n}");

        self.rooms.rooms.insert(room_id.clone(), template);
        self.rooms.active_room = room_id.clone();
        self.current_room = room_id.clone();
        info!(room = %room_id, "Room added");
        Ok(room_id)
    }

    pub fn placeholders(&self, room_id: &str) -> Result<Vec<(String, &PlaceholderDefinition)>, RoomError> {
        self.rooms
            .placeholders(room_id)
            .ok_or_else(|| RoomError::UnknownRoom(room_id.to_string()))
    }

    pub fn place_rack(&mut self, slot_id: &str, rack_name: &str) -> Result<(), PlacementError> {
        place_rack_checked(&mut self.store, &self.catalog, &self.rooms, slot_id, rack_name)
            .inspect_err(|e| warn!(slot_id, rack = rack_name, error = %e, "Rack placement rejected"))
    }

    pub fn place_miner(&mut self, slot_id: &str, miner_name: &str, level: Level) -> Result<(), PlacementError> {
        place_miner_checked(&mut self.store, &self.catalog, slot_id, miner_name, level)
            .inspect_err(|e| warn!(slot_id, miner = miner_name, error = %e, "Miner placement rejected"))
    }

    pub fn remove_rack(&mut self, slot_id: &str) -> Result<(), PlacementError> {
        self.store.remove_rack(slot_id).map(|_| ())
    }

    pub fn remove_miner(&mut self, slot_id: &str) -> Result<(), PlacementError> {
        self.store.remove_miner(slot_id).map(|_| ())
    }

    pub fn power_breakdown(&self) -> PowerBreakdown {
        compute_breakdown(&self.store, &self.catalog, self.set_bonus.as_ref())
    }

    pub fn total_power(&self) -> f64 {
        self.power_breakdown().total()
    }

    pub fn export_setup(&self) -> SetupDocument {
        persistence::serialize(&self.current_room, &self.store, &self.rooms)
    }

    /// Replaces the session with the setup in `text`.
    ///
    /// On error the current rooms, room selection and placements are kept.
    pub fn import_setup(&mut self, text: &str) -> Result<(), SetupError> {
        let restored = persistence::deserialize(text, &self.catalog, &self.settings)
            .inspect_err(|e| warn!(error = %e, "Setup import rejected"))?;

        self.rooms = restored.rooms;
        self.current_room = restored.current_room;
        self.store = restored.store;
        info!(room = %self.current_room, total_power = self.total_power(), "Setup imported");
        Ok(())
    }

    pub fn save_setup(&self, dir: &Path, file_name: &str) -> Result<PathBuf, SetupError> {
        persistence::write_file(dir, file_name, &self.export_setup())
    }

    pub fn load_setup(&mut self, path: &Path) -> Result<(), SetupError> {
        let text = persistence::read_file(path)?;
        self.import_setup(&text)
    }

    // Returns whether a setup was found; a missing file leaves the session empty
    pub fn load_setup_if_present(&mut self, path: &Path) -> Result<bool, SetupError> {
        if !path.exists() {
            info!(?path, "No saved setup");
            return Ok(false);
        }
        self.load_setup(path)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{MinerDefinition, RackDefinition, SlotSize};
    use std::collections::BTreeMap;

    fn planner() -> Planner {
        let rooms: RoomsConfig = serde_json::from_str(
            r#"{"active_room": "Room 1", "rooms": {
                "Room 1": {"placeholders": [{"current_active_config_type": "s",
                    "configurations": {"s": {"miner_slots": [{"id": "0"}]}}}]},
                "Room 2": {"background_image_b64": "tmpl", "placeholders": []}
            }}"#,
        )
        .unwrap();
        let catalog = Catalog {
            miners: vec![MinerDefinition {
                name: "M".into(),
                slot_size: SlotSize::OneSlot,
                levels: BTreeMap::new(),
            }],
            racks: vec![RackDefinition {
                name: "R".into(),
                bonus_percent: None,
                set_name: None,
            }],
            sets: Vec::new(),
        };
        Planner::new(catalog, rooms, RoomSettings::default()).unwrap()
    }

    #[test]
    fn starts_in_active_room() {
        assert_eq!(planner().current_room(), "Room 1");
    }

    #[test]
    fn unknown_names_rejected() {
        let mut p = planner();
        assert_eq!(
            p.place_rack("ph-Room 1-0", "Nope"),
            Err(PlacementError::UnknownRack("Nope".into()))
        );
        assert_eq!(
            p.place_rack("ph-Room 1-5", "R"),
            Err(PlacementError::UnknownPlaceholder("ph-Room 1-5".into()))
        );
        p.place_rack("ph-Room 1-0", "R").unwrap();
        assert_eq!(
            p.place_miner("ph-Room 1-0-0", "Nope", Level(1)),
            Err(PlacementError::UnknownMiner("Nope".into()))
        );
    }

    #[test]
    fn add_room_clones_template() {
        let mut p = planner();
        let id = p.add_room().unwrap();
        assert_eq!(id, "Room 3");
        assert_eq!(p.current_room(), "Room 3");
        assert_eq!(p.rooms().active_room, "Room 3");
        assert_eq!(p.rooms().rooms[&id].background_image_b64, "tmpl");
        assert_eq!(p.add_room().unwrap(), "Room 4");
    }

    #[test]
    fn select_unknown_room_keeps_current() {
        let mut p = planner();
        assert!(p.select_room("Room 9").is_err());
        assert_eq!(p.current_room(), "Room 1");
        p.select_room("Room 2").unwrap();
        assert_eq!(p.current_room(), "Room 2");
    }

    #[test]
    fn failed_import_keeps_state() {
        let mut p = planner();
        p.place_rack("ph-Room 1-0", "R").unwrap();
        p.place_miner("ph-Room 1-0-0", "M", Level(1)).unwrap();
        p.select_room("Room 2").unwrap();
        let before = p.store().clone();

        assert!(p.import_setup("{\"currentRoom\": ").is_err());
        assert_eq!(p.current_room(), "Room 2");
        assert_eq!(p.store(), &before);
    }
}
