// src/core/catalog/room.rs
//! Room layouts: background, rack placeholders and the miner slot geometry of
//! every rack configuration a placeholder accepts.
//!
//! All geometry is fractional (0..1) and relative to the parent rectangle.
//! Fields this crate doesn't interpret are kept in `extra` so a document
//! survives a load/save cycle unchanged.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::serde_helpers::string_or_number;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomsConfig {
    pub rooms: IndexMap<String, RoomDefinition>,
    #[serde(default)]
    pub active_room: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomDefinition {
    #[serde(default)]
    pub background_image_b64: String,
    #[serde(default)]
    pub placeholders: Vec<PlaceholderDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderDefinition {
    #[serde(default)]
    pub x_ratio: f64,
    #[serde(default)]
    pub y_ratio: f64,
    #[serde(default)]
    pub width_ratio: f64,
    #[serde(default)]
    pub height_ratio: f64,
    #[serde(default)]
    pub configurations: IndexMap<String, RackConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_active_config_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RackConfiguration {
    #[serde(default)]
    pub miner_slots: Vec<SlotDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub x_ratio_rel: f64,
    #[serde(default)]
    pub y_ratio_rel: f64,
    #[serde(default)]
    pub width_ratio_rel: f64,
    #[serde(default)]
    pub height_ratio_rel: f64,
    // Holds one two-slot miner, or hosts `child_slots`
    #[serde(default)]
    pub is_container: bool,
    #[serde(default)]
    pub child_slots: Vec<ChildSlotDefinition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChildSlotDefinition {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub x_ratio_rel_to_parent: f64,
    #[serde(default)]
    pub y_ratio_rel_to_parent: f64,
    #[serde(default)]
    pub width_ratio_rel_to_parent: f64,
    #[serde(default)]
    pub height_ratio_rel_to_parent: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoomsConfig {
    pub fn placeholder_id(room_id: &str, index: usize) -> String {
        format!("ph-{room_id}-{index}")
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    /// Placeholders of `room_id` paired with their slot ids, in layout order.
    pub fn placeholders(&self, room_id: &str) -> Option<Vec<(String, &PlaceholderDefinition)>> {
        self.rooms.get(room_id).map(|room| {
            room.placeholders
                .iter()
                .enumerate()
                .map(|(i, ph)| (Self::placeholder_id(room_id, i), ph))
                .collect()
        })
    }

    /// Looks a placeholder up by slot id across every room.
    ///
    /// Room ids may contain dashes, so the id is matched rather than parsed.
    pub fn find_placeholder(&self, slot_id: &str) -> Option<(&str, &PlaceholderDefinition)> {
        self.rooms.iter().find_map(|(room_id, room)| {
            room.placeholders
                .iter()
                .enumerate()
                .find(|(i, _)| Self::placeholder_id(room_id, *i) == slot_id)
                .map(|(_, ph)| (room_id.as_str(), ph))
        })
    }
}

impl PlaceholderDefinition {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x_ratio,
            y: self.y_ratio,
            width: self.width_ratio,
            height: self.height_ratio,
        }
    }

    // The layout a rack dropped here is built with
    pub fn active_configuration(&self) -> Option<&RackConfiguration> {
        self.current_active_config_type
            .as_deref()
            .and_then(|name| self.configurations.get(name))
    }
}

impl SlotDefinition {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x_ratio_rel,
            y: self.y_ratio_rel,
            width: self.width_ratio_rel,
            height: self.height_ratio_rel,
        }
    }
}

impl ChildSlotDefinition {
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x_ratio_rel_to_parent,
            y: self.y_ratio_rel_to_parent,
            width: self.width_ratio_rel_to_parent,
            height: self.height_ratio_rel_to_parent,
        }
    }
}
