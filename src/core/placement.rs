// src/core/placement.rs
//! In-memory record of what sits where.
//!
//! Racks occupy room placeholders (`ph-<room>-<n>`); placing a rack opens the
//! miner slots of the placeholder's active configuration, and miners then
//! occupy those slots. Every placed miner is held twice: in the flat
//! `miners` map and in its rack's own `miners` map, which is the shape saved
//! setups use.
//!
//! A container slot takes either one two-slot miner or miners in its child
//! slots, never both.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::catalog::{
    Catalog, Level, PlaceholderDefinition, RackConfiguration, RoomsConfig, SlotSize,
};
use super::error::PlacementError;
use super::rules::can_place;

pub type SlotId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRack {
    #[serde(rename = "type")]
    pub rack_type: String,
    // Placeholder layout the rack was built from
    #[serde(default)]
    pub config: PlaceholderDefinition,
    #[serde(default)]
    pub miners: IndexMap<SlotId, PlacedMiner>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedMiner {
    #[serde(rename = "type")]
    pub miner_type: String,
    #[serde(default)]
    pub level: Level,
    pub slot: SlotId,
    #[serde(rename = "parentRackId")]
    pub parent_rack_id: SlotId,
}

// A miner slot opened by a placed rack
#[derive(Debug, Clone, PartialEq)]
pub struct MinerSlot {
    pub id: SlotId,
    pub parent_rack_id: SlotId,
    pub is_container: bool,
    // Set on child slots: the container they sit in
    pub container_id: Option<SlotId>,
    pub children: Vec<SlotId>,
    // Creation order; containers always precede their children
    pub order: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementStore {
    racks: IndexMap<SlotId, PlacedRack>,
    miners: IndexMap<SlotId, PlacedMiner>,
    slots: IndexMap<SlotId, MinerSlot>,
    next_order: usize,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn racks(&self) -> &IndexMap<SlotId, PlacedRack> {
        &self.racks
    }

    pub fn miners(&self) -> &IndexMap<SlotId, PlacedMiner> {
        &self.miners
    }

    pub fn rack(&self, slot_id: &str) -> Option<&PlacedRack> {
        self.racks.get(slot_id)
    }

    pub fn miner(&self, slot_id: &str) -> Option<&PlacedMiner> {
        self.miners.get(slot_id)
    }

    pub fn slot(&self, slot_id: &str) -> Option<&MinerSlot> {
        self.slots.get(slot_id)
    }

    /// Miner slots opened by the rack in `rack_id`, in layout order.
    pub fn slots_of<'a>(&'a self, rack_id: &'a str) -> impl Iterator<Item = &'a MinerSlot> + 'a {
        self.slots
            .values()
            .filter(move |s| s.parent_rack_id == rack_id)
    }

    pub fn is_empty(&self) -> bool {
        self.racks.is_empty()
    }

    /// Puts `rack_name` into placeholder `slot_id` and opens its miner slots.
    pub fn place_rack(
        &mut self,
        slot_id: &str,
        rack_name: &str,
        placeholder: &PlaceholderDefinition,
    ) -> Result<(), PlacementError> {
        if self.racks.contains_key(slot_id) {
            return Err(PlacementError::AlreadyOccupied {
                slot_id: slot_id.to_string(),
            });
        }

        let layout = match placeholder.active_configuration() {
            Some(layout) => layout_slots(slot_id, layout),
            None => {
                warn!(
                    slot_id,
                    config = ?placeholder.current_active_config_type,
                    "Placeholder has no active configuration; rack opens no miner slots"
                );
                Vec::new()
            }
        };
        // Slot ids already opened by another rack stay with that rack
        if let Some(taken) = layout.iter().find(|s| self.slots.contains_key(&s.id)) {
            return Err(PlacementError::AlreadyOccupied {
                slot_id: taken.id.clone(),
            });
        }
        for slot in layout {
            if self.slots.contains_key(&slot.id) {
                warn!(slot_id = %slot.id, rack_id = slot_id, "Duplicate slot id in layout; skipped");
                continue;
            }
            self.open_slot(slot);
        }

        self.racks.insert(
            slot_id.to_string(),
            PlacedRack {
                rack_type: rack_name.to_string(),
                config: placeholder.clone(),
                miners: IndexMap::new(),
            },
        );
        info!(slot_id, rack = rack_name, "Rack placed");
        Ok(())
    }

    fn open_slot(&mut self, mut slot: MinerSlot) {
        slot.order = self.next_order;
        self.next_order += 1;
        debug!(
            slot_id = %slot.id,
            rack_id = %slot.parent_rack_id,
            is_container = slot.is_container,
            "Miner slot opened"
        );
        self.slots.insert(slot.id.clone(), slot);
    }

    /// Puts a miner into an open slot of a placed rack.
    ///
    /// Nothing changes unless every check passes.
    pub fn place_miner(
        &mut self,
        slot_id: &str,
        miner_name: &str,
        size: SlotSize,
        level: Level,
    ) -> Result<(), PlacementError> {
        let occupied = || PlacementError::AlreadyOccupied {
            slot_id: slot_id.to_string(),
        };

        if self.miners.contains_key(slot_id) {
            return Err(occupied());
        }
        let slot = self
            .slots
            .get(slot_id)
            .ok_or_else(|| PlacementError::UnknownSlot(slot_id.to_string()))?;

        if !can_place(size, slot.is_container) {
            return Err(PlacementError::SlotIncompatible {
                slot_id: slot_id.to_string(),
                slot_size: size,
                is_container: slot.is_container,
            });
        }
        if slot.children.iter().any(|c| self.miners.contains_key(c)) {
            return Err(occupied());
        }
        if slot
            .container_id
            .as_ref()
            .is_some_and(|c| self.miners.contains_key(c))
        {
            return Err(occupied());
        }

        let parent_rack_id = slot.parent_rack_id.clone();
        let Some(rack) = self.racks.get_mut(&parent_rack_id) else {
            return Err(PlacementError::UnknownSlot(slot_id.to_string()));
        };

        let miner = PlacedMiner {
            miner_type: miner_name.to_string(),
            level,
            slot: slot_id.to_string(),
            parent_rack_id,
        };
        rack.miners.insert(slot_id.to_string(), miner.clone());
        self.miners.insert(slot_id.to_string(), miner);
        info!(slot_id, miner = miner_name, %level, "Miner placed");
        Ok(())
    }

    pub fn remove_miner(&mut self, slot_id: &str) -> Result<PlacedMiner, PlacementError> {
        let miner = self
            .miners
            .shift_remove(slot_id)
            .ok_or_else(|| PlacementError::NotPlaced(slot_id.to_string()))?;
        if let Some(rack) = self.racks.get_mut(&miner.parent_rack_id) {
            rack.miners.shift_remove(slot_id);
        }
        info!(slot_id, miner = %miner.miner_type, "Miner removed");
        Ok(miner)
    }

    /// Removes a rack together with its miners and the slots it opened.
    pub fn remove_rack(&mut self, slot_id: &str) -> Result<PlacedRack, PlacementError> {
        let rack = self
            .racks
            .shift_remove(slot_id)
            .ok_or_else(|| PlacementError::NotPlaced(slot_id.to_string()))?;
        self.miners.retain(|_, m| m.parent_rack_id != slot_id);
        self.slots.retain(|_, s| s.parent_rack_id != slot_id);
        info!(
            slot_id,
            rack = %rack.rack_type,
            miners = rack.miners.len(),
            "Rack removed"
        );
        Ok(rack)
    }
}

// Resolves names against the catalog and rooms before touching the store
pub(crate) fn place_rack_checked(
    store: &mut PlacementStore,
    catalog: &Catalog,
    rooms: &RoomsConfig,
    slot_id: &str,
    rack_name: &str,
) -> Result<(), PlacementError> {
    let rack = catalog
        .rack(rack_name)
        .ok_or_else(|| PlacementError::UnknownRack(rack_name.to_string()))?;
    let (_, placeholder) = rooms
        .find_placeholder(slot_id)
        .ok_or_else(|| PlacementError::UnknownPlaceholder(slot_id.to_string()))?;
    store.place_rack(slot_id, &rack.name, placeholder)
}

pub(crate) fn place_miner_checked(
    store: &mut PlacementStore,
    catalog: &Catalog,
    slot_id: &str,
    miner_name: &str,
    level: Level,
) -> Result<(), PlacementError> {
    let miner = catalog
        .miner(miner_name)
        .ok_or_else(|| PlacementError::UnknownMiner(miner_name.to_string()))?;
    store.place_miner(slot_id, &miner.name, miner.slot_size, level)
}

// Slots a rack in `rack_id` opens with `layout`: each container directly
// followed by its children
fn layout_slots(rack_id: &str, layout: &RackConfiguration) -> Vec<MinerSlot> {
    let mut out = Vec::new();
    for def in &layout.miner_slots {
        let id = format!("{rack_id}-{}", def.id);
        let children: Vec<SlotId> = if def.is_container {
            def.child_slots
                .iter()
                .map(|c| format!("{id}-{}", c.id))
                .collect()
        } else {
            Vec::new()
        };
        let child_slots: Vec<MinerSlot> = children
            .iter()
            .map(|child| MinerSlot {
                id: child.clone(),
                parent_rack_id: rack_id.to_string(),
                is_container: false,
                container_id: Some(id.clone()),
                children: Vec::new(),
                order: 0,
            })
            .collect();
        out.push(MinerSlot {
            id,
            parent_rack_id: rack_id.to_string(),
            is_container: def.is_container,
            container_id: None,
            children,
            order: 0,
        });
        out.extend(child_slots);
    }
    out
}
