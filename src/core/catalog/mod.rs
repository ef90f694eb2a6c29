// src/core/catalog/mod.rs

//! Item definitions (miners, racks, sets) and room layouts, loaded once at
//! startup and read-only afterwards.

pub mod csv;
pub mod file_source;
pub mod http_source;
pub mod miner;
pub mod rack;
pub mod room;
pub mod source;

pub use miner::{Level, LevelStats, MinerDefinition, SlotSize};
pub use rack::{RackDefinition, SetDefinition};
pub use room::{
    ChildSlotDefinition, PlaceholderDefinition, RackConfiguration, Rect, RoomDefinition,
    RoomsConfig, SlotDefinition,
};
pub use source::{AnySource, CatalogSource, SourceKind};

use tracing::{info, warn};

use super::config::CatalogConfig;
use super::error::CatalogError;

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub miners: Vec<MinerDefinition>,
    pub racks: Vec<RackDefinition>,
    pub sets: Vec<SetDefinition>,
}

impl Catalog {
    pub fn miner(&self, name: &str) -> Option<&MinerDefinition> {
        self.miners.iter().find(|m| m.name == name)
    }

    pub fn rack(&self, name: &str) -> Option<&RackDefinition> {
        self.racks.iter().find(|r| r.name == name)
    }

    pub fn set(&self, name: &str) -> Option<&SetDefinition> {
        self.sets.iter().find(|s| s.name == name)
    }
}

// Fetches every catalog document through one source, in a fixed order
pub struct CatalogLoader<'a, S> {
    source: &'a S,
    cfg: &'a CatalogConfig,
}

impl<'a, S: CatalogSource> CatalogLoader<'a, S> {
    pub fn new(source: &'a S, cfg: &'a CatalogConfig) -> Self {
        Self { source, cfg }
    }

    pub async fn load(&self) -> Result<(Catalog, RoomsConfig), CatalogError> {
        let rooms = self.load_rooms(&self.cfg.rooms).await?;
        let miners = self
            .load_csv(&self.cfg.miners, MinerDefinition::from_record)
            .await?;
        let racks = self
            .load_csv(&self.cfg.racks, RackDefinition::from_record)
            .await?;
        let sets = match &self.cfg.sets {
            Some(location) => self.load_csv(location, SetDefinition::from_record).await?,
            None => Vec::new(),
        };

        info!(
            rooms = rooms.rooms.len(),
            miners = miners.len(),
            racks = racks.len(),
            sets = sets.len(),
            "Catalog loaded"
        );
        Ok((
            Catalog {
                miners,
                racks,
                sets,
            },
            rooms,
        ))
    }

    async fn load_rooms(&self, location: &str) -> Result<RoomsConfig, CatalogError> {
        let text = self.source.fetch(location).await?;
        let rooms: RoomsConfig =
            serde_json::from_str(&text).map_err(|source| CatalogError::Json {
                location: location.to_string(),
                source,
            })?;
        if rooms.rooms.is_empty() {
            return Err(CatalogError::NoRooms(location.to_string()));
        }
        if !rooms.contains(&rooms.active_room) {
            warn!(active_room = %rooms.active_room, "Rooms document names an unknown active room");
        }
        Ok(rooms)
    }

    async fn load_csv<T>(
        &self,
        location: &str,
        build: fn(&str, &csv::CsvRecord) -> Result<T, CatalogError>,
    ) -> Result<Vec<T>, CatalogError> {
        let text = self.source.fetch(location).await?;
        let table = csv::parse(location, &text)?;
        table
            .records
            .iter()
            .map(|record| build(location, record))
            .collect()
    }
}
