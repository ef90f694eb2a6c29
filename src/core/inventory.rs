// src/core/inventory.rs
//
// Filtering and ordering of the item palette. Front ends render whatever
// these return.

use std::cmp::Ordering;
use std::str::FromStr;

use super::catalog::{Catalog, Level, MinerDefinition, RackDefinition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventoryMode {
    #[default]
    Miners,
    Racks,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Default,
    HighestPower,
    HighestBonus,
    HighestBonusRack,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SortOrder::Default),
            "highest_power" => Ok(SortOrder::HighestPower),
            "highest_bonus" => Ok(SortOrder::HighestBonus),
            "highest_bonus_rack" => Ok(SortOrder::HighestBonusRack),
            other => Err(format!("unknown sort order {other:?}")),
        }
    }
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Default => "Default",
            SortOrder::HighestPower => "Highest Power",
            SortOrder::HighestBonus => "Highest Bonus Power",
            SortOrder::HighestBonusRack => "Rack with Highest Bonus",
        }
    }
}

// Sort choices offered for each view
pub fn sort_options(mode: InventoryMode) -> &'static [SortOrder] {
    match mode {
        InventoryMode::Miners => &[
            SortOrder::Default,
            SortOrder::HighestPower,
            SortOrder::HighestBonus,
        ],
        InventoryMode::Racks => &[SortOrder::Default, SortOrder::HighestBonusRack],
    }
}

#[derive(Debug, Clone, Default)]
pub struct InventoryQuery {
    pub sort: SortOrder,
    // Miners only: keep those with a raw power value at this level
    pub level: Option<Level>,
    pub search: String,
}

impl InventoryQuery {
    fn matches(&self, haystack: &str) -> bool {
        self.search.is_empty() || haystack.to_lowercase().contains(&self.search.to_lowercase())
    }
}

// Descending, missing values last
fn desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn miners<'a>(catalog: &'a Catalog, query: &InventoryQuery) -> Vec<&'a MinerDefinition> {
    let mut items: Vec<&MinerDefinition> = catalog
        .miners
        .iter()
        .filter(|m| query.level.is_none_or(|lvl| m.raw_power_at(lvl).is_some()))
        .filter(|m| query.matches(&m.name))
        .collect();

    let first = Level(1);
    match query.sort {
        SortOrder::HighestPower => {
            items.sort_by(|a, b| desc(a.raw_power_at(first), b.raw_power_at(first)))
        }
        SortOrder::HighestBonus => {
            items.sort_by(|a, b| desc(a.bonus_percent_at(first), b.bonus_percent_at(first)))
        }
        SortOrder::Default | SortOrder::HighestBonusRack => {}
    }
    items
}

pub fn racks<'a>(catalog: &'a Catalog, query: &InventoryQuery) -> Vec<&'a RackDefinition> {
    let mut items: Vec<&RackDefinition> = catalog
        .racks
        .iter()
        .filter(|r| query.matches(&r.name) || r.set_name.as_deref().is_some_and(|s| query.matches(s)))
        .collect();

    if query.sort == SortOrder::HighestBonusRack {
        items.sort_by(|a, b| {
            b.bonus_percent
                .unwrap_or(0.0)
                .total_cmp(&a.bonus_percent.unwrap_or(0.0))
        });
    }
    items
}
