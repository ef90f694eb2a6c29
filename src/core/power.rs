// src/core/power.rs
//
// Total power = sum(raw power) * (1 + sum(bonus %) / 100), where bonuses come
// from placed miners at their level and from placed racks.
//
// Missing data (unknown miner, level without a stat) contributes nothing and
// is reported with `warn!`.

use tracing::warn;

use super::catalog::{Catalog, RackDefinition};
use super::placement::PlacementStore;

// Extra bonus earned by combinations of placed racks
pub trait SetBonus {
    fn bonus_percent(&self, placed_racks: &[&RackDefinition], catalog: &Catalog) -> f64;
}

// Sets are loaded but carry no bonus rules yet
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSetBonus;

impl SetBonus for NoSetBonus {
    fn bonus_percent(&self, _placed_racks: &[&RackDefinition], _catalog: &Catalog) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PowerBreakdown {
    pub raw_power: f64,
    pub miner_bonus_percent: f64,
    pub rack_bonus_percent: f64,
    pub set_bonus_percent: f64,
    // Contributions dropped because the catalog lacked the data
    pub skipped: usize,
}

impl PowerBreakdown {
    pub fn bonus_percent(&self) -> f64 {
        self.miner_bonus_percent + self.rack_bonus_percent + self.set_bonus_percent
    }

    pub fn total(&self) -> f64 {
        self.raw_power * (1.0 + self.bonus_percent() / 100.0)
    }
}

pub fn compute_total_power(store: &PlacementStore, catalog: &Catalog) -> f64 {
    compute_breakdown(store, catalog, &NoSetBonus).total()
}

pub fn compute_breakdown(
    store: &PlacementStore,
    catalog: &Catalog,
    sets: &dyn SetBonus,
) -> PowerBreakdown {
    let mut out = PowerBreakdown::default();

    for miner in store.miners().values() {
        let Some(def) = catalog.miner(&miner.miner_type) else {
            warn!(slot = %miner.slot, miner = %miner.miner_type, "Placed miner missing from catalog; skipped");
            out.skipped += 1;
            continue;
        };
        match def.raw_power_at(miner.level) {
            Some(raw) => out.raw_power += raw,
            None => {
                warn!(miner = %def.name, level = %miner.level, "No raw power for level; skipped");
                out.skipped += 1;
            }
        }
        match def.bonus_percent_at(miner.level) {
            Some(bonus) => out.miner_bonus_percent += bonus,
            None => {
                warn!(miner = %def.name, level = %miner.level, "No bonus for level; skipped");
                out.skipped += 1;
            }
        }
    }

    let mut placed_racks = Vec::with_capacity(store.racks().len());
    for rack in store.racks().values() {
        match catalog.rack(&rack.rack_type) {
            Some(def) => {
                out.rack_bonus_percent += def.bonus_percent.unwrap_or(0.0);
                placed_racks.push(def);
            }
            None => {
                warn!(rack = %rack.rack_type, "Placed rack missing from catalog; skipped");
                out.skipped += 1;
            }
        }
    }

    out.set_bonus_percent = sets.bonus_percent(&placed_racks, catalog);
    out
}

// Two decimals, for display only
pub fn format_power(power: f64) -> String {
    format!("{power:.2}")
}
