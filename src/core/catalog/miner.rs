// src/core/catalog/miner.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use super::csv::CsvRecord;
use crate::core::error::CatalogError;
use crate::core::serde_helpers::string_or_number;

const RAW_POWER_PREFIX: &str = "Raw_power_level_";
const BONUS_PREFIX: &str = "Bonus_level_";

// Physical footprint of a miner inside a rack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotSize {
    OneSlot,
    TwoSlot,
}

impl fmt::Display for SlotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotSize::OneSlot => f.write_str("one-slot"),
            SlotSize::TwoSlot => f.write_str("two-slot"),
        }
    }
}

impl FromStr for SlotSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1_slot" | "one-slot" | "1" => Ok(SlotSize::OneSlot),
            "2_slot" | "two-slot" | "2" => Ok(SlotSize::TwoSlot),
            other => Err(format!("unknown slot size {other:?}")),
        }
    }
}

/// Upgrade tier of a placed miner.
///
/// Saved documents carry it as a string (`"3"`); numbers are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Level(pub u32);

impl Default for Level {
    fn default() -> Self {
        Level(1)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Level {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Level)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = string_or_number(deserializer)?;
        // The editor's level picker can also save "all"
        Ok(raw.parse().unwrap_or_else(|_| {
            warn!(level = %raw, "Non-numeric level; using level 1");
            Level::default()
        }))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelStats {
    pub raw_power: Option<f64>,
    pub bonus_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinerDefinition {
    pub name: String,
    pub slot_size: SlotSize,
    // Sparse: not every miner defines every level
    pub levels: BTreeMap<u32, LevelStats>,
}

impl MinerDefinition {
    pub fn raw_power_at(&self, level: Level) -> Option<f64> {
        self.levels.get(&level.0).and_then(|s| s.raw_power)
    }

    pub fn bonus_percent_at(&self, level: Level) -> Option<f64> {
        self.levels.get(&level.0).and_then(|s| s.bonus_percent)
    }

    pub fn from_record(location: &str, record: &CsvRecord) -> Result<Self, CatalogError> {
        let invalid = |field: &str, value: &str| CatalogError::InvalidField {
            location: location.to_string(),
            row: record.row,
            field: field.to_string(),
            value: value.to_string(),
        };

        let name = record
            .get("miner_name")
            .ok_or_else(|| invalid("miner_name", ""))?
            .to_string();
        let size_raw = record.get("slot_size").unwrap_or_default();
        let slot_size = size_raw
            .parse()
            .map_err(|_| invalid("slot_size", size_raw))?;

        let mut levels: BTreeMap<u32, LevelStats> = BTreeMap::new();
        for (header, value) in record.iter() {
            let (level, is_raw) = if let Some(n) = header.strip_prefix(RAW_POWER_PREFIX) {
                (n, true)
            } else if let Some(n) = header.strip_prefix(BONUS_PREFIX) {
                (n, false)
            } else {
                continue;
            };
            let Ok(level) = level.parse::<u32>() else {
                continue;
            };
            let number = value
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| invalid(header, value))?;

            let stats = levels.entry(level).or_default();
            if is_raw {
                stats.raw_power = Some(number);
            } else {
                stats.bonus_percent = Some(number);
            }
        }

        Ok(MinerDefinition {
            name,
            slot_size,
            levels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::csv;

    fn first_record(text: &str) -> CsvRecord {
        csv::parse("All_Miners.csv", text).unwrap().records.remove(0)
    }

    #[test]
    fn builds_sparse_level_table() {
        let rec = first_record(
            "miner_name,slot_size,Raw_power_level_1,Bonus_level_1,Raw_power_level_3\n\
             Drill X,2_slot,100,10,250\n",
        );
        let miner = MinerDefinition::from_record("All_Miners.csv", &rec).unwrap();
        assert_eq!(miner.name, "Drill X");
        assert_eq!(miner.slot_size, SlotSize::TwoSlot);
        assert_eq!(miner.raw_power_at(Level(1)), Some(100.0));
        assert_eq!(miner.bonus_percent_at(Level(1)), Some(10.0));
        assert_eq!(miner.raw_power_at(Level(3)), Some(250.0));
        assert_eq!(miner.bonus_percent_at(Level(3)), None);
        assert_eq!(miner.raw_power_at(Level(2)), None);
    }

    #[test]
    fn rejects_non_numeric_stat() {
        let rec = first_record("miner_name,slot_size,Raw_power_level_1\nM,1_slot,lots\n");
        let err = MinerDefinition::from_record("All_Miners.csv", &rec).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidField { ref field, .. } if field == "Raw_power_level_1"));
    }

    #[test]
    fn rejects_non_finite_stat() {
        for cell in ["NaN", "inf", "-infinity"] {
            let rec = first_record(&format!("miner_name,slot_size,Bonus_level_1\nM,1_slot,{cell}\n"));
            let err = MinerDefinition::from_record("All_Miners.csv", &rec).unwrap_err();
            assert!(
                matches!(err, CatalogError::InvalidField { ref value, .. } if value == cell),
                "accepted {cell}"
            );
        }
    }

    #[test]
    fn rejects_unknown_slot_size() {
        let rec = first_record("miner_name,slot_size\nM,3_slot\n");
        assert!(MinerDefinition::from_record("All_Miners.csv", &rec).is_err());
    }

    #[test]
    fn level_reads_string_or_number() {
        let a: Level = serde_json::from_str("\"4\"").unwrap();
        let b: Level = serde_json::from_str("4").unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"4\"");
    }

    #[test]
    fn non_numeric_level_reads_as_default() {
        let all: Level = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, Level(1));
        assert!(serde_json::from_str::<Level>("true").is_err());
    }
}
