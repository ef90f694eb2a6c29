// tests/common/mod.rs
//
// On-disk catalog shared by the integration tests, served through the file
// backend.

#![allow(dead_code)]

use std::fs;

use rig_planner::core::catalog::SourceKind;
use rig_planner::core::config::{CatalogConfig, Config};
use tempfile::TempDir;

pub const ROOMS: &str = r#"{
    "active_room": "Room 1",
    "rooms": {
        "Room 1": {
            "background_image_b64": "iVBORw0KGgo=",
            "placeholders": [{
                "x_ratio": 0.1, "y_ratio": 0.1, "width_ratio": 0.2, "height_ratio": 0.5,
                "current_active_config_type": "standard",
                "configurations": {
                    "standard": {"miner_slots": [
                        {"id": 1, "x_ratio_rel": 0, "y_ratio_rel": 0,
                         "width_ratio_rel": 1, "height_ratio_rel": 0.5,
                         "is_container": true,
                         "child_slots": [
                            {"id": "a", "x_ratio_rel_to_parent": 0, "width_ratio_rel_to_parent": 0.5},
                            {"id": "b", "x_ratio_rel_to_parent": 0.5, "width_ratio_rel_to_parent": 0.5}
                         ]},
                        {"id": 2, "y_ratio_rel": 0.5, "width_ratio_rel": 1, "height_ratio_rel": 0.5,
                         "is_container": false}
                    ]}
                }
            }]
        },
        "Room 2": {
            "background_image_b64": "",
            "placeholders": [{
                "current_active_config_type": "compact",
                "configurations": {"compact": {"miner_slots": [{"id": 1}]}}
            }]
        }
    }
}"#;

pub const MINERS: &str = "\
miner_name,slot_size,Raw_power_level_1,Bonus_level_1,Raw_power_level_2,Bonus_level_2
M1,1_slot,100,10,150
Big Drill,2_slot,300,20,450,25
Tiny,1_slot
";

pub const RACKS: &str = "\
name,bonus_power,set_name
Plain
Bonus5,5,Gold
";

pub const SETS: &str = "set_name,pieces\nGold,2\n";

pub fn catalog_dir() -> TempDir {
    let td = TempDir::new().unwrap();
    fs::write(td.path().join("Rooms.json"), ROOMS).unwrap();
    fs::write(td.path().join("All_Miners.csv"), MINERS).unwrap();
    fs::write(td.path().join("Racks.csv"), RACKS).unwrap();
    fs::write(td.path().join("Sets.csv"), SETS).unwrap();
    td
}

pub fn config_for(dir: &TempDir) -> Config {
    let mut cfg = Config::default();
    cfg.catalog = CatalogConfig {
        backend: SourceKind::File,
        base: dir.path().display().to_string(),
        ..Default::default()
    };
    cfg
}
