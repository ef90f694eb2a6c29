// tests/catalog_files.rs

mod common;

use std::fs;

use rig_planner::core::catalog::file_source::FileSource;
use rig_planner::core::catalog::{CatalogLoader, Level, SlotSize};
use rig_planner::core::error::CatalogError;

#[tokio::test]
async fn loads_catalog_from_directory() {
    let dir = common::catalog_dir();
    let cfg = common::config_for(&dir).catalog;
    let source = FileSource::new(dir.path());

    let (catalog, rooms) = CatalogLoader::new(&source, &cfg).load().await.unwrap();

    let big = catalog.miner("Big Drill").unwrap();
    assert_eq!(big.slot_size, SlotSize::TwoSlot);
    assert_eq!(big.raw_power_at(Level(2)), Some(450.0));
    assert_eq!(catalog.miner("M1").unwrap().bonus_percent_at(Level(2)), None);
    assert!(catalog.miner("Tiny").unwrap().levels.is_empty());

    assert_eq!(catalog.rack("Bonus5").unwrap().set_name.as_deref(), Some("Gold"));
    assert_eq!(catalog.rack("Plain").unwrap().bonus_percent, None);
    assert!(catalog.set("Gold").is_some());

    assert_eq!(rooms.active_room, "Room 1");
    assert_eq!(rooms.room_ids().count(), 2);
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = common::catalog_dir();
    fs::remove_file(dir.path().join("Racks.csv")).unwrap();
    let cfg = common::config_for(&dir).catalog;
    let source = FileSource::new(dir.path());

    let err = CatalogLoader::new(&source, &cfg).load().await.unwrap_err();
    assert!(matches!(err, CatalogError::Io { ref location, .. } if location.ends_with("Racks.csv")));
}

#[tokio::test]
async fn bad_slot_size_names_the_row() {
    let dir = common::catalog_dir();
    fs::write(
        dir.path().join("All_Miners.csv"),
        "miner_name,slot_size,Raw_power_level_1\nOdd,3_slot,5\n",
    )
    .unwrap();
    let cfg = common::config_for(&dir).catalog;
    let source = FileSource::new(dir.path());

    match CatalogLoader::new(&source, &cfg).load().await {
        Err(CatalogError::InvalidField { field, value, .. }) => {
            assert_eq!(field, "slot_size");
            assert_eq!(value, "3_slot");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}

#[tokio::test]
async fn rooms_file_without_rooms_is_rejected() {
    let dir = common::catalog_dir();
    fs::write(dir.path().join("Rooms.json"), r#"{"rooms": {}}"#).unwrap();
    let cfg = common::config_for(&dir).catalog;
    let source = FileSource::new(dir.path());

    let err = CatalogLoader::new(&source, &cfg).load().await.unwrap_err();
    assert!(matches!(err, CatalogError::NoRooms(_)));
}

#[tokio::test]
async fn sets_file_is_optional() {
    let dir = common::catalog_dir();
    fs::remove_file(dir.path().join("Sets.csv")).unwrap();
    let mut cfg = common::config_for(&dir).catalog;
    cfg.sets = None;
    let source = FileSource::new(dir.path());

    let (catalog, _) = CatalogLoader::new(&source, &cfg).load().await.unwrap();
    assert!(catalog.sets.is_empty());
}

#[tokio::test]
async fn non_finite_stats_fail_the_load() {
    let dir = common::catalog_dir();
    fs::write(
        dir.path().join("All_Miners.csv"),
        "miner_name,slot_size,Raw_power_level_1,Bonus_level_1\nM1,1_slot,NaN,10\n",
    )
    .unwrap();
    let cfg = common::config_for(&dir).catalog;
    let source = FileSource::new(dir.path());

    match CatalogLoader::new(&source, &cfg).load().await {
        Err(CatalogError::InvalidField { field, value, .. }) => {
            assert_eq!(field, "Raw_power_level_1");
            assert_eq!(value, "NaN");
        }
        other => panic!("expected InvalidField, got {other:?}"),
    }
}
