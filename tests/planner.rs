// tests/planner.rs

mod common;

use rig_planner::core::app::App;
use rig_planner::core::catalog::Level;
use rig_planner::core::error::PlacementError;
use rig_planner::core::planner::Planner;
use rig_planner::core::power::format_power;

const RACK: &str = "ph-Room 1-0";
const CONTAINER: &str = "ph-Room 1-0-1";
const CHILD_A: &str = "ph-Room 1-0-1-a";
const LEAF: &str = "ph-Room 1-0-2";

async fn planner() -> (Planner, tempfile::TempDir) {
    let dir = common::catalog_dir();
    let app = App::with_config(common::config_for(&dir));
    (app.start().await.unwrap(), dir)
}

#[tokio::test]
async fn starts_with_catalog_and_active_room() {
    let (p, _dir) = planner().await;
    assert_eq!(p.current_room(), "Room 1");
    assert_eq!(p.catalog().miners.len(), 3);
    assert_eq!(p.catalog().racks.len(), 2);
    assert!(p.store().is_empty());
    assert_eq!(p.total_power(), 0.0);
}

#[tokio::test]
async fn single_miner_power() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Plain").unwrap();
    p.place_miner(LEAF, "M1", Level(1)).unwrap();
    assert!((p.total_power() - 110.0).abs() < 1e-9);
    assert_eq!(format_power(p.total_power()), "110.00");
}

#[tokio::test]
async fn rack_bonus_power() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Bonus5").unwrap();
    p.place_miner(LEAF, "M1", Level(1)).unwrap();
    assert_eq!(format_power(p.total_power()), "115.00");
}

#[tokio::test]
async fn second_rack_in_placeholder_rejected() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Plain").unwrap();
    let err = p.place_rack(RACK, "Bonus5").unwrap_err();
    assert!(matches!(err, PlacementError::AlreadyOccupied { .. }));
    assert_eq!(p.store().rack(RACK).unwrap().rack_type, "Plain");
}

#[tokio::test]
async fn two_slot_miner_needs_container() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Plain").unwrap();

    let err = p.place_miner(LEAF, "Big Drill", Level(1)).unwrap_err();
    assert!(matches!(err, PlacementError::SlotIncompatible { .. }));
    assert!(err.to_string().contains("two-slot"));
    assert!(p.store().miner(LEAF).is_none());

    assert!(p.place_miner(CHILD_A, "Big Drill", Level(1)).is_err());
    p.place_miner(CONTAINER, "Big Drill", Level(2)).unwrap();
    // 450 * 1.25
    assert_eq!(format_power(p.total_power()), "562.50");
}

#[tokio::test]
async fn missing_level_stats_do_not_poison_total() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Plain").unwrap();
    // level 2 of M1 has raw power but no bonus; Tiny has no stats at all
    p.place_miner(LEAF, "M1", Level(2)).unwrap();
    p.place_miner(CHILD_A, "Tiny", Level(1)).unwrap();
    let b = p.power_breakdown();
    assert_eq!(b.skipped, 3);
    assert_eq!(format_power(b.total()), "150.00");
}

#[tokio::test]
async fn remove_rack_drops_its_miners() {
    let (mut p, _dir) = planner().await;
    p.place_rack(RACK, "Bonus5").unwrap();
    p.place_miner(LEAF, "M1", Level(1)).unwrap();
    p.remove_rack(RACK).unwrap();
    assert!(p.store().miners().is_empty());
    assert_eq!(p.total_power(), 0.0);
    assert_eq!(
        p.place_miner(LEAF, "M1", Level(1)),
        Err(PlacementError::UnknownSlot(LEAF.into()))
    );
}

#[tokio::test]
async fn rooms_can_be_added_and_selected() {
    let (mut p, _dir) = planner().await;
    let id = p.add_room().unwrap();
    assert_eq!(id, "Room 3");
    assert_eq!(p.current_room(), "Room 3");
    // cloned from Room 2
    let placeholders = p.placeholders(&id).unwrap();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders[0].0, "ph-Room 3-0");

    p.place_rack("ph-Room 3-0", "Plain").unwrap();
    p.place_miner("ph-Room 3-0-1", "M1", Level(1)).unwrap();
    p.select_room("Room 1").unwrap();
    // power spans every room, not just the selected one
    assert_eq!(format_power(p.total_power()), "110.00");
}
