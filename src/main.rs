// src/main.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use rig_planner::core::app::App;
use rig_planner::core::catalog::Level;
use rig_planner::core::inventory::{self, InventoryMode, InventoryQuery, SortOrder, sort_options};
use rig_planner::core::planner::Planner;
use rig_planner::core::power::format_power;

#[derive(Parser)]
#[command(name = "rig-planner")]
#[command(about = "Plan miner and rack layouts and compute their total power", long_about = None)]
struct Cli {
    /// Setup file to read and update (defaults to the data directory)
    #[arg(long, global = true)]
    setup: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List rooms and their rack placeholders
    Rooms,
    /// List catalog items
    Inventory {
        /// Show racks instead of miners
        #[arg(long)]
        racks: bool,
        /// default, highest_power, highest_bonus or highest_bonus_rack
        #[arg(long, default_value = "default")]
        sort: SortOrder,
        /// Only miners defined at this level
        #[arg(long)]
        level: Option<u32>,
        /// Case-insensitive name filter
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Print the total power of the setup
    Power,
    /// Put a rack into a room placeholder
    PlaceRack { slot: String, rack: String },
    /// Put a miner into a rack slot
    PlaceMiner {
        slot: String,
        miner: String,
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// Remove the miner (or rack) in a slot
    Remove { slot: String },
    /// Add a room cloned from the template room
    AddRoom,
    /// Resolve the image URL of a miner
    Image { name: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app = App::new()?;
    let setup = cli.setup.clone().unwrap_or_else(|| app.setup_path(None));

    if let Command::Image { name } = &cli.command {
        let mut resolver = app.image_resolver();
        println!("{}", resolver.resolve(name).await);
        return Ok(());
    }

    // Catalog must be loaded before anything touches placements
    let mut planner = app.start().await?;

    match cli.command {
        Command::Rooms => {
            load_if_present(&mut planner, &setup)?;
            print_rooms(&planner);
        }
        Command::Inventory {
            racks,
            sort,
            level,
            search,
        } => {
            let mode = if racks {
                InventoryMode::Racks
            } else {
                InventoryMode::Miners
            };
            if !sort_options(mode).contains(&sort) {
                anyhow::bail!("sort order {:?} does not apply to this view", sort.label());
            }
            let query = InventoryQuery {
                sort,
                level: level.map(Level),
                search,
            };
            print_inventory(&planner, mode, &query, level.map(Level).unwrap_or_default());
        }
        Command::Power => {
            load_if_present(&mut planner, &setup)?;
            let b = planner.power_breakdown();
            println!("raw power:   {}", format_power(b.raw_power));
            println!("bonus:       {}%", format_power(b.bonus_percent()));
            if b.skipped > 0 {
                println!("skipped:     {} (missing catalog data)", b.skipped);
            }
            println!("total power: {}", format_power(b.total()));
        }
        Command::PlaceRack { slot, rack } => {
            load_if_present(&mut planner, &setup)?;
            planner.place_rack(&slot, &rack)?;
            save(&planner, &setup)?;
        }
        Command::PlaceMiner { slot, miner, level } => {
            load_if_present(&mut planner, &setup)?;
            planner.place_miner(&slot, &miner, Level(level))?;
            save(&planner, &setup)?;
        }
        Command::Remove { slot } => {
            load_existing(&mut planner, &setup)?;
            if planner.store().miner(&slot).is_some() {
                planner.remove_miner(&slot)?;
            } else {
                planner.remove_rack(&slot)?;
            }
            save(&planner, &setup)?;
        }
        Command::AddRoom => {
            load_if_present(&mut planner, &setup)?;
            let room = planner.add_room()?;
            save(&planner, &setup)?;
            println!("{room}");
        }
        // resolved above, before the catalog loads
        Command::Image { .. } => {}
    }
    Ok(())
}

fn load_existing(planner: &mut Planner, path: &Path) -> Result<()> {
    planner
        .load_setup(path)
        .with_context(|| format!("Loading setup {path:?}"))
}

fn load_if_present(planner: &mut Planner, path: &Path) -> Result<()> {
    planner
        .load_setup_if_present(path)
        .with_context(|| format!("Loading setup {path:?}"))?;
    Ok(())
}

fn save(planner: &Planner, path: &Path) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("Setup path has no file name")?;
    planner.save_setup(dir, name)?;
    println!("total power: {}", format_power(planner.total_power()));
    Ok(())
}

fn print_rooms(planner: &Planner) {
    for room_id in planner.rooms().room_ids() {
        let marker = if room_id == planner.current_room() { "*" } else { " " };
        println!("{marker} {room_id}");
        for (slot_id, ph) in planner.placeholders(room_id).unwrap_or_default() {
            let rack = planner
                .store()
                .rack(&slot_id)
                .map(|r| r.rack_type.as_str())
                .unwrap_or("-");
            let config = ph.current_active_config_type.as_deref().unwrap_or("-");
            println!("    {slot_id}  config={config}  rack={rack}");
        }
    }
}

fn print_inventory(planner: &Planner, mode: InventoryMode, query: &InventoryQuery, shown: Level) {
    let fmt = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| v.to_string());
    match mode {
        InventoryMode::Miners => {
            for m in inventory::miners(planner.catalog(), query) {
                println!(
                    "{}  [{}]  Power: {} Gh/s  Bonus: {}%",
                    m.name,
                    m.slot_size,
                    fmt(m.raw_power_at(shown)),
                    fmt(m.bonus_percent_at(shown))
                );
            }
        }
        InventoryMode::Racks => {
            for r in inventory::racks(planner.catalog(), query) {
                let bonus = r.bonus_percent.map(|b| format!("  Bonus: {b}%")).unwrap_or_default();
                let set = r.set_name.as_deref().map(|s| format!("  Set: {s}")).unwrap_or_default();
                println!("{}{bonus}{set}", r.name);
            }
        }
    }
}
