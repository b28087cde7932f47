//! Isometric sorting demo runner.
//!
//! Builds a scene (from JSON or at random), runs a fixed number of frames
//! of movement plus depth sorting in a headless bevy_ecs world, and reports
//! the sorter statistics.
//!
//! # Main Loop
//!
//! 1. Load the `[sorting]` configuration from the INI file
//! 2. Load or generate the scene and spawn it into the ECS world
//! 3. For every frame at a fixed 1/60 s timestep:
//!    - advance world time
//!    - move the movers, bouncing inside the scene area
//!    - sync the sorter with the world and run the ordering pass
//! 4. Optionally dump the final draw order as JSON
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --statics 2000 --movers 100 --frames 600
//! ```

mod components;
mod coords;
mod resources;
mod scene;
mod sorting;
mod systems;

use crate::coords::Vec2;
use crate::resources::isosorter::IsoSorter;
use crate::resources::movearea::MoveArea;
use crate::resources::sortconfig::SortConfig;
use crate::resources::sortstats::SortStats;
use crate::resources::sortview::SortView;
use crate::resources::worldtime::WorldTime;
use crate::scene::{SceneData, dump_draw_order};
use crate::systems::isosort::{add_sort_systems, register_iso_sprites};
use crate::systems::movement::movement_system;
use crate::systems::time::update_world_time;
use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

const FIXED_DT: f32 = 1.0 / 60.0;
const RANDOM_SCENE_WIDTH: f32 = 2000.0;
const RANDOM_SCENE_HEIGHT: f32 = 1200.0;
const VIEW_SIZE: Vec2 = Vec2::new(1280.0, 720.0);
const STATS_EVERY_FRAMES: u64 = 30;

/// Headless isometric sprite sorting demo
#[derive(Parser)]
#[command(version, about = "Sorts an isometric scene for a number of frames and reports the results.")]
struct Cli {
    /// INI file with a [sorting] section. A missing file means defaults.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Save the effective configuration to the config path and exit.
    #[arg(long)]
    write_config: bool,

    /// JSON scene to load instead of generating one.
    #[arg(long, value_name = "PATH")]
    scene: Option<PathBuf>,

    /// Fixed sprites in a generated scene.
    #[arg(long, default_value_t = 200)]
    statics: usize,

    /// Moving sprites in a generated scene.
    #[arg(long, default_value_t = 20)]
    movers: usize,

    /// Seed for the generated scene. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to simulate.
    #[arg(long, default_value_t = 120)]
    frames: u32,

    /// Write the final (name, z_index) list to this JSON file.
    #[arg(long, value_name = "PATH")]
    dump: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SortConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("Using default sort config: {}", e);
    }

    // Early-exit: write the config and quit
    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
        println!("Sort config written to {}", config.config_path.display());
        return;
    }

    let sorter = match IsoSorter::with_config(&config) {
        Ok(sorter) => sorter,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let scene = match &cli.scene {
        Some(path) => match SceneData::load_from_file(&path.to_string_lossy()) {
            Ok(scene) => scene,
            Err(e) => {
                eprintln!("Failed to load scene from {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let seed = cli.seed.unwrap_or_else(|| fastrand::u64(..));
            info!(
                "Generating scene with {} statics and {} movers (seed {})",
                cli.statics, cli.movers, seed
            );
            SceneData::random(
                RANDOM_SCENE_WIDTH,
                RANDOM_SCENE_HEIGHT,
                cli.statics,
                cli.movers,
                seed,
            )
        }
    };

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    let area = scene.area();
    let center = Vec2::new((area.min_x + area.max_x) * 0.5, (area.min_y + area.max_y) * 0.5);
    world.insert_resource(WorldTime::default());
    world.insert_resource(SortView::centered(center, VIEW_SIZE));
    world.insert_resource(MoveArea(area));
    world.insert_resource(SortStats::default());
    world.insert_resource(config);
    world.insert_resource(sorter);
    scene.spawn(&mut world);

    // --------------- Schedule ---------------
    let mut update = Schedule::default();
    update.add_systems(movement_system.before(register_iso_sprites));
    add_sort_systems(&mut update);

    for _ in 0..cli.frames {
        update_world_time(&mut world, FIXED_DT);
        update.run(&mut world);

        let frame = world.resource::<WorldTime>().frame_count;
        if frame % STATS_EVERY_FRAMES == 0 {
            debug!("Frame {}: {:?}", frame, world.resource::<SortStats>().last);
        }
    }

    let stats = *world.resource::<SortStats>();
    info!(
        "Ran {} passes. Last pass: {} sorted, {} background, {} static edges, {} moving edges, {} cycle edges removed in {} passes (converged: {})",
        stats.passes,
        stats.last.working_set,
        stats.last.background,
        stats.last.static_edges,
        stats.last.moving_edges,
        stats.last.edges_removed,
        stats.last.cycle_passes,
        stats.last.converged
    );

    if let Some(path) = cli.dump {
        let entries = dump_draw_order(&mut world);
        let written = serde_json::to_string_pretty(&entries)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => info!("Draw order of {} sprites written to {}", entries.len(), path.display()),
            Err(e) => {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    world.resource_mut::<IsoSorter>().shutdown();
}
