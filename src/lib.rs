#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Streamer
//!
//! The CPU side of a chunked voxel world: a sliding window of 16x16x16 chunks
//! that follows a viewer, a greedy mesher run on a pool of worker threads, and
//! a combiner that packs every chunk's geometry into one opaque and one
//! transparent buffer for a renderer to draw.
//!
//! ## Key Modules
//!
//! * `core` - Shared resource handle, error type, configuration and logging
//! * `engine_state` - The engine components: voxels, meshing and task management
//!
//! ## Architecture
//!
//! The engine keeps a clear separation between:
//! * Voxel data management and streaming (background thread)
//! * Greedy meshing (worker pool, fixed tick rate)
//! * Combining (tick thread), the only writer of the render-facing buffers
//!
//! Windowing, shaders and draw calls belong to the embedding application.
//!
//! ## Usage
//!
//! ```no_run
//! fn main() -> voxel_streamer::core::Result<()> {
//!     voxel_streamer::run()
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use cgmath::Point3;
use log::info;

pub mod core;
pub mod engine_state;

use crate::core::{logging, EngineConfig, Result};
use engine_state::{
    rendering::meshing::TickClock,
    voxels::{block::block_type::BlockTypeTable, terrain::PerlinTerrain},
    EngineState,
};

/// Environment variable naming the configuration file when no argument is given.
pub const CONFIG_ENV_VAR: &str = "VOXEL_CONFIG";
/// Ticks the headless driver runs before shutting down.
pub const DEMO_TICKS: u32 = 200;
/// Blocks the demo viewer moves along X per tick.
const WALK_SPEED: f32 = 0.75;

/// Runs the engine headless: streams and meshes the world around a viewer that
/// walks diagonally across it, logging statistics every tick.
///
/// The configuration file is taken from the first command line argument or
/// the `VOXEL_CONFIG` environment variable; defaults are used if neither is
/// set.
pub fn run() -> Result<()> {
    logging::init();
    info!("Logger initialized");

    let config = match config_path() {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            EngineConfig::from_json_file(&path)?
        }
        None => EngineConfig::default(),
    };
    let table = match &config.block_table {
        Some(path) => load_block_table(path)?,
        None => BlockTypeTable::default(),
    };

    let mut clock = TickClock::new(config.tick_rate_hz);
    let generator = Arc::new(PerlinTerrain::new(config.seed));
    let mut engine = EngineState::new(config, Arc::new(table), generator)?;

    let mut viewer = Point3::new(0.0f32, 48.0, 0.0);
    let mut ticks = 0;
    while ticks < DEMO_TICKS {
        let due = clock.update();
        if due == 0 {
            thread::sleep(clock.tick_length() / 4);
            continue;
        }

        for _ in 0..due {
            viewer.x += WALK_SPEED;
            viewer.z += WALK_SPEED / 2.0;
            engine.update_viewer(viewer);

            let report = engine.tick();
            for pass in engine.last_passes() {
                info!(
                    "Streamed: {} evicted, {} shifted, {} loaded in {:?}",
                    pass.evicted, pass.shifted, pass.loaded, pass.elapsed
                );
            }
            if report.combined.is_some() {
                let combiner = engine.combiner();
                info!(
                    "Tick {}: meshed {} chunks, combined {} opaque and {} transparent vertices in {:?}",
                    ticks,
                    report.meshing.chunks_meshed,
                    combiner.opaque().vertex_count(),
                    combiner.transparent().vertex_count(),
                    report.elapsed
                );
            }
            ticks += 1;
        }
    }

    let saved = engine.shutdown()?;
    info!("Shut down after {} ticks, saved {} chunks", ticks, saved);
    Ok(())
}

fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR))
        .map(PathBuf::from)
}

/// Reads a block table: JSON for `.json` files, packed records otherwise.
fn load_block_table(path: &Path) -> Result<BlockTypeTable> {
    if path.extension().is_some_and(|extension| extension == "json") {
        BlockTypeTable::from_json_str(&std::fs::read_to_string(path)?)
    } else {
        Ok(BlockTypeTable::from_bytes(&std::fs::read(path)?))
    }
}
