//! # Engine State Module
//!
//! The core engine module that ties the voxel world to the meshing pipeline.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container for the engine
//! * `rendering` - Vertex format, meshing pipeline and meshing tasks
//! * `task_management` - Manages the worker threads meshing runs on
//! * `voxels` - Handles voxel data, chunks, streaming and world generation
//!
//! ## Architecture
//!
//! The chunk grid is shared between three kinds of threads through one
//! [`MtResource`]: the streaming thread moves the window, the mesh workers
//! rebuild dirty chunks, and the thread calling [`EngineState::tick`] combines
//! the results. The combined meshes are only touched by `tick`, so the caller
//! can hand them to a renderer between ticks.

use std::sync::Arc;

use cgmath::Point3;
use log::info;

use crate::core::{EngineConfig, MtResource, Result};
use rendering::meshing::{Combiner, MeshingPipeline, TickReport};
use voxels::{
    block::block_type::BlockTypeTable,
    streaming::{ChunkStore, StreamReport, StreamingThread, WorldStreamer},
    terrain::TerrainGenerator,
    world::{ChunkGrid, GridDimensions},
};

pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the voxel engine.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use cgmath::Point3;
/// use voxel_streamer::core::EngineConfig;
/// use voxel_streamer::engine_state::{
///     voxels::{block::block_type::BlockTypeTable, terrain::PerlinTerrain},
///     EngineState,
/// };
///
/// let config = EngineConfig::default();
/// let mut engine = EngineState::new(
///     config,
///     Arc::new(BlockTypeTable::default()),
///     Arc::new(PerlinTerrain::new(0)),
/// )?;
///
/// loop {
///     engine.update_viewer(Point3::new(0.0, 40.0, 0.0));
///     let report = engine.tick();
///     if report.combined.is_some() {
///         // Upload engine.combiner().opaque() to the GPU.
///     }
/// }
/// # Ok::<(), voxel_streamer::core::EngineError>(())
/// ```
pub struct EngineState {
    config: EngineConfig,
    grid: MtResource<ChunkGrid>,
    pipeline: MeshingPipeline,
    streaming: StreamingThread,
    last_passes: Vec<StreamReport>,
}

impl EngineState {
    /// Creates the grid, starts the mesh workers and the streaming thread.
    ///
    /// Nothing is loaded until the first [`EngineState::update_viewer`].
    pub fn new(
        config: EngineConfig,
        table: Arc<BlockTypeTable>,
        generator: Arc<dyn TerrainGenerator>,
    ) -> Result<Self> {
        config.validate()?;

        let dimensions = GridDimensions::new(config.render_distance, config.world_height);
        let grid = MtResource::new(ChunkGrid::new(dimensions));
        let pipeline = MeshingPipeline::new(&config, grid.clone(), table)?;
        let streamer = WorldStreamer::new(grid.clone(), generator, ChunkStore::from_config(&config));
        let streaming = StreamingThread::spawn(streamer)?;

        info!(
            "Engine ready: {}x{}x{} chunk grid, {} mesh workers",
            dimensions.width, dimensions.height, dimensions.depth, config.worker_count
        );

        Ok(Self {
            config,
            grid,
            pipeline,
            streaming,
            last_passes: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Shared handle to the chunk grid, e.g. for block edits.
    pub fn grid(&self) -> &MtResource<ChunkGrid> {
        &self.grid
    }

    /// The combined meshes and render lookup tables of the last combine.
    pub fn combiner(&self) -> &Combiner {
        self.pipeline.combiner()
    }

    pub fn combiner_mut(&mut self) -> &mut Combiner {
        self.pipeline.combiner_mut()
    }

    /// Requests a streaming pass around the viewer. Returns `false` if one is
    /// already running.
    pub fn update_viewer(&self, viewer: Point3<f32>) -> bool {
        self.streaming.request(viewer)
    }

    /// Streaming passes that finished before the last tick.
    pub fn last_passes(&self) -> &[StreamReport] {
        &self.last_passes
    }

    /// Runs one meshing tick.
    ///
    /// A streaming pass that evicted chunks forces a combine, since evicted
    /// chunks do not show up as meshed.
    pub fn tick(&mut self) -> TickReport {
        self.last_passes = self.streaming.finished_passes();
        if self.last_passes.iter().any(|pass| pass.evicted > 0) {
            self.pipeline.request_combine();
        }
        self.pipeline.tick()
    }

    /// Stops streaming and writes chunks with unsaved edits to disk.
    ///
    /// Returns how many chunks were written.
    pub fn shutdown(mut self) -> Result<usize> {
        match self.streaming.shutdown() {
            Some(mut streamer) => streamer.save_modified(),
            None => Ok(0),
        }
    }
}
