//! The fixed-rate meshing pipeline: fan dirty chunks out to the workers, wait
//! for the batch, and rebuild the combined meshes if anything changed.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use web_time::Instant;

use super::combiner::{CombineReport, Combiner};
use crate::core::{EngineConfig, MtResource, Result};
use crate::engine_state::{
    rendering::tasks::{partition_grid, GridPartition, MeshPartitionTask},
    task_management::{task::BatchSummary, TaskManager},
    voxels::{block::block_type::BlockTypeTable, world::ChunkGrid},
};

/// Most ticks a single [`TickClock::advance`] call reports after a stall.
pub const MAX_CATCH_UP_TICKS: u32 = 5;

/// Accumulates elapsed time into fixed-length ticks.
#[derive(Debug, Clone)]
pub struct TickClock {
    tick_length: Duration,
    accumulated: Duration,
    last: Instant,
}

impl TickClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_length: Duration::from_secs(1) / tick_rate_hz.max(1),
            accumulated: Duration::ZERO,
            last: Instant::now(),
        }
    }

    pub fn tick_length(&self) -> Duration {
        self.tick_length
    }

    /// Adds `elapsed` and returns how many ticks are due.
    ///
    /// At most [`MAX_CATCH_UP_TICKS`] are returned; time beyond that is dropped
    /// so a long stall does not cause a burst of ticks.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated += elapsed;
        let mut due = 0;
        while self.accumulated >= self.tick_length && due < MAX_CATCH_UP_TICKS {
            self.accumulated -= self.tick_length;
            due += 1;
        }
        if due == MAX_CATCH_UP_TICKS && self.accumulated >= self.tick_length {
            self.accumulated = Duration::ZERO;
        }
        due
    }

    /// Advances by the wall-clock time since the previous call.
    pub fn update(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        self.advance(elapsed)
    }
}

/// What one pipeline tick did.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    pub meshing: BatchSummary,
    /// Set when the combined meshes were rebuilt this tick.
    pub combined: Option<CombineReport>,
    pub elapsed: Duration,
}

/// Owns the worker pool and the combiner.
pub struct MeshingPipeline {
    task_manager: TaskManager,
    grid: MtResource<ChunkGrid>,
    table: Arc<BlockTypeTable>,
    partitions: Vec<GridPartition>,
    combiner: Combiner,
    combine_pending: bool,
}

impl MeshingPipeline {
    /// Starts `config.worker_count` workers and allocates the combined meshes.
    pub fn new(config: &EngineConfig, grid: MtResource<ChunkGrid>, table: Arc<BlockTypeTable>) -> Result<Self> {
        let dimensions = grid.get().dimensions();
        let partitions = partition_grid(dimensions, config.worker_count);
        let task_manager = TaskManager::new(config.worker_count, partitions.len())?;
        let combiner = Combiner::new(config.pool.clone(), dimensions.slot_count())?;

        Ok(Self {
            task_manager,
            grid,
            table,
            partitions,
            combiner,
            combine_pending: true,
        })
    }

    pub fn combiner(&self) -> &Combiner {
        &self.combiner
    }

    /// Access for the external culling step that sets per-chunk visibility.
    pub fn combiner_mut(&mut self) -> &mut Combiner {
        &mut self.combiner
    }

    /// Forces a combine pass on the next tick, e.g. after chunks were evicted.
    pub fn request_combine(&mut self) {
        self.combine_pending = true;
    }

    /// Runs one tick: remeshes dirty chunks on the workers, waits for them and
    /// combines if any chunk changed.
    pub fn tick(&mut self) -> TickReport {
        let start = Instant::now();

        for partition in &self.partitions {
            let task = MeshPartitionTask::new(self.grid.clone(), Arc::clone(&self.table), partition.clone());
            if !self.task_manager.publish_task(Box::new(task)) {
                warn!("Could not queue meshing partition {:?}", partition);
            }
        }
        let meshing = self.task_manager.wait_idle();

        let combined = if meshing.any_updated() || self.combine_pending {
            self.combine_pending = false;
            let grid = self.grid.get();
            Some(self.combiner.combine(&grid))
        } else {
            None
        };

        let report = TickReport {
            meshing,
            combined,
            elapsed: start.elapsed(),
        };
        if report.meshing.chunks_meshed > 0 {
            debug!(
                "Meshed {} chunks ({} failures) in {:?}",
                report.meshing.chunks_meshed, report.meshing.failures, report.elapsed
            );
        }
        report
    }
}
