//! # Streaming
//!
//! Keeps the chunk grid centered on the viewer.
//!
//! A streaming pass moves the window origin, evicts the chunks that left the
//! window, relocates the survivors and fills every empty slot. Block data for
//! a new slot comes from the [`ChunkStore`] when the chunk was seen before and
//! from the terrain generator otherwise.
//!
//! The grid lock is only held to shift the window and to install each
//! finished chunk. Terrain generation and chunk file I/O run without it, so
//! meshing workers keep making progress during a long pass.
//!
//! Passes run on a dedicated thread behind a single-slot mailbox: a request
//! made while a pass is running is dropped, not queued. The viewer simply asks
//! again on its next movement.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cgmath::Point3;
use log::{debug, info, warn};
use lru::LruCache;
use web_time::Instant;

use super::{
    block::Block,
    chunk::persistence::{chunk_path, load_chunk_from_file, save_blocks_to_file},
    terrain::TerrainGenerator,
    world::{ChunkGrid, EvictedChunk},
};
use crate::core::{EngineConfig, EngineError, MtResource, Result};

/// Where the blocks of a newly loaded chunk came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkSource {
    Cache,
    Disk,
    Generated,
}

/// Block data handed out by [`ChunkStore::fetch`].
#[derive(Debug)]
pub struct FetchedChunk {
    pub blocks: Box<[Block]>,
    /// Edits that have not been written to disk yet.
    pub modified: bool,
    pub source: ChunkSource,
}

struct CachedChunk {
    blocks: Box<[Block]>,
    modified: bool,
}

/// Remembers evicted chunks so that returning to an area does not regenerate it.
///
/// Recently evicted chunks stay in memory in an LRU cache. When a save
/// directory is configured, modified chunks are also written to their chunk
/// file on eviction, and chunk files are consulted before the generator.
pub struct ChunkStore {
    cache: LruCache<Point3<i32>, CachedChunk>,
    save_directory: Option<PathBuf>,
    persist_on_evict: bool,
}

impl ChunkStore {
    pub fn new(capacity: usize, save_directory: Option<PathBuf>, persist_on_evict: bool) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            save_directory,
            persist_on_evict,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.evicted_cache_capacity,
            config.save_directory.clone(),
            config.persist_on_evict,
        )
    }

    pub fn save_directory(&self) -> Option<&Path> {
        self.save_directory.as_deref()
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, world_position: Point3<i32>) -> bool {
        self.cache.contains(&world_position)
    }

    /// Keeps an evicted chunk, writing it to disk first if it has unsaved edits.
    ///
    /// A failed write is logged and the edits stay marked as unsaved in the cache.
    pub fn store(&mut self, evicted: EvictedChunk) {
        let mut modified = evicted.modified;
        if modified && self.persist_on_evict {
            if let Some(directory) = &self.save_directory {
                let path = chunk_path(directory, evicted.world_position);
                match save_blocks_to_file(&evicted.blocks, evicted.world_position, &path) {
                    Ok(()) => modified = false,
                    Err(err) => warn!("Could not save chunk {:?}: {}", evicted.world_position, err),
                }
            }
        }

        let pushed_out = self.cache.push(
            evicted.world_position,
            CachedChunk {
                blocks: evicted.blocks,
                modified,
            },
        );
        if let Some((position, chunk)) = pushed_out {
            if position != evicted.world_position && chunk.modified {
                warn!("Dropping unsaved edits of chunk {:?}", position);
            }
        }
    }

    /// Writes every cached chunk with unsaved edits to its chunk file in
    /// `directory` and returns how many were written.
    pub fn flush_modified(&mut self, directory: &Path) -> Result<usize> {
        let mut saved = 0;
        for (world_position, chunk) in self.cache.iter_mut() {
            if !chunk.modified {
                continue;
            }
            save_blocks_to_file(&chunk.blocks, *world_position, &chunk_path(directory, *world_position))?;
            chunk.modified = false;
            saved += 1;
        }
        Ok(saved)
    }

    /// Block data for a world chunk: cached, read from its chunk file, or
    /// freshly generated.
    ///
    /// A chunk file that cannot be read, has the wrong size or belongs to
    /// another coordinate is logged and the chunk is regenerated.
    pub fn fetch(&mut self, world_position: Point3<i32>, generator: &dyn TerrainGenerator) -> FetchedChunk {
        if let Some(cached) = self.cache.pop(&world_position) {
            return FetchedChunk {
                blocks: cached.blocks,
                modified: cached.modified,
                source: ChunkSource::Cache,
            };
        }

        if let Some(blocks) = self.read_chunk_file(world_position) {
            return FetchedChunk {
                blocks,
                modified: false,
                source: ChunkSource::Disk,
            };
        }

        FetchedChunk {
            blocks: generator.generate_blocks(world_position).into_boxed_slice(),
            modified: false,
            source: ChunkSource::Generated,
        }
    }

    fn read_chunk_file(&self, world_position: Point3<i32>) -> Option<Box<[Block]>> {
        let path = chunk_path(self.save_directory.as_deref()?, world_position);
        if !path.exists() {
            return None;
        }

        match load_chunk_from_file(&path) {
            Ok(data) if data.world_position == world_position => Some(data.blocks),
            Ok(data) => {
                warn!(
                    "Chunk file {:?} holds chunk {:?}, regenerating {:?}",
                    path, data.world_position, world_position
                );
                None
            }
            Err(err) => {
                warn!("Regenerating chunk {:?}: {}", world_position, err);
                None
            }
        }
    }
}

/// What one streaming pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamReport {
    pub evicted: usize,
    pub shifted: usize,
    pub loaded: usize,
    /// Loaded chunks that came from the cache or a chunk file.
    pub reused: usize,
    pub elapsed: Duration,
}

impl StreamReport {
    pub fn changed_grid(&self) -> bool {
        self.evicted > 0 || self.shifted > 0 || self.loaded > 0
    }
}

/// Owns the streaming side of the world: the terrain generator and the store
/// of evicted chunks, working on the shared grid.
pub struct WorldStreamer {
    grid: MtResource<ChunkGrid>,
    generator: Arc<dyn TerrainGenerator>,
    store: ChunkStore,
}

impl WorldStreamer {
    pub fn new(grid: MtResource<ChunkGrid>, generator: Arc<dyn TerrainGenerator>, store: ChunkStore) -> Self {
        Self {
            grid,
            generator,
            store,
        }
    }

    pub fn grid(&self) -> &MtResource<ChunkGrid> {
        &self.grid
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// Re-centers the grid on a viewer at `viewer` (world block coordinates).
    ///
    /// Does nothing if the window origin is unchanged and every slot is loaded.
    pub fn load_around_entity(&mut self, viewer: Point3<f32>) -> StreamReport {
        let start = Instant::now();

        let (shift, empty_slots) = {
            let mut grid = self.grid.get_mut();
            let (new_cx, new_cz) = grid.window_origin_for(viewer);
            let empty_slots = grid.empty_slots();
            if grid.origin() == (new_cx, new_cz) && empty_slots.is_empty() {
                return StreamReport::default();
            }
            let shift = grid.shift_window(new_cx, new_cz);
            (shift, grid.empty_slots())
        };

        let mut report = StreamReport {
            evicted: shift.evicted.len(),
            shifted: shift.shifted,
            ..StreamReport::default()
        };
        for evicted in shift.evicted {
            self.store.store(evicted);
        }

        for (slot, world_position) in empty_slots {
            let fetched = self.store.fetch(world_position, self.generator.as_ref());
            let installed = self
                .grid
                .get_mut()
                .install_chunk(slot, world_position, &fetched.blocks, fetched.modified);
            match installed {
                Ok(true) => {
                    report.loaded += 1;
                    if fetched.source != ChunkSource::Generated {
                        report.reused += 1;
                    }
                }
                Ok(false) => debug!("Slot {:?} no longer expects chunk {:?}", slot, world_position),
                Err(err) => warn!("Could not install chunk {:?}: {}", world_position, err),
            }
        }

        report.elapsed = start.elapsed();
        debug!(
            "Streaming pass: {} evicted, {} shifted, {} loaded ({} reused) in {:?}",
            report.evicted, report.shifted, report.loaded, report.reused, report.elapsed
        );
        report
    }

    /// Writes every chunk with unsaved edits to its chunk file, both the loaded
    /// ones and those waiting in the evicted-chunk cache.
    ///
    /// Returns how many chunks were written. Without a save directory nothing
    /// is written.
    pub fn save_modified(&mut self) -> Result<usize> {
        let Some(directory) = self.store.save_directory.clone() else {
            return Ok(0);
        };

        let mut saved = self.store.flush_modified(&directory)?;
        let mut grid = self.grid.get_mut();
        let dimensions = grid.dimensions();
        for index in 0..dimensions.slot_count() {
            let slot = dimensions.slot_position(index);
            let Some(chunk) = grid.chunk_mut(slot.x, slot.y, slot.z) else {
                continue;
            };
            if !chunk.is_loaded || !chunk.modified {
                continue;
            }
            save_blocks_to_file(chunk.blocks(), chunk.world_position, &chunk_path(&directory, chunk.world_position))?;
            chunk.modified = false;
            saved += 1;
        }
        Ok(saved)
    }
}

/// Runs streaming passes on a background thread.
pub struct StreamingThread {
    requests: Option<SyncSender<Point3<f32>>>,
    reports: Receiver<StreamReport>,
    handle: Option<JoinHandle<WorldStreamer>>,
}

impl StreamingThread {
    /// Moves `streamer` onto a new thread named `streaming`.
    pub fn spawn(mut streamer: WorldStreamer) -> Result<Self> {
        // A rendezvous channel only accepts a request while the thread waits
        // for one, so requests made during a pass are dropped.
        let (request_sender, request_receiver) = mpsc::sync_channel::<Point3<f32>>(0);
        let (report_sender, reports) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("streaming".to_string())
            .spawn(move || {
                while let Ok(viewer) = request_receiver.recv() {
                    let report = streamer.load_around_entity(viewer);
                    if report_sender.send(report).is_err() {
                        break;
                    }
                }
                info!("Streaming thread stopped");
                streamer
            })
            .map_err(|err| EngineError::WorkerSpawn(err.to_string()))?;

        Ok(Self {
            requests: Some(request_sender),
            reports,
            handle: Some(handle),
        })
    }

    /// Asks for a pass around `viewer`. Returns `false` if a pass is already
    /// running (the request is dropped) or the thread has stopped.
    pub fn request(&self, viewer: Point3<f32>) -> bool {
        let Some(requests) = &self.requests else {
            return false;
        };
        match requests.try_send(viewer) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => false,
            Err(TrySendError::Disconnected(_)) => {
                warn!("Streaming thread is gone");
                false
            }
        }
    }

    /// Reports of the passes finished since the last call.
    pub fn finished_passes(&self) -> Vec<StreamReport> {
        self.reports.try_iter().collect()
    }

    /// Waits up to `timeout` for the next finished pass.
    pub fn wait_for_pass(&self, timeout: Duration) -> Option<StreamReport> {
        self.reports.recv_timeout(timeout).ok()
    }

    /// Stops the thread after its current pass and hands the streamer back.
    pub fn shutdown(&mut self) -> Option<WorldStreamer> {
        self.requests.take();
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(streamer) => Some(streamer),
            Err(_) => {
                warn!("Streaming thread panicked");
                None
            }
        }
    }
}

impl Drop for StreamingThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
