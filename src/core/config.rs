//! Engine configuration
//!
//! Configuration is plain data loaded once at start-up, either from defaults or
//! from a JSON file. Every field has a default so a partial file only overrides
//! what it names.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::{EngineError, Result};

/// Capacity policy for the combined mesh buffers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshPoolConfig {
    /// Vertices preallocated per combined mesh at start-up.
    pub initial_vertices: usize,
    /// Indices preallocated per combined mesh at start-up.
    pub initial_indices: usize,
    /// Largest vertex capacity the pool grows to in power-of-two steps.
    /// Requests above it are sized exactly.
    pub pooled_ceiling_vertices: usize,
    /// Largest index capacity the pool grows to in power-of-two steps.
    pub pooled_ceiling_indices: usize,
    /// Hard upper bound on vertices; a combine pass needing more is skipped.
    pub max_vertices: usize,
    /// Hard upper bound on indices.
    pub max_indices: usize,
}

impl Default for MeshPoolConfig {
    fn default() -> Self {
        Self {
            initial_vertices: 1 << 16,
            initial_indices: 3 << 15,
            pooled_ceiling_vertices: 1 << 22,
            pooled_ceiling_indices: 3 << 21,
            max_vertices: 1 << 26,
            max_indices: 3 << 25,
        }
    }
}

/// Top level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width and depth of the chunk window, in chunks.
    pub render_distance: usize,
    /// Height of the world, in chunks. The vertical axis is not windowed.
    pub world_height: usize,
    /// Number of meshing worker threads.
    pub worker_count: usize,
    /// Meshing and combine rate.
    pub tick_rate_hz: u32,
    /// Combined mesh buffer policy.
    pub pool: MeshPoolConfig,
    /// Directory holding chunk files. `None` disables persistence.
    pub save_directory: Option<PathBuf>,
    /// Whether modified chunks are written to `save_directory` when evicted.
    pub persist_on_evict: bool,
    /// Number of evicted chunks kept in memory for quick reloads.
    pub evicted_cache_capacity: usize,
    /// Optional JSON block table replacing the built-in one.
    pub block_table: Option<PathBuf>,
    /// Terrain seed.
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            render_distance: 8,
            world_height: 8,
            worker_count: 4,
            tick_rate_hz: 20,
            pool: MeshPoolConfig::default(),
            save_directory: None,
            persist_on_evict: true,
            evicted_cache_capacity: 64,
            block_table: None,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parses a configuration from JSON text and validates it.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Rejects values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.render_distance == 0 {
            return Err(EngineError::Config("render_distance must be at least 1".into()));
        }
        if self.world_height == 0 {
            return Err(EngineError::Config("world_height must be at least 1".into()));
        }
        if self.worker_count == 0 {
            return Err(EngineError::Config("worker_count must be at least 1".into()));
        }
        if self.tick_rate_hz == 0 {
            return Err(EngineError::Config("tick_rate_hz must be at least 1".into()));
        }
        if self.pool.max_vertices < self.pool.initial_vertices
            || self.pool.max_indices < self.pool.initial_indices
        {
            return Err(EngineError::Config(
                "pool hard limits must not be below the initial capacity".into(),
            ));
        }
        Ok(())
    }
}
