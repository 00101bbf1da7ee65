//! Error types for the voxel streamer

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the engine.
///
/// None of these errors is fatal to the process. The component that owns the
/// failing operation logs it and degrades: a chunk is regenerated instead of
/// loaded, a slot is skipped for this tick, or the previous combined mesh is
/// kept.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chunk file {path:?} has {actual} bytes, expected {expected}")]
    ChunkFileSize {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("grid slot ({x}, {y}, {z}) is outside the chunk grid")]
    InvalidSlot { x: usize, y: usize, z: usize },

    #[error("failed to allocate {requested} elements for {what}")]
    Allocation { what: &'static str, requested: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;
