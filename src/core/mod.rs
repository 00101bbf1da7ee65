//! # Core Module
//!
//! Fundamental types shared by every engine subsystem.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `EngineError`: The crate error type
//! - `EngineConfig`: Engine configuration loaded from defaults or JSON
//! - `logging`: env_logger initialisation

pub mod config;
pub mod error;
pub mod logging;

pub mod mt_resource;

pub use config::{EngineConfig, MeshPoolConfig};
pub use error::{EngineError, Result};
pub use mt_resource::MtResource;
