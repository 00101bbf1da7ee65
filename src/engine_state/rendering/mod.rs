//! Rendering-side data for the voxel engine.
//!
//! This module turns chunk data into the geometry an external renderer draws:
//! the vertex format, the meshing pipeline and the background meshing tasks.
//! Window, shader and texture handling are not part of this crate.

pub mod meshing;
pub mod tasks;
mod vertex;

// Re-export commonly used types
pub use vertex::Vertex;
