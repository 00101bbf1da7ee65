//! Memory management for the combined mesh buffers.
//!
//! Each combined mesh owns one vertex and one index buffer that are reused from
//! pass to pass. Capacity only ever grows:
//! - up to the pooled ceiling the buffers grow in power-of-two steps, so a world
//!   that slowly gains geometry reallocates rarely
//! - above the ceiling they are sized exactly to the request
//! - a request above the hard limit is refused
//!
//! Growth goes through `try_reserve`, so an allocation failure is reported as an
//! error and the buffer keeps its previous contents.

use log::debug;

use crate::core::{EngineError, MeshPoolConfig, Result};
use crate::engine_state::rendering::Vertex;

/// One merged vertex/index buffer, opaque or transparent.
///
/// Every index is smaller than [`CombinedMesh::vertex_count`] and the counts
/// never exceed the capacities.
#[derive(Debug, Default)]
pub struct CombinedMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl CombinedMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn capacity_vertices(&self) -> usize {
        self.vertices.capacity()
    }

    pub fn capacity_indices(&self) -> usize {
        self.indices.capacity()
    }

    /// Vertex bytes in the layout the renderer uploads.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Empties both buffers, keeping their capacity.
    pub(crate) fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends a bucket, rebasing its indices onto the vertices already present.
    ///
    /// Capacity must already have been reserved.
    pub(crate) fn append(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let base_vertex = self.vertices.len() as u32;
        self.vertices.extend_from_slice(vertices);
        self.indices
            .extend(indices.iter().map(|index| index + base_vertex));
    }
}

/// Sizing policy shared by both combined meshes.
#[derive(Debug, Clone)]
pub struct MeshPool {
    config: MeshPoolConfig,
}

impl MeshPool {
    pub fn new(config: MeshPoolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MeshPoolConfig {
        &self.config
    }

    /// Allocates a combined mesh with the initial pooled capacity.
    pub fn allocate(&self) -> Result<CombinedMesh> {
        let mut mesh = CombinedMesh::default();
        self.ensure_capacity(
            &mut mesh,
            self.config.initial_vertices,
            self.config.initial_indices,
        )?;
        Ok(mesh)
    }

    /// Capacity to grow to for `required` elements, or `None` above `max`.
    pub fn target_capacity(required: usize, current: usize, ceiling: usize, max: usize) -> Option<usize> {
        if required > max {
            return None;
        }
        if required <= current {
            return Some(current);
        }
        let pooled = required.next_power_of_two();
        Some(if pooled <= ceiling { pooled.min(max) } else { required })
    }

    /// Makes sure `mesh` can hold `vertices` and `indices` elements.
    ///
    /// On error `mesh` is unchanged.
    pub fn ensure_capacity(&self, mesh: &mut CombinedMesh, vertices: usize, indices: usize) -> Result<()> {
        let vertex_target = Self::target_capacity(
            vertices,
            mesh.vertices.capacity(),
            self.config.pooled_ceiling_vertices,
            self.config.max_vertices,
        )
        .ok_or(EngineError::Allocation {
            what: "combined vertices",
            requested: vertices,
        })?;
        let index_target = Self::target_capacity(
            indices,
            mesh.indices.capacity(),
            self.config.pooled_ceiling_indices,
            self.config.max_indices,
        )
        .ok_or(EngineError::Allocation {
            what: "combined indices",
            requested: indices,
        })?;

        if vertex_target > mesh.vertices.capacity() {
            mesh.vertices
                .try_reserve_exact(vertex_target - mesh.vertices.len())
                .map_err(|_| EngineError::Allocation {
                    what: "combined vertices",
                    requested: vertex_target,
                })?;
            debug!("Combined vertex buffer grown to {}", mesh.vertices.capacity());
        }
        if index_target > mesh.indices.capacity() {
            mesh.indices
                .try_reserve_exact(index_target - mesh.indices.len())
                .map_err(|_| EngineError::Allocation {
                    what: "combined indices",
                    requested: index_target,
                })?;
            debug!("Combined index buffer grown to {}", mesh.indices.capacity());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    fn small_pool() -> MeshPool {
        MeshPool::new(MeshPoolConfig {
            initial_vertices: 4,
            initial_indices: 6,
            pooled_ceiling_vertices: 64,
            pooled_ceiling_indices: 96,
            max_vertices: 1000,
            max_indices: 1500,
        })
    }

    #[test]
    fn test_target_capacity_policy() {
        assert_eq!(MeshPool::target_capacity(10, 16, 64, 1000), Some(16));
        assert_eq!(MeshPool::target_capacity(17, 16, 64, 1000), Some(32));
        assert_eq!(MeshPool::target_capacity(100, 16, 64, 1000), Some(100));
        assert_eq!(MeshPool::target_capacity(1001, 16, 64, 1000), None);
    }

    #[test]
    fn test_allocate_uses_initial_capacity() {
        let mesh = small_pool().allocate().unwrap();
        assert!(mesh.capacity_vertices() >= 4);
        assert!(mesh.capacity_indices() >= 6);
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_over_limit_leaves_mesh_untouched() {
        let pool = small_pool();
        let mut mesh = pool.allocate().unwrap();
        mesh.append(&[Vertex::zeroed(); 4], &[0, 1, 2, 0, 2, 3]);

        let result = pool.ensure_capacity(&mut mesh, 2000, 6);
        assert!(matches!(result, Err(EngineError::Allocation { requested: 2000, .. })));
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = CombinedMesh::default();
        mesh.append(&[Vertex::zeroed(); 4], &[0, 1, 2, 0, 2, 3]);
        mesh.append(&[Vertex::zeroed(); 4], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&mesh.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.vertex_bytes().len(), 8 * 32);
    }
}
