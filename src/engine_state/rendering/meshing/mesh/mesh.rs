//! Mesh data structures for voxel rendering.
//!
//! A chunk owns twelve mesh buckets: one per face direction for opaque geometry
//! and one per face direction for transparent geometry. Each bucket's indices
//! refer to that bucket's own vertices, starting at zero; the combiner rebases
//! them when it concatenates chunks.

use crate::engine_state::rendering::Vertex;
use crate::engine_state::voxels::block::block_side::BlockSide;

/// Represents a single side of a mesh with its associated vertices and indices.
#[derive(Debug, Clone)]
pub struct MeshSide {
    /// The vertex data for this mesh side
    pub vertices: Vec<Vertex>,
    /// The index data for this mesh side
    pub indices: Vec<u32>,
    /// Always equal to `vertices.len()`
    pub vertex_count: u32,
    /// Always equal to `indices.len()`
    pub index_count: u32,
    /// Which block side this mesh represents
    pub side: BlockSide,
}

impl MeshSide {
    /// Creates a new, empty `MeshSide` for the specified block side.
    pub fn new(side: BlockSide) -> Self {
        MeshSide {
            vertices: Vec::new(),
            indices: Vec::new(),
            vertex_count: 0,
            index_count: 0,
            side,
        }
    }

    /// Empties the bucket but keeps its allocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// Empties the bucket and frees its allocation.
    pub fn release(&mut self) {
        self.vertices = Vec::new();
        self.indices = Vec::new();
        self.vertex_count = 0;
        self.index_count = 0;
    }

    /// Appends a quad whose corners are in counter-clockwise order when seen
    /// from the side the quad faces.
    pub fn push_quad(&mut self, corners: [Vertex; 4]) {
        let quad_number = self.vertices.len() as u32 / 4;
        self.vertices.extend_from_slice(&corners);
        self.indices.extend_from_slice(&Mesh::generate_face_indices(quad_number));
        self.vertex_count = self.vertices.len() as u32;
        self.index_count = self.indices.len() as u32;
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// The six per-face buckets of one kind of geometry (opaque or transparent).
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Array of mesh sides, indexed by `BlockSide` enum values.
    pub sides: [MeshSide; 6],
}

impl Mesh {
    /// Creates a new, empty mesh with all sides initialized.
    pub fn new() -> Self {
        Mesh {
            sides: BlockSide::all().map(MeshSide::new),
        }
    }

    pub fn side(&self, side: BlockSide) -> &MeshSide {
        &self.sides[side as usize]
    }

    pub fn side_mut(&mut self, side: BlockSide) -> &mut MeshSide {
        &mut self.sides[side as usize]
    }

    pub fn clear(&mut self) {
        self.sides.iter_mut().for_each(MeshSide::clear);
    }

    pub fn release(&mut self) {
        self.sides.iter_mut().for_each(MeshSide::release);
    }

    /// Generates index data for a quad, offset by the number of quads already
    /// in the bucket. Two triangles, (0, 1, 2) and (0, 2, 3).
    pub fn generate_face_indices(num_faces_generated: u32) -> [u32; 6] {
        let base = num_faces_generated * 4;
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }

    /// Total vertices over the six sides.
    pub fn vertex_count(&self) -> usize {
        self.sides.iter().map(|side| side.vertices.len()).sum()
    }

    /// Total indices over the six sides.
    pub fn index_count(&self) -> usize {
        self.sides.iter().map(|side| side.indices.len()).sum()
    }

    pub fn quad_count(&self) -> usize {
        self.sides.iter().map(MeshSide::quad_count).sum()
    }

    /// Gets the number of vertices for each side of the mesh, in `BlockSide` order.
    pub fn get_vertex_lens(&self) -> [u64; 6] {
        self.sides.each_ref().map(|side| side.vertices.len() as u64)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// The twelve mesh buckets of a chunk.
#[derive(Debug, Clone, Default)]
pub struct ChunkMeshes {
    pub opaque: Mesh,
    pub transparent: Mesh,
}

impl ChunkMeshes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bucket set geometry of the given translucency goes into.
    pub fn bucket_mut(&mut self, translucent: bool) -> &mut Mesh {
        if translucent {
            &mut self.transparent
        } else {
            &mut self.opaque
        }
    }

    pub fn clear(&mut self) {
        self.opaque.clear();
        self.transparent.clear();
    }

    pub fn release(&mut self) {
        self.opaque.release();
        self.transparent.release();
    }

    pub fn quad_count(&self) -> usize {
        self.opaque.quad_count() + self.transparent.quad_count()
    }
}
