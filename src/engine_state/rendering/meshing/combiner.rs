//! Concatenation of per-chunk meshes into the two render-facing buffers.

use log::{debug, error};
use web_time::Instant;

use super::{
    mesh::Mesh,
    mesh_pool::{CombinedMesh, MeshPool},
    render_lookup::RenderLookupTable,
};
use crate::core::{MeshPoolConfig, Result};
use crate::engine_state::voxels::{chunk::Chunk, world::ChunkGrid};

/// Which combined meshes a pass rebuilt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombineReport {
    pub opaque: bool,
    pub transparent: bool,
}

/// Owns the opaque and transparent combined meshes and their lookup tables.
///
/// The renderer reads these between passes; the combiner is their only writer.
pub struct Combiner {
    pool: MeshPool,
    opaque: CombinedMesh,
    transparent: CombinedMesh,
    opaque_lookup: RenderLookupTable,
    transparent_lookup: RenderLookupTable,
}

/// Selects one of the two bucket sets of a chunk.
type BucketSelector = fn(&Chunk) -> &Mesh;

impl Combiner {
    /// Allocates both combined meshes at the pool's initial capacity.
    pub fn new(pool_config: MeshPoolConfig, slot_count: usize) -> Result<Self> {
        let pool = MeshPool::new(pool_config);
        Ok(Self {
            opaque: pool.allocate()?,
            transparent: pool.allocate()?,
            pool,
            opaque_lookup: RenderLookupTable::new(slot_count),
            transparent_lookup: RenderLookupTable::new(slot_count),
        })
    }

    pub fn opaque(&self) -> &CombinedMesh {
        &self.opaque
    }

    pub fn transparent(&self) -> &CombinedMesh {
        &self.transparent
    }

    pub fn opaque_lookup(&self) -> &RenderLookupTable {
        &self.opaque_lookup
    }

    pub fn transparent_lookup(&self) -> &RenderLookupTable {
        &self.transparent_lookup
    }

    /// Marks a slot visible or culled in both lookup tables.
    pub fn set_visible(&mut self, slot: usize, visible: bool) -> bool {
        self.opaque_lookup.set_visible(slot, visible) && self.transparent_lookup.set_visible(slot, visible)
    }

    /// Rebuilds both combined meshes from the loaded chunks of `grid`.
    ///
    /// Chunks are copied in Y, X, Z order. If a mesh cannot grow to the
    /// required size that mesh keeps its previous contents and the pass goes
    /// on with the other one.
    pub fn combine(&mut self, grid: &ChunkGrid) -> CombineReport {
        let start = Instant::now();
        let opaque = combine_into(
            &self.pool,
            grid,
            |chunk| &chunk.meshes.opaque,
            &mut self.opaque,
            &mut self.opaque_lookup,
            "opaque",
        );
        let transparent = combine_into(
            &self.pool,
            grid,
            |chunk| &chunk.meshes.transparent,
            &mut self.transparent,
            &mut self.transparent_lookup,
            "transparent",
        );

        debug!(
            "Combined {} opaque / {} transparent vertices, {} / {} indices in {:?}",
            self.opaque.vertex_count(),
            self.transparent.vertex_count(),
            self.opaque.index_count(),
            self.transparent.index_count(),
            start.elapsed()
        );

        CombineReport { opaque, transparent }
    }
}

fn combine_into(
    pool: &MeshPool,
    grid: &ChunkGrid,
    select: BucketSelector,
    target: &mut CombinedMesh,
    lookup: &mut RenderLookupTable,
    label: &str,
) -> bool {
    let dimensions = grid.dimensions();
    let chunks = grid.chunks();

    let (total_vertices, total_indices) = chunks
        .iter()
        .filter(|chunk| chunk.is_loaded)
        .map(select)
        .fold((0, 0), |(vertices, indices), mesh| {
            (vertices + mesh.vertex_count(), indices + mesh.index_count())
        });

    if let Err(err) = pool.ensure_capacity(target, total_vertices, total_indices) {
        error!("Skipping {} combine pass, keeping previous buffer: {}", label, err);
        return false;
    }

    target.reset();
    lookup.clear_ranges();

    for slot in dimensions.combine_order() {
        let index = dimensions.slot_index(slot.x, slot.y, slot.z);
        let chunk = &chunks[index];
        if !chunk.is_loaded {
            continue;
        }

        let start_index = target.index_count() as u32;
        for side in select(chunk).sides.iter() {
            target.append(&side.vertices, &side.indices);
        }
        lookup.set_range(index, start_index, target.index_count() as u32 - start_index);
    }

    true
}
