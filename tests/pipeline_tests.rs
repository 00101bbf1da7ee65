use std::sync::Arc;

use cgmath::Point3;

use voxel_streamer::core::{EngineConfig, MeshPoolConfig, MtResource};
use voxel_streamer::engine_state::{
    rendering::meshing::{CombineReport, MeshingPipeline},
    voxels::{
        block::{block_type::{ids, BlockTypeTable}, Block},
        streaming::{ChunkStore, WorldStreamer},
        terrain::{FlatTerrain, PerlinTerrain, TerrainGenerator},
        world::{ChunkGrid, GridDimensions},
    },
};

fn loaded_grid(config: &EngineConfig, generator: Arc<dyn TerrainGenerator>, viewer: Point3<f32>) -> MtResource<ChunkGrid> {
    let dimensions = GridDimensions::new(config.render_distance, config.world_height);
    let grid = MtResource::new(ChunkGrid::new(dimensions));
    let mut streamer = WorldStreamer::new(grid.clone(), generator, ChunkStore::new(4, None, false));
    streamer.load_around_entity(viewer);
    grid
}

fn small_config() -> EngineConfig {
    EngineConfig {
        render_distance: 3,
        world_height: 3,
        worker_count: 2,
        ..EngineConfig::default()
    }
}

#[test]
fn test_combined_counts_equal_chunk_sums() {
    let config = small_config();
    let grid = loaded_grid(&config, Arc::new(PerlinTerrain::new(5)), Point3::new(0.0, 30.0, 0.0));
    let mut pipeline = MeshingPipeline::new(&config, grid.clone(), Arc::new(BlockTypeTable::default())).expect("pipeline");

    let report = pipeline.tick();
    assert_eq!(report.meshing.chunks_meshed, 27);
    assert_eq!(
        report.combined,
        Some(CombineReport {
            opaque: true,
            transparent: true
        })
    );

    let grid = grid.get();
    assert_eq!(grid.dirty_count(), 0);
    let loaded = grid.chunks().iter().filter(|chunk| chunk.is_loaded);
    let (opaque_vertices, opaque_indices, transparent_vertices, transparent_indices) =
        loaded.fold((0, 0, 0, 0), |sums, chunk| {
            (
                sums.0 + chunk.meshes.opaque.vertex_count(),
                sums.1 + chunk.meshes.opaque.index_count(),
                sums.2 + chunk.meshes.transparent.vertex_count(),
                sums.3 + chunk.meshes.transparent.index_count(),
            )
        });

    let combiner = pipeline.combiner();
    assert!(opaque_vertices > 0);
    assert_eq!(combiner.opaque().vertex_count(), opaque_vertices);
    assert_eq!(combiner.opaque().index_count(), opaque_indices);
    assert_eq!(combiner.transparent().vertex_count(), transparent_vertices);
    assert_eq!(combiner.transparent().index_count(), transparent_indices);

    let vertex_count = combiner.opaque().vertex_count() as u32;
    assert!(combiner.opaque().indices().iter().all(|&index| index < vertex_count));

    // Each loaded chunk's slice covers exactly its own indices.
    for (slot, chunk) in grid.chunks().iter().enumerate() {
        let slice = combiner.opaque_lookup().get(slot).expect("slice per slot");
        assert_eq!(slice.index_count as usize, chunk.meshes.opaque.index_count());
    }
}

#[test]
fn test_tick_without_changes_skips_combine() {
    let config = small_config();
    let grid = loaded_grid(&config, Arc::new(FlatTerrain::default()), Point3::new(0.0, 0.0, 0.0));
    let mut pipeline = MeshingPipeline::new(&config, grid.clone(), Arc::new(BlockTypeTable::default())).expect("pipeline");

    assert!(pipeline.tick().combined.is_some());
    let idle = pipeline.tick();
    assert_eq!(idle.meshing.chunks_meshed, 0);
    assert!(idle.combined.is_none());

    assert!(grid.get_mut().set_block_world(Point3::new(1, 5, 1), Block::new(ids::FLOWER)));
    let edited = pipeline.tick();
    assert_eq!(edited.meshing.chunks_meshed, 1);
    assert!(edited.combined.is_some());
    assert_eq!(pipeline.combiner().transparent().vertex_count(), 16);
}

#[test]
fn test_failed_growth_keeps_previous_buffer() {
    let config = EngineConfig {
        render_distance: 1,
        world_height: 1,
        worker_count: 1,
        pool: MeshPoolConfig {
            initial_vertices: 16,
            initial_indices: 24,
            pooled_ceiling_vertices: 16,
            pooled_ceiling_indices: 24,
            max_vertices: 32,
            max_indices: 48,
        },
        ..EngineConfig::default()
    };
    let grid = loaded_grid(&config, Arc::new(FlatTerrain::new(vec![ids::STONE; 16])), Point3::new(8.0, 8.0, 8.0));
    let mut pipeline = MeshingPipeline::new(&config, grid.clone(), Arc::new(BlockTypeTable::default())).expect("pipeline");

    let first = pipeline.tick();
    assert_eq!(first.combined.map(|report| report.opaque), Some(true));
    let previous = pipeline.combiner().opaque().vertices().to_vec();
    assert_eq!(previous.len(), 24);

    // A hole in the top splits the top face and exposes its walls.
    assert!(grid.get_mut().set_block_world(Point3::new(8, 15, 8), Block::AIR));
    let second = pipeline.tick();
    assert_eq!(
        second.combined,
        Some(CombineReport {
            opaque: false,
            transparent: true
        })
    );
    assert_eq!(pipeline.combiner().opaque().vertices(), &previous[..]);
}

#[test]
fn test_engine_state_streams_and_meshes() {
    use std::time::{Duration, Instant};
    use voxel_streamer::engine_state::EngineState;

    let config = EngineConfig {
        render_distance: 2,
        world_height: 1,
        worker_count: 2,
        ..EngineConfig::default()
    };
    let mut engine = EngineState::new(config, Arc::new(BlockTypeTable::default()), Arc::new(FlatTerrain::default()))
        .expect("engine");

    let deadline = Instant::now() + Duration::from_secs(10);
    let viewer = Point3::new(0.0, 8.0, 0.0);
    while engine.grid().get().loaded_count() < 4 && Instant::now() < deadline {
        engine.update_viewer(viewer);
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(engine.grid().get().loaded_count(), 4);

    engine.tick();
    // 2x2 flat chunks seen from outside: one top and one bottom quad per chunk
    // and three quads per chunk side on the window border.
    assert_eq!(engine.combiner().opaque().vertex_count(), (4 * 2 + 8 * 3) * 4);
    assert_eq!(engine.shutdown().expect("shutdown"), 0);
}
