use cgmath::Point3;

use voxel_streamer::engine_state::{
    rendering::meshing::{is_face_visible, mesh, ChunkMeshes, Isolated, Mesh},
    voxels::{
        block::{block_side::BlockSide, block_type::{ids, BlockTypeTable}, Block},
        chunk::{Chunk, CHUNK_DIMENSION},
        terrain::{FlatTerrain, PerlinTerrain, TerrainGenerator},
    },
};

fn generated_chunk(generator: &dyn TerrainGenerator, world_position: Point3<i32>) -> Chunk {
    let mut chunk = Chunk::new(Point3::new(0, 0, 0));
    chunk.load(world_position, &generator.generate_blocks(world_position));
    chunk
}

fn assert_indices_in_bounds(mesh: &Mesh) {
    for side in &mesh.sides {
        assert_eq!(side.vertex_count as usize, side.vertices.len());
        assert_eq!(side.index_count as usize, side.indices.len());
        assert!(side.indices.iter().all(|&index| index < side.vertex_count));
    }
}

fn assert_meshes_in_bounds(meshes: &ChunkMeshes) {
    assert_indices_in_bounds(&meshes.opaque);
    assert_indices_in_bounds(&meshes.transparent);
}

#[test]
fn test_flat_world_scenario() {
    let table = BlockTypeTable::default();
    let chunk = generated_chunk(&FlatTerrain::default(), Point3::new(0, 0, 0));

    let meshes = mesh(&chunk, &Isolated, &table);
    let opaque = &meshes.opaque;

    assert_eq!(opaque.side(BlockSide::TOP).quad_count(), 1);
    assert_eq!(opaque.side(BlockSide::BOTTOM).quad_count(), 1);
    // Bedrock, dirt and grass do not merge with each other, the three dirt
    // layers merge into one quad.
    for side in [BlockSide::FRONT, BlockSide::LEFT, BlockSide::BACK, BlockSide::RIGHT] {
        assert_eq!(opaque.side(side).quad_count(), 3, "{:?}", side);
    }
    assert_eq!(opaque.quad_count(), 14);
    assert_eq!(meshes.transparent.quad_count(), 0);
    assert_meshes_in_bounds(&meshes);
}

#[test]
fn test_full_chunk_merges_to_six_quads() {
    let table = BlockTypeTable::default();
    for id in [ids::STONE, ids::DIRT, ids::BEDROCK] {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        chunk.load(Point3::new(0, 0, 0), &vec![Block::new(id); CHUNK_DIMENSION.pow(3)]);

        let meshes = mesh(&chunk, &Isolated, &table);
        assert_eq!(meshes.opaque.quad_count(), 6);
        for side in BlockSide::all() {
            assert_eq!(meshes.opaque.side(side).vertex_count, 4);
        }
    }
}

#[test]
fn test_translucent_visibility_is_symmetric() {
    let table = BlockTypeTable::default();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0));
    chunk.set_block(4, 4, 4, Block::new(ids::GLASS));
    chunk.set_block(5, 4, 4, Block::new(ids::GLASS));

    assert!(!is_face_visible(&chunk, &Isolated, &table, 4, 4, 4, BlockSide::RIGHT));
    assert!(!is_face_visible(&chunk, &Isolated, &table, 5, 4, 4, BlockSide::LEFT));

    chunk.set_block(5, 4, 4, Block::new(ids::WATER));
    assert!(is_face_visible(&chunk, &Isolated, &table, 4, 4, 4, BlockSide::RIGHT));
    assert!(is_face_visible(&chunk, &Isolated, &table, 5, 4, 4, BlockSide::LEFT));
}

#[test]
fn test_opaque_face_behind_translucent_block_is_drawn() {
    let table = BlockTypeTable::default();
    let mut chunk = Chunk::new(Point3::new(0, 0, 0));
    chunk.set_block(4, 4, 4, Block::new(ids::STONE));
    chunk.set_block(5, 4, 4, Block::new(ids::GLASS));

    assert!(is_face_visible(&chunk, &Isolated, &table, 4, 4, 4, BlockSide::RIGHT));
    assert!(!is_face_visible(&chunk, &Isolated, &table, 5, 4, 4, BlockSide::LEFT));
}

#[test]
fn test_generated_terrain_meshes_stay_in_bounds() {
    let table = BlockTypeTable::default();
    let terrain = PerlinTerrain::new(42);

    for world_position in [Point3::new(0, 0, 0), Point3::new(3, 1, -2), Point3::new(-5, 2, 7)] {
        let chunk = generated_chunk(&terrain, world_position);
        let meshes = mesh(&chunk, &Isolated, &table);
        assert_meshes_in_bounds(&meshes);
    }
}

#[test]
fn test_vertices_are_in_world_space() {
    let table = BlockTypeTable::default();
    let chunk = generated_chunk(&FlatTerrain::default(), Point3::new(2, 0, -1));
    let meshes = mesh(&chunk, &Isolated, &table);

    for side in &meshes.opaque.sides {
        for vertex in &side.vertices {
            let [x, y, z] = vertex.position;
            assert!((32.0..=48.0).contains(&x));
            assert!((0.0..=5.0).contains(&y));
            assert!((-16.0..=0.0).contains(&z));
        }
    }
}
