//! Terrain generators that fill freshly claimed chunks.
//!
//! A generator is a pure function of the world-chunk coordinate: the same
//! coordinate always yields the same blocks, so a chunk that was evicted
//! without edits can be regenerated instead of stored.

use cgmath::Point3;
use noise::{NoiseFn, Perlin};

use super::{
    block::{block_type::ids, Block, BlockTypeSize, MAX_LIGHT_LEVEL},
    chunk::{Chunk, CHUNK_DIMENSION, CHUNK_DIMENSION_I32, CHUNK_SIZE},
};

/// Fills chunk block data from world-chunk coordinates.
pub trait TerrainGenerator: Send + Sync {
    /// Writes all [`CHUNK_SIZE`] blocks of the chunk at `world_position`.
    fn fill_blocks(&self, world_position: Point3<i32>, blocks: &mut [Block]);

    /// Fills an existing chunk in place. May leave it entirely air.
    fn generate(&self, chunk: &mut Chunk, cx: i32, cy: i32, cz: i32) {
        self.fill_blocks(Point3::new(cx, cy, cz), chunk.blocks_mut());
    }

    /// Generates into a new buffer.
    fn generate_blocks(&self, world_position: Point3<i32>) -> Vec<Block> {
        let mut blocks = vec![Block::AIR; CHUNK_SIZE];
        self.fill_blocks(world_position, &mut blocks);
        blocks
    }
}

const SKY: Block = Block::with_light(ids::AIR, MAX_LIGHT_LEVEL);

/// World block height of the ocean surface.
pub const SEA_LEVEL: i32 = 20;
/// Average terrain height in world blocks.
pub const BASE_HEIGHT: i32 = 24;
/// Largest deviation of the terrain from [`BASE_HEIGHT`].
pub const HEIGHT_AMPLITUDE: f64 = 16.0;
/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Surfaces above this height are covered in snow.
pub const SNOW_LINE: i32 = 36;
/// Depth of the dirt layer below the surface block.
const DIRT_DEPTH: i32 = 3;
/// Out of 100 grass columns, how many carry tall grass (and one more a flower).
const TALL_GRASS_CHANCE: u8 = 6;

/// Rolling hills from a 2D Perlin heightmap.
///
/// Columns are bedrock at world y 0, then stone, a few blocks of dirt and a
/// surface block. Low columns become beaches and the space up to
/// [`SEA_LEVEL`] is flooded. Grass may carry a flower or tall grass, chosen
/// from a random generator seeded with the column coordinate.
pub struct PerlinTerrain {
    perlin: Perlin,
    seed: u32,
}

impl PerlinTerrain {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// Surface height of the column at world block `(x, z)`.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let sample = self
            .perlin
            .get([x as f64 * PERLIN_SCALE_FACTOR, z as f64 * PERLIN_SCALE_FACTOR])
            .clamp(-1.0, 1.0);
        (BASE_HEIGHT + (sample * HEIGHT_AMPLITUDE).round() as i32).max(1)
    }

    fn decoration(&self, x: i32, z: i32) -> Option<BlockTypeSize> {
        let column_seed = (x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (z as i64 as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
            ^ u64::from(self.seed);
        let mut rng = fastrand::Rng::with_seed(column_seed);
        match rng.u8(..100) {
            roll if roll < TALL_GRASS_CHANCE => Some(ids::TALL_GRASS),
            roll if roll == TALL_GRASS_CHANCE => Some(ids::FLOWER),
            _ => None,
        }
    }

    fn column_block(&self, y: i32, height: i32, decoration: Option<BlockTypeSize>) -> Block {
        let beach = height <= SEA_LEVEL + 1;
        match y {
            0 => Block::new(ids::BEDROCK),
            y if y < height - DIRT_DEPTH => Block::new(ids::STONE),
            y if y < height => Block::new(if beach { ids::SAND } else { ids::DIRT }),
            y if y == height => Block::new(if beach {
                ids::SAND
            } else if height > SNOW_LINE {
                ids::SNOW
            } else {
                ids::GRASS
            }),
            y if y <= SEA_LEVEL => Block::with_light(ids::WATER, MAX_LIGHT_LEVEL),
            y if y == height + 1 => decoration
                .map(|id| Block::with_light(id, MAX_LIGHT_LEVEL))
                .unwrap_or(SKY),
            _ => SKY,
        }
    }
}

impl TerrainGenerator for PerlinTerrain {
    fn fill_blocks(&self, world_position: Point3<i32>, blocks: &mut [Block]) {
        let origin = Point3::new(
            world_position.x * CHUNK_DIMENSION_I32,
            world_position.y * CHUNK_DIMENSION_I32,
            world_position.z * CHUNK_DIMENSION_I32,
        );

        for x in 0..CHUNK_DIMENSION {
            for z in 0..CHUNK_DIMENSION {
                let world_x = origin.x + x as i32;
                let world_z = origin.z + z as i32;
                let height = self.surface_height(world_x, world_z);
                let decoration = if height > SEA_LEVEL + 1 && height <= SNOW_LINE {
                    self.decoration(world_x, world_z)
                } else {
                    None
                };

                for y in 0..CHUNK_DIMENSION {
                    blocks[Chunk::block_index(x, y, z)] =
                        self.column_block(origin.y + y as i32, height, decoration);
                }
            }
        }
    }
}

/// Horizontal layers of fixed blocks, bottom up, in the chunks at world y 0.
/// Everything else is air.
pub struct FlatTerrain {
    layers: Vec<BlockTypeSize>,
}

impl FlatTerrain {
    /// Uses at most [`CHUNK_DIMENSION`] layers.
    pub fn new(mut layers: Vec<BlockTypeSize>) -> Self {
        layers.truncate(CHUNK_DIMENSION);
        Self { layers }
    }

    pub fn layers(&self) -> &[BlockTypeSize] {
        &self.layers
    }
}

impl Default for FlatTerrain {
    /// Bedrock, three layers of dirt and grass on top.
    fn default() -> Self {
        Self::new(vec![ids::BEDROCK, ids::DIRT, ids::DIRT, ids::DIRT, ids::GRASS])
    }
}

impl TerrainGenerator for FlatTerrain {
    fn fill_blocks(&self, world_position: Point3<i32>, blocks: &mut [Block]) {
        blocks.fill(SKY);
        if world_position.y != 0 {
            return;
        }

        for x in 0..CHUNK_DIMENSION {
            for (y, &id) in self.layers.iter().enumerate() {
                for z in 0..CHUNK_DIMENSION {
                    blocks[Chunk::block_index(x, y, z)] = Block::new(id);
                }
            }
        }
    }
}
