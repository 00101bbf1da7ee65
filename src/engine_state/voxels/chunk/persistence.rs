//! Chunk file serialization and disk I/O
//!
//! A chunk file is a fixed-size blob: the 4096 blocks in `[x][y][z]` order,
//! two bytes each (`id`, `light_level`), followed by the three world-chunk
//! coordinates as native-endian `i32`. A file of any other size is rejected.

use std::path::{Path, PathBuf};

use cgmath::Point3;

use super::{Chunk, CHUNK_SIZE};
use crate::core::{EngineError, Result};
use crate::engine_state::voxels::block::Block;

/// Exact size in bytes of a chunk file.
pub const CHUNK_FILE_SIZE: usize =
    CHUNK_SIZE * std::mem::size_of::<Block>() + 3 * std::mem::size_of::<i32>();

/// Block data and coordinates read back from a chunk file.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFileData {
    pub blocks: Box<[Block]>,
    pub world_position: Point3<i32>,
}

/// Get the file path for a chunk
pub fn chunk_path(base_dir: &Path, world_position: Point3<i32>) -> PathBuf {
    base_dir.join(format!(
        "chunk_{}_{}_{}.bin",
        world_position.x, world_position.y, world_position.z
    ))
}

/// Encodes block data and coordinates in the chunk file format.
pub fn encode_chunk(blocks: &[Block], world_position: Point3<i32>) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(CHUNK_FILE_SIZE);
    bytes.extend_from_slice(bytemuck::cast_slice(blocks));
    for coordinate in [world_position.x, world_position.y, world_position.z] {
        bytes.extend_from_slice(&coordinate.to_ne_bytes());
    }
    bytes
}

/// Decodes a chunk file image. `path` is only used for the error message.
pub fn decode_chunk(bytes: &[u8], path: &Path) -> Result<ChunkFileData> {
    if bytes.len() != CHUNK_FILE_SIZE {
        return Err(EngineError::ChunkFileSize {
            path: path.to_path_buf(),
            expected: CHUNK_FILE_SIZE,
            actual: bytes.len(),
        });
    }

    let block_bytes = CHUNK_SIZE * std::mem::size_of::<Block>();
    // Block is two u8 fields, so any byte slice is correctly aligned for it.
    let blocks: Box<[Block]> = bytemuck::cast_slice::<u8, Block>(&bytes[..block_bytes]).into();

    let mut coordinates = [0i32; 3];
    for (index, raw) in bytes[block_bytes..].chunks_exact(4).enumerate() {
        coordinates[index] = i32::from_ne_bytes([raw[0], raw[1], raw[2], raw[3]]);
    }

    Ok(ChunkFileData {
        blocks,
        world_position: Point3::new(coordinates[0], coordinates[1], coordinates[2]),
    })
}

/// Writes a chunk's blocks and world coordinates to `path`.
pub fn save_chunk_to_file(chunk: &Chunk, path: &Path) -> Result<()> {
    save_blocks_to_file(chunk.blocks(), chunk.world_position, path)
}

/// Writes raw block data to `path`, creating the parent directory if needed.
pub fn save_blocks_to_file(blocks: &[Block], world_position: Point3<i32>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, encode_chunk(blocks, world_position))?;
    Ok(())
}

/// Reads a chunk file. Fails if the file is missing or has the wrong size.
pub fn load_chunk_from_file(path: &Path) -> Result<ChunkFileData> {
    let bytes = std::fs::read(path)?;
    decode_chunk(&bytes, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::ids;

    fn patterned_chunk() -> Chunk {
        let mut chunk = Chunk::new(Point3::new(0, 0, 0));
        let blocks: Vec<Block> = (0..CHUNK_SIZE)
            .map(|i| Block::with_light((i % 13) as u8, (i % 16) as u8))
            .collect();
        chunk.load(Point3::new(-7, 3, 12), &blocks);
        chunk
    }

    #[test]
    fn test_file_size_constant() {
        assert_eq!(CHUNK_FILE_SIZE, 4096 * 2 + 12);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let chunk = patterned_chunk();
        let path = chunk_path(dir.path(), chunk.world_position);

        save_chunk_to_file(&chunk, &path).expect("save failed");
        let loaded = load_chunk_from_file(&path).expect("load failed");

        assert_eq!(&*loaded.blocks, chunk.blocks());
        assert_eq!(loaded.world_position, Point3::new(-7, 3, 12));
    }

    #[test]
    fn test_wrong_size_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("truncated.bin");
        let mut bytes = encode_chunk(&vec![Block::new(ids::DIRT); CHUNK_SIZE], Point3::new(0, 0, 0));
        bytes.pop();
        std::fs::write(&path, &bytes).expect("write");

        match load_chunk_from_file(&path) {
            Err(EngineError::ChunkFileSize { expected, actual, .. }) => {
                assert_eq!(expected, CHUNK_FILE_SIZE);
                assert_eq!(actual, CHUNK_FILE_SIZE - 1);
            }
            other => panic!("expected size error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_chunk_from_file(&dir.path().join("nope.bin"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }

    #[test]
    fn test_chunk_path() {
        let path = chunk_path(Path::new("/tmp/world"), Point3::new(5, 0, -3));
        assert_eq!(path, PathBuf::from("/tmp/world/chunk_5_0_-3.bin"));
    }
}
