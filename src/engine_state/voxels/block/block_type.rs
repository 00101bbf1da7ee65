//! # Block Type Module
//!
//! This module defines the static block type table: per block id, the shape
//! category, translucency and six face texture indices.
//!
//! The table is configuration. It is built once (built-in defaults, the packed
//! 8-byte record format or JSON) and is immutable afterwards, so it is shared
//! between threads behind an `Arc` without locking.
//!
//! Malformed entries never fail the load. They are replaced by the null entry,
//! an opaque regular block drawn with texture 0, which shows up on screen as a
//! visibly wrong texture.

use log::warn;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::Deserialize;

use super::BlockTypeSize;
use crate::core::Result;

/// Number of entries in a block type table.
pub const BLOCK_TYPE_COUNT: usize = 256;

/// Size in bytes of one packed table record:
/// `[shape, translucent, tex_front, tex_left, tex_back, tex_right, tex_bottom, tex_top]`.
pub const BLOCK_TYPE_RECORD_SIZE: usize = 8;

/// Well-known block ids of the built-in table.
pub mod ids {
    use super::BlockTypeSize;

    pub const AIR: BlockTypeSize = 0;
    pub const BEDROCK: BlockTypeSize = 1;
    pub const STONE: BlockTypeSize = 2;
    pub const DIRT: BlockTypeSize = 3;
    pub const GRASS: BlockTypeSize = 4;
    pub const SAND: BlockTypeSize = 5;
    pub const WOOD: BlockTypeSize = 6;
    pub const LEAVES: BlockTypeSize = 7;
    pub const GLASS: BlockTypeSize = 8;
    pub const WATER: BlockTypeSize = 9;
    pub const LAVA: BlockTypeSize = 10;
    pub const TALL_GRASS: BlockTypeSize = 11;
    pub const FLOWER: BlockTypeSize = 12;
    pub const STONE_SLAB: BlockTypeSize = 13;
    pub const SNOW: BlockTypeSize = 14;
}

/// Block names accepted in JSON block tables, resolved at compile time.
pub static BLOCK_NAMES: phf::Map<&'static str, BlockTypeSize> = phf::phf_map! {
    "air" => ids::AIR,
    "bedrock" => ids::BEDROCK,
    "stone" => ids::STONE,
    "dirt" => ids::DIRT,
    "grass" => ids::GRASS,
    "sand" => ids::SAND,
    "wood" => ids::WOOD,
    "leaves" => ids::LEAVES,
    "glass" => ids::GLASS,
    "water" => ids::WATER,
    "lava" => ids::LAVA,
    "tall_grass" => ids::TALL_GRASS,
    "flower" => ids::FLOWER,
    "stone_slab" => ids::STONE_SLAB,
    "snow" => ids::SNOW,
};

/// Geometry category of a block.
///
/// `Regular`, `Liquid` and `Leaf` blocks are greedy meshed as unit cubes.
/// `Cross` and `Slab` blocks bypass merging and emit fixed geometry per cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Deserialize)]
pub enum BlockShape {
    Regular = 0,
    Cross = 1,
    Slab = 2,
    Liquid = 3,
    Leaf = 4,
}

impl BlockShape {
    /// Whether faces of this shape take part in greedy merging.
    pub fn is_greedy(self) -> bool {
        matches!(self, BlockShape::Regular | BlockShape::Liquid | BlockShape::Leaf)
    }
}

/// One row of the block type table.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockTypeEntry {
    pub shape: BlockShape,
    pub translucent: bool,
    /// Texture per face, indexed by `BlockSide as usize`.
    pub face_texture: [u8; 6],
}

impl BlockTypeEntry {
    /// Entry used for undefined or malformed ids.
    pub const NULL: BlockTypeEntry = BlockTypeEntry {
        shape: BlockShape::Regular,
        translucent: false,
        face_texture: [0; 6],
    };

    /// Entry of id 0: nothing is drawn and nothing is occluded.
    pub const AIR: BlockTypeEntry = BlockTypeEntry {
        shape: BlockShape::Regular,
        translucent: true,
        face_texture: [0; 6],
    };

    pub const fn new(shape: BlockShape, translucent: bool, face_texture: [u8; 6]) -> Self {
        Self {
            shape,
            translucent,
            face_texture,
        }
    }

    /// Same texture on every face.
    pub const fn uniform(shape: BlockShape, translucent: bool, texture: u8) -> Self {
        Self::new(shape, translucent, [texture; 6])
    }

    /// Decodes one packed record. Returns `None` if the shape or translucency
    /// byte is out of range.
    pub fn from_record(record: &[u8; BLOCK_TYPE_RECORD_SIZE]) -> Option<Self> {
        let shape = BlockShape::from_u8(record[0])?;
        let translucent = match record[1] {
            0 => false,
            1 => true,
            _ => return None,
        };
        let mut face_texture = [0u8; 6];
        face_texture.copy_from_slice(&record[2..8]);
        Some(Self {
            shape,
            translucent,
            face_texture,
        })
    }

    /// Encodes this entry as a packed record.
    pub fn to_record(&self) -> [u8; BLOCK_TYPE_RECORD_SIZE] {
        let mut record = [0u8; BLOCK_TYPE_RECORD_SIZE];
        record[0] = self.shape as u8;
        record[1] = self.translucent as u8;
        record[2..8].copy_from_slice(&self.face_texture);
        record
    }
}

/// JSON form of a table entry. Either `id` or `name` selects the row.
#[derive(Debug, Deserialize)]
struct BlockTypeRecordJson {
    id: Option<u16>,
    name: Option<String>,
    shape: BlockShape,
    #[serde(default)]
    translucent: bool,
    textures: Vec<u8>,
}

/// The static block type lookup, one entry per possible block id.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockTypeTable {
    entries: Box<[BlockTypeEntry; BLOCK_TYPE_COUNT]>,
}

impl BlockTypeTable {
    /// A table where id 0 is air and every other id is the null entry.
    pub fn empty() -> Self {
        let mut entries = Box::new([BlockTypeEntry::NULL; BLOCK_TYPE_COUNT]);
        entries[ids::AIR as usize] = BlockTypeEntry::AIR;
        Self { entries }
    }

    /// Looks up the entry for a block id.
    #[inline]
    pub fn entry(&self, id: BlockTypeSize) -> &BlockTypeEntry {
        &self.entries[id as usize]
    }

    #[inline]
    pub fn is_translucent(&self, id: BlockTypeSize) -> bool {
        self.entries[id as usize].translucent
    }

    #[inline]
    pub fn shape(&self, id: BlockTypeSize) -> BlockShape {
        self.entries[id as usize].shape
    }

    /// Replaces one entry. Id 0 always stays air.
    pub fn set(&mut self, id: BlockTypeSize, entry: BlockTypeEntry) {
        if id == ids::AIR {
            warn!("Ignoring block table entry for id 0, which is reserved for air");
            return;
        }
        self.entries[id as usize] = entry;
    }

    /// Builds a table from packed 8-byte records, record `i` describing id `i`.
    ///
    /// Missing trailing records keep the null entry and extra bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::empty();
        let expected = BLOCK_TYPE_COUNT * BLOCK_TYPE_RECORD_SIZE;
        if bytes.len() != expected {
            warn!(
                "Block table has {} bytes, expected {}; missing entries use the null entry",
                bytes.len(),
                expected
            );
        }

        for (id, chunk) in bytes
            .chunks_exact(BLOCK_TYPE_RECORD_SIZE)
            .take(BLOCK_TYPE_COUNT)
            .enumerate()
            .skip(1)
        {
            let mut record = [0u8; BLOCK_TYPE_RECORD_SIZE];
            record.copy_from_slice(chunk);
            match BlockTypeEntry::from_record(&record) {
                Some(entry) => table.entries[id] = entry,
                None => warn!("Malformed block table record for id {}: {:?}", id, record),
            }
        }

        table
    }

    /// Encodes the whole table in the packed record format.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.entries.iter().flat_map(|entry| entry.to_record()).collect()
    }

    /// Builds a table from a JSON list of entries, starting from an empty table.
    ///
    /// ```json
    /// [ { "name": "stone", "shape": "Regular", "textures": [2, 2, 2, 2, 2, 2] },
    ///   { "id": 40, "shape": "Cross", "translucent": true, "textures": [9] } ]
    /// ```
    ///
    /// A single texture applies to all faces. Entries that do not parse (an
    /// unknown shape, a missing field), carry an unknown name, an id above 255
    /// or a texture list that is neither 1 nor 6 long are skipped with a
    /// warning and their id keeps the null entry. Only text that is not a JSON
    /// array is an error.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(text)?;
        let mut table = Self::empty();

        for (position, value) in values.into_iter().enumerate() {
            let record = match serde_json::from_value::<BlockTypeRecordJson>(value) {
                Ok(record) => record,
                Err(err) => {
                    warn!("Skipping malformed block table entry {}: {}", position, err);
                    continue;
                }
            };

            let id = match (record.id, record.name.as_deref()) {
                (Some(id), _) if id < BLOCK_TYPE_COUNT as u16 => id as BlockTypeSize,
                (Some(id), _) => {
                    warn!("Block table entry id {} is out of range", id);
                    continue;
                }
                (None, Some(name)) => match BLOCK_NAMES.get(name) {
                    Some(id) => *id,
                    None => {
                        warn!("Unknown block name {:?} in block table", name);
                        continue;
                    }
                },
                (None, None) => {
                    warn!("Block table entry has neither id nor name");
                    continue;
                }
            };

            let face_texture = match record.textures.as_slice() {
                [texture] => [*texture; 6],
                [a, b, c, d, e, f] => [*a, *b, *c, *d, *e, *f],
                other => {
                    warn!(
                        "Block table entry {} has {} textures, expected 1 or 6",
                        id,
                        other.len()
                    );
                    continue;
                }
            };

            table.set(id, BlockTypeEntry::new(record.shape, record.translucent, face_texture));
        }

        Ok(table)
    }
}

impl Default for BlockTypeTable {
    /// The built-in table for the ids in [`ids`].
    fn default() -> Self {
        use BlockShape::*;

        let mut table = Self::empty();
        table.set(ids::BEDROCK, BlockTypeEntry::uniform(Regular, false, 1));
        table.set(ids::STONE, BlockTypeEntry::uniform(Regular, false, 2));
        table.set(ids::DIRT, BlockTypeEntry::uniform(Regular, false, 3));
        // Sides: grass on dirt, bottom: dirt, top: grass.
        table.set(ids::GRASS, BlockTypeEntry::new(Regular, false, [4, 4, 4, 4, 3, 5]));
        table.set(ids::SAND, BlockTypeEntry::uniform(Regular, false, 6));
        table.set(ids::WOOD, BlockTypeEntry::new(Regular, false, [7, 7, 7, 7, 8, 8]));
        table.set(ids::LEAVES, BlockTypeEntry::uniform(Leaf, true, 9));
        table.set(ids::GLASS, BlockTypeEntry::uniform(Regular, true, 10));
        table.set(ids::WATER, BlockTypeEntry::uniform(Liquid, true, 11));
        table.set(ids::LAVA, BlockTypeEntry::uniform(Liquid, true, 12));
        table.set(ids::TALL_GRASS, BlockTypeEntry::uniform(Cross, true, 13));
        table.set(ids::FLOWER, BlockTypeEntry::uniform(Cross, true, 14));
        table.set(ids::STONE_SLAB, BlockTypeEntry::new(Slab, true, [15, 15, 15, 15, 2, 2]));
        table.set(ids::SNOW, BlockTypeEntry::uniform(Regular, false, 16));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_entry_is_translucent() {
        let table = BlockTypeTable::default();
        assert!(table.is_translucent(ids::AIR));
        assert!(!table.is_translucent(ids::STONE));
        assert_eq!(table.entry(200), &BlockTypeEntry::NULL);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let table = BlockTypeTable::default();
        let bytes = table.to_bytes();
        assert_eq!(bytes.len(), BLOCK_TYPE_COUNT * BLOCK_TYPE_RECORD_SIZE);
        assert_eq!(BlockTypeTable::from_bytes(&bytes), table);
    }

    #[test]
    fn test_malformed_record_falls_back_to_null() {
        let mut bytes = BlockTypeTable::default().to_bytes();
        let stone = ids::STONE as usize * BLOCK_TYPE_RECORD_SIZE;
        bytes[stone] = 42; // no such shape
        let grass = ids::GRASS as usize * BLOCK_TYPE_RECORD_SIZE;
        bytes[grass + 1] = 7; // translucency must be 0 or 1

        let table = BlockTypeTable::from_bytes(&bytes);
        assert_eq!(table.entry(ids::STONE), &BlockTypeEntry::NULL);
        assert_eq!(table.entry(ids::GRASS), &BlockTypeEntry::NULL);
        assert_eq!(table.shape(ids::WATER), BlockShape::Liquid);
    }

    #[test]
    fn test_short_table_keeps_null_entries() {
        let bytes = BlockTypeTable::default().to_bytes();
        let table = BlockTypeTable::from_bytes(&bytes[..4 * BLOCK_TYPE_RECORD_SIZE]);
        assert_eq!(table.entry(ids::DIRT).face_texture, [3; 6]);
        assert_eq!(table.entry(ids::GRASS), &BlockTypeEntry::NULL);
    }

    #[test]
    fn test_json_table() {
        let table = BlockTypeTable::from_json_str(
            r#"[
                { "name": "stone", "shape": "Regular", "textures": [2] },
                { "id": 40, "shape": "Cross", "translucent": true, "textures": [1, 2, 3, 4, 5, 6] },
                { "name": "unobtainium", "shape": "Regular", "textures": [1] },
                { "id": 41, "shape": "Slab", "textures": [1, 2] }
            ]"#,
        )
        .expect("valid json");

        assert_eq!(table.entry(ids::STONE).face_texture, [2; 6]);
        assert_eq!(table.shape(40), BlockShape::Cross);
        assert!(table.is_translucent(40));
        assert_eq!(table.entry(40).face_texture, [1, 2, 3, 4, 5, 6]);
        assert_eq!(table.entry(41), &BlockTypeEntry::NULL);
    }

    #[test]
    fn test_json_table_skips_unparsable_entries() {
        let table = BlockTypeTable::from_json_str(
            r#"[
                { "name": "stone", "shape": "Regular", "textures": [2] },
                { "id": 40, "shape": "Stairs", "textures": [1] },
                { "name": "dirt", "shape": "Regular" },
                { "id": 42, "shape": "Leaf", "translucent": true, "textures": [9] }
            ]"#,
        )
        .expect("entry errors are not fatal");

        assert_eq!(table.entry(ids::STONE).face_texture, [2; 6]);
        assert_eq!(table.entry(40), &BlockTypeEntry::NULL);
        assert_eq!(table.entry(ids::DIRT), &BlockTypeEntry::NULL);
        assert_eq!(table.shape(42), BlockShape::Leaf);

        assert!(BlockTypeTable::from_json_str(r#"{ "name": "stone" }"#).is_err());
    }

    #[test]
    fn test_air_cannot_be_overridden() {
        let mut table = BlockTypeTable::empty();
        table.set(ids::AIR, BlockTypeEntry::NULL);
        assert_eq!(table.entry(ids::AIR), &BlockTypeEntry::AIR);
    }
}
