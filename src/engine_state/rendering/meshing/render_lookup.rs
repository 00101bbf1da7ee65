//! Per-chunk index ranges within a combined mesh.
//!
//! The renderer issues one draw per combined mesh and uses this table to skip
//! chunks an external culling step marked invisible. Slots are addressed by their
//! grid arena index.

use std::ops::Range;

/// Where one chunk's indices sit inside a combined mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRenderSlice {
    pub start_index: u32,
    pub index_count: u32,
    pub visible: bool,
}

impl Default for ChunkRenderSlice {
    fn default() -> Self {
        Self {
            start_index: 0,
            index_count: 0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderLookupTable {
    slices: Vec<ChunkRenderSlice>,
}

impl RenderLookupTable {
    /// A table for `slot_count` slots, all empty and visible.
    pub fn new(slot_count: usize) -> Self {
        Self {
            slices: vec![ChunkRenderSlice::default(); slot_count],
        }
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&ChunkRenderSlice> {
        self.slices.get(slot)
    }

    pub fn slices(&self) -> &[ChunkRenderSlice] {
        &self.slices
    }

    /// Forgets all ranges. Visibility flags are kept.
    pub(crate) fn clear_ranges(&mut self) {
        for slice in self.slices.iter_mut() {
            slice.start_index = 0;
            slice.index_count = 0;
        }
    }

    pub(crate) fn set_range(&mut self, slot: usize, start_index: u32, index_count: u32) {
        if let Some(slice) = self.slices.get_mut(slot) {
            slice.start_index = start_index;
            slice.index_count = index_count;
        }
    }

    /// Sets the visibility of a slot. Returns `false` if the slot does not exist.
    pub fn set_visible(&mut self, slot: usize, visible: bool) -> bool {
        match self.slices.get_mut(slot) {
            Some(slice) => {
                slice.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Index ranges to draw, with adjacent visible chunks merged into one range.
    pub fn visible_ranges(&self) -> Vec<Range<u32>> {
        let mut visible: Vec<&ChunkRenderSlice> = self
            .slices
            .iter()
            .filter(|slice| slice.visible && slice.index_count > 0)
            .collect();
        visible.sort_by_key(|slice| slice.start_index);

        let mut ranges: Vec<Range<u32>> = Vec::new();
        for slice in visible {
            let end = slice.start_index + slice.index_count;
            match ranges.last_mut() {
                Some(last) if last.end == slice.start_index => last.end = end,
                _ => ranges.push(slice.start_index..end),
            }
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RenderLookupTable {
        let mut table = RenderLookupTable::new(4);
        table.set_range(0, 0, 6);
        table.set_range(1, 6, 12);
        table.set_range(2, 18, 0);
        table.set_range(3, 18, 6);
        table
    }

    #[test]
    fn test_all_visible_is_one_range() {
        assert_eq!(table().visible_ranges(), vec![0..24]);
    }

    #[test]
    fn test_hidden_chunk_splits_range() {
        let mut table = table();
        assert!(table.set_visible(1, false));
        assert_eq!(table.visible_ranges(), vec![0..6, 18..24]);
        assert!(!table.set_visible(9, false));
    }

    #[test]
    fn test_visibility_survives_clear() {
        let mut table = table();
        table.set_visible(3, false);
        table.clear_ranges();
        assert!(!table.get(3).unwrap().visible);
        assert_eq!(table.get(3).unwrap().index_count, 0);
    }
}
