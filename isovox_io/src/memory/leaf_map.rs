//! Hash map from leaf origin to leaf index.
//!
//! Provides O(1) average-case lookup of the dense leaf holding a voxel.

use std::collections::HashMap;

use isovox_core::Coord;

/// Leaf origin → storage index lookup.
///
/// Origins are the minimum voxel coordinate of each leaf and are always multiples
/// of the leaf dimension.
#[derive(Debug, Clone, Default)]
pub struct LeafMap {
    entries: HashMap<Coord, usize>,
}

impl LeafMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the storage index of the leaf at `origin`.
    #[inline]
    pub fn get(&self, origin: Coord) -> Option<usize> {
        self.entries.get(&origin).copied()
    }

    /// Look up the leaf at `origin`, registering the index returned by
    /// `allocate` when it is missing.
    pub fn get_or_insert_with<F>(&mut self, origin: Coord, allocate: F) -> usize
    where
        F: FnOnce() -> usize,
    {
        *self.entries.entry(origin).or_insert_with(allocate)
    }

    /// Check if the map contains a leaf origin.
    #[inline]
    pub fn contains(&self, origin: Coord) -> bool {
        self.entries.contains_key(&origin)
    }

    /// Number of leaves in the map.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
