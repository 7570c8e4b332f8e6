//! SparseGrid - two-level sparse voxel grid.
//!
//! This is the primary container for level set data, implementing the
//! `ScalarField` trait from isovox_core so it can be meshed directly.

use isovox_core::{Coord, Point3, ScalarField};

use super::leaf_map::LeafMap;
use super::storage::LeafStorage;
use crate::config::GridConfig;
use crate::error::Result;

/// Sparse voxel grid of `f32` values with a per-voxel active mask.
///
/// # Architecture
///
/// The grid uses a two-level hierarchy:
/// 1. **Sparse level**: Hash map from leaf origins to leaf indices
/// 2. **Dense level**: `leaf_dim³` values and active flags per leaf
///
/// Voxels inside an allocated leaf always hold a value, active or not. Voxels
/// outside every leaf read as the background.
#[derive(Debug, Clone)]
pub struct SparseGrid {
    /// Leaf origin → index lookup.
    pub(crate) leaf_map: LeafMap,

    /// Dense storage for all leaf data.
    pub(crate) storage: LeafStorage,

    /// Grid configuration.
    pub(crate) config: GridConfig,
}

/// Borrowed view of one dense leaf.
#[derive(Debug, Clone, Copy)]
pub struct LeafView<'a> {
    /// Minimum voxel coordinate of the leaf.
    pub origin: Coord,
    /// Values in `x * D² + y * D + z` order.
    pub values: &'a [f32],
    /// Active flags, parallel to `values`.
    pub active: &'a [bool],
    /// Voxels per axis.
    pub leaf_dim: u32,
}

impl<'a> LeafView<'a> {
    /// Voxel coordinate of a flat index inside the leaf.
    #[inline]
    pub fn coord_of(&self, local_idx: usize) -> Coord {
        let d = self.leaf_dim as usize;
        let lx = local_idx / (d * d);
        let ly = (local_idx / d) % d;
        let lz = local_idx % d;
        self.origin.offset(lx as i32, ly as i32, lz as i32)
    }

    /// Number of active voxels in the leaf.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Active voxels of the leaf with their values, in flat order.
    pub fn iter_active(&self) -> impl Iterator<Item = (Coord, f32)> + 'a {
        let view = *self;
        view.active
            .iter()
            .enumerate()
            .filter(|&(_, &a)| a)
            .map(move |(i, _)| (view.coord_of(i), view.values[i]))
    }
}

impl SparseGrid {
    /// Create an empty grid.
    ///
    /// # Errors
    /// Any error from [`GridConfig::validate`].
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            leaf_map: LeafMap::new(),
            storage: LeafStorage::new(config.voxels_per_leaf()),
            config,
        })
    }

    /// Get the grid configuration.
    #[inline]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// World units per voxel.
    #[inline]
    pub fn voxel_size(&self) -> f64 {
        self.config.voxel_size
    }

    /// Value of voxels outside every leaf.
    #[inline]
    pub fn background(&self) -> f32 {
        self.config.background
    }

    /// Voxels per axis per leaf.
    #[inline]
    pub fn leaf_dim(&self) -> u32 {
        self.config.leaf_dim
    }

    /// Number of allocated leaves.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.storage.leaf_count()
    }

    /// Number of active voxels.
    pub fn active_voxel_count(&self) -> usize {
        self.storage.active_count()
    }

    /// True when no voxel is active.
    pub fn is_empty(&self) -> bool {
        self.active_voxel_count() == 0
    }

    /// Origin of the leaf containing `coord`.
    #[inline]
    pub fn leaf_origin_of(&self, coord: Coord) -> Coord {
        let d = self.config.leaf_dim as i32;
        Coord::new(
            coord.x.div_euclid(d) * d,
            coord.y.div_euclid(d) * d,
            coord.z.div_euclid(d) * d,
        )
    }

    /// Flat index of `coord` inside the leaf at `origin`.
    #[inline]
    fn local_index(&self, coord: Coord, origin: Coord) -> usize {
        let d = self.config.leaf_dim as usize;
        let lx = (coord.x - origin.x) as usize;
        let ly = (coord.y - origin.y) as usize;
        let lz = (coord.z - origin.z) as usize;
        lx * d * d + ly * d + lz
    }

    /// Leaf index and flat index of `coord`, if its leaf exists.
    #[inline]
    fn locate(&self, coord: Coord) -> Option<(usize, usize)> {
        let origin = self.leaf_origin_of(coord);
        let leaf = self.leaf_map.get(origin)?;
        Some((leaf, self.local_index(coord, origin)))
    }

    /// Leaf index and flat index of `coord`, allocating a background leaf when missing.
    fn locate_or_allocate(&mut self, coord: Coord) -> (usize, usize) {
        let origin = self.leaf_origin_of(coord);
        let storage = &mut self.storage;
        let background = self.config.background;
        let leaf = self
            .leaf_map
            .get_or_insert_with(origin, || storage.allocate_leaf(origin, background));
        (leaf, self.local_index(coord, origin))
    }

    /// Allocate an empty leaf at an aligned origin, returning its index.
    pub(crate) fn ensure_leaf(&mut self, origin: Coord) -> usize {
        self.locate_or_allocate(origin).0
    }

    /// Value stored at `coord`, or the background when no leaf holds it.
    #[inline]
    pub fn value_at(&self, coord: Coord) -> f32 {
        match self.locate(coord) {
            Some((leaf, local)) => self.storage.value(leaf, local),
            None => self.config.background,
        }
    }

    /// Whether `coord` is an active voxel.
    #[inline]
    pub fn is_active(&self, coord: Coord) -> bool {
        self.locate(coord)
            .map(|(leaf, local)| self.storage.is_active(leaf, local))
            .unwrap_or(false)
    }

    /// Store `value` at `coord` and mark the voxel active.
    pub fn set_value(&mut self, coord: Coord, value: f32) {
        let (leaf, local) = self.locate_or_allocate(coord);
        self.storage.set(leaf, local, value, true);
    }

    /// Store `value` at `coord` and mark the voxel inactive.
    pub fn set_value_inactive(&mut self, coord: Coord, value: f32) {
        let (leaf, local) = self.locate_or_allocate(coord);
        self.storage.set(leaf, local, value, false);
    }

    /// Change the active state of `coord`, keeping its value.
    ///
    /// Activating a voxel outside every leaf allocates its leaf, so the voxel
    /// becomes active with the background value.
    pub fn set_active(&mut self, coord: Coord, active: bool) {
        if active {
            let (leaf, local) = self.locate_or_allocate(coord);
            self.storage.set_active(leaf, local, true);
        } else if let Some((leaf, local)) = self.locate(coord) {
            self.storage.set_active(leaf, local, false);
        }
    }

    /// View of the leaf at `origin`.
    pub fn leaf(&self, origin: Coord) -> Option<LeafView<'_>> {
        self.leaf_map.get(origin).map(|idx| self.leaf_view(idx))
    }

    fn leaf_view(&self, idx: usize) -> LeafView<'_> {
        LeafView {
            origin: self.storage.origin(idx),
            values: self.storage.leaf_values(idx),
            active: self.storage.leaf_active(idx),
            leaf_dim: self.config.leaf_dim,
        }
    }

    /// All leaves in allocation order.
    pub fn iter_leaves(&self) -> impl Iterator<Item = LeafView<'_>> + '_ {
        (0..self.storage.leaf_count()).map(move |idx| self.leaf_view(idx))
    }

    /// All leaves as a parallel iterator.
    #[cfg(feature = "rayon")]
    pub fn par_iter_leaves(&self) -> impl rayon::prelude::ParallelIterator<Item = LeafView<'_>> + '_ {
        use rayon::prelude::*;
        (0..self.storage.leaf_count())
            .into_par_iter()
            .map(move |idx| self.leaf_view(idx))
    }

    /// Active voxels with their values.
    ///
    /// Leaves are visited in allocation order and voxels in flat order inside
    /// each leaf, so the sequence is deterministic for a given build history.
    pub fn iter_active(&self) -> impl Iterator<Item = (Coord, f32)> + '_ {
        self.iter_leaves().flat_map(|leaf| leaf.iter_active())
    }

    /// Inclusive voxel bounds of the active voxels.
    pub fn active_bounding_box(&self) -> Option<(Coord, Coord)> {
        self.iter_active().fold(None, |bbox, (c, _)| match bbox {
            None => Some((c, c)),
            Some((lo, hi)) => Some((
                Coord::new(lo.x.min(c.x), lo.y.min(c.y), lo.z.min(c.z)),
                Coord::new(hi.x.max(c.x), hi.y.max(c.y), hi.z.max(c.z)),
            )),
        })
    }

    /// World position of a voxel centre.
    #[inline]
    pub fn voxel_center(&self, coord: Coord) -> Point3 {
        let vs = self.config.voxel_size;
        Point3::new(
            (coord.x as f64 + 0.5) * vs,
            (coord.y as f64 + 0.5) * vs,
            (coord.z as f64 + 0.5) * vs,
        )
    }
}

impl ScalarField for SparseGrid {
    #[inline]
    fn value_at(&self, coord: Coord) -> f32 {
        SparseGrid::value_at(self, coord)
    }

    #[inline]
    fn background(&self) -> f32 {
        self.config.background
    }

    fn active_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.iter_active().map(|(coord, _)| coord)
    }

    fn active_voxel_count(&self) -> usize {
        self.storage.active_count()
    }
}
