//! Stacked leaf export.
//!
//! Flattens every leaf of a grid into three buffers that map directly onto
//! batched tensors: origins `(N, 3)`, values `(N, D, D, D)` and the active mask
//! `(N, D, D, D)`. The round trip through [`LeafArrays::to_grid`] is lossless.

use isovox_core::Coord;

use crate::config::GridConfig;
use crate::error::{IsovoxIoError, Result};
use crate::memory::{LeafView, SparseGrid};

/// All leaves of a grid as contiguous buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafArrays {
    /// Voxels per leaf side.
    pub leaf_dim: u32,
    /// World units per voxel.
    pub voxel_size: f64,
    /// Background of the exported grid, before any normalization.
    pub background: f32,
    /// Whether `values` were divided by `background`.
    pub normalized: bool,
    /// Leaf origins in voxel coordinates, `(N, 3)`.
    pub origins: Vec<[i32; 3]>,
    /// Leaf values in `x * D² + y * D + z` order, `(N, D, D, D)`.
    pub values: Vec<f32>,
    /// Active mask parallel to `values`.
    pub active: Vec<bool>,
}

/// Export every leaf of `grid` in allocation order.
///
/// With `normalize`, values are divided by the background so the band maps to
/// `[-1, 1]`.
///
/// # Errors
/// `InvalidBackground` when normalizing a grid whose background is not
/// positive and finite.
pub fn export_leaves(grid: &SparseGrid, normalize: bool) -> Result<LeafArrays> {
    let background = grid.background();
    if normalize && !(background.is_finite() && background > 0.0) {
        return Err(IsovoxIoError::InvalidBackground { background });
    }

    let leaf_count = grid.leaf_count();
    let voxels = grid.config().voxels_per_leaf();
    let mut arrays = LeafArrays {
        leaf_dim: grid.leaf_dim(),
        voxel_size: grid.voxel_size(),
        background,
        normalized: normalize,
        origins: Vec::with_capacity(leaf_count),
        values: Vec::with_capacity(leaf_count * voxels),
        active: Vec::with_capacity(leaf_count * voxels),
    };

    for leaf in grid.iter_leaves() {
        arrays.origins.push(leaf.origin.as_array());
        if normalize {
            arrays.values.extend(leaf.values.iter().map(|&v| v / background));
        } else {
            arrays.values.extend_from_slice(leaf.values);
        }
        arrays.active.extend_from_slice(leaf.active);
    }

    Ok(arrays)
}

impl LeafArrays {
    /// Number of voxels in one leaf.
    #[inline]
    pub fn voxels_per_leaf(&self) -> usize {
        (self.leaf_dim as usize).pow(3)
    }

    /// Number of leaves.
    #[inline]
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// True when there are no leaves.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Shape of the value buffer, `[N, D, D, D]`.
    pub fn leaf_shape(&self) -> [usize; 4] {
        let d = self.leaf_dim as usize;
        [self.len(), d, d, d]
    }

    /// Truncation distance the values were written with.
    ///
    /// This is the background of the exported grid; normalized values are in
    /// units of it.
    #[inline]
    pub fn sdf_trunc(&self) -> f32 {
        self.background
    }

    /// View of leaf `i`.
    pub fn get(&self, i: usize) -> Option<LeafView<'_>> {
        let origin = *self.origins.get(i)?;
        let vpl = self.voxels_per_leaf();
        let start = i * vpl;
        Some(LeafView {
            origin: Coord::from(origin),
            values: self.values.get(start..start + vpl)?,
            active: self.active.get(start..start + vpl)?,
            leaf_dim: self.leaf_dim,
        })
    }

    /// Iterate over all leaves.
    pub fn iter(&self) -> impl Iterator<Item = LeafView<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Rebuild a grid from the buffers.
    ///
    /// Normalized exports come back with a background of 1.
    ///
    /// # Errors
    /// - Any error from [`GridConfig::validate`]
    /// - `InvalidLeafSize` if the buffers do not hold `len() · leaf_dim³` entries
    /// - `MisalignedLeaf` or `DuplicateLeaf` for bad origins
    pub fn to_grid(&self) -> Result<SparseGrid> {
        let background = if self.normalized { 1.0 } else { self.background };
        let config = GridConfig::new(self.leaf_dim, self.voxel_size, background);
        let mut grid = SparseGrid::new(config)?;

        let expected = self.len() * self.voxels_per_leaf();
        for got in [self.values.len(), self.active.len()] {
            if got != expected {
                return Err(IsovoxIoError::InvalidLeafSize { expected, got });
            }
        }

        let dim = self.leaf_dim as i32;
        for leaf in self.iter() {
            let origin = leaf.origin;
            if origin.x.rem_euclid(dim) != 0
                || origin.y.rem_euclid(dim) != 0
                || origin.z.rem_euclid(dim) != 0
            {
                return Err(IsovoxIoError::MisalignedLeaf {
                    x: origin.x,
                    y: origin.y,
                    z: origin.z,
                    leaf_dim: self.leaf_dim,
                });
            }
            if grid.leaf_map.contains(origin) {
                return Err(IsovoxIoError::DuplicateLeaf {
                    x: origin.x,
                    y: origin.y,
                    z: origin.z,
                });
            }
            let idx = grid.ensure_leaf(origin);
            grid.storage.set_leaf(idx, leaf.values, leaf.active);
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::GridBuilder;

    fn make_grid() -> SparseGrid {
        GridBuilder::new(0.5)
            .with_leaf_dim(2)
            .with_background(2.0)
            .add_voxel(Coord::new(0, 0, 0), -1.0)
            .add_voxel(Coord::new(3, 1, 0), 0.5)
            .build()
            .unwrap()
    }

    #[test]
    fn test_export_leaves() {
        let grid = make_grid();
        let arrays = export_leaves(&grid, false).unwrap();

        assert_eq!(arrays.len(), 2);
        assert_eq!(arrays.leaf_shape(), [2, 2, 2, 2]);
        assert_eq!(arrays.origins, vec![[0, 0, 0], [2, 0, 0]]);
        assert_eq!(arrays.values.len(), 16);
        assert_eq!(arrays.values[0], -1.0);
        assert_eq!(arrays.values[1], 2.0);
        assert_eq!(arrays.active.iter().filter(|&&a| a).count(), 2);
        assert_eq!(arrays.sdf_trunc(), 2.0);

        // (3, 1, 0) sits at local (1, 1, 0) of the second leaf
        let leaf = arrays.get(1).unwrap();
        assert_eq!(leaf.values[4 + 2], 0.5);
        assert!(leaf.active[4 + 2]);
        assert!(arrays.get(2).is_none());
    }

    #[test]
    fn test_export_normalized() {
        let grid = make_grid();
        let arrays = export_leaves(&grid, true).unwrap();

        assert!(arrays.normalized);
        assert_eq!(arrays.values[0], -0.5);
        assert!(arrays.values.iter().all(|v| v.abs() <= 1.0));

        let rebuilt = arrays.to_grid().unwrap();
        assert_eq!(rebuilt.background(), 1.0);
        assert_eq!(rebuilt.value_at(Coord::new(3, 1, 0)), 0.25);
        assert_eq!(rebuilt.value_at(Coord::new(50, 0, 0)), 1.0);
    }

    #[test]
    fn test_normalize_zero_background() {
        let grid = GridBuilder::new(0.5).with_background(0.0).build().unwrap();
        assert!(matches!(
            export_leaves(&grid, true),
            Err(IsovoxIoError::InvalidBackground { .. })
        ));
        assert!(export_leaves(&grid, false).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_negative_background() {
        let grid = GridBuilder::new(0.5)
            .with_background(-1.5)
            .add_voxel(Coord::new(0, 0, 0), -0.5)
            .build()
            .unwrap();
        assert!(matches!(
            export_leaves(&grid, true),
            Err(IsovoxIoError::InvalidBackground { .. })
        ));
        assert_eq!(export_leaves(&grid, false).unwrap().len(), 1);
    }

    #[test]
    fn test_leaves_round_trip() {
        let grid = make_grid();
        let rebuilt = export_leaves(&grid, false).unwrap().to_grid().unwrap();

        assert_eq!(rebuilt.leaf_count(), grid.leaf_count());
        assert_eq!(rebuilt.background(), grid.background());
        let a: Vec<_> = grid.iter_active().collect();
        let b: Vec<_> = rebuilt.iter_active().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_to_grid_rejects_bad_buffers() {
        let mut arrays = export_leaves(&make_grid(), false).unwrap();
        arrays.values.pop();
        assert!(matches!(
            arrays.to_grid(),
            Err(IsovoxIoError::InvalidLeafSize { expected: 16, got: 15 })
        ));

        let mut arrays = export_leaves(&make_grid(), false).unwrap();
        arrays.origins[1] = [0, 0, 0];
        assert!(matches!(
            arrays.to_grid(),
            Err(IsovoxIoError::DuplicateLeaf { .. })
        ));

        let mut arrays = export_leaves(&make_grid(), false).unwrap();
        arrays.origins[1] = [1, 0, 0];
        assert!(matches!(
            arrays.to_grid(),
            Err(IsovoxIoError::MisalignedLeaf { x: 1, .. })
        ));
    }
}
