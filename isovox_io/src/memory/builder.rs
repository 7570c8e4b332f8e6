//! GridBuilder pattern for constructing SparseGrid.
//!
//! Provides a fluent API for building grids with validation.

use isovox_core::{Coord, Point3};

use super::grid::SparseGrid;
use crate::config::GridConfig;
use crate::error::{IsovoxIoError, Result};

/// Builder for constructing [`SparseGrid`] instances.
///
/// Leaves added as whole arrays follow the narrow band rule: voxels holding
/// `+background` or `-background` stay inactive, every other voxel is active.
/// Single voxels added with [`GridBuilder::add_voxel`]
/// are always active.
///
/// # Example
///
/// ```ignore
/// use isovox_io::{GridBuilder, Coord};
///
/// let grid = GridBuilder::new(0.1)
///     .with_leaf_dim(8)
///     .add_leaf(Coord::new(0, 0, 0), vec![0.0; 512])?
///     .add_voxel(Coord::new(8, 0, 0), -0.05)
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct GridBuilder {
    leaf_dim: u32,
    voxel_size: f64,
    background: Option<f32>,
    leaves: Vec<(Coord, Vec<f32>)>,
    voxels: Vec<(Coord, f32)>,
}

impl GridBuilder {
    /// Create a new builder for 8³ leaves.
    ///
    /// The background defaults to three voxels, the usual level set band.
    pub fn new(voxel_size: f64) -> Self {
        Self {
            leaf_dim: 8,
            voxel_size,
            background: None,
            leaves: Vec::new(),
            voxels: Vec::new(),
        }
    }

    /// Set the number of voxels per axis per leaf.
    pub fn with_leaf_dim(mut self, leaf_dim: u32) -> Self {
        self.leaf_dim = leaf_dim;
        self
    }

    /// Set the background value.
    pub fn with_background(mut self, background: f32) -> Self {
        self.background = Some(background);
        self
    }

    fn voxels_per_leaf(&self) -> usize {
        (self.leaf_dim as usize).pow(3)
    }

    /// Add a leaf from its values in `x * D² + y * D + z` order.
    ///
    /// # Errors
    /// Returns `InvalidLeafSize` if values does not hold `leaf_dim³` elements.
    pub fn add_leaf(mut self, origin: Coord, values: Vec<f32>) -> Result<Self> {
        let expected = self.voxels_per_leaf();
        if values.len() != expected {
            return Err(IsovoxIoError::InvalidLeafSize {
                expected,
                got: values.len(),
            });
        }
        self.leaves.push((origin, values));
        Ok(self)
    }

    /// Add a leaf with the same value in every voxel.
    pub fn add_leaf_constant(mut self, origin: Coord, value: f32) -> Self {
        let voxels = self.voxels_per_leaf();
        self.leaves.push((origin, vec![value; voxels]));
        self
    }

    /// Add a leaf with values computed from a function.
    ///
    /// The function receives the world-space position of each voxel centre.
    pub fn add_leaf_fn<F>(mut self, origin: Coord, value_fn: F) -> Self
    where
        F: Fn(Point3) -> f32,
    {
        let dim = self.leaf_dim as i32;
        let vs = self.voxel_size;
        let mut values = Vec::with_capacity(self.voxels_per_leaf());

        for x in 0..dim {
            for y in 0..dim {
                for z in 0..dim {
                    let pos = Point3::new(
                        (origin.x + x) as f64 + 0.5,
                        (origin.y + y) as f64 + 0.5,
                        (origin.z + z) as f64 + 0.5,
                    ) * vs;
                    values.push(value_fn(pos));
                }
            }
        }

        self.leaves.push((origin, values));
        self
    }

    /// Add a single active voxel.
    ///
    /// Voxels are written after all leaves, so they override leaf values.
    pub fn add_voxel(mut self, coord: Coord, value: f32) -> Self {
        self.voxels.push((coord, value));
        self
    }

    /// Build the final grid.
    ///
    /// # Errors
    /// - Any error from [`GridConfig::validate`]
    /// - `MisalignedLeaf` if a leaf origin is not a multiple of the leaf dimension
    /// - `DuplicateLeaf` if the same origin was added twice
    pub fn build(self) -> Result<SparseGrid> {
        let background = self
            .background
            .unwrap_or((3.0 * self.voxel_size) as f32);
        let config = GridConfig::new(self.leaf_dim, self.voxel_size, background);
        let mut grid = SparseGrid::new(config)?;

        let dim = self.leaf_dim as i32;
        for (origin, values) in self.leaves {
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

            let active: Vec<bool> = values
                .iter()
                .map(|&v| v.abs() != background.abs())
                .collect();
            let leaf_idx = grid.ensure_leaf(origin);
            grid.storage.set_leaf(leaf_idx, &values, &active);
        }

        for (coord, value) in self.voxels {
            grid.set_value(coord, value);
        }

        Ok(grid)
    }
}
