//! Grid configuration types.

use crate::error::{IsovoxIoError, Result};

/// Largest supported leaf dimension.
pub const MAX_LEAF_DIM: u32 = 64;

/// Grid configuration parameters (immutable after construction).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Number of voxels per axis per leaf (typically 8).
    pub leaf_dim: u32,
    /// World units per voxel.
    pub voxel_size: f64,
    /// Value reported for voxels that hold no explicit value.
    pub background: f32,
}

impl GridConfig {
    /// Create a new grid configuration.
    ///
    /// # Arguments
    /// * `leaf_dim` - Voxels per axis per leaf (typically 8)
    /// * `voxel_size` - World units per voxel
    /// * `background` - Value of unset voxels
    #[inline]
    pub const fn new(leaf_dim: u32, voxel_size: f64, background: f32) -> Self {
        Self {
            leaf_dim,
            voxel_size,
            background,
        }
    }

    /// Level set configuration: 8³ leaves and a background of three voxels.
    #[inline]
    pub fn level_set(voxel_size: f64) -> Self {
        Self::new(8, voxel_size, (3.0 * voxel_size) as f32)
    }

    /// Total number of voxels per leaf (leaf_dim³).
    #[inline]
    pub const fn voxels_per_leaf(&self) -> usize {
        (self.leaf_dim as usize) * (self.leaf_dim as usize) * (self.leaf_dim as usize)
    }

    /// Size of each leaf in world units.
    #[inline]
    pub fn leaf_size(&self) -> f64 {
        self.leaf_dim as f64 * self.voxel_size
    }

    /// Check that the configuration describes a usable grid.
    ///
    /// # Errors
    /// - `InvalidLeafDim` if `leaf_dim` is 0 or above [`MAX_LEAF_DIM`]
    /// - `InvalidVoxelSize` if `voxel_size` is not positive and finite
    /// - `InvalidBackground` if `background` is not finite
    pub fn validate(&self) -> Result<()> {
        if self.leaf_dim == 0 || self.leaf_dim > MAX_LEAF_DIM {
            return Err(IsovoxIoError::InvalidLeafDim {
                leaf_dim: self.leaf_dim,
            });
        }
        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(IsovoxIoError::InvalidVoxelSize {
                voxel_size: self.voxel_size,
            });
        }
        if !self.background.is_finite() {
            return Err(IsovoxIoError::InvalidBackground {
                background: self.background,
            });
        }
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::level_set(0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_config() {
        let config = GridConfig::new(8, 0.1, 0.3);
        assert_eq!(config.voxels_per_leaf(), 512);
        assert!((config.leaf_size() - 0.8).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_grid_config_default() {
        let config = GridConfig::default();
        assert_eq!(config.leaf_dim, 8);
        assert!((config.voxel_size - 0.1).abs() < 1e-12);
        assert!((config.background - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_grid_config_validate() {
        assert!(matches!(
            GridConfig::new(0, 0.1, 0.3).validate(),
            Err(IsovoxIoError::InvalidLeafDim { leaf_dim: 0 })
        ));
        assert!(matches!(
            GridConfig::new(8, 0.0, 0.3).validate(),
            Err(IsovoxIoError::InvalidVoxelSize { .. })
        ));
        assert!(matches!(
            GridConfig::new(8, 0.1, f32::NAN).validate(),
            Err(IsovoxIoError::InvalidBackground { .. })
        ));
    }
}
