//! Narrow band level set construction.
//!
//! Instead of sampling a whole bounding box densely, only voxels within a
//! band of the zero crossing are stored. Voxels inside the band are active;
//! a rim of inactive voxels clamped to ±background surrounds them so that
//! every cube corner of an active voxel holds a stored value with the right
//! sign. Other voxels of allocated leaves hold `±background` by the sign of the
//! function.

use isovox_core::{Coord, Point3};

use crate::config::GridConfig;
use crate::error::{IsovoxIoError, Result};
use crate::memory::SparseGrid;

/// Width of the inactive rim around the active band, in voxels.
const RIM_VOXELS: f32 = 2.0;

/// Configuration for narrow band construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrowBandConfig {
    /// Voxel size in world units.
    pub voxel_size: f64,
    /// Half width of the active band in voxels.
    pub half_width: f32,
    /// Leaf dimension (voxels per leaf side).
    pub leaf_dim: u32,
}

impl NarrowBandConfig {
    /// Create a new narrow band configuration.
    pub fn new(voxel_size: f64, half_width: f32, leaf_dim: u32) -> Self {
        Self {
            voxel_size,
            half_width,
            leaf_dim,
        }
    }

    /// Background value of the resulting grid, `half_width · voxel_size`.
    #[inline]
    pub fn background(&self) -> f32 {
        self.half_width * self.voxel_size as f32
    }

    /// Grid configuration of the resulting level set.
    pub fn grid_config(&self) -> GridConfig {
        GridConfig::new(self.leaf_dim, self.voxel_size, self.background())
    }
}

impl Default for NarrowBandConfig {
    fn default() -> Self {
        Self {
            voxel_size: 0.1,
            half_width: 3.0,
            leaf_dim: 8,
        }
    }
}

/// Sample a signed distance function into a narrow band level set.
///
/// The function is evaluated at voxel centres `(c + 0.5) · voxel_size` for every
/// voxel whose centre lies within `[bounds_min, bounds_max]` dilated by the band
/// and the rim. `sdf` should be a distance (or at least 1-Lipschitz) so that the
/// band contains every zero crossing between neighbouring voxels.
///
/// # Errors
/// - `InvalidHalfWidth` if `half_width` is not positive and finite
/// - Any error from [`GridConfig::validate`]
pub fn narrow_band_from_fn<F>(
    bounds_min: Point3,
    bounds_max: Point3,
    config: &NarrowBandConfig,
    sdf: F,
) -> Result<SparseGrid>
where
    F: Fn(Point3) -> f32,
{
    if !(config.half_width.is_finite() && config.half_width > 0.0) {
        return Err(IsovoxIoError::InvalidHalfWidth {
            half_width: config.half_width,
        });
    }

    let mut grid = SparseGrid::new(config.grid_config())?;

    let vs = config.voxel_size;
    let background = config.background();
    let rim = background + RIM_VOXELS * vs as f32;
    let pad = libm::ceilf(config.half_width + RIM_VOXELS) as i32;

    let lo = |v: f64| libm::floor(v / vs - 0.5) as i32 - pad;
    let hi = |v: f64| libm::ceil(v / vs - 0.5) as i32 + pad;
    let min = Coord::new(lo(bounds_min.x), lo(bounds_min.y), lo(bounds_min.z));
    let max = Coord::new(hi(bounds_max.x), hi(bounds_max.y), hi(bounds_max.z));

    for x in min.x..=max.x {
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                let coord = Coord::new(x, y, z);
                let d = sdf(grid.voxel_center(coord));
                let magnitude = d.abs();
                if magnitude < background {
                    grid.set_value(coord, d);
                } else if magnitude < rim {
                    grid.set_value_inactive(coord, background.copysign(d));
                }
            }
        }
    }

    // Remaining inactive voxels of allocated leaves take the sign of the function.
    let dim = config.leaf_dim as i32;
    let origins: Vec<Coord> = grid.iter_leaves().map(|leaf| leaf.origin).collect();
    for origin in origins {
        for x in 0..dim {
            for y in 0..dim {
                for z in 0..dim {
                    let coord = origin.offset(x, y, z);
                    if grid.is_active(coord) {
                        continue;
                    }
                    let d = sdf(grid.voxel_center(coord));
                    if d.abs() >= rim {
                        grid.set_value_inactive(coord, background.copysign(d));
                    }
                }
            }
        }
    }

    log::debug!(
        "narrow band: {} active voxels in {} leaves",
        grid.active_voxel_count(),
        grid.leaf_count()
    );

    Ok(grid)
}

/// Narrow band level set of a sphere.
///
/// # Arguments
/// * `center` - Sphere centre in world units
/// * `radius` - Sphere radius in world units
/// * `config` - Narrow band configuration
pub fn level_set_sphere(center: Point3, radius: f64, config: &NarrowBandConfig) -> Result<SparseGrid> {
    let extent = Point3::splat(radius);
    narrow_band_from_fn(center - extent, center + extent, config, |p| {
        ((p - center).length() - radius) as f32
    })
}
