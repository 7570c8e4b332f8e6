//! Dense export of the active region.

use isovox_core::{Coord, Point3};

use crate::memory::SparseGrid;

/// Dense copy of a grid's active bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVolume {
    /// Number of voxels along x, y and z.
    pub shape: [usize; 3],
    /// Voxel coordinate of element `[0, 0, 0]`.
    pub origin: Coord,
    /// World position of the centre of the origin voxel.
    pub origin_world: Point3,
    /// Values in `x * (Y * Z) + y * Z + z` order.
    pub values: Vec<f32>,
}

impl DenseVolume {
    /// Value at index `[i, j, k]`.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<f32> {
        let [nx, ny, nz] = self.shape;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.values.get((i * ny + j) * nz + k).copied()
    }
}

/// Distance from `lo` to `hi`, computed wide so spans past `i32::MAX` stay exact.
#[inline]
fn span(lo: i32, hi: i32) -> usize {
    (i64::from(hi) - i64::from(lo)) as usize
}

/// Copy the active bounding box of `grid` into a dense array.
///
/// Active voxels keep their values; every other voxel in the box holds the
/// background. Returns `None` when nothing is active.
pub fn to_dense(grid: &SparseGrid) -> Option<DenseVolume> {
    let (min, max) = grid.active_bounding_box()?;
    let shape = [
        span(min.x, max.x) + 1,
        span(min.y, max.y) + 1,
        span(min.z, max.z) + 1,
    ];

    let mut values = vec![grid.background(); shape[0] * shape[1] * shape[2]];
    for (coord, value) in grid.iter_active() {
        let i = span(min.x, coord.x);
        let j = span(min.y, coord.y);
        let k = span(min.z, coord.z);
        values[(i * shape[1] + j) * shape[2] + k] = value;
    }

    Some(DenseVolume {
        shape,
        origin: min,
        origin_world: grid.voxel_center(min),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::GridBuilder;

    #[test]
    fn test_span_covers_full_coordinate_range() {
        assert_eq!(span(-3, 2), 5);
        assert_eq!(span(i32::MIN, i32::MAX), u32::MAX as usize);
        assert_eq!(span(-1, i32::MAX), 1usize << 31);
    }

    #[test]
    fn test_to_dense_at_coordinate_extremes() {
        let grid = GridBuilder::new(1.0)
            .with_leaf_dim(4)
            .with_background(2.0)
            .add_voxel(Coord::new(i32::MAX, i32::MIN, 0), -1.0)
            .add_voxel(Coord::new(i32::MAX - 1, i32::MIN + 1, 0), 0.5)
            .build()
            .unwrap();

        let dense = to_dense(&grid).unwrap();
        assert_eq!(dense.shape, [2, 2, 1]);
        assert_eq!(dense.origin, Coord::new(i32::MAX - 1, i32::MIN, 0));
        assert_eq!(dense.get(1, 0, 0), Some(-1.0));
        assert_eq!(dense.get(0, 1, 0), Some(0.5));
        assert_eq!(dense.get(0, 0, 0), Some(2.0));
    }

    #[test]
    fn test_to_dense() {
        let grid = GridBuilder::new(0.5)
            .with_leaf_dim(4)
            .with_background(1.0)
            .add_voxel(Coord::new(-1, 0, 2), -0.5)
            .add_voxel(Coord::new(1, 1, 2), 0.25)
            .build()
            .unwrap();

        let dense = to_dense(&grid).unwrap();
        assert_eq!(dense.shape, [3, 2, 1]);
        assert_eq!(dense.origin, Coord::new(-1, 0, 2));
        assert_eq!(dense.origin_world, Point3::new(-0.25, 0.25, 1.25));
        assert_eq!(dense.get(0, 0, 0), Some(-0.5));
        assert_eq!(dense.get(2, 1, 0), Some(0.25));
        assert_eq!(dense.get(1, 0, 0), Some(1.0));
        assert_eq!(dense.get(3, 0, 0), None);
    }

    #[test]
    fn test_to_dense_ignores_inactive() {
        let mut grid = GridBuilder::new(0.5).with_background(1.0).build().unwrap();
        assert!(to_dense(&grid).is_none());

        grid.set_value(Coord::new(0, 0, 0), 0.5);
        grid.set_value_inactive(Coord::new(0, 0, 1), -1.0);
        let dense = to_dense(&grid).unwrap();
        assert_eq!(dense.shape, [1, 1, 1]);
        assert_eq!(dense.values, vec![0.5]);
    }
}
