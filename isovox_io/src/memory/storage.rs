//! Dense leaf storage.
//!
//! Memory layout: values[leaf_idx * voxels_per_leaf + local_idx]
//! with `local_idx = x * D² + y * D + z` inside each leaf (z varies fastest).

use isovox_core::Coord;

/// Contiguous storage for the dense leaves of a sparse grid.
///
/// Every leaf owns `voxels_per_leaf` values and the same number of active flags.
/// Leaves are never freed, so a leaf index stays valid for the lifetime of the
/// storage and iteration follows allocation order.
#[derive(Debug, Clone)]
pub struct LeafStorage {
    /// Voxel values of all leaves.
    pub(crate) values: Vec<f32>,

    /// Active flag of every voxel, parallel to `values`.
    pub(crate) active: Vec<bool>,

    /// Leaf origins for reverse lookup.
    pub(crate) origins: Vec<Coord>,

    /// Number of voxels per leaf (leaf_dim³).
    pub(crate) voxels_per_leaf: usize,
}

impl LeafStorage {
    /// Create empty storage for leaves of `voxels_per_leaf` voxels.
    pub fn new(voxels_per_leaf: usize) -> Self {
        Self {
            values: Vec::new(),
            active: Vec::new(),
            origins: Vec::new(),
            voxels_per_leaf,
        }
    }

    /// Allocate a new inactive leaf filled with `fill` and return its index.
    pub fn allocate_leaf(&mut self, origin: Coord, fill: f32) -> usize {
        let idx = self.origins.len();
        self.origins.push(origin);
        self.values
            .resize(self.values.len() + self.voxels_per_leaf, fill);
        self.active
            .resize(self.active.len() + self.voxels_per_leaf, false);
        idx
    }

    /// Number of allocated leaves.
    #[inline]
    pub fn leaf_count(&self) -> usize {
        self.origins.len()
    }

    /// Number of voxels per leaf.
    #[inline]
    pub fn voxels_per_leaf(&self) -> usize {
        self.voxels_per_leaf
    }

    /// Origin of a leaf by its index.
    #[inline]
    pub fn origin(&self, leaf_idx: usize) -> Coord {
        self.origins[leaf_idx]
    }

    /// Value of one voxel.
    #[inline]
    pub fn value(&self, leaf_idx: usize, local_idx: usize) -> f32 {
        self.values[leaf_idx * self.voxels_per_leaf + local_idx]
    }

    /// Active flag of one voxel.
    #[inline]
    pub fn is_active(&self, leaf_idx: usize, local_idx: usize) -> bool {
        self.active[leaf_idx * self.voxels_per_leaf + local_idx]
    }

    /// Set the value and active flag of one voxel.
    #[inline]
    pub fn set(&mut self, leaf_idx: usize, local_idx: usize, value: f32, active: bool) {
        let idx = leaf_idx * self.voxels_per_leaf + local_idx;
        self.values[idx] = value;
        self.active[idx] = active;
    }

    /// Set the active flag of one voxel, keeping its value.
    #[inline]
    pub fn set_active(&mut self, leaf_idx: usize, local_idx: usize, active: bool) {
        self.active[leaf_idx * self.voxels_per_leaf + local_idx] = active;
    }

    /// Values of one leaf.
    #[inline]
    pub fn leaf_values(&self, leaf_idx: usize) -> &[f32] {
        let start = leaf_idx * self.voxels_per_leaf;
        &self.values[start..start + self.voxels_per_leaf]
    }

    /// Active flags of one leaf.
    #[inline]
    pub fn leaf_active(&self, leaf_idx: usize) -> &[bool] {
        let start = leaf_idx * self.voxels_per_leaf;
        &self.active[start..start + self.voxels_per_leaf]
    }

    /// Overwrite the values and active flags of a whole leaf.
    pub fn set_leaf(&mut self, leaf_idx: usize, values: &[f32], active: &[bool]) {
        debug_assert_eq!(values.len(), self.voxels_per_leaf);
        debug_assert_eq!(active.len(), self.voxels_per_leaf);
        let start = leaf_idx * self.voxels_per_leaf;
        let end = start + self.voxels_per_leaf;
        self.values[start..end].copy_from_slice(values);
        self.active[start..end].copy_from_slice(active);
    }

    /// Total number of active voxels.
    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Apply `f` to every leaf as `(origin, values, active)`.
    ///
    /// With the `rayon` feature leaves are processed in parallel; `f` must not
    /// depend on the order in which leaves are visited.
    pub fn for_each_leaf_mut<F>(&mut self, f: F)
    where
        F: Fn(Coord, &mut [f32], &mut [bool]) + Send + Sync,
    {
        let vpl = self.voxels_per_leaf;
        if vpl == 0 {
            return;
        }

        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            self.values
                .par_chunks_mut(vpl)
                .zip(self.active.par_chunks_mut(vpl))
                .zip(self.origins.par_iter())
                .for_each(|((values, active), &origin)| f(origin, values, active));
        }

        #[cfg(not(feature = "rayon"))]
        {
            self.values
                .chunks_mut(vpl)
                .zip(self.active.chunks_mut(vpl))
                .zip(self.origins.iter())
                .for_each(|((values, active), &origin)| f(origin, values, active));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_allocate() {
        let mut storage = LeafStorage::new(8);

        let origin = Coord::new(2, 4, 6);
        let idx = storage.allocate_leaf(origin, 0.5);
        assert_eq!(idx, 0);
        assert_eq!(storage.leaf_count(), 1);
        assert_eq!(storage.origin(idx), origin);
        assert!(storage.leaf_values(idx).iter().all(|&v| v == 0.5));
        assert_eq!(storage.active_count(), 0);
    }

    #[test]
    fn test_storage_set_and_get() {
        let mut storage = LeafStorage::new(8);
        storage.allocate_leaf(Coord::new(0, 0, 0), 1.0);
        let idx = storage.allocate_leaf(Coord::new(2, 0, 0), 1.0);

        storage.set(idx, 3, -0.25, true);
        assert_eq!(storage.value(idx, 3), -0.25);
        assert!(storage.is_active(idx, 3));
        assert_eq!(storage.values[8 + 3], -0.25);
        assert_eq!(storage.active_count(), 1);

        storage.set_active(idx, 3, false);
        assert!(!storage.is_active(idx, 3));
        assert_eq!(storage.value(idx, 3), -0.25);
    }

    #[test]
    fn test_storage_set_leaf() {
        let mut storage = LeafStorage::new(4);
        let idx = storage.allocate_leaf(Coord::new(0, 0, 0), 0.0);

        storage.set_leaf(idx, &[1.0, 2.0, 3.0, 4.0], &[true, false, true, false]);
        assert_eq!(storage.leaf_values(idx), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(storage.leaf_active(idx), &[true, false, true, false]);
    }

    #[test]
    fn test_for_each_leaf_mut() {
        let mut storage = LeafStorage::new(4);
        storage.allocate_leaf(Coord::new(0, 0, 0), 1.0);
        storage.allocate_leaf(Coord::new(0, 0, 4), 2.0);

        storage.for_each_leaf_mut(|origin, values, active| {
            for (v, a) in values.iter_mut().zip(active.iter_mut()) {
                *v += origin.z as f32;
                *a = true;
            }
        });

        assert!(storage.leaf_values(0).iter().all(|&v| v == 1.0));
        assert!(storage.leaf_values(1).iter().all(|&v| v == 6.0));
        assert_eq!(storage.active_count(), 8);
    }
}
