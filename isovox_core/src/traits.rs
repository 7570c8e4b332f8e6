//! Field abstraction consumed by surface extraction.
//!
//! Storage crates (isovox_io) implement [`ScalarField`] for their sparse grids so
//! the extraction algorithm never depends on a particular layout.

use crate::types::Coord;

/// A sparse scalar field over integer voxel coordinates.
///
/// Every coordinate has a value: explicitly stored voxels return their stored
/// value, every other coordinate resolves to [`ScalarField::background`]. The
/// sign of the value encodes membership, negative meaning inside.
///
/// Implementors must keep lookups cheap (amortized O(1)) and must not change
/// while an extraction is running.
pub trait ScalarField {
    /// Value stored at `coord`, or the background if nothing is stored there.
    fn value_at(&self, coord: Coord) -> f32;

    /// Value reported for coordinates that hold no explicit value.
    fn background(&self) -> f32;

    /// Iterate over the active voxel coordinates.
    ///
    /// The order of this iterator fixes the order of the extracted vertices, so
    /// it must be stable for an unchanged field.
    fn active_coords(&self) -> impl Iterator<Item = Coord> + '_;

    /// Number of active voxels.
    ///
    /// The default implementation walks [`ScalarField::active_coords`].
    fn active_voxel_count(&self) -> usize {
        self.active_coords().count()
    }
}

impl<T: ScalarField + ?Sized> ScalarField for &T {
    #[inline]
    fn value_at(&self, coord: Coord) -> f32 {
        (**self).value_at(coord)
    }

    #[inline]
    fn background(&self) -> f32 {
        (**self).background()
    }

    #[inline]
    fn active_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (**self).active_coords()
    }

    #[inline]
    fn active_voxel_count(&self) -> usize {
        (**self).active_voxel_count()
    }
}
