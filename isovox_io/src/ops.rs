//! Value-level operations on whole grids.
//!
//! - [`blend_into`]: linear blend of two level sets over the union of their leaves
//! - [`normalize`]: rescale a level set so its background becomes 1

use crate::error::{IsovoxIoError, Result};
use crate::memory::SparseGrid;

/// Blend `b` into `a` in place: `a = eta · a + (1 - eta) · b`.
///
/// The blend runs over the union of both grids' leaves. Voxels missing from one
/// grid read as that grid's background, a voxel is active when it is active in
/// either grid, and the backgrounds blend the same way as the values.
///
/// # Errors
/// - `InvalidBlendFactor` if `eta` is not finite
/// - `LeafDimMismatch` if the grids use different leaf dimensions
pub fn blend_into(a: &mut SparseGrid, b: &SparseGrid, eta: f32) -> Result<()> {
    if !eta.is_finite() {
        return Err(IsovoxIoError::InvalidBlendFactor { eta });
    }
    if a.leaf_dim() != b.leaf_dim() {
        return Err(IsovoxIoError::LeafDimMismatch {
            expected: a.leaf_dim(),
            got: b.leaf_dim(),
        });
    }
    if a.voxel_size() != b.voxel_size() {
        log::warn!(
            "blending grids with different voxel sizes ({} vs {}), values are combined by index",
            a.voxel_size(),
            b.voxel_size()
        );
    }

    for leaf in b.iter_leaves() {
        a.ensure_leaf(leaf.origin);
    }

    let w_b = 1.0 - eta;
    let bg_b = b.background();
    a.storage.for_each_leaf_mut(|origin, values, active| match b.leaf(origin) {
        Some(other) => {
            let theirs = other.values.iter().zip(other.active.iter());
            for ((v, act), (&v_b, &act_b)) in values.iter_mut().zip(active.iter_mut()).zip(theirs) {
                *v = eta * *v + w_b * v_b;
                *act |= act_b;
            }
        }
        None => {
            for v in values.iter_mut() {
                *v = eta * *v + w_b * bg_b;
            }
        }
    });

    a.config.background = eta * a.config.background + w_b * bg_b;

    log::debug!(
        "blended {} leaves with eta {}, {} active voxels",
        a.leaf_count(),
        eta,
        a.active_voxel_count()
    );

    Ok(())
}

/// Copy of `grid` rescaled so that the background becomes 1.
///
/// Active values are divided by the background. Inactive values equal to
/// `±background` become `±1`; other inactive values are kept.
///
/// # Errors
/// `InvalidBackground` unless the background is positive and finite. Dividing
/// by a negative background would flip every sign and with it the winding.
pub fn normalize(grid: &SparseGrid) -> Result<SparseGrid> {
    let background = grid.background();
    if !(background.is_finite() && background > 0.0) {
        return Err(IsovoxIoError::InvalidBackground { background });
    }

    let mut out = grid.clone();
    out.storage.for_each_leaf_mut(|_, values, active| {
        for (v, &is_active) in values.iter_mut().zip(active.iter()) {
            if is_active {
                *v /= background;
            } else if *v == background {
                *v = 1.0;
            } else if *v == -background {
                *v = -1.0;
            }
        }
    });
    out.config.background = 1.0;

    Ok(out)
}
