//! Error types for isovox_core operations.
//!
//! Provides a simple error enum with no external dependencies for no_std compatibility.

use core::fmt;

/// Error types that can occur during surface extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IsovoxCoreError {
    /// The voxel size is zero, negative or not finite.
    InvalidVoxelSize {
        /// The rejected voxel size.
        voxel_size: f64,
    },
    /// A sampled corner value was NaN or infinite.
    NonFiniteSample {
        /// X index of the sampled coordinate.
        x: i32,
        /// Y index of the sampled coordinate.
        y: i32,
        /// Z index of the sampled coordinate.
        z: i32,
        /// The offending value.
        value: f32,
    },
    /// The cube of an active voxel reaches past the `i32` coordinate range.
    CoordinateOverflow {
        /// X index of the voxel.
        x: i32,
        /// Y index of the voxel.
        y: i32,
        /// Z index of the voxel.
        z: i32,
    },
    /// The mesh needs more vertices than a `u32` index can address.
    TooManyVertices {
        /// Number of vertices already emitted.
        count: usize,
    },
}

impl fmt::Display for IsovoxCoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsovoxCoreError::InvalidVoxelSize { voxel_size } => {
                write!(f, "voxel size must be positive and finite, got {}", voxel_size)
            }
            IsovoxCoreError::NonFiniteSample { x, y, z, value } => {
                write!(f, "non-finite sample {} at ({}, {}, {})", value, x, y, z)
            }
            IsovoxCoreError::CoordinateOverflow { x, y, z } => {
                write!(f, "cube of voxel ({}, {}, {}) leaves the coordinate range", x, y, z)
            }
            IsovoxCoreError::TooManyVertices { count } => {
                write!(f, "vertex count {} exceeds u32 index range", count)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IsovoxCoreError {}
