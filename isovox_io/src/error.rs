//! Error types for isovox_io operations.
//!
//! Provides specific error variants for grid construction, grid operations and export failures.

use core::fmt;

/// Errors that can occur during isovox_io operations.
#[derive(Debug, Clone, PartialEq)]
pub enum IsovoxIoError {
    /// Voxel size is zero, negative or not finite.
    InvalidVoxelSize {
        /// The rejected voxel size.
        voxel_size: f64,
    },

    /// Leaf dimension is zero or too large to index.
    InvalidLeafDim {
        /// The rejected leaf dimension.
        leaf_dim: u32,
    },

    /// Background value is unusable for the requested operation.
    InvalidBackground {
        /// The rejected background.
        background: f32,
    },

    /// Narrow band half width is not positive and finite.
    InvalidHalfWidth {
        /// The rejected half width in voxels.
        half_width: f32,
    },

    /// Leaf data has incorrect size.
    InvalidLeafSize {
        /// Expected number of values.
        expected: usize,
        /// Actual number of values provided.
        got: usize,
    },

    /// A leaf origin is not a multiple of the leaf dimension.
    MisalignedLeaf {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
        /// Leaf dimension the origin must be aligned to.
        leaf_dim: u32,
    },

    /// Attempted to insert a duplicate leaf origin.
    DuplicateLeaf {
        /// X coordinate.
        x: i32,
        /// Y coordinate.
        y: i32,
        /// Z coordinate.
        z: i32,
    },

    /// Two grids (or a grid and a buffer) disagree on the leaf dimension.
    LeafDimMismatch {
        /// Expected leaf dimension.
        expected: u32,
        /// Actual leaf dimension found.
        got: u32,
    },

    /// Blend factor is not finite.
    InvalidBlendFactor {
        /// The rejected factor.
        eta: f32,
    },

    /// I/O error during export.
    Io(String),
}

impl fmt::Display for IsovoxIoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsovoxIoError::InvalidVoxelSize { voxel_size } => {
                write!(f, "voxel size must be positive and finite, got {}", voxel_size)
            }
            IsovoxIoError::InvalidLeafDim { leaf_dim } => {
                write!(f, "invalid leaf dimension {}", leaf_dim)
            }
            IsovoxIoError::InvalidBackground { background } => {
                write!(f, "invalid background value {}", background)
            }
            IsovoxIoError::InvalidHalfWidth { half_width } => {
                write!(f, "narrow band half width must be positive, got {}", half_width)
            }
            IsovoxIoError::InvalidLeafSize { expected, got } => {
                write!(
                    f,
                    "invalid leaf size: expected {} values, got {}",
                    expected, got
                )
            }
            IsovoxIoError::MisalignedLeaf { x, y, z, leaf_dim } => {
                write!(
                    f,
                    "leaf origin ({}, {}, {}) is not aligned to leaf dimension {}",
                    x, y, z, leaf_dim
                )
            }
            IsovoxIoError::DuplicateLeaf { x, y, z } => {
                write!(f, "duplicate leaf origin: ({}, {}, {})", x, y, z)
            }
            IsovoxIoError::LeafDimMismatch { expected, got } => {
                write!(
                    f,
                    "leaf dimension mismatch: expected {}, got {}",
                    expected, got
                )
            }
            IsovoxIoError::InvalidBlendFactor { eta } => {
                write!(f, "blend factor must be finite, got {}", eta)
            }
            IsovoxIoError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for IsovoxIoError {}

impl From<std::io::Error> for IsovoxIoError {
    fn from(err: std::io::Error) -> Self {
        IsovoxIoError::Io(err.to_string())
    }
}

/// Result type alias for isovox_io operations.
pub type Result<T> = core::result::Result<T, IsovoxIoError>;
