//! # isovox_core
//!
//! Sparse marching cubes for signed scalar fields.
//!
//! This crate turns a sparse, sign-encoded scalar field into an indexed triangle
//! mesh. Only active voxels are visited, and every crossed lattice edge yields a
//! single vertex shared by all voxels that touch it.
//!
//! ## Features
//!
//! - **no_std compatible**: Works in embedded environments with the `alloc` feature
//! - **Storage agnostic**: Fields are read through the [`ScalarField`] trait
//! - **Watertight output**: Neighbouring voxels reuse vertices on shared edges
//! - **Deterministic**: Output order follows the field's active voxel order
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables standard library support
//! - `alloc`: Enables heap allocation (Vec, mesh extraction) without full std
//!
//! ## Modules
//!
//! - [`types`]: Core data types (Coord, Point3, Axis, EdgeKey)
//! - [`traits`]: The [`ScalarField`] storage abstraction
//! - [`marching_cubes`]: Lookup tables and the extraction algorithm
//! - [`mesh`]: Indexed triangle mesh and statistics
//! - [`error`]: Error types
//!
//! ## Usage
//!
//! ```ignore
//! use isovox_core::prelude::*;
//!
//! // Any ScalarField implementation works, e.g. isovox_io::SparseGrid
//! let mesh = extract_surface(&field, 0.05)?;
//! let vertices = mesh.vertex_buffer(); // (V, 3)
//! let triangles = mesh.index_buffer(); // (T, 3)
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Conditional std/alloc support
#[cfg(feature = "std")]
extern crate std;

#[cfg(all(feature = "alloc", not(feature = "std")))]
extern crate alloc;

// Internal alloc prelude for conditional compilation
#[cfg(feature = "std")]
mod alloc_prelude {
    #[allow(unused_imports)]
    pub use std::vec;
    pub use std::vec::Vec;

    pub(crate) type EdgeMap = std::collections::HashMap<crate::types::EdgeKey, u32>;
}

#[cfg(all(feature = "alloc", not(feature = "std")))]
mod alloc_prelude {
    #[allow(unused_imports)]
    pub use alloc::vec;
    pub use alloc::vec::Vec;

    pub(crate) type EdgeMap = alloc::collections::BTreeMap<crate::types::EdgeKey, u32>;
}

pub mod error;
pub mod marching_cubes;
#[cfg(feature = "alloc")]
pub mod mesh;
pub mod traits;
pub mod types;

/// Prelude module for convenient imports.
///
/// Provides the most commonly used types and functions.
pub mod prelude {
    pub use crate::error::IsovoxCoreError;
    pub use crate::marching_cubes::{cube_index, edge_key, SurfaceExtractor};
    pub use crate::traits::ScalarField;
    pub use crate::types::{Axis, Coord, EdgeKey, Point3};

    #[cfg(feature = "alloc")]
    pub use crate::marching_cubes::extract_surface;
    #[cfg(feature = "alloc")]
    pub use crate::mesh::{MeshStats, TriangleMesh};
}

// Re-export everything at crate root for convenience
pub use error::IsovoxCoreError;
pub use marching_cubes::{SurfaceExtractor, EDGE_TABLE, TRI_TABLE};
pub use traits::ScalarField;
pub use types::{Axis, Coord, EdgeKey, Point3};

#[cfg(feature = "alloc")]
pub use marching_cubes::extract_surface;
#[cfg(feature = "alloc")]
pub use mesh::{MeshStats, TriangleMesh};
