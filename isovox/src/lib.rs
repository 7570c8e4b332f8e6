//! # isovox
//!
//! Isosurface meshing of sparse signed-distance grids.
//!
//! This crate ties the extraction algorithm of `isovox_core` to the sparse
//! grids of `isovox_io`:
//!
//! - **Watertight**: One vertex per crossed lattice edge, shared by every voxel
//!   touching it
//! - **Sparse**: Only active voxels are visited
//! - **Deterministic**: Identical grids give byte-identical meshes
//!
//! ## Quick Start
//!
//! ```ignore
//! use isovox::prelude::*;
//!
//! let config = NarrowBandConfig::new(0.02, 3.0, 8);
//! let grid = level_set_sphere(Point3::splat(0.0), 0.5, &config)?;
//!
//! let mesh = Mesher::new()
//!     .with_fit(Fit::UnitSphere { scale: 1.0, padding: 0.1 })
//!     .mesh(&grid)?;
//!
//! export_obj_to_file(&mesh, "sphere.obj")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `rayon`: Parallel per-leaf grid operations in `isovox_io`

#![warn(missing_docs)]

pub mod error;
pub mod mesher;

pub use error::{IsovoxError, Result};
pub use mesher::{Fit, Mesher};

pub use isovox_core::{
    extract_surface, Coord, IsovoxCoreError, MeshStats, Point3, ScalarField, SurfaceExtractor,
    TriangleMesh,
};
pub use isovox_io::{
    blend_into, export_leaves, export_obj, export_obj_to_file, level_set_sphere,
    narrow_band_from_fn, normalize, to_dense, DenseVolume, GridBuilder, GridConfig,
    IsovoxIoError, LeafArrays, NarrowBandConfig, SparseGrid,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{IsovoxError, Result};
    pub use crate::mesher::{Fit, Mesher};
    pub use isovox_core::{Coord, Point3, ScalarField, SurfaceExtractor, TriangleMesh};
    pub use isovox_io::{
        blend_into, export_leaves, export_obj_to_file, level_set_sphere, GridBuilder,
        NarrowBandConfig, SparseGrid,
    };
}
