//! isovox_io - Sparse leaf grids, conversions and grid operations.
//!
//! This crate provides the storage layer for isovox: a two-level sparse grid
//! of dense leaves with a per-voxel active mask, in the style of narrow band
//! level sets. [`SparseGrid`] implements [`isovox_core::ScalarField`], so any
//! grid can be meshed with [`isovox_core::SurfaceExtractor`].
//!
//! # Core Types
//!
//! - [`SparseGrid`]: The grid container
//! - [`GridBuilder`]: Builder pattern for constructing grids
//! - [`LeafStorage`]: Contiguous storage backend
//! - [`LeafMap`]: Hash map for O(1) leaf lookups
//!
//! # Example
//!
//! ```ignore
//! use isovox_io::{level_set_sphere, NarrowBandConfig, Point3};
//! use isovox_core::SurfaceExtractor;
//!
//! let config = NarrowBandConfig::new(0.05, 3.0, 8);
//! let grid = level_set_sphere(Point3::splat(0.0), 1.0, &config)?;
//!
//! let mesh = SurfaceExtractor::new(grid.voxel_size())?.extract(&grid)?;
//! isovox_io::export_obj_to_file(&mesh, "sphere.obj")?;
//! ```
//!
//! # Crate Features
//!
//! - `rayon`: Parallel per-leaf processing in grid operations

pub mod config;
pub mod convert;
pub mod error;
pub mod memory;
pub mod ops;
pub mod spatial;

// Re-export core types from isovox_core
pub use isovox_core::{Coord, MeshStats, Point3, ScalarField, TriangleMesh};

// Re-export main types
pub use config::{GridConfig, MAX_LEAF_DIM};
pub use error::{IsovoxIoError, Result};
pub use memory::{GridBuilder, LeafMap, LeafStorage, LeafView, SparseGrid};

// Re-export convert types
pub use convert::{export_leaves, export_obj, export_obj_to_file, to_dense, DenseVolume, LeafArrays};

// Re-export operations
pub use ops::{blend_into, normalize};

// Re-export spatial types
pub use spatial::{level_set_sphere, narrow_band_from_fn, NarrowBandConfig};
