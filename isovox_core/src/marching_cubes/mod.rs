//! Marching Cubes surface extraction.
//!
//! This module provides:
//!
//! - Compile-time lookup tables for the 256 cube configurations
//! - [`SurfaceExtractor`], which meshes a whole [`ScalarField`](crate::ScalarField)
//!   and shares one vertex per crossed lattice edge
//! - The per-voxel steps ([`cube_index`], [`edge_key`], [`edge_vertex`] and
//!   [`sample_corners`])
//!
//! # Example
//!
//! ```ignore
//! use isovox_core::marching_cubes::SurfaceExtractor;
//!
//! let mesh = SurfaceExtractor::new(0.05)?.extract(&grid)?;
//! println!("{} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());
//! ```

mod algorithm;
mod tables;

pub use algorithm::{
    cube_index, edge_key, edge_vertex, sample_corners, SurfaceExtractor,
};
pub use tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_SHIFT, EDGE_TABLE, TRI_TABLE};

#[cfg(feature = "alloc")]
pub use algorithm::extract_surface;
