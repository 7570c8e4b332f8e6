//! Format conversion utilities.
//!
//! This module provides export of grids to stacked leaf buffers and dense
//! arrays, and of meshes to OBJ.

pub mod dense;
pub mod leaves;
pub mod obj;

pub use dense::{to_dense, DenseVolume};
pub use leaves::{export_leaves, LeafArrays};
pub use obj::{export_obj, export_obj_to_file};
