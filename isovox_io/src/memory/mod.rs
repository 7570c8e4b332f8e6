//! In-memory sparse grid types.
//!
//! This module provides:
//! - `SparseGrid`: The grid container, readable as a `ScalarField`
//! - `GridBuilder`: Builder pattern for constructing grids
//! - `LeafStorage`: Contiguous leaf values and active masks
//! - `LeafMap`: Hash map for leaf lookups

pub mod builder;
pub mod grid;
pub mod leaf_map;
pub mod storage;

pub use builder::GridBuilder;
pub use grid::{LeafView, SparseGrid};
pub use leaf_map::LeafMap;
pub use storage::LeafStorage;
