//! Spatial construction of level sets.
//!
//! This module provides:
//! - `narrow_band`: Band-limited sampling of signed distance functions

pub mod narrow_band;

pub use narrow_band::{level_set_sphere, narrow_band_from_fn, NarrowBandConfig};
