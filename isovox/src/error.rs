//! Error types for isovox.

use thiserror::Error;

/// Errors that can occur while meshing grids.
#[derive(Error, Debug)]
pub enum IsovoxError {
    /// Surface extraction failed.
    #[error("extraction error: {0}")]
    Extraction(#[from] isovox_core::IsovoxCoreError),

    /// Grid construction, conversion or export failed.
    #[error("grid error: {0}")]
    Grid(#[from] isovox_io::IsovoxIoError),

    /// Fit parameters cannot produce a finite, non-degenerate mesh.
    #[error("invalid fit: scale {scale}, padding {padding}")]
    InvalidFit {
        /// Requested scale.
        scale: f64,
        /// Requested padding fraction.
        padding: f64,
    },
}

/// Result type for isovox operations.
pub type Result<T> = std::result::Result<T, IsovoxError>;
