//! Grid to mesh pipeline.
//!
//! [`Mesher`] runs the optional normalization, the extraction at the grid's own
//! voxel size, and the optional fit into a canonical volume.

use isovox_core::{ScalarField, SurfaceExtractor, TriangleMesh};
use isovox_io::SparseGrid;

use crate::error::{IsovoxError, Result};

/// Post-extraction placement of the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Fit {
    /// Keep world coordinates.
    #[default]
    None,
    /// Centre the bounding box and scale into a sphere of radius `scale · (1 - padding)`.
    UnitSphere {
        /// Radius before padding.
        scale: f64,
        /// Fraction of the radius left empty.
        padding: f64,
    },
    /// Centre the bounding box and scale into the cube `[-s, s]³`, `s = scale · (1 - padding)`.
    UnitCube {
        /// Half side before padding.
        scale: f64,
        /// Fraction of the half side left empty.
        padding: f64,
    },
}

impl Fit {
    fn validate(&self) -> Result<()> {
        match *self {
            Fit::None => Ok(()),
            Fit::UnitSphere { scale, padding } | Fit::UnitCube { scale, padding } => {
                if scale.is_finite() && scale > 0.0 && (0.0..1.0).contains(&padding) {
                    Ok(())
                } else {
                    Err(IsovoxError::InvalidFit { scale, padding })
                }
            }
        }
    }

    /// Apply the fit to `mesh` in place.
    pub fn apply(&self, mesh: &mut TriangleMesh) {
        match *self {
            Fit::None => {}
            Fit::UnitSphere { scale, padding } => mesh.scale_to_unit_sphere(scale, padding),
            Fit::UnitCube { scale, padding } => mesh.scale_to_unit_cube(scale, padding),
        }
    }
}

/// Meshes sparse grids at their own voxel size.
///
/// # Example
///
/// ```ignore
/// use isovox::{Fit, Mesher};
///
/// let mesh = Mesher::new()
///     .with_normalize(true)
///     .with_fit(Fit::UnitSphere { scale: 1.0, padding: 0.1 })
///     .mesh(&grid)?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mesher {
    /// Rescale the grid so its background becomes 1 before extraction.
    pub normalize: bool,
    /// Placement applied after extraction.
    pub fit: Fit,
}

impl Mesher {
    /// Mesher without normalization or fit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable normalization.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the post-extraction fit.
    pub fn with_fit(mut self, fit: Fit) -> Self {
        self.fit = fit;
        self
    }

    /// Extract the zero level set of `grid`.
    ///
    /// Normalization divides values by the background, which must be positive,
    /// so it does not move the surface; it only changes the values handed to
    /// extraction.
    ///
    /// # Errors
    /// - `InvalidFit` for a non-positive scale or padding outside `[0, 1)`
    /// - `Grid` if normalization rejects a background that is not positive
    /// - `Extraction` for non-finite samples or index overflow
    pub fn mesh(&self, grid: &SparseGrid) -> Result<TriangleMesh> {
        self.fit.validate()?;

        let mut mesh = if self.normalize {
            let normalized = isovox_io::normalize(grid)?;
            self.mesh_field(&normalized, normalized.voxel_size())?
        } else {
            self.mesh_field(grid, grid.voxel_size())?
        };

        self.fit.apply(&mut mesh);
        Ok(mesh)
    }

    /// Extract the zero level set of any scalar field at `voxel_size`.
    ///
    /// The fit is not applied.
    pub fn mesh_field<F: ScalarField>(&self, field: &F, voxel_size: f64) -> Result<TriangleMesh> {
        let extractor = SurfaceExtractor::new(voxel_size)?;
        let mesh = extractor.extract(field)?;

        log::info!(
            "meshed {} active voxels into {} vertices, {} triangles",
            field.active_voxel_count(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(mesh)
    }
}
