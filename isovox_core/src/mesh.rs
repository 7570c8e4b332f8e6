//! Indexed triangle mesh produced by surface extraction.

use crate::alloc_prelude::Vec;
use crate::types::Point3;

/// An indexed triangle mesh.
///
/// Vertices appear in the order extraction first discovered them; each triangle
/// holds three indices into `vertices`. Triangles are wound so their normals
/// point from the negative (inside) region towards the positive one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Vertex positions in world units.
    pub vertices: Vec<Point3>,
    /// Vertex index triples.
    pub triangles: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the mesh has no triangles and no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.triangles.is_empty()
    }

    /// Flat vertex buffer of shape (V, 3), row-major.
    pub fn vertex_buffer(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.vertices.len() * 3);
        for v in &self.vertices {
            out.extend_from_slice(&[v.x, v.y, v.z]);
        }
        out
    }

    /// Flat index buffer of shape (T, 3), row-major.
    pub fn index_buffer(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.triangles.len() * 3);
        for tri in &self.triangles {
            out.extend_from_slice(tri);
        }
        out
    }

    /// Vertex positions of triangle `idx`.
    #[inline]
    pub fn triangle(&self, idx: usize) -> Option<[Point3; 3]> {
        let [a, b, c] = *self.triangles.get(idx)?;
        Some([
            *self.vertices.get(a as usize)?,
            *self.vertices.get(b as usize)?,
            *self.vertices.get(c as usize)?,
        ])
    }

    /// Iterate over triangles as vertex position triples.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        (0..self.triangles.len()).filter_map(move |i| self.triangle(i))
    }

    /// Axis-aligned bounding box of the vertices, `None` for an empty mesh.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
        )
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Point3) {
        for v in &mut self.vertices {
            *v = *v + offset;
        }
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            *v = *v * factor;
        }
    }

    /// Fit the mesh inside a sphere of radius `scale * (1 - padding)`.
    ///
    /// The bounding box centre moves to the origin and the farthest vertex ends up
    /// on the sphere.
    pub fn scale_to_unit_sphere(&mut self, scale: f64, padding: f64) {
        let Some((lo, hi)) = self.bounding_box() else {
            return;
        };
        self.translate(-((lo + hi) * 0.5));

        let radius = self
            .vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0f64, f64::max);
        if radius > 0.0 {
            self.scale(1.0 / radius);
        }
        self.scale(scale * (1.0 - padding));
    }

    /// Fit the mesh inside the cube `[-s, s]^3` with `s = scale * (1 - padding)`.
    ///
    /// The bounding box centre moves to the origin and the longest box side spans
    /// the full cube.
    pub fn scale_to_unit_cube(&mut self, scale: f64, padding: f64) {
        let Some((lo, hi)) = self.bounding_box() else {
            return;
        };
        self.translate(-((lo + hi) * 0.5));

        let extent = (hi - lo).max_element();
        if extent > 0.0 {
            self.scale(2.0 / extent);
        }
        self.scale(scale * (1.0 - padding));
    }
}

/// Summary statistics of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of triangles.
    pub triangle_count: usize,
    /// Sum of triangle areas.
    pub surface_area: f64,
    /// Bounding box minimum (origin for an empty mesh).
    pub bbox_min: Point3,
    /// Bounding box maximum (origin for an empty mesh).
    pub bbox_max: Point3,
}

impl MeshStats {
    /// Compute statistics for a mesh.
    pub fn from_mesh(mesh: &TriangleMesh) -> Self {
        let surface_area = mesh
            .iter_triangles()
            .map(|[a, b, c]| (b - a).cross(c - a).length() * 0.5)
            .sum();
        let (bbox_min, bbox_max) = mesh.bounding_box().unwrap_or_default();

        Self {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            surface_area,
            bbox_min,
            bbox_max,
        }
    }
}
