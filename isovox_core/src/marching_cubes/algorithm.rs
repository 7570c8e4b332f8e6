//! Sparse marching cubes with shared-edge vertex deduplication.
//!
//! Voxel values live at voxel centres: the value stored at coordinate `c` sits at
//! world position `(c + 0.5) * voxel_size`. The cube processed for an active voxel
//! spans that centre and the centres of its seven upper neighbours.

use crate::error::IsovoxCoreError;
use crate::traits::ScalarField;
use crate::types::{Coord, EdgeKey, Point3};

#[cfg(feature = "alloc")]
use crate::alloc_prelude::EdgeMap;
#[cfg(feature = "alloc")]
use crate::mesh::TriangleMesh;

use super::tables::{CORNER_OFFSETS, EDGE_SHIFT};
#[cfg(feature = "alloc")]
use super::tables::{EDGE_CORNERS, EDGE_TABLE, TRI_TABLE};

/// Compute the cube configuration index from the 8 corner samples.
///
/// Bit `i` is set when corner `i` is strictly negative, so a sample of exactly
/// zero counts as outside.
#[inline]
pub fn cube_index(samples: &[f32; 8]) -> u8 {
    let mut index = 0u8;
    for (i, &value) in samples.iter().enumerate() {
        if value < 0.0 {
            index |= 1 << i;
        }
    }
    index
}

/// Global identity of edge `edge` (0-11) of the cube anchored at `voxel`.
///
/// The cube's upper corner `voxel + (1, 1, 1)` must be representable;
/// [`sample_corners`] rejects voxels where it is not.
#[inline]
pub fn edge_key(voxel: Coord, edge: usize) -> EdgeKey {
    let shift = EDGE_SHIFT[edge];
    EdgeKey::new(
        voxel.x + shift.x,
        voxel.y + shift.y,
        voxel.z + shift.z,
        shift.axis,
    )
}

/// Position of the surface crossing on the edge `key`.
///
/// `low` and `high` are the samples at the edge's low and high endpoint. The
/// vertex moves from the low endpoint's centre by `|low| / (|low| + |high|)`
/// of a voxel along the edge axis.
#[inline]
pub fn edge_vertex(key: EdgeKey, low: f32, high: f32, voxel_size: f64) -> Point3 {
    let mut p = Point3::new(
        (key.x as f64 + 0.5) * voxel_size,
        (key.y as f64 + 0.5) * voxel_size,
        (key.z as f64 + 0.5) * voxel_size,
    );

    let low = libm::fabs(low as f64);
    let high = libm::fabs(high as f64);
    let denom = low + high;
    // A crossing edge always has one strictly negative endpoint.
    debug_assert!(denom > 0.0, "degenerate crossing edge {:?}", key);

    *p.get_mut(key.axis.index()) += low * voxel_size / denom;
    p
}

/// Sample the 8 corners of the cube anchored at `voxel`.
///
/// # Errors
/// - `CoordinateOverflow` if the cube reaches past `i32::MAX` on any axis
/// - `NonFiniteSample` if any corner value is NaN or infinite
#[inline]
pub fn sample_corners<F: ScalarField + ?Sized>(
    field: &F,
    voxel: Coord,
) -> Result<[f32; 8], IsovoxCoreError> {
    if voxel.checked_offset(1, 1, 1).is_none() {
        return Err(IsovoxCoreError::CoordinateOverflow {
            x: voxel.x,
            y: voxel.y,
            z: voxel.z,
        });
    }

    let mut samples = [0.0f32; 8];
    for (sample, offset) in samples.iter_mut().zip(CORNER_OFFSETS.iter()) {
        let coord = voxel.offset(offset[0], offset[1], offset[2]);
        let value = field.value_at(coord);
        if !value.is_finite() {
            return Err(IsovoxCoreError::NonFiniteSample {
                x: coord.x,
                y: coord.y,
                z: coord.z,
                value,
            });
        }
        *sample = value;
    }
    Ok(samples)
}

/// Marching cubes surface extractor for sparse scalar fields.
///
/// The extractor only holds the voxel size; every call to
/// [`SurfaceExtractor::extract`] owns its own edge map, so one extractor can be
/// shared between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtractor {
    voxel_size: f64,
}

impl SurfaceExtractor {
    /// Create an extractor for fields sampled every `voxel_size` world units.
    ///
    /// # Errors
    /// `InvalidVoxelSize` unless `voxel_size` is finite and positive.
    pub fn new(voxel_size: f64) -> Result<Self, IsovoxCoreError> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(IsovoxCoreError::InvalidVoxelSize { voxel_size });
        }
        Ok(Self { voxel_size })
    }

    /// World units per voxel.
    #[inline]
    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Extract the zero isosurface of `field`.
    ///
    /// Active voxels are visited in the field's iteration order. Each voxel whose
    /// cube straddles the surface contributes up to five triangles; vertices on
    /// edges shared with already visited voxels are reused rather than emitted
    /// again.
    ///
    /// # Errors
    /// - `CoordinateOverflow` if an active voxel sits on the upper `i32` bound
    /// - `NonFiniteSample` if a sampled corner is NaN or infinite
    /// - `TooManyVertices` if the mesh outgrows `u32` indices
    #[cfg(feature = "alloc")]
    pub fn extract<F: ScalarField + ?Sized>(
        &self,
        field: &F,
    ) -> Result<TriangleMesh, IsovoxCoreError> {
        let mut mesh = TriangleMesh::new();
        let mut edge_map = EdgeMap::new();
        let mut visited = 0usize;
        let mut crossing = 0usize;

        for voxel in field.active_coords() {
            visited += 1;

            let samples = sample_corners(field, voxel)?;
            let index = cube_index(&samples) as usize;
            let mask = EDGE_TABLE[index];
            if mask == 0 {
                continue;
            }
            crossing += 1;

            let mut slots = [0u32; 12];
            for (edge, slot) in slots.iter_mut().enumerate() {
                if mask & (1 << edge) == 0 {
                    continue;
                }

                let key = edge_key(voxel, edge);
                *slot = match edge_map.get(&key) {
                    Some(&vertex) => vertex,
                    None => {
                        let vertex = u32::try_from(mesh.vertices.len()).map_err(|_| {
                            IsovoxCoreError::TooManyVertices {
                                count: mesh.vertices.len(),
                            }
                        })?;
                        let (a, b) = EDGE_CORNERS[edge];
                        mesh.vertices
                            .push(edge_vertex(key, samples[a], samples[b], self.voxel_size));
                        edge_map.insert(key, vertex);
                        vertex
                    }
                };
            }

            // Swapping the last two table entries orients normals towards positive values.
            for tri in TRI_TABLE[index].chunks_exact(3) {
                if tri[0] == -1 {
                    break;
                }
                mesh.triangles.push([
                    slots[tri[0] as usize],
                    slots[tri[2] as usize],
                    slots[tri[1] as usize],
                ]);
            }
        }

        log::debug!(
            "marching cubes: {} active voxels, {} crossing, {} vertices, {} triangles",
            visited,
            crossing,
            mesh.vertex_count(),
            mesh.triangle_count()
        );

        Ok(mesh)
    }
}

/// Extract the zero isosurface of `field` sampled at `voxel_size`.
///
/// Convenience wrapper around [`SurfaceExtractor`].
///
/// # Errors
/// See [`SurfaceExtractor::new`] and [`SurfaceExtractor::extract`].
#[cfg(feature = "alloc")]
pub fn extract_surface<F: ScalarField + ?Sized>(
    field: &F,
    voxel_size: f64,
) -> Result<TriangleMesh, IsovoxCoreError> {
    SurfaceExtractor::new(voxel_size)?.extract(field)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::vec::Vec;

    /// Explicit voxel values with a constant background.
    struct MapField {
        values: BTreeMap<Coord, f32>,
        active: Vec<Coord>,
        background: f32,
    }

    impl MapField {
        fn new(background: f32) -> Self {
            Self {
                values: BTreeMap::new(),
                active: Vec::new(),
                background,
            }
        }

        fn set(&mut self, coord: Coord, value: f32) {
            self.values.insert(coord, value);
        }

        fn activate(&mut self, coord: Coord) {
            self.active.push(coord);
        }
    }

    impl ScalarField for MapField {
        fn value_at(&self, coord: Coord) -> f32 {
            self.values.get(&coord).copied().unwrap_or(self.background)
        }

        fn background(&self) -> f32 {
            self.background
        }

        fn active_coords(&self) -> impl Iterator<Item = Coord> + '_ {
            self.active.iter().copied()
        }
    }

    fn corner_zero_field() -> MapField {
        let mut field = MapField::new(1.0);
        field.set(Coord::new(0, 0, 0), -1.0);
        field.activate(Coord::new(0, 0, 0));
        field
    }

    fn assert_close(a: Point3, b: Point3) {
        assert!((a - b).length() < 1e-12, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_cube_index() {
        assert_eq!(cube_index(&[1.0; 8]), 0);
        assert_eq!(cube_index(&[-1.0; 8]), 255);

        let mut values = [1.0; 8];
        values[0] = -1.0;
        assert_eq!(cube_index(&values), 1);

        values[1] = -1.0;
        assert_eq!(cube_index(&values), 3);

        // Exactly zero counts as outside.
        values[7] = 0.0;
        assert_eq!(cube_index(&values), 3);
        values[7] = -0.0;
        assert_eq!(cube_index(&values), 3);
    }

    #[test]
    fn test_edge_key_shared_between_neighbours() {
        // Edge 1 of voxel (0,0,0) is edge 3 of voxel (1,0,0).
        assert_eq!(
            edge_key(Coord::new(0, 0, 0), 1),
            edge_key(Coord::new(1, 0, 0), 3)
        );
        // Edge 10 of voxel (0,0,0) is edge 8 of voxel (1,1,0).
        assert_eq!(
            edge_key(Coord::new(0, 0, 0), 10),
            edge_key(Coord::new(1, 1, 0), 8)
        );
        // Edge 6 of voxel (0,0,0) is edge 0 of voxel (0,1,1).
        assert_eq!(
            edge_key(Coord::new(0, 0, 0), 6),
            edge_key(Coord::new(0, 1, 1), 0)
        );
    }

    #[test]
    fn test_edge_vertex_midpoint() {
        let key = edge_key(Coord::new(0, 0, 0), 0);
        let p = edge_vertex(key, -1.0, 1.0, 1.0);
        assert_close(p, Point3::new(1.0, 0.5, 0.5));
    }

    #[test]
    fn test_edge_vertex_weighting() {
        // |low| = 0.25, |high| = 0.75: a quarter of the way along the edge.
        let key = edge_key(Coord::new(2, 0, 0), 8);
        let p = edge_vertex(key, -0.25, 0.75, 0.5);
        assert_close(p, Point3::new(1.25, 0.25, 0.25 + 0.125));
    }

    #[test]
    fn test_edge_vertex_at_zero_endpoint() {
        // A zero sample pins the vertex to that endpoint.
        let key = edge_key(Coord::new(0, 0, 0), 3);
        let p = edge_vertex(key, 0.0, -2.0, 1.0);
        assert_close(p, Point3::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_invalid_voxel_size() {
        for size in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SurfaceExtractor::new(size),
                Err(IsovoxCoreError::InvalidVoxelSize { .. })
            ));
        }
    }

    #[test]
    fn test_empty_field() {
        let field = MapField::new(1.0);
        let mesh = extract_surface(&field, 0.1).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_uniform_sign_field() {
        let mut field = MapField::new(-3.0);
        for x in 0..3 {
            field.set(Coord::new(x, 0, 0), -0.5);
            field.activate(Coord::new(x, 0, 0));
        }
        let mesh = extract_surface(&field, 1.0).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_single_corner_configuration() {
        let mesh = extract_surface(&corner_zero_field(), 1.0).unwrap();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);

        // Discovery order follows the edge numbering: 0 (x), 3 (y), 8 (z).
        assert_close(mesh.vertices[0], Point3::new(1.0, 0.5, 0.5));
        assert_close(mesh.vertices[1], Point3::new(0.5, 1.0, 0.5));
        assert_close(mesh.vertices[2], Point3::new(0.5, 0.5, 1.0));
        assert_eq!(mesh.triangles[0], [0, 1, 2]);
    }

    #[test]
    fn test_single_corner_winding_points_outward() {
        let mesh = extract_surface(&corner_zero_field(), 1.0).unwrap();
        let [a, b, c] = mesh.triangle(0).unwrap();
        let normal = (b - a).cross(c - a);

        // Corner 0 (the negative one) sits at the voxel centre.
        let centroid = (a + b + c) / 3.0;
        let outward = centroid - Point3::splat(0.5);
        assert!(normal.dot(outward) > 0.0);
        assert!(normal.x > 0.0 && normal.y > 0.0 && normal.z > 0.0);
    }

    #[test]
    fn test_adjacent_voxels_share_vertices() {
        let mut field = MapField::new(1.0);
        field.set(Coord::new(1, 0, 0), -1.0);
        field.activate(Coord::new(0, 0, 0));
        field.activate(Coord::new(1, 0, 0));

        let mesh = extract_surface(&field, 1.0).unwrap();

        // Each voxel alone would produce 3 vertices; two edges are shared.
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.vertex_count(), 4);

        let first: Vec<u32> = mesh.triangles[0].to_vec();
        let shared = mesh.triangles[1]
            .iter()
            .filter(|v| first.contains(v))
            .count();
        assert_eq!(shared, 2);
    }

    #[test]
    fn test_inactive_neighbours_are_sampled() {
        // Only voxel (0,0,0) is active, but its upper corner reads a stored inactive value.
        let mut field = MapField::new(1.0);
        field.set(Coord::new(1, 1, 1), -1.0);
        field.activate(Coord::new(0, 0, 0));

        let mesh = extract_surface(&field, 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_non_finite_sample_fails() {
        let mut field = corner_zero_field();
        field.set(Coord::new(1, 0, 0), f32::NAN);

        let err = extract_surface(&field, 1.0).unwrap_err();
        assert!(matches!(
            err,
            IsovoxCoreError::NonFiniteSample { x: 1, y: 0, z: 0, .. }
        ));
    }

    #[test]
    fn test_cube_past_coordinate_range_fails() {
        for voxel in [
            Coord::new(i32::MAX, 0, 0),
            Coord::new(0, i32::MAX, 0),
            Coord::new(0, 0, i32::MAX),
        ] {
            let mut field = MapField::new(1.0);
            field.set(voxel, -0.5);
            field.activate(voxel);

            let err = extract_surface(&field, 1.0).unwrap_err();
            assert_eq!(
                err,
                IsovoxCoreError::CoordinateOverflow {
                    x: voxel.x,
                    y: voxel.y,
                    z: voxel.z,
                }
            );
        }
    }

    #[test]
    fn test_cube_at_lower_coordinate_bound() {
        let voxel = Coord::new(i32::MIN, i32::MIN, i32::MIN);
        let mut field = MapField::new(1.0);
        field.set(voxel, -1.0);
        field.activate(voxel);

        let mesh = extract_surface(&field, 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
    }
}
