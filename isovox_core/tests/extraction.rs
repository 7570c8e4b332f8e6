//! Behavioural tests for sparse marching cubes extraction.
//!
//! # Test Categories
//!
//! 1. **Degenerate inputs** - empty and single-sign fields
//! 2. **Reference cases** - hand-computed single and two voxel meshes
//! 3. **Sharing** - one vertex per crossed lattice edge
//! 4. **Determinism and scale covariance**
//! 5. **Topology** - closed, consistently oriented output for closed surfaces

use std::collections::{BTreeMap, HashMap, HashSet};

use isovox_core::prelude::*;
use isovox_core::EDGE_TABLE;
use proptest::prelude::*;

// =============================================================================
// Test Helpers
// =============================================================================

/// Explicitly stored values over a constant background.
struct MapField {
    values: BTreeMap<Coord, f32>,
    active: Vec<Coord>,
    background: f32,
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

/// Dense `n^3` block of values at the origin, padded by one active layer below
/// so cubes reaching into the positive background are processed too.
fn boxed_field(n: i32, values: &[f32]) -> MapField {
    let mut stored = BTreeMap::new();
    let mut i = 0;
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                let v = values[i];
                stored.insert(Coord::new(x, y, z), if v == 0.0 { 0.5 } else { v });
                i += 1;
            }
        }
    }

    let mut active = Vec::new();
    for x in -1..n {
        for y in -1..n {
            for z in -1..n {
                active.push(Coord::new(x, y, z));
            }
        }
    }

    MapField {
        values: stored,
        active,
        background: 1.0,
    }
}

/// Sphere of radius `radius` voxels centred between voxels, banded like a level set.
fn sphere_field(radius: f32) -> MapField {
    let extent = radius as i32 + 4;
    let band = 3.0;

    let mut values = BTreeMap::new();
    let mut active = Vec::new();
    for x in -extent..extent {
        for y in -extent..extent {
            for z in -extent..extent {
                let p = [x as f32 + 0.5, y as f32 + 0.5, z as f32 + 0.5];
                let d = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt() - radius;
                if d.abs() < band + 2.0 {
                    values.insert(Coord::new(x, y, z), d.clamp(-band, band));
                }
                if d.abs() < band {
                    active.push(Coord::new(x, y, z));
                }
            }
        }
    }

    MapField {
        values,
        active,
        background: band,
    }
}

fn edge_use_counts(mesh: &TriangleMesh) -> HashMap<(u32, u32), usize> {
    let mut counts = HashMap::new();
    for &[a, b, c] in &mesh.triangles {
        for (u, v) in [(a, b), (b, c), (c, a)] {
            *counts.entry((u, v)).or_insert(0) += 1;
        }
    }
    counts
}

// =============================================================================
// Degenerate Inputs
// =============================================================================

#[test]
fn empty_field_gives_empty_mesh() {
    let field = MapField {
        values: BTreeMap::new(),
        active: Vec::new(),
        background: 1.0,
    };

    for voxel_size in [1e-3, 0.1, 7.5] {
        let mesh = extract_surface(&field, voxel_size).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }
}

#[test]
fn uniform_positive_field_gives_empty_mesh() {
    let field = boxed_field(3, &[0.25; 27]);
    assert!(extract_surface(&field, 0.1).unwrap().is_empty());
}

#[test]
fn uniform_negative_field_gives_empty_mesh() {
    let mut field = boxed_field(3, &[-0.25; 27]);
    field.background = -1.0;
    assert!(extract_surface(&field, 0.1).unwrap().is_empty());
}

// =============================================================================
// Reference Cases
// =============================================================================

#[test]
fn single_negative_corner_interpolates_incident_edges() {
    // f0 = -0.2 and the three neighbours along +x, +y, +z hold 0.6, 0.2 and 1.8.
    let mut values = BTreeMap::new();
    values.insert(Coord::new(0, 0, 0), -0.2);
    values.insert(Coord::new(1, 0, 0), 0.6);
    values.insert(Coord::new(0, 1, 0), 0.2);
    values.insert(Coord::new(0, 0, 1), 1.8);
    let field = MapField {
        values,
        active: vec![Coord::new(0, 0, 0)],
        background: 2.0,
    };

    let voxel_size = 0.5;
    let mesh = extract_surface(&field, voxel_size).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.triangle_count(), 1);

    let c = 0.5 * voxel_size;
    let t = |low: f64, high: f64| low * voxel_size / (low + high);
    let expected = [
        Point3::new(c + t(0.2f32 as f64, 0.6f32 as f64), c, c),
        Point3::new(c, c + t(0.2f32 as f64, 0.2f32 as f64), c),
        Point3::new(c, c, c + t(0.2f32 as f64, 1.8f32 as f64)),
    ];
    for (got, want) in mesh.vertices.iter().zip(expected.iter()) {
        assert!((*got - *want).length() < 1e-12, "{:?} vs {:?}", got, want);
    }
}

#[test]
fn winding_points_away_from_negative_corner() {
    // Each single negative corner case must face away from that corner.
    for corner in 0..8 {
        let offset = isovox_core::marching_cubes::CORNER_OFFSETS[corner];
        let negative = Coord::new(offset[0], offset[1], offset[2]);

        let mut values = BTreeMap::new();
        values.insert(negative, -1.0);
        let field = MapField {
            values,
            active: vec![Coord::new(0, 0, 0)],
            background: 1.0,
        };

        let mesh = extract_surface(&field, 1.0).unwrap();
        assert_eq!(mesh.triangle_count(), 1, "corner {}", corner);

        let [a, b, c] = mesh.triangle(0).unwrap();
        let normal = (b - a).cross(c - a);
        let inside = Point3::new(
            negative.x as f64 + 0.5,
            negative.y as f64 + 0.5,
            negative.z as f64 + 0.5,
        );
        let centroid = (a + b + c) / 3.0;
        assert!(normal.dot(centroid - inside) > 0.0, "corner {}", corner);
    }
}

// =============================================================================
// Sharing
// =============================================================================

#[test]
fn shared_edges_produce_one_vertex() {
    // A single negative voxel is a corner of eight cubes; all of them are active.
    let mut values = BTreeMap::new();
    values.insert(Coord::new(0, 0, 0), -1.0);
    let mut active = Vec::new();
    for x in -1..=0 {
        for y in -1..=0 {
            for z in -1..=0 {
                active.push(Coord::new(x, y, z));
            }
        }
    }
    let field = MapField {
        values,
        active,
        background: 1.0,
    };

    let mesh = extract_surface(&field, 1.0).unwrap();

    // Eight triangles forming an octahedron around the negative sample.
    assert_eq!(mesh.triangle_count(), 8);
    assert_eq!(mesh.vertex_count(), 6);
    assert!(edge_use_counts(&mesh).values().all(|&n| n == 1));
}

#[test]
fn sphere_is_closed_and_outward() {
    let field = sphere_field(5.0);
    let mesh = extract_surface(&field, 1.0).unwrap();
    assert!(mesh.triangle_count() > 100);

    // Every directed edge appears once, so its reverse appears once too.
    let counts = edge_use_counts(&mesh);
    for (&(u, v), &n) in &counts {
        assert_eq!(n, 1);
        assert_eq!(counts.get(&(v, u)), Some(&1), "open edge {}-{}", u, v);
    }

    for [a, b, c] in mesh.iter_triangles() {
        let normal = (b - a).cross(c - a);
        let centroid = (a + b + c) / 3.0;
        assert!(normal.dot(centroid) > 0.0);
    }

    // All vertices lie within one voxel of the sphere.
    for v in &mesh.vertices {
        assert!((v.length() - 5.0).abs() < 1.0);
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Triangles only reference emitted vertices and no vertex is emitted twice.
    #[test]
    fn indices_valid_and_vertices_unique(
        n in 1i32..5,
        values in prop::collection::vec(-1.0f32..1.0, 64),
    ) {
        let field = boxed_field(n, &values);
        let mesh = extract_surface(&field, 0.25).unwrap();

        for tri in &mesh.triangles {
            for &i in tri {
                prop_assert!((i as usize) < mesh.vertex_count());
            }
        }

        let unique: HashSet<[u64; 3]> = mesh
            .vertices
            .iter()
            .map(|v| [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()])
            .collect();
        prop_assert_eq!(unique.len(), mesh.vertex_count());
    }

    /// Running twice yields identical output.
    #[test]
    fn extraction_is_deterministic(
        n in 1i32..5,
        values in prop::collection::vec(-1.0f32..1.0, 64),
    ) {
        let field = boxed_field(n, &values);
        let a = extract_surface(&field, 0.1).unwrap();
        let b = extract_surface(&field, 0.1).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Doubling the voxel size doubles every coordinate and keeps the triangles.
    #[test]
    fn extraction_scales_with_voxel_size(
        n in 1i32..5,
        values in prop::collection::vec(-1.0f32..1.0, 64),
        voxel_size in 0.01f64..2.0,
    ) {
        let field = boxed_field(n, &values);
        let small = extract_surface(&field, voxel_size).unwrap();
        let large = extract_surface(&field, voxel_size * 2.0).unwrap();

        prop_assert_eq!(&small.triangles, &large.triangles);
        prop_assert_eq!(small.vertex_count(), large.vertex_count());
        for (s, l) in small.vertices.iter().zip(large.vertices.iter()) {
            prop_assert_eq!(*s * 2.0, *l);
        }
    }

    /// Closed surfaces come out watertight and consistently oriented.
    #[test]
    fn closed_surfaces_are_manifold(
        n in 1i32..5,
        values in prop::collection::vec(-1.0f32..1.0, 64),
    ) {
        let field = boxed_field(n, &values);
        let mesh = extract_surface(&field, 1.0).unwrap();

        let counts = edge_use_counts(&mesh);
        for (&(u, v), &count) in &counts {
            prop_assert_eq!(count, 1);
            prop_assert_eq!(counts.get(&(v, u)).copied(), Some(1));
        }
    }

    /// The vertex count never exceeds three per triangle and sharing only helps.
    #[test]
    fn sharing_never_adds_vertices(
        n in 1i32..5,
        values in prop::collection::vec(-1.0f32..1.0, 64),
    ) {
        let field = boxed_field(n, &values);
        let mesh = extract_surface(&field, 1.0).unwrap();

        let mut independent = 0usize;
        for voxel in field.active_coords() {
            let samples = isovox_core::marching_cubes::sample_corners(&field, voxel).unwrap();
            let mask = EDGE_TABLE[cube_index(&samples) as usize];
            independent += mask.count_ones() as usize;
        }
        prop_assert!(mesh.vertex_count() <= independent);
        if mesh.triangle_count() > 1 {
            prop_assert!(mesh.vertex_count() < independent);
        }
    }
}
