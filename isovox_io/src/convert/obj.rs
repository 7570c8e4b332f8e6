//! OBJ export for mesh visualization.
//!
//! Writes an indexed triangle mesh as a Wavefront OBJ file. Shared vertices
//! are written once and faces reference them with 1-based indices.

use std::io::Write;

use isovox_core::{MeshStats, TriangleMesh};

use crate::error::Result;

/// Export a mesh as OBJ.
///
/// # Arguments
/// * `mesh` - The mesh to export
/// * `writer` - Writer to output OBJ data
///
/// # Example
///
/// ```ignore
/// use isovox_io::export_obj;
/// use std::fs::File;
///
/// let mut file = File::create("surface.obj")?;
/// let stats = export_obj(&mesh, &mut file)?;
/// ```
pub fn export_obj<W: Write>(mesh: &TriangleMesh, writer: &mut W) -> Result<MeshStats> {
    let stats = MeshStats::from_mesh(mesh);

    writeln!(writer, "# isovox OBJ Export")?;
    writeln!(writer, "# {} vertices, {} faces", stats.vertex_count, stats.triangle_count)?;
    writeln!(writer)?;

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    writeln!(writer)?;

    for [a, b, c] in &mesh.triangles {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    Ok(stats)
}

/// Export a mesh to an OBJ file.
pub fn export_obj_to_file<P: AsRef<std::path::Path>>(
    mesh: &TriangleMesh,
    path: P,
) -> Result<MeshStats> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let stats = export_obj(mesh, &mut writer)?;
    writer.flush()?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use isovox_core::Point3;

    fn make_mesh() -> TriangleMesh {
        TriangleMesh {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(0.0, 0.0, 1.0),
            ],
            triangles: vec![[0, 2, 1], [0, 1, 3]],
        }
    }

    #[test]
    fn test_export_obj_basic() {
        let mesh = make_mesh();
        let mut output = Vec::new();

        let stats = export_obj(&mesh, &mut output).unwrap();
        assert_eq!(stats.vertex_count, 4);
        assert_eq!(stats.triangle_count, 2);

        let output_str = String::from_utf8(output).unwrap();
        assert!(output_str.starts_with("# isovox OBJ Export"));
        assert_eq!(output_str.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert!(output_str.contains("v 1 0 0\n"));
        assert!(output_str.contains("f 1 3 2\n"));
        assert!(output_str.contains("f 1 2 4\n"));
    }

    #[test]
    fn test_export_empty_mesh() {
        let mut output = Vec::new();
        let stats = export_obj(&TriangleMesh::new(), &mut output).unwrap();

        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.triangle_count, 0);
        let output_str = String::from_utf8(output).unwrap();
        assert!(!output_str.contains("f "));
    }

    #[test]
    fn test_export_obj_to_file() {
        let path = std::env::temp_dir().join(format!("isovox_obj_{}.obj", std::process::id()));
        let stats = export_obj_to_file(&make_mesh(), &path).unwrap();
        assert_eq!(stats.triangle_count, 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().filter(|l| l.starts_with("f ")).count(), 2);
        std::fs::remove_file(&path).unwrap();
    }
}
