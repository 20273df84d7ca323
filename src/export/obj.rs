//! Wavefront OBJ export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::terrain::TerrainMesh;

use super::ExportError;

/// Writes positions, smooth normals and faces. Indices are 1-based as OBJ
/// requires.
pub fn write_obj<W: Write>(mesh: &TerrainMesh, mut writer: W) -> Result<(), ExportError> {
    let bounds = mesh.bounds();
    writeln!(writer, "# scanterrain mesh")?;
    writeln!(writer, "# elevation {} .. {}", bounds.min, bounds.max)?;
    writeln!(writer, "o terrain")?;

    for v in mesh.vertices() {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for n in mesh.vertex_normals() {
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }
    for tri in mesh.indices().chunks_exact(3) {
        let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
        writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
    }

    writer.flush()?;
    Ok(())
}

/// Exports the mesh as an OBJ file at `path`.
pub fn export_obj(mesh: &TerrainMesh, path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_obj(mesh, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::{ShadingConfig, TerrainBuffers};
    use glam::Vec3;

    fn quad() -> TerrainMesh {
        let buffers = TerrainBuffers::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.5, 1.0),
                Vec3::new(1.0, 0.5, 1.0),
            ],
            vec![0, 2, 1, 1, 2, 3],
        );
        TerrainMesh::assemble(buffers, ShadingConfig::default()).unwrap()
    }

    #[test]
    fn test_write_obj_counts() {
        let mut out = Vec::new();
        write_obj(&quad(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("vn ")).count(), 4);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 2);
        assert!(text.contains("f 1//1 3//3 2//2"));
    }

    #[test]
    fn test_export_obj_file() {
        let path = std::env::temp_dir().join(format!("scanterrain_obj_{}.obj", std::process::id()));
        export_obj(&quad(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.starts_with("# scanterrain mesh"));
    }
}
