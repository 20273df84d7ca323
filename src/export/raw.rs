//! Binary buffer dump for game engine imports.
//!
//! Layout, all little-endian: a 24-byte [`RawHeader`], then `vertex_count`
//! positions as three `f32` each, then `index_count` `u32` indices.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::terrain::{TerrainBuffers, TerrainMesh};

use super::ExportError;

pub const RAW_MAGIC: [u8; 4] = *b"STRN";
pub const RAW_VERSION: u32 = 1;

/// Fixed header at the start of a buffer file.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct RawHeader {
    pub magic: [u8; 4],
    pub version: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub min_elevation: f32,
    pub max_elevation: f32,
}

impl RawHeader {
    pub const SIZE: usize = std::mem::size_of::<RawHeader>();

    fn to_le(self) -> Self {
        Self {
            magic: self.magic,
            version: self.version.to_le(),
            vertex_count: self.vertex_count.to_le(),
            index_count: self.index_count.to_le(),
            min_elevation: f32::from_bits(self.min_elevation.to_bits().to_le()),
            max_elevation: f32::from_bits(self.max_elevation.to_bits().to_le()),
        }
    }
}

/// Writes a POD slice in little-endian order.
fn write_words<W: Write>(writer: &mut W, words: &[u32]) -> std::io::Result<()> {
    if cfg!(target_endian = "little") {
        writer.write_all(bytemuck::cast_slice(words))
    } else {
        for w in words {
            writer.write_all(&w.to_le_bytes())?;
        }
        Ok(())
    }
}

/// Dumps the mesh buffers to `path`.
pub fn export_buffers_raw(mesh: &TerrainMesh, path: &Path) -> Result<(), ExportError> {
    let bounds = mesh.bounds();
    let header = RawHeader {
        magic: RAW_MAGIC,
        version: RAW_VERSION,
        vertex_count: mesh.vertex_count() as u32,
        index_count: mesh.indices().len() as u32,
        min_elevation: bounds.min,
        max_elevation: bounds.max,
    }
    .to_le();

    let positions: Vec<[f32; 3]> = mesh.vertices().iter().map(|v| v.to_array()).collect();
    let position_bits: &[u32] = bytemuck::cast_slice(&positions);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytemuck::bytes_of(&header))?;
    write_words(&mut writer, position_bits)?;
    write_words(&mut writer, mesh.indices())?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), vertices = header.vertex_count, "wrote buffer dump");
    Ok(())
}

/// Reads a buffer dump back into [`TerrainBuffers`].
pub fn read_buffers_raw(path: &Path) -> Result<(RawHeader, TerrainBuffers), ExportError> {
    let bytes = fs::read(path)?;
    if bytes.len() < RawHeader::SIZE {
        return Err(ExportError::Truncated {
            expected: RawHeader::SIZE,
            found: bytes.len(),
        });
    }

    let header: RawHeader = bytemuck::pod_read_unaligned::<RawHeader>(&bytes[..RawHeader::SIZE]).to_le();
    if header.magic != RAW_MAGIC {
        return Err(ExportError::BadMagic);
    }
    if header.version != RAW_VERSION {
        return Err(ExportError::UnsupportedVersion(header.version));
    }

    let vertex_words = header.vertex_count as usize * 3;
    let index_words = header.index_count as usize;
    let expected = RawHeader::SIZE + (vertex_words + index_words) * 4;
    if bytes.len() < expected {
        return Err(ExportError::Truncated {
            expected,
            found: bytes.len(),
        });
    }

    let words: Vec<u32> = bytes[RawHeader::SIZE..expected]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();
    let (position_bits, indices) = words.split_at(vertex_words);
    let vertices = position_bits
        .chunks_exact(3)
        .map(|p| Vec3::new(f32::from_bits(p[0]), f32::from_bits(p[1]), f32::from_bits(p[2])))
        .collect();

    Ok((header, TerrainBuffers::new(vertices, indices.to_vec())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::ShadingConfig;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("scanterrain_{name}_{}.bin", std::process::id()))
    }

    fn mesh() -> TerrainMesh {
        let buffers = TerrainBuffers::new(
            vec![
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(2.0, 0.25, 0.0),
                Vec3::new(0.0, 3.5, 2.0),
            ],
            vec![0, 2, 1],
        );
        TerrainMesh::assemble(buffers, ShadingConfig::default()).unwrap()
    }

    #[test]
    fn test_header_size() {
        assert_eq!(RawHeader::SIZE, 24);
    }

    #[test]
    fn test_dump_and_read_back() {
        let path = temp_path("dump");
        let mesh = mesh();
        export_buffers_raw(&mesh, &path).unwrap();

        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len, RawHeader::SIZE + 9 * 4 + 3 * 4);

        let (header, buffers) = read_buffers_raw(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(header.vertex_count, 3);
        assert_eq!(header.min_elevation, -1.0);
        assert_eq!(header.max_elevation, 3.5);
        assert_eq!(buffers.vertices, mesh.vertices());
        assert_eq!(buffers.indices, mesh.indices());
    }

    #[test]
    fn test_rejects_foreign_file() {
        let path = temp_path("foreign");
        std::fs::write(&path, [0u8; 32]).unwrap();
        let err = read_buffers_raw(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ExportError::BadMagic));
    }

    #[test]
    fn test_rejects_truncated_file() {
        let path = temp_path("short");
        std::fs::write(&path, b"STRN").unwrap();
        let err = read_buffers_raw(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ExportError::Truncated { .. }));
    }
}
