//! Loading ground meshes from scan files.
//!
//! Two text formats are understood: Wavefront OBJ, where every `o` or `g`
//! statement starts a new ground mesh and only `v` lines are read, and plain
//! XYZ point lists with one `x y z` triple per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::Vec3;
use thiserror::Error;

use super::source::GroundMesh;

/// Errors that can occur while reading scan files.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("unsupported scan file extension: {0}")]
    UnsupportedFormat(String),
}

/// Supported scan file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFormat {
    Obj,
    Xyz,
}

impl ScanFormat {
    /// Picks a format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "obj" => Ok(Self::Obj),
            "xyz" | "txt" | "pts" => Ok(Self::Xyz),
            _ => Err(ScanError::UnsupportedFormat(ext)),
        }
    }
}

/// Loads ground meshes from `path`, choosing the parser by extension.
pub fn load_ground_meshes(path: &Path) -> Result<Vec<GroundMesh>, ScanError> {
    let format = ScanFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);
    let meshes = match format {
        ScanFormat::Obj => parse_obj(reader)?,
        ScanFormat::Xyz => parse_xyz(reader)?,
    };

    tracing::info!(
        path = %path.display(),
        meshes = meshes.len(),
        vertices = meshes.iter().map(GroundMesh::vertex_count).sum::<usize>(),
        "loaded ground meshes"
    );
    Ok(meshes)
}

fn parse_triple<'a>(mut fields: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3, ScanError> {
    let mut coords = [0.0f32; 3];
    for c in &mut coords {
        let field = fields.next().ok_or_else(|| ScanError::Parse {
            line,
            message: "expected three coordinates".to_string(),
        })?;
        *c = field.parse().map_err(|_| ScanError::Parse {
            line,
            message: format!("invalid coordinate '{field}'"),
        })?;
    }
    Ok(Vec3::from_array(coords))
}

/// Parses OBJ vertex data. Objects and groups become separate meshes.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<Vec<GroundMesh>, ScanError> {
    let mut meshes = Vec::new();
    let mut current = GroundMesh::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("v") => current.vertices.push(parse_triple(fields, i + 1)?),
            Some("o") | Some("g") => {
                if !current.vertices.is_empty() {
                    meshes.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    if !current.vertices.is_empty() {
        meshes.push(current);
    }
    Ok(meshes)
}

/// Parses an XYZ point list into a single mesh. `#` starts a comment.
pub fn parse_xyz<R: BufRead>(reader: R) -> Result<Vec<GroundMesh>, ScanError> {
    let mut mesh = GroundMesh::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }
        let fields = content.split(|c: char| c.is_whitespace() || c == ',').filter(|f| !f.is_empty());
        mesh.vertices.push(parse_triple(fields, i + 1)?);
    }

    if mesh.vertices.is_empty() {
        return Ok(Vec::new());
    }
    Ok(vec![mesh])
}
