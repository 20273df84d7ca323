//! Export module for saving terrain meshes to disk.
//!
//! Supports Wavefront OBJ for DCC tools and a compact binary dump of the
//! vertex and index buffers for engine imports.

mod obj;
mod raw;

use thiserror::Error;

pub use obj::{export_obj, write_obj};
pub use raw::{export_buffers_raw, read_buffers_raw, RawHeader, RAW_MAGIC, RAW_VERSION};

/// Errors that can occur during export.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a terrain buffer file")]
    BadMagic,
    #[error("unsupported buffer file version {0}")]
    UnsupportedVersion(u32),
    #[error("buffer file truncated: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },
}
