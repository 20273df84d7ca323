//! Ground-surface vertex collection and deduplication.
//!
//! The external classification step hands over ground meshes; this module
//! concatenates them and keeps only the highest point of every cluster that
//! projects onto (nearly) the same horizontal position.

mod dedup;
pub mod io;
mod source;

pub use dedup::{deduplicate, CollectorConfig, DEFAULT_PRECISION};
pub use io::{load_ground_meshes, ScanError, ScanFormat};
pub use source::{collect_ground_vertices, GroundMesh, GroundMeshSource};
