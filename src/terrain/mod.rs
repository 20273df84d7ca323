//! Core terrain containers and the final mesh.

mod adjacency;
mod bounds;
mod buffers;
mod generator;
mod mesh;

pub use adjacency::MeshAdjacency;
pub use bounds::ElevationBounds;
pub use buffers::TerrainBuffers;
pub use generator::TerrainGenerator;
pub use mesh::{ShadingConfig, ShadingThresholds, TerrainMesh};
