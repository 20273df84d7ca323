//! Scanned-surface to stylized terrain generator.
//!
//! This crate turns the ground-surface vertices of a 3D scan into a single
//! continuous terrain mesh: deduplicate the points, triangulate them with a
//! refined constrained Delaunay triangulation, remove cliffs, add
//! height-banded coherent noise, run droplet erosion and assemble the result.

pub mod config;
pub mod error;
pub mod erosion;
pub mod export;
pub mod noise;
pub mod pipeline;
pub mod scan;
pub mod smoothing;
pub mod terrain;
pub mod triangulate;

pub use config::TerrainConfig;
pub use error::{Result, TerrainError};
pub use erosion::ErosionConfig;
pub use noise::{HeightResponse, NoiseLayerConfig, ResponseCurve};
pub use pipeline::{GenerationStage, Pipeline, PipelineError, StageId};
pub use scan::{CollectorConfig, GroundMesh, GroundMeshSource};
pub use terrain::{ElevationBounds, ShadingConfig, TerrainBuffers, TerrainGenerator, TerrainMesh};
pub use triangulate::TriangulationConfig;
