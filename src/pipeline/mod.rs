//! Pipeline module for orchestrating terrain generation stages.
//!
//! Provides a trait-based architecture for modular generation stages
//! that can be composed into a complete scan-to-terrain pipeline.

mod stage;

pub use stage::{
    CollectStage, ErosionStage, GenerationStage, NoiseStage, Pipeline, PipelineError, SmoothStage,
    StageId, TriangulateStage,
};
