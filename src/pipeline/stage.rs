//! Generation stage trait and pipeline orchestration.

use std::time::Instant;

use thiserror::Error;

use crate::config::TerrainConfig;
use crate::erosion::simulate_erosion;
use crate::noise::{apply_noise_layer, HeightResponse};
use crate::scan::deduplicate;
use crate::smoothing::smooth_mesh;
use crate::terrain::TerrainBuffers;
use crate::triangulate::{triangulate, TriangulationError};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Ground vertex deduplication.
    Collect,
    /// Constrained Delaunay triangulation and refinement.
    Triangulate,
    /// Cliff removal.
    Smooth,
    /// Height-banded noise.
    Noise,
    /// Droplet erosion.
    Erosion,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Collect => "collect",
            StageId::Triangulate => "triangulate",
            StageId::Smooth => "smooth",
            StageId::Noise => "noise",
            StageId::Erosion => "erosion",
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("no ground surface detected")]
    NoGroundSurface,
    #[error("triangulation failed: {0}")]
    Triangulation(#[from] TriangulationError),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the terrain buffers in place, building upon the
/// output of earlier stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage, modifying the buffers in place.
    fn execute(&self, buffers: &mut TerrainBuffers, config: &TerrainConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: TerrainConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// The standard terrain order: collect, triangulate, smooth, noise,
    /// smooth again, erode.
    pub fn terrain<C>(config: TerrainConfig, curve: C) -> Self
    where
        C: HeightResponse + Send + Sync + 'static,
    {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(CollectStage)
            .add_stage(TriangulateStage)
            .add_stage(SmoothStage)
            .add_stage(NoiseStage::with_curve(curve))
            .add_stage(SmoothStage)
            .add_stage(ErosionStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Stage identifiers in execution order.
    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    /// Executes all stages in order on the given buffers.
    pub fn run(&self, buffers: &mut TerrainBuffers) -> Result<(), PipelineError> {
        self.run_with_callbacks(buffers, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `buffers` - The buffers to transform
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        buffers: &mut TerrainBuffers,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let span = tracing::info_span!("stage", stage = stage.id().name());
            let _enter = span.enter();
            let started = Instant::now();

            stage.execute(buffers, &self.config)?;
            completed.push(stage.id());

            tracing::info!(
                elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                vertices = buffers.vertex_count(),
                triangles = buffers.triangle_count(),
                "{} complete",
                stage.name()
            );

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Deduplicates the raw ground vertices held in the buffers.
pub struct CollectStage;

impl GenerationStage for CollectStage {
    fn id(&self) -> StageId {
        StageId::Collect
    }

    fn name(&self) -> &str {
        "Vertex Collection"
    }

    fn execute(&self, buffers: &mut TerrainBuffers, config: &TerrainConfig) -> Result<(), PipelineError> {
        let kept = deduplicate(&buffers.vertices, config.collector.precision);
        if kept.is_empty() {
            return Err(PipelineError::NoGroundSurface);
        }
        tracing::debug!(input = buffers.vertex_count(), kept = kept.len(), "deduplicated ground vertices");
        *buffers = TerrainBuffers::from_points(kept);
        Ok(())
    }
}

/// Replaces the point set with a refined triangulation.
pub struct TriangulateStage;

impl GenerationStage for TriangulateStage {
    fn id(&self) -> StageId {
        StageId::Triangulate
    }

    fn name(&self) -> &str {
        "Surface Triangulation"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Collect]
    }

    fn execute(&self, buffers: &mut TerrainBuffers, config: &TerrainConfig) -> Result<(), PipelineError> {
        let (triangulated, report) = triangulate(&buffers.vertices, &config.triangulation)?;
        if report.steiner.unresolved > 0 || report.steiner.isolated > 0 {
            tracing::warn!(
                unresolved = report.steiner.unresolved,
                isolated = report.steiner.isolated,
                "synthetic points fell back to estimated elevations"
            );
        }
        tracing::debug!(
            steiner_points = report.steiner.steiner_points,
            angle_limit_deg = report.angle_limit_deg,
            attempts = report.attempts,
            "refinement finished"
        );
        *buffers = triangulated;
        Ok(())
    }
}

/// Greedy high-to-low cliff removal.
pub struct SmoothStage;

impl GenerationStage for SmoothStage {
    fn id(&self) -> StageId {
        StageId::Smooth
    }

    fn name(&self) -> &str {
        "Mesh Smoothing"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Triangulate]
    }

    fn execute(&self, buffers: &mut TerrainBuffers, _config: &TerrainConfig) -> Result<(), PipelineError> {
        let report = smooth_mesh(buffers);
        tracing::debug!(
            triangles = report.triangles_processed,
            raised = report.vertices_raised,
            "smoothing pass"
        );
        Ok(())
    }
}

/// Height-banded coherent noise.
///
/// Without an explicit curve the configuration's `height_curve` is used.
pub struct NoiseStage {
    curve: Option<Box<dyn HeightResponse + Send + Sync>>,
}

impl NoiseStage {
    /// Uses the curve from the pipeline configuration.
    pub fn configured() -> Self {
        Self { curve: None }
    }

    pub fn with_curve<C: HeightResponse + Send + Sync + 'static>(curve: C) -> Self {
        Self {
            curve: Some(Box::new(curve)),
        }
    }
}

impl GenerationStage for NoiseStage {
    fn id(&self) -> StageId {
        StageId::Noise
    }

    fn name(&self) -> &str {
        "Noise Layer"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Triangulate]
    }

    fn execute(&self, buffers: &mut TerrainBuffers, config: &TerrainConfig) -> Result<(), PipelineError> {
        let curve: &dyn HeightResponse = match &self.curve {
            Some(curve) => curve.as_ref(),
            None => &config.height_curve,
        };
        let report = apply_noise_layer(buffers, &config.noise, curve);
        tracing::debug!(
            min = report.min_displacement,
            max = report.max_displacement,
            offset = report.offset,
            "noise displacement"
        );
        Ok(())
    }
}

/// Sequential droplet erosion.
pub struct ErosionStage;

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Droplet Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Triangulate]
    }

    fn execute(&self, buffers: &mut TerrainBuffers, config: &TerrainConfig) -> Result<(), PipelineError> {
        let report = simulate_erosion(buffers, &config.erosion);
        tracing::debug!(
            droplets = report.droplets,
            steps = report.steps,
            eroded = report.eroded,
            deposited = report.deposited,
            "erosion finished"
        );
        Ok(())
    }
}
