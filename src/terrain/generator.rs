//! Top-level entry point: ground meshes in, terrain mesh out.

use crate::config::TerrainConfig;
use crate::error::Result;
use crate::noise::HeightResponse;
use crate::pipeline::{Pipeline, PipelineError};
use crate::scan::{collect_ground_vertices, GroundMeshSource};

use super::buffers::TerrainBuffers;
use super::mesh::TerrainMesh;

/// Runs the full pipeline and owns the most recent result.
#[derive(Debug, Default)]
pub struct TerrainGenerator {
    pub config: TerrainConfig,
    mesh: Option<TerrainMesh>,
}

impl TerrainGenerator {
    pub fn new(config: TerrainConfig) -> Self {
        Self { config, mesh: None }
    }

    /// Builds terrain from every ground mesh the source reports.
    ///
    /// Returns `Ok(None)` when the source has no usable ground vertices; that
    /// is logged as a warning rather than treated as an error. Any previous
    /// mesh is discarded before the run starts.
    pub fn generate<S, C>(&mut self, source: &S, curve: C) -> Result<Option<&TerrainMesh>>
    where
        S: GroundMeshSource + ?Sized,
        C: HeightResponse + Send + Sync + 'static,
    {
        self.generate_with_callbacks(source, curve, |_, _, _| {}, |_, _, _| {})
    }

    /// [`generate`](Self::generate) with per-stage progress callbacks, as in
    /// [`Pipeline::run_with_callbacks`].
    pub fn generate_with_callbacks<S, C, F1, F2>(
        &mut self,
        source: &S,
        curve: C,
        on_stage_start: F1,
        on_stage_complete: F2,
    ) -> Result<Option<&TerrainMesh>>
    where
        S: GroundMeshSource + ?Sized,
        C: HeightResponse + Send + Sync + 'static,
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        self.mesh = None;

        let points = collect_ground_vertices(source);
        if points.is_empty() {
            tracing::warn!("no ground surface detected");
            return Ok(None);
        }

        let mut buffers = TerrainBuffers::from_points(points);
        let pipeline = Pipeline::terrain(self.config.clone(), curve);
        match pipeline.run_with_callbacks(&mut buffers, on_stage_start, on_stage_complete) {
            Ok(()) => {}
            Err(PipelineError::NoGroundSurface) => {
                tracing::warn!("no ground surface detected");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }

        let mesh = TerrainMesh::assemble(buffers, self.config.shading.clone())?;
        Ok(Some(&*self.mesh.insert(mesh)))
    }

    /// [`generate`](Self::generate) with the configured height curve.
    pub fn generate_configured<S>(&mut self, source: &S) -> Result<Option<&TerrainMesh>>
    where
        S: GroundMeshSource + ?Sized,
    {
        let curve = self.config.height_curve.clone();
        self.generate(source, curve)
    }

    pub fn mesh(&self) -> Option<&TerrainMesh> {
        self.mesh.as_ref()
    }

    /// Takes ownership of the last mesh, leaving the generator empty.
    pub fn take_mesh(&mut self) -> Option<TerrainMesh> {
        self.mesh.take()
    }

    /// Drops the current mesh and its bounds. The next `generate` starts
    /// from nothing.
    pub fn reset(&mut self) {
        self.mesh = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TerrainError;
    use crate::scan::GroundMesh;
    use crate::triangulate::TriangulationError;
    use glam::Vec3;

    fn hill() -> Vec<GroundMesh> {
        let mut near = Vec::new();
        let mut far = Vec::new();
        for i in 0..8 {
            for j in 0..8 {
                let x = i as f32 * 0.5;
                let z = j as f32 * 0.5;
                let y = 2.0 - ((x - 1.75).powi(2) + (z - 1.75).powi(2)) * 0.2;
                let v = Vec3::new(x, y, z);
                if i < 4 {
                    near.push(v);
                } else {
                    far.push(v);
                }
            }
        }
        // Duplicate scan of one row.
        near.extend((0..8).map(|j| Vec3::new(0.002, 0.5, j as f32 * 0.5 + 0.002)));
        vec![GroundMesh::new(near), GroundMesh::new(far)]
    }

    #[test]
    fn test_generate_produces_valid_mesh() {
        let mut generator = TerrainGenerator::default();
        let mesh = generator.generate_configured(&hill()).unwrap().unwrap();

        assert!(mesh.triangle_count() > 0);
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
        let bounds = mesh.bounds();
        assert!(bounds.min <= bounds.max);
        assert!(generator.mesh().is_some());
    }

    #[test]
    fn test_generate_is_deterministic() {
        let mut a = TerrainGenerator::default();
        let mut b = TerrainGenerator::default();
        let va = a.generate_configured(&hill()).unwrap().unwrap().vertices().to_vec();
        let vb = b.generate_configured(&hill()).unwrap().unwrap().vertices().to_vec();
        assert_eq!(va, vb);
    }

    #[test]
    fn test_empty_source_is_not_an_error() {
        let mut generator = TerrainGenerator::default();
        let empty: Vec<GroundMesh> = vec![GroundMesh::new(Vec::new())];
        assert!(generator.generate(&empty, |_t: f32| 1.0).unwrap().is_none());
        assert!(generator.mesh().is_none());
    }

    #[test]
    fn test_non_finite_only_source_is_not_an_error() {
        let mut generator = TerrainGenerator::default();
        let source = vec![GroundMesh::new(vec![Vec3::new(f32::NAN, 0.0, 0.0)])];
        assert!(generator.generate_configured(&source).unwrap().is_none());
    }

    #[test]
    fn test_non_finite_only_source_stops_after_collection() {
        let mut generator = TerrainGenerator::default();
        let source = vec![GroundMesh::new(vec![
            Vec3::new(f32::NAN, 0.0, 0.0),
            Vec3::new(0.0, f32::INFINITY, 1.0),
        ])];
        let mut started = Vec::new();
        let mut completed = 0;

        let result = generator
            .generate_with_callbacks(
                &source,
                |_t: f32| 1.0,
                |name, _, _| started.push(name.to_string()),
                |_, _, _| completed += 1,
            )
            .unwrap();

        assert!(result.is_none());
        assert_eq!(started, vec!["Vertex Collection".to_string()]);
        assert_eq!(completed, 0);
    }

    #[test]
    fn test_too_few_points_is_an_error() {
        let mut generator = TerrainGenerator::default();
        let source = vec![GroundMesh::new(vec![Vec3::ZERO, Vec3::new(0.001, 1.0, 0.001)])];
        let err = generator.generate_configured(&source).unwrap_err();
        assert!(matches!(
            err,
            TerrainError::Pipeline(PipelineError::Triangulation(TriangulationError::TooFewPoints(1)))
        ));
    }

    #[test]
    fn test_reset_discards_mesh() {
        let mut generator = TerrainGenerator::default();
        generator.generate_configured(&hill()).unwrap();
        generator.reset();
        assert!(generator.mesh().is_none());
    }
}
