//! Sequential droplet erosion over a whole mesh.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::terrain::{MeshAdjacency, TerrainBuffers};

use super::config::ErosionConfig;
use super::droplet::{Droplet, StepOutcome};

/// Totals from one erosion run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErosionReport {
    pub droplets: usize,
    pub steps: usize,
    /// Total material removed from the terrain by droplets.
    pub eroded: f64,
    /// Total material laid back down.
    pub deposited: f64,
}

/// Runs `config.droplet_count(vertex_count)` droplets one after another.
///
/// Start vertices are drawn uniformly from a `ChaCha8Rng` seeded with
/// `config.seed`, so a run is reproducible. Every droplet ends having
/// deposited everything it picked up, hence `eroded == deposited` up to
/// rounding and the terrain's total elevation is preserved.
pub fn simulate_erosion(buffers: &mut TerrainBuffers, config: &ErosionConfig) -> ErosionReport {
    let vertex_count = buffers.vertex_count();
    let mut report = ErosionReport::default();
    if vertex_count == 0 {
        return report;
    }

    let adjacency = MeshAdjacency::from_indices(vertex_count, &buffers.indices);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let droplets = config.droplet_count(vertex_count);

    for _ in 0..droplets {
        let start = rng.random_range(0..vertex_count);
        let mut droplet = Droplet::new(start, config.lifespan);

        loop {
            let result = droplet.step(&mut buffers.vertices, &adjacency, config);
            report.steps += 1;
            report.eroded += result.eroded as f64;
            report.deposited += result.deposited as f64;
            if result.outcome == StepOutcome::Terminated {
                break;
            }
        }
        report.droplets += 1;
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Regular grid of two-triangle cells with a ridge along x = 0.
    fn ridge(n: u32) -> TerrainBuffers {
        let mut vertices = Vec::new();
        for i in 0..n {
            for j in 0..n {
                let x = i as f32;
                let z = j as f32;
                vertices.push(Vec3::new(x, 4.0 - x * 0.5 + (j % 3) as f32 * 0.05, z));
            }
        }
        let mut indices = Vec::new();
        for i in 0..n - 1 {
            for j in 0..n - 1 {
                let a = i * n + j;
                let b = a + 1;
                let c = a + n;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }
        TerrainBuffers::new(vertices, indices)
    }

    #[test]
    fn test_erosion_is_reproducible() {
        let config = ErosionConfig {
            sediment_capacity: 0.05,
            ..Default::default()
        };
        let mut a = ridge(8);
        let mut b = ridge(8);
        let ra = simulate_erosion(&mut a, &config);
        let rb = simulate_erosion(&mut b, &config);
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(ra, rb);
    }

    #[test]
    fn test_erosion_conserves_total_elevation() {
        let config = ErosionConfig {
            sediment_capacity: 0.05,
            ..Default::default()
        };
        let mut buffers = ridge(10);
        let before = buffers.total_elevation();

        let report = simulate_erosion(&mut buffers, &config);

        assert_eq!(report.droplets, 100);
        assert!(report.steps >= report.droplets);
        assert!(report.eroded > 0.0);
        assert!((report.eroded - report.deposited).abs() < 1e-3);
        assert!((buffers.total_elevation() - before).abs() < 1e-2);
    }

    #[test]
    fn test_erosion_changes_slope() {
        let config = ErosionConfig {
            sediment_capacity: 0.05,
            ..Default::default()
        };
        let mut buffers = ridge(8);
        let original = buffers.vertices.clone();
        simulate_erosion(&mut buffers, &config);
        assert_ne!(buffers.vertices, original);
        assert!(buffers.vertices.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_flat_mesh_is_untouched() {
        let mut buffers = ridge(5);
        for v in &mut buffers.vertices {
            v.y = 1.0;
        }
        let report = simulate_erosion(&mut buffers, &ErosionConfig::default());
        assert_eq!(report.steps, report.droplets);
        assert!(buffers.vertices.iter().all(|v| v.y == 1.0));
    }

    #[test]
    fn test_empty_mesh() {
        let mut buffers = TerrainBuffers::default();
        assert_eq!(simulate_erosion(&mut buffers, &ErosionConfig::default()), ErosionReport::default());
    }
}
