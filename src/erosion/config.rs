//! Erosion configuration.

use serde::{Deserialize, Serialize};

/// Parameters for droplet erosion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionConfig {
    /// Maximum sediment a droplet can carry.
    pub sediment_capacity: f32,
    /// Steps a droplet lives before it drops everything it carries.
    pub lifespan: u32,
    /// Extra fraction deposited on top of a basin's depth to fill it.
    pub basin_margin: f32,
    /// Denominator offset for the per-step deposit: `sediment / (lifespan + deposit_bias)`.
    pub deposit_bias: f32,
    /// Denominator offset for settling: `sediment / (lifespan + evaporation_bias)`.
    pub evaporation_bias: f32,
    /// Droplets simulated per mesh vertex.
    pub droplets_per_vertex: f32,
    /// Random seed for droplet start positions.
    pub seed: u64,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            sediment_capacity: 0.0023,
            lifespan: 20,
            basin_margin: 0.1,
            deposit_bias: 5.0,
            evaporation_bias: 1.0,
            droplets_per_vertex: 1.0,
            seed: 42,
        }
    }
}

impl ErosionConfig {
    /// Number of droplets to run on a mesh with `vertex_count` vertices.
    pub fn droplet_count(&self, vertex_count: usize) -> usize {
        (vertex_count as f64 * self.droplets_per_vertex.max(0.0) as f64).round() as usize
    }
}
