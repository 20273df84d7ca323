//! Triangulation configuration.

use serde::{Deserialize, Serialize};

/// Parameters for the surface triangulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TriangulationConfig {
    /// Minimum interior angle (degrees) refinement tries to reach.
    pub min_angle_deg: f64,
    /// Relaxation sweeps used to synthesize Steiner point elevations.
    pub steiner_passes: usize,
    /// Refinement attempts before the run is abandoned.
    pub max_refinement_attempts: usize,
    /// Angle limit multiplier applied after each incomplete refinement.
    pub relax_factor: f64,
    /// Cap on inserted points, as a multiple of the input point count.
    pub max_additional_vertices_factor: f64,
}

impl Default for TriangulationConfig {
    fn default() -> Self {
        Self {
            min_angle_deg: 8.0,
            steiner_passes: 2,
            max_refinement_attempts: 3,
            relax_factor: 0.5,
            max_additional_vertices_factor: 10.0,
        }
    }
}

impl TriangulationConfig {
    /// Angle limit used on the given zero-based attempt.
    pub fn angle_for_attempt(&self, attempt: usize) -> f64 {
        self.min_angle_deg * self.relax_factor.powi(attempt as i32)
    }

    /// Maximum number of points refinement may add for `input_points`.
    pub fn max_additional_vertices(&self, input_points: usize) -> usize {
        (input_points as f64 * self.max_additional_vertices_factor).ceil() as usize
    }
}
