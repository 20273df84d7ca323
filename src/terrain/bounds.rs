//! Elevation bounds threaded explicitly between pipeline stages.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Minimum and maximum elevation (y) of a vertex buffer.
///
/// Always computed fresh from the buffer it describes; stages never carry a
/// stale value across a buffer replacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for ElevationBounds {
    fn default() -> Self {
        Self { min: 0.0, max: 0.0 }
    }
}

impl ElevationBounds {
    /// Computes the bounds of `vertices`. An empty buffer yields `(0, 0)`.
    pub fn from_vertices(vertices: &[Vec3]) -> Self {
        if vertices.is_empty() {
            return Self::default();
        }

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for v in vertices {
            min = min.min(v.y);
            max = max.max(v.y);
        }

        Self { min, max }
    }

    /// Height span covered by the bounds.
    pub fn range(&self) -> f32 {
        self.max - self.min
    }

    /// Maps `height` into `[0, 1]` relative to the bounds.
    ///
    /// A flat buffer (zero range) maps everything to 0.
    pub fn normalize(&self, height: f32) -> f32 {
        let range = self.range();
        if range <= f32::EPSILON {
            return 0.0;
        }
        ((height - self.min) / range).clamp(0.0, 1.0)
    }

    /// Height at `fraction` of the way from `min` to `max`.
    pub fn height_at(&self, fraction: f32) -> f32 {
        self.min + fraction * self.range()
    }
}
