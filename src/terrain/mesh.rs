//! The finished terrain mesh handed to renderers and colliders.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

use super::bounds::ElevationBounds;
use super::buffers::TerrainBuffers;

/// Elevation fractions used by downstream coloring and the water plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadingConfig {
    /// Fraction of the elevation range above which terrain reads as snow.
    pub snow: f32,
    /// Fraction of the elevation range below which terrain reads as sand.
    pub sand: f32,
    /// Fraction of the elevation range at which the water plane sits.
    pub water_level: f32,
}

impl Default for ShadingConfig {
    fn default() -> Self {
        Self {
            snow: 0.45,
            sand: 0.31,
            water_level: 0.3,
        }
    }
}

/// Absolute heights for the shading bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadingThresholds {
    pub snow: f32,
    pub sand: f32,
    pub water: f32,
}

/// Immutable terrain geometry plus its elevation bounds.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    vertices: Vec<Vec3>,
    indices: Vec<u32>,
    bounds: ElevationBounds,
    shading: ShadingConfig,
}

impl TerrainMesh {
    /// Freezes pipeline buffers into the final mesh.
    ///
    /// Bounds are recomputed from the vertices. Fails if any index is out of
    /// range.
    pub fn assemble(buffers: TerrainBuffers, shading: ShadingConfig) -> Result<Self> {
        if let Some(index) = buffers.find_invalid_index() {
            return Err(TerrainError::InvalidIndex {
                index,
                vertex_count: buffers.vertex_count(),
            });
        }

        let bounds = buffers.bounds();
        tracing::info!(
            vertices = buffers.vertex_count(),
            triangles = buffers.triangle_count(),
            min = bounds.min,
            max = bounds.max,
            "terrain mesh assembled"
        );

        Ok(Self {
            vertices: buffers.vertices,
            indices: buffers.indices,
            bounds,
            shading,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn bounds(&self) -> ElevationBounds {
        self.bounds
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Height of a flat water plane at `fraction` of the elevation range.
    pub fn water_level(&self, fraction: f32) -> f32 {
        self.bounds.height_at(fraction)
    }

    /// Water height using the configured fraction.
    pub fn default_water_level(&self) -> f32 {
        self.water_level(self.shading.water_level)
    }

    /// Absolute snow/sand/water heights for the coloring step.
    pub fn shading_thresholds(&self) -> ShadingThresholds {
        ShadingThresholds {
            snow: self.bounds.height_at(self.shading.snow),
            sand: self.bounds.height_at(self.shading.sand),
            water: self.default_water_level(),
        }
    }

    /// Area-weighted smooth vertex normals.
    pub fn vertex_normals(&self) -> Vec<Vec3> {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (self.vertices[b] - self.vertices[a]).cross(self.vertices[c] - self.vertices[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
        normals
    }

    /// Returns the raw buffers, consuming the mesh.
    pub fn into_buffers(self) -> TerrainBuffers {
        TerrainBuffers::new(self.vertices, self.indices)
    }
}
