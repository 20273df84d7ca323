//! Applying banded noise to the terrain vertices.

use crate::terrain::TerrainBuffers;

use super::bands::band_multiplier;
use super::coherent::sample_layered_batch;
use super::config::NoiseLayerConfig;
use super::curve::HeightResponse;

/// Statistics from one noise pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseReport {
    pub min_displacement: f32,
    pub max_displacement: f32,
    /// Amount subtracted from every vertex after displacement.
    pub offset: f32,
}

/// Displaces every vertex elevation by height-banded coherent noise.
///
/// Each displacement is
/// `strength * curve(t) * band(t) * blended_noise(x, z)` where `t` is the
/// vertex's normalized elevation within bounds recomputed at entry. Once all
/// vertices are displaced, `min_displacement + floor_margin` is subtracted
/// from every vertex, so the lowest point of the terrain ends up no more
/// than `floor_margin` below where it started.
pub fn apply_noise_layer(
    buffers: &mut TerrainBuffers,
    config: &NoiseLayerConfig,
    curve: &dyn HeightResponse,
) -> NoiseReport {
    if buffers.vertices.is_empty() {
        return NoiseReport::default();
    }

    let bounds = buffers.bounds();
    let positions: Vec<(f32, f32)> = buffers.vertices.iter().map(|v| (v.x, v.z)).collect();
    let samples = sample_layered_batch(&positions, config);

    let mut min_displacement = f32::MAX;
    let mut max_displacement = f32::MIN;
    for (v, noise) in buffers.vertices.iter_mut().zip(samples) {
        let t = bounds.normalize(v.y);
        let displacement = config.strength * curve.response(t) * band_multiplier(t) * noise;
        v.y += displacement;
        min_displacement = min_displacement.min(displacement);
        max_displacement = max_displacement.max(displacement);
    }

    let offset = min_displacement + config.floor_margin;
    for v in &mut buffers.vertices {
        v.y -= offset;
    }

    NoiseReport {
        min_displacement,
        max_displacement,
        offset,
    }
}
