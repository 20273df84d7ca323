//! Coherent 2D noise sampling on the horizontal plane.

use rayon::prelude::*;
use simdnoise::NoiseBuilder;

use super::config::NoiseLayerConfig;

/// Samples 2D gradient noise at `(x, z)` (already scaled by frequency).
///
/// Returns a value in approximately `[-1, 1]`.
pub fn sample_noise_2d(x: f32, z: f32, seed: i32) -> f32 {
    NoiseBuilder::fbm_2d_offset(x, 1, z, 1)
        .with_seed(seed)
        .with_freq(1.0)
        .with_octaves(1)
        .generate()
        .0[0]
}

/// Weighted blend of the low- and high-frequency samples at `(x, z)`.
///
/// The two samples use different seed offsets so their patterns do not line
/// up.
pub fn sample_layered(x: f32, z: f32, config: &NoiseLayerConfig) -> f32 {
    let low = sample_noise_2d(
        x * config.low.frequency,
        z * config.low.frequency,
        config.seed,
    );
    let high = sample_noise_2d(
        x * config.high.frequency,
        z * config.high.frequency,
        config.seed.wrapping_add(31337),
    );
    low * config.low.weight + high * config.high.weight
}

/// Samples [`sample_layered`] for a batch of horizontal positions in parallel.
pub fn sample_layered_batch(positions: &[(f32, f32)], config: &NoiseLayerConfig) -> Vec<f32> {
    positions
        .par_iter()
        .map(|&(x, z)| sample_layered(x, z, config))
        .collect()
}
