//! Noise layer configuration.

use serde::{Deserialize, Serialize};

/// One coherent noise sample: spatial frequency and blend weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseOctave {
    /// Horizontal frequency (cycles per world unit).
    pub frequency: f32,
    /// Weight of this sample in the blended value.
    pub weight: f32,
}

/// Parameters for the noise layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseLayerConfig {
    /// Global noise strength modifier.
    pub strength: f32,
    /// Random seed for reproducible noise.
    pub seed: i32,
    /// Low-frequency, dominant sample.
    pub low: NoiseOctave,
    /// High-frequency fine detail.
    pub high: NoiseOctave,
    /// Extra amount subtracted after the pass so the terrain never floats.
    pub floor_margin: f32,
}

impl Default for NoiseLayerConfig {
    fn default() -> Self {
        Self {
            strength: 0.18,
            seed: 42,
            low: NoiseOctave {
                frequency: 0.35,
                weight: 0.8,
            },
            high: NoiseOctave {
                frequency: 2.7,
                weight: 0.2,
            },
            floor_margin: 0.001,
        }
    }
}

impl NoiseLayerConfig {
    /// Creates a configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Maps a 64-bit seed onto the 32-bit seed simdnoise takes.
    ///
    /// The high half is folded into the low half, so seeds below `2^31` map
    /// to themselves and seeds differing only in the high bits stay distinct.
    pub fn seed_from_u64(seed: u64) -> i32 {
        (seed ^ (seed >> 32)) as u32 as i32
    }
}
