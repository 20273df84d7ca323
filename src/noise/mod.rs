//! Height-banded procedural noise layered on the smoothed scan surface.
//!
//! Uses simdnoise for the coherent 2D noise samples.

mod bands;
mod coherent;
mod config;
mod curve;
mod layer;

pub use bands::{band_index, band_multiplier, BAND_COUNT, BAND_MULTIPLIERS};
pub use coherent::{sample_layered, sample_layered_batch, sample_noise_2d};
pub use config::{NoiseLayerConfig, NoiseOctave};
pub use curve::{HeightResponse, ResponseCurve};
pub use layer::{apply_noise_layer, NoiseReport};
