//! Elevation bands and their noise multipliers.

/// Number of elevation bands.
pub const BAND_COUNT: usize = 20;

/// Per-band noise multiplier, lowest band first.
///
/// Rises to 1.2 in the middle of the elevation range and mirrors back down,
/// so variation concentrates at mid elevations.
pub const BAND_MULTIPLIERS: [f32; BAND_COUNT] = [
    0.02, 0.047, 0.09, 0.15, 0.24, 0.37, 0.53, 0.72, 0.95, 1.2,
    1.2, 0.95, 0.72, 0.53, 0.37, 0.24, 0.15, 0.09, 0.047, 0.02,
];

/// Band containing normalized height `t` (clamped to `[0, 1]`).
pub fn band_index(t: f32) -> usize {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    ((t * BAND_COUNT as f32) as usize).min(BAND_COUNT - 1)
}

/// Multiplier for normalized height `t`.
pub fn band_multiplier(t: f32) -> f32 {
    BAND_MULTIPLIERS[band_index(t)]
}
