//! Aggregate configuration for a terrain generation run.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::erosion::ErosionConfig;
use crate::noise::{NoiseLayerConfig, ResponseCurve};
use crate::scan::CollectorConfig;
use crate::terrain::ShadingConfig;
use crate::triangulate::TriangulationConfig;

/// Errors raised while loading or changing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown parameter '{0}'")]
    UnknownParam(String),
    #[error("parameter '{key}': cannot parse '{raw}'")]
    Parse { key: String, raw: String },
    #[error("parameter '{key}' = {value} is out of range [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("expected key=value, got '{0}'")]
    MalformedAssignment(String),
}

/// All tunables for the generation pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub collector: CollectorConfig,
    pub triangulation: TriangulationConfig,
    pub noise: NoiseLayerConfig,
    /// Normalized-height to noise-multiplier mapping.
    pub height_curve: ResponseCurve,
    pub erosion: ErosionConfig,
    pub shading: ShadingConfig,
}

/// Every parameter name accepted by [`TerrainConfig::set_param`].
pub const PARAM_KEYS: &[&str] = &[
    "collector.precision",
    "triangulation.min_angle_deg",
    "triangulation.steiner_passes",
    "triangulation.max_refinement_attempts",
    "triangulation.relax_factor",
    "noise.strength",
    "noise.seed",
    "noise.floor_margin",
    "noise.low_frequency",
    "noise.low_weight",
    "noise.high_frequency",
    "noise.high_weight",
    "erosion.sediment_capacity",
    "erosion.lifespan",
    "erosion.basin_margin",
    "erosion.droplets_per_vertex",
    "erosion.seed",
    "shading.snow",
    "shading.sand",
    "shading.water_level",
];

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Parse {
        key: key.to_string(),
        raw: raw.to_string(),
    })
}

fn ranged<T>(key: &str, raw: &str, min: T, max: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Copy + Into<f64>,
{
    let value: T = parse(key, raw)?;
    let as_f64: f64 = value.into();
    if as_f64.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange {
            key: key.to_string(),
            value: as_f64,
            min: min.into(),
            max: max.into(),
        });
    }
    Ok(value)
}

impl TerrainConfig {
    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and applies a single parameter.
    ///
    /// The value is validated before it is stored; on error the previous value
    /// stays in effect.
    pub fn set_param(&mut self, key: &str, raw: &str) -> Result<(), ConfigError> {
        match key {
            "collector.precision" => self.collector.precision = ranged(key, raw, 1.0e-6f32, 10.0)?,
            "triangulation.min_angle_deg" => {
                self.triangulation.min_angle_deg = ranged(key, raw, 0.0f64, 30.0)?
            }
            "triangulation.steiner_passes" => {
                self.triangulation.steiner_passes = ranged(key, raw, 0u32, 64)? as usize
            }
            "triangulation.max_refinement_attempts" => {
                self.triangulation.max_refinement_attempts = ranged(key, raw, 1u32, 16)? as usize
            }
            "triangulation.relax_factor" => {
                self.triangulation.relax_factor = ranged(key, raw, 0.0f64, 1.0)?
            }
            "noise.strength" => self.noise.strength = ranged(key, raw, 0.0f32, 100.0)?,
            "noise.seed" => self.noise.seed = parse(key, raw)?,
            "noise.floor_margin" => self.noise.floor_margin = ranged(key, raw, 0.0f32, 1.0)?,
            "noise.low_frequency" => self.noise.low.frequency = ranged(key, raw, 0.0f32, 1000.0)?,
            "noise.low_weight" => self.noise.low.weight = ranged(key, raw, 0.0f32, 10.0)?,
            "noise.high_frequency" => self.noise.high.frequency = ranged(key, raw, 0.0f32, 1000.0)?,
            "noise.high_weight" => self.noise.high.weight = ranged(key, raw, 0.0f32, 10.0)?,
            "erosion.sediment_capacity" => {
                self.erosion.sediment_capacity = ranged(key, raw, 0.0f32, 100.0)?
            }
            "erosion.lifespan" => self.erosion.lifespan = ranged(key, raw, 0u32, 100_000)?,
            "erosion.basin_margin" => self.erosion.basin_margin = ranged(key, raw, 0.0f32, 10.0)?,
            "erosion.droplets_per_vertex" => {
                self.erosion.droplets_per_vertex = ranged(key, raw, 0.0f32, 100.0)?
            }
            "erosion.seed" => self.erosion.seed = parse(key, raw)?,
            "shading.snow" => self.shading.snow = ranged(key, raw, 0.0f32, 1.0)?,
            "shading.sand" => self.shading.sand = ranged(key, raw, 0.0f32, 1.0)?,
            "shading.water_level" => self.shading.water_level = ranged(key, raw, 0.0f32, 1.0)?,
            _ => return Err(ConfigError::UnknownParam(key.to_string())),
        }
        Ok(())
    }

    /// Applies a `key=value` assignment.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<(), ConfigError> {
        let (key, raw) = assignment
            .split_once('=')
            .ok_or_else(|| ConfigError::MalformedAssignment(assignment.to_string()))?;
        self.set_param(key.trim(), raw)
    }

    /// Applies each assignment independently. Rejected ones are logged and
    /// returned; the rest still take effect.
    pub fn apply_assignments<'a, I>(&mut self, assignments: I) -> Vec<ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rejected = Vec::new();
        for assignment in assignments {
            if let Err(err) = self.apply_assignment(assignment) {
                tracing::warn!(%err, "parameter rejected, keeping previous value");
                rejected.push(err);
            }
        }
        rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TerrainConfig::default();
        assert_eq!(config.collector.precision, 0.011);
        assert_eq!(config.noise.strength, 0.18);
        assert_eq!(config.shading.snow, 0.45);
        assert_eq!(config.shading.sand, 0.31);
        assert_eq!(config.triangulation.min_angle_deg, 8.0);
        assert_eq!(config.erosion.sediment_capacity, 0.0023);
        assert_eq!(config.erosion.lifespan, 20);
    }

    #[test]
    fn test_set_param() {
        let mut config = TerrainConfig::default();
        config.set_param("noise.strength", "0.5").unwrap();
        config.set_param("erosion.lifespan", " 32 ").unwrap();
        assert_eq!(config.noise.strength, 0.5);
        assert_eq!(config.erosion.lifespan, 32);
    }

    #[test]
    fn test_rejected_param_keeps_previous_value() {
        let mut config = TerrainConfig::default();
        assert!(matches!(
            config.set_param("shading.snow", "1.7"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            config.set_param("collector.precision", "abc"),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            config.set_param("noise.strength", "NaN"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            config.set_param("bogus", "1"),
            Err(ConfigError::UnknownParam(_))
        ));
        assert_eq!(config.shading.snow, 0.45);
        assert_eq!(config.collector.precision, 0.011);
        assert_eq!(config.noise.strength, 0.18);
    }

    #[test]
    fn test_vanishing_precision_rejected() {
        let mut config = TerrainConfig::default();
        assert!(matches!(
            config.set_param("collector.precision", "1e-30"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(config.set_param("collector.precision", "0").is_err());
        assert_eq!(config.collector.precision, 0.011);
        config.set_param("collector.precision", "0.000001").unwrap();
        assert_eq!(config.collector.precision, 1.0e-6);
    }

    #[test]
    fn test_assignments_applied_individually() {
        let mut config = TerrainConfig::default();
        let rejected = config.apply_assignments(["noise.seed=7", "erosion.lifespan=-1", "shading.sand"]);
        assert_eq!(rejected.len(), 2);
        assert_eq!(config.noise.seed, 7);
        assert_eq!(config.erosion.lifespan, 20);
    }

    #[test]
    fn test_every_listed_key_is_accepted() {
        for key in PARAM_KEYS {
            let mut config = TerrainConfig::default();
            config.set_param(key, "1").unwrap_or_else(|e| panic!("{key}: {e}"));
        }
    }

    #[test]
    fn test_json_partial_config() {
        let config = TerrainConfig::from_json(
            r#"{ "noise": { "strength": 0.4 }, "erosion": { "lifespan": 5 },
                 "height_curve": { "kind": "linear" } }"#,
        )
        .unwrap();
        assert_eq!(config.noise.strength, 0.4);
        assert_eq!(config.noise.seed, 42);
        assert_eq!(config.erosion.lifespan, 5);
        assert_eq!(config.height_curve, ResponseCurve::Linear);
    }

    #[test]
    fn test_json_round_trip() {
        let config = TerrainConfig::default();
        let text = config.to_json().unwrap();
        let back = TerrainConfig::from_json(&text).unwrap();
        assert_eq!(back.shading.water_level, config.shading.water_level);
        assert_eq!(back.height_curve, config.height_curve);
    }
}
