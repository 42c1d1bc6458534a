//! Scene configuration (TOML)
use std::path::Path;

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::animation::AnimationMode;
use crate::error::{Error, Result};
use crate::light::{Light, LightKind};
use crate::projection::ProjectionMode;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub terminal: TerminalConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Altitude above the ground plane in degrees
    pub altitude: f32,
    /// Azimuth around the y axis in degrees
    pub azimuth: f32,
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Orbit rate in degrees per second
    pub orbit_speed: f32,
    /// Zoom rate in units per second
    pub zoom_speed: f32,
    pub projection: ProjectionMode,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            altitude: 45.0,
            azimuth: 45.0,
            distance: 10.0,
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
            orbit_speed: 45.0,
            zoom_speed: 5.0,
            projection: ProjectionMode::Perspective,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub kind: LightKind,
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub power: f32,
    pub k_c: f32,
    pub k_l: f32,
    pub k_q: f32,
    pub spot_direction: [f32; 3],
    pub cutoff: f32,
    pub inner: f32,
    pub exponent: f32,
    /// Movement rate in units per second
    pub move_speed: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = Light::default();
        Self {
            kind: light.kind,
            position: light.position.into(),
            color: light.color.into(),
            power: light.power,
            k_c: light.k_c,
            k_l: light.k_l,
            k_q: light.k_q,
            spot_direction: light.spot_direction.into(),
            cutoff: light.cutoff,
            inner: light.inner,
            exponent: light.exponent,
            move_speed: 5.0,
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> Light {
        Light {
            kind: self.kind,
            position: Vector3::from(self.position),
            color: Vector3::from(self.color),
            power: self.power,
            k_c: self.k_c,
            k_l: self.k_l,
            k_q: self.k_q,
            spot_direction: Vector3::from(self.spot_direction),
            cutoff: self.cutoff,
            inner: self.inner,
            exponent: self.exponent,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub initial_mode: AnimationMode,
    /// Upper bound applied to the frame time before integration.
    /// Unset means frame times are used as given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_dt: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub fps: u32,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self { fps: 30 }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.camera.altitude, 45.0);
        assert_eq!(config.camera.distance, 10.0);
        assert_eq!(config.camera.projection, ProjectionMode::Perspective);
        assert_eq!(config.light.kind, LightKind::Point);
        assert_eq!(config.light.position, [0.0, 5.0, 0.0]);
        assert_eq!(config.animation.initial_mode, AnimationMode::Default);
        assert!(config.animation.max_dt.is_none());
        assert_eq!(config.terminal.fps, 30);
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_deserialize_partial() {
        let toml_str = r#"
[camera]
distance = 14.0
projection = "orthographic"

[light]
kind = "spot"

[animation]
initial_mode = "combo-attack"
max_dt = 0.05
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.camera.distance, 14.0);
        assert_eq!(config.camera.altitude, 45.0); // default
        assert_eq!(config.camera.projection, ProjectionMode::Orthographic);
        assert_eq!(config.light.kind, LightKind::Spot);
        assert_eq!(config.light.power, 1.0); // default
        assert_eq!(config.animation.initial_mode, AnimationMode::ComboAttack);
        assert_eq!(config.animation.max_dt, Some(0.05));
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let mut config = Config::default();
        config.animation.initial_mode = AnimationMode::Swimming;
        config.light.kind = LightKind::Directional;
        let toml_str = toml::to_string(&config).unwrap();
        assert_eq!(Config::from_toml(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_invalid_mode_is_rejected() {
        let err = Config::from_toml("[animation]\ninitial_mode = \"moonwalk\"\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Config::load(Path::new("/nonexistent/marionette.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/marionette.toml"));
    }

    #[test]
    fn test_light_from_config() {
        let light = LightConfig::default().to_light();
        assert_eq!(light, Light::default());
    }
}
