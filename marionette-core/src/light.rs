//! Scene light and the per-frame uniforms derived from it
use log::info;
use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Light model used by the shading stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

impl LightKind {
    /// Point -> directional -> spot -> point
    pub fn next(self) -> Self {
        match self {
            LightKind::Point => LightKind::Directional,
            LightKind::Directional => LightKind::Spot,
            LightKind::Spot => LightKind::Point,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    /// World position, or the direction towards the light for directional lights
    pub position: Vector3<f32>,
    pub color: Vector3<f32>,
    pub power: f32,
    pub k_c: f32,
    pub k_l: f32,
    pub k_q: f32,
    pub spot_direction: Vector3<f32>,
    /// Outer cone half-angle in degrees
    pub cutoff: f32,
    /// Inner cone half-angle in degrees
    pub inner: f32,
    pub exponent: f32,
}

/// Power used when the light is dimmed
pub const DIM_POWER: f32 = 0.1;

impl Light {
    /// Toggle between full power and [`DIM_POWER`]
    pub fn toggle_power(&mut self) {
        self.power = if self.power <= DIM_POWER { 1.0 } else { DIM_POWER };
        info!("Light power set to {}", self.power);
    }

    pub fn cycle_kind(&mut self) {
        self.kind = self.kind.next();
        info!("Light kind set to {:?}", self.kind);
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.position += delta;
    }

    /// Compute the uniforms for this light as seen through `view`.
    ///
    /// Directional lights transform their direction with w = 0, point and spot
    /// lights their position with w = 1.
    pub fn uniforms(&self, view: &Matrix4<f32>) -> LightUniforms {
        let w = match self.kind {
            LightKind::Directional => 0.0,
            LightKind::Point | LightKind::Spot => 1.0,
        };
        let position = view * Vector4::new(self.position.x, self.position.y, self.position.z, w);
        let spot_direction = match self.kind {
            LightKind::Spot => {
                let d = self.spot_direction;
                Some((view * Vector4::new(d.x, d.y, d.z, 0.0)).xyz())
            }
            LightKind::Point | LightKind::Directional => None,
        };

        LightUniforms {
            kind: self.kind,
            position_cameraspace: position.xyz(),
            color: self.color,
            power: self.power,
            k_c: self.k_c,
            k_l: self.k_l,
            k_q: self.k_q,
            spot_direction_cameraspace: spot_direction,
            cos_cutoff: self.cutoff.to_radians().cos(),
            cos_inner: self.inner.to_radians().cos(),
            exponent: self.exponent,
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            position: Vector3::new(0.0, 5.0, 0.0),
            color: Vector3::new(1.0, 1.0, 1.0),
            power: 1.0,
            k_c: 1.0,
            k_l: 0.01,
            k_q: 0.001,
            spot_direction: Vector3::new(0.0, 1.0, 0.0),
            cutoff: 45.0,
            inner: 30.0,
            exponent: 3.0,
        }
    }
}

/// Light parameters in camera space, uploaded once per frame
#[derive(Debug, Clone, PartialEq)]
pub struct LightUniforms {
    pub kind: LightKind,
    pub position_cameraspace: Vector3<f32>,
    pub color: Vector3<f32>,
    pub power: f32,
    pub k_c: f32,
    pub k_l: f32,
    pub k_q: f32,
    pub spot_direction_cameraspace: Option<Vector3<f32>>,
    pub cos_cutoff: f32,
    pub cos_inner: f32,
    pub exponent: f32,
}

impl LightUniforms {
    /// Distance attenuation factor at `distance`
    pub fn attenuation(&self, distance: f32) -> f32 {
        match self.kind {
            LightKind::Directional => 1.0,
            LightKind::Point | LightKind::Spot => {
                1.0 / (self.k_c + self.k_l * distance + self.k_q * distance * distance).max(f32::EPSILON)
            }
        }
    }
}
