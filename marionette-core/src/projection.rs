//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::input::{Input, Key};

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
        }
    }
}

/// Altitude is kept short of the poles so the up vector stays valid
const MAX_ALTITUDE: f32 = 89.0;
const MIN_DISTANCE: f32 = 1.0;

/// Orbit camera circling a target (altitude/azimuth/distance)
#[derive(Debug, Clone)]
pub struct Camera {
    /// Degrees above the xz plane
    pub altitude: f32,
    /// Degrees around the y axis, measured from +x towards +z
    pub azimuth: f32,
    pub distance: f32,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
    pub orbit_speed: f32,
    pub zoom_speed: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_config(&CameraConfig::default(), width, height)
    }

    pub fn from_config(config: &CameraConfig, width: u32, height: u32) -> Self {
        let mut camera = Self {
            altitude: config.altitude.clamp(-MAX_ALTITUDE, MAX_ALTITUDE),
            azimuth: config.azimuth,
            distance: config.distance.max(MIN_DISTANCE),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: config.fov,
            aspect: 1.0,
            near: config.near,
            far: config.far,
            mode: config.projection,
            orbit_speed: config.orbit_speed,
            zoom_speed: config.zoom_speed,
        };
        camera.set_viewport(width, height);
        camera
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// Eye position derived from the orbit angles
    pub fn position(&self) -> Point3<f32> {
        let altitude = self.altitude.to_radians();
        let azimuth = self.azimuth.to_radians();
        let offset = Vector3::new(
            altitude.cos() * azimuth.cos(),
            altitude.sin(),
            altitude.cos() * azimuth.sin(),
        ) * self.distance;
        self.target + offset
    }

    /// Orbit and zoom from level-triggered keys
    pub fn update(&mut self, dt: f32, input: &dyn Input) {
        let step = self.orbit_speed * dt;
        if input.is_key_down(Key::Up) {
            self.altitude += step;
        }
        if input.is_key_down(Key::Down) {
            self.altitude -= step;
        }
        if input.is_key_down(Key::Left) {
            self.azimuth -= step;
        }
        if input.is_key_down(Key::Right) {
            self.azimuth += step;
        }
        if input.is_key_down(Key::char('+')) || input.is_key_down(Key::char('=')) {
            self.distance -= self.zoom_speed * dt;
        }
        if input.is_key_down(Key::char('-')) {
            self.distance += self.zoom_speed * dt;
        }
        self.altitude = self.altitude.clamp(-MAX_ALTITUDE, MAX_ALTITUDE);
        self.distance = self.distance.max(MIN_DISTANCE);
    }

    pub fn toggle_projection(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov.to_radians(), self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = self.distance;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Project a model-space point through `mvp` to screen space.
///
/// Returns `(x, y, depth)` with depth in normalized device coordinates, or
/// `None` when the point is behind the eye or outside the clip volume.
pub fn project_to_screen(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * Vector4::new(point.x, point.y, point.z, 1.0);

    // Prevent division by near-zero depth values
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    // Clip test
    if !(-1.0..=1.0).contains(&depth) {
        return None;
    }

    // Convert to screen space
    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}
