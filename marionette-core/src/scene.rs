//! The per-frame driver: input, animation update and draw-call emission
use log::{debug, info};
use nalgebra::{Matrix4, Vector3};

use crate::animation::{AnimationController, AnimationMode, AnimationParams};
use crate::config::Config;
use crate::geometry::Primitive;
use crate::input::{Input, Key};
use crate::light::{Light, LightUniforms};
use crate::material::Material;
use crate::pose::PoseEvaluator;
use crate::projection::Camera;
use crate::skeleton::Skeleton;
use crate::transform::{Transform, TransformStack};

/// Radius of the marker drawn at the light position
const LIGHT_MARKER_SCALE: f32 = 0.1;

/// Everything a renderer needs to draw one primitive
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub mvp: Matrix4<f32>,
    pub model_view: Matrix4<f32>,
    /// Inverse transpose of `model_view`, present for lit draws
    pub normal_matrix: Option<Matrix4<f32>>,
    /// `None` draws unlit
    pub material: Option<Material>,
}

impl DrawCall {
    pub fn unlit(
        primitive: Primitive,
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Self {
        Self {
            primitive,
            mvp: Transform::mvp_matrix(model, view, projection),
            model_view: view * model,
            normal_matrix: None,
            material: None,
        }
    }

    pub fn lit(
        primitive: Primitive,
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
        material: Material,
    ) -> Self {
        let model_view = view * model;
        Self {
            primitive,
            mvp: Transform::mvp_matrix(model, view, projection),
            model_view,
            // None when a scale has collapsed to zero
            normal_matrix: model_view.try_inverse().map(|inverse| inverse.transpose()),
            material: Some(material),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.material.is_some()
    }
}

/// Rasterizer switches the scene hands to its renderer every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    pub cull_back_faces: bool,
    /// Draw triangle edges only
    pub wireframe: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            cull_back_faces: true,
            wireframe: false,
        }
    }
}

/// The drawing collaborator
pub trait Renderer {
    /// Called before `begin_frame`. Renderers without these switches ignore it.
    fn set_render_state(&mut self, _state: RenderState) {}

    /// Called once per frame before any draw, with the camera-space light
    fn begin_frame(&mut self, light: &LightUniforms);

    fn draw(&mut self, call: &DrawCall);

    fn end_frame(&mut self) {}
}

/// Owns the matrix stacks, camera, light and animation state
#[derive(Debug, Clone)]
pub struct Scene {
    model: TransformStack,
    view: TransformStack,
    projection: TransformStack,
    camera: Camera,
    light: Light,
    light_speed: f32,
    render_state: RenderState,
    controller: AnimationController,
    skeleton: Skeleton,
}

impl Scene {
    pub fn new(config: &Config, width: u32, height: u32) -> Self {
        let controller = AnimationController::new(config.animation.initial_mode)
            .with_max_dt(config.animation.max_dt);
        info!(
            "Scene {}x{} starting in {} mode",
            width, height, config.animation.initial_mode
        );
        Self {
            model: TransformStack::new(),
            view: TransformStack::new(),
            projection: TransformStack::new(),
            camera: Camera::from_config(&config.camera, width, height),
            light: config.light.to_light(),
            light_speed: config.light.move_speed,
            render_state: RenderState::default(),
            controller,
            skeleton: Skeleton::puppet(),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        debug!("Viewport {}x{}", width, height);
        self.camera.set_viewport(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn render_state(&self) -> RenderState {
        self.render_state
    }

    pub fn set_render_state(&mut self, state: RenderState) {
        self.render_state = state;
    }

    pub fn mode(&self) -> AnimationMode {
        self.controller.mode()
    }

    pub fn params(&self) -> &AnimationParams {
        self.controller.params()
    }

    pub fn model_stack(&self) -> &TransformStack {
        &self.model
    }

    pub fn select_mode(&mut self, mode: AnimationMode) {
        self.controller.select_mode(mode);
    }

    /// Apply one frame of input.
    ///
    /// Mode, light, projection and rasterizer toggles react to the first
    /// frame of a press; light movement and camera orbit act for as long as
    /// the key is held.
    pub fn handle_input(&mut self, dt: f32, input: &dyn Input) {
        const MODE_KEYS: [(char, AnimationMode); 6] = [
            ('1', AnimationMode::Idle),
            ('2', AnimationMode::Waving),
            ('3', AnimationMode::Swimming),
            ('4', AnimationMode::Somersault),
            ('5', AnimationMode::ComboAttack),
            ('r', AnimationMode::Default),
        ];
        for (c, mode) in MODE_KEYS {
            if input.is_key_pressed(Key::char(c)) {
                self.select_mode(mode);
            }
        }

        if input.is_key_pressed(Key::char('0')) {
            self.light.toggle_power();
        }
        if input.is_key_pressed(Key::Tab) {
            self.light.cycle_kind();
        }
        if input.is_key_pressed(Key::char('v')) {
            self.camera.toggle_projection();
            info!("Projection {:?}", self.camera.mode);
        }
        if input.is_key_pressed(Key::char('c')) {
            self.render_state.cull_back_faces = !self.render_state.cull_back_faces;
            info!("Back-face culling {}", if self.render_state.cull_back_faces { "on" } else { "off" });
        }
        if input.is_key_pressed(Key::char('f')) {
            self.render_state.wireframe = !self.render_state.wireframe;
            info!("Polygon mode {}", if self.render_state.wireframe { "wireframe" } else { "fill" });
        }

        const LIGHT_KEYS: [(char, [f32; 3]); 6] = [
            ('i', [0.0, 0.0, -1.0]),
            ('k', [0.0, 0.0, 1.0]),
            ('j', [-1.0, 0.0, 0.0]),
            ('l', [1.0, 0.0, 0.0]),
            ('o', [0.0, -1.0, 0.0]),
            ('p', [0.0, 1.0, 0.0]),
        ];
        let step = self.light_speed * dt;
        for (c, direction) in LIGHT_KEYS {
            if input.is_key_down(Key::char(c)) {
                self.light.translate(Vector3::from(direction) * step);
            }
        }

        self.camera.update(dt, input);
    }

    /// Advance the animation by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.controller.update(dt);
    }

    /// Emit the frame: reference axes, the puppet, then the light marker
    pub fn render(&mut self, renderer: &mut dyn Renderer) {
        let eye = self.camera.position();
        let target = self.camera.target;
        let up = self.camera.up;
        self.view.load_identity();
        self.view.look_at(eye.x, eye.y, eye.z, target.x, target.y, target.z, up.x, up.y, up.z);
        self.projection.load_matrix(self.camera.projection_matrix());
        self.model.load_identity();

        let view = *self.view.top();
        let projection = *self.projection.top();

        renderer.set_render_state(self.render_state);
        renderer.begin_frame(&self.light.uniforms(&view));

        renderer.draw(&DrawCall::unlit(Primitive::Axes, self.model.top(), &view, &projection));

        let evaluator = PoseEvaluator::new(&self.skeleton);
        evaluator.evaluate(
            &mut self.model,
            self.controller.mode(),
            self.controller.params(),
            |instance| {
                renderer.draw(&DrawCall::lit(
                    instance.primitive,
                    &instance.model,
                    &view,
                    &projection,
                    instance.material,
                ));
            },
        );

        {
            let position = self.light.position;
            let mut marker = self.model.push();
            marker.translate(position.x, position.y, position.z);
            marker.scale(LIGHT_MARKER_SCALE, LIGHT_MARKER_SCALE, LIGHT_MARKER_SCALE);
            renderer.draw(&DrawCall::unlit(Primitive::Sphere, marker.top(), &view, &projection));
        }

        renderer.end_frame();
        debug_assert_eq!(self.model.depth(), 1);
    }
}
