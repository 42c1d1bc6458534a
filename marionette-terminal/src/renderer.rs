//! ASCII rasterizer for terminal rendering
use std::collections::HashMap;
use std::io::Write;

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use marionette_core::{
    project_to_screen, DrawCall, LightKind, LightUniforms, Material, Mesh, Primitive, RenderState,
    Renderer, Triangle,
};
use nalgebra::{Point3, Vector3, Vector4};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Shaded color of one face
#[derive(Debug, Clone, Copy, PartialEq)]
struct Shade {
    character: char,
    color: Color,
}

/// ASCII renderer that rasterizes draw calls into terminal cells
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    meshes: HashMap<Primitive, Mesh>,
    light: Option<LightUniforms>,
    state: RenderState,
    draw_calls: usize,
    culled: usize,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            meshes: Primitive::ALL
                .into_iter()
                .map(|primitive| (primitive, primitive.build_mesh()))
                .collect(),
            light: None,
            state: RenderState::default(),
            draw_calls: 0,
            culled: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Draw calls received since the last `begin_frame`
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Triangles dropped as back faces since the last `begin_frame`
    pub fn culled_triangles(&self) -> usize {
        self.culled
    }

    pub fn render_state(&self) -> RenderState {
        self.state
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.char_buffer = vec![' '; size];
        self.color_buffer = vec![Color::Reset; size];
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Character at a cell, for inspection
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    fn render_triangle(&mut self, triangle: &Triangle, call: &DrawCall) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coords, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
            match project_to_screen(
                &call.mvp,
                &vertex.position,
                self.width as u32,
                self.height as u32,
            ) {
                Some(projected) => *coords = projected,
                None => return, // Triangle is clipped
            }
        }

        // Screen y points down, so counter-clockwise front faces have negative area
        if self.state.cull_back_faces && signed_area(&screen_coords) >= 0.0 {
            self.culled += 1;
            return;
        }

        let shade = match (&call.material, &call.normal_matrix, &self.light) {
            (Some(material), Some(normal_matrix), Some(light)) => {
                shade_lit(triangle, call, normal_matrix, material, light)
            }
            _ => shade_unlit(triangle, call.primitive),
        };

        if let Some(shade) = shade {
            self.rasterize_triangle(&screen_coords, shade);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], shade: Shade) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        if self.state.wireframe {
            self.draw_line(v0, v1, shade);
            self.draw_line(v1, v2, shade);
            self.draw_line(v2, v0, shade);
            return;
        }

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = shade.character;
                            self.color_buffer[idx] = shade.color;
                        }
                    }
                }
            }
        }
    }

    /// Depth-tested line between two projected points
    fn draw_line(&mut self, from: (f32, f32, f32), to: (f32, f32, f32), shade: Shade) {
        let steps = (to.0 - from.0).abs().max((to.1 - from.1).abs()).ceil().max(1.0);
        for i in 0..=steps as u32 {
            let t = i as f32 / steps;
            let x = (from.0 + (to.0 - from.0) * t).floor();
            let y = (from.1 + (to.1 - from.1) * t).floor();
            if x < 0.0 || y < 0.0 || x >= self.width as f32 || y >= self.height as f32 {
                continue;
            }
            let depth = from.2 + (to.2 - from.2) * t;
            let idx = y as usize * self.width + x as usize;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = shade.character;
                self.color_buffer[idx] = shade.color;
            }
        }
    }

    /// Write the frame to the terminal, starting at the cursor
    pub fn present<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn begin_frame(&mut self, light: &LightUniforms) {
        self.clear();
        self.light = Some(light.clone());
        self.draw_calls = 0;
        self.culled = 0;
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.state = state;
    }

    fn draw(&mut self, call: &DrawCall) {
        self.draw_calls += 1;
        // Temporarily take the mesh so triangles can borrow it while the
        // buffers are written.
        let Some(mesh) = self.meshes.remove(&call.primitive) else {
            return;
        };
        for triangle in &mesh.triangles {
            self.render_triangle(triangle, call);
        }
        self.meshes.insert(call.primitive, mesh);
    }
}

fn ramp_char(brightness: f32) -> char {
    let char_index = (brightness.clamp(0.0, 1.0) * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn to_rgb(color: Vector3<f32>) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    Color::Rgb {
        r: channel(color.x),
        g: channel(color.y),
        b: channel(color.z),
    }
}

/// Reference geometry: axes by direction, anything else solid white
fn shade_unlit(triangle: &Triangle, primitive: Primitive) -> Option<Shade> {
    let color = match primitive {
        Primitive::Axes => {
            let c = triangle.centroid();
            let (x, y, z) = (c.x.abs(), c.y.abs(), c.z.abs());
            if x >= y && x >= z {
                Color::Red
            } else if y >= z {
                Color::Green
            } else {
                Color::Blue
            }
        }
        _ => Color::White,
    };
    Some(Shade {
        character: '@',
        color,
    })
}

/// Flat Blinn-Phong shading of one face in camera space
fn shade_lit(
    triangle: &Triangle,
    call: &DrawCall,
    normal_matrix: &nalgebra::Matrix4<f32>,
    material: &Material,
    light: &LightUniforms,
) -> Option<Shade> {
    let normal = triangle.calculate_normal();
    let normal = (normal_matrix * Vector4::new(normal.x, normal.y, normal.z, 0.0))
        .xyz()
        .try_normalize(f32::EPSILON)?;
    let position: Point3<f32> = call.model_view.transform_point(&triangle.centroid());

    let (to_light, distance) = match light.kind {
        LightKind::Directional => (light.position_cameraspace.try_normalize(f32::EPSILON)?, 0.0),
        LightKind::Point | LightKind::Spot => {
            let offset = light.position_cameraspace - position.coords;
            let distance = offset.norm();
            (offset.try_normalize(f32::EPSILON)?, distance)
        }
    };

    let spot = match (light.kind, light.spot_direction_cameraspace) {
        (LightKind::Spot, Some(direction)) => {
            let direction = direction.try_normalize(f32::EPSILON)?;
            let cos_angle = (-to_light).dot(&direction);
            if cos_angle < light.cos_cutoff {
                0.0
            } else if cos_angle >= light.cos_inner {
                cos_angle.powf(light.exponent)
            } else {
                let edge = (cos_angle - light.cos_cutoff) / (light.cos_inner - light.cos_cutoff);
                edge * cos_angle.powf(light.exponent)
            }
        }
        _ => 1.0,
    };

    let to_eye = (-position.coords).try_normalize(f32::EPSILON).unwrap_or(Vector3::z());
    let diffuse = normal.dot(&to_light).max(0.0);
    let specular = match (to_light + to_eye).try_normalize(f32::EPSILON) {
        Some(half) if diffuse > 0.0 => normal.dot(&half).max(0.0).powf(material.shininess),
        _ => 0.0,
    };

    let scale = light.power * light.attenuation(distance) * spot;
    let ambient = Vector3::from(material.ambient);
    let kd = Vector3::from(material.diffuse);
    let ks = Vector3::from(material.specular);
    let color = ambient + (kd * diffuse + ks * specular).component_mul(&light.color) * scale;

    let brightness = (color.x + color.y + color.z) / 3.0;
    if !brightness.is_finite() {
        return None;
    }
    // Keep lit faces visible even in the dark part of the ramp
    let character = match ramp_char(brightness) {
        ' ' => '.',
        c => c,
    };
    Some(Shade {
        character,
        color: to_rgb(color),
    })
}

/// Twice the signed area of a projected triangle
fn signed_area(coords: &[(f32, f32, f32); 3]) -> f32 {
    let (v0, v1, v2) = (coords[0], coords[1], coords[2]);
    (v1.0 - v0.0) * (v2.1 - v0.1) - (v2.0 - v0.0) * (v1.1 - v0.1)
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
