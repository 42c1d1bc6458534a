//! Geometry primitives for 3D rendering
use std::f32::consts::{PI, TAU};

use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn from_parts(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let sum = self.vertices[0].position.coords
            + self.vertices[1].position.coords
            + self.vertices[2].position.coords;
        Point3::from(sum / 3.0)
    }
}

/// The drawable units the skeleton and scene refer to.
///
/// A primitive is a handle; the renderer owns the matching [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Axes,
    Sphere,
    Torus,
    Cylinder,
    Cube,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Axes,
        Primitive::Sphere,
        Primitive::Torus,
        Primitive::Cylinder,
        Primitive::Cube,
    ];

    /// Build the unit mesh for this primitive.
    ///
    /// Sphere has radius 1, the cylinder has radius 1 and spans y in
    /// [-0.5, 0.5], the torus lies in the xz plane with outer radius 1 and the
    /// cube has edge 1.
    pub fn build_mesh(self) -> Mesh {
        match self {
            Primitive::Axes => Mesh::axes(4.0),
            Primitive::Sphere => Mesh::sphere(1.0, 12, 8),
            Primitive::Torus => Mesh::torus(0.7, 1.0, 16, 6),
            Primitive::Cylinder => Mesh::cylinder(1.0, 1.0, 10),
            Primitive::Cube => Mesh::cube(1.0),
        }
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    fn add_quad(&mut self, a: Vertex, b: Vertex, c: Vertex, d: Vertex) {
        self.add_triangle(Triangle::new(a, b, c));
        self.add_triangle(Triangle::new(a, c, d));
    }

    fn append(&mut self, other: Mesh) {
        self.triangles.extend(other.triangles);
    }

    /// Create a cube mesh centred on the origin
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        Self::cuboid(Point3::origin(), Vector3::new(half, half, half))
    }

    /// Create an axis-aligned box from its centre and half extents
    pub fn cuboid(center: Point3<f32>, half: Vector3<f32>) -> Self {
        let mut mesh = Self::with_capacity(12);
        let (cx, cy, cz) = (center.x, center.y, center.z);
        let (hx, hy, hz) = (half.x, half.y, half.z);
        let v = |x: f32, y: f32, z: f32, n: [f32; 3]| {
            Vertex::new(cx + x, cy + y, cz + z, n[0], n[1], n[2])
        };

        // Front face
        let n = [0.0, 0.0, 1.0];
        mesh.add_quad(v(-hx, -hy, hz, n), v(hx, -hy, hz, n), v(hx, hy, hz, n), v(-hx, hy, hz, n));
        // Back face
        let n = [0.0, 0.0, -1.0];
        mesh.add_quad(v(-hx, -hy, -hz, n), v(-hx, hy, -hz, n), v(hx, hy, -hz, n), v(hx, -hy, -hz, n));
        // Top face
        let n = [0.0, 1.0, 0.0];
        mesh.add_quad(v(-hx, hy, -hz, n), v(-hx, hy, hz, n), v(hx, hy, hz, n), v(hx, hy, -hz, n));
        // Bottom face
        let n = [0.0, -1.0, 0.0];
        mesh.add_quad(v(-hx, -hy, -hz, n), v(hx, -hy, -hz, n), v(hx, -hy, hz, n), v(-hx, -hy, hz, n));
        // Right face
        let n = [1.0, 0.0, 0.0];
        mesh.add_quad(v(hx, -hy, -hz, n), v(hx, hy, -hz, n), v(hx, hy, hz, n), v(hx, -hy, hz, n));
        // Left face
        let n = [-1.0, 0.0, 0.0];
        mesh.add_quad(v(-hx, -hy, -hz, n), v(-hx, -hy, hz, n), v(-hx, hy, hz, n), v(-hx, hy, -hz, n));

        mesh
    }

    /// Reference axes as three thin boxes along +x, +y and +z
    pub fn axes(length: f32) -> Self {
        let thickness = length * 0.01;
        let half = length / 2.0;
        let mut mesh = Self::with_capacity(36);
        mesh.append(Self::cuboid(
            Point3::new(half, 0.0, 0.0),
            Vector3::new(half, thickness, thickness),
        ));
        mesh.append(Self::cuboid(
            Point3::new(0.0, half, 0.0),
            Vector3::new(thickness, half, thickness),
        ));
        mesh.append(Self::cuboid(
            Point3::new(0.0, 0.0, half),
            Vector3::new(thickness, thickness, half),
        ));
        mesh
    }

    /// UV sphere centred on the origin
    pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(2);
        let point = |stack: u32, slice: u32| {
            let phi = PI * stack as f32 / stacks as f32 - PI / 2.0;
            let theta = TAU * slice as f32 / slices as f32;
            let normal = Vector3::new(phi.cos() * theta.cos(), phi.sin(), phi.cos() * theta.sin());
            Vertex::from_parts(Point3::from(normal * radius), normal)
        };

        let mut mesh = Self::with_capacity((slices * stacks * 2) as usize);
        for stack in 0..stacks {
            for slice in 0..slices {
                mesh.add_quad(
                    point(stack, slice),
                    point(stack + 1, slice),
                    point(stack + 1, slice + 1),
                    point(stack, slice + 1),
                );
            }
        }
        mesh
    }

    /// Closed cylinder along y, centred on the origin
    pub fn cylinder(radius: f32, height: f32, slices: u32) -> Self {
        let slices = slices.max(3);
        let half = height / 2.0;
        let rim = |slice: u32| {
            let theta = TAU * slice as f32 / slices as f32;
            Vector3::new(theta.cos(), 0.0, theta.sin())
        };

        let mut mesh = Self::with_capacity((slices * 4) as usize);
        let up = Vector3::<f32>::y();
        let down = -Vector3::<f32>::y();
        for slice in 0..slices {
            let a = rim(slice);
            let b = rim(slice + 1);
            let bottom_a = Point3::from(a * radius - up * half);
            let bottom_b = Point3::from(b * radius - up * half);
            let top_a = Point3::from(a * radius + up * half);
            let top_b = Point3::from(b * radius + up * half);

            mesh.add_quad(
                Vertex::from_parts(bottom_a, a),
                Vertex::from_parts(top_a, a),
                Vertex::from_parts(top_b, b),
                Vertex::from_parts(bottom_b, b),
            );
            mesh.add_triangle(Triangle::new(
                Vertex::from_parts(Point3::from(up * half), up),
                Vertex::from_parts(top_b, up),
                Vertex::from_parts(top_a, up),
            ));
            mesh.add_triangle(Triangle::new(
                Vertex::from_parts(Point3::from(down * half), down),
                Vertex::from_parts(bottom_a, down),
                Vertex::from_parts(bottom_b, down),
            ));
        }
        mesh
    }

    /// Torus in the xz plane; `inner` and `outer` are the hole and rim radii
    pub fn torus(inner: f32, outer: f32, slices: u32, stacks: u32) -> Self {
        let slices = slices.max(3);
        let stacks = stacks.max(3);
        let tube = (outer - inner) / 2.0;
        let ring = inner + tube;
        let point = |slice: u32, stack: u32| {
            let theta = TAU * slice as f32 / slices as f32;
            let phi = TAU * stack as f32 / stacks as f32;
            let around = Vector3::new(theta.cos(), 0.0, theta.sin());
            let normal = around * phi.cos() + Vector3::<f32>::y() * phi.sin();
            Vertex::from_parts(Point3::from(around * ring + normal * tube), normal)
        };

        let mut mesh = Self::with_capacity((slices * stacks * 2) as usize);
        for slice in 0..slices {
            for stack in 0..stacks {
                mesh.add_quad(
                    point(slice, stack),
                    point(slice, stack + 1),
                    point(slice + 1, stack + 1),
                    point(slice + 1, stack),
                );
            }
        }
        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
