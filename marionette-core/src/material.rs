//! Surface materials passed alongside every lit draw call

/// Phong material coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
}

impl Material {
    pub const fn new(ambient: [f32; 3], diffuse: [f32; 3], specular: [f32; 3], shininess: f32) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }

    /// Warm yellow used for the eye rings
    pub const EYE: Material = Material::new([0.4, 0.35, 0.1], [1.0, 0.85, 0.3], [0.9, 0.9, 0.6], 20.0);

    pub const PUPIL: Material = Material::new([0.05, 0.05, 0.05], [0.1, 0.1, 0.1], [0.8, 0.8, 0.8], 30.0);

    /// Orange-brown torso
    pub const TORSO: Material = Material::new([0.3, 0.15, 0.05], [0.7, 0.4, 0.15], [0.3, 0.3, 0.3], 5.0);

    /// Orange limb segments
    pub const LIMB: Material = Material::new([0.35, 0.2, 0.05], [1.0, 0.55, 0.1], [0.5, 0.5, 0.5], 10.0);

    /// Grey ball joints
    pub const JOINT: Material = Material::new([0.1, 0.1, 0.1], [0.5, 0.5, 0.5], [0.9, 0.9, 0.9], 5.0);
}

impl Default for Material {
    fn default() -> Self {
        Self::JOINT
    }
}
