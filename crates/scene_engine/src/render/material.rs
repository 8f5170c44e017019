//! Material system for rendering

use crate::foundation::math::Vec3;

/// Surface appearance handed to the renderer with every draw request
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    /// Phong-lit surface
    Phong {
        /// Ambient reflectance (RGB)
        ambient: Vec3,
        /// Diffuse reflectance (RGB)
        diffuse: Vec3,
        /// Specular reflectance (RGB)
        specular: Vec3,
        /// Specular exponent
        shininess: f32,
    },
    /// Unlit solid color
    Flat(Vec3),
}

impl Material {
    /// Phong material whose ambient term is a dimmed copy of the diffuse color
    pub fn phong(diffuse: Vec3) -> Self {
        Self::Phong {
            ambient: diffuse * 0.2,
            diffuse,
            specular: Vec3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
        }
    }

    /// Unlit solid color
    pub fn flat(r: f32, g: f32, b: f32) -> Self {
        Self::Flat(Vec3::new(r, g, b))
    }

    /// Set the specular term (no effect on flat materials)
    pub fn with_specular(mut self, color: Vec3, exponent: f32) -> Self {
        if let Self::Phong { specular, shininess, .. } = &mut self {
            *specular = color;
            *shininess = exponent.max(0.0);
        }
        self
    }

    /// Main display color
    pub fn base_color(&self) -> Vec3 {
        match self {
            Self::Phong { diffuse, .. } => *diffuse,
            Self::Flat(color) => *color,
        }
    }

    /// Red marker used for track anchors and the light gizmo
    pub fn anchor_marker() -> Self {
        Self::flat(1.0, 0.0, 0.0)
    }

    /// Green marker used for track control points
    pub fn control_marker() -> Self {
        Self::flat(0.0, 1.0, 0.0)
    }

    /// Highlight for the selected track point
    pub fn selection_marker() -> Self {
        Self::flat(1.0, 1.0, 0.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::phong(Vec3::new(0.8, 0.8, 0.8))
    }
}
