//! Lighting system

use crate::foundation::math::{utils, Mat4, Vec3};
use crate::render::Material;

/// Point light positioned in world space
///
/// Passed to the renderer as a frame uniform and drawn as a small marker.
#[derive(Debug, Clone)]
pub struct PointLight {
    /// Light position
    pub position: Vec3,
    /// Light color
    pub color: Vec3,
    /// Uniform scale of the marker mesh
    pub marker_scale: f32,
}

impl PointLight {
    /// Create a white point light
    pub fn new(position: Vec3) -> Self {
        Self { position, color: Vec3::new(1.0, 1.0, 1.0), marker_scale: 0.05 }
    }

    /// Set light color
    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    /// Arcball rotation of the light position about the origin
    pub fn orbit(&mut self, last: Vec3, current: Vec3, sensitivity: f32) {
        let angle = (current - last).magnitude() * sensitivity;
        self.position = utils::rotate_vector(self.position, angle, last.cross(&current));
    }

    /// Move the light toward the origin (positive offset) or away from it
    pub fn change_distance(&mut self, offset: f32) {
        if offset > 0.0 {
            self.position *= 0.99;
        } else if offset < 0.0 {
            self.position *= 1.01;
        }
        log::trace!("Light moved to {:?}", self.position);
    }

    /// Model matrix of the light marker
    pub fn marker_transform(&self) -> Mat4 {
        Mat4::new_translation(&self.position) * Mat4::new_scaling(self.marker_scale)
    }

    /// Flat material matching the light color
    pub fn marker_material(&self) -> Material {
        Material::Flat(self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_change_distance_scales_position() {
        let mut light = PointLight::new(Vec3::new(10.0, 0.0, 0.0));
        light.change_distance(1.0);
        assert_relative_eq!(light.position.x, 9.9, epsilon = 1e-5);
        light.change_distance(-1.0);
        assert_relative_eq!(light.position.x, 9.999, epsilon = 1e-4);
    }

    #[test]
    fn test_orbit_preserves_radius() {
        let mut light = PointLight::new(Vec3::new(0.0, 5.0, 5.0));
        light.orbit(Vec3::z(), Vec3::new(0.2, 0.1, 1.0).normalize(), 1.0);
        assert_relative_eq!(light.position.magnitude(), 50.0_f32.sqrt(), epsilon = 1e-4);
    }
}
