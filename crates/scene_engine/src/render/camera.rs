//! # 3D Camera
//!
//! Look-at camera with a perspective projection. The camera owns no cached
//! matrices; [`Camera::frustum_params`] gives a comparable snapshot that the
//! frustum culler uses to decide whether its planes are stale.

use crate::core::config::{CameraConfig, CullingConfig};
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};

/// Camera parameters that determine the culling frustum
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrustumParams {
    /// Camera position
    pub eye: Vec3,
    /// Look-at target
    pub center: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Width over height
    pub aspect: f32,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
}

/// Perspective look-at camera
///
/// # Coordinate System
/// Right-handed, Y-up. The camera looks down its local -Z axis toward
/// `center`.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub eye: Vec3,

    /// Point the camera is looking at
    pub center: Vec3,

    /// Up vector for camera orientation
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera at `eye` looking at the origin
    ///
    /// # Arguments
    /// * `eye` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width over height of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(eye: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            eye,
            center: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Build the initial camera from configuration
    pub fn from_config(camera: &CameraConfig, culling: &CullingConfig) -> Self {
        let aspect = camera.width as f32 / camera.height.max(1) as f32;
        let mut result = Self::perspective(camera.eye, camera.fov_degrees, aspect, culling.near, culling.far);
        result.look_at(camera.center, camera.up);
        result
    }

    /// Configure the camera to look at `center` with the given up vector
    pub fn look_at(&mut self, center: Vec3, up: Vec3) {
        self.center = center;
        self.up = up;
        log::trace!("Camera look_at updated - center: {:?}, up: {:?}", center, up);
    }

    /// Move the camera and its target together
    pub fn set_pose(&mut self, eye: Vec3, center: Vec3) {
        self.eye = eye;
        self.center = center;
    }

    /// Update the aspect ratio from a viewport size
    ///
    /// A zero-sized viewport (minimized window) leaves the aspect unchanged.
    /// Returns whether the aspect changed.
    pub fn set_viewport(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            log::debug!("Ignoring zero-sized viewport {}x{}", width, height);
            return false;
        }
        let aspect = width as f32 / height as f32;
        if (self.aspect - aspect).abs() > f32::EPSILON {
            log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
            self.aspect = aspect;
            true
        } else {
            false
        }
    }

    /// Zoom by scroll notches; positive notches narrow the field of view
    ///
    /// The result is clamped to `[min_degrees, max_degrees]`.
    pub fn zoom(&mut self, notches: f32, step_degrees: f32, min_degrees: f32, max_degrees: f32) {
        let fov = utils::rad_to_deg(self.fov) - notches.signum() * step_degrees;
        self.fov = utils::deg_to_rad(fov.clamp(min_degrees, max_degrees));
        log::trace!("Camera fov now {:.2} degrees", utils::rad_to_deg(self.fov));
    }

    /// Arcball rotation of the target around the eye
    ///
    /// `last` and `current` are trackball vectors from
    /// [`crate::input::trackball_point`]. The rotation axis is their cross
    /// product; the angle is the distance between them times `sensitivity`.
    pub fn orbit(&mut self, last: Vec3, current: Vec3, sensitivity: f32) {
        let angle = (current - last).magnitude() * sensitivity;
        let axis = last.cross(&current);
        let offset = utils::rotate_vector(self.center - self.eye, angle, axis);
        self.center = self.eye + offset;
    }

    /// Unit view direction, or `None` for a degenerate pose
    pub fn forward(&self) -> Option<Vec3> {
        utils::try_normalize(self.center - self.eye)
    }

    /// World-to-view matrix
    ///
    /// A degenerate pose yields the identity.
    pub fn view_matrix(&self) -> Mat4 {
        match (self.forward(), utils::try_normalize(self.up)) {
            (Some(forward), Some(up)) if utils::try_normalize(forward.cross(&up)).is_some() => {
                Mat4::view_look_at(self.eye, self.center, self.up)
            }
            _ => Mat4::identity(),
        }
    }

    /// View-to-clip matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_gl(self.fov, self.aspect, self.near, self.far)
    }

    /// Snapshot of everything the frustum depends on
    pub fn frustum_params(&self) -> FrustumParams {
        FrustumParams {
            eye: self.eye,
            center: self.center,
            up: self.up,
            fov: self.fov,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), &CullingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_zoom_clamps_fov() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 20.0), 6.0, 1.0, 1.0, 1000.0);
        camera.zoom(1.0, 0.5, 5.0, 150.0);
        assert_relative_eq!(utils::rad_to_deg(camera.fov), 5.5, epsilon = 1e-4);
        camera.zoom(1.0, 0.5, 5.0, 150.0);
        camera.zoom(1.0, 0.5, 5.0, 150.0);
        assert_relative_eq!(utils::rad_to_deg(camera.fov), 5.0, epsilon = 1e-4);
        camera.zoom(-1.0, 0.5, 5.0, 150.0);
        assert_relative_eq!(utils::rad_to_deg(camera.fov), 5.5, epsilon = 1e-4);
    }

    #[test]
    fn test_zero_viewport_keeps_aspect() {
        let mut camera = Camera::default();
        let before = camera.aspect;
        assert!(!camera.set_viewport(800, 0));
        assert_eq!(camera.aspect, before);
        assert!(camera.set_viewport(800, 400));
        assert_relative_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_orbit_keeps_target_distance() {
        let mut camera = Camera::default();
        let distance = (camera.center - camera.eye).magnitude();
        let last = Vec3::new(0.0, 0.0, 1.0);
        let current = Vec3::new(0.3, 0.0, 1.0).normalize();
        camera.orbit(last, current, 1.0);
        assert_relative_eq!((camera.center - camera.eye).magnitude(), distance, epsilon = 1e-4);
        assert!(camera.center.x.abs() > 1e-3, "target should have swung sideways");
    }

    #[test]
    fn test_degenerate_pose_has_identity_view() {
        let mut camera = Camera::default();
        camera.set_pose(Vec3::zeros(), Vec3::zeros());
        assert!(camera.forward().is_none());
        assert_eq!(camera.view_matrix(), Mat4::identity());
    }

    #[test]
    fn test_view_matrix_puts_target_on_negative_z() {
        let mut camera = Camera::default();
        camera.set_pose(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, 10.0, -25.0));
        let target = camera.view_matrix().transform_point(&Point3::from(camera.center));
        assert_relative_eq!(target.coords, Vec3::new(0.0, 0.0, -25.0), epsilon = 1e-4);
    }
}
