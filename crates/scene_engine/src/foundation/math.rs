//! Math utilities and types
//!
//! Provides the fundamental math types used by the scene graph. Matrices are
//! column-major and act on column vectors, so a child's world matrix is
//! `parent_world * local`.

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Unit-length 3D vector, used for rotation axes
pub type UnitVec3 = Unit<Vec3>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;

    /// Tolerance below which a vector is treated as zero length
    pub const EPSILON: f32 = 1.0e-6;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Vec3};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }

    /// Normalize a vector, returning `None` when it is too short or not finite
    pub fn try_normalize(v: Vec3) -> Option<Vec3> {
        if !is_finite(&v) {
            return None;
        }
        v.try_normalize(constants::EPSILON)
    }

    /// Check that every component of a vector is finite
    pub fn is_finite(v: &Vec3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    /// Rotate a vector around an arbitrary axis (right-hand rule)
    ///
    /// Returns the vector unchanged when the axis is degenerate.
    pub fn rotate_vector(v: Vec3, angle: f32, axis: Vec3) -> Vec3 {
        match try_normalize(axis) {
            Some(axis) => {
                let rotation = nalgebra::Rotation3::from_axis_angle(&nalgebra::Unit::new_unchecked(axis), angle);
                rotation * v
            }
            None => v,
        }
    }
}

/// Extension trait for Mat4 with scene-graph convenience constructors
pub trait Mat4Ext {
    /// Pure translation matrix
    fn translation(offset: Vec3) -> Mat4;

    /// Rotation by `angle` radians around `axis`
    fn rotation_about(axis: &UnitVec3, angle: f32) -> Mat4;

    /// Rotation around an axis passing through `pivot`
    ///
    /// Composed as translate-to-pivot, rotate, translate-back.
    fn pivot_rotation(pivot: Vec3, axis: &UnitVec3, angle: f32) -> Mat4;

    /// Right-handed look-at view matrix (camera looks down its local -Z)
    fn view_look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;

    /// OpenGL-style perspective projection (clip depth in [-1, 1])
    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Model matrix placing an object at `position` with its local -Z axis
    /// aligned to `forward`
    fn orient_along(position: Vec3, forward: Vec3, up: Vec3) -> Mat4;

    /// World-space translation column
    fn translation_part(&self) -> Vec3;

    /// Largest scale factor among the basis columns
    fn max_axis_scale(&self) -> f32;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: Vec3) -> Mat4 {
        Mat4::new_translation(&offset)
    }

    fn rotation_about(axis: &UnitVec3, angle: f32) -> Mat4 {
        Mat4::from_axis_angle(axis, angle)
    }

    fn pivot_rotation(pivot: Vec3, axis: &UnitVec3, angle: f32) -> Mat4 {
        Mat4::translation(pivot) * Mat4::rotation_about(axis, angle) * Mat4::translation(-pivot)
    }

    fn view_look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(&up).normalize();
        let camera_up = right.cross(&forward);

        let translation = Mat4::new(
            1.0, 0.0, 0.0, -eye.x,
            0.0, 1.0, 0.0, -eye.y,
            0.0, 0.0, 1.0, -eye.z,
            0.0, 0.0, 0.0, 1.0,
        );

        let rotation = Mat4::new(
            right.x, right.y, right.z, 0.0,
            camera_up.x, camera_up.y, camera_up.z, 0.0,
            -forward.x, -forward.y, -forward.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );

        rotation * translation
    }

    fn perspective_gl(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fovy = (fov_y * 0.5).tan();

        let mut result = Mat4::zeros();
        result[(0, 0)] = 1.0 / (aspect * tan_half_fovy);
        result[(1, 1)] = 1.0 / tan_half_fovy;
        result[(2, 2)] = -(far + near) / (far - near);
        result[(2, 3)] = -(2.0 * far * near) / (far - near);
        result[(3, 2)] = -1.0;
        result
    }

    fn orient_along(position: Vec3, forward: Vec3, up: Vec3) -> Mat4 {
        let Some(forward) = utils::try_normalize(forward) else {
            return Mat4::translation(position);
        };
        let Some(right) = utils::try_normalize(forward.cross(&up)) else {
            return Mat4::translation(position);
        };
        let object_up = right.cross(&forward);

        Mat4::new(
            right.x, object_up.x, -forward.x, position.x,
            right.y, object_up.y, -forward.y, position.y,
            right.z, object_up.z, -forward.z, position.z,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn translation_part(&self) -> Vec3 {
        Vec3::new(self.m14, self.m24, self.m34)
    }

    fn max_axis_scale(&self) -> f32 {
        let sx = Vec3::new(self.m11, self.m21, self.m31).magnitude();
        let sy = Vec3::new(self.m12, self.m22, self.m32).magnitude();
        let sz = Vec3::new(self.m13, self.m23, self.m33).magnitude();
        sx.max(sy).max(sz)
    }
}
