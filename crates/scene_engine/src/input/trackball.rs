//! Virtual trackball mapping

use crate::foundation::math::Vec3;

/// Map a window position onto the unit trackball hemisphere
///
/// The window is mapped to `[-1, 1]` on both axes with +Y up. Points outside
/// the unit disc are pulled onto its rim; the small constant under the square
/// root keeps `z` positive there.
pub fn trackball_point(x: f32, y: f32, width: u32, height: u32) -> Vec3 {
    if width == 0 || height == 0 {
        return Vec3::z();
    }
    let (w, h) = (width as f32, height as f32);
    let mut v = Vec3::new((2.0 * x - w) / w, (h - 2.0 * y) / h, 0.0);
    let d = v.magnitude().min(1.0);
    v.z = (1.001 - d * d).sqrt();
    v.normalize()
}
