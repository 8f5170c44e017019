//! Cubic Bézier curve segment
//!
//! Polynomial coefficients, the sampled polyline and the arclength are cached
//! and rebuilt together whenever a control point changes.

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Number of uniform parameter steps used for the polyline and arclength
pub const CURVE_SAMPLES: usize = 150;

/// Cubic Bézier segment with cached evaluation data
#[derive(Debug, Clone)]
pub struct BezierCurve {
    points: [Vec3; 4],
    coefficients: [Vec3; 4],
    polyline: Vec<Vec3>,
    arclength: f32,
}

/// Control points of a curve, as stored in track layout files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints(pub [Vec3; 4]);

impl BezierCurve {
    /// Build a curve from its four control points
    pub fn new(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let mut curve = Self {
            points: [p0, p1, p2, p3],
            coefficients: [Vec3::zeros(); 4],
            polyline: Vec::with_capacity(CURVE_SAMPLES + 1),
            arclength: 0.0,
        };
        curve.rebuild();
        curve
    }

    /// Control point `i` (0..4)
    pub fn control_point(&self, i: usize) -> Vec3 {
        self.points[i]
    }

    /// All four control points
    pub fn control_points(&self) -> ControlPoints {
        ControlPoints(self.points)
    }

    /// Offset control point `i` and rebuild the caches
    pub fn translate_point(&mut self, i: usize, delta: Vec3) {
        self.points[i] += delta;
        self.rebuild();
    }

    /// Offset several control points with a single cache rebuild
    pub fn translate_points(&mut self, offsets: &[(usize, Vec3)]) {
        for &(i, delta) in offsets {
            self.points[i] += delta;
        }
        self.rebuild();
    }

    /// Position at parameter `t` in `[0, 1]`
    pub fn point(&self, t: f32) -> Vec3 {
        let [c0, c1, c2, c3] = self.coefficients;
        ((c0 * t + c1) * t + c2) * t + c3
    }

    /// First derivative at `t`
    pub fn tangent(&self, t: f32) -> Vec3 {
        let [c0, c1, c2, _] = self.coefficients;
        c0 * (3.0 * t * t) + c1 * (2.0 * t) + c2
    }

    /// Polyline length over [`CURVE_SAMPLES`] uniform steps
    pub fn arclength(&self) -> f32 {
        self.arclength
    }

    /// Sampled points from `t = 0` to `t = 1` inclusive
    pub fn polyline(&self) -> &[Vec3] {
        &self.polyline
    }

    fn rebuild(&mut self) {
        let [p0, p1, p2, p3] = self.points;
        self.coefficients = [
            -p0 + p1 * 3.0 - p2 * 3.0 + p3,
            p0 * 3.0 - p1 * 6.0 + p2 * 3.0,
            p0 * -3.0 + p1 * 3.0,
            p0,
        ];

        self.polyline.clear();
        for step in 0..=CURVE_SAMPLES {
            let t = step as f32 / CURVE_SAMPLES as f32;
            self.polyline.push(self.point(t));
        }
        self.arclength = self.polyline.windows(2).map(|w| (w[1] - w[0]).magnitude()).sum();
    }
}

impl From<ControlPoints> for BezierCurve {
    fn from(ControlPoints([p0, p1, p2, p3]): ControlPoints) -> Self {
        Self::new(p0, p1, p2, p3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_curve() -> BezierCurve {
        BezierCurve::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 1.0),
            Vec3::new(4.0, 0.0, 0.0),
        )
    }

    #[test]
    fn test_endpoints_interpolate_anchors() {
        let curve = sample_curve();
        assert_relative_eq!(curve.point(0.0), curve.control_point(0), epsilon = 1e-6);
        assert_relative_eq!(curve.point(1.0), curve.control_point(3), epsilon = 1e-5);
    }

    #[test]
    fn test_end_tangents_follow_control_legs() {
        let curve = sample_curve();
        let start = (curve.control_point(1) - curve.control_point(0)) * 3.0;
        let end = (curve.control_point(3) - curve.control_point(2)) * 3.0;
        assert_relative_eq!(curve.tangent(0.0), start, epsilon = 1e-5);
        assert_relative_eq!(curve.tangent(1.0), end, epsilon = 1e-4);
    }

    #[test]
    fn test_straight_curve_arclength() {
        let curve = BezierCurve::new(
            Vec3::zeros(),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
        );
        assert_relative_eq!(curve.arclength(), 3.0, epsilon = 1e-4);
        assert_eq!(curve.polyline().len(), CURVE_SAMPLES + 1);
    }

    #[test]
    fn test_edit_rebuilds_caches() {
        let mut curve = sample_curve();
        let before = curve.arclength();
        curve.translate_point(3, Vec3::new(10.0, 0.0, 0.0));
        assert_relative_eq!(curve.point(1.0), Vec3::new(14.0, 0.0, 0.0), epsilon = 1e-4);
        assert!(curve.arclength() > before + 9.0);
        let last = *curve.polyline().last().expect("polyline is never empty");
        assert_relative_eq!(last, Vec3::new(14.0, 0.0, 0.0), epsilon = 1e-4);
    }
}
