//! Oscillating joints
//!
//! A joint swings its node back and forth about a pivot. The rotation is
//! applied cumulatively on the right of the node's local matrix, so the swing
//! happens in the joint's own frame after whatever rest pose it was built with.

use crate::core::config::AnimationConfig;
use crate::foundation::math::{utils, Mat4, Mat4Ext, UnitVec3, Vec3};

/// Swing direction of a joint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingDirection {
    /// Angle increasing
    Forward,
    /// Angle decreasing
    Backward,
}

impl SwingDirection {
    /// +1 or -1
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    /// The other direction
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Swing rate preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointSpeed {
    /// `slow_step_degrees` per tick
    Slow,
    /// `fast_step_degrees` per tick
    Fast,
}

/// Joint that swings between `-limit` and `+limit`
#[derive(Debug, Clone)]
pub struct OscillatingJoint {
    angle: f32,
    direction: SwingDirection,
    step: f32,
    limit: f32,
    pivot: Vec3,
    axis: UnitVec3,
}

impl OscillatingJoint {
    /// Joint about the X axis through `pivot`
    ///
    /// # Arguments
    /// * `step` - Angle per tick, radians
    /// * `limit` - Swing limit, radians
    /// * `pivot` - Pivot point in the node's local space
    pub fn new(step: f32, limit: f32, pivot: Vec3) -> Self {
        Self {
            angle: 0.0,
            direction: SwingDirection::Forward,
            step: step.abs(),
            limit: limit.abs(),
            pivot,
            axis: Vec3::x_axis(),
        }
    }

    /// Joint with rates taken from configuration
    pub fn from_config(config: &AnimationConfig, speed: JointSpeed, direction: SwingDirection) -> Self {
        let step_degrees = match speed {
            JointSpeed::Slow => config.slow_step_degrees,
            JointSpeed::Fast => config.fast_step_degrees,
        };
        Self::new(
            utils::deg_to_rad(step_degrees),
            utils::deg_to_rad(config.swing_limit_degrees),
            config.pivot,
        )
        .with_direction(direction)
    }

    /// Set the initial swing direction
    pub fn with_direction(mut self, direction: SwingDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Set the rotation axis
    pub fn with_axis(mut self, axis: UnitVec3) -> Self {
        self.axis = axis;
        self
    }

    /// Accumulated angle, radians
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Current swing direction
    pub fn direction(&self) -> SwingDirection {
        self.direction
    }

    /// Pivot point in the node's local space
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    /// Apply one tick of swing to `local`
    ///
    /// The direction flips once the accumulated angle passes the limit, so
    /// the angle overshoots by at most one step.
    pub fn advance(&mut self, local: &mut Mat4) {
        let delta = self.direction.sign() * self.step;
        *local *= Mat4::pivot_rotation(self.pivot, &self.axis, delta);
        self.angle += delta;

        if self.angle > self.limit {
            self.direction = SwingDirection::Backward;
        }
        if self.angle < -self.limit {
            self.direction = SwingDirection::Forward;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn test_direction_flips_after_limit_is_passed() {
        let step = 3.0_f32.to_radians();
        let limit = 50.0_f32.to_radians();
        let mut joint = OscillatingJoint::new(step, limit, Vec3::new(0.0, 5.0, 0.0));
        let mut local = Mat4::identity();

        let expected = (limit / step).ceil() as usize;
        for tick in 1..=expected {
            assert_eq!(joint.direction(), SwingDirection::Forward, "still rising before tick {tick}");
            joint.advance(&mut local);
        }
        assert_eq!(joint.direction(), SwingDirection::Backward);
    }

    #[test]
    fn test_angle_never_exceeds_limit_plus_step() {
        let config = AnimationConfig::default();
        let mut joint = OscillatingJoint::from_config(&config, JointSpeed::Slow, SwingDirection::Backward);
        let limit = config.swing_limit_degrees.to_radians();
        let step = config.slow_step_degrees.to_radians();
        let mut local = Mat4::identity();
        for _ in 0..2000 {
            joint.advance(&mut local);
            assert!(joint.angle().abs() <= limit + step + 1e-5);
        }
    }

    #[test]
    fn test_pivot_stays_fixed_and_rotation_matches_angle() {
        let pivot = Vec3::new(0.0, 5.0, 0.0);
        let mut joint = OscillatingJoint::new(0.1, 1.0, pivot);
        let rest = Mat4::new_translation(&Vec3::new(11.0, 0.0, 0.0));
        let mut local = rest;
        for _ in 0..4 {
            joint.advance(&mut local);
        }
        let moved_pivot = local.transform_point(&Point3::from(pivot)).coords;
        let rest_pivot = rest.transform_point(&Point3::from(pivot)).coords;
        assert_relative_eq!(moved_pivot, rest_pivot, epsilon = 1e-4);

        let expected = rest * Mat4::pivot_rotation(pivot, &Vec3::x_axis(), joint.angle());
        assert_relative_eq!(local, expected, epsilon = 1e-4);
    }
}
