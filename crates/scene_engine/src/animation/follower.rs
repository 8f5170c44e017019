//! Constant-speed motion along a closed track
//!
//! Progress is a scalar in `[0, K)`: the integer part selects the curve and the
//! fraction is the curve parameter. Distance is converted to parameter change
//! through the current curve's arclength, and any distance left over at a
//! curve boundary carries into the next curve.

use crate::foundation::collections::TrackId;
use crate::foundation::math::{constants, Mat4, Mat4Ext, Vec3};
use crate::scene::track::Track;

/// Moves a node along a track held in the scene's track table
#[derive(Debug, Clone)]
pub struct PathFollower {
    track: TrackId,
    progress: f32,
    speed: f32,
    up: Vec3,
}

impl PathFollower {
    /// Follow `track` at `speed` world units per second, starting at its first
    /// anchor
    pub fn new(track: TrackId, speed: f32) -> Self {
        Self { track, progress: 0.0, speed: speed.max(0.0), up: Vec3::y() }
    }

    /// Track this follower refers to
    pub fn track(&self) -> TrackId {
        self.track
    }

    /// Current progress in `[0, K)`
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Speed in world units per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Change the speed (negative values clamp to zero)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    /// Jump to `progress`, wrapped into `[0, K)`
    pub fn set_progress(&mut self, track: &Track, progress: f32) {
        self.progress = wrap(progress, track.curve_count() as f32);
    }

    /// Advance by the distance covered in `dt` seconds
    pub fn update(&mut self, track: &Track, dt: f32) {
        self.advance(track, self.speed * dt);
    }

    /// Advance by `distance` world units
    ///
    /// Whole laps are removed first so large distances cost at most one lap of
    /// curve steps. Zero-length curves are skipped.
    pub fn advance(&mut self, track: &Track, distance: f32) {
        let total = track.total_length();
        if distance.is_nan() || distance <= 0.0 || total <= constants::EPSILON {
            return;
        }

        let k = track.curve_count();
        let mut remaining = distance % total;
        // One extra pass covers the partial curve we start and end on
        for _ in 0..=k {
            if remaining <= 0.0 {
                break;
            }
            let index = self.progress.floor() as usize % k;
            let t = self.progress - self.progress.floor();
            let length = track.curve(index).arclength();

            if length <= constants::EPSILON {
                self.progress = (index + 1) as f32;
            } else {
                let room = (1.0 - t) * length;
                if remaining < room {
                    self.progress += remaining / length;
                    remaining = 0.0;
                } else {
                    remaining -= room;
                    self.progress = (index + 1) as f32;
                }
            }
            self.progress = wrap(self.progress, k as f32);
        }
    }

    /// Position and tangent at the current progress
    pub fn pose(&self, track: &Track) -> (Vec3, Vec3) {
        let index = self.progress.floor() as usize;
        let t = self.progress - self.progress.floor();
        let curve = track.curve(index);
        (curve.point(t), curve.tangent(t))
    }

    /// Model matrix placing a node on the track facing along the tangent
    pub fn transform(&self, track: &Track) -> Mat4 {
        let (position, tangent) = self.pose(track);
        Mat4::orient_along(position, tangent, self.up)
    }
}

fn wrap(progress: f32, k: f32) -> f32 {
    let wrapped = progress.rem_euclid(k);
    // rem_euclid can round up to exactly k for tiny negative inputs
    if wrapped >= k {
        0.0
    } else {
        wrapped
    }
}
