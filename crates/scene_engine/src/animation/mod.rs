//! Procedural animation
//!
//! Joints swing node-local transforms in place; path followers place nodes on
//! tracks. The [`AnimationController`] drives both through the scene tree's
//! `update` traversal once per tick.

pub mod follower;
pub mod joint;

pub use follower::PathFollower;
pub use joint::{JointSpeed, OscillatingJoint, SwingDirection};

use crate::scene::{SceneNode, TrackTable};

/// Per-tick animation driver with pause support
#[derive(Debug, Clone, Default)]
pub struct AnimationController {
    paused: bool,
    ticks: u64,
}

impl AnimationController {
    /// Create a running controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether updates are suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Suspend or resume updates
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::info!("Animation {}", if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    /// Number of ticks actually applied
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one update traversal over `root`
    ///
    /// Returns `false` without touching the tree while paused.
    pub fn update(&mut self, root: &mut SceneNode, tracks: &TrackTable, dt: f32) -> bool {
        if self.paused {
            return false;
        }
        root.update(dt, tracks);
        self.ticks += 1;
        true
    }
}
