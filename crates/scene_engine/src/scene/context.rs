//! Frame context threaded through update and draw
//!
//! Holds the camera, the mode toggles and the track-editing selection. There is
//! no global state; everything a traversal reads comes from here.

use bitflags::bitflags;

use crate::core::config::ApplicationConfig;
use crate::foundation::math::Vec3;
use crate::render::{Camera, PointLight};

bitflags! {
    /// Scene mode toggles
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SceneFlags: u32 {
        /// Skip subtrees outside the frustum
        const CULLING     = 1 << 0;
        /// Draw bounding spheres of visible cullable nodes
        const SHOW_BOUNDS = 1 << 1;
        /// Suspend animation
        const PAUSED      = 1 << 2;
        /// Freeze the culling lens while the view keeps moving
        const DEMO_MODE   = 1 << 3;
        /// Camera rides the track
        const RIDE_CAMERA = 1 << 4;
        /// Track points are selectable and drawn as markers
        const EDIT_MODE   = 1 << 5;
        /// Pointer drags and scrolls act on the light instead of the camera
        const LIGHT_CONTROL = 1 << 6;
    }
}

/// World axis used for nudging the selected track point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// World X
    X,
    /// World Y
    Y,
    /// World Z
    Z,
}

impl Axis {
    /// Unit vector along the axis
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::x(),
            Self::Y => Vec3::y(),
            Self::Z => Vec3::z(),
        }
    }
}

/// Explicit per-scene state read by update and draw
#[derive(Debug, Clone)]
pub struct SceneContext {
    /// Active camera
    pub camera: Camera,
    /// Mode toggles
    pub flags: SceneFlags,
    /// Selected editable track point, in `0..3K`
    pub selected_point: usize,
    /// Axis scroll nudges move along
    pub edit_axis: Axis,
    /// Optional point light
    pub light: Option<PointLight>,
    /// Viewport size in pixels
    pub viewport: (u32, u32),
}

impl SceneContext {
    /// Initial context from configuration
    pub fn from_config(config: &ApplicationConfig) -> Self {
        let mut flags = SceneFlags::empty();
        flags.set(SceneFlags::CULLING, config.culling.enabled);
        flags.set(SceneFlags::SHOW_BOUNDS, config.culling.show_bounds);
        Self {
            camera: Camera::from_config(&config.camera, &config.culling),
            flags,
            selected_point: 0,
            edit_axis: Axis::X,
            light: None,
            viewport: (config.camera.width, config.camera.height),
        }
    }

    /// Flip `flag` and return its new state
    pub fn toggle(&mut self, flag: SceneFlags) -> bool {
        self.flags.toggle(flag);
        let on = self.flags.contains(flag);
        log::info!("{:?} {}", flag, if on { "on" } else { "off" });
        on
    }

    /// Whether `flag` is set
    pub fn is(&self, flag: SceneFlags) -> bool {
        self.flags.contains(flag)
    }

    /// Step the selection by `offset`, wrapping over `point_count`
    pub fn step_selection(&mut self, offset: isize, point_count: usize) {
        if point_count == 0 {
            return;
        }
        let count = point_count as isize;
        let current = (self.selected_point % point_count) as isize;
        self.selected_point = (current + offset).rem_euclid(count) as usize;
        log::debug!("Selected track point {}", self.selected_point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps_both_ways() {
        let mut context = SceneContext::from_config(&ApplicationConfig::default());
        context.step_selection(-1, 24);
        assert_eq!(context.selected_point, 23);
        context.step_selection(1, 24);
        assert_eq!(context.selected_point, 0);
        context.step_selection(25, 24);
        assert_eq!(context.selected_point, 1);
    }

    #[test]
    fn test_flags_follow_config() {
        let mut config = ApplicationConfig::default();
        config.culling.show_bounds = true;
        let mut context = SceneContext::from_config(&config);
        assert!(context.is(SceneFlags::CULLING));
        assert!(context.is(SceneFlags::SHOW_BOUNDS));
        assert!(!context.toggle(SceneFlags::CULLING));
        assert!(!context.is(SceneFlags::CULLING));
    }
}
