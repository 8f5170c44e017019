//! # Unified Configuration System
//!
//! All tunables of the scene core live here: camera defaults, culling
//! behaviour, animation rates and input sensitivities. Every section derives
//! serde with `#[serde(default)]` so a config file only needs to name the
//! values it overrides.
//!
//! ```toml
//! [camera]
//! eye = [225.0, 50.0, 225.0]
//! fov_degrees = 60.0
//!
//! [culling]
//! side_planes = "Exact"
//! ```

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};
use crate::scene::SidePlaneMode;

pub use crate::config::{Config, ConfigError};

/// # Engine Configuration
///
/// Core loop behaviour: logging and frame pacing for headless runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter (overridden by `RUST_LOG`)
    pub log_level: String,
    /// Number of frames a headless run simulates
    pub frame_count: u32,
    /// Seconds per frame for headless runs
    pub fixed_delta: f32,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            frame_count: 600,
            fixed_delta: 1.0 / 60.0,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the number of simulated frames
    pub fn with_frame_count(mut self, frames: u32) -> Self {
        self.frame_count = frames;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Camera Configuration
///
/// Initial pose, field of view and viewport size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera position
    pub eye: Vec3,
    /// Look-at target
    pub center: Vec3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl CameraConfig {
    /// Builder pattern: set eye and target
    pub fn looking_from(mut self, eye: Vec3, center: Vec3) -> Self {
        self.eye = eye;
        self.center = center;
        self
    }

    /// Vertical field of view in radians
    pub fn fov_radians(&self) -> f32 {
        utils::deg_to_rad(self.fov_degrees)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 20.0),
            center: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_degrees: 60.0,
            width: 640,
            height: 480,
        }
    }
}

/// # Culling Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CullingConfig {
    /// Skip subtrees whose bounding sphere is outside the frustum
    pub enabled: bool,
    /// Emit bounding-sphere draw requests for visible cullable nodes
    pub show_bounds: bool,
    /// Near plane distance
    pub near: f32,
    /// Far plane distance
    pub far: f32,
    /// How the four side planes are derived
    pub side_planes: SidePlaneMode,
}

impl Default for CullingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_bounds: false,
            near: 1.0,
            far: 1000.0,
            side_planes: SidePlaneMode::Approximate,
        }
    }
}

/// # Animation Configuration
///
/// Joint swing rates and the path-following speed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-tick swing of slow joints, degrees
    pub slow_step_degrees: f32,
    /// Per-tick swing of fast joints, degrees
    pub fast_step_degrees: f32,
    /// Swing limit, degrees
    pub swing_limit_degrees: f32,
    /// Joint pivot in the joint's local space
    pub pivot: Vec3,
    /// Path-following speed in world units per second
    pub path_speed: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            slow_step_degrees: 0.5,
            fast_step_degrees: 3.0,
            swing_limit_degrees: 50.0,
            pivot: Vec3::new(0.0, 5.0, 0.0),
            path_speed: 5.0,
        }
    }
}

/// # Input Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// FOV change per scroll notch, degrees
    pub zoom_step_degrees: f32,
    /// Smallest FOV zoom may reach, degrees
    pub min_fov_degrees: f32,
    /// Largest FOV zoom may reach, degrees
    pub max_fov_degrees: f32,
    /// Distance a key press or scroll notch moves the selected track point
    pub nudge_step: f32,
    /// Multiplier on arcball drag angle
    pub orbit_sensitivity: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            zoom_step_degrees: 0.5,
            min_fov_degrees: 5.0,
            max_fov_degrees: 150.0,
            nudge_step: 0.5,
            orbit_sensitivity: 1.0,
        }
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all subsystems.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Initial camera
    pub camera: CameraConfig,
    /// Frustum culling
    pub culling: CullingConfig,
    /// Joint and path animation
    pub animation: AnimationConfig,
    /// Input handling
    pub input: InputConfig,
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

impl Config for ApplicationConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", format!("{} is outside (0, 180)", camera.fov_degrees)));
        }
        if camera.width == 0 || camera.height == 0 {
            return Err(invalid("camera.width/height", "viewport must be non-empty"));
        }
        if (camera.center - camera.eye).magnitude() <= f32::EPSILON {
            log::warn!("Camera eye and center coincide; culling will be disabled until they differ");
        }

        let culling = &self.culling;
        if culling.near <= 0.0 || culling.far <= culling.near {
            return Err(invalid("culling.near/far", format!("need 0 < near < far, got {} / {}", culling.near, culling.far)));
        }

        let animation = &self.animation;
        if animation.slow_step_degrees <= 0.0 || animation.fast_step_degrees <= 0.0 {
            return Err(invalid("animation.*_step_degrees", "joint steps must be positive"));
        }
        if animation.swing_limit_degrees <= 0.0 {
            return Err(invalid("animation.swing_limit_degrees", "limit must be positive"));
        }
        if animation.path_speed < 0.0 {
            return Err(invalid("animation.path_speed", "speed cannot be negative"));
        }

        let input = &self.input;
        if input.min_fov_degrees <= 0.0 || input.max_fov_degrees >= 180.0 || input.min_fov_degrees >= input.max_fov_degrees {
            return Err(invalid("input.min/max_fov_degrees", "need 0 < min < max < 180"));
        }

        Ok(())
    }
}
