//! # Scene Engine
//!
//! A hierarchical scene graph core: transforms compose down an owned tree,
//! subtrees are culled against the camera frustum by bounding sphere, and
//! joints and track followers animate local transforms each tick.
//!
//! ## Features
//!
//! - **Scene Graph**: group, geometry, joint and follower nodes with per-subtree
//!   shader program selection
//! - **Frustum Culling**: six-plane sphere test, recomputed only when the
//!   camera changes
//! - **Bézier Tracks**: editable closed cubic tracks with continuity-preserving
//!   point edits and arclength path following
//! - **Headless Rendering**: draws go through [`render::RenderBackend`];
//!   [`render::RecordingBackend`] records them for inspection
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApplicationConfig::default();
//!     let mut backend = RecordingBackend::new();
//!     let mut scene = scene_engine::scene::builders::robot_army_scene(&mut backend, &config)?;
//!     let stats = scene.tick(1.0 / 60.0, &mut backend)?;
//!     println!("{} robots visible", stats.visible);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;

// Scene core
pub mod animation;
pub mod input;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        animation::{AnimationController, OscillatingJoint, PathFollower},
        core::config::{ApplicationConfig, Config, ConfigError},
        foundation::{
            math::{Mat4, Mat4Ext, Vec3},
            time::{FixedStep, FrameClock, Timer},
        },
        input::{InputEvent, KeyBindings, KeyCode, Modifiers, MouseButton},
        render::{Camera, Material, MeshData, PointLight, RecordingBackend, RenderBackend},
        scene::{FrameStats, Scene, SceneError, SceneFlags, SceneNode, Track, TrackLayout},
    };
}
