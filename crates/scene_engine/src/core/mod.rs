//! # Core Engine Module
//!
//! Shared abstractions used by every subsystem. Currently this is the unified
//! configuration system.

pub mod config;

pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    AnimationConfig,
    ApplicationConfig,
    CameraConfig,
    Config,
    ConfigError,
    CullingConfig,
    EngineConfig,
    InputConfig,
};
