//! # Rendering System
//!
//! The renderer-facing half of the scene core. The scene graph produces
//! [`DrawRequest`]s with fully composed world matrices; a [`RenderBackend`]
//! turns them into pixels. Nothing here knows about windows or shaders.
//!
//! ## Architecture
//!
//! - **Camera**: look-at perspective camera feeding the view/projection uniforms
//!   and the frustum culler
//! - **Backend**: trait over mesh upload and draw submission
//! - **RecordingBackend**: headless backend used by the demos and tests
//! - **Resource Types**: meshes, materials and the point light

pub mod backend;
pub mod camera;
pub mod commands;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod recorder;

pub use backend::{BackendResult, RenderBackend};
pub use camera::{Camera, FrustumParams};
pub use commands::{BoundsRequest, DrawRequest, FrameUniforms, LineRequest, LineTopology, ProgramId};
pub use lighting::PointLight;
pub use material::Material;
pub use mesh::{GeometryHandle, MeshData, Vertex};
pub use recorder::{RecordedFrame, RecordingBackend};

use crate::foundation::collections::MeshId;

/// Rendering errors
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// A draw referenced a mesh the backend does not hold
    ///
    /// Usually a handle uploaded to a different backend instance.
    #[error("Unknown mesh handle: {0:?}")]
    UnknownMesh(MeshId),

    /// Upload of a mesh with no vertices or no triangles
    #[error("Cannot upload an empty mesh")]
    EmptyMesh,

    /// A draw was submitted outside `begin_frame`/`end_frame`
    #[error("Draw submitted outside of a frame")]
    NoActiveFrame,

    /// Backend-specific error occurred
    #[error("Backend error: {0}")]
    Backend(String),
}
