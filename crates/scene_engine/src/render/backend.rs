//! Backend abstraction trait for the rendering system
//!
//! The scene core never talks to a graphics API directly. Anything that can
//! upload meshes and accept draw requests can render a scene.

use crate::render::{BoundsRequest, DrawRequest, FrameUniforms, GeometryHandle, LineRequest, MeshData, RenderError};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Main rendering backend trait
pub trait RenderBackend {
    /// Upload mesh arrays and return a handle for later draws
    fn upload_mesh(&mut self, mesh: &MeshData) -> BackendResult<GeometryHandle>;

    /// Start a frame with the given uniforms
    fn begin_frame(&mut self, uniforms: &FrameUniforms) -> BackendResult<()>;

    /// Draw one mesh
    fn draw_mesh(&mut self, request: &DrawRequest) -> BackendResult<()>;

    /// Draw a bounding sphere
    fn draw_bounds(&mut self, request: &BoundsRequest) -> BackendResult<()>;

    /// Draw world-space lines
    fn draw_lines(&mut self, request: &LineRequest) -> BackendResult<()>;

    /// Finish the frame
    fn end_frame(&mut self) -> BackendResult<()>;
}
