//! Rendering command pattern
//!
//! The renderer is a passive collaborator that:
//! - Accepts pre-computed matrices (no transform logic)
//! - Accepts resource handles (no scene management)
//! - Only handles drawing (no lifecycle, input, or timing)

use crate::foundation::math::{Mat4, Vec3};
use crate::render::{GeometryHandle, Material};

/// Shader program identity attached to scene nodes and inherited by their
/// descendants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramId(pub u32);

impl ProgramId {
    /// Phong-lit geometry
    pub const LIT: Self = Self(0);
    /// Unlit solid color
    pub const FLAT: Self = Self(1);
}

/// Draw one mesh with a fully composed world matrix
#[derive(Debug, Clone)]
pub struct DrawRequest {
    /// Mesh to draw
    pub geometry: GeometryHandle,
    /// Model-to-world matrix
    pub model: Mat4,
    /// Surface appearance
    pub material: Material,
    /// Program inherited from the scene tree, if any
    pub program: Option<ProgramId>,
}

/// Draw a bounding sphere around a visible cullable node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsRequest {
    /// World-space center
    pub center: Vec3,
    /// World-space radius
    pub radius: f32,
}

/// How the vertices of a [`LineRequest`] are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTopology {
    /// Consecutive vertices joined into one strip
    Strip,
    /// Independent segments, two vertices each
    List,
}

/// Draw world-space lines (track polylines and control handles)
#[derive(Debug, Clone)]
pub struct LineRequest {
    /// Vertices in world space
    pub points: Vec<Vec3>,
    /// Strip or segment list
    pub topology: LineTopology,
    /// Line color
    pub color: Vec3,
}

impl LineRequest {
    /// Connected strip through `points`
    pub fn strip(points: Vec<Vec3>, color: Vec3) -> Self {
        Self { points, topology: LineTopology::Strip, color }
    }

    /// Independent segments from consecutive pairs
    pub fn list(points: Vec<Vec3>, color: Vec3) -> Self {
        Self { points, topology: LineTopology::List, color }
    }
}

/// Per-frame uniforms shared by all draw requests of a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameUniforms {
    /// World-to-view matrix
    pub view: Mat4,
    /// View-to-clip matrix
    pub projection: Mat4,
    /// Camera position
    pub eye: Vec3,
    /// Point light position, when the scene has one
    pub light: Option<Vec3>,
}
