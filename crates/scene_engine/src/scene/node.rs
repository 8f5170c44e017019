//! Scene tree nodes
//!
//! A [`SceneNode`] owns its children. Every node has a local transform
//! relative to its parent; the world transform of a child is
//! `parent_world * local`. What a node does beyond transforming its subtree is
//! decided by its [`NodeKind`].

use crate::animation::{OscillatingJoint, PathFollower};
use crate::foundation::collections::MeshId;
use crate::foundation::math::Mat4;
use crate::render::{BackendResult, BoundsRequest, GeometryHandle, Material, ProgramId, RenderBackend};
use crate::scene::bounds::BoundingSphere;
use crate::scene::frustum::Frustum;
use crate::scene::track::TrackTable;
use crate::scene::SceneError;

/// Drawable leaf payload
#[derive(Debug, Clone)]
pub struct GeometryNode {
    /// Mesh to draw
    pub geometry: GeometryHandle,
    /// Surface appearance
    pub material: Material,
}

/// What a node does in addition to transforming its children
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Plain transform group
    Group,
    /// Drawable leaf; cannot have children
    Geometry(GeometryNode),
    /// Group whose local transform swings every tick
    Joint(OscillatingJoint),
    /// Group whose local transform follows a track
    Follower(PathFollower),
}

/// Per-draw traversal state
pub struct DrawPass<'a> {
    /// Receives draw requests
    pub backend: &'a mut dyn RenderBackend,
    /// Culling frustum, `None` when the camera is degenerate
    pub frustum: Option<&'a Frustum>,
    /// Skip subtrees whose bounding sphere is outside the frustum
    pub culling: bool,
    /// Emit a bounds request for every visible cullable node
    pub show_bounds: bool,
}

/// Node of the scene tree
#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    /// Transform relative to the parent
    pub local: Mat4,
    kind: NodeKind,
    children: Vec<SceneNode>,
    program: Option<ProgramId>,
    cull: Option<BoundingSphere>,
    counted: bool,
}

impl SceneNode {
    fn with_kind(name: impl Into<String>, local: Mat4, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            local,
            kind,
            children: Vec::new(),
            program: None,
            cull: None,
            counted: false,
        }
    }

    /// Transform group
    pub fn group(name: impl Into<String>, local: Mat4) -> Self {
        Self::with_kind(name, local, NodeKind::Group)
    }

    /// Drawable leaf with an identity local transform
    pub fn geometry(name: impl Into<String>, geometry: GeometryHandle, material: Material) -> Self {
        Self::with_kind(name, Mat4::identity(), NodeKind::Geometry(GeometryNode { geometry, material }))
    }

    /// Oscillating joint group
    pub fn joint(name: impl Into<String>, local: Mat4, joint: OscillatingJoint) -> Self {
        Self::with_kind(name, local, NodeKind::Joint(joint))
    }

    /// Track-following group
    pub fn follower(name: impl Into<String>, follower: PathFollower) -> Self {
        Self::with_kind(name, Mat4::identity(), NodeKind::Follower(follower))
    }

    /// Tag this subtree with a shader program
    pub fn with_program(mut self, program: ProgramId) -> Self {
        self.program = Some(program);
        self
    }

    /// Make this node cullable against `bounds` (object space)
    pub fn with_bounds(mut self, bounds: BoundingSphere) -> Self {
        self.cull = Some(bounds);
        self
    }

    /// Count this node as one visible instance when drawn
    pub fn counted(mut self) -> Self {
        self.counted = true;
        self
    }

    /// Builder form of [`SceneNode::add_child`]
    pub fn with_child(mut self, child: SceneNode) -> Result<Self, SceneError> {
        self.add_child(child)?;
        Ok(self)
    }

    /// Append a child; traversal follows insertion order
    ///
    /// # Errors
    /// [`SceneError::LeafChild`] when this node is a geometry leaf.
    pub fn add_child(&mut self, child: SceneNode) -> Result<&mut SceneNode, SceneError> {
        if matches!(self.kind, NodeKind::Geometry(_)) {
            return Err(SceneError::LeafChild { parent: self.name.clone(), child: child.name });
        }
        self.children.push(child);
        let last = self.children.len() - 1;
        Ok(&mut self.children[last])
    }

    /// Node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Mutable node kind
    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Children in traversal order
    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    /// Own program tag (not the inherited one)
    pub fn program(&self) -> Option<ProgramId> {
        self.program
    }

    /// Cull volume, if this node is cullable
    pub fn bounds(&self) -> Option<&BoundingSphere> {
        self.cull.as_ref()
    }

    /// Depth-first search by name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }

    /// Mutable depth-first search by name
    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(name))
    }

    /// Sphere in the parent's frame enclosing every pose of this subtree
    ///
    /// `mesh_bounds` gives the object-space sphere of each mesh. Joint content
    /// is swept about the pivot, so the result holds at any swing angle.
    /// Followers are bounded at their current pose only. Returns `None` when
    /// the subtree has no geometry with known bounds.
    pub fn subtree_bounds(&self, mesh_bounds: &dyn Fn(MeshId) -> Option<BoundingSphere>) -> Option<BoundingSphere> {
        let content = match &self.kind {
            NodeKind::Geometry(leaf) => mesh_bounds(leaf.geometry.mesh()),
            _ => self
                .children
                .iter()
                .filter_map(|child| child.subtree_bounds(mesh_bounds))
                .reduce(|a, b| a.merged(&b)),
        }?;
        let content = match &self.kind {
            NodeKind::Joint(joint) => content.swept_about(joint.pivot()),
            _ => content,
        };
        Some(content.transformed(&self.local))
    }

    /// Number of nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Advance motion on this node, then update every child in order
    pub fn update(&mut self, dt: f32, tracks: &TrackTable) {
        match &mut self.kind {
            NodeKind::Joint(joint) => joint.advance(&mut self.local),
            NodeKind::Follower(follower) => match tracks.get(follower.track()) {
                Some(track) => {
                    follower.update(track, dt);
                    self.local = follower.transform(track);
                }
                None => log::trace!("Follower '{}' refers to a removed track", self.name),
            },
            NodeKind::Group | NodeKind::Geometry(_) => {}
        }

        for child in &mut self.children {
            child.update(dt, tracks);
        }
    }

    /// Draw this subtree under `parent_world`
    ///
    /// `inherited` is the program tag of the nearest tagged ancestor. Returns
    /// the number of visible counted nodes in the subtree.
    pub fn draw(&self, parent_world: &Mat4, inherited: Option<ProgramId>, pass: &mut DrawPass<'_>) -> BackendResult<usize> {
        let world = parent_world * self.local;
        let program = self.program.or(inherited);

        if let Some(bounds) = &self.cull {
            let sphere = bounds.transformed(&world);
            if pass.culling {
                if let Some(frustum) = pass.frustum {
                    if !frustum.intersects_sphere(sphere.center, sphere.radius) {
                        return Ok(0);
                    }
                }
            }
            if pass.show_bounds {
                pass.backend.draw_bounds(&BoundsRequest { center: sphere.center, radius: sphere.radius })?;
            }
        }

        if let NodeKind::Geometry(leaf) = &self.kind {
            leaf.geometry.draw(&mut *pass.backend, world, &leaf.material, program)?;
            return Ok(0);
        }

        let mut visible = usize::from(self.counted);
        for child in &self.children {
            visible += child.draw(&world, program, pass)?;
        }
        Ok(visible)
    }
}
