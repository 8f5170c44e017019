//! Ready-made scenes
//!
//! Both builders take mesh arrays rather than files; the procedural defaults
//! stand in for loaded models in headless runs.

use crate::animation::{JointSpeed, OscillatingJoint, PathFollower, SwingDirection};
use crate::core::config::{AnimationConfig, ApplicationConfig};
use crate::foundation::collections::MeshId;
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use crate::render::{GeometryHandle, Material, MeshData, PointLight, ProgramId, RenderBackend};
use crate::scene::bounds::BoundingSphere;
use crate::scene::context::SceneFlags;
use crate::scene::node::SceneNode;
use crate::scene::scene_graph::Scene;
use crate::scene::track::{Track, TrackLayout};
use crate::scene::SceneError;

/// Half-extent every loaded part is normalized to
pub const PART_HALF_EXTENT: f32 = 7.5;

/// Mesh arrays for the parts of a robot
#[derive(Debug, Clone)]
pub struct RobotParts {
    /// Torso
    pub body: MeshData,
    /// Head
    pub head: MeshData,
    /// Eyeball
    pub eye: MeshData,
    /// Arm and leg
    pub limb: MeshData,
}

impl RobotParts {
    /// Parts built from procedural primitives
    pub fn procedural() -> Self {
        let limb = MeshData::cube();
        let limb = MeshData {
            positions: limb.positions.iter().map(|p| Vec3::new(p.x * 0.3, p.y, p.z * 0.3)).collect(),
            ..limb
        };
        Self {
            body: MeshData::cube(),
            head: MeshData::uv_sphere(12, 16),
            eye: MeshData::uv_sphere(6, 8),
            limb,
        }
    }

    /// Normalize every part to [`PART_HALF_EXTENT`] and upload it
    ///
    /// Each part keeps the bounding sphere of its normalized vertices.
    pub fn upload(self, backend: &mut dyn RenderBackend) -> Result<RobotGeometry, SceneError> {
        let mut upload = |mesh: MeshData| -> Result<RobotPart, SceneError> {
            let mesh = MeshData::new(mesh.positions, mesh.normals, mesh.triangles)?.normalized(PART_HALF_EXTENT)?;
            Ok(RobotPart { bounds: BoundingSphere::from_mesh(&mesh)?, geometry: backend.upload_mesh(&mesh)? })
        };
        Ok(RobotGeometry {
            body: upload(self.body)?,
            head: upload(self.head)?,
            eye: upload(self.eye)?,
            limb: upload(self.limb)?,
        })
    }
}

/// One uploaded part and the sphere around its vertices
#[derive(Debug, Clone, Copy)]
pub struct RobotPart {
    /// Backend mesh
    pub geometry: GeometryHandle,
    /// Object-space bounds
    pub bounds: BoundingSphere,
}

/// Uploaded robot parts
#[derive(Debug, Clone, Copy)]
pub struct RobotGeometry {
    /// Torso
    pub body: RobotPart,
    /// Head
    pub head: RobotPart,
    /// Eyeball
    pub eye: RobotPart,
    /// Arm and leg
    pub limb: RobotPart,
}

impl RobotGeometry {
    /// Bounds of the part uploaded as `mesh`
    pub fn part_bounds(&self, mesh: MeshId) -> Option<BoundingSphere> {
        [self.body, self.head, self.eye, self.limb]
            .into_iter()
            .find(|part| part.geometry.mesh() == mesh)
            .map(|part| part.bounds)
    }
}

/// One robot: body, head with two eyes, swinging arms and legs
///
/// Arms swing fast and legs slow; each pair starts in opposite directions.
pub fn robot(parts: &RobotGeometry, animation: &AnimationConfig) -> Result<SceneNode, SceneError> {
    let metal = Material::phong(Vec3::new(0.6, 0.6, 0.7));
    let eye_white = Material::phong(Vec3::new(0.95, 0.95, 0.95));
    let limb = |name: &str, local: Mat4, speed: JointSpeed, direction: SwingDirection| {
        let joint = OscillatingJoint::from_config(animation, speed, direction);
        SceneNode::joint(name, local, joint).with_child(SceneNode::geometry(format!("{name} mesh"), parts.limb.geometry, metal.clone()))
    };
    let tilt = utils::deg_to_rad(10.0);
    let leg_scale = Mat4::new_nonuniform_scaling(&Vec3::new(1.0, 0.5, 1.0));

    let head = SceneNode::group("head", Mat4::translation(Vec3::new(0.0, 11.25, 0.0)))
        .with_child(SceneNode::geometry("head mesh", parts.head.geometry, metal.clone()))?
        .with_child(
            SceneNode::group("left eye", Mat4::translation(Vec3::new(2.5, -1.0, 6.5)) * Mat4::new_scaling(0.1))
                .with_child(SceneNode::geometry("left eye mesh", parts.eye.geometry, eye_white.clone()))?,
        )?
        .with_child(
            SceneNode::group("right eye", Mat4::translation(Vec3::new(-2.5, -1.0, 6.5)) * Mat4::new_scaling(0.1))
                .with_child(SceneNode::geometry("right eye mesh", parts.eye.geometry, eye_white))?,
        )?;

    SceneNode::group("robot", Mat4::identity())
        .with_program(ProgramId::LIT)
        .with_child(
            SceneNode::group("body", Mat4::identity()).with_child(SceneNode::geometry("body mesh", parts.body.geometry, metal.clone()))?,
        )?
        .with_child(head)?
        .with_child(limb(
            "left arm",
            Mat4::translation(Vec3::new(11.0, 0.0, 0.0)) * Mat4::rotation_about(&Vec3::z_axis(), tilt),
            JointSpeed::Fast,
            SwingDirection::Forward,
        )?)?
        .with_child(limb(
            "right arm",
            Mat4::translation(Vec3::new(-11.0, 0.0, 0.0)) * Mat4::rotation_about(&Vec3::z_axis(), -tilt),
            JointSpeed::Fast,
            SwingDirection::Backward,
        )?)?
        .with_child(limb(
            "left leg",
            leg_scale * Mat4::translation(Vec3::new(4.0, -23.0, 0.0)),
            JointSpeed::Slow,
            SwingDirection::Backward,
        )?)?
        .with_child(limb(
            "right leg",
            leg_scale * Mat4::translation(Vec3::new(-4.0, -23.0, 0.0)),
            JointSpeed::Slow,
            SwingDirection::Forward,
        )?)
}

/// `rows` x `columns` grid of robots `spacing` units apart
///
/// Every grid cell owns its own copy of the robot subtree and is the cullable,
/// counted node of that instance. The cell's sphere is computed from the part
/// meshes and covers the limbs at any swing angle.
pub fn robot_army(
    parts: &RobotGeometry,
    animation: &AnimationConfig,
    rows: usize,
    columns: usize,
    spacing: f32,
) -> Result<SceneNode, SceneError> {
    let template = robot(parts, animation)?;
    let bounds = template
        .subtree_bounds(&|mesh| parts.part_bounds(mesh))
        .ok_or(SceneError::EmptyGeometry)?;
    log::debug!("Robot bounds: center {:?}, radius {:.2}", bounds.center, bounds.radius);
    let mut world = SceneNode::group("army", Mat4::identity());
    for i in 0..rows {
        for j in 0..columns {
            let offset = Vec3::new(spacing * i as f32, 0.0, spacing * j as f32);
            let cell = SceneNode::group(format!("robot {i},{j}"), Mat4::translation(offset))
                .with_bounds(bounds)
                .counted()
                .with_child(template.clone())?;
            world.add_child(cell)?;
        }
    }
    log::info!("Built robot army: {} robots, {} nodes", rows * columns, world.node_count());
    Ok(world)
}

/// Complete robot-army scene with a point light
pub fn robot_army_scene(backend: &mut dyn RenderBackend, config: &ApplicationConfig) -> Result<Scene, SceneError> {
    let parts = RobotParts::procedural().upload(backend)?;
    let army = robot_army(&parts, &config.animation, 10, 10, 50.0)?;
    let mut scene = Scene::new(army, config);
    let marker = backend.upload_mesh(&MeshData::uv_sphere(6, 8))?;
    scene.set_light(PointLight::new(Vec3::new(225.0, 60.0, 225.0)), Some(marker));
    Ok(scene)
}

/// Coaster scene: an editable track, a car riding it and a point light
///
/// Edit mode starts on so the track points are visible.
pub fn coaster_scene(
    backend: &mut dyn RenderBackend,
    config: &ApplicationConfig,
    layout: &TrackLayout,
) -> Result<Scene, SceneError> {
    let track = Track::from_layout(layout)?;
    let car_mesh = backend.upload_mesh(&MeshData::uv_sphere(12, 16).normalized(1.0)?)?;
    let marker = backend.upload_mesh(&MeshData::uv_sphere(6, 8))?;

    let mut scene = Scene::new(SceneNode::group("world", Mat4::identity()).with_program(ProgramId::LIT), config);
    let track_id = scene.add_track(track);

    let car = SceneNode::follower("car", PathFollower::new(track_id, config.animation.path_speed))
        .with_bounds(BoundingSphere::new(Vec3::zeros(), 2.0))
        .counted()
        .with_child(
            SceneNode::group("car body", Mat4::new_scaling(2.0))
                .with_child(SceneNode::geometry("car mesh", car_mesh, Material::phong(Vec3::new(0.8, 0.2, 0.2))))?,
        )?;
    scene.root_mut().add_child(car)?;

    scene.set_track_overlay(track_id, marker, 0.5)?;
    scene.set_ride_track(track_id, config.animation.path_speed, 2.0)?;
    scene.set_light(PointLight::new(Vec3::new(0.0, 40.0, 40.0)), Some(marker));
    scene.context_mut().flags.insert(SceneFlags::EDIT_MODE);
    Ok(scene)
}
