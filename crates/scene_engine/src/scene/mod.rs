//! Scene management
//!
//! The scene graph proper: owned node tree, bounding spheres, frustum culling,
//! Bézier tracks and the per-frame [`Scene`] driver.

pub mod bounds;
pub mod builders;
pub mod context;
pub mod curve;
pub mod frustum;
pub mod node;
pub mod scene_graph;
pub mod track;

pub use bounds::BoundingSphere;
pub use context::{Axis, SceneContext, SceneFlags};
pub use curve::{BezierCurve, ControlPoints, CURVE_SAMPLES};
pub use frustum::{Frustum, FrustumCuller, Plane, SidePlaneMode};
pub use node::{DrawPass, GeometryNode, NodeKind, SceneNode};
pub use scene_graph::{FrameStats, Scene};
pub use track::{Track, TrackError, TrackLayout, TrackTable};

use crate::render::RenderError;

/// Scene construction and frame errors
#[derive(thiserror::Error, Debug)]
pub enum SceneError {
    /// Mesh or point set with no vertices
    #[error("Geometry has no vertices")]
    EmptyGeometry,

    /// Mesh arrays that do not fit together
    #[error("Malformed mesh: {0}")]
    MalformedMesh(String),

    /// Tried to attach a child to a geometry leaf
    #[error("Cannot add '{child}' under geometry leaf '{parent}'")]
    LeafChild {
        /// Leaf name
        parent: String,
        /// Rejected child name
        child: String,
    },

    /// Track construction or edit failed
    #[error(transparent)]
    Track(#[from] TrackError),

    /// Renderer rejected a request
    #[error(transparent)]
    Render(#[from] RenderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ApplicationConfig;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::input::{InputEvent, KeyCode, MouseButton};
    use crate::render::{MeshData, ProgramId, RecordingBackend};
    use approx::assert_relative_eq;

    fn army_config() -> ApplicationConfig {
        let mut config = ApplicationConfig::default();
        config.camera.eye = Vec3::new(225.0, 80.0, -150.0);
        config.camera.center = Vec3::new(225.0, 0.0, 225.0);
        config
    }

    fn coaster() -> (Scene, RecordingBackend) {
        let mut backend = RecordingBackend::new();
        let mut config = ApplicationConfig::default();
        config.camera.eye = Vec3::new(0.0, 80.0, 150.0);
        let scene = builders::coaster_scene(&mut backend, &config, &TrackLayout::default()).expect("coaster");
        (scene, backend)
    }

    #[test]
    fn test_army_counts_only_visible_robots() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");

        let culled = scene.tick(1.0 / 60.0, &mut backend).expect("tick");
        assert!(culled.visible > 0 && culled.visible < 100, "got {}", culled.visible);

        scene.handle_event(&InputEvent::key(KeyCode::C)).expect("toggle");
        let all = scene.tick(1.0 / 60.0, &mut backend).expect("tick");
        assert_eq!(all.visible, 100);
    }

    #[test]
    fn test_bounds_requests_follow_toggle() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        let stats = scene.tick(0.0, &mut backend).expect("tick");
        assert!(backend.frame().bounds.is_empty());

        scene.handle_event(&InputEvent::key(KeyCode::B)).expect("toggle");
        let with_bounds = scene.tick(0.0, &mut backend).expect("tick");
        assert_eq!(backend.frame().bounds.len(), with_bounds.visible);
        assert_eq!(with_bounds.visible, stats.visible);
    }

    #[test]
    fn test_frustum_recomputed_only_when_camera_changes() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        scene.tick(0.016, &mut backend).expect("tick");
        let before = scene.culler().recompute_count();
        let idle = scene.tick(0.016, &mut backend).expect("tick");
        assert!(!idle.frustum_recomputed);
        assert_eq!(scene.culler().recompute_count(), before);

        scene.handle_event(&InputEvent::Scroll { dy: 1.0 }).expect("zoom");
        assert_eq!(scene.culler().recompute_count(), before + 1);
        scene.handle_event(&InputEvent::Resize { width: 1280, height: 480 }).expect("resize");
        assert_eq!(scene.culler().recompute_count(), before + 2);
    }

    #[test]
    fn test_demo_mode_keeps_culling_lens_while_zooming() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        let baseline = scene.tick(0.0, &mut backend).expect("tick").visible;

        scene.handle_event(&InputEvent::key(KeyCode::D)).expect("demo on");
        for _ in 0..40 {
            scene.handle_event(&InputEvent::Scroll { dy: -1.0 }).expect("zoom out");
        }
        assert_eq!(scene.tick(0.0, &mut backend).expect("tick").visible, baseline);

        scene.handle_event(&InputEvent::key(KeyCode::D)).expect("demo off");
        assert!(scene.tick(0.0, &mut backend).expect("tick").visible >= baseline);
    }

    #[test]
    fn test_pause_stops_joints() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        scene.handle_event(&InputEvent::key(KeyCode::P)).expect("pause");
        let before = scene.root().find("left arm").expect("arm").local;
        let stats = scene.tick(0.016, &mut backend).expect("tick");
        assert!(!stats.animated);
        assert_eq!(scene.root().find("left arm").expect("arm").local, before);

        scene.handle_event(&InputEvent::key(KeyCode::P)).expect("resume");
        scene.tick(0.016, &mut backend).expect("tick");
        assert_ne!(scene.root().find("left arm").expect("arm").local, before);
    }

    #[test]
    fn test_arcball_drag_swings_view_target() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        let center = scene.context().camera.center;

        scene.handle_event(&InputEvent::CursorMoved { x: 320.0, y: 240.0 }).expect("move");
        scene.handle_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed: true }).expect("press");
        scene.handle_event(&InputEvent::CursorMoved { x: 400.0, y: 240.0 }).expect("drag");
        let dragged = scene.context().camera.center;
        assert!((dragged - center).magnitude() > 1.0);

        scene.handle_event(&InputEvent::MouseButton { button: MouseButton::Left, pressed: false }).expect("release");
        scene.handle_event(&InputEvent::CursorMoved { x: 100.0, y: 100.0 }).expect("move");
        assert_eq!(scene.context().camera.center, dragged);
    }

    #[test]
    fn test_coaster_car_moves_and_markers_drawn() {
        let (mut scene, mut backend) = coaster();
        scene.tick(1.0, &mut backend).expect("tick");
        let frame = backend.frame();
        assert_eq!(frame.lines.len(), 8 + 1, "one strip per curve plus handle list");
        let markers = frame.draws.iter().filter(|d| d.program == Some(ProgramId::FLAT)).count();
        assert_eq!(markers, 24 + 1, "track points plus light marker");

        let car = scene.root().find("car").expect("car").local;
        scene.tick(1.0, &mut backend).expect("tick");
        assert_ne!(scene.root().find("car").expect("car").local, car);
    }

    #[test]
    fn test_selection_wraps_and_nudge_edits_track() {
        let (mut scene, _backend) = coaster();
        let track_id = scene.tracks().keys().next().expect("one track");

        scene.handle_event(&InputEvent::key(KeyCode::Left)).expect("select");
        assert_eq!(scene.context().selected_point, 23);
        scene.handle_event(&InputEvent::key(KeyCode::Right)).expect("select");
        scene.handle_event(&InputEvent::key(KeyCode::Right)).expect("select");
        assert_eq!(scene.context().selected_point, 1);

        let before = scene.track(track_id).expect("track").control_point(1).expect("point");
        scene.handle_event(&InputEvent::shift_key(KeyCode::Y)).expect("nudge");
        let after = scene.track(track_id).expect("track").control_point(1).expect("point");
        assert_relative_eq!(after, before - Vec3::y() * 0.5, epsilon = 1e-5);

        scene.handle_event(&InputEvent::Scroll { dy: 2.0 }).expect("scroll nudge");
        let scrolled = scene.track(track_id).expect("track").control_point(1).expect("point");
        assert_relative_eq!(scrolled, before, epsilon = 1e-5);
    }

    #[test]
    fn test_ride_camera_follows_track_and_restores_pose() {
        let (mut scene, mut backend) = coaster();
        let parked = scene.context().camera.eye;
        scene.handle_event(&InputEvent::key(KeyCode::R)).expect("ride");
        let first = scene.tick(0.5, &mut backend).expect("tick");
        assert!(first.frustum_recomputed);
        let riding_eye = scene.context().camera.eye;
        assert!((riding_eye - parked).magnitude() > 1.0);
        assert!(scene.tick(0.5, &mut backend).expect("tick").frustum_recomputed);

        scene.handle_event(&InputEvent::key(KeyCode::R)).expect("park");
        assert_eq!(scene.context().camera.eye, parked);
    }

    #[test]
    fn test_paused_ride_keeps_cached_frustum() {
        let (mut scene, mut backend) = coaster();
        scene.handle_event(&InputEvent::key(KeyCode::R)).expect("ride");
        assert!(scene.tick(0.5, &mut backend).expect("tick").frustum_recomputed);

        scene.handle_event(&InputEvent::key(KeyCode::P)).expect("pause");
        let eye = scene.context().camera.eye;
        let count = scene.culler().recompute_count();
        for _ in 0..3 {
            let stats = scene.tick(0.5, &mut backend).expect("tick");
            assert!(!stats.animated);
            assert!(!stats.frustum_recomputed);
        }
        assert_eq!(scene.culler().recompute_count(), count);
        assert_eq!(scene.context().camera.eye, eye);

        scene.handle_event(&InputEvent::key(KeyCode::P)).expect("resume");
        assert!(scene.tick(0.5, &mut backend).expect("tick").frustum_recomputed);
    }

    #[test]
    fn test_ride_toggle_ignored_without_track() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        scene.handle_event(&InputEvent::key(KeyCode::R)).expect("ride");
        assert!(!scene.context().is(SceneFlags::RIDE_CAMERA));
    }

    #[test]
    fn test_frame_uniforms_carry_light() {
        let mut backend = RecordingBackend::new();
        let mut scene = builders::robot_army_scene(&mut backend, &army_config()).expect("army");
        scene.tick(0.0, &mut backend).expect("tick");
        let uniforms = backend.frame().uniforms.clone().expect("uniforms");
        assert_eq!(uniforms.light, Some(Vec3::new(225.0, 60.0, 225.0)));

        scene.handle_event(&InputEvent::key(KeyCode::L)).expect("light control");
        scene.handle_event(&InputEvent::Scroll { dy: 1.0 }).expect("closer");
        scene.tick(0.0, &mut backend).expect("tick");
        let moved = backend.frame().uniforms.clone().expect("uniforms").light.expect("light");
        assert_relative_eq!(moved, Vec3::new(225.0, 60.0, 225.0) * 0.99, epsilon = 1e-3);
    }

    #[test]
    fn test_upload_rejects_empty_mesh_parts() {
        let mut backend = RecordingBackend::new();
        let mut parts = builders::RobotParts::procedural();
        parts.eye = MeshData { positions: Vec::new(), normals: Vec::new(), triangles: Vec::new() };
        assert!(matches!(parts.upload(&mut backend), Err(SceneError::EmptyGeometry)));
    }

    #[test]
    fn test_empty_scene_draws_nothing() {
        let mut backend = RecordingBackend::new();
        let mut scene = Scene::new(SceneNode::group("empty", Mat4::identity()), &ApplicationConfig::default());
        let stats = scene.tick(0.016, &mut backend).expect("tick");
        assert_eq!(stats.visible, 0);
        assert_eq!(stats.frame, 1);
        assert!(backend.frame().draws.is_empty());
        assert_eq!(backend.mesh_count(), 0);
    }
}
