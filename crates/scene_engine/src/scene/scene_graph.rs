//! Scene: the tree plus everything a frame needs
//!
//! Per tick: animation update, frustum refresh (only when the camera changed,
//! or every animated tick while riding), draw traversal, track overlay, light
//! marker.
//! Input events mutate the camera, the toggles and the track selection between
//! ticks.

use crate::animation::{AnimationController, PathFollower};
use crate::core::config::{ApplicationConfig, InputConfig};
use crate::foundation::collections::TrackId;
use crate::foundation::math::{utils, Mat4, Vec3};
use crate::input::{trackball_point, Action, InputEvent, KeyBindings, MouseButton};
use crate::render::{FrameUniforms, GeometryHandle, LineRequest, Material, PointLight, ProgramId, RenderBackend};
use crate::scene::context::{SceneContext, SceneFlags};
use crate::scene::frustum::FrustumCuller;
use crate::scene::node::{DrawPass, SceneNode};
use crate::scene::track::{Track, TrackError, TrackTable};
use crate::scene::SceneError;

/// Color of the sampled track polylines
const TRACK_COLOR: Vec3 = Vec3::new(0.1, 0.1, 0.1);
/// Color of the control-handle segments
const HANDLE_COLOR: Vec3 = Vec3::new(0.5, 0.5, 0.0);

/// Per-frame statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Frame number, starting at 1
    pub frame: u64,
    /// Visible counted instances
    pub visible: usize,
    /// Whether the frustum planes were rebuilt this frame
    pub frustum_recomputed: bool,
    /// Whether animation advanced this frame
    pub animated: bool,
}

/// Editable track drawn as polylines, point markers and handle lines
#[derive(Debug, Clone)]
struct TrackOverlay {
    track: TrackId,
    marker: GeometryHandle,
    marker_scale: f32,
}

/// Camera seated on a track
#[derive(Debug, Clone)]
struct RideCamera {
    follower: PathFollower,
    seat_height: f32,
    parked_pose: Option<(Vec3, Vec3)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct PointerState {
    position: (f32, f32),
    left_pressed: bool,
    last: Option<Vec3>,
}

/// Complete scene
pub struct Scene {
    root: SceneNode,
    tracks: TrackTable,
    context: SceneContext,
    culler: FrustumCuller,
    animation: AnimationController,
    bindings: KeyBindings,
    input: InputConfig,
    overlay: Option<TrackOverlay>,
    ride: Option<RideCamera>,
    light_marker: Option<GeometryHandle>,
    pointer: PointerState,
    frame: u64,
    quit_requested: bool,
}

impl Scene {
    /// Wrap a tree with the camera, toggles and input settings from `config`
    pub fn new(root: SceneNode, config: &ApplicationConfig) -> Self {
        let context = SceneContext::from_config(config);
        let mut culler = FrustumCuller::new(config.culling.side_planes);
        culler.refresh(&context.camera);
        log::info!("Scene created with {} nodes", root.node_count());
        Self {
            root,
            tracks: TrackTable::with_key(),
            context,
            culler,
            animation: AnimationController::new(),
            bindings: KeyBindings::default(),
            input: config.input.clone(),
            overlay: None,
            ride: None,
            light_marker: None,
            pointer: PointerState::default(),
            frame: 0,
            quit_requested: false,
        }
    }

    /// Root of the tree
    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    /// Mutable root of the tree
    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    /// Frame context
    pub fn context(&self) -> &SceneContext {
        &self.context
    }

    /// Mutable frame context
    pub fn context_mut(&mut self) -> &mut SceneContext {
        &mut self.context
    }

    /// Frustum culler
    pub fn culler(&self) -> &FrustumCuller {
        &self.culler
    }

    /// Animation controller
    pub fn animation(&self) -> &AnimationController {
        &self.animation
    }

    /// Replace the key bindings
    pub fn set_bindings(&mut self, bindings: KeyBindings) {
        self.bindings = bindings;
    }

    /// Whether a Quit action was received
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Store a track; followers refer to it by the returned id
    pub fn add_track(&mut self, track: Track) -> TrackId {
        self.tracks.insert(track)
    }

    /// Track by id
    pub fn track(&self, id: TrackId) -> Result<&Track, TrackError> {
        self.tracks.get(id).ok_or(TrackError::UnknownTrack(id))
    }

    /// All tracks
    pub fn tracks(&self) -> &TrackTable {
        &self.tracks
    }

    /// Draw `track` with point markers and make it the editing target
    pub fn set_track_overlay(&mut self, track: TrackId, marker: GeometryHandle, marker_scale: f32) -> Result<(), SceneError> {
        self.track(track)?;
        self.overlay = Some(TrackOverlay { track, marker, marker_scale });
        self.context.selected_point = 0;
        Ok(())
    }

    /// Seat the ride camera on `track`
    pub fn set_ride_track(&mut self, track: TrackId, speed: f32, seat_height: f32) -> Result<(), SceneError> {
        self.track(track)?;
        self.ride = Some(RideCamera { follower: PathFollower::new(track, speed), seat_height, parked_pose: None });
        Ok(())
    }

    /// Add a point light drawn with `marker`
    pub fn set_light(&mut self, light: PointLight, marker: Option<GeometryHandle>) {
        self.context.light = Some(light);
        self.light_marker = marker;
    }

    /// Apply one input event
    ///
    /// # Errors
    /// Track edits can fail with [`SceneError::Track`].
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<(), SceneError> {
        match *event {
            InputEvent::Resize { width, height } => {
                self.context.viewport = (width, height);
                if self.context.camera.set_viewport(width, height) {
                    self.culler.refresh(&self.context.camera);
                }
            }
            InputEvent::CursorMoved { x, y } => self.pointer_moved(x, y),
            InputEvent::MouseButton { button: MouseButton::Left, pressed } => {
                self.pointer.left_pressed = pressed;
                let (x, y) = self.pointer.position;
                let (w, h) = self.context.viewport;
                self.pointer.last = Some(trackball_point(x, y, w, h));
            }
            InputEvent::MouseButton { .. } => {}
            InputEvent::Scroll { dy } => self.scrolled(dy)?,
            InputEvent::Key { key, modifiers } => {
                if let Some(action) = self.bindings.action_for(key, modifiers) {
                    self.apply_action(action)?;
                }
            }
        }
        Ok(())
    }

    /// Advance animation by `dt` seconds and draw one frame
    pub fn tick(&mut self, dt: f32, backend: &mut dyn RenderBackend) -> Result<FrameStats, SceneError> {
        let animated = self.animation.update(&mut self.root, &self.tracks, dt);
        if animated {
            if let Some(ride) = &mut self.ride {
                if let Some(track) = self.tracks.get(ride.follower.track()) {
                    ride.follower.update(track, dt);
                }
            }
        }

        let seated = self.context.is(SceneFlags::RIDE_CAMERA) && self.seat_camera();
        let frustum_recomputed = if seated && animated {
            self.culler.force_refresh(&self.context.camera);
            true
        } else {
            self.culler.refresh(&self.context.camera)
        };

        let camera = &self.context.camera;
        backend.begin_frame(&FrameUniforms {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            eye: camera.eye,
            light: self.context.light.as_ref().map(|light| light.position),
        })?;

        let visible = {
            let mut pass = DrawPass {
                backend: &mut *backend,
                frustum: self.culler.frustum(),
                culling: self.context.is(SceneFlags::CULLING),
                show_bounds: self.context.is(SceneFlags::SHOW_BOUNDS),
            };
            self.root.draw(&Mat4::identity(), None, &mut pass)?
        };

        self.draw_overlay(backend)?;
        if let (Some(light), Some(marker)) = (&self.context.light, &self.light_marker) {
            marker.draw(backend, light.marker_transform(), &light.marker_material(), Some(ProgramId::FLAT))?;
        }
        backend.end_frame()?;

        self.frame += 1;
        log::debug!("Frame {}: {} visible", self.frame, visible);
        Ok(FrameStats { frame: self.frame, visible, frustum_recomputed, animated })
    }

    fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.position = (x, y);
        let (w, h) = self.context.viewport;
        let current = trackball_point(x, y, w, h);

        if self.pointer.left_pressed {
            if let Some(last) = self.pointer.last {
                let sensitivity = self.input.orbit_sensitivity;
                let light_control = self.context.is(SceneFlags::LIGHT_CONTROL);
                let riding = self.context.is(SceneFlags::RIDE_CAMERA);
                match (&mut self.context.light, light_control, riding) {
                    (Some(light), true, _) => light.orbit(last, current, sensitivity),
                    (_, _, false) => {
                        self.context.camera.orbit(last, current, sensitivity);
                        self.culler.refresh(&self.context.camera);
                    }
                    _ => {}
                }
            }
        }
        self.pointer.last = Some(current);
    }

    fn scrolled(&mut self, dy: f32) -> Result<(), SceneError> {
        if dy == 0.0 || !dy.is_finite() {
            return Ok(());
        }
        if self.context.is(SceneFlags::EDIT_MODE) && self.overlay.is_some() {
            let delta = self.context.edit_axis.unit() * (dy.signum() * self.input.nudge_step);
            return self.nudge_selected(delta);
        }
        if self.context.is(SceneFlags::LIGHT_CONTROL) {
            if let Some(light) = &mut self.context.light {
                light.change_distance(dy);
                return Ok(());
            }
        }
        let input = &self.input;
        self.context.camera.zoom(dy, input.zoom_step_degrees, input.min_fov_degrees, input.max_fov_degrees);
        self.culler.refresh(&self.context.camera);
        Ok(())
    }

    fn apply_action(&mut self, action: Action) -> Result<(), SceneError> {
        match action {
            Action::Toggle(flag) => self.toggle(flag),
            Action::SelectNext | Action::SelectPrevious => {
                if let Some(overlay) = &self.overlay {
                    let count = self.track(overlay.track)?.point_count();
                    let offset = if action == Action::SelectNext { 1 } else { -1 };
                    self.context.step_selection(offset, count);
                }
            }
            Action::Nudge { axis, negative } => {
                self.context.edit_axis = axis;
                let sign = if negative { -1.0 } else { 1.0 };
                self.nudge_selected(axis.unit() * (sign * self.input.nudge_step))?;
            }
            Action::Quit => self.quit_requested = true,
        }
        Ok(())
    }

    fn toggle(&mut self, flag: SceneFlags) {
        if flag == SceneFlags::RIDE_CAMERA && self.ride.is_none() {
            log::warn!("Scene has no ride track; ignoring ride camera toggle");
            return;
        }
        let on = self.context.toggle(flag);

        if flag == SceneFlags::PAUSED {
            self.animation.set_paused(on);
        } else if flag == SceneFlags::DEMO_MODE {
            if on {
                self.culler.freeze_lens(&self.context.camera);
            } else {
                self.culler.release_lens(&self.context.camera);
            }
        } else if flag == SceneFlags::RIDE_CAMERA {
            let camera = &mut self.context.camera;
            if let Some(ride) = &mut self.ride {
                if on {
                    ride.parked_pose = Some((camera.eye, camera.center));
                } else if let Some((eye, center)) = ride.parked_pose.take() {
                    camera.set_pose(eye, center);
                }
            }
            self.culler.force_refresh(&self.context.camera);
        }
    }

    fn nudge_selected(&mut self, delta: Vec3) -> Result<(), SceneError> {
        let Some(overlay) = &self.overlay else {
            return Ok(());
        };
        let id = overlay.track;
        let track = self.tracks.get_mut(id).ok_or(TrackError::UnknownTrack(id))?;
        let index = self.context.selected_point % track.point_count();
        track.move_point(index, delta)?;
        Ok(())
    }

    /// Place the camera on the ride track; returns whether it moved
    fn seat_camera(&mut self) -> bool {
        let Some(ride) = &self.ride else {
            return false;
        };
        let Some(track) = self.tracks.get(ride.follower.track()) else {
            return false;
        };
        let (position, tangent) = ride.follower.pose(track);
        let camera = &mut self.context.camera;
        let eye = position + camera.up * ride.seat_height;
        let forward = utils::try_normalize(tangent)
            .or_else(|| camera.forward())
            .unwrap_or_else(|| -Vec3::z());
        camera.set_pose(eye, eye + forward);
        true
    }

    fn draw_overlay(&self, backend: &mut dyn RenderBackend) -> Result<(), SceneError> {
        let Some(overlay) = &self.overlay else {
            return Ok(());
        };
        let track = self.track(overlay.track)?;

        for curve in track.curves() {
            backend.draw_lines(&LineRequest::strip(curve.polyline().to_vec(), TRACK_COLOR))?;
        }

        if !self.context.is(SceneFlags::EDIT_MODE) {
            return Ok(());
        }

        let selected = self.context.selected_point % track.point_count();
        for index in 0..track.point_count() {
            let position = track.control_point(index)?;
            let material = if index == selected {
                Material::selection_marker()
            } else if Track::is_anchor(index) {
                Material::anchor_marker()
            } else {
                Material::control_marker()
            };
            let model = Mat4::new_translation(&position) * Mat4::new_scaling(overlay.marker_scale);
            overlay.marker.draw(backend, model, &material, Some(ProgramId::FLAT))?;
        }
        backend.draw_lines(&LineRequest::list(track.handle_lines().to_vec(), HANDLE_COLOR))?;
        Ok(())
    }
}
