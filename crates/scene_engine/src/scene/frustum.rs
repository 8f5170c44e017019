//! View frustum derivation and sphere tests
//!
//! Planes are stored as a point on the plane plus an outward normal. A sphere
//! is outside when its center lies more than `radius` in front of any plane.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{utils, Vec3};
use crate::render::{Camera, FrustumParams};

/// How the four side planes are derived from the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SidePlaneMode {
    /// Offset points along the configured up vector and take normals against
    /// it directly. Slightly off when `up` is not perpendicular to the view
    /// direction.
    #[default]
    Approximate,
    /// Use the camera up re-orthonormalized against the view direction
    Exact,
}

/// Plane through `point` with outward `normal`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane
    pub point: Vec3,
    /// Unit normal pointing out of the frustum
    pub normal: Vec3,
}

impl Plane {
    /// Signed distance of `p` along the normal (positive is outside)
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(&self.normal)
    }
}

/// Plane order inside [`Frustum::planes`]
pub mod plane_index {
    /// Near plane
    pub const NEAR: usize = 0;
    /// Far plane
    pub const FAR: usize = 1;
    /// Right plane
    pub const RIGHT: usize = 2;
    /// Left plane
    pub const LEFT: usize = 3;
    /// Top plane
    pub const TOP: usize = 4;
    /// Bottom plane
    pub const BOTTOM: usize = 5;
}

/// Six culling planes: near, far, right, left, top, bottom
#[derive(Debug, Clone, PartialEq)]
pub struct Frustum {
    /// Planes in [`plane_index`] order
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Derive the frustum for a camera
    ///
    /// Returns `None` for a degenerate camera (coincident eye and target, up
    /// parallel to the view direction, zero aspect or non-finite values).
    /// Callers treat a missing frustum as "everything visible".
    pub fn from_params(params: &FrustumParams, mode: SidePlaneMode) -> Option<Self> {
        let FrustumParams { eye, center, up, fov, aspect, near, far } = *params;
        let scalars_ok = [fov, aspect, near, far].iter().all(|v| v.is_finite())
            && fov > 0.0
            && fov < std::f32::consts::PI
            && aspect > 0.0
            && near > 0.0
            && far > near;
        if !scalars_ok || !utils::is_finite(&eye) {
            return None;
        }

        let forward = utils::try_normalize(center - eye)?;
        let up = utils::try_normalize(up)?;
        let right = utils::try_normalize(forward.cross(&up))?;
        let up = match mode {
            SidePlaneMode::Approximate => up,
            SidePlaneMode::Exact => right.cross(&forward),
        };

        let h_near = 2.0 * (fov / 2.0).tan() * near;
        let w_near = h_near * aspect;
        let near_center = eye + forward * near;

        let right_point = near_center + right * (w_near / 2.0);
        let left_point = near_center - right * (w_near / 2.0);
        let top_point = near_center + up * (h_near / 2.0);
        let bottom_point = near_center - up * (h_near / 2.0);

        let toward = |p: Vec3| utils::try_normalize(p - eye);
        let right_normal = utils::try_normalize(toward(right_point)?.cross(&up))?;
        let left_normal = utils::try_normalize(up.cross(&toward(left_point)?))?;
        let top_normal = utils::try_normalize(right.cross(&toward(top_point)?))?;
        let bottom_normal = utils::try_normalize(toward(bottom_point)?.cross(&right))?;

        Some(Self {
            planes: [
                Plane { point: near_center, normal: -forward },
                Plane { point: eye + forward * far, normal: forward },
                Plane { point: right_point, normal: right_normal },
                Plane { point: left_point, normal: left_normal },
                Plane { point: top_point, normal: top_normal },
                Plane { point: bottom_point, normal: bottom_normal },
            ],
        })
    }

    /// Whether a world-space sphere is at least partly inside
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|plane| plane.signed_distance(center) <= radius)
    }
}

/// Caches the frustum and rebuilds it only when the camera changed
///
/// In demo mode the field of view and aspect used for culling are frozen at
/// toggle time while the pose keeps following the camera, so objects leaving
/// the frozen frustum visibly disappear inside the live view.
#[derive(Debug, Clone)]
pub struct FrustumCuller {
    mode: SidePlaneMode,
    frustum: Option<Frustum>,
    cached: Option<FrustumParams>,
    frozen_lens: Option<(f32, f32)>,
    recomputes: u64,
}

impl FrustumCuller {
    /// Create a culler; the first [`FrustumCuller::refresh`] builds the planes
    pub fn new(mode: SidePlaneMode) -> Self {
        Self { mode, frustum: None, cached: None, frozen_lens: None, recomputes: 0 }
    }

    /// Current frustum, `None` when the camera is degenerate
    pub fn frustum(&self) -> Option<&Frustum> {
        self.frustum.as_ref()
    }

    /// Side-plane derivation in use
    pub fn mode(&self) -> SidePlaneMode {
        self.mode
    }

    /// Number of plane recomputations so far
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }

    /// Whether the lens is frozen (demo mode)
    pub fn is_frozen(&self) -> bool {
        self.frozen_lens.is_some()
    }

    /// Rebuild the planes if the camera changed since the last call
    ///
    /// Returns whether a recompute happened.
    pub fn refresh(&mut self, camera: &Camera) -> bool {
        let params = self.effective_params(camera);
        if self.cached == Some(params) {
            return false;
        }
        self.rebuild(params);
        true
    }

    /// Rebuild the planes unconditionally
    pub fn force_refresh(&mut self, camera: &Camera) {
        let params = self.effective_params(camera);
        self.rebuild(params);
    }

    /// Freeze field of view and aspect at the camera's current values
    pub fn freeze_lens(&mut self, camera: &Camera) {
        self.frozen_lens = Some((camera.fov, camera.aspect));
        log::info!("Culling lens frozen at fov {:.2} deg, aspect {:.3}", utils::rad_to_deg(camera.fov), camera.aspect);
    }

    /// Return to the live camera lens and recompute immediately
    pub fn release_lens(&mut self, camera: &Camera) {
        self.frozen_lens = None;
        log::info!("Culling lens follows the camera again");
        self.force_refresh(camera);
    }

    fn effective_params(&self, camera: &Camera) -> FrustumParams {
        let mut params = camera.frustum_params();
        if let Some((fov, aspect)) = self.frozen_lens {
            params.fov = fov;
            params.aspect = aspect;
        }
        params
    }

    fn rebuild(&mut self, params: FrustumParams) {
        self.frustum = Frustum::from_params(&params, self.mode);
        self.cached = Some(params);
        self.recomputes += 1;
        if self.frustum.is_none() {
            log::warn!("Degenerate camera {:?}; culling disabled until it changes", params);
        } else {
            log::trace!("Frustum recomputed ({} total)", self.recomputes);
        }
    }
}
