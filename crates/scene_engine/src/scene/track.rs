//! Closed Bézier tracks
//!
//! A track is a cyclic chain of K cubic curves where the end anchor of each
//! curve is the start anchor of the next. Editable points are numbered
//! `0..3K`: point `3i + j` is control point `j` (0, 1 or 2) of curve `i`.
//! Editing keeps the chain closed and mirrors control-handle moves across the
//! shared anchor so the tangent stays continuous.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::collections::{HandleMap, TrackId};
use crate::foundation::math::{constants, Vec3};
use crate::scene::curve::{BezierCurve, ControlPoints};

/// Largest anchor gap accepted when building a track from control points
const CONTINUITY_TOLERANCE: f32 = 1.0e-3;

/// Track errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    /// Editable point index outside `0..3K`
    #[error("Track point {index} out of range (track has {count} points)")]
    PointIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of editable points
        count: usize,
    },

    /// A track needs at least one curve
    #[error("Track has no curves")]
    Empty,

    /// Curve `curve` does not start where the previous one ends
    #[error("Curve {curve} starts {gap} units away from the previous curve's end")]
    Discontinuous {
        /// Index of the offending curve
        curve: usize,
        /// Distance between the two anchors
        gap: f32,
    },

    /// No track stored under this id
    #[error("Unknown track {0:?}")]
    UnknownTrack(TrackId),
}

/// Table of tracks owned by a scene; path followers refer into it by id
pub type TrackTable = HandleMap<TrackId, Track>;

/// Serialized track: one control-point quadruple per curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackLayout {
    /// Curves in traversal order
    pub curves: Vec<ControlPoints>,
}

impl Default for TrackLayout {
    fn default() -> Self {
        default_loop_layout(8, 60.0, 15.0)
    }
}

impl Config for TrackLayout {
    fn validate(&self) -> Result<(), ConfigError> {
        check_continuity(&self.curves).map_err(|e| ConfigError::Invalid {
            field: "curves",
            reason: e.to_string(),
        })
    }
}

/// Closed chain of Bézier curves
#[derive(Debug, Clone)]
pub struct Track {
    curves: Vec<BezierCurve>,
    handle_lines: Vec<Vec3>,
}

impl Track {
    /// Build a track from curves that already form a closed chain
    ///
    /// # Errors
    /// [`TrackError::Empty`] or [`TrackError::Discontinuous`].
    pub fn new(curves: Vec<BezierCurve>) -> Result<Self, TrackError> {
        let points: Vec<ControlPoints> = curves.iter().map(BezierCurve::control_points).collect();
        check_continuity(&points)?;
        let mut track = Self { curves, handle_lines: Vec::new() };
        track.rebuild_handle_lines();
        log::debug!("Built track with {} curves, length {:.2}", track.curves.len(), track.total_length());
        Ok(track)
    }

    /// Build a track from a layout
    pub fn from_layout(layout: &TrackLayout) -> Result<Self, TrackError> {
        Self::new(layout.curves.iter().copied().map(BezierCurve::from).collect())
    }

    /// Hilly loop of `curve_count` curves around the origin
    pub fn default_loop(curve_count: usize, radius: f32, height: f32) -> Result<Self, TrackError> {
        Self::from_layout(&default_loop_layout(curve_count, radius, height))
    }

    /// Current control points as a layout
    pub fn layout(&self) -> TrackLayout {
        TrackLayout { curves: self.curves.iter().map(BezierCurve::control_points).collect() }
    }

    /// Number of curves (K)
    pub fn curve_count(&self) -> usize {
        self.curves.len()
    }

    /// Number of editable points (3K)
    pub fn point_count(&self) -> usize {
        self.curves.len() * 3
    }

    /// Curve `i`, wrapping modulo K
    pub fn curve(&self, i: usize) -> &BezierCurve {
        &self.curves[i % self.curves.len()]
    }

    /// All curves in order
    pub fn curves(&self) -> &[BezierCurve] {
        &self.curves
    }

    /// Sum of curve arclengths
    pub fn total_length(&self) -> f32 {
        self.curves.iter().map(BezierCurve::arclength).sum()
    }

    /// Whether editable point `index` is an anchor shared by two curves
    pub fn is_anchor(index: usize) -> bool {
        index % 3 == 0
    }

    /// Position of editable point `index`
    pub fn control_point(&self, index: usize) -> Result<Vec3, TrackError> {
        self.check_index(index)?;
        Ok(self.curves[index / 3].control_point(index % 3))
    }

    /// Segment endpoints joining each anchor's two control handles
    ///
    /// Pairs are `(curve[i-1].p2, curve[i].p1)` for every curve `i`.
    pub fn handle_lines(&self) -> &[Vec3] {
        &self.handle_lines
    }

    /// Move editable point `index` by `delta`
    ///
    /// Anchors drag both adjacent handles along. Control handles move the
    /// opposite handle of the same anchor by `-delta`, keeping the two
    /// handles collinear through the anchor.
    ///
    /// # Errors
    /// [`TrackError::PointIndexOutOfRange`] when `index >= 3K`; callers wrap
    /// their selection before calling.
    pub fn move_point(&mut self, index: usize, delta: Vec3) -> Result<(), TrackError> {
        self.check_index(index)?;
        let k = self.curves.len();
        let i = index / 3;
        let previous = (i + k - 1) % k;
        let next = (i + 1) % k;

        match index % 3 {
            0 => {
                self.curves[i].translate_points(&[(0, delta), (1, delta)]);
                self.curves[previous].translate_points(&[(2, delta), (3, delta)]);
            }
            1 => {
                self.curves[i].translate_point(1, delta);
                self.curves[previous].translate_point(2, -delta);
            }
            _ => {
                self.curves[i].translate_point(2, delta);
                self.curves[next].translate_point(1, -delta);
            }
        }
        self.rebuild_handle_lines();
        log::debug!("Moved track point {} by {:?}", index, delta);
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<(), TrackError> {
        let count = self.point_count();
        if index < count {
            Ok(())
        } else {
            Err(TrackError::PointIndexOutOfRange { index, count })
        }
    }

    fn rebuild_handle_lines(&mut self) {
        self.handle_lines.clear();
        for curve in &self.curves {
            self.handle_lines.push(curve.control_point(1));
            self.handle_lines.push(curve.control_point(2));
        }
        self.handle_lines.rotate_right(1);
    }
}

fn check_continuity(curves: &[ControlPoints]) -> Result<(), TrackError> {
    if curves.is_empty() {
        return Err(TrackError::Empty);
    }
    for (i, current) in curves.iter().enumerate() {
        let previous = &curves[(i + curves.len() - 1) % curves.len()];
        let gap = (current.0[0] - previous.0[3]).magnitude();
        if gap > CONTINUITY_TOLERANCE {
            return Err(TrackError::Discontinuous { curve: i, gap });
        }
    }
    Ok(())
}

/// Anchors on a circle with sinusoidal height; handles lie on the loop's
/// tangent so consecutive curves join smoothly
fn default_loop_layout(curve_count: usize, radius: f32, height: f32) -> TrackLayout {
    let k = curve_count.max(1);
    let step = 2.0 * constants::PI / k as f32;
    let handle = radius * 4.0 / 3.0 * (step / 4.0).tan();

    let anchor = |i: usize| {
        let theta = step * i as f32;
        let position = Vec3::new(radius * theta.cos(), height * (2.0 * theta).sin(), radius * theta.sin());
        let slope = 2.0 * height * (2.0 * theta).cos() / radius.max(constants::EPSILON);
        let tangent = Vec3::new(-theta.sin(), slope, theta.cos()).normalize();
        (position, tangent)
    };

    let curves = (0..k)
        .map(|i| {
            let (a0, t0) = anchor(i);
            let (a1, t1) = anchor((i + 1) % k);
            ControlPoints([a0, a0 + t0 * handle, a1 - t1 * handle, a1])
        })
        .collect();
    TrackLayout { curves }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn loop_track() -> Track {
        Track::default_loop(8, 60.0, 15.0).expect("default loop is closed")
    }

    #[test]
    fn test_default_loop_is_closed() {
        let track = loop_track();
        assert_eq!(track.curve_count(), 8);
        assert_eq!(track.point_count(), 24);
        for i in 0..8 {
            assert_relative_eq!(track.curve(i).control_point(3), track.curve(i + 1).control_point(0), epsilon = 1e-4);
        }
    }

    #[test]
    fn test_anchor_move_keeps_shared_anchor_equal() {
        let mut track = loop_track();
        let delta = Vec3::new(0.0, 2.5, -1.0);
        let before = track.curve(0).control_point(0);
        track.move_point(0, delta).expect("in range");
        assert_relative_eq!(track.curve(0).control_point(0), before + delta, epsilon = 1e-5);
        assert_relative_eq!(track.curve(7).control_point(3), track.curve(0).control_point(0), epsilon = 1e-4);
    }

    #[test]
    fn test_handle_move_mirrors_opposite_handle() {
        let mut track = loop_track();
        let delta = Vec3::new(1.0, 0.0, 0.0);
        let p1 = track.curve(3).control_point(1);
        let opposite = track.curve(2).control_point(2);
        track.move_point(10, delta).expect("in range");
        assert_relative_eq!(track.curve(3).control_point(1), p1 + delta, epsilon = 1e-5);
        assert_relative_eq!(track.curve(2).control_point(2), opposite - delta, epsilon = 1e-5);
    }

    #[test]
    fn test_last_handle_wraps_to_first_curve() {
        let mut track = loop_track();
        let delta = Vec3::new(0.0, 0.0, 3.0);
        let first_p1 = track.curve(0).control_point(1);
        track.move_point(23, delta).expect("in range");
        assert_relative_eq!(track.curve(0).control_point(1), first_p1 - delta, epsilon = 1e-5);
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut track = loop_track();
        let result = track.move_point(24, Vec3::x());
        assert_eq!(result, Err(TrackError::PointIndexOutOfRange { index: 24, count: 24 }));
    }

    #[test]
    fn test_handle_lines_pair_handles_across_anchors() {
        let track = loop_track();
        let lines = track.handle_lines();
        assert_eq!(lines.len(), 16);
        assert_relative_eq!(lines[0], track.curve(7).control_point(2));
        assert_relative_eq!(lines[1], track.curve(0).control_point(1));
        assert_relative_eq!(lines[2], track.curve(0).control_point(2));
        assert_relative_eq!(lines[3], track.curve(1).control_point(1));
    }

    #[test]
    fn test_single_curve_anchor_move_translates_whole_curve() {
        let p = Vec3::new(1.0, 0.0, 0.0);
        let curve = BezierCurve::new(p, Vec3::new(2.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), p);
        let mut track = Track::new(vec![curve]).expect("closed single curve");
        track.move_point(0, Vec3::y()).expect("in range");
        assert_relative_eq!(track.curve(0).control_point(0), track.curve(0).control_point(3));
    }

    #[test]
    fn test_discontinuous_layout_is_rejected() {
        let mut layout = TrackLayout::default();
        layout.curves[3].0[0] += Vec3::new(5.0, 0.0, 0.0);
        assert!(matches!(Track::from_layout(&layout), Err(TrackError::Discontinuous { curve: 3, .. })));
        assert!(layout.validate().is_err());
        assert!(matches!(Track::new(Vec::new()), Err(TrackError::Empty)));
    }
}
