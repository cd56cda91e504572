//! Dense resampling of waypoint paths.
//!
//! A patrol does not evaluate its spline every frame. The waypoints are
//! sampled once into a [`PatrolCurve`], and the follower then steps through
//! those points one index at a time. Sampling density is tied to the length
//! of the waypoint polyline so that each step covers roughly the same
//! distance regardless of how long the route is.

use bevy::prelude::*;

use super::CurveType;

/// Curve samples per world unit of path length at a speed factor of 1.
pub const SAMPLES_PER_UNIT: f32 = 100.0;

/// Upper bound on the divisions of a single curve.
pub const MAX_DIVISIONS: usize = 1_000_000;

/// Sum of straight-line distances between consecutive waypoints.
pub fn polyline_length(waypoints: &[Vec3]) -> f32 {
    waypoints.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Number of parameter divisions used to sample a path.
///
/// Larger speed factors give sparser sampling, and therefore faster patrols.
/// Always at least 1 and at most [`MAX_DIVISIONS`].
pub fn division_count(length: f32, speed_factor: f32) -> usize {
    let divisions = (length * (SAMPLES_PER_UNIT / speed_factor)).round();
    if divisions.is_nan() || divisions < 1.0 {
        1
    } else if divisions >= MAX_DIVISIONS as f32 {
        MAX_DIVISIONS
    } else {
        divisions as usize
    }
}

/// An immutable, densely sampled patrol path.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolCurve {
    points: Vec<Vec3>,
}

impl PatrolCurve {
    /// Sample the curve through `waypoints` with the given speed factor.
    ///
    /// Returns `None` if the curve type needs more waypoints than supplied.
    pub fn sample(waypoints: &[Vec3], curve_type: CurveType, speed_factor: f32) -> Option<Self> {
        let divisions = division_count(polyline_length(waypoints), speed_factor);
        Self::with_divisions(waypoints, curve_type, divisions)
    }

    /// Sample the curve at `divisions + 1` evenly spaced parameter values.
    pub fn with_divisions(
        waypoints: &[Vec3],
        curve_type: CurveType,
        divisions: usize,
    ) -> Option<Self> {
        if waypoints.len() < curve_type.min_points() {
            return None;
        }

        let divisions = divisions.max(1);
        let points = (0..=divisions)
            .filter_map(|i| curve_type.evaluate(waypoints, i as f32 / divisions as f32))
            .collect();

        Some(Self { points })
    }

    /// The sampled points, in travel order.
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Number of sampled points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Vec3> {
        self.points.last().copied()
    }
}
