use bevy::prelude::*;

use super::types::CurveType;
use super::PatrolCurve;

/// Route preview samples per waypoint, used when drawing the route line.
pub const ROUTE_PREVIEW_SAMPLES: usize = 10;

/// A patrol route: the waypoints an actor walks through.
///
/// The route is only a description. A [`Patrol`](crate::patrol::Patrol)
/// copies the waypoints when it is created and owns its own sampled curve.
#[derive(Component, Debug, Clone, Reflect, Default)]
#[reflect(Component)]
pub struct PatrolRoute {
    /// The interpolation used between waypoints.
    pub curve_type: CurveType,
    /// Waypoints in travel order.
    pub waypoints: Vec<Vec3>,
    /// Whether the route line is drawn while routes are shown.
    pub visible: bool,
}

impl PatrolRoute {
    /// Create a new route through the given waypoints.
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            curve_type: CurveType::default(),
            waypoints,
            visible: true,
        }
    }

    /// Set the interpolation type.
    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    /// Show or hide the route line.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Check if the route has enough waypoints to be followed.
    pub fn is_valid(&self) -> bool {
        self.waypoints.len() >= self.curve_type.min_points()
    }

    /// Total straight-line length through the waypoints.
    pub fn length(&self) -> f32 {
        super::polyline_length(&self.waypoints)
    }

    /// Sample the route line for display.
    pub fn preview(&self) -> Vec<Vec3> {
        let divisions = self.waypoints.len() * ROUTE_PREVIEW_SAMPLES;
        PatrolCurve::with_divisions(&self.waypoints, self.curve_type, divisions)
            .map(|curve| curve.points().to_vec())
            .unwrap_or_default()
    }

    /// Toggle route line visibility.
    pub fn toggle_visible(&mut self) {
        self.visible = !self.visible;
    }
}
