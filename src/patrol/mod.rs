//! Patrol plugin for walking actors along waypoint routes.
//!
//! Waypoints are sampled once into a dense curve. A [`Patrol`] then moves its
//! actor one curve point per step, facing a point a little further along the
//! route, until the route is exhausted. By default the patrol then starts over.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_patrol::prelude::*;
//!
//! fn setup(mut commands: Commands) -> Result {
//!     let guard = commands.spawn((Name::new("guard"), Transform::default())).id();
//!
//!     let route = PatrolRoute::new(vec![
//!         Vec3::new(0.0, 0.0, 0.0),
//!         Vec3::new(10.0, 0.0, 0.0),
//!         Vec3::new(10.0, 0.0, 10.0),
//!     ]);
//!     let patrol = Patrol::from_route(guard, &route, FollowerConfig::default())?;
//!
//!     commands.spawn((route, patrol.started()));
//!     Ok(())
//! }
//!
//! fn pause_guard(mut commands: MessageWriter<PatrolCommand>) {
//!     commands.write(PatrolCommand::new("guard", PatrolAction::Toggle));
//! }
//! ```

mod components;
mod error;
mod follower;
mod registry;
mod systems;

pub use components::*;
pub use error::*;
pub use follower::*;
pub use registry::PatrolRegistry;
pub use systems::{advance_patrols, apply_patrol_commands, restart_finished_patrols};

use bevy::prelude::*;

use crate::spline::RoutePlugin;

/// Settings shared by all patrols.
#[derive(Resource, Debug, Clone)]
pub struct PatrolSettings {
    /// Whether patrols advance at all.
    pub enabled: bool,
    /// Steps each running patrol takes per frame.
    pub steps_per_frame: usize,
    /// Where the camera returns when first-person mode is switched off.
    pub overview_camera: CameraPose,
    /// Whether route lines are drawn.
    pub show_routes: bool,
    /// Whether fence outlines are drawn.
    pub show_fences: bool,
    /// Height above the ground at which fence outlines are drawn.
    pub fence_height: f32,
    /// Line width for routes and fences.
    pub line_width: f32,
    /// Color of route lines.
    pub route_color: Color,
    /// Color of fences with nobody inside.
    pub fence_color: Color,
    /// Color of fences with an actor inside.
    pub fence_alert_color: Color,
}

impl Default for PatrolSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            steps_per_frame: 1,
            overview_camera: CameraPose {
                position: Vec3::new(0.0, 10.0, 150.0),
                look_at: Vec3::ZERO,
            },
            show_routes: false,
            show_fences: true,
            fence_height: 0.1,
            line_width: 2.0,
            route_color: Color::srgb(0.94, 1.0, 0.9),
            fence_color: Color::srgb(0.2, 0.74, 0.69),
            fence_alert_color: Color::srgb(1.0, 0.25, 0.37),
        }
    }
}

impl PatrolSettings {
    /// Pause or resume every patrol at once.
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    /// Toggle route line visibility.
    pub fn toggle_routes(&mut self) {
        self.show_routes = !self.show_routes;
    }
}

/// System set containing all patrol stepping systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatrolSystems;

/// Plugin that walks [`Patrol`] actors along their routes.
///
/// Each frame, commands are applied first, then every running patrol takes
/// [`PatrolSettings::steps_per_frame`] steps, then finished patrols with
/// [`LoopMode::Restart`] start over.
pub struct PatrolPlugin;

impl Plugin for PatrolPlugin {
    fn build(&self, app: &mut App) {
        // Ensure RoutePlugin is added
        if !app.is_plugin_added::<RoutePlugin>() {
            app.add_plugins(RoutePlugin);
        }

        app.init_resource::<PatrolSettings>()
            .init_resource::<PatrolRegistry>()
            .register_type::<LoopMode>()
            .register_type::<FollowerState>()
            .register_type::<ErrorPolicy>()
            .register_type::<FollowerConfig>()
            .register_type::<FirstPersonCamera>()
            .add_message::<PatrolStepped>()
            .add_message::<PatrolFinished>()
            .add_message::<PatrolCommand>()
            .add_systems(
                Update,
                (
                    registry::sync_patrol_registry,
                    systems::apply_patrol_commands,
                    systems::advance_patrols,
                    systems::restart_finished_patrols,
                )
                    .chain()
                    .in_set(PatrolSystems),
            );
    }
}
