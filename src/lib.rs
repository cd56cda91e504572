//! # bevy_patrol
//!
//! A Bevy plugin for actors patrolling waypoint routes, with fenced zones
//! that raise alarms when a patrol walks into them.
//!
//! ## Features
//!
//! - Centripetal, chordal and uniform Catmull-Rom routes through sparse waypoints
//! - Step-per-frame patrols with look-ahead orientation and pause/resume/reset
//! - Optional first-person camera riding along with a patrol
//! - Point-in-polygon fences with debounced enter/exit alarms
//! - Control by actor name through a registry and command messages
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_patrol::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(PatrolPlugin)
//!         .add_plugins(FencePlugin)        // Optional: fence alarms
//!         .add_plugins(PatrolGizmosPlugin) // Optional: draws routes and fences
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands) -> Result {
//!     let guard = commands.spawn((Name::new("guard"), Transform::default())).id();
//!
//!     let route = PatrolRoute::new(vec![
//!         Vec3::new(-5.0, 0.0, 0.0),
//!         Vec3::new(5.0, 0.0, 0.0),
//!         Vec3::new(5.0, 0.0, 5.0),
//!     ]);
//!     let patrol = Patrol::from_route(guard, &route, FollowerConfig::default())?;
//!     commands.spawn((route, patrol.started()));
//!     Ok(())
//! }
//! ```
//!
//! ## Plugins
//!
//! - [`PatrolPlugin`]: Patrol stepping, commands and the name registry (required)
//! - [`FencePlugin`]: Fence containment and alarms (optional)
//! - [`PatrolGizmosPlugin`]: Route and fence drawing (optional, `gizmos` feature)
//! - [`RoutePlugin`]: Route type registration, added by `PatrolPlugin`
//!
//! ## Without Bevy's schedule
//!
//! [`PathFollower`](patrol::PathFollower) and
//! [`point_in_polygon`](fence::point_in_polygon) are plain types and functions
//! and can be driven from any loop:
//!
//! ```ignore
//! let mut follower = PathFollower::new(waypoints, FollowerConfig::default())?;
//! follower.run();
//! while let Some(step) = follower.advance() {
//!     // place the actor
//! }
//! ```

pub mod fence;
pub mod geometry;
pub mod patrol;
pub mod spline;

#[cfg(feature = "gizmos")]
pub mod gizmos;

pub use fence::FencePlugin;
pub use patrol::PatrolPlugin;
pub use spline::RoutePlugin;

#[cfg(feature = "gizmos")]
pub use gizmos::PatrolGizmosPlugin;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::fence::{
        point_in_polygon, Fence, FenceEvent, FenceEventKind, FencePlugin, FenceRegion,
        FenceWatcher,
    };
    pub use crate::patrol::{
        CameraPose, ErrorPolicy, FirstPersonCamera, FollowerConfig, FollowerState, LoopMode,
        PathFollower, Patrol, PatrolAction, PatrolCommand, PatrolError, PatrolFinished,
        PatrolPlugin, PatrolPose, PatrolRegistry, PatrolSettings, PatrolStep, PatrolStepped,
        PoseSink, StepReport, StepSinkFailure,
    };
    pub use crate::spline::{CurveType, PatrolCurve, PatrolRoute, RoutePlugin};

    #[cfg(feature = "gizmos")]
    pub use crate::gizmos::PatrolGizmosPlugin;
}
