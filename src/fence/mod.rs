//! Fenced zones and patrol alarms.
//!
//! A [`Fence`] is a polygon on the ground plane. Adding a [`FenceWatcher`] next
//! to a [`Patrol`](crate::patrol::Patrol) tests every step of that patrol
//! against the fence and writes a [`FenceEvent`] whenever the actor crosses
//! the boundary.
//!
//! # Example
//!
//! ```rust,ignore
//! use bevy::prelude::*;
//! use bevy_patrol::prelude::*;
//!
//! fn setup(mut commands: Commands, guard: Entity, patrol: Patrol) {
//!     let fence = commands
//!         .spawn(Fence::new(FenceRegion::new(vec![
//!             Vec2::new(-26.7, 14.6),
//!             Vec2::new(-15.8, 15.5),
//!             Vec2::new(-15.4, 32.6),
//!             Vec2::new(-27.0, 30.2),
//!         ])))
//!         .id();
//!
//!     // Pause for 5 seconds whenever the guard walks into the zone
//!     commands.spawn((patrol, FenceWatcher::new(fence)));
//! }
//! ```

mod components;
mod polygon;
mod systems;

pub use components::*;
pub use polygon::*;
pub use systems::{
    cancel_alarms_on_command, release_removed_watchers, tick_fence_alarms, watch_fences,
};

use bevy::prelude::*;

use crate::patrol::{PatrolPlugin, PatrolSystems};

/// System set containing the fence watching systems.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FenceSystems;

/// Plugin that watches patrols against fences.
pub struct FencePlugin;

impl Plugin for FencePlugin {
    fn build(&self, app: &mut App) {
        // Ensure PatrolPlugin is added
        if !app.is_plugin_added::<PatrolPlugin>() {
            app.add_plugins(PatrolPlugin);
        }

        app.register_type::<Fence>()
            .register_type::<FenceRegion>()
            .register_type::<FenceWatcher>()
            .add_message::<FenceEvent>()
            .add_systems(
                Update,
                (
                    systems::cancel_alarms_on_command,
                    systems::watch_fences,
                    systems::tick_fence_alarms,
                    systems::release_removed_watchers,
                )
                    .chain()
                    .in_set(FenceSystems)
                    .after(PatrolSystems),
            );
    }
}
