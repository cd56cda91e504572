mod components;
mod curve;
mod types;

pub use components::*;
pub use curve::*;
pub use types::*;

use bevy::prelude::*;

/// Plugin that registers route types for reflection/serialization.
/// This plugin does NOT move anything - use `PatrolPlugin` for that.
pub struct RoutePlugin;

impl Plugin for RoutePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CurveType>()
            .register_type::<PatrolRoute>();
    }
}
