//! Debug drawing of patrol routes and fences.

use bevy::{gizmos::config::GizmoConfigStore, prelude::*};

use crate::fence::Fence;
use crate::patrol::PatrolSettings;
use crate::spline::PatrolRoute;

/// Cached route line samples, rebuilt when the route changes.
#[derive(Component, Debug, Clone, Default)]
pub struct CachedRouteLine {
    pub points: Vec<Vec3>,
}

/// System to keep route line caches in sync with their routes.
pub fn update_route_cache(
    mut commands: Commands,
    routes: Query<(Entity, &PatrolRoute), Changed<PatrolRoute>>,
) {
    for (entity, route) in &routes {
        commands.entity(entity).insert(CachedRouteLine {
            points: route.preview(),
        });
    }
}

/// System to draw visible route lines.
pub fn render_routes(
    settings: Res<PatrolSettings>,
    routes: Query<(&PatrolRoute, &CachedRouteLine)>,
    mut gizmos: Gizmos,
) {
    if !settings.show_routes {
        return;
    }

    for (route, line) in &routes {
        if route.visible && line.points.len() >= 2 {
            gizmos.linestrip(line.points.iter().copied(), settings.route_color);
        }
    }
}

/// System to draw fence outlines, highlighted while occupied.
pub fn render_fences(settings: Res<PatrolSettings>, fences: Query<&Fence>, mut gizmos: Gizmos) {
    if !settings.show_fences {
        return;
    }

    for fence in &fences {
        let vertices = fence.region.vertices();
        let Some(first) = vertices.first() else {
            continue;
        };

        let color = if fence.is_occupied() {
            settings.fence_alert_color
        } else {
            settings.fence_color
        };

        let height = settings.fence_height;
        let outline = vertices
            .iter()
            .chain(std::iter::once(first))
            .map(|v| Vec3::new(v.x, height, v.y));
        gizmos.linestrip(outline, color);
    }
}

/// System to sync patrol settings to gizmo config.
fn sync_gizmo_config(settings: Res<PatrolSettings>, mut config_store: ResMut<GizmoConfigStore>) {
    if !settings.is_changed() {
        return;
    }
    let (config, _) = config_store.config_mut::<DefaultGizmoConfigGroup>();
    config.line.width = settings.line_width;
}

/// Plugin that draws patrol routes and fences with gizmos.
///
/// Requires Bevy's gizmo plugin (part of `DefaultPlugins`). Visibility and
/// colors are controlled through [`PatrolSettings`].
pub struct PatrolGizmosPlugin;

impl Plugin for PatrolGizmosPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PatrolSettings>().add_systems(
            Update,
            (
                sync_gizmo_config,
                update_route_cache,
                render_routes,
                render_fences,
            ),
        );
    }
}
