//! Patrol demo: two guards walking the yard and a restricted zone.
//!
//! Run with: `cargo run`

use bevy::prelude::*;
use bevy_patrol::prelude::*;

/// Name of the guard that can be paused and ridden in first person.
const LEAD_GUARD: &str = "guard-1";

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins((PatrolPlugin, FencePlugin, PatrolGizmosPlugin))
        .init_resource::<FirstPersonState>()
        .add_systems(Startup, setup)
        .add_systems(Update, (handle_input, log_fence_events))
        .run();
}

#[derive(Resource, Default)]
struct FirstPersonState(bool);

fn yard_loop() -> Vec<Vec3> {
    vec![
        Vec3::new(-55.08, 0.1, 15.45),
        Vec3::new(-5.66, 0.1, 14.78),
        Vec3::new(-5.3, 0.1, -7.37),
        Vec3::new(4.15, 0.1, -7.55),
        Vec3::new(5.03, 0.1, 20.44),
        Vec3::new(57.4, 0.1, 22.28),
        Vec3::new(57.19, 0.1, 33.91),
        Vec3::new(-48.2, 0.1, 30.5),
        Vec3::new(-55.08, 0.1, 15.45),
    ]
}

fn perimeter_loop() -> Vec<Vec3> {
    vec![
        Vec3::new(-75.96, 0.1, 47.16),
        Vec3::new(-21.6, 0.1, 48.44),
        Vec3::new(-9.39, 0.1, 48.27),
        Vec3::new(-6.52, 0.1, 28.42),
        Vec3::new(-4.78, 0.1, -14.94),
        Vec3::new(4.9, 0.1, -15.0),
        Vec3::new(5.21, 0.1, 17.41),
        Vec3::new(6.42, 0.1, 42.17),
        Vec3::new(18.94, 0.1, 47.78),
        Vec3::new(69.62, 0.1, 48.31),
        Vec3::new(69.22, 0.1, 58.25),
        Vec3::new(33.06, 0.1, 59.59),
        Vec3::new(13.88, 0.1, 59.29),
        Vec3::new(-45.34, 0.1, 57.61),
        Vec3::new(-71.48, 0.1, 56.75),
        Vec3::new(-75.96, 0.1, 47.16),
    ]
}

fn restricted_zone() -> FenceRegion {
    FenceRegion::new(vec![
        Vec2::new(-26.69, 14.62),
        Vec2::new(-15.78, 15.53),
        Vec2::new(-15.37, 32.6),
        Vec2::new(-26.99, 30.22),
        Vec2::new(-26.69, 14.62),
    ])
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<PatrolSettings>,
) -> Result {
    // Camera, also used for first-person rides
    commands.spawn((
        Camera3d::default(),
        settings.overview_camera.transform(),
        FirstPersonCamera,
    ));

    // Lighting
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(40.0, 80.0, 40.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // Ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(100.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.27, 0.3),
            ..default()
        })),
    ));

    let fence = commands.spawn(Fence::new(restricted_zone())).id();

    let body = meshes.add(Capsule3d::new(0.4, 1.0));
    let guards = [
        (
            LEAD_GUARD,
            yard_loop(),
            Color::srgb(0.9, 0.3, 0.2),
            true,
        ),
        (
            "guard-0",
            perimeter_loop(),
            Color::srgb(0.2, 0.5, 0.9),
            false,
        ),
    ];

    for (name, waypoints, color, watched) in guards {
        let actor = commands
            .spawn((
                Name::new(name),
                Mesh3d(body.clone()),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: color,
                    ..default()
                })),
                Transform::from_translation(waypoints[0]),
            ))
            .id();

        let route = PatrolRoute::new(waypoints);
        let config = FollowerConfig::default().with_speed_factor(20.0);
        let patrol = Patrol::from_route(actor, &route, config)?.started();

        let mut patrol_entity = commands.spawn((Name::new(format!("{name} patrol")), route, patrol));
        if watched {
            patrol_entity.insert(FenceWatcher::new(fence));
        }
    }

    println!("\n=== Patrol Demo ===");
    println!("Controls:");
    println!("  Space  - Pause/Resume {LEAD_GUARD}");
    println!("  V      - Toggle first-person view");
    println!("  L      - Toggle route lines");
    println!("  R      - Restart {LEAD_GUARD} from the beginning");
    println!("===================\n");

    Ok(())
}

fn handle_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut settings: ResMut<PatrolSettings>,
    mut first_person: ResMut<FirstPersonState>,
    mut commands: MessageWriter<PatrolCommand>,
) {
    if keyboard.just_pressed(KeyCode::Space) {
        commands.write(PatrolCommand::new(LEAD_GUARD, PatrolAction::Toggle));
    }

    if keyboard.just_pressed(KeyCode::KeyV) {
        first_person.0 = !first_person.0;
        commands.write(PatrolCommand::new(
            LEAD_GUARD,
            PatrolAction::FirstPerson(first_person.0),
        ));
    }

    if keyboard.just_pressed(KeyCode::KeyL) {
        settings.toggle_routes();
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        commands.write(PatrolCommand::new(LEAD_GUARD, PatrolAction::Reset));
        commands.write(PatrolCommand::new(LEAD_GUARD, PatrolAction::Run));
    }
}

fn log_fence_events(mut events: MessageReader<FenceEvent>, names: Query<&Name>) {
    for event in events.read() {
        let name = names
            .get(event.actor)
            .map(|n| n.as_str())
            .unwrap_or("unknown");

        match event.kind {
            FenceEventKind::Entered => {
                println!("[{}] Entered the restricted zone, holding", name);
            }
            FenceEventKind::Exited => {
                println!("[{}] Left the restricted zone", name);
            }
            FenceEventKind::AlarmElapsed => {
                println!("[{}] Alarm cleared, resuming", name);
            }
        }
    }
}
