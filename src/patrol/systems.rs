use bevy::prelude::*;

use super::{
    FirstPersonCamera, LoopMode, Patrol, PatrolAction, PatrolCommand, PatrolFinished,
    PatrolRegistry, PatrolSettings, PatrolStep, PatrolStepped, StepReport, StepSinkFailure,
};

/// Apply [`PatrolCommand`] messages to the patrols they name.
pub fn apply_patrol_commands(
    mut commands: MessageReader<PatrolCommand>,
    registry: Res<PatrolRegistry>,
    settings: Res<PatrolSettings>,
    mut patrols: Query<&mut Patrol>,
    mut cameras: Query<&mut Transform, With<FirstPersonCamera>>,
) {
    for command in commands.read() {
        let Some(entity) = registry.get(&command.actor) else {
            warn!("No patrol registered for '{}'; ignoring {:?}", command.actor, command.action);
            continue;
        };
        let Ok(mut patrol) = patrols.get_mut(entity) else {
            warn!("Patrol for '{}' no longer exists", command.actor);
            continue;
        };

        match command.action {
            PatrolAction::Run => patrol.run(),
            PatrolAction::Stop => patrol.stop(),
            PatrolAction::Toggle => patrol.toggle(),
            PatrolAction::Reset => patrol.reset(),
            PatrolAction::FirstPerson(enabled) => {
                patrol.set_first_person(enabled);
                if !enabled {
                    // Return to the overview shot
                    let overview = settings.overview_camera.transform();
                    for mut camera in &mut cameras {
                        camera.translation = overview.translation;
                        camera.rotation = overview.rotation;
                    }
                }
            }
        }
        debug!("Patrol '{}': {:?}", command.actor, command.action);
    }
}

/// Advance every running patrol and apply the poses to their actors.
pub fn advance_patrols(
    settings: Res<PatrolSettings>,
    mut patrols: Query<(Entity, &mut Patrol)>,
    mut actors: Query<&mut Transform, Without<FirstPersonCamera>>,
    mut cameras: Query<&mut Transform, With<FirstPersonCamera>>,
    mut stepped: MessageWriter<PatrolStepped>,
    mut finished: MessageWriter<PatrolFinished>,
) {
    if !settings.enabled {
        return;
    }

    for (entity, mut patrol) in &mut patrols {
        let actor = patrol.actor;

        // Applies a pose to the actor, and to the camera in first-person mode
        let mut sink = |step: &PatrolStep| -> Result<(), StepSinkFailure> {
            let PatrolStep::Pose(pose) = step else {
                return Ok(());
            };
            let Ok(mut transform) = actors.get_mut(actor) else {
                return Err(StepSinkFailure::new(format!("actor {:?} not found", actor)));
            };
            transform.translation = pose.position;
            transform.rotation = pose.rotation;

            if let Some(camera_pose) = pose.camera {
                let target = camera_pose.transform();
                for mut camera in &mut cameras {
                    camera.translation = target.translation;
                    camera.rotation = target.rotation;
                }
            }
            Ok(())
        };

        for _ in 0..settings.steps_per_frame {
            let Some(report) = patrol.follower_mut().advance_with(&mut sink) else {
                break;
            };

            let StepReport::Applied(step) = report else {
                continue;
            };

            stepped.write(PatrolStepped {
                patrol: entity,
                actor,
                step,
            });

            if let PatrolStep::Done { last } = step {
                finished.write(PatrolFinished {
                    patrol: entity,
                    actor,
                    last,
                });
                break;
            }
        }
    }
}

/// Restart finished patrols whose loop mode asks for it.
pub fn restart_finished_patrols(
    mut finished: MessageReader<PatrolFinished>,
    mut patrols: Query<&mut Patrol>,
) {
    for event in finished.read() {
        let Ok(mut patrol) = patrols.get_mut(event.patrol) else {
            continue;
        };

        if patrol.loop_mode == LoopMode::Restart && patrol.follower().is_finished() {
            patrol.reset();
            patrol.run();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::{FollowerConfig, PatrolPlugin, PatrolSystems, DEFAULT_EYE_HEIGHT};

    #[derive(Resource, Default)]
    struct Seen {
        stepped: usize,
        finished: usize,
    }

    fn count_messages(
        mut seen: ResMut<Seen>,
        mut stepped: MessageReader<PatrolStepped>,
        mut finished: MessageReader<PatrolFinished>,
    ) {
        seen.stepped += stepped.read().count();
        seen.finished += finished.read().count();
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins(PatrolPlugin)
            .init_resource::<Seen>()
            .add_systems(Update, count_messages.after(PatrolSystems));
        app
    }

    /// A straight 1-unit walk along -Z sampled into 5 points.
    fn short_patrol(actor: Entity) -> Patrol {
        Patrol::new(
            actor,
            vec![Vec3::ZERO, Vec3::NEG_Z],
            FollowerConfig::default().with_speed_factor(25.0),
        )
        .unwrap()
    }

    fn spawn_guard(app: &mut App) -> (Entity, Entity) {
        let actor = app
            .world_mut()
            .spawn((Name::new("guard"), Transform::default()))
            .id();
        let patrol = app.world_mut().spawn(short_patrol(actor).started()).id();
        (actor, patrol)
    }

    fn patrol(app: &App, entity: Entity) -> &Patrol {
        app.world().get::<Patrol>(entity).unwrap()
    }

    #[test]
    fn test_actor_follows_curve() {
        let mut app = test_app();
        let (actor, patrol_entity) = spawn_guard(&mut app);

        app.update();
        app.update();

        let expected = patrol(&app, patrol_entity).follower().curve().unwrap().points()[1];
        let transform = app.world().get::<Transform>(actor).unwrap();
        assert!((transform.translation - expected).length() < 1e-5);
        assert_eq!(app.world().resource::<Seen>().stepped, 2);
    }

    #[test]
    fn test_stopped_patrol_does_not_step() {
        let mut app = test_app();
        let (_, patrol_entity) = spawn_guard(&mut app);

        app.update();
        app.world_mut()
            .get_mut::<Patrol>(patrol_entity)
            .unwrap()
            .stop();
        app.update();
        app.update();

        assert_eq!(app.world().resource::<Seen>().stepped, 1);
        assert_eq!(patrol(&app, patrol_entity).follower().cursor(), Some(1));
    }

    #[test]
    fn test_restart_loops_forever() {
        let mut app = test_app();
        let (_, patrol_entity) = spawn_guard(&mut app);

        // 5 poses and a done step per lap
        for _ in 0..12 {
            app.update();
        }

        let seen = app.world().resource::<Seen>();
        assert_eq!(seen.finished, 2);
        assert_eq!(seen.stepped, 12);
        assert!(patrol(&app, patrol_entity).is_running());
    }

    #[test]
    fn test_once_stays_finished() {
        let mut app = test_app();
        let actor = app.world_mut().spawn(Transform::default()).id();
        let patrol_entity = app
            .world_mut()
            .spawn(short_patrol(actor).with_loop_mode(LoopMode::Once).started())
            .id();

        for _ in 0..10 {
            app.update();
        }

        assert_eq!(app.world().resource::<Seen>().finished, 1);
        assert!(patrol(&app, patrol_entity).follower().is_finished());
    }

    #[test]
    fn test_missing_actor_skips_steps() {
        let mut app = test_app();
        let (actor, patrol_entity) = spawn_guard(&mut app);
        app.world_mut().despawn(actor);

        app.update();
        app.update();

        assert_eq!(app.world().resource::<Seen>().stepped, 0);
        assert_eq!(patrol(&app, patrol_entity).follower().cursor(), Some(2));
    }

    #[test]
    fn test_first_person_drives_camera() {
        let mut app = test_app();
        let camera = app
            .world_mut()
            .spawn((FirstPersonCamera, Transform::default()))
            .id();
        let (actor, patrol_entity) = spawn_guard(&mut app);
        app.world_mut()
            .get_mut::<Patrol>(patrol_entity)
            .unwrap()
            .set_first_person(true);

        app.update();

        let actor_position = app.world().get::<Transform>(actor).unwrap().translation;
        let camera_position = app.world().get::<Transform>(camera).unwrap().translation;
        assert!((camera_position - actor_position - Vec3::Y * DEFAULT_EYE_HEIGHT).length() < 1e-5);
    }

    #[test]
    fn test_commands_by_name() {
        let mut app = test_app();
        let camera = app
            .world_mut()
            .spawn((FirstPersonCamera, Transform::default()))
            .id();
        let (_, patrol_entity) = spawn_guard(&mut app);

        app.update();
        assert_eq!(
            app.world().resource::<PatrolRegistry>().get("guard"),
            Some(patrol_entity)
        );

        app.world_mut()
            .write_message(PatrolCommand::new("guard", PatrolAction::Toggle));
        app.world_mut()
            .write_message(PatrolCommand::new("nobody", PatrolAction::Run));
        app.update();
        assert!(!patrol(&app, patrol_entity).is_running());

        app.world_mut()
            .write_message(PatrolCommand::new("guard", PatrolAction::FirstPerson(false)));
        app.update();
        let expected = app.world().resource::<PatrolSettings>().overview_camera.position;
        let camera_position = app.world().get::<Transform>(camera).unwrap().translation;
        assert_eq!(camera_position, expected);
    }

    #[test]
    fn test_despawned_patrol_leaves_registry() {
        let mut app = test_app();
        let (_, patrol_entity) = spawn_guard(&mut app);
        app.update();

        app.world_mut().despawn(patrol_entity);
        app.update();

        assert!(!app.world().resource::<PatrolRegistry>().contains("guard"));
    }
}
