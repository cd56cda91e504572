use bevy::prelude::*;

use crate::patrol::{
    Patrol, PatrolAction, PatrolCommand, PatrolRegistry, PatrolStep, PatrolStepped,
};

use super::{Fence, FenceEvent, FenceEventKind, FenceWatcher};

/// Cancel pending alarms on patrols that were run, stopped, toggled or reset
/// by a [`PatrolCommand`].
pub fn cancel_alarms_on_command(
    mut commands: MessageReader<PatrolCommand>,
    registry: Res<PatrolRegistry>,
    mut watchers: Query<&mut FenceWatcher>,
) {
    for command in commands.read() {
        if matches!(command.action, PatrolAction::FirstPerson(_)) {
            continue;
        }
        let Some(entity) = registry.get(&command.actor) else {
            continue;
        };
        if let Ok(mut watcher) = watchers.get_mut(entity) {
            if watcher.is_armed() {
                debug!("Cancelling fence alarm for '{}'", command.actor);
                watcher.disarm();
            }
        }
    }
}

/// Test each applied step against the watcher's fence and react to crossings.
///
/// Once a watcher has paused its patrol, the remaining steps that patrol took
/// in the same frame are ignored until the alarm resumes it.
pub fn watch_fences(
    mut stepped: MessageReader<PatrolStepped>,
    mut watchers: Query<(&mut FenceWatcher, &mut Patrol)>,
    mut fences: Query<&mut Fence>,
    mut events: MessageWriter<FenceEvent>,
) {
    for message in stepped.read() {
        let PatrolStep::Pose(pose) = message.step else {
            continue;
        };
        let Ok((mut watcher, mut patrol)) = watchers.get_mut(message.patrol) else {
            continue;
        };
        if watcher.pause_on_enter && watcher.is_armed() && !patrol.is_running() {
            continue;
        }
        let Ok(mut fence) = fences.get_mut(watcher.fence) else {
            continue;
        };

        let inside = fence.region.contains(pose.position);
        if inside == watcher.inside {
            continue;
        }
        watcher.inside = inside;
        watcher.disarm();

        let kind = if inside {
            fence.occupants += 1;
            if watcher.pause_on_enter {
                patrol.stop();
            }
            watcher.arm();
            FenceEventKind::Entered
        } else {
            fence.occupants = fence.occupants.saturating_sub(1);
            FenceEventKind::Exited
        };

        info!(
            "Actor {:?} {} fence {:?}",
            message.actor,
            if inside { "entered" } else { "left" },
            watcher.fence
        );

        events.write(FenceEvent {
            watcher: message.patrol,
            actor: message.actor,
            fence: watcher.fence,
            kind,
        });
    }
}

/// Tick pending alarms and resume paused patrols when they elapse.
pub fn tick_fence_alarms(
    time: Res<Time>,
    mut watchers: Query<(Entity, &mut FenceWatcher, &mut Patrol)>,
    mut events: MessageWriter<FenceEvent>,
) {
    for (entity, mut watcher, mut patrol) in &mut watchers {
        let Some(alarm) = watcher.alarm.as_mut() else {
            continue;
        };
        if !alarm.tick(time.delta()).is_finished() {
            continue;
        }

        watcher.disarm();
        if watcher.pause_on_enter {
            patrol.run();
        }

        events.write(FenceEvent {
            watcher: entity,
            actor: patrol.actor,
            fence: watcher.fence,
            kind: FenceEventKind::AlarmElapsed,
        });
    }
}

/// Release fence occupancy held by watchers that were removed.
pub fn release_removed_watchers(
    mut removed: RemovedComponents<FenceWatcher>,
    watchers: Query<&FenceWatcher>,
    mut fences: Query<&mut Fence>,
) {
    if removed.read().next().is_none() {
        return;
    }

    // Recount from the remaining watchers
    for mut fence in &mut fences {
        fence.occupants = 0;
    }
    for watcher in &watchers {
        if watcher.inside {
            if let Ok(mut fence) = fences.get_mut(watcher.fence) {
                fence.occupants += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::fence::{FencePlugin, FenceRegion, FenceSystems};
    use crate::patrol::{FollowerConfig, LoopMode, PatrolPlugin, PatrolSettings};

    #[derive(Resource, Default)]
    struct Seen(Vec<FenceEventKind>);

    fn collect(mut seen: ResMut<Seen>, mut events: MessageReader<FenceEvent>) {
        seen.0.extend(events.read().map(|event| event.kind));
    }

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_plugins((PatrolPlugin, FencePlugin))
            .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .init_resource::<Seen>()
            .add_systems(Update, collect.after(FenceSystems));
        app
    }

    fn spawn_crossing(app: &mut App, watcher: impl Fn(Entity) -> FenceWatcher) -> (Entity, Entity) {
        let fence = app
            .world_mut()
            .spawn(Fence::new(FenceRegion::new(vec![
                Vec2::new(-10.0, -10.0),
                Vec2::new(10.0, -10.0),
                Vec2::new(10.0, 10.0),
                Vec2::new(-10.0, 10.0),
            ])))
            .id();
        let actor = app.world_mut().spawn(Transform::default()).id();
        let patrol = Patrol::new(
            actor,
            vec![Vec3::ZERO, Vec3::new(20.0, 0.0, 20.0)],
            FollowerConfig::default().with_speed_factor(400.0),
        )
        .unwrap()
        .with_loop_mode(LoopMode::Once)
        .started();
        let patrol_entity = app.world_mut().spawn((patrol, watcher(fence))).id();
        (fence, patrol_entity)
    }

    #[test]
    fn test_crossing_without_pause() {
        let mut app = test_app();
        let (fence, _) = spawn_crossing(&mut app, |fence| {
            FenceWatcher::new(fence).with_pause_on_enter(false)
        });

        app.update();
        assert!(app.world().get::<Fence>(fence).unwrap().is_occupied());

        for _ in 0..10 {
            app.update();
        }

        let seen = &app.world().resource::<Seen>().0;
        assert_eq!(seen[0], FenceEventKind::Entered);
        assert!(seen.contains(&FenceEventKind::Exited));
        assert_eq!(
            seen.iter().filter(|kind| **kind == FenceEventKind::Exited).count(),
            1
        );
        assert!(!app.world().get::<Fence>(fence).unwrap().is_occupied());
    }

    #[test]
    fn test_entering_pauses_until_alarm() {
        let mut app = test_app();
        let (_, patrol_entity) = spawn_crossing(&mut app, |fence| {
            FenceWatcher::new(fence).with_alarm_delay(Duration::from_millis(300))
        });

        // First step enters and pauses; the first frame has no elapsed time
        app.update();
        let patrol = app.world().get::<Patrol>(patrol_entity).unwrap();
        assert!(!patrol.is_running());
        assert!(app.world().get::<FenceWatcher>(patrol_entity).unwrap().is_armed());

        for _ in 0..3 {
            app.update();
        }
        assert!(app.world().get::<Patrol>(patrol_entity).unwrap().is_running());
        assert!(!app.world().get::<FenceWatcher>(patrol_entity).unwrap().is_armed());

        let seen = &app.world().resource::<Seen>().0;
        assert_eq!(seen, &[FenceEventKind::Entered, FenceEventKind::AlarmElapsed]);
    }

    #[test]
    fn test_batched_steps_through_fence_still_resume() {
        let mut app = test_app();
        app.world_mut().resource_mut::<PatrolSettings>().steps_per_frame = 8;

        // Narrow strip that the first batch of steps walks into and out of
        let fence = app
            .world_mut()
            .spawn(Fence::new(FenceRegion::new(vec![
                Vec2::new(3.5, -1.0),
                Vec2::new(6.5, -1.0),
                Vec2::new(6.5, 1.0),
                Vec2::new(3.5, 1.0),
            ])))
            .id();
        let actor = app.world_mut().spawn(Transform::default()).id();
        // 10 units at factor 100 gives 11 points, one unit apart
        let patrol = Patrol::new(
            actor,
            vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
            FollowerConfig::default().with_speed_factor(100.0),
        )
        .unwrap()
        .with_loop_mode(LoopMode::Once)
        .started();
        let watcher = FenceWatcher::new(fence).with_alarm_delay(Duration::from_millis(300));
        let patrol_entity = app.world_mut().spawn((patrol, watcher)).id();

        app.update();
        let patrol = app.world().get::<Patrol>(patrol_entity).unwrap();
        assert!(!patrol.is_running());
        assert!(app.world().get::<FenceWatcher>(patrol_entity).unwrap().is_armed());

        for _ in 0..10 {
            app.update();
        }

        let patrol = app.world().get::<Patrol>(patrol_entity).unwrap();
        assert!(patrol.follower().is_finished());
        assert!(!app.world().get::<Fence>(fence).unwrap().is_occupied());

        let seen = &app.world().resource::<Seen>().0;
        assert_eq!(
            seen,
            &[
                FenceEventKind::Entered,
                FenceEventKind::AlarmElapsed,
                FenceEventKind::Exited
            ]
        );
    }

    #[test]
    fn test_manual_toggle_cancels_alarm() {
        let mut app = test_app();
        let (_, patrol_entity) = spawn_crossing(&mut app, |fence| {
            FenceWatcher::new(fence).with_alarm_delay(Duration::from_millis(300))
        });
        let actor = app.world().get::<Patrol>(patrol_entity).unwrap().actor;
        app.world_mut().entity_mut(actor).insert(Name::new("guard"));

        // Enter and pause on the first step
        app.update();
        assert!(app.world().get::<FenceWatcher>(patrol_entity).unwrap().is_armed());

        // Operator resumes, then pauses again
        app.world_mut()
            .write_message(PatrolCommand::new("guard", PatrolAction::Toggle));
        app.update();
        assert!(app.world().get::<Patrol>(patrol_entity).unwrap().is_running());
        assert!(!app.world().get::<FenceWatcher>(patrol_entity).unwrap().is_armed());

        app.world_mut()
            .write_message(PatrolCommand::new("guard", PatrolAction::Toggle));
        app.update();

        let cursor = app
            .world()
            .get::<Patrol>(patrol_entity)
            .unwrap()
            .follower()
            .cursor();
        for _ in 0..10 {
            app.update();
        }

        let patrol = app.world().get::<Patrol>(patrol_entity).unwrap();
        assert!(!patrol.is_running());
        assert_eq!(patrol.follower().cursor(), cursor);
        assert_eq!(cursor, Some(2));
        assert_eq!(&app.world().resource::<Seen>().0, &[FenceEventKind::Entered]);
    }
}
