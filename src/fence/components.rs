use std::time::Duration;

use bevy::prelude::*;

use super::FenceRegion;

/// Default time an alarm waits before resuming a paused patrol.
pub const DEFAULT_ALARM_DELAY: Duration = Duration::from_secs(5);

/// A restricted zone that patrols can be watched against.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component, Default)]
pub struct Fence {
    pub region: FenceRegion,
    /// Number of watched actors currently inside. Maintained by the plugin.
    pub occupants: usize,
}

impl Fence {
    pub fn new(region: FenceRegion) -> Self {
        Self {
            region,
            occupants: 0,
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.occupants > 0
    }
}

/// Watches the actor of the [`Patrol`](crate::patrol::Patrol) on the same
/// entity against a [`Fence`].
///
/// On entering the fence the patrol is paused (if `pause_on_enter`) and a
/// single-shot alarm is armed. When the alarm elapses the patrol resumes.
/// Every entry or exit cancels a pending alarm first, and so does any
/// [`PatrolCommand`](crate::patrol::PatrolCommand) other than a camera switch.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct FenceWatcher {
    /// The fence entity to test against.
    pub fence: Entity,

    /// Whether entering pauses the patrol until the alarm elapses.
    pub pause_on_enter: bool,

    /// How long the alarm waits.
    pub alarm_delay: Duration,

    /// Whether the actor was inside at the last step.
    pub inside: bool,

    /// Pending alarm, if armed.
    pub alarm: Option<Timer>,
}

impl FenceWatcher {
    /// Create a watcher for the given fence.
    pub fn new(fence: Entity) -> Self {
        Self {
            fence,
            pause_on_enter: true,
            alarm_delay: DEFAULT_ALARM_DELAY,
            inside: false,
            alarm: None,
        }
    }

    /// Set whether entering pauses the patrol.
    pub fn with_pause_on_enter(mut self, pause: bool) -> Self {
        self.pause_on_enter = pause;
        self
    }

    /// Set the alarm delay.
    pub fn with_alarm_delay(mut self, delay: Duration) -> Self {
        self.alarm_delay = delay;
        self
    }

    /// Arm a fresh alarm, replacing any pending one.
    pub fn arm(&mut self) {
        self.alarm = Some(Timer::new(self.alarm_delay, TimerMode::Once));
    }

    /// Cancel the pending alarm.
    pub fn disarm(&mut self) {
        self.alarm = None;
    }

    pub fn is_armed(&self) -> bool {
        self.alarm.is_some()
    }
}

/// Message written when a watched actor crosses a fence or its alarm elapses.
#[derive(Message, Debug, Clone)]
pub struct FenceEvent {
    /// The entity with the [`FenceWatcher`].
    pub watcher: Entity,
    /// The actor that moved.
    pub actor: Entity,
    pub fence: Entity,
    pub kind: FenceEventKind,
}

/// Types of fence events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceEventKind {
    /// The actor stepped inside the fence.
    Entered,
    /// The actor stepped outside the fence.
    Exited,
    /// The alarm armed on entry elapsed.
    AlarmElapsed,
}
