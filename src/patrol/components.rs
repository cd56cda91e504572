use bevy::prelude::*;

use crate::spline::PatrolRoute;

use super::{FollowerConfig, FollowerState, PathFollower, PatrolError, PatrolStep};

/// What a patrol does after its terminal step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum LoopMode {
    /// Stay finished at the end of the route.
    Once,
    /// Reset and walk the route again from the start.
    #[default]
    Restart,
}

/// Component that walks an actor entity along a patrol route.
///
/// The actor's [`Transform`] is updated once per step. The patrol can live on
/// the actor itself or on a separate controller entity.
#[derive(Component, Debug, Clone)]
pub struct Patrol {
    /// The entity being moved.
    pub actor: Entity,

    /// How to handle reaching the end of the route.
    pub loop_mode: LoopMode,

    follower: PathFollower,
}

impl Patrol {
    /// Create a stopped patrol for `actor` through the given waypoints.
    pub fn new(
        actor: Entity,
        waypoints: Vec<Vec3>,
        config: FollowerConfig,
    ) -> Result<Self, PatrolError> {
        Ok(Self {
            actor,
            loop_mode: LoopMode::default(),
            follower: PathFollower::new(waypoints, config)?,
        })
    }

    /// Create a stopped patrol that follows a route.
    ///
    /// The route's curve type overrides the one in `config`.
    pub fn from_route(
        actor: Entity,
        route: &PatrolRoute,
        config: FollowerConfig,
    ) -> Result<Self, PatrolError> {
        let config = config.with_curve_type(route.curve_type);
        Self::new(actor, route.waypoints.clone(), config)
    }

    /// Set the loop mode.
    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    /// Start the patrol right away.
    pub fn started(mut self) -> Self {
        self.follower.run();
        self
    }

    /// Start or resume the patrol.
    pub fn run(&mut self) {
        self.follower.run();
    }

    /// Pause the patrol at the next step boundary.
    pub fn stop(&mut self) {
        self.follower.stop();
    }

    /// Pause a running patrol, or resume a paused one.
    ///
    /// A finished patrol is restarted from the beginning.
    pub fn toggle(&mut self) {
        match self.follower.state() {
            FollowerState::Running => self.follower.stop(),
            FollowerState::Finished => {
                self.follower.reset();
                self.follower.run();
            }
            FollowerState::Idle | FollowerState::Stopped => self.follower.run(),
        }
    }

    /// Drop all progress. The patrol stays stopped.
    pub fn reset(&mut self) {
        self.follower.reset();
    }

    /// Turn first-person camera following on or off.
    pub fn set_first_person(&mut self, first_person: bool) {
        self.follower.switch(first_person);
    }

    pub fn is_running(&self) -> bool {
        self.follower.is_running()
    }

    pub fn follower(&self) -> &PathFollower {
        &self.follower
    }

    pub fn follower_mut(&mut self) -> &mut PathFollower {
        &mut self.follower
    }
}

/// Marker for the camera that first-person patrols drive.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FirstPersonCamera;

/// Message written for every step applied to an actor.
#[derive(Message, Debug, Clone)]
pub struct PatrolStepped {
    /// The entity with the [`Patrol`] component.
    pub patrol: Entity,
    /// The actor that was moved.
    pub actor: Entity,
    pub step: PatrolStep,
}

/// Message written when a patrol emits its terminal step.
#[derive(Message, Debug, Clone)]
pub struct PatrolFinished {
    pub patrol: Entity,
    pub actor: Entity,
    /// The last point of the route.
    pub last: Vec3,
}

/// A control request addressed to a patrol by its actor's [`Name`].
#[derive(Message, Debug, Clone)]
pub struct PatrolCommand {
    pub actor: String,
    pub action: PatrolAction,
}

impl PatrolCommand {
    pub fn new(actor: impl Into<String>, action: PatrolAction) -> Self {
        Self {
            actor: actor.into(),
            action,
        }
    }
}

/// Actions accepted by [`PatrolCommand`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatrolAction {
    Run,
    Stop,
    /// Pause if running, resume otherwise.
    Toggle,
    Reset,
    /// Enable or disable first-person camera following.
    FirstPerson(bool),
}
