//! The patrol state machine.
//!
//! [`PathFollower`] owns a sampled curve and a cursor into it. The host calls
//! [`PathFollower::advance`] (or [`PathFollower::advance_with`]) once per tick
//! and receives the next [`PatrolStep`]. There is no hidden scheduling: a
//! follower only moves when it is advanced, so `stop()` always takes effect at
//! the next step boundary.

use bevy::prelude::*;

use crate::geometry::{add_euler, look_rotation};
use crate::spline::{CurveType, PatrolCurve};

use super::{PatrolError, StepSinkFailure};

/// Number of curve points the actor looks ahead of its position.
pub const DEFAULT_LOOKAHEAD: usize = 10;

/// Camera height above the actor in first-person mode.
pub const DEFAULT_EYE_HEIGHT: f32 = 1.8;

/// What to do when a [`PoseSink`] fails to apply a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum ErrorPolicy {
    /// Log the failure and move on to the next step.
    #[default]
    ContinueOnError,
    /// Stop on the failed step. The next `run()` retries it.
    HaltOnError,
}

/// Playback state of a [`PathFollower`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Default)]
pub enum FollowerState {
    /// Never started, or reset after finishing.
    #[default]
    Idle,
    /// Producing a step on every advance.
    Running,
    /// Paused; progress is kept.
    Stopped,
    /// The terminal step was emitted. Needs `reset()` before running again.
    Finished,
}

/// Construction parameters for a [`PathFollower`].
#[derive(Debug, Clone, PartialEq, Reflect)]
#[reflect(Default)]
pub struct FollowerConfig {
    /// Sampling density divisor. Larger values mean fewer, wider steps.
    pub speed_factor: f32,

    /// The interpolation used between waypoints.
    pub curve_type: CurveType,

    /// Euler (XYZ) angles added to the look-at rotation on every step.
    ///
    /// Compensates for models rigged facing a different axis.
    pub rotation_offset: Vec3,

    /// Euler (XYZ) angles accumulated on every step.
    ///
    /// Unlike `rotation_offset` this compounds, so the actor spins further on
    /// each step. Defaults to zero.
    pub rotation_drift: Vec3,

    /// Whether each step also carries a camera pose.
    pub first_person: bool,

    /// How many curve points ahead the actor faces.
    pub lookahead: usize,

    /// Camera height above the path in first-person mode.
    pub eye_height: f32,

    /// How to handle sink failures.
    pub error_policy: ErrorPolicy,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            speed_factor: 1.0,
            curve_type: CurveType::default(),
            rotation_offset: Vec3::ZERO,
            rotation_drift: Vec3::ZERO,
            first_person: false,
            lookahead: DEFAULT_LOOKAHEAD,
            eye_height: DEFAULT_EYE_HEIGHT,
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl FollowerConfig {
    /// Set the speed factor.
    pub fn with_speed_factor(mut self, factor: f32) -> Self {
        self.speed_factor = factor;
        self
    }

    /// Set the interpolation type.
    pub fn with_curve_type(mut self, curve_type: CurveType) -> Self {
        self.curve_type = curve_type;
        self
    }

    /// Set the fixed rotation offset.
    pub fn with_rotation_offset(mut self, offset: Vec3) -> Self {
        self.rotation_offset = offset;
        self
    }

    /// Set the per-step rotation drift.
    pub fn with_rotation_drift(mut self, drift: Vec3) -> Self {
        self.rotation_drift = drift;
        self
    }

    /// Enable or disable first-person mode.
    pub fn with_first_person(mut self, first_person: bool) -> Self {
        self.first_person = first_person;
        self
    }

    /// Set the look-ahead distance in curve points.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the first-person eye height.
    pub fn with_eye_height(mut self, height: f32) -> Self {
        self.eye_height = height;
        self
    }

    /// Set the sink failure policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }
}

/// Where a first-person camera should be and what it should look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    /// The camera transform for this pose.
    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.position).looking_at(self.look_at, Vec3::Y)
    }
}

/// The pose of an actor at one curve point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolPose {
    /// Index of this point in the curve.
    pub index: usize,
    pub position: Vec3,
    /// The point the actor faces.
    pub look_target: Vec3,
    /// Final rotation, offsets included.
    pub rotation: Quat,
    /// Present only in first-person mode.
    pub camera: Option<CameraPose>,
}

/// One unit of patrol progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatrolStep {
    /// Place the actor.
    Pose(PatrolPose),
    /// The curve is exhausted. Carries the last curve point.
    Done { last: Vec3 },
}

impl PatrolStep {
    pub fn is_done(&self) -> bool {
        matches!(self, PatrolStep::Done { .. })
    }

    /// The actor position for this step.
    pub fn position(&self) -> Vec3 {
        match self {
            PatrolStep::Pose(pose) => pose.position,
            PatrolStep::Done { last } => *last,
        }
    }
}

/// Receives each step's pose and applies it to whatever the patrol moves.
pub trait PoseSink {
    fn apply(&mut self, step: &PatrolStep) -> Result<(), StepSinkFailure>;
}

impl<F> PoseSink for F
where
    F: FnMut(&PatrolStep) -> Result<(), StepSinkFailure>,
{
    fn apply(&mut self, step: &PatrolStep) -> Result<(), StepSinkFailure> {
        self(step)
    }
}

/// Outcome of [`PathFollower::advance_with`].
#[derive(Debug, Clone, PartialEq)]
pub enum StepReport {
    /// The sink accepted the step.
    Applied(PatrolStep),
    /// The sink failed; the follower moved past the step anyway.
    Skipped {
        step: PatrolStep,
        failure: StepSinkFailure,
    },
    /// The sink failed; the follower stopped on the step.
    Halted {
        step: PatrolStep,
        failure: StepSinkFailure,
    },
}

impl StepReport {
    pub fn step(&self) -> &PatrolStep {
        match self {
            StepReport::Applied(step) => step,
            StepReport::Skipped { step, .. } | StepReport::Halted { step, .. } => step,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, StepReport::Applied(_))
    }
}

/// Moves an actor along a curve sampled from sparse waypoints.
#[derive(Debug, Clone)]
pub struct PathFollower {
    waypoints: Vec<Vec3>,
    config: FollowerConfig,
    curve: Option<PatrolCurve>,
    /// Next curve index to emit. `None` until `init()`.
    cursor: Option<usize>,
    state: FollowerState,
    /// Accumulated `rotation_drift`.
    drift: Vec3,
    /// Last look-at rotation, reused when the target coincides with the actor.
    last_look: Quat,
}

impl PathFollower {
    /// Create a follower for the given waypoints.
    ///
    /// The curve is not sampled until [`init`](Self::init) or the first
    /// [`run`](Self::run).
    pub fn new(waypoints: Vec<Vec3>, config: FollowerConfig) -> Result<Self, PatrolError> {
        if waypoints.len() < config.curve_type.min_points() {
            return Err(PatrolError::InvalidPath {
                waypoints: waypoints.len(),
            });
        }
        if !(config.speed_factor.is_finite() && config.speed_factor > 0.0) {
            return Err(PatrolError::InvalidSpeedFactor(config.speed_factor));
        }

        Ok(Self {
            waypoints,
            config,
            curve: None,
            cursor: None,
            state: FollowerState::Idle,
            drift: Vec3::ZERO,
            last_look: Quat::IDENTITY,
        })
    }

    /// Sample the curve and create the step cursor.
    ///
    /// Does nothing if a cursor already exists; call [`reset`](Self::reset)
    /// first to rebuild.
    pub fn init(&mut self) {
        if self.cursor.is_some() {
            return;
        }

        let curve = PatrolCurve::sample(
            &self.waypoints,
            self.config.curve_type,
            self.config.speed_factor,
        );
        match curve {
            Some(curve) if !curve.is_empty() => {
                self.curve = Some(curve);
                self.cursor = Some(0);
            }
            _ => warn!(
                "Could not sample a patrol curve from {} waypoints",
                self.waypoints.len()
            ),
        }
    }

    /// Start or resume stepping.
    ///
    /// Running followers are left alone, and finished ones must be
    /// [`reset`](Self::reset) first.
    pub fn run(&mut self) {
        match self.state {
            FollowerState::Running => return,
            FollowerState::Finished => {
                debug!("Patrol already finished; reset it before running again");
                return;
            }
            FollowerState::Idle | FollowerState::Stopped => {}
        }

        if self.cursor.is_none() {
            self.init();
        }

        if self.curve.as_ref().is_some_and(|curve| !curve.is_empty()) {
            self.state = FollowerState::Running;
        }
    }

    /// Pause stepping. Progress is kept.
    pub fn stop(&mut self) {
        if self.state == FollowerState::Running {
            self.state = FollowerState::Stopped;
        }
    }

    /// Drop the curve and all progress. Never resumes by itself.
    pub fn reset(&mut self) {
        self.curve = None;
        self.cursor = None;
        self.drift = Vec3::ZERO;
        self.last_look = Quat::IDENTITY;
        self.state = match self.state {
            FollowerState::Running => FollowerState::Stopped,
            FollowerState::Finished => FollowerState::Idle,
            state => state,
        };
    }

    /// Turn first-person mode on or off without interrupting playback.
    pub fn switch(&mut self, first_person: bool) {
        self.config.first_person = first_person;
    }

    /// Produce the next step and move past it.
    ///
    /// Returns `None` unless the follower is running.
    pub fn advance(&mut self) -> Option<PatrolStep> {
        let step = self.peek()?;
        self.commit(&step);
        Some(step)
    }

    /// Produce the next step and hand it to `sink`.
    ///
    /// Sink failures are handled according to the configured [`ErrorPolicy`]
    /// and never escape as errors.
    pub fn advance_with<S: PoseSink + ?Sized>(&mut self, sink: &mut S) -> Option<StepReport> {
        let step = self.peek()?;

        match sink.apply(&step) {
            Ok(()) => {
                self.commit(&step);
                Some(StepReport::Applied(step))
            }
            Err(failure) => match self.config.error_policy {
                ErrorPolicy::ContinueOnError => {
                    warn!("Skipping patrol step: {}", failure);
                    self.commit(&step);
                    Some(StepReport::Skipped { step, failure })
                }
                ErrorPolicy::HaltOnError => {
                    warn!("Halting patrol: {}", failure);
                    self.state = FollowerState::Stopped;
                    Some(StepReport::Halted { step, failure })
                }
            },
        }
    }

    /// Compute the step at the cursor without moving.
    fn peek(&self) -> Option<PatrolStep> {
        if self.state != FollowerState::Running {
            return None;
        }

        let curve = self.curve.as_ref()?;
        let cursor = self.cursor?;
        let points = curve.points();

        if cursor >= points.len() {
            return Some(PatrolStep::Done { last: curve.last()? });
        }

        let position = points[cursor];
        let look_target = self.look_target(points, cursor);
        let look = look_rotation(position, look_target, self.last_look);
        let rotation = add_euler(
            look,
            self.config.rotation_offset + self.drift + self.config.rotation_drift,
        );

        let camera = self.config.first_person.then(|| {
            let eye = Vec3::Y * self.config.eye_height;
            CameraPose {
                position: position + eye,
                look_at: look_target + eye,
            }
        });

        Some(PatrolStep::Pose(PatrolPose {
            index: cursor,
            position,
            look_target,
            rotation,
            camera,
        }))
    }

    /// The point `lookahead` ahead, or the curve start near the end.
    fn look_target(&self, points: &[Vec3], index: usize) -> Vec3 {
        if index + self.config.lookahead + 1 < points.len() {
            points[index + self.config.lookahead]
        } else {
            points[0]
        }
    }

    fn commit(&mut self, step: &PatrolStep) {
        match step {
            PatrolStep::Pose(pose) => {
                self.cursor = Some(pose.index + 1);
                self.drift += self.config.rotation_drift;
                self.last_look = look_rotation(pose.position, pose.look_target, self.last_look);
            }
            PatrolStep::Done { .. } => {
                self.state = FollowerState::Finished;
            }
        }
    }

    pub fn state(&self) -> FollowerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == FollowerState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == FollowerState::Finished
    }

    /// Next curve index to be emitted, if a cursor exists.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The sampled curve, once built.
    pub fn curve(&self) -> Option<&PatrolCurve> {
        self.curve.as_ref()
    }

    pub fn first_person(&self) -> bool {
        self.config.first_person
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn config(&self) -> &FollowerConfig {
        &self.config
    }
}
