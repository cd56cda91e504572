use std::fmt;

/// Errors raised when building a patrol.
#[derive(Debug, Clone, PartialEq)]
pub enum PatrolError {
    /// Fewer than two waypoints were supplied.
    InvalidPath { waypoints: usize },
    /// The speed factor was zero, negative, or not a number.
    InvalidSpeedFactor(f32),
}

impl fmt::Display for PatrolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatrolError::InvalidPath { waypoints } => {
                write!(f, "patrol path needs at least 2 waypoints, got {}", waypoints)
            }
            PatrolError::InvalidSpeedFactor(factor) => {
                write!(f, "speed factor must be positive and finite, got {}", factor)
            }
        }
    }
}

impl std::error::Error for PatrolError {}

/// A pose sink could not apply a step, e.g. because the actor is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSinkFailure {
    pub reason: String,
}

impl StepSinkFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StepSinkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step sink failed: {}", self.reason)
    }
}

impl std::error::Error for StepSinkFailure {}
