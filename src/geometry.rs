//! Geometry utilities for patrol orientation and ground-plane tests.

use bevy::prelude::*;

/// A local coordinate frame built from an eye point looking at a target.
///
/// Used to orient patrolling actors toward their look-ahead point. The frame
/// is constructed with automatic handling of degenerate cases (e.g., when the
/// view direction is parallel to the preferred up).
#[derive(Debug, Clone, Copy)]
pub struct CoordinateFrame {
    /// Direction from the target back to the eye (local +Z).
    pub back: Vec3,
    /// The right direction (perpendicular to back and up).
    pub right: Vec3,
    /// The corrected up direction (perpendicular to back and right).
    pub up: Vec3,
}

impl CoordinateFrame {
    /// Build a frame whose forward (-Z) points from `eye` toward `target`.
    ///
    /// Returns `None` when the two points coincide, since no direction can be
    /// derived from them.
    pub fn looking_at(eye: Vec3, target: Vec3, preferred_up: Vec3) -> Option<Self> {
        let back = (eye - target).normalize_or_zero();
        if back == Vec3::ZERO {
            return None;
        }

        let right = preferred_up.cross(back).normalize_or_zero();
        let up = back.cross(right).normalize_or_zero();

        // Handle degenerate case: looking straight up or down
        let (right, up) = if right.length_squared() < 0.001 {
            let right = Vec3::X.cross(back).normalize_or_zero();
            let up = back.cross(right).normalize_or_zero();
            (right, up)
        } else {
            (right, up)
        };

        Some(Self { back, right, up })
    }

    /// Check if this frame is valid (non-degenerate).
    pub fn is_valid(&self) -> bool {
        self.right.length_squared() > 0.001 && self.up.length_squared() > 0.001
    }

    /// Convert to a rotation quaternion.
    ///
    /// The rotation orients an entity so that its local -Z faces the target,
    /// matching [`Transform::looking_at`].
    pub fn to_rotation(&self) -> Quat {
        if !self.is_valid() {
            return Quat::IDENTITY;
        }
        Quat::from_mat3(&Mat3::from_cols(self.right, self.up, self.back))
    }
}

/// Rotation that makes an actor at `eye` face `target`, or `fallback` if the
/// points coincide.
pub fn look_rotation(eye: Vec3, target: Vec3, fallback: Quat) -> Quat {
    CoordinateFrame::looking_at(eye, target, Vec3::Y)
        .map(|frame| frame.to_rotation())
        .unwrap_or(fallback)
}

/// Add an Euler (XYZ) delta to a rotation, component by component.
pub fn add_euler(rotation: Quat, delta: Vec3) -> Quat {
    if delta == Vec3::ZERO {
        return rotation;
    }
    let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
    Quat::from_euler(EulerRot::XYZ, x + delta.x, y + delta.y, z + delta.z)
}

/// Project a world position onto the ground (x/z) plane.
pub fn ground(point: Vec3) -> Vec2 {
    Vec2::new(point.x, point.z)
}
