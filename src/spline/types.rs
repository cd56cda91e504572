use bevy::prelude::*;

/// Distances below this are treated as coincident control points.
const MIN_KNOT_SPACING: f32 = 1e-4;

/// The Catmull-Rom parameterization used to interpolate waypoints.
///
/// All variants pass through every waypoint. They differ in how knots are
/// spaced, which controls overshoot around sharp corners.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Default)]
pub enum CurveType {
    /// Knots spaced by the square root of segment length.
    /// Never forms cusps or self-intersections within a segment.
    #[default]
    Centripetal,
    /// Knots spaced by segment length.
    Chordal,
    /// Uniform knots with an adjustable tangent tension (0.5 is classic Catmull-Rom).
    Uniform {
        /// Tangent scale.
        tension: f32,
    },
}

impl CurveType {
    /// Cycle to the next curve type.
    pub fn next(self) -> Self {
        match self {
            Self::Centripetal => Self::Chordal,
            Self::Chordal => Self::Uniform { tension: 0.5 },
            Self::Uniform { .. } => Self::Centripetal,
        }
    }

    /// Get the display name for this curve type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Centripetal => "Centripetal",
            Self::Chordal => "Chordal",
            Self::Uniform { .. } => "Uniform",
        }
    }

    /// Minimum number of waypoints required for this curve type.
    pub fn min_points(&self) -> usize {
        2
    }

    /// Evaluate the open curve through `points` at parameter t (0.0 to 1.0).
    ///
    /// The first and last segments use a phantom control point mirrored from
    /// the neighbouring waypoint, so the curve starts at the first waypoint and
    /// ends at the last one.
    pub fn evaluate(&self, points: &[Vec3], t: f32) -> Option<Vec3> {
        let n = points.len();
        if n < self.min_points() {
            return None;
        }

        let scaled = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut segment = scaled.floor() as usize;
        let mut local_t = scaled - segment as f32;

        if segment >= n - 1 {
            segment = n - 2;
            local_t = 1.0;
        }

        let p1 = points[segment];
        let p2 = points[segment + 1];
        let p0 = if segment > 0 {
            points[segment - 1]
        } else {
            2.0 * points[0] - points[1]
        };
        let p3 = if segment + 2 < n {
            points[segment + 2]
        } else {
            2.0 * points[n - 1] - points[n - 2]
        };

        let (m1, m2) = self.tangents(p0, p1, p2, p3);
        Some(hermite(p1, p2, m1, m2, local_t))
    }

    /// Tangents at `p1` and `p2` for the segment p1 -> p2.
    fn tangents(&self, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> (Vec3, Vec3) {
        let exponent = match self {
            Self::Uniform { tension } => {
                return (*tension * (p2 - p0), *tension * (p3 - p1));
            }
            Self::Centripetal => 0.25,
            Self::Chordal => 0.5,
        };

        // Knot spacing from squared distances raised to the chosen power
        let mut dt0 = p0.distance_squared(p1).powf(exponent);
        let mut dt1 = p1.distance_squared(p2).powf(exponent);
        let mut dt2 = p2.distance_squared(p3).powf(exponent);

        if dt1 < MIN_KNOT_SPACING {
            dt1 = 1.0;
        }
        if dt0 < MIN_KNOT_SPACING {
            dt0 = dt1;
        }
        if dt2 < MIN_KNOT_SPACING {
            dt2 = dt1;
        }

        let m1 = (p1 - p0) / dt0 - (p2 - p0) / (dt0 + dt1) + (p2 - p1) / dt1;
        let m2 = (p2 - p1) / dt1 - (p3 - p1) / (dt1 + dt2) + (p3 - p2) / dt2;

        // Rescale tangents from non-uniform knots to the [0, 1] segment
        (m1 * dt1, m2 * dt1)
    }
}

fn hermite(p1: Vec3, p2: Vec3, m1: Vec3, m2: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;

    let c2 = -3.0 * p1 + 3.0 * p2 - 2.0 * m1 - m2;
    let c3 = 2.0 * p1 - 2.0 * p2 + m1 + m2;

    p1 + m1 * t + c2 * t2 + c3 * t3
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 1.0),
            Vec3::new(5.0, 0.0, 6.0),
            Vec3::new(9.0, 0.0, 2.0),
        ]
    }

    #[test]
    fn test_passes_through_waypoints() {
        let points = zigzag();
        for curve_type in [
            CurveType::Centripetal,
            CurveType::Chordal,
            CurveType::Uniform { tension: 0.5 },
        ] {
            for (i, waypoint) in points.iter().enumerate() {
                let t = i as f32 / (points.len() - 1) as f32;
                let p = curve_type.evaluate(&points, t).unwrap();
                assert!((p - *waypoint).length() < 1e-4, "{} at {i}", curve_type.name());
            }
        }
    }

    #[test]
    fn test_two_points_is_straight() {
        let points = vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)];
        let mid = CurveType::Centripetal.evaluate(&points, 0.5).unwrap();
        assert!((mid - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_too_few_points() {
        assert!(CurveType::Centripetal.evaluate(&[Vec3::ONE], 0.5).is_none());
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let points = vec![Vec3::ONE, Vec3::ONE, Vec3::ONE];
        let p = CurveType::Centripetal.evaluate(&points, 0.3).unwrap();
        assert!(p.is_finite());
        assert!((p - Vec3::ONE).length() < 1e-4);
    }
}
