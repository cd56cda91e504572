//! Ground-plane polygon containment.

use bevy::prelude::*;

use crate::geometry::ground;

/// Test whether `point` lies inside or on the boundary of `polygon`.
///
/// Uses ray casting along +X. A point that coincides with a vertex, lies on
/// a horizontal edge, or lies exactly on a crossed edge counts as inside.
/// The polygon is closed implicitly; repeating the first vertex at the end is
/// allowed.
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n == 0 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;

    for (i, &s) in polygon.iter().enumerate() {
        let t = polygon[j];
        j = i;

        if s == point || t == point {
            return true;
        }

        // On a horizontal edge, strictly between its endpoints
        if s.y == t.y
            && s.y == point.y
            && ((s.x > point.x && t.x < point.x) || (s.x < point.x && t.x > point.x))
        {
            return true;
        }

        // Edge straddles the ray
        if (s.y < point.y && t.y >= point.y) || (s.y >= point.y && t.y < point.y) {
            let x = s.x + (point.y - s.y) * (t.x - s.x) / (t.y - s.y);
            if x == point.x {
                return true;
            }
            if x > point.x {
                inside = !inside;
            }
        }
    }

    inside
}

/// A fenced region on the ground (x/z) plane.
#[derive(Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Default)]
pub struct FenceRegion {
    vertices: Vec<Vec2>,
}

impl FenceRegion {
    /// Create a region from ground-plane vertices.
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Create a region from world points, dropping their height.
    pub fn from_world(points: &[Vec3]) -> Self {
        Self::new(points.iter().copied().map(ground).collect())
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Whether a ground-plane point is inside or on the boundary.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point_in_polygon(point, &self.vertices)
    }

    /// Whether a world position, projected onto the ground, is inside.
    pub fn contains(&self, position: Vec3) -> bool {
        self.contains_point(ground(position))
    }

    /// Average of the vertices, ignoring a repeated closing vertex.
    pub fn centroid(&self) -> Option<Vec2> {
        let mut vertices = self.vertices.as_slice();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices = &vertices[..vertices.len() - 1];
        }
        if vertices.is_empty() {
            return None;
        }
        Some(vertices.iter().copied().sum::<Vec2>() / vertices.len() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::{FollowerConfig, PathFollower, PatrolStep};

    fn square() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_vertex_is_inside() {
        let polygon = square();
        for vertex in &polygon {
            assert!(point_in_polygon(*vertex, &polygon));
        }
    }

    #[test]
    fn test_far_point_is_outside() {
        assert!(!point_in_polygon(Vec2::new(1000.0, 1000.0), &square()));
        assert!(!point_in_polygon(Vec2::new(-0.5, 5.0), &square()));
        assert!(!point_in_polygon(Vec2::new(5.0, 10.5), &square()));
    }

    #[test]
    fn test_edges_are_inside() {
        let polygon = square();
        // Horizontal edges
        assert!(point_in_polygon(Vec2::new(5.0, 0.0), &polygon));
        assert!(point_in_polygon(Vec2::new(5.0, 10.0), &polygon));
        // Vertical edges
        assert!(point_in_polygon(Vec2::new(0.0, 5.0), &polygon));
        assert!(point_in_polygon(Vec2::new(10.0, 5.0), &polygon));
    }

    #[test]
    fn test_convex_centroids_are_inside() {
        let shapes = [
            square(),
            vec![Vec2::new(0.0, 0.0), Vec2::new(4.0, 1.0), Vec2::new(1.0, 3.0)],
            (0..7)
                .map(|i| {
                    let angle = i as f32 / 7.0 * std::f32::consts::TAU;
                    Vec2::new(angle.cos(), angle.sin()) * 5.0 + Vec2::new(-20.0, 3.0)
                })
                .collect(),
        ];

        for shape in shapes {
            let region = FenceRegion::new(shape);
            let centroid = region.centroid().unwrap();
            assert!(region.contains_point(centroid), "{:?}", region);
        }
    }

    #[test]
    fn test_concave_notch_is_outside() {
        // U shape opening upward
        let polygon = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(6.0, 9.0),
            Vec2::new(6.0, 3.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 9.0),
            Vec2::new(0.0, 9.0),
        ];
        assert!(!point_in_polygon(Vec2::new(4.5, 6.0), &polygon));
        assert!(point_in_polygon(Vec2::new(1.5, 6.0), &polygon));
        assert!(point_in_polygon(Vec2::new(4.5, 1.5), &polygon));
    }

    #[test]
    fn test_closing_vertex_is_allowed() {
        let mut polygon = square();
        polygon.push(polygon[0]);
        let region = FenceRegion::new(polygon);
        assert!(region.contains(Vec3::new(5.0, 3.0, 5.0)));
        assert_eq!(region.centroid(), Some(Vec2::new(5.0, 5.0)));
        assert!(!point_in_polygon(Vec2::ZERO, &[]));
    }

    #[test]
    fn test_crossing_the_fence_flips_once() {
        let fence = FenceRegion::from_world(&[
            Vec3::new(-10.0, 0.1, -10.0),
            Vec3::new(10.0, 0.1, -10.0),
            Vec3::new(10.0, 0.1, 10.0),
            Vec3::new(-10.0, 0.1, 10.0),
        ]);
        let mut follower = PathFollower::new(
            vec![Vec3::ZERO, Vec3::new(20.0, 0.0, 20.0)],
            FollowerConfig::default().with_speed_factor(10.0),
        )
        .unwrap();
        follower.run();

        let mut states = Vec::new();
        while let Some(step) = follower.advance() {
            if let PatrolStep::Pose(pose) = step {
                states.push(fence.contains(pose.position));
            }
        }

        assert_eq!(states.first(), Some(&true));
        assert_eq!(states.last(), Some(&false));
        let flips = states.windows(2).filter(|pair| pair[0] != pair[1]).count();
        assert_eq!(flips, 1);
    }
}
