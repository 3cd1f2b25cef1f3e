//! World-space bounds of a tile

use glam::{Vec2, Vec3};

/// Axis-aligned box covering one tile in world space.
///
/// Immutable after creation. The ground planes are flat, so the y extent is
/// usually zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBounds {
    min: Vec3,
    size: Vec3,
}

impl TileBounds {
    /// Create bounds from the minimum corner and size
    pub fn new(min: Vec3, size: Vec3) -> Self {
        Self { min, size }
    }

    /// Create bounds from two opposite corners
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        let min = a.min(b);
        Self {
            min,
            size: a.max(b) - min,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.min + self.size
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.size
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        self.min + self.size * 0.5
    }

    /// Size projected onto the ground plane (x, z)
    #[inline]
    pub fn ground_size(&self) -> Vec2 {
        Vec2::new(self.size.x, self.size.z)
    }

    /// Check if the box contains a point (inclusive)
    pub fn contains_point(&self, point: Vec3) -> bool {
        let max = self.max();
        point.x >= self.min.x
            && point.x <= max.x
            && point.y >= self.min.y
            && point.y <= max.y
            && point.z >= self.min.z
            && point.z <= max.z
    }

    /// Squared distance from a point to the closest point of the box.
    /// Zero when the point is inside
    pub fn sqr_distance(&self, point: Vec3) -> f32 {
        let closest = point.clamp(self.min, self.max());
        closest.distance_squared(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> TileBounds {
        TileBounds::new(Vec3::ZERO, Vec3::new(10.0, 0.0, 10.0))
    }

    #[test]
    fn test_inside_is_zero() {
        assert_eq!(tile().sqr_distance(Vec3::new(5.0, 0.0, 5.0)), 0.0);
        assert!(tile().contains_point(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_outside_face() {
        assert_eq!(tile().sqr_distance(Vec3::new(13.0, 0.0, 5.0)), 9.0);
        assert_eq!(tile().sqr_distance(Vec3::new(5.0, 2.0, -1.0)), 5.0);
    }

    #[test]
    fn test_outside_corner() {
        assert_eq!(tile().sqr_distance(Vec3::new(13.0, 0.0, 14.0)), 25.0);
    }

    #[test]
    fn test_from_corners() {
        let bounds = TileBounds::from_corners(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(bounds.min(), Vec3::ZERO);
        assert_eq!(bounds.ground_size(), Vec2::new(10.0, 5.0));
        assert_eq!(bounds.center(), Vec3::new(5.0, 0.0, 2.5));
    }
}
