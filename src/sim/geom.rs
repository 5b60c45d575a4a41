//! Axis-aligned rectangles
//!
//! All sprites, collision boxes and blast areas are rectangles. Y points down
//! (screen convention), so `min` is the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Rectangle of `size` whose center is `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size * 0.5, size)
    }

    /// Rectangle of `size` whose top edge midpoint is `mid_top`
    pub fn from_mid_top(mid_top: Vec2, size: Vec2) -> Self {
        Self::new(Vec2::new(mid_top.x - size.x * 0.5, mid_top.y), size)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    #[inline]
    pub fn mid_top(&self) -> Vec2 {
        Vec2::new(self.min.x + self.size.x * 0.5, self.min.y)
    }

    /// Same rectangle moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.min + delta, self.size)
    }

    /// Strict overlap test: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Point containment, inclusive on all edges
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_is_strict() {
        let a = Rect::new(Vec2::ZERO, Vec2::splat(10.0));
        let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        let overlapping = Rect::new(Vec2::new(9.5, 9.5), Vec2::splat(10.0));

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
        assert!(overlapping.overlaps(&a));
    }

    #[test]
    fn test_anchors() {
        let r = Rect::from_center(Vec2::new(50.0, 50.0), Vec2::new(20.0, 10.0));
        assert_eq!(r.min, Vec2::new(40.0, 45.0));
        assert_eq!(r.center(), Vec2::new(50.0, 50.0));

        let r = Rect::from_mid_top(Vec2::new(16.0, 0.0), Vec2::splat(14.0));
        assert_eq!(r.min, Vec2::new(9.0, 0.0));
        assert_eq!(r.mid_top(), Vec2::new(16.0, 0.0));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let r = Rect::new(Vec2::ZERO, Vec2::new(800.0, 600.0));
        assert!(r.contains_point(Vec2::ZERO));
        assert!(r.contains_point(Vec2::new(800.0, 600.0)));
        assert!(!r.contains_point(Vec2::new(800.1, 10.0)));
    }
}
