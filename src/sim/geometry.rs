//! Hitbox geometry for the cube and obstacles
//!
//! Screen space, y grows downward. These predicates define how forgiving each
//! obstacle feels, so the comparison operators (`<` vs `<=`) are load-bearing.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left corner + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Shrink by `inset` on every side
    pub fn inset(&self, inset: f64) -> Self {
        Self {
            x: self.x + inset,
            y: self.y + inset,
            w: self.w - inset * 2.0,
            h: self.h - inset * 2.0,
        }
    }

    /// Corners in order: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.x, self.y),
            DVec2::new(self.right(), self.y),
            DVec2::new(self.x, self.bottom()),
            DVec2::new(self.right(), self.bottom()),
        ]
    }
}

/// Box/box overlap after shrinking both boxes by `margin` on every side
/// (`BOX_MARGIN` unless the obstacle says otherwise).
///
/// Strict comparisons: boxes that only touch after shrinking do not overlap.
pub fn box_overlap(a: &Rect, b: &Rect, margin: f64) -> bool {
    a.x + margin < b.right() - margin
        && a.right() - margin > b.x + margin
        && a.y + margin < b.bottom() - margin
        && a.bottom() - margin > b.y + margin
}

/// Point-in-triangle by barycentric sign test.
///
/// Edge-inclusive: a point lying exactly on an edge counts as inside.
pub fn point_in_triangle(p: DVec2, t0: DVec2, t1: DVec2, t2: DVec2) -> bool {
    let s = (t0.x - t2.x) * (p.y - t2.y) - (t0.y - t2.y) * (p.x - t2.x);
    let t = (t1.x - t0.x) * (p.y - t0.y) - (t1.y - t0.y) * (p.x - t0.x);

    if (s < 0.0) != (t < 0.0) && s != 0.0 && t != 0.0 {
        return false;
    }

    let d = (t2.x - t1.x) * (p.y - t1.y) - (t2.y - t1.y) * (p.x - t1.x);
    d == 0.0 || (d < 0.0) == (s + t <= 0.0)
}

/// Squared distance from a circle center to the nearest point of a box.
///
/// Zero when the center lies inside the box. Callers compare with `< radius²`.
pub fn circle_box_distance_squared(b: &Rect, center: DVec2) -> f64 {
    let closest = DVec2::new(
        center.x.min(b.right()).max(b.x),
        center.y.min(b.bottom()).max(b.y),
    );
    (center - closest).length_squared()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BOX_MARGIN;
    use proptest::prelude::*;

    fn spike_triangle() -> (DVec2, DVec2, DVec2) {
        (
            DVec2::new(20.0, 5.0),
            DVec2::new(5.0, 35.0),
            DVec2::new(35.0, 35.0),
        )
    }

    #[test]
    fn test_box_overlap_margin_suppresses_grazing() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        // 4 units of real overlap, margin 2 on both boxes eats all of it
        let b = Rect::new(36.0, 0.0, 40.0, 40.0);
        assert!(!box_overlap(&a, &b, BOX_MARGIN));
        assert!(box_overlap(&a, &b, 0.0));

        // 5 units of overlap survives a margin of 2
        let c = Rect::new(35.0, 0.0, 40.0, 40.0);
        assert!(box_overlap(&a, &c, BOX_MARGIN));
    }

    #[test]
    fn test_box_overlap_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 50.0, 10.0, 10.0);
        assert!(!box_overlap(&a, &b, 0.0));
    }

    #[test]
    fn test_point_in_triangle_interior_and_exterior() {
        let (t0, t1, t2) = spike_triangle();
        assert!(point_in_triangle(DVec2::new(20.0, 25.0), t0, t1, t2));
        assert!(!point_in_triangle(DVec2::new(0.0, 0.0), t0, t1, t2));
        assert!(!point_in_triangle(DVec2::new(20.0, 40.0), t0, t1, t2));
    }

    #[test]
    fn test_point_on_edges_is_inside() {
        let (t0, t1, t2) = spike_triangle();
        // Left edge, a third of the way down from the tip
        assert!(point_in_triangle(DVec2::new(15.0, 15.0), t0, t1, t2));
        // Base
        assert!(point_in_triangle(DVec2::new(20.0, 35.0), t0, t1, t2));
        // Vertices
        assert!(point_in_triangle(t0, t0, t1, t2));
        assert!(point_in_triangle(t2, t0, t1, t2));
    }

    #[test]
    fn test_point_just_outside_left_edge() {
        let (t0, t1, t2) = spike_triangle();
        assert!(!point_in_triangle(DVec2::new(14.0, 15.0), t0, t1, t2));
    }

    #[test]
    fn test_circle_box_distance() {
        let b = Rect::new(0.0, 0.0, 40.0, 40.0);
        // Inside
        assert_eq!(circle_box_distance_squared(&b, DVec2::new(20.0, 20.0)), 0.0);
        // Straight right of the box
        assert_eq!(circle_box_distance_squared(&b, DVec2::new(50.0, 20.0)), 100.0);
        // Diagonal from bottom-right corner
        assert_eq!(circle_box_distance_squared(&b, DVec2::new(43.0, 44.0)), 25.0);
    }

    #[test]
    fn test_rect_inset_corners() {
        let r = Rect::new(150.0, 580.0, 40.0, 40.0).inset(8.0);
        let corners = r.corners();
        assert_eq!(corners[0], DVec2::new(158.0, 588.0));
        assert_eq!(corners[3], DVec2::new(182.0, 612.0));
    }

    proptest! {
        #[test]
        fn prop_box_overlap_is_symmetric(
            ax in -500.0f64..500.0, ay in -500.0f64..500.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
            w in 1.0f64..80.0, h in 1.0f64..80.0,
            margin in 0.0f64..4.0,
        ) {
            let a = Rect::new(ax, ay, w, h);
            let b = Rect::new(bx, by, h, w);
            prop_assert_eq!(box_overlap(&a, &b, margin), box_overlap(&b, &a, margin));
        }

        #[test]
        fn prop_circle_distance_zero_inside(
            cx in 0.0f64..40.0, cy in 0.0f64..40.0,
        ) {
            let b = Rect::new(0.0, 0.0, 40.0, 40.0);
            prop_assert_eq!(circle_box_distance_squared(&b, DVec2::new(cx, cy)), 0.0);
        }

        #[test]
        fn prop_circle_distance_non_negative(
            cx in -1000.0f64..1000.0, cy in -1000.0f64..1000.0,
        ) {
            let b = Rect::new(-20.0, 10.0, 40.0, 40.0);
            prop_assert!(circle_box_distance_squared(&b, DVec2::new(cx, cy)) >= 0.0);
        }
    }
}
