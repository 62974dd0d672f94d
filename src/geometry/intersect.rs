//! Pairwise intersection predicates over bounds values.
//!
//! Boundary policy:
//! - rectangles use strict inequalities, so rectangles that only share an
//!   edge do **not** intersect
//! - circles (and the capsule tests built on circle distance) treat touching
//!   as intersecting, `distance <= r1 + r2`
//!
//! [`rect_intersect_circle`] and [`line_intersect_circle`] are deliberately
//! approximate: the first only falls back to the rectangle's bottom-left to
//! top-right diagonal when the center is outside the rectangle, the second
//! clamps the circle center into the box spanned by the segment endpoints.
//! Both are exact for the axis-aligned, short probes the resolver issues and
//! are kept as-is so tunneling tolerance stays unchanged.

use glam::Vec2;

use super::bounds::{CapsuleBounds, CircleBounds, ColliderBounds, RectBounds};

const SEGMENT_EPSILON: f32 = 1e-12;

/// Separating-axis test for two axis-aligned rectangles.
pub fn rect_intersect_rect(r1: &RectBounds, r2: &RectBounds) -> bool {
    let tl1 = r1.top_left;
    let br1 = r1.bottom_right;
    let tl2 = r2.top_left;
    let br2 = r2.bottom_right;

    if tl1.x >= br2.x || tl2.x >= br1.x {
        return false;
    }
    if tl1.y <= br2.y || tl2.y <= br1.y {
        return false;
    }
    true
}

pub fn circle_intersect_circle(c1: &CircleBounds, c2: &CircleBounds) -> bool {
    c1.center.distance(c2.center) <= c1.radius + c2.radius
}

/// Center-in-rectangle projection test with a diagonal fallback.
pub fn rect_intersect_circle(r: &RectBounds, c: &CircleBounds) -> bool {
    let point = c.center;
    let a = r.top_left;
    let b = r.top_right;
    let d = r.bottom_left;

    let ap_dot_ab = (point - a).dot(b - a);
    let ab_dot_ab = (b - a).dot(b - a);
    let ap_dot_ad = (point - a).dot(d - a);
    let ad_dot_ad = (d - a).dot(d - a);
    if 0.0 <= ap_dot_ab && ap_dot_ab <= ab_dot_ab && 0.0 <= ap_dot_ad && ap_dot_ad < ad_dot_ad {
        return true;
    }

    line_intersect_circle(c, r.bottom_left, r.top_right)
}

/// Clamps the circle center into `[point_a, point_b]` per axis and tests the
/// clamped point against the radius (strict).
pub fn line_intersect_circle(c: &CircleBounds, point_a: Vec2, point_b: Vec2) -> bool {
    let point = c.center;

    let nearest_x = point_a.x.max(point.x.min(point_b.x));
    let nearest_y = point_a.y.max(point.y.min(point_b.y));

    let dx = point.x - nearest_x;
    let dy = point.y - nearest_y;

    dx * dx + dy * dy < c.radius * c.radius
}

/// Probe test for a segment against a rectangle using the segment's own
/// bounding box, exact for horizontal and vertical probes.
pub fn line_intersect_rect(r: &RectBounds, origin: Vec2, direction: Vec2, length: f32) -> bool {
    let probe = RectBounds::from_points(origin, origin + direction * length);
    rect_intersect_rect(r, &probe)
}

pub fn line_intersect_capsule(cap: &CapsuleBounds, point_a: Vec2, point_b: Vec2) -> bool {
    let (start, end) = cap.segment();
    let radius = cap.radius();
    segment_segment_distance_sq(start, end, point_a, point_b) <= radius * radius
}

pub fn capsule_intersect_capsule(c1: &CapsuleBounds, c2: &CapsuleBounds) -> bool {
    let (a0, a1) = c1.segment();
    let (b0, b1) = c2.segment();
    let reach = c1.radius() + c2.radius();
    segment_segment_distance_sq(a0, a1, b0, b1) <= reach * reach
}

pub fn capsule_intersect_circle(cap: &CapsuleBounds, cir: &CircleBounds) -> bool {
    let (start, end) = cap.segment();
    let closest = closest_point_on_segment(cir.center, start, end);
    let reach = cap.radius() + cir.radius;
    closest.distance_squared(cir.center) <= reach * reach
}

/// The core segment is vertical, so the gap between the rectangle and the
/// segment's degenerate box is the exact rectangle-to-segment distance.
pub fn capsule_intersect_rect(cap: &CapsuleBounds, rect: &RectBounds) -> bool {
    let (start, end) = cap.segment();
    let gap = aabb_gap(rect.min(), rect.max(), start.min(end), start.max(end));
    let radius = cap.radius();
    gap.length_squared() <= radius * radius
}

/// Dispatch over every shape pair.
pub fn bounds_intersect(a: &ColliderBounds, b: &ColliderBounds) -> bool {
    use ColliderBounds::*;
    match (a, b) {
        (Rect(r1), Rect(r2)) => rect_intersect_rect(r1, r2),
        (Rect(r), Circle(c)) | (Circle(c), Rect(r)) => rect_intersect_circle(r, c),
        (Rect(r), Capsule(cap)) | (Capsule(cap), Rect(r)) => capsule_intersect_rect(cap, r),
        (Circle(c1), Circle(c2)) => circle_intersect_circle(c1, c2),
        (Circle(c), Capsule(cap)) | (Capsule(cap), Circle(c)) => capsule_intersect_circle(cap, c),
        (Capsule(c1), Capsule(c2)) => capsule_intersect_capsule(c1, c2),
    }
}

pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let d = end - start;
    let len_sq = d.length_squared();
    if len_sq <= SEGMENT_EPSILON {
        return start;
    }
    let t = ((point - start).dot(d) / len_sq).clamp(0.0, 1.0);
    start + d * t
}

/// Squared distance between segments `p1-q1` and `p2-q2`.
pub fn segment_segment_distance_sq(p1: Vec2, q1: Vec2, p2: Vec2, q2: Vec2) -> f32 {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    if a <= SEGMENT_EPSILON && e <= SEGMENT_EPSILON {
        return r.length_squared();
    }

    let (s, t) = if a <= SEGMENT_EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= SEGMENT_EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s = if denom != 0.0 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    let c1 = p1 + d1 * s;
    let c2 = p2 + d2 * t;
    c1.distance_squared(c2)
}

/// Per-axis gap between two boxes given by min/max corners (zero when the
/// boxes overlap on that axis).
fn aabb_gap(min_a: Vec2, max_a: Vec2, min_b: Vec2, max_b: Vec2) -> Vec2 {
    let gap_x = (min_a.x - max_b.x).max(min_b.x - max_a.x).max(0.0);
    let gap_y = (min_a.y - max_b.y).max(min_b.y - max_a.y).max(0.0);
    Vec2::new(gap_x, gap_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(cx: f32, cy: f32, w: f32, h: f32) -> RectBounds {
        RectBounds::from_center_size(Vec2::new(cx, cy), Vec2::new(w, h))
    }

    fn circle(cx: f32, cy: f32, r: f32) -> CircleBounds {
        CircleBounds::new(Vec2::new(cx, cy), r)
    }

    // ==================== RECT VS RECT ====================

    #[test]
    fn test_rects_overlapping_intersect() {
        assert!(rect_intersect_rect(&rect(0.0, 0.0, 2.0, 2.0), &rect(1.5, 1.5, 2.0, 2.0)));
        assert!(rect_intersect_rect(&rect(0.0, 0.0, 4.0, 4.0), &rect(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_rects_separated_on_x_do_not_intersect() {
        assert!(!rect_intersect_rect(&rect(0.0, 0.0, 2.0, 2.0), &rect(3.0, 0.0, 2.0, 2.0)));
        assert!(!rect_intersect_rect(&rect(3.0, 0.0, 2.0, 2.0), &rect(0.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_rects_separated_on_y_do_not_intersect() {
        assert!(!rect_intersect_rect(&rect(0.0, 0.0, 2.0, 2.0), &rect(0.0, -3.0, 2.0, 2.0)));
        assert!(!rect_intersect_rect(&rect(0.0, 5.0, 2.0, 2.0), &rect(0.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_rects_touching_edges_do_not_intersect() {
        // shared vertical edge at x = 1
        assert!(!rect_intersect_rect(&rect(0.0, 0.0, 2.0, 2.0), &rect(2.0, 0.0, 2.0, 2.0)));
        // shared horizontal edge at y = 1
        assert!(!rect_intersect_rect(&rect(0.0, 0.0, 2.0, 2.0), &rect(0.0, 2.0, 2.0, 2.0)));
    }

    #[test]
    fn test_rect_intersection_is_symmetric_on_grid() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..200 {
            let a = rect(rng.f32() * 10.0, rng.f32() * 10.0, 0.5 + rng.f32() * 3.0, 0.5 + rng.f32() * 3.0);
            let b = rect(rng.f32() * 10.0, rng.f32() * 10.0, 0.5 + rng.f32() * 3.0, 0.5 + rng.f32() * 3.0);
            assert_eq!(rect_intersect_rect(&a, &b), rect_intersect_rect(&b, &a));
        }
    }

    // ==================== CIRCLE VS CIRCLE ====================

    #[test]
    fn test_circles_symmetric_and_distance_rule() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..200 {
            let a = circle(rng.f32() * 10.0, rng.f32() * 10.0, rng.f32() * 3.0);
            let b = circle(rng.f32() * 10.0, rng.f32() * 10.0, rng.f32() * 3.0);
            let expected = a.center.distance(b.center) <= a.radius + b.radius;
            assert_eq!(circle_intersect_circle(&a, &b), expected);
            assert_eq!(circle_intersect_circle(&a, &b), circle_intersect_circle(&b, &a));
        }
    }

    #[test]
    fn test_touching_circles_intersect() {
        assert!(circle_intersect_circle(&circle(0.0, 0.0, 1.0), &circle(2.0, 0.0, 1.0)));
        assert!(!circle_intersect_circle(&circle(0.0, 0.0, 1.0), &circle(2.5, 0.0, 1.0)));
    }

    // ==================== RECT VS CIRCLE ====================

    #[test]
    fn test_circle_center_inside_rect() {
        assert!(rect_intersect_circle(&rect(0.0, 0.0, 4.0, 4.0), &circle(1.0, -1.0, 0.1)));
    }

    #[test]
    fn test_circle_far_from_rect() {
        assert!(!rect_intersect_circle(&rect(0.0, 0.0, 2.0, 2.0), &circle(10.0, 10.0, 1.0)));
    }

    #[test]
    fn test_circle_near_diagonal_corner_detected() {
        // Just beyond the top-right corner, within radius of the diagonal box.
        assert!(rect_intersect_circle(&rect(0.0, 0.0, 2.0, 2.0), &circle(1.3, 1.3, 0.5)));
    }

    #[test]
    fn test_circle_beside_left_edge_uses_diagonal_box() {
        // Left of the box. The diagonal fallback clamps into the box spanned by
        // bottom-left/top-right, so an overlap from the side is still found.
        assert!(rect_intersect_circle(&rect(0.0, 0.0, 2.0, 2.0), &circle(-1.4, 0.0, 0.5)));
        assert!(!rect_intersect_circle(&rect(0.0, 0.0, 2.0, 2.0), &circle(-1.6, 0.0, 0.5)));
    }

    // ==================== LINE VS CIRCLE ====================

    #[test]
    fn test_line_intersect_circle_axis_aligned() {
        let c = circle(0.0, 1.0, 0.5);
        assert!(line_intersect_circle(&c, Vec2::new(-2.0, 1.2), Vec2::new(2.0, 1.2)));
        assert!(!line_intersect_circle(&c, Vec2::new(-2.0, 2.0), Vec2::new(2.0, 2.0)));
    }

    #[test]
    fn test_line_intersect_circle_reversed_endpoints_clamp_to_first() {
        // With point_a on the right the clamp pins x to point_a.
        let c = circle(0.0, 0.0, 0.5);
        assert!(!line_intersect_circle(&c, Vec2::new(2.0, 0.0), Vec2::new(-2.0, 0.0)));
    }

    // ==================== LINE VS RECT ====================

    #[test]
    fn test_line_intersect_rect_probe() {
        let r = rect(0.0, 0.0, 2.0, 2.0);
        assert!(line_intersect_rect(&r, Vec2::new(-3.0, 0.0), Vec2::X, 4.0));
        assert!(!line_intersect_rect(&r, Vec2::new(-3.0, 0.0), Vec2::X, 1.5));
        assert!(line_intersect_rect(&r, Vec2::new(0.5, 3.0), Vec2::NEG_Y, 5.0));
        assert!(!line_intersect_rect(&r, Vec2::new(0.5, 3.0), Vec2::Y, 5.0));
    }

    // ==================== CAPSULE ====================

    #[test]
    fn test_capsule_vs_rect() {
        let cap = CapsuleBounds::from_center(Vec2::ZERO, 2.0, 0.5);
        assert!(capsule_intersect_rect(&cap, &rect(0.0, -2.0, 4.0, 1.5)));
        assert!(!capsule_intersect_rect(&cap, &rect(0.0, -3.0, 4.0, 1.0)));
        assert!(capsule_intersect_rect(&cap, &rect(0.9, 0.0, 1.0, 1.0)));
        // corner region: the cap's round edge misses the box corner
        assert!(!capsule_intersect_rect(&cap, &rect(1.0, 2.0, 1.0, 1.0)));
    }

    #[test]
    fn test_capsule_vs_circle() {
        let cap = CapsuleBounds::from_center(Vec2::ZERO, 2.0, 0.5);
        assert!(capsule_intersect_circle(&cap, &circle(0.9, 0.3, 0.5)));
        assert!(!capsule_intersect_circle(&cap, &circle(1.1, 0.3, 0.5)));
        assert!(capsule_intersect_circle(&cap, &circle(0.0, 2.4, 1.0)));
    }

    #[test]
    fn test_capsule_vs_capsule() {
        let a = CapsuleBounds::from_center(Vec2::ZERO, 2.0, 0.5);
        let b = CapsuleBounds::from_center(Vec2::new(0.9, 0.0), 2.0, 0.5);
        let c = CapsuleBounds::from_center(Vec2::new(1.1, 0.0), 2.0, 0.5);
        assert!(capsule_intersect_capsule(&a, &b));
        assert!(!capsule_intersect_capsule(&a, &c));
    }

    #[test]
    fn test_line_intersect_capsule() {
        let cap = CapsuleBounds::from_center(Vec2::ZERO, 2.0, 0.5);
        assert!(line_intersect_capsule(&cap, Vec2::new(-3.0, 1.2), Vec2::new(3.0, 1.2)));
        assert!(!line_intersect_capsule(&cap, Vec2::new(-3.0, 1.6), Vec2::new(3.0, 1.6)));
    }

    #[test]
    fn test_segment_distance_crossing_is_zero() {
        let d = segment_segment_distance_sq(
            Vec2::new(-1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 1.0),
        );
        assert!(d.abs() < 1e-9);
    }

    #[test]
    fn test_dispatch_matches_direct_predicates() {
        let r = ColliderBounds::Rect(rect(0.0, 0.0, 2.0, 2.0));
        let c = ColliderBounds::Circle(circle(1.3, 1.3, 0.5));
        let cap = ColliderBounds::Capsule(CapsuleBounds::from_center(Vec2::new(5.0, 0.0), 1.0, 0.5));
        assert!(bounds_intersect(&r, &c));
        assert!(bounds_intersect(&c, &r));
        assert!(!bounds_intersect(&r, &cap));
        assert!(!bounds_intersect(&cap, &c));
    }
}
