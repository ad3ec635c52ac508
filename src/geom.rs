// Copyright 2025 Lars Brubaker
// License: MIT
//
// Pure geometric primitives shared by the flattener, the mesh, and the
// boolean pipeline. Coordinates are f64 throughout; equality is always fuzzy.

use std::ops::{Add, Mul, Neg, Sub};

pub type Real = f64;

/// Relative tolerance used by `fuzzy_compare` and `Point::fuzzy_eq`.
pub const FUZZY_EPSILON: Real = 1e-8;

/// Returns true if `v` is zero relative to `scale` (absolute when scale < 1).
#[inline]
pub fn fuzzy_is_zero(v: Real, scale: Real) -> bool {
    v.abs() <= FUZZY_EPSILON * scale.abs().max(1.0)
}

/// Relative float comparison: `a` and `b` agree to about eight significant digits.
#[inline]
pub fn fuzzy_compare(a: Real, b: Real) -> bool {
    fuzzy_is_zero(a - b, a.abs().max(b.abs()))
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    #[inline]
    pub fn dot(self, o: Point) -> Real {
        self.x * o.x + self.y * o.y
    }

    /// z component of the 3D cross product.
    #[inline]
    pub fn cross(self, o: Point) -> Real {
        self.x * o.y - self.y * o.x
    }

    #[inline]
    pub fn length(self) -> Real {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, o: Point) -> Real {
        (self - o).length()
    }

    #[inline]
    pub fn lerp(self, o: Point, t: Real) -> Point {
        Point::new(self.x + (o.x - self.x) * t, self.y + (o.y - self.y) * t)
    }

    #[inline]
    pub fn midpoint(self, o: Point) -> Point {
        Point::new(0.5 * (self.x + o.x), 0.5 * (self.y + o.y))
    }

    /// Angle of the vector in radians, in [-pi, pi].
    #[inline]
    pub fn angle(self) -> Real {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise relative comparison.
    pub fn fuzzy_eq(self, o: Point) -> bool {
        fuzzy_compare(self.x, o.x) && fuzzy_compare(self.y, o.y)
    }

    /// Absolute comparison within `tolerance` (Chebyshev, then Euclidean).
    #[inline]
    pub fn within(self, o: Point, tolerance: Real) -> bool {
        (self.x - o.x).abs() <= tolerance
            && (self.y - o.y).abs() <= tolerance
            && self.distance(o) <= tolerance
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<Real> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, s: Real) -> Point {
        Point::new(self.x * s, self.y * s)
    }
}

impl Neg for Point {
    type Output = Point;
    #[inline]
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

/// Axis-aligned rectangle stored as min/max corners. Containment and overlap
/// tests are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    pub fn new(x: Real, y: Real, width: Real, height: Real) -> Self {
        let a = Point::new(x, y);
        let b = Point::new(x + width, y + height);
        Rect::from_corners(a, b)
    }

    pub fn from_corners(a: Point, b: Point) -> Self {
        Rect {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Bounding box of a point set; `None` when the iterator is empty.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut r = Rect { min: first, max: first };
        for p in iter {
            r.include(p);
        }
        Some(r)
    }

    pub fn include(&mut self, p: Point) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn union(&self, o: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(o.min.x), self.min.y.min(o.min.y)),
            max: Point::new(self.max.x.max(o.max.x), self.max.y.max(o.max.y)),
        }
    }

    #[inline]
    pub fn width(&self) -> Real {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> Real {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Point {
        self.min.midpoint(self.max)
    }

    /// Inclusive overlap test, grown by `tolerance` on every side.
    pub fn intersects(&self, o: &Rect, tolerance: Real) -> bool {
        self.min.x <= o.max.x + tolerance
            && o.min.x <= self.max.x + tolerance
            && self.min.y <= o.max.y + tolerance
            && o.min.y <= self.max.y + tolerance
    }

    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn contains_rect(&self, o: &Rect) -> bool {
        self.contains_point(o.min) && self.contains_point(o.max)
    }

    /// Largest absolute coordinate value; the scale for relative tolerances.
    pub fn magnitude(&self) -> Real {
        self.min
            .x
            .abs()
            .max(self.min.y.abs())
            .max(self.max.x.abs())
            .max(self.max.y.abs())
            .max(self.width())
            .max(self.height())
    }
}

/// Affine transform. Maps (x, y) to (m11*x + m21*y + dx, m12*x + m22*y + dy).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub m11: Real,
    pub m12: Real,
    pub m21: Real,
    pub m22: Real,
    pub dx: Real,
    pub dy: Real,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub const fn identity() -> Self {
        Transform { m11: 1.0, m12: 0.0, m21: 0.0, m22: 1.0, dx: 0.0, dy: 0.0 }
    }

    pub fn from_translation(dx: Real, dy: Real) -> Self {
        Transform { dx, dy, ..Self::identity() }
    }

    pub fn from_scale(sx: Real, sy: Real) -> Self {
        Transform { m11: sx, m22: sy, ..Self::identity() }
    }

    /// Counter-clockwise rotation (y-up) by `degrees` about the origin.
    pub fn from_rotation(degrees: Real) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Transform { m11: c, m12: s, m21: -s, m22: c, dx: 0.0, dy: 0.0 }
    }

    /// Returns the transform that applies `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            m11: self.m11 * next.m11 + self.m12 * next.m21,
            m12: self.m11 * next.m12 + self.m12 * next.m22,
            m21: self.m21 * next.m11 + self.m22 * next.m21,
            m22: self.m21 * next.m12 + self.m22 * next.m22,
            dx: self.dx * next.m11 + self.dy * next.m21 + next.dx,
            dy: self.dx * next.m12 + self.dy * next.m22 + next.dy,
        }
    }

    pub fn translate(&self, dx: Real, dy: Real) -> Transform {
        self.then(&Transform::from_translation(dx, dy))
    }

    pub fn scale(&self, sx: Real, sy: Real) -> Transform {
        self.then(&Transform::from_scale(sx, sy))
    }

    pub fn rotate(&self, degrees: Real) -> Transform {
        self.then(&Transform::from_rotation(degrees))
    }

    #[inline]
    pub fn map(&self, p: Point) -> Point {
        Point::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }
}

// ─────────────────────────── Segment predicates ───────────────────────────────

/// Orientation of `c` relative to the directed line a->b: positive when c is
/// to the left (counter-clockwise, y-up).
#[inline]
pub fn orient(a: Point, b: Point, c: Point) -> Real {
    (b - a).cross(c - a)
}

/// Projects `p` onto segment a-b. Returns the clamped parameter and the
/// distance from `p` to the closest point of the segment.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> (Real, Real) {
    let d = b - a;
    let len2 = d.dot(d);
    if len2 == 0.0 {
        return (0.0, p.distance(a));
    }
    let t = ((p - a).dot(d) / len2).clamp(0.0, 1.0);
    (t, p.distance(a.lerp(b, t)))
}

/// Result of intersecting two segments a0-a1 and b0-b1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Crossing {
    None,
    /// The segments cross transversally at `at`, strictly inside both.
    Proper { t: Real, u: Real, at: Point },
    /// The segments touch: an endpoint of one lies on the other, or they
    /// overlap collinearly.
    Touch,
}

/// Sign of an orientation value, treating magnitudes within `tolerance`
/// distance of the reference line (length `len`) as zero.
#[inline]
fn fuzzy_sign(v: Real, len: Real, tolerance: Real) -> i32 {
    if v.abs() <= tolerance * len {
        0
    } else if v > 0.0 {
        1
    } else {
        -1
    }
}

/// Classifies the contact between two segments. `tolerance` is an absolute
/// distance under which points are considered to lie on a segment.
pub fn segment_crossing(a0: Point, a1: Point, b0: Point, b1: Point, tolerance: Real) -> Crossing {
    let la = a0.distance(a1);
    let lb = b0.distance(b1);

    let d1 = fuzzy_sign(orient(b0, b1, a0), lb, tolerance);
    let d2 = fuzzy_sign(orient(b0, b1, a1), lb, tolerance);
    let d3 = fuzzy_sign(orient(a0, a1, b0), la, tolerance);
    let d4 = fuzzy_sign(orient(a0, a1, b1), la, tolerance);

    if d1 * d2 < 0 && d3 * d4 < 0 {
        let o1 = orient(b0, b1, a0);
        let o2 = orient(b0, b1, a1);
        let t = o1 / (o1 - o2);
        let o3 = orient(a0, a1, b0);
        let o4 = orient(a0, a1, b1);
        let u = o3 / (o3 - o4);
        return Crossing::Proper { t, u, at: a0.lerp(a1, t) };
    }

    let touches = [
        project_onto_segment(a0, b0, b1).1,
        project_onto_segment(a1, b0, b1).1,
        project_onto_segment(b0, a0, a1).1,
        project_onto_segment(b1, a0, a1).1,
    ]
    .iter()
    .any(|&d| d <= tolerance);

    if touches {
        Crossing::Touch
    } else {
        Crossing::None
    }
}

/// Shoelace signed area; positive for counter-clockwise polygons (y-up).
pub fn signed_area(poly: &[Point]) -> Real {
    let n = poly.len();
    if n < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += poly[i].cross(poly[j]);
    }
    area * 0.5
}

/// Closed polygon perimeter.
pub fn perimeter(poly: &[Point]) -> Real {
    let n = poly.len();
    (0..n).map(|i| poly[i].distance(poly[(i + 1) % n])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_compare_is_relative() {
        assert!(fuzzy_compare(1000.0, 1000.0 + 1e-7));
        assert!(!fuzzy_compare(1.0, 1.0 + 1e-6));
        assert!(fuzzy_compare(0.0, 1e-9));
    }

    #[test]
    fn orient_ccw() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        assert!(orient(a, b, Point::new(0.5, 1.0)) > 0.0);
        assert!(orient(a, b, Point::new(0.5, -1.0)) < 0.0);
    }

    #[test]
    fn proper_crossing_at_center() {
        let c = segment_crossing(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
            1e-12,
        );
        match c {
            Crossing::Proper { t, u, at } => {
                assert!((t - 0.5).abs() < 1e-12);
                assert!((u - 0.5).abs() < 1e-12);
                assert!(at.within(Point::new(0.5, 0.5), 1e-12));
            }
            other => panic!("expected proper crossing, got {:?}", other),
        }
    }

    #[test]
    fn t_junction_is_touch() {
        let c = segment_crossing(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 5.0),
            1e-12,
        );
        assert_eq!(c, Crossing::Touch);
    }

    #[test]
    fn parallel_segments_do_not_cross() {
        let c = segment_crossing(
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(2.0, 1.0),
            1e-12,
        );
        assert_eq!(c, Crossing::None);
    }

    #[test]
    fn transform_rotation_then_translation() {
        let t = Transform::from_rotation(90.0).translate(10.0, 0.0);
        let p = t.map(Point::new(1.0, 0.0));
        assert!(p.within(Point::new(10.0, 1.0), 1e-12), "got {:?}", p);
    }

    #[test]
    fn builder_methods_compose_in_call_order() {
        let t = Transform::identity().scale(2.0, 3.0).rotate(90.0).translate(1.0, 1.0);
        // (1, 1) -> (2, 3) -> (-3, 2) -> (-2, 3)
        let p = t.map(Point::new(1.0, 1.0));
        assert!(p.within(Point::new(-2.0, 3.0), 1e-12), "got {:?}", p);

        let back = Transform::from_translation(1.0, 1.0).scale(2.0, 2.0);
        assert!(back.map(Point::new(0.0, 0.0)).within(Point::new(2.0, 2.0), 1e-12));
    }

    #[test]
    fn rect_magnitude_uses_largest_coordinate() {
        let r = Rect::new(-5.0, 2.0, 1.0, 1.0);
        assert_eq!(r.magnitude(), 5.0);
    }

    #[test]
    fn signed_area_of_ccw_square() {
        let sq = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ];
        assert_eq!(signed_area(&sq), 4.0);
        assert_eq!(perimeter(&sq), 8.0);
    }
}
