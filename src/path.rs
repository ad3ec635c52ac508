// Copyright 2025 Lars Brubaker
// License: MIT
//
// Painter path: an ordered list of subpaths made of straight and curved
// segments, plus the fill rule that decides which points are inside.

use crate::flatten::{self, FlattenOptions};
use crate::geom::{project_onto_segment, Point, Real, Rect, Transform};

/// How winding numbers map to inside/outside.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// Inside when the winding number is odd.
    #[default]
    OddEven,
    /// Inside when the winding number is non-zero.
    Winding,
}

impl FillRule {
    #[inline]
    pub fn is_inside(self, winding: i32) -> bool {
        match self {
            FillRule::OddEven => winding & 1 != 0,
            FillRule::Winding => winding != 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathElement {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bezier: control point, end point.
    QuadTo(Point, Point),
    /// Cubic Bezier: two control points, end point.
    CubicTo(Point, Point, Point),
    /// Closes the current subpath back to its starting point.
    Close,
}

impl PathElement {
    /// The point this element leaves the pen at, if it moves the pen.
    pub fn end_point(&self) -> Option<Point> {
        match *self {
            PathElement::MoveTo(p) | PathElement::LineTo(p) => Some(p),
            PathElement::QuadTo(_, p) | PathElement::CubicTo(_, _, p) => Some(p),
            PathElement::Close => None,
        }
    }

    /// Returns the element with every point passed through `f`.
    pub fn map_points<F: Fn(Point) -> Point>(&self, f: F) -> PathElement {
        match *self {
            PathElement::MoveTo(p) => PathElement::MoveTo(f(p)),
            PathElement::LineTo(p) => PathElement::LineTo(f(p)),
            PathElement::QuadTo(c, p) => PathElement::QuadTo(f(c), f(p)),
            PathElement::CubicTo(c1, c2, p) => PathElement::CubicTo(f(c1), f(c2), f(p)),
            PathElement::Close => PathElement::Close,
        }
    }

    fn for_each_point<F: FnMut(Point)>(&self, mut f: F) {
        match *self {
            PathElement::MoveTo(p) | PathElement::LineTo(p) => f(p),
            PathElement::QuadTo(c, p) => {
                f(c);
                f(p);
            }
            PathElement::CubicTo(c1, c2, p) => {
                f(c1);
                f(c2);
                f(p);
            }
            PathElement::Close => {}
        }
    }
}

/// A painter path. Drawing into an empty path (or after `close_subpath`)
/// starts implicitly at the last subpath start, which is the origin for a
/// fresh path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    elements: Vec<PathElement>,
    fill_rule: FillRule,
    start: Point,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fill_rule(fill_rule: FillRule) -> Self {
        Path { fill_rule, ..Self::default() }
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn set_fill_rule(&mut self, fill_rule: FillRule) {
        self.fill_rule = fill_rule;
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// True when the path has no drawing elements (a lone move_to counts as empty).
    pub fn is_empty(&self) -> bool {
        !self
            .elements
            .iter()
            .any(|e| !matches!(e, PathElement::MoveTo(_)))
    }

    /// Pen position after the last element.
    pub fn current_position(&self) -> Point {
        match self.elements.last() {
            None | Some(PathElement::Close) => self.start,
            Some(e) => e.end_point().unwrap_or(self.start),
        }
    }

    // ───────────────────────────── Builders ────────────────────────────────

    pub fn move_to(&mut self, p: impl Into<Point>) -> &mut Self {
        let p = p.into();
        if let Some(PathElement::MoveTo(last)) = self.elements.last_mut() {
            *last = p;
        } else {
            self.elements.push(PathElement::MoveTo(p));
        }
        self.start = p;
        self
    }

    fn ensure_subpath(&mut self) {
        match self.elements.last() {
            None | Some(PathElement::Close) => {
                let start = self.start;
                self.elements.push(PathElement::MoveTo(start));
            }
            _ => {}
        }
    }

    pub fn line_to(&mut self, p: impl Into<Point>) -> &mut Self {
        self.ensure_subpath();
        self.elements.push(PathElement::LineTo(p.into()));
        self
    }

    pub fn quad_to(&mut self, c: impl Into<Point>, p: impl Into<Point>) -> &mut Self {
        self.ensure_subpath();
        self.elements.push(PathElement::QuadTo(c.into(), p.into()));
        self
    }

    pub fn cubic_to(
        &mut self,
        c1: impl Into<Point>,
        c2: impl Into<Point>,
        p: impl Into<Point>,
    ) -> &mut Self {
        self.ensure_subpath();
        self.elements
            .push(PathElement::CubicTo(c1.into(), c2.into(), p.into()));
        self
    }

    /// Appends an elliptical arc inscribed in `rect`, starting at
    /// `start_deg` and sweeping `sweep_deg` (positive is counter-clockwise,
    /// y-up). A line joins the current position to the arc start.
    pub fn arc_to(&mut self, rect: Rect, start_deg: Real, sweep_deg: Real) -> &mut Self {
        let (start, curves) = flatten::arc_to_cubics(rect, start_deg, sweep_deg);
        let has_subpath = matches!(
            self.elements.last(),
            Some(e) if !matches!(e, PathElement::Close)
        );
        if has_subpath {
            if self.current_position() != start {
                self.line_to(start);
            }
        } else {
            self.move_to(start);
        }
        for [c1, c2, p] in curves {
            self.cubic_to(c1, c2, p);
        }
        self
    }

    /// Closes the current subpath. A no-op when there is nothing to close.
    pub fn close_subpath(&mut self) -> &mut Self {
        match self.elements.last() {
            None | Some(PathElement::Close) | Some(PathElement::MoveTo(_)) => {}
            _ => self.elements.push(PathElement::Close),
        }
        self
    }

    pub fn add_rect(&mut self, rect: Rect) -> &mut Self {
        self.move_to(rect.min);
        self.line_to((rect.max.x, rect.min.y));
        self.line_to(rect.max);
        self.line_to((rect.min.x, rect.max.y));
        self.close_subpath()
    }

    pub fn add_polygon(&mut self, points: &[Point]) -> &mut Self {
        if let Some((&first, rest)) = points.split_first() {
            self.move_to(first);
            for &p in rest {
                self.line_to(p);
            }
        }
        self
    }

    pub fn add_ellipse(&mut self, rect: Rect) -> &mut Self {
        let (start, curves) = flatten::arc_to_cubics(rect, 0.0, 360.0);
        self.move_to(start);
        for [c1, c2, p] in curves {
            self.cubic_to(c1, c2, p);
        }
        self.close_subpath()
    }

    /// Appends every subpath of `other`. The fill rule of `self` is kept.
    pub fn add_path(&mut self, other: &Path) -> &mut Self {
        for e in &other.elements {
            match *e {
                PathElement::MoveTo(p) => {
                    self.drop_dangling_move();
                    self.elements.push(PathElement::MoveTo(p));
                    self.start = p;
                }
                PathElement::Close => {
                    self.elements.push(PathElement::Close);
                }
                other => self.elements.push(other),
            }
        }
        self
    }

    fn drop_dangling_move(&mut self) {
        if let Some(PathElement::MoveTo(_)) = self.elements.last() {
            self.elements.pop();
        }
    }

    // ───────────────────────────── Queries ─────────────────────────────────

    /// Bounding box of every point, control points included.
    pub fn control_point_rect(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        for e in &self.elements {
            e.for_each_point(|p| match rect.as_mut() {
                Some(r) => r.include(p),
                None => rect = Some(Rect { min: p, max: p }),
            });
        }
        rect
    }

    /// Bounding box of the flattened outline.
    pub fn bounding_rect(&self) -> Option<Rect> {
        let polys = self.to_polygons(&FlattenOptions::default());
        Rect::from_points(polys.iter().flatten().copied())
    }

    /// Each subpath flattened to a closed polygon. Subpaths with fewer than
    /// two distinct points are dropped.
    pub fn to_polygons(&self, options: &FlattenOptions) -> Vec<Vec<Point>> {
        flatten::flatten_path(self, options)
    }

    /// Index of the first element carrying a NaN or infinite coordinate.
    pub fn first_non_finite(&self) -> Option<usize> {
        self.elements.iter().position(|e| {
            let mut bad = false;
            e.for_each_point(|p| bad |= !p.is_finite());
            bad
        })
    }

    pub fn translated(&self, dx: Real, dy: Real) -> Path {
        self.transformed(&Transform::from_translation(dx, dy))
    }

    pub fn transformed(&self, transform: &Transform) -> Path {
        Path {
            elements: self
                .elements
                .iter()
                .map(|e| e.map_points(|p| transform.map(p)))
                .collect(),
            fill_rule: self.fill_rule,
            start: transform.map(self.start),
        }
    }

    /// Inclusive point containment: points on the outline count as inside.
    /// Open subpaths are treated as implicitly closed.
    pub fn contains_point(&self, p: impl Into<Point>) -> bool {
        let p = p.into();
        let polys = self.to_polygons(&FlattenOptions::default());
        let Some(bounds) = Rect::from_points(polys.iter().flatten().copied()) else {
            return false;
        };
        let tolerance = bounds.magnitude() * crate::geom::FUZZY_EPSILON;
        if !bounds.intersects(&Rect { min: p, max: p }, tolerance) {
            return false;
        }
        polygons_contain(&polys, self.fill_rule, p, tolerance)
    }
}

/// Winding test over already-flattened polygons. Boundary points are inside.
pub(crate) fn polygons_contain(
    polys: &[Vec<Point>],
    fill_rule: FillRule,
    p: Point,
    tolerance: Real,
) -> bool {
    let mut winding = 0i32;
    for poly in polys {
        let n = poly.len();
        for i in 0..n {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            if project_onto_segment(p, a, b).1 <= tolerance {
                return true;
            }
            // Half-open rule on y so a vertex on the ray is counted once.
            if a.y <= p.y && p.y < b.y {
                if crate::geom::orient(a, b, p) > 0.0 {
                    winding += 1;
                }
            } else if b.y <= p.y && p.y < a.y && crate::geom::orient(a, b, p) < 0.0 {
                winding -= 1;
            }
        }
    }
    fill_rule.is_inside(winding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_on_empty_path_starts_at_origin() {
        let mut p = Path::new();
        p.line_to((10.0, 0.0));
        assert_eq!(p.elements()[0], PathElement::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(p.element_count(), 2);
    }

    #[test]
    fn consecutive_move_to_collapses() {
        let mut p = Path::new();
        p.move_to((1.0, 1.0)).move_to((2.0, 2.0)).line_to((3.0, 3.0));
        assert_eq!(p.element_count(), 2);
        assert_eq!(p.elements()[0], PathElement::MoveTo(Point::new(2.0, 2.0)));
    }

    #[test]
    fn drawing_after_close_restarts_at_subpath_start() {
        let mut p = Path::new();
        p.move_to((5.0, 5.0)).line_to((6.0, 5.0)).close_subpath();
        p.line_to((5.0, 9.0));
        assert_eq!(p.elements()[3], PathElement::MoveTo(Point::new(5.0, 5.0)));
    }

    #[test]
    fn rect_contains_interior_and_boundary() {
        let mut p = Path::new();
        p.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(p.contains_point((5.0, 5.0)));
        assert!(p.contains_point((10.0, 5.0)));
        assert!(p.contains_point((0.0, 0.0)));
        assert!(!p.contains_point((10.5, 5.0)));
        assert!(!p.contains_point((-1.0, -1.0)));
    }

    #[test]
    fn fill_rule_controls_nested_contours() {
        let mut p = Path::new();
        p.add_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        p.add_rect(Rect::new(2.0, 2.0, 6.0, 6.0));
        assert!(!p.contains_point((5.0, 5.0)));
        p.set_fill_rule(FillRule::Winding);
        assert!(p.contains_point((5.0, 5.0)));
    }

    #[test]
    fn open_subpath_is_implicitly_closed() {
        let mut p = Path::new();
        p.move_to((0.0, 0.0)).line_to((10.0, 0.0)).line_to((10.0, 10.0));
        assert!(p.contains_point((8.0, 2.0)));
        assert!(!p.contains_point((2.0, 8.0)));
    }

    #[test]
    fn control_point_rect_includes_handles() {
        let mut p = Path::new();
        p.cubic_to((0.0, 20.0), (10.0, 20.0), (10.0, 0.0));
        let r = p.control_point_rect().unwrap();
        assert_eq!(r.max.y, 20.0);
        let b = p.bounding_rect().unwrap();
        assert!(b.max.y < 20.0 && b.max.y > 14.0, "got {}", b.max.y);
    }

    #[test]
    fn translated_moves_every_point() {
        let mut p = Path::new();
        p.add_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let q = p.translated(5.0, -5.0);
        assert_eq!(q.elements()[0], PathElement::MoveTo(Point::new(5.0, -5.0)));
        assert!(q.contains_point((5.5, -4.5)));
    }

    #[test]
    fn arc_to_starts_a_subpath_or_joins_with_a_line() {
        let rect = Rect::new(-1.0, -1.0, 2.0, 2.0);
        let mut p = Path::new();
        p.arc_to(rect, 0.0, 90.0);
        assert_eq!(p.element_count(), 2);
        assert!(matches!(p.elements()[0], PathElement::MoveTo(s) if s.within(Point::new(1.0, 0.0), 1e-12)));

        let mut q = Path::new();
        q.move_to((0.0, 0.0)).arc_to(rect, 0.0, 90.0);
        assert_eq!(q.element_count(), 3);
        assert_eq!(q.elements()[1], PathElement::LineTo(Point::new(1.0, 0.0)));
        // Continuing from the previous arc end needs no connecting line.
        q.arc_to(rect, 90.0, 90.0);
        assert_eq!(q.element_count(), 4);
        assert!(q.current_position().within(Point::new(-1.0, 0.0), 1e-12));
    }

    #[test]
    fn add_path_drops_a_dangling_move() {
        let mut a = Path::new();
        a.add_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        a.move_to((50.0, 50.0));
        let mut b = Path::with_fill_rule(FillRule::Winding);
        b.add_rect(Rect::new(2.0, 2.0, 1.0, 1.0));
        a.add_path(&b);
        assert_eq!(a.element_count(), 10);
        assert_eq!(a.elements()[5], PathElement::MoveTo(Point::new(2.0, 2.0)));
        assert_eq!(a.fill_rule(), FillRule::OddEven);
        assert!(a.contains_point((2.5, 2.5)));
        assert!(a.contains_point((0.5, 0.5)));
        assert!(!a.contains_point((50.0, 50.0)));
    }

    #[test]
    fn ellipse_is_four_cubics() {
        let mut p = Path::new();
        p.add_ellipse(Rect::new(-1.0, -1.0, 2.0, 2.0));
        let cubics = p
            .elements()
            .iter()
            .filter(|e| matches!(e, PathElement::CubicTo(..)))
            .count();
        assert_eq!(cubics, 4);
        assert!(p.contains_point((0.0, 0.0)));
        assert!(p.contains_point((0.7, 0.7)));
        assert!(!p.contains_point((0.75, 0.75)));
    }
}
