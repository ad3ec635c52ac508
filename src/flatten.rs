// Copyright 2025 Lars Brubaker
// License: MIT
//
// Curve flattening. Quadratic and cubic Beziers are sampled uniformly in
// parameter space; the sample count comes from Wang's formula so the chord
// error stays under the requested tolerance. Arcs are converted to cubics
// first (at most 90 degrees per cubic).

use crate::geom::{Point, Real, Rect};
use crate::path::{Path, PathElement};

/// Maximum chord deviation, in path units, for curve flattening.
pub const DEFAULT_FLATNESS: Real = 0.025;
/// Upper bound on the number of line segments a single curve becomes.
pub const DEFAULT_MAX_CURVE_SEGMENTS: usize = 128;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FlattenOptions {
    pub tolerance: Real,
    pub max_segments: usize,
}

impl Default for FlattenOptions {
    fn default() -> Self {
        FlattenOptions {
            tolerance: DEFAULT_FLATNESS,
            max_segments: DEFAULT_MAX_CURVE_SEGMENTS,
        }
    }
}

/// Wang's formula: the number of uniform segments needed for a Bezier of
/// `degree` whose largest second difference has length `m`.
fn segment_count(degree: usize, m: Real, options: &FlattenOptions) -> usize {
    let tolerance = options.tolerance.max(Real::EPSILON);
    let factor = (degree * (degree - 1)) as Real / 8.0;
    let n = (factor * m / tolerance).sqrt().ceil();
    if !n.is_finite() {
        return options.max_segments.max(1);
    }
    (n as usize).clamp(1, options.max_segments.max(1))
}

/// Pushes `p` unless it repeats the previous point exactly; zero-length
/// segments would only be fused away downstream.
#[inline]
fn push_distinct(out: &mut Vec<Point>, p: Point) {
    if out.last() != Some(&p) {
        out.push(p);
    }
}

pub fn quad_point(p0: Point, p1: Point, p2: Point, t: Real) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt;
    let b = 2.0 * mt * t;
    let c = t * t;
    Point::new(a * p0.x + b * p1.x + c * p2.x, a * p0.y + b * p1.y + c * p2.y)
}

pub fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: Real) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * p1.x + c * p2.x + d * p3.x,
        a * p0.y + b * p1.y + c * p2.y + d * p3.y,
    )
}

/// Appends the flattened quadratic to `out`. `p0` is assumed to already be
/// the last point of `out`; `p2` is appended exactly.
pub fn flatten_quad(p0: Point, p1: Point, p2: Point, options: &FlattenOptions, out: &mut Vec<Point>) {
    let m = (p0 - p1 * 2.0 + p2).length();
    let n = segment_count(2, m, options);
    for i in 1..n {
        let t = i as Real / n as Real;
        push_distinct(out, quad_point(p0, p1, p2, t));
    }
    push_distinct(out, p2);
}

/// Appends the flattened cubic to `out`. `p0` is assumed to already be the
/// last point of `out`; `p3` is appended exactly.
pub fn flatten_cubic(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    options: &FlattenOptions,
    out: &mut Vec<Point>,
) {
    let m = (p0 - p1 * 2.0 + p2)
        .length()
        .max((p1 - p2 * 2.0 + p3).length());
    let n = segment_count(3, m, options);
    for i in 1..n {
        let t = i as Real / n as Real;
        push_distinct(out, cubic_point(p0, p1, p2, p3, t));
    }
    push_distinct(out, p3);
}

fn finish_polygon(poly: &mut Vec<Point>, polys: &mut Vec<Vec<Point>>) {
    if poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() >= 2 {
        polys.push(std::mem::take(poly));
    } else {
        poly.clear();
    }
}

/// Splits every subpath of `path` into a closed polygon (the closing edge
/// is implicit). Subpaths that collapse to fewer than two distinct points
/// are dropped.
pub fn flatten_path(path: &Path, options: &FlattenOptions) -> Vec<Vec<Point>> {
    let mut polys: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut start = Point::default();

    for e in path.elements() {
        match *e {
            PathElement::MoveTo(p) => {
                finish_polygon(&mut current, &mut polys);
                current.push(p);
                start = p;
            }
            PathElement::LineTo(p) => {
                if current.is_empty() {
                    current.push(start);
                }
                push_distinct(&mut current, p);
            }
            PathElement::QuadTo(c, p) => {
                if current.is_empty() {
                    current.push(start);
                }
                let p0 = *current.last().unwrap_or(&start);
                flatten_quad(p0, c, p, options, &mut current);
            }
            PathElement::CubicTo(c1, c2, p) => {
                if current.is_empty() {
                    current.push(start);
                }
                let p0 = *current.last().unwrap_or(&start);
                flatten_cubic(p0, c1, c2, p, options, &mut current);
            }
            PathElement::Close => {
                finish_polygon(&mut current, &mut polys);
            }
        }
    }
    finish_polygon(&mut current, &mut polys);
    polys
}

/// Converts an elliptical arc inscribed in `rect` into cubic segments.
/// Angles are in degrees, counter-clockwise from the positive x axis (y-up).
/// Returns the arc start point and the cubics as `[c1, c2, end]`.
pub fn arc_to_cubics(rect: Rect, start_deg: Real, sweep_deg: Real) -> (Point, Vec<[Point; 3]>) {
    let center = rect.center();
    let rx = rect.width() * 0.5;
    let ry = rect.height() * 0.5;
    let on_ellipse = |a: Real| Point::new(center.x + rx * a.cos(), center.y + ry * a.sin());

    let sweep_deg = sweep_deg.clamp(-360.0, 360.0);
    let start = start_deg.to_radians();
    let start_point = on_ellipse(start);
    if sweep_deg == 0.0 || !sweep_deg.is_finite() {
        return (start_point, Vec::new());
    }

    let pieces = (sweep_deg.abs() / 90.0).ceil().max(1.0) as usize;
    let step = sweep_deg.to_radians() / pieces as Real;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut curves = Vec::with_capacity(pieces);
    let mut a0 = start;
    for i in 0..pieces {
        let a1 = if i + 1 == pieces {
            start + sweep_deg.to_radians()
        } else {
            a0 + step
        };
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();
        let p3 = on_ellipse(a1);
        let p1 = Point::new(
            center.x + rx * (c0 - k * s0),
            center.y + ry * (s0 + k * c0),
        );
        let p2 = Point::new(
            center.x + rx * (c1 + k * s1),
            center.y + ry * (s1 - k * c1),
        );
        curves.push([p1, p2, p3]);
        a0 = a1;
    }
    (start_point, curves)
}
