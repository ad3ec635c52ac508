// Copyright 2025 Lars Brubaker
// Shared test utilities for path-clipper tests.

#![allow(dead_code)]

use path_clipper::geom::{fuzzy_compare, signed_area};
use path_clipper::{FlattenOptions, Path, Point, Real, Rect};
use rand::rngs::StdRng;
use rand::Rng;

/// Installs a tracing subscriber honouring RUST_LOG. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn rect_path(x: Real, y: Real, w: Real, h: Real) -> Path {
    let mut p = Path::new();
    p.add_rect(Rect::new(x, y, w, h));
    p
}

/// Closed polygon path through `points`.
pub fn polygon_path(points: &[(Real, Real)]) -> Path {
    let pts: Vec<Point> = points.iter().map(|&(x, y)| Point::new(x, y)).collect();
    let mut p = Path::new();
    p.add_polygon(&pts);
    p.close_subpath();
    p
}

/// Flattened contours of a path.
pub fn contours(path: &Path) -> Vec<Vec<Point>> {
    path.to_polygons(&FlattenOptions::default())
}

/// Sum of signed contour areas (holes subtract).
pub fn total_area(path: &Path) -> Real {
    contours(path).iter().map(|c| signed_area(c)).sum()
}

fn points_fuzzy_eq(a: Point, b: Point) -> bool {
    fuzzy_compare(a.x, b.x) && fuzzy_compare(a.y, b.y)
}

/// True if `b` is `a` rotated and possibly reversed.
fn cyclic_eq(a: &[Point], b: &[Point]) -> bool {
    let n = a.len();
    if n != b.len() {
        return false;
    }
    if n == 0 {
        return true;
    }
    (0..n).any(|shift| {
        (0..n).all(|i| points_fuzzy_eq(a[i], b[(i + shift) % n]))
            || (0..n).all(|i| points_fuzzy_eq(a[i], b[(shift + n - i) % n]))
    })
}

/// Two paths describe the same contours, up to contour order, starting
/// point and traversal direction.
pub fn paths_equivalent(a: &Path, b: &Path) -> bool {
    let ca = contours(a);
    let mut cb = contours(b);
    if ca.len() != cb.len() {
        return false;
    }
    for c in &ca {
        match cb.iter().position(|d| cyclic_eq(c, d)) {
            Some(i) => {
                cb.swap_remove(i);
            }
            None => return false,
        }
    }
    true
}

/// Random star-shaped (hence simple) polygon around `center`.
pub fn random_star(rng: &mut StdRng, center: Point, points: usize, min_r: Real, max_r: Real) -> Vec<Point> {
    let offset: Real = rng.gen_range(0.0..std::f64::consts::TAU);
    (0..points)
        .map(|i| {
            let angle = offset + std::f64::consts::TAU * i as Real / points as Real;
            let r = rng.gen_range(min_r..max_r);
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect()
}

/// Distance from `p` to the nearest boundary segment of any contour.
pub fn distance_to_boundary(polys: &[Vec<Point>], p: Point) -> Real {
    let mut best = Real::INFINITY;
    for poly in polys {
        let n = poly.len();
        for i in 0..n {
            let (_, d) = path_clipper::geom::project_onto_segment(p, poly[i], poly[(i + 1) % n]);
            best = best.min(d);
        }
    }
    best
}
