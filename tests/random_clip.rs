// Copyright 2025 Lars Brubaker
// Randomized pointwise checks: a boolean result must agree with point
// containment in its operands away from their boundaries.

mod helpers;

use path_clipper::{FlattenOptions, Operation, Path, PathClipper, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use helpers::{distance_to_boundary, init_tracing, random_star};

const SAMPLES: usize = 200;
/// Samples closer than this to either operand's outline are skipped.
const EXCLUSION_BAND: f64 = 1e-3;

fn star_path(rng: &mut StdRng) -> Path {
    let center = Point::new(rng.gen_range(40.0..60.0), rng.gen_range(40.0..60.0));
    let points = rng.gen_range(3..12);
    let poly = random_star(rng, center, points, 10.0, 45.0);
    let mut path = Path::new();
    path.add_polygon(&poly);
    path.close_subpath();
    path
}

fn check(op: Operation, expected: impl Fn(bool, bool) -> bool, seed: u64) {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(seed);
    for round in 0..20 {
        let a = star_path(&mut rng);
        let b = star_path(&mut rng);
        let result = PathClipper::new(&a, &b)
            .try_clip(op)
            .unwrap_or_else(|e| panic!("round {round}: {e}"));

        let fo = FlattenOptions::default();
        let outlines: Vec<Vec<Point>> = a.to_polygons(&fo).into_iter().chain(b.to_polygons(&fo)).collect();

        for _ in 0..SAMPLES {
            let p = Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
            if distance_to_boundary(&outlines, p) < EXCLUSION_BAND {
                continue;
            }
            let want = expected(a.contains_point(p), b.contains_point(p));
            assert_eq!(result.contains_point(p), want, "round {round} {op:?} at {p:?}");
        }
    }
}

#[test]
fn intersection_matches_pointwise_and() {
    check(Operation::And, |a, b| a && b, 0x5eed_0001);
}

#[test]
fn union_matches_pointwise_or() {
    check(Operation::Or, |a, b| a || b, 0x5eed_0002);
}

#[test]
fn subtraction_matches_pointwise_difference() {
    check(Operation::Sub, |a, b| a && !b, 0x5eed_0003);
}

#[test]
fn self_intersecting_polygons_simplify_by_fill_rule() {
    init_tracing();
    let mut rng = StdRng::seed_from_u64(0x5eed_0004);
    for round in 0..20 {
        // Random vertices in a box give arbitrary self-crossings.
        let poly: Vec<Point> = (0..rng.gen_range(4..9))
            .map(|_| Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();
        let mut path = Path::new();
        path.add_polygon(&poly);
        path.close_subpath();
        let simplified = path.simplified();

        let outline = path.to_polygons(&FlattenOptions::default());
        for _ in 0..SAMPLES {
            let p = Point::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0));
            if distance_to_boundary(&outline, p) < EXCLUSION_BAND {
                continue;
            }
            assert_eq!(simplified.contains_point(p), path.contains_point(p), "round {round} at {p:?}");
        }
    }
}
