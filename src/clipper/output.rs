// Copyright 2025 Lars Brubaker
// Contour extraction: walks labelled boundary edges into closed subpaths.

use tracing::trace;

use super::PathClipper;
use crate::geom::{perimeter, signed_area, Point, Real};
use crate::mesh::{Direction, EdgeIdx, Traversal, TraversalStatus, WingedEdge};
use crate::path::{FillRule, Path};
use crate::winding::EdgeLabel;

pub(crate) struct Extraction {
    pub path: Path,
    /// First boundary edge whose walk failed to return to its start.
    pub open: Option<EdgeIdx>,
}

impl<'a> PathClipper<'a> {
    /// Walks every boundary edge once, keeping the result region on the
    /// walker's left. Outer contours come out counter-clockwise and holes
    /// clockwise.
    pub(crate) fn extract_contours(
        &self,
        mesh: &WingedEdge,
        labels: &[EdgeLabel],
        tolerance: Real,
    ) -> Extraction {
        let boundary_count = labels.iter().filter(|l| l.is_boundary()).count();
        let mut visited = vec![false; labels.len()];
        let mut path = Path::with_fill_rule(FillRule::Winding);
        let mut open = None;
        let mut contours = 0usize;

        for (e, label) in labels.iter().enumerate() {
            if visited[e] || !label.is_boundary() {
                continue;
            }
            let start = if label.inside_left {
                TraversalStatus::new(e as EdgeIdx, Traversal::Left, Direction::Forward)
            } else {
                TraversalStatus::new(e as EdgeIdx, Traversal::Right, Direction::Backward)
            };

            match walk_contour(mesh, labels, start, boundary_count, &mut visited) {
                Some(points) => {
                    if let Some(points) = clean_contour(points, tolerance) {
                        path.add_polygon(&points);
                        path.close_subpath();
                        contours += 1;
                    }
                }
                None if open.is_none() => open = Some(e as EdgeIdx),
                None => {}
            }
        }

        trace!(boundary_edges = boundary_count, contours, "extracted contours");
        Extraction { path, open }
    }
}

/// Follows boundary edges from `start` until it comes back. Returns `None`
/// if the walk exceeds `max_steps` or gets stuck at a vertex.
fn walk_contour(
    mesh: &WingedEdge,
    labels: &[EdgeLabel],
    start: TraversalStatus,
    max_steps: usize,
    visited: &mut [bool],
) -> Option<Vec<Point>> {
    let mut points = Vec::new();
    let mut status = start;
    for _ in 0..max_steps {
        visited[status.edge as usize] = true;
        points.push(mesh.departure(status));

        let pivot = mesh.edge(status.edge).vertex(status.direction);
        let mut turns = mesh.vertex(pivot).edges().len();
        status = mesh.next(status);
        while !labels[status.edge as usize].is_boundary() {
            if turns == 0 {
                return None;
            }
            turns -= 1;
            status.flip();
            status = mesh.next(status);
        }

        if status == start {
            return Some(points);
        }
        if visited[status.edge as usize] {
            return None;
        }
    }
    None
}

/// Drops repeated points, collinear pass-through vertices and spikes, then
/// rejects what is left if it encloses no area.
fn clean_contour(mut points: Vec<Point>, tolerance: Real) -> Option<Vec<Point>> {
    loop {
        let before = points.len();
        points.dedup_by(|b, a| b.within(*a, tolerance));
        while points.len() > 1 && points[0].within(points[points.len() - 1], tolerance) {
            points.pop();
        }

        let mut i = 0;
        while points.len() >= 3 && i < points.len() {
            let n = points.len();
            let a = points[(i + n - 1) % n];
            let b = points[i];
            let c = points[(i + 1) % n];
            let ab = b - a;
            let bc = c - b;
            if ab.cross(bc).abs() <= tolerance * (ab.length() + bc.length()) {
                points.remove(i);
            } else {
                i += 1;
            }
        }

        if points.len() == before || points.len() < 3 {
            break;
        }
    }

    if points.len() < 3 || signed_area(&points).abs() <= tolerance * perimeter(&points) {
        return None;
    }
    Some(points)
}
