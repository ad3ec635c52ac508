// Copyright 2025 Lars Brubaker
// License: MIT
//
// Face/winding classifier.
//
// For every mesh edge, the winding numbers of the subject and clip paths are
// evaluated just left and just right of the edge's midpoint by casting a ray
// along the scan line through that midpoint and summing the signed windings
// of every other edge it crosses. The fill rules turn those numbers into
// inside/outside, and the boolean operation combines subject and clip.
//
// The scan line runs horizontally for steep edges and vertically for flat
// ones, so the edge being classified always crosses it cleanly. Crossings
// use the half-open rule [min, max) so a vertex on the scan line is counted
// once.

use crate::clipper::Operation;
use crate::geom::{Point, Real};
use crate::mesh::{Edge, EdgeIdx, WingedEdge};
use crate::path::FillRule;

/// Subject and clip winding numbers of one face.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceWinding {
    pub subject: i32,
    pub clip: i32,
}

/// Windings on either side of an edge, relative to its first -> second
/// orientation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SideWindings {
    pub left: FaceWinding,
    pub right: FaceWinding,
}

/// Whether the result region lies on each side of an edge.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeLabel {
    pub inside_left: bool,
    pub inside_right: bool,
}

impl EdgeLabel {
    /// The edge separates the result from its complement.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.inside_left != self.inside_right
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    /// Scan line y = const; crossings ordered by x.
    Horizontal,
    /// Scan line x = const; crossings ordered by y.
    Vertical,
}

#[inline]
fn signum(v: Real) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Where `edge` crosses the scan line `at` on `axis`, and its signed
/// direction across it. `None` if the half-open span misses the line.
#[inline]
fn scan_crossing(a: Point, b: Point, axis: Axis, at: Real) -> Option<(Real, i32)> {
    match axis {
        Axis::Horizontal => {
            let (lo, hi) = if a.y < b.y { (a.y, b.y) } else { (b.y, a.y) };
            if !(lo <= at && at < hi) {
                return None;
            }
            let x = a.x + (at - a.y) * (b.x - a.x) / (b.y - a.y);
            Some((x, signum(b.y - a.y)))
        }
        Axis::Vertical => {
            let (lo, hi) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
            if !(lo <= at && at < hi) {
                return None;
            }
            let y = a.y + (at - a.x) * (b.y - a.y) / (b.x - a.x);
            Some((y, -signum(b.x - a.x)))
        }
    }
}

pub struct WindingClassifier<'m> {
    mesh: &'m WingedEdge,
    subject_rule: FillRule,
    clip_rule: FillRule,
}

impl<'m> WindingClassifier<'m> {
    pub fn new(mesh: &'m WingedEdge, subject_rule: FillRule, clip_rule: FillRule) -> Self {
        WindingClassifier { mesh, subject_rule, clip_rule }
    }

    fn endpoints(&self, edge: &Edge) -> (Point, Point) {
        (
            self.mesh.vertex(edge.first).point,
            self.mesh.vertex(edge.second).point,
        )
    }

    /// Subject and clip windings immediately to the left and right of `e`.
    pub fn side_windings(&self, e: EdgeIdx) -> SideWindings {
        let edge = self.mesh.edge(e);
        let (p, q) = self.endpoints(edge);
        let d = q - p;
        let mid = p.midpoint(q);
        let (axis, at, own) = if d.y.abs() >= d.x.abs() {
            (Axis::Horizontal, mid.y, mid.x)
        } else {
            (Axis::Vertical, mid.x, mid.y)
        };

        let mut acc = FaceWinding::default();
        for (k, other) in self.mesh.edges().iter().enumerate() {
            if k as EdgeIdx == e || (other.winding_a == 0 && other.winding_b == 0) {
                continue;
            }
            let (a, b) = self.endpoints(other);
            if let Some((pos, dir)) = scan_crossing(a, b, axis, at) {
                if pos < own {
                    acc.subject += other.winding_a * dir;
                    acc.clip += other.winding_b * dir;
                }
            }
        }

        let own_dir = match axis {
            Axis::Horizontal => signum(d.y),
            Axis::Vertical => -signum(d.x),
        };
        let before = FaceWinding { subject: -acc.subject, clip: -acc.clip };
        let after = FaceWinding {
            subject: before.subject - edge.winding_a * own_dir,
            clip: before.clip - edge.winding_b * own_dir,
        };

        // Which of before/after is the edge's left side.
        let left_is_before = match axis {
            Axis::Horizontal => d.y > 0.0,
            Axis::Vertical => d.x < 0.0,
        };
        if left_is_before {
            SideWindings { left: before, right: after }
        } else {
            SideWindings { left: after, right: before }
        }
    }

    fn is_inside(&self, w: FaceWinding, op: Operation) -> bool {
        let a = self.subject_rule.is_inside(w.subject);
        let b = self.clip_rule.is_inside(w.clip);
        match op {
            Operation::And => a && b,
            Operation::Or => a || b,
            Operation::Sub => a && !b,
            Operation::Simplify => a,
        }
    }

    pub fn label(&self, e: EdgeIdx, op: Operation) -> EdgeLabel {
        let sides = self.side_windings(e);
        EdgeLabel {
            inside_left: self.is_inside(sides.left, op),
            inside_right: self.is_inside(sides.right, op),
        }
    }

    /// Labels every edge of the mesh for `op`.
    pub fn classify(&self, op: Operation) -> Vec<EdgeLabel> {
        (0..self.mesh.edge_count())
            .map(|e| self.label(e as EdgeIdx, op))
            .collect()
    }
}
