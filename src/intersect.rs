// Copyright 2025 Lars Brubaker
// License: MIT
//
// Segment intersection and planarization.
//
// Turns the flattened boundaries of the subject and clip paths into a planar
// straight-line graph: every transversal crossing becomes a vertex, every
// endpoint lying on another segment splits that segment, and points closer
// than the tolerance are fused into one vertex. The result feeds
// WingedEdge::from_polygons.

use tracing::trace;

use crate::geom::{project_onto_segment, segment_crossing, Crossing, Point, Real};
use crate::mesh::{VertIdx, INVALID};

/// One straight piece of an input boundary, tagged with the path it came from.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SourceSegment {
    pub a: Point,
    pub b: Point,
    pub source: u8,
}

impl SourceSegment {
    #[inline]
    fn min_x(&self) -> Real {
        self.a.x.min(self.b.x)
    }

    #[inline]
    fn max_x(&self) -> Real {
        self.a.x.max(self.b.x)
    }

    #[inline]
    fn overlaps_y(&self, o: &SourceSegment, tolerance: Real) -> bool {
        self.a.y.min(self.b.y) <= o.a.y.max(o.b.y) + tolerance
            && o.a.y.min(o.b.y) <= self.a.y.max(self.b.y) + tolerance
    }
}

/// Appends the closed boundary of every polygon as directed segments.
/// Zero-length segments are skipped.
pub fn collect_segments(polys: &[Vec<Point>], source: u8, out: &mut Vec<SourceSegment>) {
    for poly in polys {
        let n = poly.len();
        if n < 2 {
            continue;
        }
        for i in 0..n {
            let a = poly[i];
            let b = poly[(i + 1) % n];
            if a != b {
                out.push(SourceSegment { a, b, source });
            }
        }
    }
}

/// Planar graph produced by `planarize`.
#[derive(Clone, Debug, Default)]
pub struct Planar {
    pub points: Vec<Point>,
    /// Directed sub-edges (from, to, source) in input order.
    pub edges: Vec<(VertIdx, VertIdx, u8)>,
}

/// A point at which a segment must be cut: parameter along the segment and
/// the node that sits there.
type Split = (Real, usize);

struct Planarizer<'a> {
    segments: &'a [SourceSegment],
    tolerance: Real,
    /// Nodes 2i and 2i+1 are the endpoints of segment i; crossings follow.
    nodes: Vec<Point>,
    splits: Vec<Vec<Split>>,
}

impl<'a> Planarizer<'a> {
    fn new(segments: &'a [SourceSegment], tolerance: Real) -> Self {
        let mut nodes = Vec::with_capacity(segments.len() * 2);
        for s in segments {
            nodes.push(s.a);
            nodes.push(s.b);
        }
        Planarizer {
            segments,
            tolerance,
            nodes,
            splits: vec![Vec::new(); segments.len()],
        }
    }

    /// Splits segment `i` at node `node` if that node lies on its interior.
    fn split_at_node(&mut self, i: usize, node: usize) -> bool {
        let s = self.segments[i];
        let p = self.nodes[node];
        if p.within(s.a, self.tolerance) || p.within(s.b, self.tolerance) {
            return false;
        }
        let (t, dist) = project_onto_segment(p, s.a, s.b);
        if dist > self.tolerance || t <= 0.0 || t >= 1.0 {
            return false;
        }
        self.splits[i].push((t, node));
        true
    }

    fn process_pair(&mut self, i: usize, j: usize) {
        let mut touched = false;
        for node in [2 * j, 2 * j + 1] {
            touched |= self.split_at_node(i, node);
        }
        for node in [2 * i, 2 * i + 1] {
            touched |= self.split_at_node(j, node);
        }
        if touched {
            return;
        }
        let si = self.segments[i];
        let sj = self.segments[j];
        if let Crossing::Proper { t, u, at } = segment_crossing(si.a, si.b, sj.a, sj.b, self.tolerance) {
            let node = self.nodes.len();
            self.nodes.push(at);
            self.splits[i].push((t, node));
            self.splits[j].push((u, node));
        }
    }

    fn find_crossings(&mut self) {
        let mut order: Vec<usize> = (0..self.segments.len()).collect();
        order.sort_by(|&a, &b| self.segments[a].min_x().total_cmp(&self.segments[b].min_x()));

        for ii in 0..order.len() {
            let i = order[ii];
            let reach = self.segments[i].max_x() + self.tolerance;
            for &j in &order[ii + 1..] {
                if self.segments[j].min_x() > reach {
                    break;
                }
                if self.segments[i].overlaps_y(&self.segments[j], self.tolerance) {
                    self.process_pair(i, j);
                }
            }
        }
    }

    /// Union-find over nodes closer than the tolerance. The representative of
    /// a cluster is its lowest node index, so input endpoints win over
    /// computed crossings.
    fn fuse_nodes(&self) -> Vec<usize> {
        let n = self.nodes.len();
        let mut parent: Vec<usize> = (0..n).collect();

        fn find(parent: &mut [usize], mut x: usize) -> usize {
            while parent[x] != x {
                parent[x] = parent[parent[x]];
                x = parent[x];
            }
            x
        }

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| self.nodes[a].x.total_cmp(&self.nodes[b].x));
        for ii in 0..n {
            let a = order[ii];
            let pa = self.nodes[a];
            for &b in &order[ii + 1..] {
                let pb = self.nodes[b];
                if pb.x - pa.x > self.tolerance {
                    break;
                }
                if pa.within(pb, self.tolerance) {
                    let ra = find(&mut parent, a);
                    let rb = find(&mut parent, b);
                    if ra != rb {
                        let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
                        parent[hi] = lo;
                    }
                }
            }
        }
        (0..n).map(|x| find(&mut parent, x)).collect()
    }

    fn finish(mut self) -> Planar {
        let roots = self.fuse_nodes();
        let mut vertex_of = vec![INVALID; self.nodes.len()];
        let mut planar = Planar::default();

        let mut chain: Vec<usize> = Vec::new();
        for (i, s) in self.segments.iter().enumerate() {
            let splits = &mut self.splits[i];
            splits.sort_by(|a, b| a.0.total_cmp(&b.0));

            chain.clear();
            chain.push(2 * i);
            chain.extend(splits.iter().map(|&(_, node)| node));
            chain.push(2 * i + 1);

            let mut prev = INVALID;
            for &node in &chain {
                let root = roots[node];
                if vertex_of[root] == INVALID {
                    vertex_of[root] = planar.points.len() as VertIdx;
                    planar.points.push(self.nodes[root]);
                }
                let v = vertex_of[root];
                if prev != INVALID && prev != v {
                    planar.edges.push((prev, v, s.source));
                }
                prev = v;
            }
        }
        planar
    }
}

/// Splits all segments at their mutual crossings and touch points and fuses
/// points closer than `tolerance`.
pub fn planarize(segments: &[SourceSegment], tolerance: Real) -> Planar {
    let mut planarizer = Planarizer::new(segments, tolerance);
    planarizer.find_crossings();
    let crossings = planarizer.nodes.len() - 2 * segments.len();
    let planar = planarizer.finish();
    trace!(
        segments = segments.len(),
        crossings,
        vertices = planar.points.len(),
        edges = planar.edges.len(),
        "planarized"
    );
    planar
}

/// True if any boundary segment of `a` touches or crosses any boundary
/// segment of `b`.
pub fn has_intersections(a: &[Vec<Point>], b: &[Vec<Point>], tolerance: Real) -> bool {
    let mut segments = Vec::new();
    collect_segments(a, 1, &mut segments);
    collect_segments(b, 2, &mut segments);
    segments.sort_by(|x, y| x.min_x().total_cmp(&y.min_x()));

    for (ii, si) in segments.iter().enumerate() {
        let reach = si.max_x() + tolerance;
        for sj in &segments[ii + 1..] {
            if sj.min_x() > reach {
                break;
            }
            if si.source == sj.source || !si.overlaps_y(sj, tolerance) {
                continue;
            }
            if segment_crossing(si.a, si.b, sj.a, sj.b, tolerance) != Crossing::None {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (Real, Real), b: (Real, Real), source: u8) -> SourceSegment {
        SourceSegment { a: a.into(), b: b.into(), source }
    }

    #[test]
    fn crossing_segments_are_split() {
        let planar = planarize(&[seg((0.0, 0.0), (2.0, 2.0), 1), seg((0.0, 2.0), (2.0, 0.0), 2)], 1e-9);
        assert_eq!(planar.points.len(), 5);
        assert_eq!(planar.edges.len(), 4);
        assert!(planar.points.iter().any(|p| p.within(Point::new(1.0, 1.0), 1e-12)));
    }

    #[test]
    fn t_junction_splits_the_through_segment() {
        let planar = planarize(&[seg((0.0, 0.0), (4.0, 0.0), 1), seg((2.0, 0.0), (2.0, 3.0), 2)], 1e-9);
        assert_eq!(planar.points.len(), 4);
        assert_eq!(planar.edges.len(), 3);
    }

    #[test]
    fn collinear_overlap_shares_the_middle() {
        let planar = planarize(&[seg((0.0, 0.0), (3.0, 0.0), 1), seg((1.0, 0.0), (4.0, 0.0), 2)], 1e-9);
        assert_eq!(planar.points.len(), 4);
        // 0-1, 1-3 from the first; 1-3, 3-4 from the second.
        assert_eq!(planar.edges.len(), 4);
        let shared: Vec<_> = planar
            .edges
            .iter()
            .map(|&(a, b, _)| (a.min(b), a.max(b)))
            .collect();
        assert_eq!(shared[1], shared[2]);
    }

    #[test]
    fn near_points_are_fused() {
        let planar = planarize(
            &[seg((0.0, 0.0), (1.0, 0.0), 1), seg((1.0 + 1e-12, 1e-12), (1.0, 1.0), 1)],
            1e-9,
        );
        assert_eq!(planar.points.len(), 3);
        assert_eq!(planar.points[1], Point::new(1.0, 0.0));
    }

    #[test]
    fn disjoint_polygons_do_not_intersect() {
        let a = vec![vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)]];
        let b = vec![vec![Point::new(5.0, 5.0), Point::new(6.0, 5.0), Point::new(5.0, 6.0)]];
        assert!(!has_intersections(&a, &b, 1e-9));
        let c = vec![vec![Point::new(1.0, 0.0), Point::new(2.0, 0.0), Point::new(2.0, 1.0)]];
        assert!(has_intersections(&a, &c, 1e-9));
    }
}
