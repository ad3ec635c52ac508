// Copyright 2025 Lars Brubaker
// License: MIT
//
// Winged-edge planar mesh.
//
// Vertices and edges live in flat Vec arenas and refer to each other by u32
// index. Every edge runs first -> second and carries four "wing" pointers:
// the next edge to take when arriving at either endpoint while walking the
// face on either side.
//
// Design:
//   - Each vertex keeps its incident edges sorted counter-clockwise (y-up)
//     by outgoing angle. The wings are derived from that ring and updated
//     incrementally whenever an edge is placed.
//   - Walking with the face on the walker's left turns clockwise at each
//     vertex; walking with it on the right turns counter-clockwise.
//   - Vertices closer than the mesh tolerance are the same vertex.

pub mod traversal;

use smallvec::SmallVec;
use tracing::trace;

use crate::geom::{Point, Real};
use crate::intersect;
pub use traversal::{Direction, Traversal, TraversalStatus};

pub const INVALID: u32 = u32::MAX;

/// Index into WingedEdge::vertices
pub type VertIdx = u32;
/// Index into WingedEdge::edges
pub type EdgeIdx = u32;

/// Edge provenance flags.
pub const SOURCE_SUBJECT: u8 = 1;
pub const SOURCE_CLIP: u8 = 2;

/// Default absolute vertex-fusion distance for hand-built meshes.
pub const DEFAULT_TOLERANCE: Real = 1e-9;

#[derive(Clone, Debug)]
pub struct Vertex {
    pub point: Point,
    /// Incident edges, counter-clockwise by outgoing angle.
    ring: SmallVec<[EdgeIdx; 4]>,
}

impl Vertex {
    pub fn edges(&self) -> &[EdgeIdx] {
        &self.ring
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub first: VertIdx,
    pub second: VertIdx,
    /// Wing pointers indexed by [traversal][direction].
    next: [[EdgeIdx; 2]; 2],
    /// Net number of subject boundary passes along first -> second.
    pub winding_a: i32,
    /// Net number of clip boundary passes along first -> second.
    pub winding_b: i32,
    /// SOURCE_SUBJECT / SOURCE_CLIP bits of the input paths that produced it.
    pub source: u8,
    /// Angle of first -> second.
    pub angle: Real,
    /// Angle of second -> first.
    pub inv_angle: Real,
}

impl Edge {
    fn new(first: VertIdx, second: VertIdx, a: Point, b: Point) -> Self {
        Edge {
            first,
            second,
            next: [[INVALID; 2]; 2],
            winding_a: 0,
            winding_b: 0,
            source: 0,
            angle: (b - a).angle(),
            inv_angle: (a - b).angle(),
        }
    }

    /// The vertex reached when walking in `direction`.
    #[inline]
    pub fn vertex(&self, direction: Direction) -> VertIdx {
        match direction {
            Direction::Forward => self.second,
            Direction::Backward => self.first,
        }
    }

    #[inline]
    pub fn next(&self, traversal: Traversal, direction: Direction) -> EdgeIdx {
        self.next[traversal as usize][direction as usize]
    }

    #[inline]
    fn set_next(&mut self, traversal: Traversal, direction: Direction, e: EdgeIdx) {
        self.next[traversal as usize][direction as usize] = e;
    }

    /// Angle of the edge as seen leaving `v`.
    #[inline]
    pub fn outgoing_angle(&self, v: VertIdx) -> Real {
        if v == self.first {
            self.angle
        } else {
            self.inv_angle
        }
    }

    #[inline]
    pub fn other(&self, v: VertIdx) -> VertIdx {
        if v == self.first {
            self.second
        } else {
            self.first
        }
    }
}

/// The winged-edge mesh.
#[derive(Clone, Debug)]
pub struct WingedEdge {
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    tolerance: Real,
}

impl Default for WingedEdge {
    fn default() -> Self {
        Self::new()
    }
}

impl WingedEdge {
    pub fn new() -> Self {
        Self::with_tolerance(DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: Real) -> Self {
        WingedEdge {
            vertices: Vec::new(),
            edges: Vec::new(),
            tolerance: tolerance.max(0.0),
        }
    }

    /// Builds the planar mesh of one or two flattened polygon sets: every
    /// crossing is split, near-coincident points are fused, and shared
    /// boundary pieces become a single edge carrying both windings.
    pub fn from_polygons(subject: &[Vec<Point>], clip: &[Vec<Point>], tolerance: Real) -> Self {
        let mut segments = Vec::new();
        intersect::collect_segments(subject, SOURCE_SUBJECT, &mut segments);
        intersect::collect_segments(clip, SOURCE_CLIP, &mut segments);
        let planar = intersect::planarize(&segments, tolerance);

        let mut mesh = WingedEdge::with_tolerance(tolerance);
        mesh.vertices.reserve(planar.points.len());
        mesh.edges.reserve(planar.edges.len());
        for p in planar.points {
            mesh.push_vertex(p);
        }
        for (a, b, source) in planar.edges {
            mesh.add_source_edge(a, b, source);
        }
        trace!(
            segments = segments.len(),
            vertices = mesh.vertex_count(),
            edges = mesh.edge_count(),
            "built winged-edge mesh"
        );
        mesh
    }

    // ──────────────────────────────── Access ───────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn tolerance(&self) -> Real {
        self.tolerance
    }

    pub fn vertex(&self, v: VertIdx) -> &Vertex {
        &self.vertices[v as usize]
    }

    pub fn edge(&self, e: EdgeIdx) -> &Edge {
        &self.edges[e as usize]
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Point of the vertex a cursor departs from.
    #[inline]
    pub fn departure(&self, status: TraversalStatus) -> Point {
        let e = &self.edges[status.edge as usize];
        self.vertices[e.vertex(status.direction.flipped()) as usize].point
    }

    /// Point of the vertex a cursor arrives at.
    #[inline]
    pub fn arrival(&self, status: TraversalStatus) -> Point {
        let e = &self.edges[status.edge as usize];
        self.vertices[e.vertex(status.direction) as usize].point
    }

    // ────────────────────────────── Vertices ───────────────────────────────

    /// Finds a vertex within the mesh tolerance of `p`.
    pub fn find_vertex(&self, p: Point) -> Option<VertIdx> {
        self.vertices
            .iter()
            .position(|v| v.point.within(p, self.tolerance))
            .map(|i| i as VertIdx)
    }

    /// Returns the vertex at `p`, creating it if no vertex is within tolerance.
    pub fn insert_vertex(&mut self, p: Point) -> VertIdx {
        match self.find_vertex(p) {
            Some(v) => v,
            None => self.push_vertex(p),
        }
    }

    fn push_vertex(&mut self, p: Point) -> VertIdx {
        self.vertices.push(Vertex { point: p, ring: SmallVec::new() });
        (self.vertices.len() - 1) as VertIdx
    }

    // ─────────────────────────────── Edges ─────────────────────────────────

    /// The edge joining `a` and `b` in either orientation, if any.
    pub fn common_edge(&self, a: VertIdx, b: VertIdx) -> Option<EdgeIdx> {
        self.vertices[a as usize]
            .ring
            .iter()
            .copied()
            .find(|&e| self.edges[e as usize].other(a) == b)
    }

    /// Adds an edge between two points, reusing vertices within tolerance.
    /// Returns the existing edge if the points are already joined and `None`
    /// if both points fuse into one vertex.
    pub fn add_edge(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) -> Option<EdgeIdx> {
        let a = self.insert_vertex(p1.into());
        let b = self.insert_vertex(p2.into());
        self.add_edge_between(a, b)
    }

    /// Adds an edge between two existing vertices.
    pub fn add_edge_between(&mut self, a: VertIdx, b: VertIdx) -> Option<EdgeIdx> {
        if a == b || a as usize >= self.vertices.len() || b as usize >= self.vertices.len() {
            return None;
        }
        if let Some(common) = self.common_edge(a, b) {
            return Some(common);
        }
        let pa = self.vertices[a as usize].point;
        let pb = self.vertices[b as usize].point;
        self.edges.push(Edge::new(a, b, pa, pb));
        let e = (self.edges.len() - 1) as EdgeIdx;
        self.place_edge(e, a);
        self.place_edge(e, b);
        Some(e)
    }

    /// Adds (or merges into) the edge a -> b as one boundary pass of the
    /// given source path.
    pub(crate) fn add_source_edge(&mut self, a: VertIdx, b: VertIdx, source: u8) -> Option<EdgeIdx> {
        let e = self.add_edge_between(a, b)?;
        let edge = &mut self.edges[e as usize];
        let w = if edge.first == a { 1 } else { -1 };
        if source & SOURCE_SUBJECT != 0 {
            edge.winding_a += w;
        }
        if source & SOURCE_CLIP != 0 {
            edge.winding_b += w;
        }
        edge.source |= source;
        Some(e)
    }

    /// Inserts `e` into the angular ring of `v` and rewires the wings of the
    /// edge and its two ring neighbours at `v`.
    fn place_edge(&mut self, e: EdgeIdx, v: VertIdx) {
        let angle = self.edges[e as usize].outgoing_angle(v);
        let edges = &self.edges;
        let ring = &mut self.vertices[v as usize].ring;
        let pos = ring.partition_point(|&x| {
            let a = edges[x as usize].outgoing_angle(v);
            a < angle || (a == angle && x < e)
        });
        ring.insert(pos, e);

        let n = ring.len();
        let cw = ring[(pos + n - 1) % n];
        let ccw = ring[(pos + 1) % n];
        self.link_at(cw, v);
        self.link_at(e, v);
        self.link_at(ccw, v);
    }

    /// Recomputes the wings of `x` at its endpoint `v` from the ring order.
    fn link_at(&mut self, x: EdgeIdx, v: VertIdx) {
        let ring = &self.vertices[v as usize].ring;
        let Some(pos) = ring.iter().position(|&r| r == x) else {
            return;
        };
        let n = ring.len();
        let cw = ring[(pos + n - 1) % n];
        let ccw = ring[(pos + 1) % n];

        let edge = &mut self.edges[x as usize];
        if edge.second == v {
            edge.set_next(Traversal::Left, Direction::Forward, cw);
            edge.set_next(Traversal::Right, Direction::Forward, ccw);
        }
        if edge.first == v {
            edge.set_next(Traversal::Right, Direction::Backward, cw);
            edge.set_next(Traversal::Left, Direction::Backward, ccw);
        }
    }

    // ───────────────────────────── Traversal ───────────────────────────────

    /// Advances the cursor to the next edge around the same face.
    pub fn next(&self, status: TraversalStatus) -> TraversalStatus {
        let sp = &self.edges[status.edge as usize];
        let mut result = TraversalStatus {
            edge: sp.next(status.traversal, status.direction),
            ..status
        };
        let rp = &self.edges[result.edge as usize];
        if sp.vertex(status.direction) == rp.vertex(status.direction) {
            result.flip();
        }
        result
    }

    /// Number of `next` steps to return to `start`, or `None` if the walk
    /// does not close within twice the edge count.
    pub fn loop_length(&self, start: TraversalStatus) -> Option<usize> {
        let limit = 2 * self.edges.len();
        let mut status = start;
        for steps in 1..=limit {
            status = self.next(status);
            if status == start {
                return Some(steps);
            }
        }
        None
    }

    /// Number of distinct face boundary walks. Each connected component
    /// contributes its own outer walk.
    pub fn face_count(&self) -> usize {
        let mut visited = vec![[false; 2]; self.edges.len()];
        let mut faces = 0;
        for e in 0..self.edges.len() {
            for traversal in [Traversal::Left, Traversal::Right] {
                if visited[e][traversal as usize] {
                    continue;
                }
                let direction = match traversal {
                    Traversal::Left => Direction::Forward,
                    Traversal::Right => Direction::Backward,
                };
                let start = TraversalStatus::new(e as EdgeIdx, traversal, direction);
                let mut status = start;
                loop {
                    visited[status.edge as usize][status.traversal as usize] = true;
                    status = self.next(status);
                    if status == start || visited[status.edge as usize][status.traversal as usize] {
                        break;
                    }
                }
                faces += 1;
            }
        }
        faces
    }

    /// Connected components among vertices that have at least one edge.
    pub fn component_count(&self) -> usize {
        let mut seen = vec![false; self.vertices.len()];
        let mut stack: Vec<VertIdx> = Vec::new();
        let mut components = 0;
        for (v, vertex) in self.vertices.iter().enumerate() {
            if seen[v] || vertex.ring.is_empty() {
                continue;
            }
            components += 1;
            seen[v] = true;
            stack.push(v as VertIdx);
            while let Some(u) = stack.pop() {
                for &e in &self.vertices[u as usize].ring {
                    let w = self.edges[e as usize].other(u);
                    if !seen[w as usize] {
                        seen[w as usize] = true;
                        stack.push(w);
                    }
                }
            }
        }
        components
    }

    /// Vertices with at least one edge.
    pub fn connected_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| !v.ring.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(e: EdgeIdx, t: Traversal, d: Direction) -> TraversalStatus {
        TraversalStatus::new(e, t, d)
    }

    #[test]
    fn add_edge_creates_two_vertices() {
        let mut mesh = WingedEdge::new();
        let e = mesh.add_edge((0.0, 0.0), (1.0, 0.0)).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.edge_count(), 1);
        assert_ne!(mesh.edge(e).first, mesh.edge(e).second);
    }

    #[test]
    fn vertex_reuse_follows_tolerance() {
        let mut mesh = WingedEdge::with_tolerance(0.5);
        assert_eq!(mesh.tolerance(), 0.5);
        let a = mesh.insert_vertex(Point::new(0.0, 0.0));
        assert_eq!(mesh.insert_vertex(Point::new(0.3, 0.0)), a);
        assert_ne!(mesh.insert_vertex(Point::new(0.6, 0.0)), a);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn degenerate_edge_is_rejected() {
        let mut mesh = WingedEdge::new();
        assert!(mesh.add_edge((1.0, 1.0), (1.0, 1.0)).is_none());
        assert!(mesh.add_edge((1.0, 1.0), (1.0, 1.0 + 1e-12)).is_none());
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn duplicate_edge_returns_existing() {
        let mut mesh = WingedEdge::new();
        let e = mesh.add_edge((0.0, 0.0), (1.0, 0.0)).unwrap();
        assert_eq!(mesh.add_edge((1.0, 0.0), (0.0, 0.0)), Some(e));
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn ring_is_sorted_counter_clockwise() {
        let mut mesh = WingedEdge::new();
        let e1 = mesh.add_edge((0.0, 0.0), (10.0, 0.0)).unwrap();
        let e2 = mesh.add_edge((0.0, 0.0), (0.0, 10.0)).unwrap();
        let e3 = mesh.add_edge((0.0, 0.0), (-10.0, 0.0)).unwrap();
        let e4 = mesh.add_edge((0.0, 0.0), (0.0, -10.0)).unwrap();
        let origin = mesh.find_vertex(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(mesh.vertex(origin).edges(), &[e4, e1, e2, e3]);
    }

    #[test]
    fn dead_end_turns_back_on_itself() {
        let mut mesh = WingedEdge::new();
        let e = mesh.add_edge((0.0, 0.0), (1.0, 0.0)).unwrap();
        let s = mesh.next(status(e, Traversal::Left, Direction::Forward));
        assert_eq!(s, status(e, Traversal::Right, Direction::Backward));
        assert_eq!(mesh.loop_length(status(e, Traversal::Left, Direction::Forward)), Some(2));
    }

    #[test]
    fn source_edges_merge_windings() {
        let mut mesh = WingedEdge::new();
        let a = mesh.insert_vertex(Point::new(0.0, 0.0));
        let b = mesh.insert_vertex(Point::new(1.0, 0.0));
        let e = mesh.add_source_edge(a, b, SOURCE_SUBJECT).unwrap();
        mesh.add_source_edge(b, a, SOURCE_CLIP);
        mesh.add_source_edge(b, a, SOURCE_SUBJECT);
        let edge = mesh.edge(e);
        assert_eq!(edge.winding_a, 0);
        assert_eq!(edge.winding_b, -1);
        assert_eq!(edge.source, SOURCE_SUBJECT | SOURCE_CLIP);
    }

    #[test]
    fn crossing_squares_are_split() {
        let a = vec![vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]];
        let b = vec![vec![
            Point::new(5.0, 5.0),
            Point::new(15.0, 5.0),
            Point::new(15.0, 15.0),
            Point::new(5.0, 15.0),
        ]];
        let mesh = WingedEdge::from_polygons(&a, &b, 1e-9);
        // 8 corners + 2 crossings; each square gains 2 edges from the splits.
        assert_eq!(mesh.vertex_count(), 10);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 4);
    }
}
