// Copyright 2025 Lars Brubaker
// Traversal cursor for walking face boundaries of the winged-edge mesh.

use super::EdgeIdx;

/// Which side of an edge (relative to its first -> second orientation) the
/// walked face lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Traversal {
    Right = 0,
    Left = 1,
}

impl Traversal {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Traversal::Right => Traversal::Left,
            Traversal::Left => Traversal::Right,
        }
    }
}

/// Walking direction along an edge: Forward runs first -> second.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward = 0,
    Backward = 1,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// A cursor on the mesh: an edge, the face side being walked, and the
/// walking direction. `WingedEdge::next` is the only transition; the flip
/// methods reinterpret the cursor in place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TraversalStatus {
    pub edge: EdgeIdx,
    pub traversal: Traversal,
    pub direction: Direction,
}

impl TraversalStatus {
    pub fn new(edge: EdgeIdx, traversal: Traversal, direction: Direction) -> Self {
        TraversalStatus { edge, traversal, direction }
    }

    #[inline]
    pub fn flip_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    #[inline]
    pub fn flip_traversal(&mut self) {
        self.traversal = self.traversal.flipped();
    }

    /// Same face, opposite walk: toggles side and direction together.
    #[inline]
    pub fn flip(&mut self) {
        self.flip_direction();
        self.flip_traversal();
    }

    /// True when the walked face is on the walker's left hand.
    #[inline]
    pub fn keeps_left(&self) -> bool {
        (self.traversal == Traversal::Left) == (self.direction == Direction::Forward)
    }
}
