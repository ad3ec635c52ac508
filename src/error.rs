// Copyright 2025 Lars Brubaker
// Error type for boolean path operations.

use thiserror::Error;

use crate::mesh::EdgeIdx;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipError {
    /// An input path carries a NaN or infinite coordinate.
    #[error("non-finite coordinate in {operand} path at element {index}")]
    NonFiniteCoordinate { operand: Operand, index: usize },

    /// A boundary walk did not return to its starting edge.
    #[error("contour starting at edge {edge} does not close")]
    OpenContour { edge: EdgeIdx },

    /// The planarized mesh has no usable edges even though the inputs were
    /// not empty.
    #[error("input collapsed to a degenerate mesh")]
    DegenerateMesh,
}

/// Which input of a two-path operation an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Subject,
    Clip,
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Subject => f.write_str("subject"),
            Operand::Clip => f.write_str("clip"),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClipError>;
