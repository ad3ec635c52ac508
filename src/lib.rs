// path-clipper: boolean operations on painter paths over a winged-edge mesh
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod clipper;
pub mod error;
pub mod flatten;
pub mod geom;
pub mod intersect;
pub mod mesh;
pub mod path;
pub mod winding;

pub use clipper::{clip, ClipOptions, Operation, PathClipper};
pub use error::{ClipError, Operand};
pub use flatten::FlattenOptions;
pub use geom::{Point, Real, Rect, Transform};
pub use mesh::{Direction, Traversal, TraversalStatus, WingedEdge};
pub use path::{FillRule, Path, PathElement};
