// Copyright 2025 Lars Brubaker
// License: MIT
//
// Boolean operations on painter paths.
//
// Pipeline per call: flatten both paths, planarize their boundaries into a
// winged-edge mesh, label every edge with the winding classifier, then walk
// the labelled boundary edges into closed contours. The mesh lives only for
// the duration of one call.

mod output;


use tracing::{debug, trace, warn};

use crate::error::{ClipError, Operand, Result};
use crate::flatten::{FlattenOptions, DEFAULT_FLATNESS, DEFAULT_MAX_CURVE_SEGMENTS};
use crate::geom::{Point, Real, Rect};
use crate::intersect;
use crate::mesh::WingedEdge;
use crate::path::{polygons_contain, Path};
use crate::winding::WindingClassifier;

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Points inside both paths.
    And,
    /// Points inside either path.
    Or,
    /// Points inside the subject but not the clip.
    Sub,
    /// The subject alone, with self-intersections resolved by its fill rule.
    Simplify,
}

/// Vertex fusion distance, relative to the largest input coordinate.
pub const DEFAULT_FUZZ: Real = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClipOptions {
    /// Maximum chord deviation when flattening curves.
    pub flatness: Real,
    /// Upper bound on line segments per curve.
    pub max_curve_segments: usize,
    /// Relative tolerance under which points are fused.
    pub fuzz: Real,
}

impl Default for ClipOptions {
    fn default() -> Self {
        ClipOptions {
            flatness: DEFAULT_FLATNESS,
            max_curve_segments: DEFAULT_MAX_CURVE_SEGMENTS,
            fuzz: DEFAULT_FUZZ,
        }
    }
}

impl ClipOptions {
    pub fn flatten_options(&self) -> FlattenOptions {
        FlattenOptions {
            tolerance: self.flatness,
            max_segments: self.max_curve_segments,
        }
    }
}

// ──────────────────────────────── PathClipper ──────────────────────────────────

/// Boolean engine over a subject and a clip path. Borrowed inputs are never
/// modified.
pub struct PathClipper<'a> {
    subject: &'a Path,
    clip: &'a Path,
    options: ClipOptions,
}

/// Flattened inputs with the fusion tolerance derived from their extent.
struct Prepared {
    subject: Vec<Vec<Point>>,
    clip: Vec<Vec<Point>>,
    tolerance: Real,
}

impl<'a> PathClipper<'a> {
    pub fn new(subject: &'a Path, clip: &'a Path) -> Self {
        PathClipper {
            subject,
            clip,
            options: ClipOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ClipOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: ClipOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &ClipOptions {
        &self.options
    }

    fn check_finite(&self) -> Result<()> {
        if let Some(index) = self.subject.first_non_finite() {
            return Err(ClipError::NonFiniteCoordinate { operand: Operand::Subject, index });
        }
        if let Some(index) = self.clip.first_non_finite() {
            return Err(ClipError::NonFiniteCoordinate { operand: Operand::Clip, index });
        }
        Ok(())
    }

    fn prepare(&self, with_clip: bool) -> Prepared {
        let fo = self.options.flatten_options();
        let subject = self.subject.to_polygons(&fo);
        let clip = if with_clip { self.clip.to_polygons(&fo) } else { Vec::new() };
        let extent = subject
            .iter()
            .chain(clip.iter())
            .flatten()
            .fold(0.0, |m: Real, p| m.max(p.x.abs()).max(p.y.abs()));
        Prepared {
            subject,
            clip,
            tolerance: self.options.fuzz.max(0.0) * extent,
        }
    }

    /// Results that follow from emptiness or disjoint bounds alone.
    fn shortcut(&self, op: Operation) -> Option<Path> {
        let subject_empty = self.subject.is_empty();
        let clip_empty = self.clip.is_empty();
        match op {
            Operation::Simplify if subject_empty => return Some(Path::new()),
            Operation::Or if subject_empty && clip_empty => return Some(Path::new()),
            Operation::And if subject_empty || clip_empty => return Some(Path::new()),
            Operation::Sub if subject_empty => return Some(Path::new()),
            Operation::Sub if clip_empty => return Some(self.subject.clone()),
            _ => {}
        }
        if !matches!(op, Operation::And | Operation::Sub) {
            return None;
        }
        let (a, b) = (self.subject.control_point_rect()?, self.clip.control_point_rect()?);
        let tolerance = self.options.fuzz * a.union(&b).magnitude();
        if a.intersects(&b, tolerance) {
            return None;
        }
        trace!(?op, "bounding boxes are disjoint");
        match op {
            Operation::And => Some(Path::new()),
            _ => Some(self.subject.clone()),
        }
    }

    fn execute(&self, op: Operation) -> Result<output::Extraction> {
        self.check_finite()?;
        if let Some(path) = self.shortcut(op) {
            return Ok(output::Extraction { path, open: None });
        }

        let prepared = self.prepare(op != Operation::Simplify);
        let mesh = WingedEdge::from_polygons(&prepared.subject, &prepared.clip, prepared.tolerance);
        debug!(
            ?op,
            vertices = mesh.vertex_count(),
            edges = mesh.edge_count(),
            tolerance = prepared.tolerance,
            "clipping"
        );
        if mesh.edge_count() == 0 {
            return Err(ClipError::DegenerateMesh);
        }

        let classifier = WindingClassifier::new(&mesh, self.subject.fill_rule(), self.clip.fill_rule());
        let labels = classifier.classify(op);
        Ok(self.extract_contours(&mesh, &labels, prepared.tolerance))
    }

    /// Runs `op`, reporting invalid input and traversal failures.
    pub fn try_clip(&self, op: Operation) -> Result<Path> {
        let extraction = self.execute(op)?;
        match extraction.open {
            Some(edge) => Err(ClipError::OpenContour { edge }),
            None => Ok(extraction.path),
        }
    }

    /// Runs `op`. Never fails: invalid input yields an empty path and a
    /// contour that cannot be closed is left out of the result.
    pub fn clip(&self, op: Operation) -> Path {
        match self.execute(op) {
            Ok(extraction) => {
                if let Some(edge) = extraction.open {
                    warn!(?op, edge, "dropped a contour that does not close");
                }
                extraction.path
            }
            Err(ClipError::DegenerateMesh) => {
                debug!(?op, "inputs have no area");
                Path::new()
            }
            Err(e) => {
                warn!(?op, error = %e, "boolean operation failed");
                Path::new()
            }
        }
    }

    /// True if the filled regions of subject and clip share at least one
    /// point, boundaries included.
    pub fn intersect(&self) -> bool {
        if let Err(e) = self.check_finite() {
            warn!(error = %e, "intersection test on invalid input");
            return false;
        }
        if self.subject.is_empty() || self.clip.is_empty() {
            return false;
        }
        let (Some(ra), Some(rb)) = (self.subject.control_point_rect(), self.clip.control_point_rect())
        else {
            return false;
        };
        if !ra.intersects(&rb, self.options.fuzz * ra.union(&rb).magnitude()) {
            return false;
        }
        if self.subject.elements() == self.clip.elements() {
            return true;
        }

        let prepared = self.prepare(true);
        if intersect::has_intersections(&prepared.subject, &prepared.clip, prepared.tolerance) {
            return true;
        }
        // No boundary contact: either nested or apart.
        starts_inside(&prepared.clip, &prepared.subject, self.subject, prepared.tolerance)
            || starts_inside(&prepared.subject, &prepared.clip, self.clip, prepared.tolerance)
    }

    /// True if the subject's filled region contains the clip's, with no
    /// boundary contact.
    pub fn contains(&self) -> bool {
        if let Err(e) = self.check_finite() {
            warn!(error = %e, "containment test on invalid input");
            return false;
        }
        if self.subject.is_empty() || self.clip.is_empty() {
            return false;
        }
        if self.subject.elements() == self.clip.elements() {
            return false;
        }
        let (Some(ra), Some(rb)) = (self.subject.control_point_rect(), self.clip.control_point_rect())
        else {
            return false;
        };
        if !ra.intersects(&rb, self.options.fuzz * ra.union(&rb).magnitude()) {
            return false;
        }

        // Control points may stick out past the curve, so nesting is only
        // checked on the flattened outlines.
        let prepared = self.prepare(true);
        let (Some(fa), Some(fb)) = (
            Rect::from_points(prepared.subject.iter().flatten().copied()),
            Rect::from_points(prepared.clip.iter().flatten().copied()),
        ) else {
            return false;
        };
        if !fa.contains_rect(&fb) {
            return false;
        }
        if intersect::has_intersections(&prepared.subject, &prepared.clip, prepared.tolerance) {
            return false;
        }
        let all_inside = prepared
            .clip
            .iter()
            .filter_map(|poly| poly.first())
            .all(|&p| polygons_contain(&prepared.subject, self.subject.fill_rule(), p, prepared.tolerance));
        // A subject hole inside the clip would leave part of the clip uncovered.
        all_inside && !starts_inside(&prepared.subject, &prepared.clip, self.clip, prepared.tolerance)
    }
}

/// True if the first point of any polygon in `polys` lies in `region`.
fn starts_inside(polys: &[Vec<Point>], region: &[Vec<Point>], region_path: &Path, tolerance: Real) -> bool {
    polys
        .iter()
        .filter_map(|poly| poly.first())
        .any(|&p| polygons_contain(region, region_path.fill_rule(), p, tolerance))
}

/// Runs `op` on `subject` and `clip` with default options.
pub fn clip(subject: &Path, clip: &Path, op: Operation) -> Path {
    PathClipper::new(subject, clip).clip(op)
}

// ───────────────────────────── Path conveniences ──────────────────────────────

impl Path {
    /// Region inside both paths.
    pub fn intersected(&self, other: &Path) -> Path {
        PathClipper::new(self, other).clip(Operation::And)
    }

    /// Region inside either path.
    pub fn united(&self, other: &Path) -> Path {
        PathClipper::new(self, other).clip(Operation::Or)
    }

    /// Region inside this path and outside `other`.
    pub fn subtracted(&self, other: &Path) -> Path {
        PathClipper::new(self, other).clip(Operation::Sub)
    }

    /// The filled region of this path as non-overlapping contours.
    pub fn simplified(&self) -> Path {
        let empty = Path::new();
        PathClipper::new(self, &empty).clip(Operation::Simplify)
    }

    pub fn intersects(&self, other: &Path) -> bool {
        PathClipper::new(self, other).intersect()
    }

    /// True if `other` lies entirely inside this path.
    pub fn contains_path(&self, other: &Path) -> bool {
        PathClipper::new(self, other).contains()
    }
}
