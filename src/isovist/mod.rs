//! The isovist engine.
//!
//! [`compute_isovist`] runs the full pipeline for one vantage point: shadow
//! construction, morphological closing, loop classification, extraction
//! and simplification. [`compute_isovist_batch`] maps the engine over many
//! cells in parallel and aggregates failures per batch.

pub mod shadow;

use std::f64::consts::PI;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::clipper;
use crate::error::{IsovistError, IsovistResult};
use crate::geometry::{lattice, Edge, Point, PointF, Polygon, Polygons};
use crate::log::debug;
use crate::simplify::simplify_polygon;
use crate::units::LengthUnit;
use crate::CoordF;

/// Default expand/shrink epsilon for the morphological closing, in working
/// units. Must stay below half the minimum obstacle spacing of the plan,
/// otherwise distinct obstacles merge.
pub const DEFAULT_MERGE_EPSILON: CoordF = 0.075;

/// Default arc length per segment of the view-disk approximation.
pub const DEFAULT_CURVE_APPROXIMATION_LENGTH: CoordF = 0.25;

/// Default simplification threshold for the output polygon.
pub const DEFAULT_MIN_EDGE_LENGTH: CoordF = 0.05;

/// Tuning parameters for one isovist computation.
///
/// One parameter set, and therefore one lattice scale factor, applies to
/// all edges and the vantage point of a single computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsovistParams {
    /// Fixed-point lattice precision, in decimal digits (0..=9).
    pub precision: u8,
    /// Arc length per segment of the view-depth circle. Larger view
    /// depths get proportionally more segments.
    pub curve_approximation_length: CoordF,
    /// Simplification threshold for the output polygon, in working units.
    pub min_edge_length: CoordF,
    /// Expand/shrink epsilon of the morphological closing, in working
    /// units.
    pub merge_epsilon: CoordF,
    /// Minimum spacing between distinct obstacles, when the caller knows
    /// it. Supplying it lets validation reject a merge epsilon large
    /// enough to fuse separate obstacles.
    pub min_obstacle_spacing: Option<CoordF>,
}

impl Default for IsovistParams {
    fn default() -> Self {
        Self {
            precision: LengthUnit::Meters.default_precision(),
            curve_approximation_length: DEFAULT_CURVE_APPROXIMATION_LENGTH,
            min_edge_length: DEFAULT_MIN_EDGE_LENGTH,
            merge_epsilon: DEFAULT_MERGE_EPSILON,
            min_obstacle_spacing: None,
        }
    }
}

impl IsovistParams {
    /// Parameter defaults for plans expressed in the given working unit.
    pub fn for_unit(unit: LengthUnit) -> Self {
        Self {
            precision: unit.default_precision(),
            ..Self::default()
        }
    }

    /// Fail fast on configuration errors before any geometry runs.
    ///
    /// # Errors
    ///
    /// Returns [`IsovistError::PrecisionOutOfRange`],
    /// [`IsovistError::MergeEpsilonTooLarge`] or
    /// [`IsovistError::InvalidParameter`].
    pub fn validate(&self) -> IsovistResult<()> {
        if self.precision > lattice::MAX_PRECISION {
            return Err(IsovistError::PrecisionOutOfRange(self.precision));
        }
        if self.curve_approximation_length <= 0.0 {
            return Err(IsovistError::InvalidParameter(
                "curve approximation length must be positive".into(),
            ));
        }
        if self.min_edge_length < 0.0 {
            return Err(IsovistError::InvalidParameter(
                "minimum edge length must not be negative".into(),
            ));
        }
        if self.merge_epsilon <= 0.0 {
            return Err(IsovistError::InvalidParameter(
                "merge epsilon must be positive".into(),
            ));
        }
        if let Some(spacing) = self.min_obstacle_spacing {
            if self.merge_epsilon >= spacing / 2.0 {
                return Err(IsovistError::MergeEpsilonTooLarge {
                    epsilon: self.merge_epsilon,
                    spacing,
                });
            }
        }
        Ok(())
    }
}

/// The computed visible region: a closed planar polygon, already
/// simplified, with the count of vertices purged during simplification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    points: Vec<PointF>,
    purged: usize,
}

impl VisibilityPolygon {
    /// The boundary points, implicitly closed.
    #[inline]
    pub fn points(&self) -> &[PointF] {
        &self.points
    }

    /// Consume the polygon and return its points.
    #[inline]
    pub fn into_points(self) -> Vec<PointF> {
        self.points
    }

    /// Number of boundary points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polygon is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of vertices dropped by the simplification pass.
    #[inline]
    pub fn purged_points(&self) -> usize {
        self.purged
    }

    /// Unsigned area via the shoelace formula.
    pub fn area(&self) -> CoordF {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..self.points.len() {
            let j = (i + 1) % self.points.len();
            sum += self.points[i].cross(&self.points[j]);
        }
        (sum / 2.0).abs()
    }

    /// Total boundary length.
    pub fn perimeter(&self) -> CoordF {
        if self.points.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        for i in 0..self.points.len() {
            let j = (i + 1) % self.points.len();
            total += self.points[i].distance(&self.points[j]);
        }
        total
    }

    /// Ray-casting containment test in planar coordinates.
    pub fn contains(&self, p: &PointF) -> bool {
        if self.points.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.points.len() - 1;
        for i in 0..self.points.len() {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > p.y) != (pj.y > p.y) {
                let crossing_x = (pj.x - pi.x) * (p.y - pi.y) / (pj.y - pi.y) + pi.x;
                if p.x < crossing_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// Classified boundary loops of the merged shadow mass.
struct LoopBuckets {
    solids: Polygons,
    center_holes: Polygons,
}

/// Partition boundary loops by orientation: counter-clockwise loops are
/// solid occlusion mass, clockwise loops are voids. Only voids that
/// enclose the vantage point are kept; any other void is an occluded
/// pocket outside the visible field.
fn classify_loops(loops: Polygons, center: Point) -> LoopBuckets {
    let mut buckets = LoopBuckets {
        solids: Vec::new(),
        center_holes: Vec::new(),
    };
    for ring in loops {
        if ring.len() < 3 {
            continue;
        }
        if ring.is_counter_clockwise() {
            buckets.solids.push(ring);
        } else if ring.is_clockwise() && ring.contains_point(&center) {
            buckets.center_holes.push(ring);
        }
    }
    buckets
}

/// Regular polygon approximating the view-depth circle. The segment count
/// tracks the circumference so the arc length per segment never exceeds
/// `curve_approximation_length`.
fn view_disk(
    vantage: PointF,
    view_depth: CoordF,
    curve_approximation_length: CoordF,
    precision: u8,
) -> Polygon {
    let segments = ((2.0 * PI * view_depth / curve_approximation_length).ceil() as usize).max(8);
    let mut outline = Vec::with_capacity(segments);
    for i in 0..segments {
        let angle = 2.0 * PI * i as CoordF / segments as CoordF;
        outline.push(PointF::new(
            vantage.x + view_depth * angle.cos(),
            vantage.y + view_depth * angle.sin(),
        ));
    }
    lattice::points_to_lattice(&outline, precision)
}

/// Turn the classified loops into the final lattice polygon, or signal
/// why no isovist exists. The case split keys on how many voids enclose
/// the vantage point.
fn extract_isovist(
    buckets: LoopBuckets,
    vantage: PointF,
    center: Point,
    view_depth: CoordF,
    curve_approximation_length: CoordF,
    precision: u8,
) -> IsovistResult<Polygon> {
    let LoopBuckets {
        solids,
        mut center_holes,
    } = buckets;

    match center_holes.len() {
        0 => {
            // No void encloses the observer: clip the view disk against
            // the occlusion mass and keep the piece the observer stands in.
            let disk = view_disk(vantage, view_depth, curve_approximation_length, precision);
            let pieces = clipper::difference_loops(&[disk], &solids);
            pieces
                .into_iter()
                .find(|ring| ring.is_counter_clockwise() && ring.contains_point(&center))
                .ok_or(IsovistError::NoIsovistFound)
        }
        1 => {
            // The union already carved the visible region out as a void.
            // Reversing its boundary yields the solid-oriented output, no
            // difference needed.
            let mut hole = center_holes.remove(0);
            hole.reverse();
            Ok(hole)
        }
        candidates => Err(IsovistError::AmbiguousIsovist { candidates }),
    }
}

/// Compute the region visible from `vantage` within `view_depth`, given
/// the obstacle edges near that point.
///
/// The computation is a pure function of its inputs; all intermediate
/// geometry is dropped before returning. Degenerate edges (zero occlusion
/// as seen from the vantage point) are skipped silently.
///
/// # Errors
///
/// Configuration errors fail fast before any geometry runs. The geometric
/// failures [`IsovistError::NoIsovistFound`] and
/// [`IsovistError::AmbiguousIsovist`] are expected outcomes for
/// pathological local geometry and are returned, never panicked.
pub fn compute_isovist(
    vantage: PointF,
    view_depth: CoordF,
    edges: &[Edge],
    params: &IsovistParams,
) -> IsovistResult<VisibilityPolygon> {
    params.validate()?;
    if view_depth <= 0.0 {
        return Err(IsovistError::InvalidParameter(
            "view depth must be positive".into(),
        ));
    }

    let center = lattice::point_to_lattice(vantage, params.precision);

    let shadows = shadow::build_shadows(vantage, view_depth, edges, params.precision);
    debug!("cast {} shadows from {} edges", shadows.len(), edges.len());

    let expand = params.merge_epsilon * lattice::lattice_scale(params.precision);
    let merged = clipper::close_and_merge(&shadows, expand);

    let buckets = classify_loops(merged, center);
    debug!(
        "classified {} solid loops, {} voids enclosing the vantage point",
        buckets.solids.len(),
        buckets.center_holes.len()
    );

    let outline = extract_isovist(
        buckets,
        vantage,
        center,
        view_depth,
        params.curve_approximation_length,
        params.precision,
    )?;

    let planar = lattice::polygon_to_planar(&outline, params.precision);
    let simplified = simplify_polygon(&planar, params.min_edge_length);
    debug!("simplification purged {} vertices", simplified.purged);

    Ok(VisibilityPolygon {
        points: simplified.points,
        purged: simplified.purged,
    })
}

/// One cell of a batch sweep: a vantage point with its pruned edge set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsovistRequest {
    pub vantage: PointF,
    pub view_depth: CoordF,
    pub edges: Vec<Edge>,
}

/// Outcome of a batch sweep. Failed cells keep their slot as `None` and
/// are reported once per batch instead of interrupting the sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct IsovistBatch {
    /// Per-request results, index-aligned with the input.
    pub polygons: Vec<Option<VisibilityPolygon>>,
    /// `(request index, error)` for every failed cell.
    pub failures: Vec<(usize, IsovistError)>,
}

/// Run the engine over a batch of cells with a parallel map.
///
/// Each cell is an independent computation with its own geometry, so the
/// sweep shares no mutable state. Configuration is validated once up
/// front; per-cell geometric failures are collected into the batch
/// outcome rather than aborting the sweep.
///
/// # Errors
///
/// Returns a configuration error if `params` is invalid.
pub fn compute_isovist_batch(
    requests: &[IsovistRequest],
    params: &IsovistParams,
) -> IsovistResult<IsovistBatch> {
    params.validate()?;

    let results: Vec<IsovistResult<VisibilityPolygon>> = requests
        .par_iter()
        .map(|request| compute_isovist(request.vantage, request.view_depth, &request.edges, params))
        .collect();

    let mut polygons = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(polygon) => polygons.push(Some(polygon)),
            Err(error) => {
                polygons.push(None);
                failures.push((index, error));
            }
        }
    }

    Ok(IsovistBatch { polygons, failures })
}
