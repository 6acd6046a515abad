//! Visibility-polygon (isovist) computation over 2D floor plans.
//!
//! Given a vantage point, a maximum view depth and the obstacle edges near
//! that point, the engine computes the region visible from the vantage
//! point, bounded by the view depth:
//!
//! 1. Every obstacle edge casts a shadow polygon away from the vantage
//!    point ([`isovist::shadow`]).
//! 2. The shadows are merged with a morphological closing (expand, union,
//!    shrink by the same amount) so near-touching obstacles form one
//!    occlusion mass ([`clipper`]).
//! 3. The boundary loops of the merged mass are classified by orientation
//!    into solids and voids enclosing the vantage point, and the visible
//!    region is extracted ([`isovist`]).
//! 4. The result is mapped back to planar coordinates and simplified
//!    ([`simplify`]).
//!
//! All boolean polygon algebra runs on a fixed-point integer lattice
//! ([`geometry::lattice`]) to avoid floating-point robustness failures in
//! the clipping engine.
//!
//! # Example
//! ```
//! use isovist::geometry::{Edge, PointF};
//! use isovist::{compute_isovist, IsovistParams};
//!
//! let wall = Edge::new(PointF::new(-20.0, 5.0), PointF::new(20.0, 5.0));
//! let region = compute_isovist(
//!     PointF::new(0.0, 0.0),
//!     10.0,
//!     &[wall],
//!     &IsovistParams::default(),
//! )
//! .unwrap();
//! assert!(region.contains(&PointF::new(0.0, 2.0)));
//! assert!(!region.contains(&PointF::new(0.0, 7.0)));
//! ```

pub mod clipper;
pub mod error;
pub mod geometry;
pub mod isovist;
pub mod log;
pub mod simplify;
pub mod units;

/// Scaled integer coordinate type used on the fixed-point lattice.
pub type Coord = i64;

/// Floating-point coordinate type for planar (caller-facing) geometry.
pub type CoordF = f64;

pub use clipper::offset_polygons;
pub use error::{IsovistError, IsovistResult};
pub use isovist::{
    compute_isovist, compute_isovist_batch, IsovistBatch, IsovistParams, IsovistRequest,
    VisibilityPolygon,
};
pub use simplify::{default_min_edge_length, simplify_polygon, Simplified};
pub use units::{convert, convert_all, convert_points, LengthUnit};
