//! Boolean polygon algebra on the fixed-point lattice.
//!
//! This module wraps the geo-clipper library behind the small capability
//! set the isovist pipeline needs: union, difference and polygon
//! offsetting, plus the expand-union-shrink closing used to merge obstacle
//! shadows. Lattice coordinates pass through the clipper unchanged
//! (scaling factor 1.0), so the boolean engine operates directly on the
//! integer lattice and its output rounds back without loss.
//!
//! Boundary loops keep the engine's winding convention: counter-clockwise
//! loops bound solids, clockwise loops bound holes.

use geo::{Coord as GeoCoord, LineString, MultiPolygon, Polygon as GeoPolygon};
use geo_clipper::{Clipper, EndType, JoinType};

use crate::error::{IsovistError, IsovistResult};
use crate::geometry::{lattice_scale, Point, Polygon, Polygons, MAX_PRECISION};
use crate::{Coord, CoordF};

/// Lattice coordinates are already integers; the clipper applies no extra
/// scaling.
const CLIPPER_FACTOR: CoordF = 1.0;

/// Miter limit for offset joins, in multiples of the offset distance.
const MITER_LIMIT: CoordF = 2.0;

// ============================================================================
// Conversions between lattice loops and geo types
// ============================================================================

fn ring_to_geo(polygon: &Polygon) -> LineString<CoordF> {
    let mut coords: Vec<GeoCoord<CoordF>> = polygon
        .points()
        .iter()
        .map(|p| GeoCoord {
            x: p.x as CoordF,
            y: p.y as CoordF,
        })
        .collect();

    // Close the ring if needed
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }

    LineString::new(coords)
}

fn polygon_to_geo(polygon: &Polygon) -> GeoPolygon<CoordF> {
    GeoPolygon::new(ring_to_geo(polygon), vec![])
}

fn polygons_to_multi(polygons: &[Polygon]) -> MultiPolygon<CoordF> {
    MultiPolygon::new(polygons.iter().map(polygon_to_geo).collect())
}

fn ring_from_geo(ring: &LineString<CoordF>) -> Polygon {
    let mut points: Vec<Point> = ring
        .coords()
        .map(|c| Point::new(c.x.round() as Coord, c.y.round() as Coord))
        .collect();

    // Remove the closing point if present (our loops don't store it)
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }

    Polygon::from_points(points)
}

/// Flatten a geo multi-polygon into boundary loops, preserving winding.
pub(crate) fn multi_to_loops(multi: &MultiPolygon<CoordF>) -> Polygons {
    let mut loops = Vec::new();
    for polygon in &multi.0 {
        let exterior = ring_from_geo(polygon.exterior());
        if exterior.len() >= 3 {
            loops.push(exterior);
        }
        for interior in polygon.interiors() {
            let ring = ring_from_geo(interior);
            if ring.len() >= 3 {
                loops.push(ring);
            }
        }
    }
    loops
}

// ============================================================================
// Boolean operations
// ============================================================================

fn union_multi(loops: &[Polygon]) -> Option<MultiPolygon<CoordF>> {
    let mut rings = loops.iter().filter(|r| r.len() >= 3);
    let first = rings.next()?;
    let mut acc = MultiPolygon::new(vec![polygon_to_geo(first)]);
    for ring in rings {
        let clip = MultiPolygon::new(vec![polygon_to_geo(ring)]);
        acc = acc.union(&clip, CLIPPER_FACTOR);
    }
    Some(acc)
}

/// Union a set of lattice loops into one polygon set (non-zero fill).
pub(crate) fn union_loops(loops: &[Polygon]) -> Polygons {
    match union_multi(loops) {
        Some(multi) => multi_to_loops(&multi),
        None => Vec::new(),
    }
}

/// Compute `subject − clip`, returning the flattened boundary loops.
pub(crate) fn difference_loops(subject: &[Polygon], clip: &[Polygon]) -> Polygons {
    if subject.is_empty() {
        return Vec::new();
    }
    if clip.is_empty() {
        return subject.to_vec();
    }

    let subject_multi = polygons_to_multi(subject);
    let clip_multi = polygons_to_multi(clip);
    multi_to_loops(&subject_multi.difference(&clip_multi, CLIPPER_FACTOR))
}

// ============================================================================
// Offset operations
// ============================================================================

/// Offset every loop in the set by `delta` lattice units (miter joins,
/// closed polygons). Positive deltas expand solids, negative deltas shrink
/// them; hole loops move the opposite way, following their winding.
pub(crate) fn offset_loops(loops: &[Polygon], delta: CoordF) -> Polygons {
    if loops.is_empty() {
        return Vec::new();
    }

    let multi = polygons_to_multi(loops);
    let result = multi.offset(
        delta,
        JoinType::Miter(MITER_LIMIT),
        EndType::ClosedPolygon,
        CLIPPER_FACTOR,
    );
    multi_to_loops(&result)
}

/// Morphological closing of shadow polygons: expand each shadow by
/// `expand`, union everything, then shrink the union by the same amount.
///
/// The identical factor on both sides keeps the merged boundary at its
/// true geometric position while closing hairline gaps narrower than twice
/// the factor, such as the floor-truncation gaps between collinear
/// obstacle edges.
pub(crate) fn close_and_merge(shadows: &[Polygon], expand: CoordF) -> Polygons {
    let mut grown: Polygons = Vec::new();
    for shadow in shadows {
        if shadow.len() < 3 {
            continue;
        }
        let expanded = polygon_to_geo(shadow).offset(
            expand,
            JoinType::Miter(MITER_LIMIT),
            EndType::ClosedPolygon,
            CLIPPER_FACTOR,
        );
        grown.extend(multi_to_loops(&expanded));
    }

    let unioned = match union_multi(&grown) {
        Some(multi) => multi,
        None => return Vec::new(),
    };

    let shrunk = unioned.offset(
        -expand,
        JoinType::Miter(MITER_LIMIT),
        EndType::ClosedPolygon,
        CLIPPER_FACTOR,
    );
    multi_to_loops(&shrunk)
}

// ============================================================================
// Public barrier-buffering entry point
// ============================================================================

/// Offset a polygon set by a distance in working units.
///
/// Used for barrier buffering around obstacle outlines. The `offset`
/// distance is scaled onto the lattice with the same `10^precision` factor
/// as the polygon coordinates; positive distances buffer outward, negative
/// distances inward.
///
/// # Errors
///
/// Returns [`IsovistError::PrecisionOutOfRange`] if `precision` exceeds
/// the supported fixed-point range.
pub fn offset_polygons(polygons: &[Polygon], offset: CoordF, precision: u8) -> IsovistResult<Polygons> {
    if precision > MAX_PRECISION {
        return Err(IsovistError::PrecisionOutOfRange(precision));
    }
    Ok(offset_loops(polygons, offset * lattice_scale(precision)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min_x: Coord, min_y: Coord, size: Coord) -> Polygon {
        Polygon::from_points(vec![
            Point::new(min_x, min_y),
            Point::new(min_x + size, min_y),
            Point::new(min_x + size, min_y + size),
            Point::new(min_x, min_y + size),
        ])
    }

    fn total_area(loops: &[Polygon]) -> CoordF {
        loops.iter().map(|l| l.signed_area()).sum()
    }

    #[test]
    fn test_union_merges_overlapping_squares() {
        let result = union_loops(&[square(0, 0, 1000), square(500, 0, 1000)]);
        assert_eq!(result.len(), 1);
        // 1000x1000 + 1000x1000 - 500x1000 overlap
        assert!((result[0].signed_area() - 1_500_000.0).abs() < 10.0);
    }

    #[test]
    fn test_union_keeps_disjoint_squares_apart() {
        let result = union_loops(&[square(0, 0, 1000), square(5000, 0, 1000)]);
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|l| l.is_counter_clockwise()));
    }

    #[test]
    fn test_difference_produces_hole_loop() {
        // Subtracting an interior square leaves a solid loop and a hole
        // loop; the classifier depends on their winding.
        let result = difference_loops(&[square(0, 0, 3000)], &[square(1000, 1000, 1000)]);
        assert_eq!(result.len(), 2);

        let solids: Vec<_> = result.iter().filter(|l| l.is_counter_clockwise()).collect();
        let holes: Vec<_> = result.iter().filter(|l| l.is_clockwise()).collect();
        assert_eq!(solids.len(), 1);
        assert_eq!(holes.len(), 1);
        assert!(holes[0].contains_point(&Point::new(1500, 1500)));
        assert!((total_area(&result) - 8_000_000.0).abs() < 10.0);
    }

    #[test]
    fn test_offset_round_trip_preserves_area() {
        let original = square(0, 0, 10_000);
        let grown = offset_loops(&[original.clone()], 500.0);
        assert!(total_area(&grown) > original.signed_area());

        let back = offset_loops(&grown, -500.0);
        assert_eq!(back.len(), 1);
        assert!((total_area(&back) - original.signed_area()).abs() < 100.0);
    }

    #[test]
    fn test_close_and_merge_bridges_hairline_gap() {
        // Two squares one lattice unit apart: separately unioned they stay
        // two loops, closed with a factor above half the gap they fuse.
        let near = [square(0, 0, 1000), square(1001, 0, 1000)];
        assert_eq!(union_loops(&near).len(), 2);

        let closed = close_and_merge(&near, 10.0);
        assert_eq!(closed.len(), 1);
        // Closing is area-preserving up to the sealed gap.
        assert!((total_area(&closed) - 2_001_000.0).abs() < 3_000.0);
    }

    #[test]
    fn test_close_and_merge_identity_on_isolated_convex_polygon() {
        let original = square(0, 0, 10_000);
        let closed = close_and_merge(&[original.clone()], 100.0);
        assert_eq!(closed.len(), 1);
        assert!((closed[0].signed_area() - original.signed_area()).abs() < 100.0);
    }

    #[test]
    fn test_close_and_merge_empty_input() {
        assert!(close_and_merge(&[], 10.0).is_empty());
    }

    #[test]
    fn test_offset_polygons_scales_with_precision() {
        // 0.5 working units at precision 3 is 500 lattice units.
        let result = offset_polygons(&[square(0, 0, 10_000)], 0.5, 3).unwrap();
        assert_eq!(result.len(), 1);
        let expected = 11_000.0 * 11_000.0;
        assert!((result[0].signed_area() - expected).abs() < 1_000.0);
    }

    #[test]
    fn test_offset_polygons_rejects_bad_precision() {
        let err = offset_polygons(&[square(0, 0, 10)], 1.0, 10).unwrap_err();
        assert_eq!(err, IsovistError::PrecisionOutOfRange(10));
    }
}
