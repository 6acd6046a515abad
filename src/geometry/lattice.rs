//! Fixed-point lattice codec.
//!
//! The boolean-polygon engine runs on 64-bit integer coordinates obtained
//! by scaling planar coordinates with `10^precision`. Conversion onto the
//! lattice floors both coordinates: every point is biased the same way, so
//! the relative geometry of nearby obstacles stays stable while the
//! absolute position picks up at most one lattice unit of bias.
//! Conversion back is an exact division.

use super::{Point, PointF, Polygon};
use crate::{Coord, CoordF};

/// Largest supported lattice precision. Beyond nine decimal digits the
/// scaled coordinates of building-sized plans no longer fit in 64 bits.
pub const MAX_PRECISION: u8 = 9;

/// The multiplicative scale `10^precision` of a lattice precision.
#[inline]
pub fn lattice_scale(precision: u8) -> CoordF {
    debug_assert!(precision <= MAX_PRECISION);
    10f64.powi(precision as i32)
}

/// Scale a planar point onto the integer lattice, flooring both
/// coordinates.
#[inline]
pub fn point_to_lattice(p: PointF, precision: u8) -> Point {
    let s = lattice_scale(precision);
    Point::new((p.x * s).floor() as Coord, (p.y * s).floor() as Coord)
}

/// Map a lattice point back to planar coordinates.
#[inline]
pub fn point_to_planar(p: Point, precision: u8) -> PointF {
    let s = lattice_scale(precision);
    PointF::new(p.x as CoordF / s, p.y as CoordF / s)
}

/// Scale a planar point sequence onto the lattice as a polygon.
pub fn points_to_lattice(points: &[PointF], precision: u8) -> Polygon {
    points
        .iter()
        .map(|&p| point_to_lattice(p, precision))
        .collect()
}

/// Map a lattice polygon back to a planar point sequence.
pub fn polygon_to_planar(polygon: &Polygon, precision: u8) -> Vec<PointF> {
    polygon
        .points()
        .iter()
        .map(|&p| point_to_planar(p, precision))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_one_lattice_unit() {
        let samples = [
            PointF::new(0.0, 0.0),
            PointF::new(1.25, -3.75),
            PointF::new(-1234.5678, 9876.5432),
            PointF::new(0.333333333, -0.666666667),
        ];

        for k in 0..=MAX_PRECISION {
            let tol = 10f64.powi(-(k as i32));
            for &p in &samples {
                let back = point_to_planar(point_to_lattice(p, k), k);
                assert!(
                    (back.x - p.x).abs() <= tol && (back.y - p.y).abs() <= tol,
                    "precision {k}: {p:?} -> {back:?}"
                );
            }
        }
    }

    #[test]
    fn test_flooring_not_rounding() {
        // 0.19 at one decimal digit floors to 1, it does not round to 2.
        let p = point_to_lattice(PointF::new(0.19, -0.19), 1);
        assert_eq!(p, Point::new(1, -2));
    }

    #[test]
    fn test_floor_bias_is_consistent() {
        // The lattice value never exceeds the scaled planar value.
        for k in 0..=MAX_PRECISION {
            let s = lattice_scale(k);
            for &v in &[-12.345, -0.001, 0.0, 0.001, 12.345] {
                let p = point_to_lattice(PointF::new(v, v), k);
                assert!(p.x as CoordF <= v * s);
                assert!((v * s) - (p.x as CoordF) < 1.0);
            }
        }
    }

    #[test]
    fn test_polygon_round_trip() {
        let outline = vec![
            PointF::new(0.0, 0.0),
            PointF::new(2.5, 0.0),
            PointF::new(2.5, 1.5),
        ];
        let polygon = points_to_lattice(&outline, 6);
        assert_eq!(polygon.len(), 3);

        let back = polygon_to_planar(&polygon, 6);
        for (orig, round) in outline.iter().zip(&back) {
            assert!(orig.approx_eq(round, 1e-6));
        }
    }

    #[test]
    fn test_lattice_scale_values() {
        assert_eq!(lattice_scale(0), 1.0);
        assert_eq!(lattice_scale(3), 1000.0);
        assert_eq!(lattice_scale(9), 1_000_000_000.0);
    }
}
