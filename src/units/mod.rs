//! Length-unit conversion table.
//!
//! Floor plans arrive in whatever unit the source document uses, and the
//! engine needs the working unit to pick a fixed-point lattice precision.
//! The table below stores the pairwise multiplicative factors between the
//! six supported units as exact constants (the imperial factors derive
//! from the definitions 1 ft = 0.3048 m and 1 in = 0.0254 m).

use serde::{Deserialize, Serialize};

use crate::geometry::PointF;
use crate::CoordF;

/// The six length units understood by the conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LengthUnit {
    Meters,
    Decimeters,
    Centimeters,
    Millimeters,
    Feet,
    Inches,
}

/// Pairwise conversion factors, indexed `[from][to]`.
const CONVERSION: [[CoordF; 6]; 6] = [
    // from meters
    [1.0, 10.0, 100.0, 1000.0, 1.0 / 0.3048, 1.0 / 0.0254],
    // from decimeters
    [0.1, 1.0, 10.0, 100.0, 0.1 / 0.3048, 0.1 / 0.0254],
    // from centimeters
    [0.01, 0.1, 1.0, 10.0, 0.01 / 0.3048, 0.01 / 0.0254],
    // from millimeters
    [0.001, 0.01, 0.1, 1.0, 0.001 / 0.3048, 0.001 / 0.0254],
    // from feet
    [0.3048, 3.048, 30.48, 304.8, 1.0, 12.0],
    // from inches
    [0.0254, 0.254, 2.54, 25.4, 1.0 / 12.0, 1.0],
];

impl LengthUnit {
    /// All supported units, in table order.
    pub const ALL: [LengthUnit; 6] = [
        LengthUnit::Meters,
        LengthUnit::Decimeters,
        LengthUnit::Centimeters,
        LengthUnit::Millimeters,
        LengthUnit::Feet,
        LengthUnit::Inches,
    ];

    #[inline]
    const fn index(self) -> usize {
        match self {
            LengthUnit::Meters => 0,
            LengthUnit::Decimeters => 1,
            LengthUnit::Centimeters => 2,
            LengthUnit::Millimeters => 3,
            LengthUnit::Feet => 4,
            LengthUnit::Inches => 5,
        }
    }

    /// Default fixed-point precision for coordinates expressed in this
    /// unit.
    ///
    /// Chosen so one lattice step is about a micrometer regardless of the
    /// working unit, which leaves ample 64-bit headroom for building-scale
    /// coordinates.
    pub const fn default_precision(self) -> u8 {
        match self {
            LengthUnit::Meters => 6,
            LengthUnit::Decimeters => 5,
            LengthUnit::Centimeters => 4,
            LengthUnit::Millimeters => 3,
            LengthUnit::Feet => 6,
            LengthUnit::Inches => 5,
        }
    }
}

/// The multiplicative factor converting `from` into `to`.
#[inline]
pub fn factor(from: LengthUnit, to: LengthUnit) -> CoordF {
    CONVERSION[from.index()][to.index()]
}

/// Convert a length between units.
#[inline]
pub fn convert(length: CoordF, from: LengthUnit, to: LengthUnit) -> CoordF {
    length * factor(from, to)
}

/// Convert a batch of lengths between units.
pub fn convert_all(lengths: &[CoordF], from: LengthUnit, to: LengthUnit) -> Vec<CoordF> {
    let f = factor(from, to);
    lengths.iter().map(|l| l * f).collect()
}

/// Convert planar points between units (both coordinates).
pub fn convert_points(points: &[PointF], from: LengthUnit, to: LengthUnit) -> Vec<PointF> {
    let f = factor(from, to);
    points.iter().map(|p| PointF::new(p.x * f, p.y * f)).collect()
}
