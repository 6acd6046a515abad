//! Point types for planar and lattice geometry.
//!
//! `PointF` is the caller-facing double-precision planar coordinate.
//! `Point` is its fixed-point counterpart on the integer lattice used by
//! the boolean-polygon engine (see [`super::lattice`] for the codec).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use crate::{Coord, CoordF};

/// A 2D point with scaled integer coordinates on the fixed-point lattice.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: Coord,
    pub y: Coord,
}

impl Point {
    /// Create a new lattice point.
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// The lattice origin.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    /// Squared distance to another point.
    /// Returns i128 to avoid overflow with large coordinates.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> i128 {
        let dx = (other.x - self.x) as i128;
        let dy = (other.y - self.y) as i128;
        dx * dx + dy * dy
    }

    /// Distance to another point, in lattice units.
    #[inline]
    pub fn distance(&self, other: &Point) -> CoordF {
        (self.distance_squared(other) as CoordF).sqrt()
    }

    /// Check if this point coincides with another within a tolerance.
    #[inline]
    pub fn coincides_with(&self, other: &Point, tolerance: Coord) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl AddAssign for Point {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl SubAssign for Point {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl From<(Coord, Coord)> for Point {
    #[inline]
    fn from((x, y): (Coord, Coord)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (Coord, Coord) {
    #[inline]
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// A 2D point with floating-point planar coordinates.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: CoordF,
    pub y: CoordF,
}

impl PointF {
    /// Create a new planar point.
    #[inline]
    pub const fn new(x: CoordF, y: CoordF) -> Self {
        Self { x, y }
    }

    /// The planar origin.
    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Squared distance to another point.
    #[inline]
    pub fn distance_squared(&self, other: &PointF) -> CoordF {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &PointF) -> CoordF {
        self.distance_squared(other).sqrt()
    }

    /// Squared length of this point as a vector.
    #[inline]
    pub fn length_squared(&self) -> CoordF {
        self.x * self.x + self.y * self.y
    }

    /// Length of this point as a vector.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length. The zero vector normalizes to itself.
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            *self
        }
    }

    /// Dot product with another point.
    #[inline]
    pub fn dot(&self, other: &PointF) -> CoordF {
        self.x * other.x + self.y * other.y
    }

    /// Cross product (2D pseudo-cross product).
    #[inline]
    pub fn cross(&self, other: &PointF) -> CoordF {
        self.x * other.y - self.y * other.x
    }

    /// Check if approximately equal to another point.
    #[inline]
    pub fn approx_eq(&self, other: &PointF, epsilon: CoordF) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }
}

impl fmt::Debug for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PointF({:.6}, {:.6})", self.x, self.y)
    }
}

impl fmt::Display for PointF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.x, self.y)
    }
}

impl Add for PointF {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for PointF {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Neg for PointF {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl Mul<CoordF> for PointF {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: CoordF) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

impl Div<CoordF> for PointF {
    type Output = Self;

    #[inline]
    fn div(self, scalar: CoordF) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
        }
    }
}

impl From<(CoordF, CoordF)> for PointF {
    #[inline]
    fn from((x, y): (CoordF, CoordF)) -> Self {
        Self { x, y }
    }
}

/// Type alias for a collection of lattice points.
pub type Points = Vec<Point>;

/// Type alias for a collection of planar points.
pub type PointsF = Vec<PointF>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p1 = Point::new(10, 20);
        let p2 = Point::new(3, 4);

        let sum = p1 + p2;
        assert_eq!(sum.x, 13);
        assert_eq!(sum.y, 24);

        let diff = p1 - p2;
        assert_eq!(diff.x, 7);
        assert_eq!(diff.y, 16);

        let neg = -p1;
        assert_eq!(neg.x, -10);
        assert_eq!(neg.y, -20);
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0, 0);
        let p2 = Point::new(3_000_000, 4_000_000);
        assert!((p1.distance(&p2) - 5_000_000.0).abs() < 1.0);
    }

    #[test]
    fn test_point_coincides_with() {
        let p1 = Point::new(100, 100);
        let p2 = Point::new(101, 99);
        assert!(p1.coincides_with(&p2, 1));
        assert!(!p1.coincides_with(&p2, 0));
    }

    #[test]
    fn test_pointf_normalize() {
        let p = PointF::new(3.0, 4.0);
        let n = p.normalize();
        assert!((n.length() - 1.0).abs() < 1e-10);
        assert!((n.x - 0.6).abs() < 1e-10);
        assert!((n.y - 0.8).abs() < 1e-10);
    }

    #[test]
    fn test_pointf_normalize_zero() {
        assert_eq!(PointF::zero().normalize(), PointF::zero());
    }

    #[test]
    fn test_pointf_dot_cross() {
        let v1 = PointF::new(1.0, 0.0);
        let v2 = PointF::new(0.0, 1.0);
        assert_eq!(v1.dot(&v2), 0.0);
        assert_eq!(v1.cross(&v2), 1.0);
        assert_eq!(v2.cross(&v1), -1.0);
    }

    #[test]
    fn test_pointf_scalar_ops() {
        let p = PointF::new(1.5, -2.0) * 2.0;
        assert_eq!(p, PointF::new(3.0, -4.0));
        assert_eq!(p / 2.0, PointF::new(1.5, -2.0));
    }
}
