//! Obstacle edges.

use serde::{Deserialize, Serialize};

use super::PointF;
use crate::CoordF;

/// A single obstacle segment near a vantage point.
///
/// Edges are caller-owned input and never mutated by the engine. Deciding
/// which edges are relevant for one isovist request (for example via a
/// grid-cell lookup) is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: PointF,
    pub end: PointF,
}

impl Edge {
    /// Create a new edge.
    #[inline]
    pub const fn new(start: PointF, end: PointF) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[inline]
    pub fn length(&self) -> CoordF {
        self.start.distance(&self.end)
    }
}

impl From<(PointF, PointF)> for Edge {
    #[inline]
    fn from((start, end): (PointF, PointF)) -> Self {
        Self { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_length() {
        let edge = Edge::new(PointF::new(0.0, 0.0), PointF::new(3.0, 4.0));
        assert!((edge.length() - 5.0).abs() < 1e-12);
    }
}
