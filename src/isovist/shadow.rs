//! Obstacle shadow construction.
//!
//! Every obstacle edge casts a shadow: the region it occludes as seen from
//! the vantage point, extended well past the view depth so that the later
//! boolean work never reaches the shadow's far boundary.

use crate::geometry::{lattice, Edge, PointF, Polygons};
use crate::CoordF;

/// Far-radius factor standing in for sqrt(2): the shadow must reach past
/// the diagonal of the bounding square of the sweep radius so that it
/// covers the view disk for every edge orientation.
const FAR_RADIUS_FACTOR: CoordF = 1.43;

/// Planar outline of the shadow cast by one edge, or `None` when the edge
/// is degenerate as seen from the vantage point and occludes nothing.
///
/// With `os` and `oe` the unit directions from the vantage point to the
/// edge endpoints, the outline is a quadrilateral when the edge subtends
/// at most a quarter turn (`dot(os, oe) >= 0`) and gains a bisector vertex
/// when it wraps further around the vantage point, keeping the outline
/// convex toward the far arc. A zero dot product marks the degenerate
/// case, which also covers an edge endpoint coinciding with the vantage
/// point (its direction normalizes to zero).
pub(crate) fn shadow_outline(vantage: PointF, view_depth: CoordF, edge: &Edge) -> Option<Vec<PointF>> {
    let to_start = edge.start - vantage;
    let to_end = edge.end - vantage;
    let far = FAR_RADIUS_FACTOR * view_depth.max(to_start.length()).max(to_end.length());

    let os = to_start.normalize();
    let oe = to_end.normalize();
    let x = os.dot(&oe);

    if x == 0.0 {
        return None;
    }

    let mut outline = vec![edge.start, vantage + os * far];
    if x < 0.0 {
        let om = (os + oe).normalize();
        outline.push(vantage + om * far);
    }
    outline.push(vantage + oe * far);
    outline.push(edge.end);
    Some(outline)
}

/// Build the lattice shadow polygons for a whole edge set, skipping
/// degenerate edges. Every shadow is oriented counter-clockwise so the
/// offset and fill stages treat it as a solid.
pub(crate) fn build_shadows(
    vantage: PointF,
    view_depth: CoordF,
    edges: &[Edge],
    precision: u8,
) -> Polygons {
    let mut shadows = Vec::with_capacity(edges.len());
    for edge in edges {
        let Some(outline) = shadow_outline(vantage, view_depth, edge) else {
            continue;
        };
        let mut shadow = lattice::points_to_lattice(&outline, precision);
        if shadow.signed_area() == 0.0 {
            continue;
        }
        shadow.make_counter_clockwise();
        shadows.push(shadow);
    }
    shadows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_to_lattice;

    #[test]
    fn test_narrow_edge_casts_quadrilateral() {
        // Both endpoints within a quarter turn of each other.
        let edge = Edge::new(PointF::new(1.0, 2.0), PointF::new(3.0, 2.0));
        let outline = shadow_outline(PointF::zero(), 10.0, &edge).unwrap();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline[0], edge.start);
        assert_eq!(outline[3], edge.end);
    }

    #[test]
    fn test_wrapping_edge_casts_pentagon() {
        // The edge spans more than a quarter turn around the vantage point.
        let edge = Edge::new(PointF::new(-5.0, 1.0), PointF::new(5.0, 1.0));
        let outline = shadow_outline(PointF::zero(), 10.0, &edge).unwrap();
        assert_eq!(outline.len(), 5);
        // The bisector vertex sits straight above the vantage point.
        assert!(outline[2].x.abs() < 1e-9);
        assert!(outline[2].y > 10.0);
    }

    #[test]
    fn test_perpendicular_sight_lines_are_degenerate() {
        let edge = Edge::new(PointF::new(5.0, 0.0), PointF::new(0.0, 5.0));
        assert!(shadow_outline(PointF::zero(), 10.0, &edge).is_none());
    }

    #[test]
    fn test_endpoint_on_vantage_point_is_degenerate() {
        let edge = Edge::new(PointF::zero(), PointF::new(3.0, 0.0));
        assert!(shadow_outline(PointF::zero(), 10.0, &edge).is_none());
    }

    #[test]
    fn test_far_radius_tracks_distant_endpoints() {
        // An endpoint beyond the view depth pushes the far arc out with it.
        let edge = Edge::new(PointF::new(40.0, 1.0), PointF::new(41.0, 1.0));
        let outline = shadow_outline(PointF::zero(), 10.0, &edge).unwrap();
        let reach = outline[1].length();
        assert!(reach > 40.0 * FAR_RADIUS_FACTOR * 0.99);
    }

    #[test]
    fn test_build_shadows_skips_degenerates_and_orients_ccw() {
        let edges = [
            Edge::new(PointF::new(-5.0, 1.0), PointF::new(5.0, 1.0)),
            Edge::new(PointF::zero(), PointF::new(3.0, 0.0)),
        ];
        let shadows = build_shadows(PointF::zero(), 10.0, &edges, 3);
        assert_eq!(shadows.len(), 1);
        assert!(shadows[0].is_counter_clockwise());
    }

    #[test]
    fn test_shadow_covers_point_behind_wall() {
        let edges = [Edge::new(PointF::new(-5.0, 1.0), PointF::new(5.0, 1.0))];
        let shadows = build_shadows(PointF::zero(), 10.0, &edges, 3);
        let behind = point_to_lattice(PointF::new(0.0, 5.0), 3);
        let in_front = point_to_lattice(PointF::new(0.0, 0.5), 3);
        assert!(shadows[0].contains_point(&behind));
        assert!(!shadows[0].contains_point(&in_front));
    }
}
