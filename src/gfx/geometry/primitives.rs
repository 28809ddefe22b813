//! # Shape Construction
//!
//! Functions producing the outlines the export pass needs: voxel cubes in
//! 3D, and hulls and round-capped strokes in device space.

use cgmath::{InnerSpace, Point2, Point3, Vector2};

/// Corner pairs forming the 12 edges of a cube, indexing [`cube_corners`].
pub const CUBE_EDGES: [(usize, usize); 12] = [
    // Bottom face (z = -h)
    (0, 1), (1, 3), (3, 2), (2, 0),
    // Top face (z = +h)
    (4, 5), (5, 7), (7, 6), (6, 4),
    // Verticals
    (0, 4), (1, 5), (2, 6), (3, 7),
];

/// The 8 corners of an axis-aligned cube of half-width `half` around `center`.
///
/// Corner `i` sits at `+h` on x when bit 0 of `i` is set, on y for bit 1 and
/// on z for bit 2.
pub fn cube_corners(center: Point3<f64>, half: f64) -> [Point3<f64>; 8] {
    let mut corners = [center; 8];
    for (i, corner) in corners.iter_mut().enumerate() {
        let sx = if i & 1 != 0 { half } else { -half };
        let sy = if i & 2 != 0 { half } else { -half };
        let sz = if i & 4 != 0 { half } else { -half };
        *corner = Point3::new(center.x + sx, center.y + sy, center.z + sz);
    }
    corners
}

/// Convex hull of a 2D point set (monotone chain), counter-clockwise in a
/// y-up frame, without collinear points. Degenerate inputs return the
/// distinct extreme points.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut sorted: Vec<Point2<f64>> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    fn cross(o: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut lower: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point2<f64>> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Vertices per half circle of a round line cap.
const CAP_SEGMENTS: usize = 8;

/// Outline of a segment stroked with `width` and round caps, as a closed
/// polygon. A zero-length segment gives a disc of diameter `width`.
pub fn round_capped_segment(from: Point2<f64>, to: Point2<f64>, width: f64) -> Vec<Point2<f64>> {
    let radius = width.max(0.0) / 2.0;
    let direction: Vector2<f64> = to - from;
    let length = direction.magnitude();
    let step = std::f64::consts::PI / CAP_SEGMENTS as f64;
    let at = |center: Point2<f64>, angle: f64| {
        Point2::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    };

    if length < f64::EPSILON {
        return (0..2 * CAP_SEGMENTS).map(|k| at(from, k as f64 * step)).collect();
    }

    // Sweep the cap at `to` from the left normal to the right one, then the
    // cap at `from` back around.
    let normal_angle = direction.x.atan2(-direction.y);
    let mut outline = Vec::with_capacity(2 * (CAP_SEGMENTS + 1));
    for k in 0..=CAP_SEGMENTS {
        outline.push(at(to, normal_angle - k as f64 * step));
    }
    for k in 0..=CAP_SEGMENTS {
        outline.push(at(from, normal_angle - std::f64::consts::PI - k as f64 * step));
    }
    outline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_generation() {
        let corners = cube_corners(Point3::new(1.0, 1.0, 1.0), 0.5);
        assert_eq!(corners[0], Point3::new(0.5, 0.5, 0.5));
        assert_eq!(corners[7], Point3::new(1.5, 1.5, 1.5));
        for (a, b) in CUBE_EDGES {
            let d = corners[b] - corners[a];
            let changed = [d.x, d.y, d.z].iter().filter(|c| c.abs() > 0.0).count();
            assert_eq!(changed, 1, "edge ({}, {}) must be axis aligned", a, b);
        }
    }

    #[test]
    fn test_hull_of_square_with_interior_point() {
        let hull = convex_hull(&[
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
        ]);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point2::new(1.0, 1.0)));
    }

    #[test]
    fn test_hull_of_projected_cube_is_hexagon_or_less() {
        // Cube seen along a body diagonal under a parallel projection.
        let corners = cube_corners(Point3::new(0.0, 0.0, 0.0), 1.0);
        let projected: Vec<Point2<f64>> = corners
            .iter()
            .map(|p| Point2::new(p.x - p.z, p.y - p.z))
            .collect();
        let hull = convex_hull(&projected);
        assert_eq!(hull.len(), 6);
    }

    #[test]
    fn test_round_capped_segment() {
        let outline = round_capped_segment(Point2::new(0.0, 0.0), Point2::new(4.0, 0.0), 2.0);
        assert_eq!(outline.len(), 2 * (CAP_SEGMENTS + 1));
        let close = |a: Point2<f64>, b: Point2<f64>| (a - b).magnitude() < 1e-9;
        // Left side at +y, the cap tip past `to`, the back tip before `from`.
        assert!(close(outline[0], Point2::new(4.0, 1.0)));
        assert!(close(outline[CAP_SEGMENTS / 2], Point2::new(5.0, 0.0)));
        assert!(close(outline[CAP_SEGMENTS + 1 + CAP_SEGMENTS / 2], Point2::new(-1.0, 0.0)));
        assert!(outline
            .iter()
            .all(|p| p.x >= -1.0 - 1e-9 && p.x <= 5.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9));
    }

    #[test]
    fn test_zero_length_segment_is_disc() {
        let outline = round_capped_segment(Point2::new(1.0, 1.0), Point2::new(1.0, 1.0), 4.0);
        assert_eq!(outline.len(), 2 * CAP_SEGMENTS);
        assert!(outline
            .iter()
            .all(|p| ((p - Point2::new(1.0, 1.0)).magnitude() - 2.0).abs() < 1e-9));
    }
}
