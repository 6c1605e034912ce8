// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D polygon containment tests

use nalgebra::Point2;

/// Distance under which a point counts as lying on a polygon edge
pub const EDGE_TOLERANCE: f64 = 1e-9;

/// Check if a point is inside a polygon using ray casting
///
/// Points exactly on an edge may land on either side.
pub fn point_in_polygon(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let n = contour.len();

    let mut j = n - 1;
    for i in 0..n {
        let pi = &contour[i];
        let pj = &contour[j];

        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }

    inside
}

/// Check if a point is inside a polygon or on its boundary
pub fn point_in_polygon_inclusive(point: &Point2<f64>, contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }
    let n = contour.len();
    let on_edge = (0..n).any(|i| {
        point_segment_distance(point, &contour[i], &contour[(i + 1) % n]) <= EDGE_TOLERANCE
    });
    on_edge || point_in_polygon(point, contour)
}

/// Shortest distance from `p` to the segment `a`-`b`
pub fn point_segment_distance(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq < 1e-20 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    }

    #[test]
    fn test_point_in_polygon() {
        let sq = square();
        assert!(point_in_polygon(&Point2::new(1.0, 1.0), &sq));
        assert!(!point_in_polygon(&Point2::new(3.0, 1.0), &sq));
        assert!(!point_in_polygon(&Point2::new(1.0, 1.0), &sq[..2]));
    }

    #[test]
    fn test_inclusive_boundary() {
        let sq = square();
        // Upper and right edges are excluded by plain ray casting
        assert!(!point_in_polygon(&Point2::new(2.0, 1.0), &sq));
        assert!(point_in_polygon_inclusive(&Point2::new(2.0, 1.0), &sq));
        assert!(point_in_polygon_inclusive(&Point2::new(0.0, 2.0), &sq));
        assert!(!point_in_polygon_inclusive(&Point2::new(2.1, 1.0), &sq));
    }

    #[test]
    fn test_triangle() {
        let tri = [
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 2.0),
        ];
        assert!(point_in_polygon(&Point2::new(2.0, 1.0), &tri));
        assert!(!point_in_polygon(&Point2::new(0.5, 1.0), &tri));
    }
}
