// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar triangles and quads describing roof and wall surfaces

use crate::cube::Cube;
use crate::polygon::point_in_polygon;
use nalgebra::{Point2, Point3, Vector3};
use smallvec::SmallVec;

/// Heights closer than this are treated as equal when finding base edges
pub const Z_TOLERANCE: f64 = 1e-6;

/// Surface classification assigned by the exterior shell builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TQuadKind {
    Roof,
    Wall,
    Other,
}

/// Planar triangle or quad with a surface type
#[derive(Debug, Clone)]
pub struct TQuad {
    pub points: SmallVec<[Point3<f64>; 4]>,
    pub kind: TQuadKind,
}

impl TQuad {
    /// Create a tquad; panics unless given 3 or 4 points
    pub fn new(points: &[Point3<f64>], kind: TQuadKind) -> Self {
        assert!(
            points.len() == 3 || points.len() == 4,
            "tquad needs 3 or 4 points, got {}",
            points.len()
        );
        Self {
            points: SmallVec::from_slice(points),
            kind,
        }
    }

    #[inline]
    pub fn npts(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.points.len() == 3
    }

    /// Unit normal using Newell's method, following the winding order
    ///
    /// Returns the zero vector for degenerate polygons.
    pub fn normal(&self) -> Vector3<f64> {
        let mut normal = Vector3::<f64>::zeros();
        let n = self.points.len();

        for i in 0..n {
            let curr = &self.points[i];
            let next = &self.points[(i + 1) % n];

            normal.x += (curr.y - next.y) * (curr.z + next.z);
            normal.y += (curr.z - next.z) * (curr.x + next.x);
            normal.z += (curr.x - next.x) * (curr.y + next.y);
        }

        let len = normal.norm();
        if len < 1e-15 {
            return Vector3::<f64>::zeros();
        }
        normal / len
    }

    pub fn bcube(&self) -> Cube {
        let mut cube = Cube::new(self.points[0], self.points[0]);
        for p in &self.points[1..] {
            cube.union_with_point(p);
        }
        cube
    }

    /// Vertex average
    pub fn centroid(&self) -> Point3<f64> {
        let sum = self
            .points
            .iter()
            .fold(Vector3::<f64>::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.points.len() as f64)
    }

    pub fn min_z(&self) -> f64 {
        self.points.iter().map(|p| p.z).fold(f64::MAX, f64::min)
    }

    pub fn max_z(&self) -> f64 {
        self.points.iter().map(|p| p.z).fold(f64::MIN, f64::max)
    }

    /// Projection onto the XY plane
    pub fn footprint(&self) -> SmallVec<[Point2<f64>; 4]> {
        self.points.iter().map(|p| Point2::new(p.x, p.y)).collect()
    }

    /// `(x, y)` lies inside the XY projection of this surface
    pub fn contains_point_xy(&self, x: f64, y: f64) -> bool {
        point_in_polygon(&Point2::new(x, y), &self.footprint())
    }

    /// Edges as `(start, end)` pairs in winding order
    pub fn edges(&self) -> impl Iterator<Item = (Point3<f64>, Point3<f64>)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Edges whose endpoints both sit at the lowest height of the surface
    pub fn is_base_edge(&self, a: &Point3<f64>, b: &Point3<f64>) -> bool {
        let z = self.min_z();
        (a.z - z).abs() < Z_TOLERANCE && (b.z - z).abs() < Z_TOLERANCE
    }
}
