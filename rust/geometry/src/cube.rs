// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned boxes
//!
//! `Cube` is the workhorse of interior generation: rooms, hatches, beams
//! before rotation, placed objects and exclusion zones are all cubes.
//! Axis indices follow nalgebra: 0 = X, 1 = Y, 2 = Z (up).

use nalgebra::{Point2, Point3};
use std::ops::BitOr;

/// Axis-aligned box given by its low and high corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub lo: Point3<f64>,
    pub hi: Point3<f64>,
}

impl Cube {
    /// Create a cube from its low and high corners (not reordered)
    #[inline]
    pub fn new(lo: Point3<f64>, hi: Point3<f64>) -> Self {
        Self { lo, hi }
    }

    /// Create a cube from per-axis ranges
    #[inline]
    pub fn from_ranges(x: (f64, f64), y: (f64, f64), z: (f64, f64)) -> Self {
        Self {
            lo: Point3::new(x.0, y.0, z.0),
            hi: Point3::new(x.1, y.1, z.1),
        }
    }

    /// Extent along `dim`
    #[inline]
    pub fn size(&self, dim: usize) -> f64 {
        self.hi[dim] - self.lo[dim]
    }

    #[inline]
    pub fn dx(&self) -> f64 {
        self.size(0)
    }

    #[inline]
    pub fn dy(&self) -> f64 {
        self.size(1)
    }

    #[inline]
    pub fn dz(&self) -> f64 {
        self.size(2)
    }

    /// Smaller of the two horizontal extents
    #[inline]
    pub fn min_xy_size(&self) -> f64 {
        self.dx().min(self.dy())
    }

    /// Center coordinate along `dim`
    #[inline]
    pub fn center_dim(&self, dim: usize) -> f64 {
        0.5 * (self.lo[dim] + self.hi[dim])
    }

    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.lo, &self.hi)
    }

    /// Footprint area
    #[inline]
    pub fn area_xy(&self) -> f64 {
        self.dx() * self.dy()
    }

    /// Every extent is strictly positive
    #[inline]
    pub fn is_strictly_normalized(&self) -> bool {
        (0..3).all(|d| self.hi[d] > self.lo[d])
    }

    /// Overlap test with a non-empty shared volume; touching faces do not count
    #[inline]
    pub fn intersects(&self, other: &Cube) -> bool {
        (0..3).all(|d| self.lo[d] < other.hi[d] && other.lo[d] < self.hi[d])
    }

    /// `other` lies entirely inside this cube (boundaries inclusive)
    #[inline]
    pub fn contains_cube(&self, other: &Cube) -> bool {
        (0..3).all(|d| self.lo[d] <= other.lo[d] && other.hi[d] <= self.hi[d])
    }

    /// `other` lies inside this cube's footprint (boundaries inclusive)
    #[inline]
    pub fn contains_cube_xy(&self, other: &Cube) -> bool {
        (0..2).all(|d| self.lo[d] <= other.lo[d] && other.hi[d] <= self.hi[d])
    }

    /// Grow (or shrink) the four horizontal sides by `amount`
    #[inline]
    pub fn expand_by_xy(&mut self, amount: f64) {
        self.expand_in_dim(0, amount);
        self.expand_in_dim(1, amount);
    }

    /// Grow (or shrink) both sides along `dim` by `amount`
    #[inline]
    pub fn expand_in_dim(&mut self, dim: usize, amount: f64) {
        self.lo[dim] -= amount;
        self.hi[dim] += amount;
    }

    /// Move one side outward by `amount`; `dir` selects the high side
    #[inline]
    pub fn extend_side(&mut self, dim: usize, dir: bool, amount: f64) {
        if dir {
            self.hi[dim] += amount;
        } else {
            self.lo[dim] -= amount;
        }
    }

    /// Set both bounds along `dim`
    #[inline]
    pub fn set_range(&mut self, dim: usize, lo: f64, hi: f64) {
        self.lo[dim] = lo;
        self.hi[dim] = hi;
    }

    /// Set the range along `dim` from two values in either order
    #[inline]
    pub fn set_range_sorted(&mut self, dim: usize, a: f64, b: f64) {
        self.set_range(dim, a.min(b), a.max(b));
    }

    /// Clamp the range along `dim` into `[lo, hi]`
    #[inline]
    pub fn clamp_range(&mut self, dim: usize, lo: f64, hi: f64) {
        self.lo[dim] = self.lo[dim].max(lo);
        self.hi[dim] = self.hi[dim].min(hi);
    }

    #[inline]
    pub fn union_with(&mut self, other: &Cube) {
        self.union_with_point(&other.lo);
        self.union_with_point(&other.hi);
    }

    #[inline]
    pub fn union_with_point(&mut self, p: &Point3<f64>) {
        for d in 0..3 {
            self.lo[d] = self.lo[d].min(p[d]);
            self.hi[d] = self.hi[d].max(p[d]);
        }
    }

    /// The four corners of the top face, counter-clockwise from the low corner
    pub fn top_corners(&self) -> [Point3<f64>; 4] {
        let z = self.hi.z;
        [
            Point3::new(self.lo.x, self.lo.y, z),
            Point3::new(self.hi.x, self.lo.y, z),
            Point3::new(self.hi.x, self.hi.y, z),
            Point3::new(self.lo.x, self.hi.y, z),
        ]
    }

    /// Footprint as a counter-clockwise polygon
    pub fn footprint(&self) -> [Point2<f64>; 4] {
        [
            Point2::new(self.lo.x, self.lo.y),
            Point2::new(self.hi.x, self.lo.y),
            Point2::new(self.hi.x, self.hi.y),
            Point2::new(self.lo.x, self.hi.y),
        ]
    }
}

/// Set of box faces, used to skip faces that would never be visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FaceMask(u8);

impl FaceMask {
    pub const NONE: FaceMask = FaceMask(0);
    pub const X_LO: FaceMask = FaceMask(1 << 0);
    pub const X_HI: FaceMask = FaceMask(1 << 1);
    pub const Y_LO: FaceMask = FaceMask(1 << 2);
    pub const Y_HI: FaceMask = FaceMask(1 << 3);
    pub const Z_LO: FaceMask = FaceMask(1 << 4);
    pub const Z_HI: FaceMask = FaceMask(1 << 5);
    pub const ALL: FaceMask = FaceMask(0x3F);

    /// The face on the `dir` side of `dim`
    #[inline]
    pub fn face(dim: usize, dir: bool) -> FaceMask {
        FaceMask(1 << (2 * dim + dir as usize))
    }

    /// Both faces perpendicular to `dim`
    #[inline]
    pub fn dim(dim: usize) -> FaceMask {
        FaceMask::face(dim, false) | FaceMask::face(dim, true)
    }

    #[inline]
    pub fn contains(self, other: FaceMask) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl BitOr for FaceMask {
    type Output = FaceMask;

    fn bitor(self, rhs: FaceMask) -> FaceMask {
        FaceMask(self.0 | rhs.0)
    }
}
