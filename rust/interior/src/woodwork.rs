// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attic woodwork: rafters, hip beams, ridge beams and collar ties
//!
//! Rafters for one surface are built as upright boxes standing on the eave,
//! each as tall as the slant length of the roof above it, and then tipped
//! into the roof plane together by one rotation about the eave line.

use crate::types::Building;
use rafter_geometry::tquad::Z_TOLERANCE;
use rafter_geometry::{
    axis_rotation, rotation_between, Cube, FaceMask, Mesh, Point3, TQuad, TQuadKind, Vector3,
};
use smallvec::SmallVec;
use std::f64::consts::{FRAC_PI_4, SQRT_2};

/// Slack when matching a beam position to an edge span
const SPAN_EPSILON: f64 = 1e-9;

/// A roof surface described in its own facing frame
#[derive(Debug, Clone)]
pub(crate) struct SurfaceFrame {
    /// Horizontal axis the surface faces along
    pub dim: usize,
    /// Horizontal axis beams are spaced along
    pub odim: usize,
    /// Sign of the outward normal along `dim`
    pub sign: f64,
    /// `dim` coordinate of the base edge
    pub eave: f64,
    pub base_z: f64,
    /// Pitch from horizontal; 90 degrees for walls
    pub theta: f64,
    /// Extent along `odim`
    pub span: (f64, f64),
    /// Non-base edges with extent along `odim`
    pub slopes: SmallVec<[(Point3<f64>, Point3<f64>); 3]>,
}

impl SurfaceFrame {
    /// `None` for flat surfaces, which have no sloped edges
    pub fn new(tq: &TQuad, outward: &Vector3<f64>) -> Option<Self> {
        let dim = if outward.x.abs() >= outward.y.abs() { 0 } else { 1 };
        let odim = 1 - dim;
        let base_z = tq.min_z();

        let base: SmallVec<[f64; 4]> = tq
            .points
            .iter()
            .filter(|p| (p.z - base_z).abs() < Z_TOLERANCE)
            .map(|p| p[dim])
            .collect();
        let eave = base.iter().sum::<f64>() / base.len() as f64;

        let slopes: SmallVec<[(Point3<f64>, Point3<f64>); 3]> = tq
            .edges()
            .filter(|(a, b)| !tq.is_base_edge(a, b) && (b[odim] - a[odim]).abs() > Z_TOLERANCE)
            .collect();
        if slopes.is_empty() {
            return None;
        }
        let bcube = tq.bcube();

        Some(Self {
            dim,
            odim,
            sign: if outward[dim] < 0.0 { -1.0 } else { 1.0 },
            eave,
            base_z,
            theta: outward[dim].abs().atan2(outward.z),
            span: (bcube.lo[odim], bcube.hi[odim]),
            slopes,
        })
    }

    /// Height of the surface above its base at `p` along `odim`
    ///
    /// Panics when `p` is outside every sloped edge; beam positions are
    /// always generated inside the surface span.
    pub fn rise_at(&self, p: f64) -> f64 {
        let odim = self.odim;
        for (a, b) in &self.slopes {
            let (lo, hi) = (a[odim].min(b[odim]), a[odim].max(b[odim]));
            if p < lo - SPAN_EPSILON || p > hi + SPAN_EPSILON {
                continue;
            }
            let t = ((p - a[odim]) / (b[odim] - a[odim])).clamp(0.0, 1.0);
            return a.z + t * (b.z - a.z) - self.base_z;
        }
        panic!(
            "beam position {} outside every roof edge span {:?}",
            p, self.span
        );
    }

    /// Direction up the surface, perpendicular to the eave
    pub fn up_slope(&self) -> Vector3<f64> {
        let mut u = Vector3::<f64>::zeros();
        u[self.dim] = -self.sign * self.theta.cos();
        u.z = self.theta.sin();
        u
    }

    /// A point on the eave line at the attic floor
    pub fn pivot(&self) -> Point3<f64> {
        let mut p = Point3::new(0.0, 0.0, self.base_z);
        p[self.dim] = self.eave;
        p[self.odim] = self.span.0;
        p
    }

    /// Horizontal top edge, if the surface has one
    pub fn ridge(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        self.slopes
            .iter()
            .find(|(a, b)| (a.z - b.z).abs() < Z_TOLERANCE && a.z > self.base_z + Z_TOLERANCE)
            .copied()
    }

    /// Bottom of the ridge beam under this surface
    pub fn ridge_beam_bottom(&self, ridge_z: f64, beam_depth: f64) -> f64 {
        ridge_z - 0.5 * beam_depth * self.theta.tan() - beam_depth
    }

    /// Rafter center positions along `odim`, inset from both ends
    pub fn beam_positions(&self, beam_depth: f64, density: f64) -> Vec<f64> {
        let (lo, hi) = self.span;
        let width = hi - lo;
        if width < 2.0 * beam_depth {
            return Vec::new();
        }
        let count = ((density * width).round() as usize).max(2);
        let step = (width - 2.0 * beam_depth) / (count - 1) as f64;
        (0..count)
            .map(|i| lo + beam_depth + i as f64 * step)
            .collect()
    }
}

impl Building {
    pub(crate) fn surface_frame(&self, tq: &TQuad) -> Option<SurfaceFrame> {
        SurfaceFrame::new(tq, &self.outward_normal(tq))
    }

    /// Emit woodwork for every attic surface; returns the number of boxes
    pub fn add_attic_woodwork(&self, mesh: &mut Mesh) -> usize {
        if !self.has_attic() {
            return 0;
        }
        let emitted: usize = self
            .attic_surfaces(false)
            .map(|tq| self.add_surface_woodwork(tq, mesh))
            .sum();
        tracing::debug!(beams = emitted, "added attic woodwork");
        emitted
    }

    fn add_surface_woodwork(&self, tq: &TQuad, mesh: &mut Mesh) -> usize {
        let Some(frame) = self.surface_frame(tq) else {
            return 0;
        };
        let bd = self.beam_depth();
        let hw = 0.5 * bd;
        let sin = frame.theta.sin();
        if sin < 1e-6 {
            return 0;
        }
        let positions = frame.beam_positions(bd, self.config.beam_density / self.floor_spacing);

        // Ends and the face against the roof deck are never seen
        let rafter_skip = FaceMask::dim(2) | FaceMask::face(frame.dim, frame.sign > 0.0);
        let start = mesh.vertex_count();
        let mut emitted = 0;
        for &p in &positions {
            let len = frame.rise_at(p) / sin;
            if len < bd {
                continue;
            }
            let mut beam = Cube::from_ranges((0.0, 0.0), (0.0, 0.0), (frame.base_z, frame.base_z + len));
            beam.set_range(frame.odim, p - hw, p + hw);
            beam.set_range_sorted(frame.dim, frame.eave, frame.eave - frame.sign * bd);
            if mesh.add_cube(&beam, rafter_skip) {
                emitted += 1;
            }
        }
        let tilt = rotation_between(&Vector3::z(), &frame.up_slope());
        mesh.rotate_from(start, &frame.pivot(), &tilt);
        tracing::trace!(
            dim = frame.dim,
            edges = frame.slopes.len(),
            rafters = emitted,
            "surface rafters"
        );

        if tq.kind == TQuadKind::Roof {
            emitted += self.add_ridge_beam(&frame, mesh);
            emitted += match frame.slopes.len() {
                3 => self.add_hip_beams(&frame, mesh) + self.add_ridge_posts(&frame, mesh),
                1 => self.add_collar_ties(&frame, &positions, mesh),
                _ => 0,
            };
        }
        emitted
    }

    /// Posts under both ends of a ridge that stops short of the surface
    ///
    /// Only quads facing the negative side of their axis get posts, so a
    /// symmetric pair of slopes yields one pair. Gable slopes, whose ridge
    /// runs the full width, get none.
    pub(crate) fn ridge_post_cubes(&self, frame: &SurfaceFrame, floor_z: f64) -> SmallVec<[Cube; 2]> {
        let mut posts = SmallVec::new();
        if frame.sign > 0.0 {
            return posts;
        }
        let Some((a, b)) = frame.ridge() else {
            return posts;
        };
        let (dim, odim) = (frame.dim, frame.odim);
        let (lo, hi) = (a[odim].min(b[odim]), a[odim].max(b[odim]));
        if lo <= frame.span.0 + Z_TOLERANCE && hi >= frame.span.1 - Z_TOLERANCE {
            return posts;
        }
        let bd = self.beam_depth();
        let hw = 0.5 * bd;
        let top = frame.ridge_beam_bottom(a.z, bd);

        for c in [lo + bd, hi - bd] {
            let mut post = Cube::from_ranges((0.0, 0.0), (0.0, 0.0), (floor_z, top));
            post.set_range(odim, c - hw, c + hw);
            post.set_range(dim, a[dim] - hw, a[dim] + hw);
            if post.is_strictly_normalized() {
                posts.push(post);
            }
        }
        posts
    }

    fn add_ridge_posts(&self, frame: &SurfaceFrame, mesh: &mut Mesh) -> usize {
        let Some(floor_z) = self.attic_floor_z() else {
            return 0;
        };
        self.ridge_post_cubes(frame, floor_z)
            .iter()
            .filter(|post| mesh.add_cube(post, FaceMask::dim(2)))
            .count()
    }

    /// Diagonal beams hanging under both hip edges of a trapezoid
    fn add_hip_beams(&self, frame: &SurfaceFrame, mesh: &mut Mesh) -> usize {
        let bd = self.beam_depth();
        let hw = 0.5 * bd;
        let mut emitted = 0;

        for (a, b) in &frame.slopes {
            if (a.z - b.z).abs() < Z_TOLERANCE {
                continue;
            }
            let (low, high) = if a.z < b.z { (a, b) } else { (b, a) };
            let edge = high - low;
            let len = edge.norm();
            if len < bd {
                continue;
            }
            let e = edge / len;
            let beam = Cube::from_ranges(
                (low.x - hw, low.x + hw),
                (low.y - hw, low.y + hw),
                (low.z, low.z + len),
            );
            let yaw = axis_rotation(&Vector3::z(), e.y.atan2(e.x));
            let pitch = rotation_between(&Vector3::z(), &e);
            let roll = axis_rotation(&e, FRAC_PI_4);

            let start = mesh.vertex_count();
            if !mesh.add_cube(&beam, FaceMask::dim(2)) {
                continue;
            }
            mesh.rotate_from(start, low, &(roll * pitch * yaw));
            // Hang the beam so its upper corner runs along the edge
            let up = (Vector3::z() - e * e.z).normalize();
            mesh.translate_from(start, &(-hw * SQRT_2 * up));
            emitted += 1;
        }
        emitted
    }

    /// Half of the ridge beam, on this surface's side of the ridge line
    fn add_ridge_beam(&self, frame: &SurfaceFrame, mesh: &mut Mesh) -> usize {
        let Some((a, b)) = frame.ridge() else {
            return 0;
        };
        let bd = self.beam_depth();
        let hw = 0.5 * bd;
        let (dim, odim) = (frame.dim, frame.odim);
        let ridge_d = a[dim];

        let mut ridge = Cube::from_ranges((0.0, 0.0), (0.0, 0.0), (0.0, 0.0));
        ridge.set_range(odim, a[odim].min(b[odim]), a[odim].max(b[odim]));
        ridge.set_range_sorted(dim, ridge_d, ridge_d + frame.sign * hw);
        ridge.set_range(2, frame.ridge_beam_bottom(a.z, bd), a.z - hw * frame.theta.tan());
        // Top sits under the deck; the inner face meets the other half
        let skip = FaceMask::face(2, true) | FaceMask::face(dim, frame.sign < 0.0);
        mesh.add_cube(&ridge, skip) as usize
    }

    /// Horizontal ties from the rafters to the ridge line of a gable slope
    fn add_collar_ties(&self, frame: &SurfaceFrame, positions: &[f64], mesh: &mut Mesh) -> usize {
        let Some((ridge_start, _)) = frame.ridge() else {
            return 0;
        };
        let bd = self.beam_depth();
        let hw = 0.5 * bd;
        let (dim, odim) = (frame.dim, frame.odim);
        let ridge_d = ridge_start[dim];

        let rise = ridge_start.z - frame.base_z;
        if rise < self.config.min_collar_rise * self.floor_spacing || positions.len() < 3 {
            return 0;
        }
        let zc = frame.base_z + self.config.collar_height * rise;
        // Horizontal run from the eave to the rafter underside at the tie height
        let run = (zc - frame.base_z) / frame.theta.tan() + bd / frame.theta.sin();
        let tie_start = frame.eave - frame.sign * run;

        // End positions sit against the gable walls
        let mut emitted = 0;
        for &p in &positions[1..positions.len() - 1] {
            let mut tie = Cube::from_ranges((0.0, 0.0), (0.0, 0.0), (zc - hw, zc + hw));
            tie.set_range(odim, p - hw, p + hw);
            tie.set_range_sorted(dim, tie_start, ridge_d);
            // One end is buried in the rafter, the other meets the opposite tie
            if mesh.add_cube(&tie, FaceMask::dim(dim)) {
                emitted += 1;
            }
        }
        emitted
    }
}
