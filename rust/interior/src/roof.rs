// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof surface classification
//!
//! Picks out the roof (and optionally gable wall) surfaces that enclose the
//! attic and answers containment queries against them. A surface belongs to
//! the attic when it starts at or above the hatch and its plan centroid sits
//! inside the part that owns the hatch; porch roofs and lower overhangs fail
//! one of the two tests.

use crate::types::Building;
use rafter_geometry::polygon::point_in_polygon_inclusive;
use rafter_geometry::tquad::Z_TOLERANCE;
use rafter_geometry::{Cube, Point2, Point3, TQuad, TQuadKind, Vector3};

/// Normals with a smaller z component are treated as vertical
const VERTICAL_NORMAL_Z: f64 = 1e-6;

impl Building {
    /// The part that owns the attic hatch
    pub fn attic_part(&self) -> Option<&Cube> {
        let access = self.interior.attic_access.as_ref()?;
        self.parts.get(access.part_id)
    }

    /// Attic floor height (top of the hatch)
    pub fn attic_floor_z(&self) -> Option<f64> {
        self.interior.attic_access.as_ref().map(|a| a.cube.hi.z)
    }

    /// Highest point of the attic roof surfaces
    pub fn attic_top_z(&self) -> Option<f64> {
        self.attic_surfaces(true)
            .map(TQuad::max_z)
            .fold(None, |top: Option<f64>, z| Some(top.map_or(z, |t| t.max(z))))
    }

    /// Attic floor and top heights
    pub fn attic_z_range(&self) -> Option<(f64, f64)> {
        Some((self.attic_floor_z()?, self.attic_top_z()?))
    }

    pub fn is_attic_roof(&self, tq: &TQuad, roof_only: bool) -> bool {
        match tq.kind {
            TQuadKind::Roof => {}
            TQuadKind::Wall if !roof_only => {}
            _ => return false,
        }
        let (Some(floor_z), Some(part)) = (self.attic_floor_z(), self.attic_part()) else {
            return false;
        };
        if tq.min_z() < floor_z - Z_TOLERANCE {
            return false;
        }
        let c = tq.centroid();
        point_in_polygon_inclusive(&Point2::new(c.x, c.y), &part.footprint())
    }

    /// Attic surfaces in roof order
    pub fn attic_surfaces(&self, roof_only: bool) -> impl Iterator<Item = &TQuad> + '_ {
        self.roof_tquads
            .iter()
            .filter(move |tq| self.is_attic_roof(tq, roof_only))
    }

    /// Surface normal oriented away from the attic's center at floor level
    ///
    /// Shell builders do not agree on winding, and gable walls have no
    /// vertical component to orient by, so the orientation comes from
    /// position rather than from the stored winding.
    pub fn outward_normal(&self, tq: &TQuad) -> Vector3<f64> {
        let n = tq.normal();
        let Some(part) = self.attic_part() else {
            return n;
        };
        let floor_z = self.attic_floor_z().unwrap_or(part.hi.z);
        let center = Point3::new(part.center_dim(0), part.center_dim(1), floor_z);
        if n.dot(&(tq.centroid() - center)) < 0.0 {
            -n
        } else {
            n
        }
    }

    /// Inward normal of the attic roof above `pos`, or `None` when `pos` is
    /// not below one
    ///
    /// The first roof surface that contains `pos` in plan and lies above it
    /// decides; surfaces below `pos` are passed over.
    pub fn point_under_attic_roof(&self, pos: &Point3<f64>) -> Option<Vector3<f64>> {
        for tq in self.attic_surfaces(true) {
            let n = self.outward_normal(tq);
            if n.z.abs() < VERTICAL_NORMAL_Z {
                continue;
            }
            if !tq.contains_point_xy(pos.x, pos.y) {
                continue;
            }
            if (pos - tq.points[0]).dot(&n) < 0.0 {
                return Some(-n);
            }
        }
        None
    }

    pub fn point_in_attic(&self, pos: &Point3<f64>) -> bool {
        let Some((floor_z, top_z)) = self.attic_z_range() else {
            return false;
        };
        pos.z > floor_z && pos.z < top_z && self.point_under_attic_roof(pos).is_some()
    }

    /// `c` fits in the attic with beam headroom above it
    ///
    /// Only the four top corners are tested, raised by the roof margin.
    pub fn cube_in_attic(&self, c: &Cube) -> bool {
        let Some((floor_z, top_z)) = self.attic_z_range() else {
            return false;
        };
        if c.lo.z < floor_z || c.hi.z > top_z {
            return false;
        }
        let margin = self.config.roof_margin * self.beam_depth();
        c.top_corners().iter().all(|corner| {
            let probe = Point3::new(corner.x, corner.y, corner.z + margin);
            self.point_under_attic_roof(&probe).is_some()
        })
    }
}
