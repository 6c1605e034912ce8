// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attic object population
//!
//! One sequential pass adds the hatch door, lights, the chimney, ridge
//! posts, a furnace, storage boxes and lamps. From the chimney on, each
//! placement is checked against the exclusion set and then joins it, so
//! earlier objects are never disturbed by later ones. Lights hang under the
//! ridge and are not part of the set.

use crate::types::object_flags::{COLLIDABLE, INTERIOR, INVISIBLE, IN_ATTIC, LIT};
use crate::types::{Building, ObjectKind, RoomObject};
use rafter_geometry::{Cube, Point3, Vector3};
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::{smallvec, SmallVec};
use tracing::debug;

/// Cubes that later placements in a pass must stay clear of
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    cubes: Vec<Cube>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn push(&mut self, cube: Cube) {
        self.cubes.push(cube);
    }

    /// `cube` overlaps some excluded cube
    pub fn intersects_any(&self, cube: &Cube) -> bool {
        self.cubes.iter().any(|c| c.intersects(cube))
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }
}

/// Uniform center for a footprint of `half` extents inside `area`
fn random_center(area: &Cube, half: [f64; 2], rng: &mut StdRng) -> Option<[f64; 2]> {
    let mut center = [0.0; 2];
    for d in 0..2 {
        let (lo, hi) = (area.lo[d] + half[d], area.hi[d] - half[d]);
        if lo >= hi {
            return None;
        }
        center[d] = rng.random_range(lo..hi);
    }
    Some(center)
}

fn floor_cube(center: [f64; 2], half: [f64; 2], z: f64, height: f64) -> Cube {
    Cube::from_ranges(
        (center[0] - half[0], center[0] + half[0]),
        (center[1] - half[1], center[1] + half[1]),
        (z, z + height),
    )
}

impl Building {
    /// Populate the attic; returns the number of objects added
    pub fn add_attic_objects(&mut self, rng: &mut StdRng) -> usize {
        let Some(access) = self.interior.attic_access.clone() else {
            return 0;
        };
        let (Some(avoid), Some((floor_z, top_z))) =
            (self.get_attic_access_door_avoid(), self.attic_z_range())
        else {
            return 0;
        };
        let part = self.parts[access.part_id];
        let room_id = access.room_id;
        let start = self.interior.objects.len();

        self.interior.objects.push(RoomObject::new(
            ObjectKind::AtticDoor,
            access.cube,
            access.dim,
            access.dir,
            room_id,
            INTERIOR,
        ));
        let mut exclusion = ExclusionSet::new();
        exclusion.push(avoid);

        let long = if part.dx() >= part.dy() { 0 } else { 1 };
        for light in self.attic_light_cubes(&part, floor_z, top_z) {
            self.interior.objects.push(RoomObject::new(
                ObjectKind::Light,
                light,
                long,
                false,
                room_id,
                INTERIOR | IN_ATTIC | LIT,
            ));
        }

        if let Some(mut chimney) = self.interior_chimney {
            chimney.clamp_range(2, floor_z, top_z);
            for d in 0..2 {
                let shrink = self.config.chimney_shrink * chimney.size(d);
                chimney.expand_in_dim(d, -shrink);
            }
            if chimney.is_strictly_normalized() && !exclusion.intersects_any(&chimney) {
                self.interior.objects.push(RoomObject::new(
                    ObjectKind::Chimney,
                    chimney,
                    0,
                    false,
                    room_id,
                    INTERIOR | IN_ATTIC | COLLIDABLE,
                ));
                exclusion.push(chimney);
            }
        }

        let padding = self.config.post_padding * self.beam_depth();
        for (post, dim) in self.attic_post_cubes(floor_z) {
            if exclusion.intersects_any(&post) {
                continue;
            }
            self.interior.objects.push(RoomObject::new(
                ObjectKind::Collider,
                post,
                dim,
                false,
                room_id,
                INTERIOR | IN_ATTIC | COLLIDABLE | INVISIBLE,
            ));
            let mut padded = post;
            padded.expand_by_xy(padding);
            exclusion.push(padded);
        }

        // Keep away from the low corners under the eaves
        let mut area = part;
        area.expand_by_xy(-self.config.furnace_inset * self.floor_spacing);
        area.set_range(2, floor_z, top_z);

        if !self.has_basement {
            if let Some(furnace) = self.place_furnace(&area, &exclusion, rng) {
                exclusion.push(furnace.cube);
                self.interior.objects.push(furnace);
            }
        }

        let num_boxes = rng.random_range(0..=self.config.max_boxes);
        self.add_boxes_to_space(&area, num_boxes, room_id, &mut exclusion, rng);
        let num_lamps = rng.random_range(0..=self.config.max_lamps);
        self.add_lamps_to_space(&area, num_lamps, room_id, &mut exclusion, rng);

        let added = self.interior.objects.len() - start;
        debug!(added, exclusions = exclusion.len(), "populated attic");
        added
    }

    /// One light at the center, or two spread along a long, narrow part
    fn attic_light_cubes(&self, part: &Cube, floor_z: f64, top_z: f64) -> SmallVec<[Cube; 2]> {
        let fs = self.floor_spacing;
        let bd = self.beam_depth();
        let r = self.config.light_radius * fs;
        let light_top = top_z - 2.0 * bd;
        let light = |c: [f64; 2]| {
            Cube::from_ranges(
                (c[0] - r, c[0] + r),
                (c[1] - r, c[1] + r),
                (light_top - 2.0 * r, light_top),
            )
        };
        let center = [part.center_dim(0), part.center_dim(1)];
        let long = if part.dx() >= part.dy() { 0 } else { 1 };
        let short = 1 - long;
        let sep = part.size(long) - part.size(short);

        if sep > self.config.light_split_threshold * (top_z - floor_z) {
            let offset = 0.5 * sep - (r + bd);
            if offset > 0.0 {
                let nudge = self.config.probe_nudge * fs;
                let candidates = [-1.0, 1.0].map(|s| {
                    let mut c = center;
                    c[long] += s * offset;
                    c
                });
                let under_roof = candidates.iter().all(|c| {
                    let mut probe = Point3::new(c[0], c[1], light_top);
                    probe[short] += nudge;
                    self.point_under_attic_roof(&probe).is_some()
                });
                if under_roof {
                    return candidates.iter().map(|&c| light(c)).collect();
                }
                debug!("light probe outside roof, keeping a single light");
            }
        }
        smallvec![light(center)]
    }

    /// Ridge posts of every attic roof, with the axis they sit across
    ///
    /// Same cubes the woodwork draws, so colliders match what is visible.
    fn attic_post_cubes(&self, floor_z: f64) -> Vec<(Cube, usize)> {
        self.attic_surfaces(true)
            .filter(|tq| tq.npts() == 4)
            .filter_map(|tq| self.surface_frame(tq))
            .flat_map(|frame| {
                let dim = frame.dim;
                self.ridge_post_cubes(&frame, floor_z)
                    .into_iter()
                    .map(move |post| (post, dim))
            })
            .collect()
    }

    /// Random furnace position in `area`, clear of `exclusion` and under
    /// the roof; stands on `area.lo.z`
    pub fn place_furnace(
        &self,
        area: &Cube,
        exclusion: &ExclusionSet,
        rng: &mut StdRng,
    ) -> Option<RoomObject> {
        let fs = self.floor_spacing;
        let cfg = &self.config;
        let room_id = self.interior.attic_access.as_ref()?.room_id;

        for _ in 0..cfg.furnace_attempts {
            let dim = rng.random_range(0..2usize);
            let dir = rng.random_bool(0.5);
            let mut half = [0.0; 2];
            half[dim] = cfg.furnace_half_depth * fs;
            half[1 - dim] = cfg.furnace_half_width * fs;

            let Some(center) = random_center(area, half, rng) else {
                continue;
            };
            let cube = floor_cube(center, half, area.lo.z, cfg.furnace_height * fs);
            if exclusion.intersects_any(&cube) || !self.cube_in_attic(&cube) {
                continue;
            }
            return Some(RoomObject::new(
                ObjectKind::Furnace,
                cube,
                dim,
                dir,
                room_id,
                INTERIOR | IN_ATTIC | COLLIDABLE,
            ));
        }
        debug!(attempts = cfg.furnace_attempts, "no room for attic furnace");
        None
    }

    /// Scatter up to `count` storage boxes over the floor of `space`
    pub fn add_boxes_to_space(
        &mut self,
        space: &Cube,
        count: u32,
        room_id: usize,
        exclusion: &mut ExclusionSet,
        rng: &mut StdRng,
    ) -> usize {
        let fs = self.floor_spacing;
        let (min_half, max_half) = (self.config.box_min_half_size * fs, self.config.box_max_half_size * fs);
        let (min_height, max_height) = (self.config.box_min_height * fs, self.config.box_max_height * fs);
        let attempts = self.config.box_attempts;

        self.place_in_space(
            ObjectKind::Box,
            INTERIOR | IN_ATTIC | COLLIDABLE,
            space,
            count,
            attempts,
            room_id,
            exclusion,
            rng,
            |rng| {
                Vector3::new(
                    rng.random_range(min_half..=max_half),
                    rng.random_range(min_half..=max_half),
                    rng.random_range(min_height..=max_height),
                )
            },
        )
    }

    /// Stand up to `count` lamps on the floor of `space`
    pub fn add_lamps_to_space(
        &mut self,
        space: &Cube,
        count: u32,
        room_id: usize,
        exclusion: &mut ExclusionSet,
        rng: &mut StdRng,
    ) -> usize {
        let fs = self.floor_spacing;
        let half = self.config.lamp_half_size * fs;
        let height = self.config.lamp_height * fs;
        let attempts = self.config.lamp_attempts;

        self.place_in_space(
            ObjectKind::Lamp,
            INTERIOR | IN_ATTIC | LIT,
            space,
            count,
            attempts,
            room_id,
            exclusion,
            rng,
            |_| Vector3::new(half, half, height),
        )
    }

    /// Place objects one at a time, each with a bounded number of tries
    ///
    /// `extents` yields half width, half depth and full height.
    #[allow(clippy::too_many_arguments)]
    fn place_in_space(
        &mut self,
        kind: ObjectKind,
        flags: u32,
        space: &Cube,
        count: u32,
        attempts: u32,
        room_id: usize,
        exclusion: &mut ExclusionSet,
        rng: &mut StdRng,
        mut extents: impl FnMut(&mut StdRng) -> Vector3<f64>,
    ) -> usize {
        let mut placed = 0;

        for _ in 0..count {
            for _ in 0..attempts {
                let ext = extents(rng);
                let half = [ext.x, ext.y];
                let Some(center) = random_center(space, half, rng) else {
                    continue;
                };
                let cube = floor_cube(center, half, space.lo.z, ext.z);
                if exclusion.intersects_any(&cube) || !self.cube_in_attic(&cube) {
                    continue;
                }
                let dim = if ext.x >= ext.y { 0 } else { 1 };
                self.interior
                    .objects
                    .push(RoomObject::new(kind, cube, dim, false, room_id, flags));
                exclusion.push(cube);
                placed += 1;
                break;
            }
        }
        debug!(?kind, requested = count, placed, "placed attic objects");
        placed
    }
}
