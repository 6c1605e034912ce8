// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attic access hatch placement
//!
//! The hatch is cut into the ceiling of one top-floor room. Hallways are
//! preferred; otherwise the largest eligible room is used. Within the room
//! the hatch is pulled toward the middle of the part, where the roof is
//! highest, unless the room spans the part along that axis.

use crate::types::{AtticAccess, Building};
use rafter_geometry::Cube;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// Tolerance for "room spans the whole part" along an axis
const SPAN_TOLERANCE: f64 = 1e-6;

/// Weight of the room side nearer the part center when biasing the hatch
const NEAR_SIDE_WEIGHT: f64 = 0.7;

impl Building {
    /// Place the attic hatch in part `part_id`
    ///
    /// Returns false, leaving the interior untouched, when the part is too
    /// small, no room qualifies, or the hatch would hit a cube in `avoid`.
    /// The generator is only ever cloned, never advanced.
    pub fn add_attic_access_door(
        &mut self,
        part_id: usize,
        num_floors: usize,
        rooms_start: usize,
        avoid: &[Cube],
        rng: &StdRng,
    ) -> bool {
        if self.interior.attic_access.is_some() {
            debug!(part_id, "attic access already placed");
            return false;
        }
        match self.plan_attic_access(part_id, num_floors, rooms_start, avoid, rng) {
            Some(access) => {
                debug!(
                    part_id,
                    room_id = access.room_id,
                    orientation = access.orientation(),
                    "placed attic access"
                );
                self.interior.attic_access = Some(access);
                true
            }
            None => false,
        }
    }

    /// Compute a hatch without installing it
    pub fn plan_attic_access(
        &self,
        part_id: usize,
        num_floors: usize,
        rooms_start: usize,
        avoid: &[Cube],
        rng: &StdRng,
    ) -> Option<AtticAccess> {
        let fs = self.floor_spacing;
        let cfg = &self.config;
        let part = self.parts[part_id];

        if part.min_xy_size() < cfg.min_part_size * fs {
            debug!(part_id, size = part.min_xy_size(), "part too small for attic access");
            return None;
        }

        let Some((room_id, is_hallway)) = self.select_hatch_room(part_id, rooms_start) else {
            debug!(part_id, "no room can host attic access");
            return None;
        };
        let room = self.interior.rooms[room_id].cube;
        let dim = if room.dx() >= room.dy() { 0 } else { 1 };

        let mut half = [0.0; 2];
        half[dim] = cfg.hatch_half_length * fs;
        half[1 - dim] = cfg.hatch_half_width * fs;
        let mut center = [room.center_dim(0), room.center_dim(1)];

        if is_hallway {
            // Step off center to clear a centered light and leave room to
            // walk past; the fork keeps the caller's sequence unaffected
            let mut fork = rng.clone();
            for d in 0..2 {
                let frac = if d == dim {
                    cfg.hallway_offset_along
                } else {
                    cfg.hallway_offset_across
                };
                let offset = frac * room.size(d);
                center[d] += if fork.random_bool(0.5) { offset } else { -offset };
            }
        } else {
            for d in 0..2 {
                let spans_part = room.lo[d] <= part.lo[d] + SPAN_TOLERANCE
                    && room.hi[d] >= part.hi[d] - SPAN_TOLERANCE;
                if spans_part {
                    continue;
                }
                // 30% into the room from the side nearer the part center
                let (near, far) = if part.center_dim(d) > room.center_dim(d) {
                    (room.hi[d], room.lo[d])
                } else {
                    (room.lo[d], room.hi[d])
                };
                center[d] = NEAR_SIDE_WEIGHT * near + (1.0 - NEAR_SIDE_WEIGHT) * far;
            }
        }

        for d in 0..2 {
            let inset = half[d] * (1.0 + cfg.hatch_clearance);
            let (lo, hi) = (room.lo[d] + inset, room.hi[d] - inset);
            if lo > hi {
                debug!(room_id, dim = d, "hatch valid area is degenerate");
                return None;
            }
            center[d] = center[d].clamp(lo, hi);
        }

        let floor_z = part.lo.z + num_floors as f64 * fs;
        let cube = Cube::from_ranges(
            (center[0] - half[0], center[0] + half[0]),
            (center[1] - half[1], center[1] + half[1]),
            (floor_z - cfg.ceiling_thickness * fs, floor_z),
        );
        if avoid.iter().any(|c| c.intersects(&cube)) {
            debug!(room_id, "attic access blocked by avoid cube");
            return None;
        }

        Some(AtticAccess {
            cube,
            part_id,
            room_id,
            dim,
            dir: room.center_dim(dim) > center[dim],
        })
    }

    /// First eligible hallway, else the largest eligible room
    fn select_hatch_room(&self, part_id: usize, rooms_start: usize) -> Option<(usize, bool)> {
        let mut best: Option<(usize, f64)> = None;

        for (room_id, room) in self.interior.rooms.iter().enumerate().skip(rooms_start) {
            if room.part_id != part_id || room.has_stairs {
                continue;
            }
            if !self
                .config
                .room_fits_hatch(room.cube.dx(), room.cube.dy(), self.floor_spacing)
            {
                continue;
            }
            if room.is_hallway() {
                return Some((room_id, true));
            }
            let area = room.cube.area_xy();
            if best.map_or(true, |(_, a)| area > a) {
                best = Some((room_id, area));
            }
        }
        best.map(|(room_id, _)| (room_id, false))
    }

    /// Volume kept clear for the hatch and its unfolded ladder
    pub fn get_attic_access_door_avoid(&self) -> Option<Cube> {
        let access = self.interior.attic_access.as_ref()?;
        let fs = self.floor_spacing;
        let cfg = &self.config;

        let mut avoid = access.cube;
        avoid.expand_by_xy(cfg.avoid_expand * fs);
        avoid.extend_side(access.dim, access.dir, cfg.avoid_ladder_extend * fs);
        avoid.extend_side(2, true, cfg.avoid_height * fs);
        Some(avoid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Room, RoomKind};
    use approx::assert_relative_eq;
    use rand::SeedableRng;

    fn two_room_building() -> Building {
        let part = Cube::from_ranges((0.0, 8.0), (0.0, 3.0), (0.0, 2.0));
        let mut b = Building::new(vec![part], 1.0);
        b.add_room(Room::new(
            Cube::from_ranges((0.0, 4.0), (0.0, 3.0), (0.0, 2.0)),
            0,
            RoomKind::Other,
        ));
        b.add_room(Room::new(
            Cube::from_ranges((4.0, 8.0), (0.0, 3.0), (0.0, 2.0)),
            0,
            RoomKind::Other,
        ));
        b
    }

    #[test]
    fn test_hatch_pulled_toward_part_center() {
        let mut b = two_room_building();
        let rng = StdRng::seed_from_u64(7);
        assert!(b.add_attic_access_door(0, 2, 0, &[], &rng));

        let access = b.interior.attic_access.clone().unwrap();
        assert_eq!(access.room_id, 0);
        assert_eq!(access.dim, 0);
        assert!(!access.dir);
        assert_eq!(access.orientation(), 0);
        // 30% into the room from its side nearest the part center
        assert_relative_eq!(access.cube.lo.x, 2.5, epsilon = 1e-9);
        assert_relative_eq!(access.cube.hi.x, 3.1, epsilon = 1e-9);
        assert_relative_eq!(access.cube.lo.y, 1.3, epsilon = 1e-9);
        assert_relative_eq!(access.cube.hi.y, 1.7, epsilon = 1e-9);
        assert_relative_eq!(access.cube.lo.z, 1.9, epsilon = 1e-9);
        assert_relative_eq!(access.cube.hi.z, 2.0, epsilon = 1e-9);

        // Placed once only
        assert!(!b.add_attic_access_door(0, 2, 0, &[], &rng));
    }

    #[test]
    fn test_avoid_zone_extends_toward_room() {
        let mut b = two_room_building();
        b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(1));
        let avoid = b.get_attic_access_door_avoid().unwrap();
        let hatch = b.interior.attic_access.as_ref().unwrap().cube;

        assert!(avoid.contains_cube(&hatch));
        assert_relative_eq!(avoid.lo.x, 1.75, epsilon = 1e-9);
        assert_relative_eq!(avoid.hi.x, 3.35, epsilon = 1e-9);
        assert_relative_eq!(avoid.lo.y, 1.05, epsilon = 1e-9);
        assert_relative_eq!(avoid.hi.z, 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_hallway_wins_and_skips_stairs() {
        let part = Cube::from_ranges((0.0, 8.0), (0.0, 3.0), (0.0, 2.0));
        let mut b = Building::new(vec![part], 1.0);
        b.add_room(Room::new(part, 0, RoomKind::Hallway).with_stairs());
        let hall = b.add_room(Room::new(
            Cube::from_ranges((2.0, 6.0), (1.5, 3.0), (0.0, 2.0)),
            0,
            RoomKind::Hallway,
        ));
        assert!(b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(3)));
        let access = b.interior.attic_access.as_ref().unwrap();
        assert_eq!(access.room_id, hall);
        let room = b.interior.rooms[hall].cube;
        assert!(room.contains_cube_xy(&access.cube));
    }

    #[test]
    fn test_narrow_hallway_wins_over_larger_room() {
        let part = Cube::from_ranges((0.0, 8.0), (0.0, 4.0), (0.0, 2.0));
        let mut b = Building::new(vec![part], 1.0);
        b.add_room(Room::new(
            Cube::from_ranges((0.0, 8.0), (0.0, 3.0), (0.0, 2.0)),
            0,
            RoomKind::Other,
        ));
        let hall = b.add_room(Room::new(
            Cube::from_ranges((0.0, 8.0), (3.0, 4.0), (0.0, 2.0)),
            0,
            RoomKind::Hallway,
        ));
        assert!(b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(5)));

        let access = b.interior.attic_access.as_ref().unwrap();
        assert_eq!(access.room_id, hall);
        assert_eq!(access.dim, 0);
        // Offsets scale with the hallway, not the hatch
        assert_relative_eq!((access.cube.center_dim(0) - 4.0).abs(), 0.8, epsilon = 1e-9);
        assert_relative_eq!((access.cube.center_dim(1) - 3.5).abs(), 0.2, epsilon = 1e-9);
        assert!(b.interior.rooms[hall].cube.contains_cube_xy(&access.cube));
    }

    #[test]
    fn test_hallway_offset_is_clamped_into_room() {
        let part = Cube::from_ranges((0.0, 3.0), (0.0, 3.0), (0.0, 2.0));
        let mut b = Building::new(vec![part], 1.0);
        let hall = b.add_room(Room::new(
            Cube::from_ranges((0.0, 3.0), (1.0, 1.6), (0.0, 2.0)),
            0,
            RoomKind::Hallway,
        ));
        for seed in 0..4 {
            let access = b
                .plan_attic_access(0, 2, 0, &[], &StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(access.room_id, hall);
            // A 0.12 offset overshoots the 0.06 of play across the hallway
            assert_relative_eq!((access.cube.center_dim(1) - 1.3).abs(), 0.06, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rooms_before_start_are_ignored() {
        let b = two_room_building();
        let access = b
            .plan_attic_access(0, 2, 1, &[], &StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(access.room_id, 1);
        // Room 1 sits on the high side of the part center
        assert_relative_eq!(access.cube.center_dim(0), 5.2, epsilon = 1e-9);
        assert!(access.dir);
    }

    #[test]
    fn test_small_rooms_and_avoid_cubes_fail() {
        let mut b = two_room_building();
        for room in &mut b.interior.rooms {
            room.cube.hi.y = 0.45;
        }
        assert!(b
            .plan_attic_access(0, 2, 0, &[], &StdRng::seed_from_u64(0))
            .is_none());

        let b = two_room_building();
        let blocker = Cube::from_ranges((3.5, 3.6), (1.4, 1.5), (1.0, 3.0));
        assert!(b
            .plan_attic_access(0, 2, 0, &[blocker], &StdRng::seed_from_u64(0))
            .is_none());
    }
}
