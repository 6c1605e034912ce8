// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attic hatch door and folding ladder geometry

use crate::types::object_flags::OPEN;
use crate::types::{Building, ObjectKind, RoomObject};
use rafter_geometry::{rotation_between, Cube, FaceMask, Mesh, Point3, Vector3};

impl Building {
    /// Door panel and ladder cubes of an opened hatch, before the swing
    ///
    /// The panel hangs from the hinge on the side away from the room; the
    /// ladder sits next to it, toward the room.
    fn open_door_parts(&self, obj: &RoomObject) -> (Cube, Cube) {
        let c = obj.cube;
        let (dim, odim) = (obj.dim, 1 - obj.dim);
        let thickness = c.dz();
        let length = c.size(dim);
        let toward_room = if obj.dir { 1.0 } else { -1.0 };
        let hinge = if obj.dir { c.lo[dim] } else { c.hi[dim] };

        let mut panel = c;
        panel.set_range_sorted(dim, hinge, hinge + toward_room * thickness);
        panel.set_range(2, c.lo.z - (length - thickness), c.hi.z);

        let depth = length * self.config.ladder_depth_scale;
        let mut ladder = c;
        ladder.set_range_sorted(
            dim,
            hinge + toward_room * thickness,
            hinge + toward_room * (thickness + depth),
        );
        ladder.expand_in_dim(odim, -0.1 * c.size(odim));
        ladder.set_range(2, c.hi.z - self.floor_spacing + thickness, c.lo.z);
        (panel, ladder)
    }

    /// Bounds of the opened door and ladder, before the swing
    pub fn get_open_attic_door_bcube(&self, obj: &RoomObject) -> Cube {
        let (mut panel, ladder) = self.open_door_parts(obj);
        panel.union_with(&ladder);
        panel
    }

    /// Emit the hatch door; returns the number of boxes added
    ///
    /// A closed door is flush with the ceiling and only shows its top and
    /// bottom. An open one shows the hanging panel and the ladder, swung
    /// slightly about the hinge toward the room.
    pub fn add_attic_door_geometry(&self, obj: &RoomObject, mesh: &mut Mesh) -> usize {
        debug_assert_eq!(obj.kind, ObjectKind::AtticDoor);

        if !obj.is_open() {
            return mesh.add_cube(&obj.cube, FaceMask::dim(0) | FaceMask::dim(1)) as usize;
        }
        let (dim, odim) = (obj.dim, 1 - obj.dim);
        let (panel, ladder) = self.open_door_parts(obj);
        let start = mesh.vertex_count();
        let mut emitted = mesh.add_cube(&panel, FaceMask::NONE) as usize;

        let rail_width = 0.1 * ladder.size(odim);
        for high_side in [false, true] {
            let mut rail = ladder;
            if high_side {
                rail.lo[odim] = ladder.hi[odim] - rail_width;
            } else {
                rail.hi[odim] = ladder.lo[odim] + rail_width;
            }
            emitted += mesh.add_cube(&rail, FaceMask::Z_LO) as usize;
        }

        let steps = self.config.ladder_steps;
        let spacing = ladder.dz() / steps as f64;
        let step_half = 0.25 * panel.size(dim).min(spacing);
        for i in 0..steps {
            let zc = ladder.lo.z + (i as f64 + 0.5) * spacing;
            let mut step = ladder;
            step.expand_in_dim(odim, -rail_width);
            step.set_range(2, zc - step_half, zc + step_half);
            emitted += mesh.add_cube(&step, FaceMask::dim(odim)) as usize;
        }

        let c = obj.cube;
        let mut pivot = Point3::new(0.0, 0.0, c.hi.z);
        pivot[dim] = if obj.dir { c.lo[dim] } else { c.hi[dim] };
        pivot[odim] = c.center_dim(odim);

        let angle = self.config.door_open_angle.to_radians();
        let mut swing = Vector3::new(0.0, 0.0, -angle.cos());
        swing[dim] = if obj.dir { angle.sin() } else { -angle.sin() };
        let rotation = rotation_between(&-Vector3::z(), &swing);
        mesh.rotate_from(start, &pivot, &rotation);
        emitted
    }

    /// Open or close the hatch door; returns the new open state
    pub fn toggle_attic_door(&mut self) -> Option<bool> {
        let door = self
            .interior
            .objects
            .iter_mut()
            .find(|o| o.kind == ObjectKind::AtticDoor)?;
        door.flags ^= OPEN;
        Some(door.is_open())
    }
}
