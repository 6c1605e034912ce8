// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building and interior data model

use crate::config::AtticConfig;
use rafter_geometry::{Cube, TQuad};

/// Room classification relevant to hatch placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomKind {
    Hallway,
    Other,
}

/// A room spanning every floor of its part
#[derive(Debug, Clone)]
pub struct Room {
    pub cube: Cube,
    pub part_id: usize,
    pub kind: RoomKind,
    /// A staircase reaches the topmost floor through this room
    pub has_stairs: bool,
}

impl Room {
    pub fn new(cube: Cube, part_id: usize, kind: RoomKind) -> Self {
        Self {
            cube,
            part_id,
            kind,
            has_stairs: false,
        }
    }

    pub fn with_stairs(mut self) -> Self {
        self.has_stairs = true;
        self
    }

    #[inline]
    pub fn is_hallway(&self) -> bool {
        self.kind == RoomKind::Hallway
    }
}

/// The hatch between the top floor and the attic
#[derive(Debug, Clone, PartialEq)]
pub struct AtticAccess {
    pub cube: Cube,
    pub part_id: usize,
    pub room_id: usize,
    /// Long axis of the hatch
    pub dim: usize,
    /// The room center lies on the high side of the hatch along `dim`
    pub dir: bool,
}

impl AtticAccess {
    /// Orientation index `2 * dim + dir`
    #[inline]
    pub fn orientation(&self) -> usize {
        2 * self.dim + self.dir as usize
    }
}

/// Kinds of object placed in the attic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    AtticDoor,
    Light,
    Chimney,
    Collider,
    Furnace,
    Box,
    Lamp,
}

/// Object flag bits
pub mod object_flags {
    pub const INTERIOR: u32 = 1 << 0;
    pub const IN_ATTIC: u32 = 1 << 1;
    pub const LIT: u32 = 1 << 2;
    pub const COLLIDABLE: u32 = 1 << 3;
    pub const INVISIBLE: u32 = 1 << 4;
    pub const OPEN: u32 = 1 << 5;
}

/// A placed interior object
#[derive(Debug, Clone, PartialEq)]
pub struct RoomObject {
    pub kind: ObjectKind,
    pub cube: Cube,
    pub dim: usize,
    pub dir: bool,
    pub room_id: usize,
    pub flags: u32,
}

impl RoomObject {
    pub fn new(kind: ObjectKind, cube: Cube, dim: usize, dir: bool, room_id: usize, flags: u32) -> Self {
        Self {
            kind,
            cube,
            dim,
            dir,
            room_id,
            flags,
        }
    }

    #[inline]
    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag != 0
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.has_flag(object_flags::OPEN)
    }
}

/// Interior state built during floorplanning and extended by the attic pass
#[derive(Debug, Clone, Default)]
pub struct BuildingInterior {
    pub rooms: Vec<Room>,
    pub attic_access: Option<AtticAccess>,
    pub objects: Vec<RoomObject>,
}

/// A building with its roof and interior
#[derive(Debug, Clone)]
pub struct Building {
    /// Convex structural parts
    pub parts: Vec<Cube>,
    /// Floor-to-floor height; every length in the config scales with it
    pub floor_spacing: f64,
    /// Roof and wall surfaces from the exterior shell
    pub roof_tquads: Vec<TQuad>,
    pub has_basement: bool,
    pub interior_chimney: Option<Cube>,
    pub interior: BuildingInterior,
    pub config: AtticConfig,
}

impl Building {
    pub fn new(parts: Vec<Cube>, floor_spacing: f64) -> Self {
        Self {
            parts,
            floor_spacing,
            roof_tquads: Vec::new(),
            has_basement: false,
            interior_chimney: None,
            interior: BuildingInterior::default(),
            config: AtticConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AtticConfig) -> Self {
        self.config = config;
        self
    }

    pub fn add_room(&mut self, room: Room) -> usize {
        self.interior.rooms.push(room);
        self.interior.rooms.len() - 1
    }

    #[inline]
    pub fn has_attic(&self) -> bool {
        self.interior.attic_access.is_some()
    }

    /// Objects of one kind, in placement order
    pub fn objects_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = &RoomObject> + '_ {
        self.interior.objects.iter().filter(move |o| o.kind == kind)
    }

    /// Beam cross-section in world units
    #[inline]
    pub(crate) fn beam_depth(&self) -> f64 {
        self.config.beam_depth * self.floor_spacing
    }
}
