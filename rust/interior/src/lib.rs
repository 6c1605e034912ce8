// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Rafter Interior
//!
//! Procedural attics for generated buildings. Given a building's parts,
//! rooms and roof surfaces, this crate:
//!
//! - classifies which roof surfaces enclose the attic ([`roof`])
//! - cuts an access hatch into a top-floor ceiling ([`hatch`])
//! - builds rafters, hip beams, ridge beams and collar ties ([`woodwork`])
//! - places lights, posts, a furnace, boxes and lamps ([`objects`])
//! - renders the hatch door and its folding ladder ([`door`])
//!
//! All work for one building runs as a single synchronous pass over a
//! mutable [`Building`]. Randomness comes from a caller-supplied
//! [`rand::rngs::StdRng`], which is cloned wherever a draw must not disturb
//! the caller's sequence.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rafter_interior::{Building, Room, RoomKind, shell::gable_roof};
//! use rafter_geometry::{Cube, Mesh};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let part = Cube::from_ranges((0.0, 8.0), (0.0, 3.0), (0.0, 2.0));
//! let mut building = Building::new(vec![part], 1.0);
//! building.roof_tquads = gable_roof(&part, 1.5, 0);
//! building.add_room(Room::new(part, 0, RoomKind::Other));
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! if building.add_attic_access_door(0, 2, 0, &[], &rng) {
//!     let mut mesh = Mesh::new();
//!     building.add_attic_woodwork(&mut mesh);
//!     building.add_attic_objects(&mut rng);
//! }
//! ```

pub mod config;
pub mod door;
pub mod error;
pub mod hatch;
pub mod objects;
pub mod roof;
pub mod shell;
pub mod types;
pub mod woodwork;

pub use config::AtticConfig;
pub use error::{Error, Result};
pub use objects::ExclusionSet;
pub use types::{
    object_flags, AtticAccess, Building, BuildingInterior, ObjectKind, Room, RoomKind, RoomObject,
};
