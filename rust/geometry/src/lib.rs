// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Rafter Geometry
//!
//! Geometric primitives for procedural building interiors: axis-aligned
//! cubes, roof and wall tquads, triangle meshes with range transforms, and
//! JSON scene import for prop models.
//!
//! Coordinates are z-up. Axis indices follow nalgebra: 0 = X, 1 = Y, 2 = Z.

pub mod cube;
pub mod error;
pub mod mesh;
pub mod polygon;
pub mod scene;
pub mod tquad;
pub mod transform;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point2, Point3, Rotation3, Vector2, Vector3};

pub use cube::{Cube, FaceMask};
pub use error::{Error, Result};
pub use mesh::Mesh;
pub use polygon::{point_in_polygon, point_in_polygon_inclusive};
pub use scene::{LoadedModel, MaterialId, MaterialRegistry, ModelRegistry, SceneModel};
pub use tquad::{TQuad, TQuadKind};
pub use transform::{axis_rotation, rotate_about, rotation_between};
