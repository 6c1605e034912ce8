// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! Generators append geometry in an untransformed local frame, remember the
//! vertex count before they started, and then transform exactly that range.

use crate::cube::{Cube, FaceMask};
use crate::transform::rotate_about;
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};

/// Triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a flat quad from four counter-clockwise corners
    pub fn add_quad(&mut self, corners: [Point3<f64>; 4], normal: Vector3<f64>) {
        let base = self.vertex_count() as u32;
        for c in corners {
            self.add_vertex(c, normal);
        }
        self.add_triangle(base, base + 1, base + 2);
        self.add_triangle(base, base + 2, base + 3);
    }

    /// Add the faces of `cube` not listed in `skip`
    ///
    /// Cubes that are not strictly normalized are dropped; returns whether
    /// anything was added.
    pub fn add_cube(&mut self, cube: &Cube, skip: FaceMask) -> bool {
        if !cube.is_strictly_normalized() {
            return false;
        }
        let mut added = false;

        for dim in 0..3 {
            let d1 = (dim + 1) % 3;
            let d2 = (dim + 2) % 3;

            for dir in [false, true] {
                if skip.contains(FaceMask::face(dim, dir)) {
                    continue;
                }
                let mut normal = Vector3::<f64>::zeros();
                normal[dim] = if dir { 1.0 } else { -1.0 };

                let plane = if dir { cube.hi[dim] } else { cube.lo[dim] };
                let corner = |a: f64, b: f64| {
                    let mut p = Point3::origin();
                    p[dim] = plane;
                    p[d1] = a;
                    p[d2] = b;
                    p
                };
                let (a0, a1) = (cube.lo[d1], cube.hi[d1]);
                let (b0, b1) = (cube.lo[d2], cube.hi[d2]);

                // d1 x d2 == +dim, so reverse the winding on the low side
                let corners = if dir {
                    [corner(a0, b0), corner(a1, b0), corner(a1, b1), corner(a0, b1)]
                } else {
                    [corner(a0, b0), corner(a0, b1), corner(a1, b1), corner(a1, b0)]
                };
                self.add_quad(corners, normal);
                added = true;
            }
        }
        added
    }

    /// Rotate every vertex from `start` onward about `pivot`
    pub fn rotate_from(&mut self, start: usize, pivot: &Point3<f64>, rotation: &Rotation3<f64>) {
        let from = (start * 3).min(self.positions.len());

        for chunk in self.positions[from..].chunks_exact_mut(3) {
            let p = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let r = rotate_about(&p, pivot, rotation);
            chunk[0] = r.x as f32;
            chunk[1] = r.y as f32;
            chunk[2] = r.z as f32;
        }
        for chunk in self.normals[from..].chunks_exact_mut(3) {
            let n = rotation * Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            chunk[0] = n.x as f32;
            chunk[1] = n.y as f32;
            chunk[2] = n.z as f32;
        }
    }

    /// Translate every vertex from `start` onward
    pub fn translate_from(&mut self, start: usize, offset: &Vector3<f64>) {
        let from = (start * 3).min(self.positions.len());

        for chunk in self.positions[from..].chunks_exact_mut(3) {
            chunk[0] = (chunk[0] as f64 + offset.x) as f32;
            chunk[1] = (chunk[1] as f64 + offset.y) as f32;
            chunk[2] = (chunk[2] as f64 + offset.z) as f32;
        }
    }

    /// Apply an affine transform to every vertex from `start` onward
    ///
    /// Normals use the inverse transpose of the upper 3x3 block.
    pub fn transform_from(&mut self, start: usize, matrix: &Matrix4<f64>) {
        let from = (start * 3).min(self.positions.len());
        let linear = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or(linear);

        for chunk in self.positions[from..].chunks_exact_mut(3) {
            let p = matrix.transform_point(&Point3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            ));
            chunk[0] = p.x as f32;
            chunk[1] = p.y as f32;
            chunk[2] = p.z as f32;
        }
        for chunk in self.normals[from..].chunks_exact_mut(3) {
            let n = normal_matrix * Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let n = n.try_normalize(1e-15).unwrap_or(n);
            chunk[0] = n.x as f32;
            chunk[1] = n.y as f32;
            chunk[2] = n.z as f32;
        }
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of vertex `i`
    #[inline]
    pub fn vertex(&self, i: usize) -> Point3<f64> {
        let c = &self.positions[i * 3..i * 3 + 3];
        Point3::new(c[0] as f64, c[1] as f64, c[2] as f64)
    }

    /// Bounds of the vertices from `start` onward, `None` if there are none
    pub fn bounds_from(&self, start: usize) -> Option<Cube> {
        let from = (start * 3).min(self.positions.len());
        let mut chunks = self.positions[from..].chunks_exact(3);
        let first = chunks.next()?;
        let mut cube = Cube::new(
            Point3::new(first[0] as f64, first[1] as f64, first[2] as f64),
            Point3::new(first[0] as f64, first[1] as f64, first[2] as f64),
        );
        for chunk in chunks {
            cube.union_with_point(&Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64));
        }
        Some(cube)
    }

    /// Bounds of the whole mesh, `None` when empty
    #[inline]
    pub fn bounds(&self) -> Option<Cube> {
        self.bounds_from(0)
    }

    /// Clear the mesh
    #[inline]
    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.indices.clear();
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
