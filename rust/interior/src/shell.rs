// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simple roof shells over a rectangular part
//!
//! Surfaces are wound so their Newell normal points out of the building.

use rafter_geometry::{Cube, Point3, TQuad, TQuadKind, Vector3};

/// Point with `a` along the ridge axis, `b` across it
fn ridge_point(ridge_dim: usize, a: f64, b: f64, z: f64) -> Point3<f64> {
    let mut p = Point3::new(0.0, 0.0, z);
    p[ridge_dim] = a;
    p[1 - ridge_dim] = b;
    p
}

fn axis(dim: usize, sign: f64) -> Vector3<f64> {
    let mut v = Vector3::<f64>::zeros();
    v[dim] = sign;
    v
}

/// Build a tquad, reversing the winding if it would face away from `facing`
fn facing_tquad(mut points: Vec<Point3<f64>>, kind: TQuadKind, facing: Vector3<f64>) -> TQuad {
    let tq = TQuad::new(&points, kind);
    if tq.normal().dot(&facing) >= 0.0 {
        return tq;
    }
    points.reverse();
    TQuad::new(&points, kind)
}

/// Two sloped rectangles meeting at a ridge along `ridge_dim`, closed by two
/// vertical gable wall triangles
pub fn gable_roof(part: &Cube, roof_height: f64, ridge_dim: usize) -> Vec<TQuad> {
    assert!(ridge_dim < 2, "ridge must run along x or y");
    let d = 1 - ridge_dim;
    let (r0, r1) = (part.lo[ridge_dim], part.hi[ridge_dim]);
    let (b0, b1) = (part.lo[d], part.hi[d]);
    let mid = part.center_dim(d);
    let z0 = part.hi.z;
    let zt = z0 + roof_height;
    let p = |a, b, z| ridge_point(ridge_dim, a, b, z);

    vec![
        facing_tquad(
            vec![p(r0, b0, z0), p(r1, b0, z0), p(r1, mid, zt), p(r0, mid, zt)],
            TQuadKind::Roof,
            axis(d, -1.0) + Vector3::z(),
        ),
        facing_tquad(
            vec![p(r0, b1, z0), p(r1, b1, z0), p(r1, mid, zt), p(r0, mid, zt)],
            TQuadKind::Roof,
            axis(d, 1.0) + Vector3::z(),
        ),
        facing_tquad(
            vec![p(r0, b0, z0), p(r0, b1, z0), p(r0, mid, zt)],
            TQuadKind::Wall,
            axis(ridge_dim, -1.0),
        ),
        facing_tquad(
            vec![p(r1, b0, z0), p(r1, b1, z0), p(r1, mid, zt)],
            TQuadKind::Wall,
            axis(ridge_dim, 1.0),
        ),
    ]
}

/// Hip roof: two trapezoids along `ridge_dim` and two end triangles, all
/// sloped at the same pitch
pub fn hip_roof(part: &Cube, roof_height: f64, ridge_dim: usize) -> Vec<TQuad> {
    assert!(ridge_dim < 2, "ridge must run along x or y");
    let d = 1 - ridge_dim;
    let (r0, r1) = (part.lo[ridge_dim], part.hi[ridge_dim]);
    let (b0, b1) = (part.lo[d], part.hi[d]);
    let mid = part.center_dim(d);
    // Equal pitch on all sides; a square part degenerates to a pyramid
    let inset = (0.5 * part.size(d)).min(0.5 * part.size(ridge_dim));
    let (i0, i1) = (r0 + inset, r1 - inset);
    let z0 = part.hi.z;
    let zt = z0 + roof_height;
    let p = |a, b, z| ridge_point(ridge_dim, a, b, z);

    let mut tquads = Vec::with_capacity(4);
    for (b, sign) in [(b0, -1.0), (b1, 1.0)] {
        let points = if i1 > i0 {
            vec![p(r0, b, z0), p(r1, b, z0), p(i1, mid, zt), p(i0, mid, zt)]
        } else {
            vec![p(r0, b, z0), p(r1, b, z0), p(i0, mid, zt)]
        };
        tquads.push(facing_tquad(points, TQuadKind::Roof, axis(d, sign) + Vector3::z()));
    }
    for (r, apex, sign) in [(r0, i0, -1.0), (r1, i1, 1.0)] {
        tquads.push(facing_tquad(
            vec![p(r, b0, z0), p(r, b1, z0), p(apex, mid, zt)],
            TQuadKind::Roof,
            axis(ridge_dim, sign) + Vector3::z(),
        ));
    }
    tquads
}
