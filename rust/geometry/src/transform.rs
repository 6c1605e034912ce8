// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rotation helpers shared by beam and door placement
//!
//! Geometry is generated axis-aligned in a local frame and then rotated as a
//! batch about a pivot point, so everything here works on a pivot plus a
//! `Rotation3`.

use nalgebra::{Point3, Rotation3, Unit, Vector3};

/// Rotation of `angle` radians about `axis`; identity for a degenerate axis
pub fn axis_rotation(axis: &Vector3<f64>, angle: f64) -> Rotation3<f64> {
    match Unit::try_new(*axis, 1e-15) {
        Some(a) => Rotation3::from_axis_angle(&a, angle),
        None => Rotation3::identity(),
    }
}

/// Shortest rotation taking direction `from` onto direction `to`
///
/// Opposite directions have no unique shortest rotation; a half turn about
/// any perpendicular axis is used.
pub fn rotation_between(from: &Vector3<f64>, to: &Vector3<f64>) -> Rotation3<f64> {
    if let Some(rot) = Rotation3::rotation_between(from, to) {
        return rot;
    }
    let perp = if from.x.abs() < 0.9 {
        Vector3::x().cross(from)
    } else {
        Vector3::y().cross(from)
    };
    axis_rotation(&perp, std::f64::consts::PI)
}

/// Rotate `p` about `pivot`
#[inline]
pub fn rotate_about(p: &Point3<f64>, pivot: &Point3<f64>, rotation: &Rotation3<f64>) -> Point3<f64> {
    pivot + rotation * (p - pivot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_rotate_about_pivot() {
        let rot = axis_rotation(&Vector3::z(), FRAC_PI_2);
        let p = rotate_about(
            &Point3::new(2.0, 1.0, 5.0),
            &Point3::new(1.0, 1.0, 0.0),
            &rot,
        );
        assert_relative_eq!(p.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_axis_is_identity() {
        let rot = axis_rotation(&Vector3::<f64>::zeros(), 1.0);
        assert_eq!(rot, Rotation3::identity());
    }

    #[test]
    fn test_rotation_between_opposite() {
        let rot = rotation_between(&Vector3::z(), &-Vector3::z());
        let v = rot * Vector3::z();
        assert_relative_eq!(v.z, -1.0, epsilon = 1e-12);
    }
}
