// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use rafter_geometry::{Cube, Mesh, Point3, TQuad};
use rafter_interior::shell::{gable_roof, hip_roof};
use rafter_interior::{object_flags, Building, ObjectKind, Room, RoomKind};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn part() -> Cube {
    Cube::from_ranges((0.0, 8.0), (0.0, 3.0), (0.0, 2.0))
}

/// Two-floor building with two side-by-side rooms under a roof along x
fn building(hip: bool) -> Building {
    let mut b = Building::new(vec![part()], 1.0);
    b.roof_tquads = if hip {
        hip_roof(&part(), 1.5, 0)
    } else {
        gable_roof(&part(), 1.5, 0)
    };
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

fn building_with_hallway() -> Building {
    let mut b = building(false);
    b.add_room(Room::new(
        Cube::from_ranges((0.0, 8.0), (1.0, 2.5), (0.0, 2.0)),
        0,
        RoomKind::Hallway,
    ));
    b
}

/// Height of the plane of `tq` above `(x, y)`
fn plane_z(tq: &TQuad, x: f64, y: f64) -> f64 {
    let n = tq.normal();
    let p0 = tq.points[0];
    p0.z - (n.x * (x - p0.x) + n.y * (y - p0.y)) / n.z
}

#[test]
fn test_points_below_roof_get_inward_normals() {
    for hip in [false, true] {
        let mut b = building(hip);
        assert!(b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(1)));

        let roofs: Vec<TQuad> = b.attic_surfaces(true).cloned().collect();
        assert!(!roofs.is_empty());
        for tq in &roofs {
            let c = tq.centroid();
            for corner in &tq.points {
                // Halfway to each corner stays inside this surface only
                let x = 0.5 * (c.x + corner.x);
                let y = 0.5 * (c.y + corner.y);
                let z = plane_z(tq, x, y) - 0.05;
                let normal = b
                    .point_under_attic_roof(&Point3::new(x, y, z))
                    .expect("point below roof");
                assert!(normal.z < 0.0);
                assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-9);

                let above = Point3::new(x, y, plane_z(tq, x, y) + 0.05);
                assert!(b.point_under_attic_roof(&above).is_none());
            }
        }
    }
}

#[test]
fn test_hatch_placement_is_deterministic() {
    let mut a = building_with_hallway();
    let mut b = building_with_hallway();
    assert!(a.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(99)));
    assert!(b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(99)));
    assert_eq!(a.interior.attic_access, b.interior.attic_access);
}

#[test]
fn test_hallway_jitter_leaves_generator_untouched() {
    let rng = StdRng::seed_from_u64(2024);
    let mut reference = rng.clone();

    let mut b = building_with_hallway();
    assert!(b.add_attic_access_door(0, 2, 0, &[], &rng));
    assert_eq!(b.interior.attic_access.as_ref().unwrap().room_id, 2);

    let mut after = rng.clone();
    for _ in 0..4 {
        assert_eq!(after.random::<u64>(), reference.random::<u64>());
    }
}

#[test]
fn test_hallway_jitter_moves_hatch_off_center() {
    let mut centers = Vec::new();
    for seed in 0..8 {
        let mut b = building_with_hallway();
        assert!(b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(seed)));
        let hatch = b.interior.attic_access.as_ref().unwrap().cube;
        // A tenth of the hallway along it, a fifth across
        assert_relative_eq!((hatch.center_dim(0) - 4.0).abs(), 0.8, epsilon = 1e-9);
        assert_relative_eq!((hatch.center_dim(1) - 1.75).abs(), 0.3, epsilon = 1e-9);
        assert!(Cube::from_ranges((0.0, 8.0), (1.0, 2.5), (0.0, 2.0)).contains_cube_xy(&hatch));
        centers.push((hatch.center_dim(0) > 4.0, hatch.center_dim(1) > 1.75));
    }
    centers.sort();
    centers.dedup();
    assert!(centers.len() > 1);
}

#[test]
fn test_part_size_boundary() {
    for (width, expected) in [(2.75, true), (2.74, false)] {
        let p = Cube::from_ranges((0.0, width), (0.0, 4.0), (0.0, 2.0));
        let mut b = Building::new(vec![p], 1.0);
        b.add_room(Room::new(p, 0, RoomKind::Other));
        assert_eq!(
            b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(0)),
            expected,
            "part width {}",
            width
        );
    }
}

#[test]
fn test_avoid_zone_contains_hatch() {
    for seed in 0..4 {
        let mut b = building_with_hallway();
        b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(seed));
        let hatch = b.interior.attic_access.as_ref().unwrap().cube;
        let avoid = b.get_attic_access_door_avoid().unwrap();
        assert!(avoid.contains_cube(&hatch));
        assert!(avoid.hi.z > hatch.hi.z);
    }
}

#[test]
fn test_woodwork_drops_hidden_faces() {
    for hip in [false, true] {
        let mut b = building(hip);
        b.add_attic_access_door(0, 2, 0, &[], &StdRng::seed_from_u64(3));
        let mut mesh = Mesh::new();
        let count = b.add_attic_woodwork(&mut mesh);
        assert!(count > 40, "hip = {}", hip);
        // Three or four visible faces per box, never a closed box
        assert!(mesh.vertex_count() >= 12 * count, "hip = {}", hip);
        assert!(mesh.vertex_count() <= 16 * count, "hip = {}", hip);
        assert_eq!(mesh.triangle_count() * 2, mesh.vertex_count());

        let bounds = mesh.bounds().unwrap();
        assert!(bounds.hi.z <= 3.5 + 1e-4);
    }
}

#[test]
fn test_objects_respect_exclusion_order() {
    for seed in 0..6 {
        let mut b = building(seed % 2 == 1);
        b.interior_chimney = Some(Cube::from_ranges((5.5, 6.0), (0.8, 1.2), (0.0, 4.0)));
        let mut rng = StdRng::seed_from_u64(seed);
        assert!(b.add_attic_access_door(0, 2, 0, &[], &rng));
        let added = b.add_attic_objects(&mut rng);
        assert_eq!(added, b.interior.objects.len());

        let avoid = b.get_attic_access_door_avoid().unwrap();
        let objects = &b.interior.objects;
        assert_eq!(objects[0].kind, ObjectKind::AtticDoor);

        let first_checked = objects
            .iter()
            .position(|o| o.kind != ObjectKind::AtticDoor && o.kind != ObjectKind::Light)
            .unwrap_or(objects.len());
        for (i, obj) in objects.iter().enumerate().skip(first_checked) {
            assert!(!obj.cube.intersects(&avoid), "{:?} hits the hatch zone", obj.kind);
            for earlier in objects[1..i].iter().filter(|o| o.kind != ObjectKind::Light) {
                assert!(
                    !obj.cube.intersects(&earlier.cube),
                    "{:?} overlaps earlier {:?}",
                    obj.kind,
                    earlier.kind
                );
            }
            assert!(obj.has_flag(object_flags::IN_ATTIC));
        }
    }
}

#[test]
fn test_wide_gable_gets_symmetric_lights() {
    let mut b = building(false);
    let mut rng = StdRng::seed_from_u64(8);
    b.add_attic_access_door(0, 2, 0, &[], &rng);
    b.add_attic_objects(&mut rng);

    let lights: Vec<_> = b.objects_of_kind(ObjectKind::Light).collect();
    assert_eq!(lights.len(), 2);
    let sum = lights[0].cube.center_dim(0) + lights[1].cube.center_dim(0);
    assert_relative_eq!(sum, 8.0, epsilon = 1e-9);
    assert_relative_eq!(lights[0].cube.center_dim(1), lights[1].cube.center_dim(1));
    assert!(lights.iter().all(|l| l.has_flag(object_flags::LIT)));
}

#[test]
fn test_placed_props_sit_in_attic() {
    let mut b = building(false);
    let mut rng = StdRng::seed_from_u64(21);
    b.add_attic_access_door(0, 2, 0, &[], &rng);
    b.add_attic_objects(&mut rng);

    for obj in b.interior.objects.iter().filter(|o| {
        matches!(o.kind, ObjectKind::Furnace | ObjectKind::Box | ObjectKind::Lamp)
    }) {
        assert!(b.cube_in_attic(&obj.cube), "{:?} outside attic", obj.kind);
        assert_relative_eq!(obj.cube.lo.z, 2.0);
    }
    // A gable ridge runs wall to wall and needs no posts
    assert_eq!(b.objects_of_kind(ObjectKind::Collider).count(), 0);
}

#[test]
fn test_hip_post_colliders_match_drawn_posts() {
    let mut b = building(true);
    let mut rng = StdRng::seed_from_u64(21);
    b.add_attic_access_door(0, 2, 0, &[], &rng);
    b.add_attic_objects(&mut rng);
    let mut mesh = Mesh::new();
    b.add_attic_woodwork(&mut mesh);

    let posts: Vec<_> = b.objects_of_kind(ObjectKind::Collider).collect();
    assert_eq!(posts.len(), 2);
    for post in posts {
        assert!(post.has_flag(object_flags::INVISIBLE));
        let c = post.cube;
        for corner in [
            Point3::new(c.lo.x, c.lo.y, c.lo.z),
            Point3::new(c.hi.x, c.hi.y, c.hi.z),
        ] {
            let drawn = (0..mesh.vertex_count()).any(|i| (mesh.vertex(i) - corner).norm() < 1e-4);
            assert!(drawn, "no woodwork at post corner {:?}", corner);
        }
    }
}

#[test]
fn test_same_seed_same_attic() {
    let run = |seed| {
        let mut b = building(true);
        let mut rng = StdRng::seed_from_u64(seed);
        b.add_attic_access_door(0, 2, 0, &[], &rng);
        b.add_attic_objects(&mut rng);
        b.interior.objects
    };
    assert_eq!(run(17), run(17));
}

#[test]
fn test_door_geometry_follows_state() {
    let mut b = building(false);
    let mut rng = StdRng::seed_from_u64(4);
    b.add_attic_access_door(0, 2, 0, &[], &rng);
    b.add_attic_objects(&mut rng);

    let mut closed = Mesh::new();
    let door = b.objects_of_kind(ObjectKind::AtticDoor).next().unwrap().clone();
    b.add_attic_door_geometry(&door, &mut closed);
    assert_eq!(closed.vertex_count(), 8);

    assert_eq!(b.toggle_attic_door(), Some(true));
    let door = b.objects_of_kind(ObjectKind::AtticDoor).next().unwrap().clone();
    let mut open = Mesh::new();
    b.add_attic_door_geometry(&door, &mut open);
    assert_eq!(open.vertex_count(), 224);

    // The ladder reaches down toward the floor below
    let bcube = b.get_open_attic_door_bcube(&door);
    assert!(bcube.lo.z < door.cube.lo.z - 0.5);
    assert_eq!(b.toggle_attic_door(), Some(false));
}
