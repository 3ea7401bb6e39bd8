use proptest::prelude::*;
use sandcastle_geom::{GridFrame, Vec3};

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

fn tile() -> impl Strategy<Value = f32> {
    prop_oneof![Just(1.0f32), Just(0.5f32), Just(2.0f32)]
}

fn index() -> impl Strategy<Value = i32> {
    -64i32..64
}

proptest! {
    // The center of a slot maps back onto that slot.
    #[test]
    fn cell_center_maps_back(x in index(), level in index(), z in index(), t in tile(),
                             ox in -8.0f32..8.0, oz in -8.0f32..8.0) {
        let frame = GridFrame::new(Vec3::new(ox, 0.0, oz), t);
        // lift half a tile so the probe sits inside the slot, not on its floor
        let p = frame.cell_center(x, level, z) + Vec3::new(0.0, t * 0.5, 0.0);
        prop_assert_eq!(frame.voxel_index(p), (x, level, z));
    }

    // Anything inside [i*t, (i+1)*t) lands on index i, including negative i.
    #[test]
    fn voxel_index_floors(x in index(), fx in 0.0f32..0.999, t in tile()) {
        let frame = GridFrame::new(Vec3::ZERO, t);
        let p = Vec3::new((x as f32 + fx) * t, 0.0, 0.0);
        prop_assert_eq!(frame.voxel_index(p).0, x);
    }
}

#[test]
fn negative_world_positions_do_not_alias_cell_zero() {
    let frame = GridFrame::default();
    assert_eq!(frame.voxel_index(Vec3::new(-0.25, 0.0, 0.75)), (-1, 0, 0));
    assert_eq!(frame.voxel_index(Vec3::new(0.25, -0.1, 0.75)), (0, -1, 0));
}

#[test]
fn cell_center_is_tile_middle_at_slot_floor() {
    let frame = GridFrame::new(Vec3::new(10.0, 1.0, -4.0), 2.0);
    let c = frame.cell_center(1, 2, 3);
    assert!(approx(c.x, 13.0, 1e-6));
    assert!(approx(c.y, 5.0, 1e-6));
    assert!(approx(c.z, 3.0, 1e-6));
}

#[test]
fn vec3_ops() {
    let mut v = Vec3::new(1.0, 2.0, 3.0);
    v += Vec3::new(1.0, 1.0, 1.0);
    v -= Vec3::new(0.5, 0.5, 0.5);
    assert_eq!(v, Vec3::new(1.5, 2.5, 3.5));
    assert_eq!(-v * 2.0, Vec3::new(-3.0, -5.0, -7.0));
    assert!(approx(Vec3::new(3.0, 0.0, 4.0).length(), 5.0, 1e-6));
    assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
    assert_eq!(Vec3::from_array([0.0, 1.0, 0.0]), Vec3::UP);
}
