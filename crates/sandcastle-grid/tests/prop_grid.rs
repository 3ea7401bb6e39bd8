use proptest::prelude::*;
use sandcastle_grid::{Cell, VoxelGrid};

const N: usize = 8;

fn cell() -> impl Strategy<Value = Cell> {
    (0..N as i32, 0..N as i32).prop_map(|(x, z)| Cell::new(x, z))
}

fn any_cell() -> impl Strategy<Value = Cell> {
    (-50i32..50, -50i32..50).prop_map(|(x, z)| Cell::new(x, z))
}

fn edit() -> impl Strategy<Value = (Cell, usize, bool)> {
    (cell(), 0..N, any::<bool>())
}

fn expected_height(grid: &VoxelGrid, c: Cell) -> usize {
    let col = grid.column(c).unwrap();
    col.levels()
        .iter()
        .rposition(|b| *b)
        .map(|i| i + 1)
        .unwrap_or(0)
}

proptest! {
    // height == 1 + highest occupied level after any edit sequence
    #[test]
    fn height_tracks_highest_slot(edits in prop::collection::vec(edit(), 0..64)) {
        let mut g = VoxelGrid::new(N);
        for (c, level, v) in edits {
            g.set_occupied(c, level, v).unwrap();
            prop_assert_eq!(g.height_at(c).unwrap(), expected_height(&g, c));
        }
        for x in 0..N as i32 { for z in 0..N as i32 {
            let c = Cell::new(x, z);
            prop_assert_eq!(g.height_at(c).unwrap(), expected_height(&g, c));
        }}
    }

    // set then unset on an empty slot restores the height
    #[test]
    fn set_unset_round_trip(pre in prop::collection::vec(edit(), 0..32), c in cell(), level in 0..N) {
        let mut g = VoxelGrid::new(N);
        for (pc, pl, pv) in pre {
            g.set_occupied(pc, pl, pv).unwrap();
        }
        prop_assume!(!g.occupied_at(c, level).unwrap());
        let before = g.height_at(c).unwrap();
        g.set_occupied(c, level, true).unwrap();
        g.set_occupied(c, level, false).unwrap();
        prop_assert_eq!(g.height_at(c).unwrap(), before);
    }

    #[test]
    fn zero_radius_is_just_center(c in any_cell(), diag in any::<bool>()) {
        prop_assert_eq!(VoxelGrid::neighbor_cells(c, (0, 0), diag), vec![c]);
    }

    // cross mode only keeps the center and cells at exactly radius.x (Chebyshev)
    #[test]
    fn cross_ring_distance(c in any_cell(), rx in 0i32..5, rz in 0i32..5) {
        for n in VoxelGrid::neighbor_cells(c, (rx, rz), false) {
            let d = (n.x - c.x).abs().max((n.z - c.z).abs());
            prop_assert!(d == 0 || d == rx, "cell {} at distance {}", n, d);
        }
    }

    // diagonal mode fills the whole box, row-major with x outer
    #[test]
    fn diagonal_box_is_full_and_ordered(c in any_cell(), rx in 1i32..4, rz in 1i32..4) {
        let cells = VoxelGrid::neighbor_cells(c, (rx, rz), true);
        prop_assert_eq!(cells.len() as i32, (2 * rx + 1) * (2 * rz + 1));
        let mut sorted = cells.clone();
        sorted.sort();
        prop_assert_eq!(cells, sorted);
    }

    #[test]
    fn in_bounds_matches_range(c in any_cell()) {
        let g = VoxelGrid::new(N);
        let inside = c.x >= 0 && c.x < N as i32 && c.z >= 0 && c.z < N as i32;
        prop_assert_eq!(g.is_in_bounds(c), inside);
        prop_assert_eq!(g.height_at(c).is_ok(), inside);
    }
}
