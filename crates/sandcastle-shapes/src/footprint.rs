use sandcastle_grid::{Cell, VoxelGrid};

use crate::types::ShapeSpec;

/// Cells covered by `spec` anchored at `center`, grown by `extra_radius` on both axes.
/// Not bounds-filtered; callers decide what an off-grid cell means.
pub fn footprint(spec: &ShapeSpec, center: Cell, extra_radius: i32) -> Vec<Cell> {
    let (rx, rz) = spec.half_extents();
    VoxelGrid::neighbor_cells(
        center,
        (rx + extra_radius, rz + extra_radius),
        !spec.is_cross_shaped(),
    )
}
