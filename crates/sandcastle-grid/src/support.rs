//! Local "will it still stand" check used before carving a voxel out of the structure.
//!
//! This is a neighborhood heuristic, not a solver. A voxel may go if at least two
//! supported neighbors flank it, or a single neighbor plus something further out on the
//! opposite side holds the span, and anything resting on it keeps two other props. The
//! order of the checks matters: the early accept inside the first-ring walk can fire
//! before the block-above veto is evaluated.

use crate::{Cell, GridError, VoxelGrid};

/// Whether the voxel at (`cell`, `level`) can be removed without leaving geometry
/// hanging. `search_radius` is the removal tool's reach in tiles: the first ring sits at
/// `search_radius - 1`, the second at `search_radius`.
pub fn can_remove(
    grid: &VoxelGrid,
    cell: Cell,
    search_radius: i32,
    level: usize,
) -> Result<bool, GridError> {
    let column = grid.column(cell)?;
    if !column.is_occupied(level) {
        return Ok(false);
    }

    let first_ring = grid.bounded(VoxelGrid::neighbor_cells(
        cell,
        (search_radius - 1, search_radius - 1),
        false,
    ));
    let mut second_ring = grid.bounded(VoxelGrid::neighbor_cells(
        cell,
        (search_radius, search_radius),
        false,
    ));

    let is_at_top = column.height() == level + 1;
    let is_on_floor = level == 0;
    let has_block_above = level + 1 < grid.size().saturating_sub(1) && column.is_occupied(level + 1);
    let is_supported_below = is_on_floor || column.is_occupied(level - 1);

    let mut first_count = 0u32;
    let mut valid_first_count = 0u32;
    let mut above_support_count = 0u32;

    for &n in &first_ring {
        if n == cell {
            continue;
        }
        let neighbor = grid.column(n)?;

        if has_block_above && neighbor.is_occupied(level + 1) {
            above_support_count += 1;
        }

        if neighbor.is_occupied(level) {
            first_count += 1;
            if is_on_floor || neighbor.is_occupied(level - 1) {
                valid_first_count += 1;
            }

            // Found a prop on this side; only the far side still counts as a second pillar.
            let same_side = cell.mirrored_beyond(n);
            if let Some(pos) = second_ring.iter().position(|c| *c == same_side) {
                second_ring.remove(pos);
            }

            if valid_first_count >= 2 && (!has_block_above || above_support_count >= 2) {
                log::trace!(target: "grid", "remove {} level {}: flanked", cell, level);
                return Ok(true);
            }
        }
    }

    if has_block_above && above_support_count < 2 {
        return Ok(false);
    }

    let mut second_count = 0u32;
    for &n in &second_ring {
        if n != cell && grid.column(n)?.is_occupied(level) {
            second_count += 1;
        }
    }

    if first_count <= 1
        && valid_first_count >= 1
        && is_supported_below
        && (!has_block_above || second_count >= 1)
    {
        return Ok(true);
    }

    Ok((valid_first_count >= 1 && second_count >= 1)
        || (first_count == 0 && is_at_top && is_supported_below))
}
