use std::fmt::Write;

use sandcastle_grid::VoxelGrid;
use sandcastle_history::HistoryStats;

/// Top-down height map, one row per z, x left to right. `.` is bare sand, `+` is taller than 9.
pub fn height_map(grid: &VoxelGrid) -> String {
    let n = grid.size();
    let heights = grid.heights();
    let mut out = String::with_capacity((n + 1) * n);
    for z in 0..n {
        for x in 0..n {
            let h = heights[x * n + z];
            out.push(match h {
                0 => '.',
                1..=9 => char::from(b'0' + h as u8),
                _ => '+',
            });
        }
        out.push('\n');
    }
    out
}

pub fn summary(grid: &VoxelGrid, stats: HistoryStats, decorations: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "voxels: {}", grid.occupied_count());
    let _ = writeln!(out, "decorations: {}", decorations);
    let _ = writeln!(
        out,
        "history: {} done, {} undone, {} committed",
        stats.done, stats.undone, stats.committed_total
    );
    out
}
