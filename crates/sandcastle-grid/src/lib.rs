//! Build-zone occupancy grid: per-cell vertical columns and the structural support check.
#![forbid(unsafe_code)]

use std::fmt;

pub mod support;

pub use support::can_remove;

/// Integer (x, z) tile index. May point outside the grid; bounds are checked by the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub z: i32,
}

impl Cell {
    #[inline]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The cell twice as far from `self` as `toward`, on the same side.
    #[inline]
    pub fn mirrored_beyond(self, toward: Cell) -> Cell {
        Cell::new(
            self.x + (toward.x - self.x) * 2,
            self.z + (toward.z - self.z) * 2,
        )
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// One occupied (or to-be-occupied) slot: a cell and a vertical level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Voxel {
    pub cell: Cell,
    pub level: usize,
}

impl Voxel {
    #[inline]
    pub const fn new(cell: Cell, level: usize) -> Self {
        Self { cell, level }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridError {
    OutOfRange { cell: Cell, size: usize },
    LevelOutOfRange { level: usize, size: usize },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfRange { cell, size } => {
                write!(f, "cell {} outside {}x{} grid", cell, size, size)
            }
            GridError::LevelOutOfRange { level, size } => {
                write!(f, "level {} outside column of {} slots", level, size)
            }
        }
    }
}

impl std::error::Error for GridError {}

/// Vertical stack at one cell. `height` is one past the highest occupied level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Column {
    height: usize,
    occupancy: Vec<bool>,
}

impl Column {
    fn new(slots: usize) -> Self {
        Self {
            height: 0,
            occupancy: vec![false; slots],
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Levels past the top of the column read as empty.
    #[inline]
    pub fn is_occupied(&self, level: usize) -> bool {
        self.occupancy.get(level).copied().unwrap_or(false)
    }

    #[inline]
    pub fn levels(&self) -> &[bool] {
        &self.occupancy
    }

    // Rescan downward for the highest set slot. Starts above `touched` as well as the old
    // height so a slot set past the current top is picked up.
    fn settle_height(&mut self, touched: usize) {
        let start = self.height.max(touched + 1).min(self.occupancy.len());
        self.height = (1..=start)
            .rev()
            .find(|&h| self.occupancy[h - 1])
            .unwrap_or(0);
    }
}

/// `size x size` columns, each `size` slots tall. Owned by a single build session.
#[derive(Clone, Debug)]
pub struct VoxelGrid {
    size: usize,
    columns: Vec<Column>,
}

impl VoxelGrid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            columns: vec![Column::new(size); size * size],
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn clear(&mut self) {
        for col in &mut self.columns {
            *col = Column::new(self.size);
        }
        log::debug!(target: "grid", "cleared {}x{} grid", self.size, self.size);
    }

    #[inline]
    pub fn is_in_bounds(&self, cell: Cell) -> bool {
        let n = self.size as i32;
        cell.x >= 0 && cell.x < n && cell.z >= 0 && cell.z < n
    }

    #[inline]
    fn idx(&self, cell: Cell) -> Result<usize, GridError> {
        if !self.is_in_bounds(cell) {
            return Err(GridError::OutOfRange {
                cell,
                size: self.size,
            });
        }
        Ok(cell.x as usize * self.size + cell.z as usize)
    }

    pub fn column(&self, cell: Cell) -> Result<&Column, GridError> {
        let i = self.idx(cell)?;
        Ok(&self.columns[i])
    }

    pub fn height_at(&self, cell: Cell) -> Result<usize, GridError> {
        Ok(self.column(cell)?.height())
    }

    pub fn has_occupant_at(&self, cell: Cell) -> Result<bool, GridError> {
        Ok(self.height_at(cell)? > 0)
    }

    pub fn occupied_at(&self, cell: Cell, level: usize) -> Result<bool, GridError> {
        Ok(self.column(cell)?.is_occupied(level))
    }

    /// Sets one slot and re-derives the column height. Returns whether the slot changed.
    pub fn set_occupied(
        &mut self,
        cell: Cell,
        level: usize,
        value: bool,
    ) -> Result<bool, GridError> {
        if level >= self.size {
            return Err(GridError::LevelOutOfRange {
                level,
                size: self.size,
            });
        }
        let i = self.idx(cell)?;
        let col = &mut self.columns[i];
        let changed = col.occupancy[level] != value;
        col.occupancy[level] = value;
        col.settle_height(level);
        if changed {
            log::trace!(target: "grid", "{} level {} -> {} (height {})",
                cell, level, value, col.height);
        }
        Ok(changed)
    }

    /// All cells in the (possibly clipped) box around `center`, row-major with x outer.
    ///
    /// A zero radius yields just `center`. Without diagonals only the center and the
    /// cells at exactly `radius.0` along an axis are kept, which gives a plus-shaped ring.
    /// Nothing is bounds-filtered here; see [`VoxelGrid::bounded`].
    pub fn neighbor_cells(center: Cell, radius: (i32, i32), include_diagonals: bool) -> Vec<Cell> {
        if radius == (0, 0) {
            return vec![center];
        }
        let (rx, rz) = radius;
        let mut out = Vec::new();
        // The box is clamped to the i32 range; distances are taken in i64.
        for x in center.x.saturating_sub(rx)..=center.x.saturating_add(rx) {
            for z in center.z.saturating_sub(rz)..=center.z.saturating_add(rz) {
                let dx = i64::from(x) - i64::from(center.x);
                let dz = i64::from(z) - i64::from(center.z);
                let r = i64::from(rx);
                let on_ring = dx * dx + dz * dz == r * r && dx.abs().max(dz.abs()) == r;
                if include_diagonals || on_ring || (dx == 0 && dz == 0) {
                    out.push(Cell::new(x, z));
                }
            }
        }
        out
    }

    /// Drops out-of-bounds cells, keeping order.
    pub fn bounded(&self, mut cells: Vec<Cell>) -> Vec<Cell> {
        cells.retain(|c| self.is_in_bounds(*c));
        cells
    }

    pub fn all_in_bounds(&self, cells: &[Cell]) -> bool {
        cells.iter().all(|c| self.is_in_bounds(*c))
    }

    /// Vacuously true for an empty slice.
    pub fn all_same_height(&self, cells: &[Cell]) -> Result<bool, GridError> {
        let Some(first) = cells.first() else {
            return Ok(true);
        };
        let h = self.height_at(*first)?;
        for c in cells {
            if self.height_at(*c)? != h {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether every cell stands at least as tall as `reference`. Vacuously true when empty.
    pub fn all_height_at_least(&self, reference: Cell, cells: &[Cell]) -> Result<bool, GridError> {
        if cells.is_empty() {
            return Ok(true);
        }
        let floor = self.height_at(reference)?;
        for c in cells {
            if self.height_at(*c)? < floor {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Column heights, row-major with x outer.
    pub fn heights(&self) -> Vec<usize> {
        self.columns.iter().map(Column::height).collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.occupancy.iter().filter(|b| **b).count())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removing_below_top_keeps_height() {
        let mut g = VoxelGrid::new(10);
        let c = Cell::new(5, 5);
        g.set_occupied(c, 0, true).unwrap();
        g.set_occupied(c, 1, true).unwrap();
        g.set_occupied(c, 2, true).unwrap();
        assert_eq!(g.height_at(c).unwrap(), 3);
        g.set_occupied(c, 1, false).unwrap();
        assert_eq!(g.height_at(c).unwrap(), 3);
        g.set_occupied(c, 2, false).unwrap();
        // the hole at level 1 is skipped over
        assert_eq!(g.height_at(c).unwrap(), 1);
    }

    #[test]
    fn floating_slot_above_top_raises_height() {
        let mut g = VoxelGrid::new(10);
        let c = Cell::new(0, 9);
        g.set_occupied(c, 4, true).unwrap();
        assert_eq!(g.height_at(c).unwrap(), 5);
        assert!(g.has_occupant_at(c).unwrap());
        assert!(!g.occupied_at(c, 3).unwrap());
    }

    #[test]
    fn set_occupied_reports_changes() {
        let mut g = VoxelGrid::new(4);
        let c = Cell::new(1, 2);
        assert!(g.set_occupied(c, 0, true).unwrap());
        assert!(!g.set_occupied(c, 0, true).unwrap());
        assert!(g.set_occupied(c, 0, false).unwrap());
        assert!(!g.set_occupied(c, 0, false).unwrap());
    }

    #[test]
    fn out_of_range_access_is_an_error() {
        let mut g = VoxelGrid::new(10);
        let off = Cell::new(10, 0);
        assert_eq!(
            g.height_at(off),
            Err(GridError::OutOfRange { cell: off, size: 10 })
        );
        assert!(g.height_at(Cell::new(-1, 3)).is_err());
        assert_eq!(
            g.set_occupied(Cell::new(0, 0), 10, true),
            Err(GridError::LevelOutOfRange { level: 10, size: 10 })
        );
        // reads past the top of a column are simply empty
        assert_eq!(g.occupied_at(Cell::new(0, 0), 10), Ok(false));
    }

    #[test]
    fn clear_empties_every_column() {
        let mut g = VoxelGrid::new(3);
        for x in 0..3 {
            for z in 0..3 {
                g.set_occupied(Cell::new(x, z), (x + z) as usize % 3, true)
                    .unwrap();
            }
        }
        assert_eq!(g.occupied_count(), 9);
        g.clear();
        assert_eq!(g.occupied_count(), 0);
        assert!(g.heights().iter().all(|h| *h == 0));
    }

    #[test]
    fn cross_neighbors_form_a_plus() {
        let c = Cell::new(5, 5);
        let cells = VoxelGrid::neighbor_cells(c, (1, 1), false);
        assert_eq!(
            cells,
            vec![
                Cell::new(4, 5),
                Cell::new(5, 4),
                Cell::new(5, 5),
                Cell::new(5, 6),
                Cell::new(6, 5),
            ]
        );
        let ring = VoxelGrid::neighbor_cells(c, (2, 2), false);
        assert_eq!(
            ring,
            vec![
                Cell::new(3, 5),
                Cell::new(5, 3),
                Cell::new(5, 5),
                Cell::new(5, 7),
                Cell::new(7, 5),
            ]
        );
    }

    #[test]
    fn diagonal_neighbors_fill_the_box_unclipped() {
        let cells = VoxelGrid::neighbor_cells(Cell::new(0, 0), (1, 1), true);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], Cell::new(-1, -1));
        assert_eq!(cells[8], Cell::new(1, 1));
        let g = VoxelGrid::new(10);
        assert!(!g.all_in_bounds(&cells));
        assert_eq!(g.bounded(cells).len(), 4);
    }

    #[test]
    fn neighbors_near_the_i32_limits_are_clamped() {
        let high = VoxelGrid::neighbor_cells(Cell::new(i32::MAX, 5), (1, 1), true);
        assert_eq!(high.len(), 6);
        assert!(high.iter().all(|c| c.x >= i32::MAX - 1));
        let low = VoxelGrid::neighbor_cells(Cell::new(i32::MIN, 5), (1, 1), false);
        assert_eq!(
            low,
            vec![
                Cell::new(i32::MIN, 4),
                Cell::new(i32::MIN, 5),
                Cell::new(i32::MIN, 6),
                Cell::new(i32::MIN + 1, 5),
            ]
        );
        let g = VoxelGrid::new(10);
        assert!(g.bounded(high).is_empty());
    }

    #[test]
    fn batch_predicates() {
        let mut g = VoxelGrid::new(10);
        let a = Cell::new(1, 1);
        let b = Cell::new(1, 2);
        assert!(g.all_same_height(&[]).unwrap());
        assert!(g.all_height_at_least(a, &[]).unwrap());
        assert!(g.all_same_height(&[a, b]).unwrap());
        g.set_occupied(b, 0, true).unwrap();
        assert!(!g.all_same_height(&[a, b]).unwrap());
        assert!(g.all_height_at_least(a, &[a, b]).unwrap());
        assert!(!g.all_height_at_least(b, &[a, b]).unwrap());
    }

    #[test]
    fn mirrored_beyond_doubles_offset() {
        let c = Cell::new(5, 5);
        assert_eq!(c.mirrored_beyond(Cell::new(4, 5)), Cell::new(3, 5));
        assert_eq!(c.mirrored_beyond(Cell::new(5, 7)), Cell::new(5, 9));
    }
}
