//! Linear undo/redo over committed build operations.
#![forbid(unsafe_code)]

use sandcastle_geom::Transform;
use sandcastle_grid::{Cell, GridError, Voxel, VoxelGrid};
use sandcastle_shapes::{DecorationHandle, DecorationKind, ShapeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Subtract,
    Decorate,
}

/// Grid mutation made by one Add or Subtract commit.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelEdit {
    pub stamp: u64,
    pub shape: ShapeId,
    pub anchor: Cell,
    pub level: usize,
    /// Exactly the slots this edit flipped; slots that already held the target value are
    /// left out so reverting never touches someone else's voxel.
    pub voxels: Vec<Voxel>,
    pub transform: Transform,
}

impl VoxelEdit {
    pub fn new(shape: ShapeId, anchor: Cell, level: usize, transform: Transform) -> Self {
        Self {
            stamp: 0,
            shape,
            anchor,
            level,
            voxels: Vec::new(),
            transform,
        }
    }
}

/// A decoration placement. Undo/redo is carried out by the decoration owner.
#[derive(Clone, Debug, PartialEq)]
pub struct DecorationEdit {
    pub stamp: u64,
    pub kind: DecorationKind,
    pub handle: DecorationHandle,
    pub transform: Transform,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OperationRecord {
    Add(VoxelEdit),
    Subtract(VoxelEdit),
    Decorate(DecorationEdit),
}

impl OperationRecord {
    #[inline]
    pub fn kind(&self) -> OperationKind {
        match self {
            OperationRecord::Add(_) => OperationKind::Add,
            OperationRecord::Subtract(_) => OperationKind::Subtract,
            OperationRecord::Decorate(_) => OperationKind::Decorate,
        }
    }

    #[inline]
    pub fn stamp(&self) -> u64 {
        match self {
            OperationRecord::Add(e) | OperationRecord::Subtract(e) => e.stamp,
            OperationRecord::Decorate(d) => d.stamp,
        }
    }

    fn set_stamp(&mut self, stamp: u64) {
        match self {
            OperationRecord::Add(e) | OperationRecord::Subtract(e) => e.stamp = stamp,
            OperationRecord::Decorate(d) => d.stamp = stamp,
        }
    }

    pub fn voxel_edit(&self) -> Option<&VoxelEdit> {
        match self {
            OperationRecord::Add(e) | OperationRecord::Subtract(e) => Some(e),
            OperationRecord::Decorate(_) => None,
        }
    }

    /// Occupancy value a forward application writes; `None` for decorations.
    #[inline]
    fn forward_value(&self) -> Option<bool> {
        match self {
            OperationRecord::Add(_) => Some(true),
            OperationRecord::Subtract(_) => Some(false),
            OperationRecord::Decorate(_) => None,
        }
    }

    /// Re-applies the grid side of this record. Decorations are a no-op here.
    pub fn apply(&self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        self.write(grid, false)
    }

    /// Inverts the grid side of this record: an Add clears its voxels, a Subtract
    /// restores them. Decorations are a no-op here.
    pub fn revert(&self, grid: &mut VoxelGrid) -> Result<(), GridError> {
        self.write(grid, true)
    }

    fn write(&self, grid: &mut VoxelGrid, invert: bool) -> Result<(), GridError> {
        let (Some(edit), Some(value)) = (self.voxel_edit(), self.forward_value()) else {
            return Ok(());
        };
        for v in &edit.voxels {
            grid.set_occupied(v.cell, v.level, value != invert)?;
        }
        Ok(())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    pub done: usize,
    pub undone: usize,
    pub committed_total: u64,
}

/// Two stacks, no branching: committing drops everything that was undone.
#[derive(Default, Debug)]
pub struct BuildHistory {
    done: Vec<OperationRecord>,
    undone: Vec<OperationRecord>,
    counter: u64,
}

impl BuildHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            done: self.done.len(),
            undone: self.undone.len(),
            committed_total: self.counter,
        }
    }

    /// Stamps and pushes `record`. Returns the stamp and the redo entries it discarded
    /// (oldest undo first), so their owners can release them.
    pub fn commit(&mut self, mut record: OperationRecord) -> (u64, Vec<OperationRecord>) {
        self.counter = self.counter.wrapping_add(1).max(1);
        let stamp = self.counter;
        record.set_stamp(stamp);
        log::debug!(target: "history", "commit #{} {:?} (dropping {} redo)",
            stamp, record.kind(), self.undone.len());
        self.done.push(record);
        let discarded = std::mem::take(&mut self.undone);
        (stamp, discarded)
    }

    /// Moves the newest record to the redo stack and hands it back for inversion.
    pub fn undo(&mut self) -> Option<&OperationRecord> {
        let record = self.done.pop()?;
        log::debug!(target: "history", "undo #{} {:?}", record.stamp(), record.kind());
        self.undone.push(record);
        self.undone.last()
    }

    /// Moves the most recently undone record back and hands it out for re-application.
    pub fn redo(&mut self) -> Option<&OperationRecord> {
        let record = self.undone.pop()?;
        log::debug!(target: "history", "redo #{} {:?}", record.stamp(), record.kind());
        self.done.push(record);
        self.done.last()
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn peek_undo(&self) -> Option<&OperationRecord> {
        self.done.last()
    }

    pub fn peek_redo(&self) -> Option<&OperationRecord> {
        self.undone.last()
    }

    /// Committed records, oldest first.
    pub fn done(&self) -> &[OperationRecord] {
        &self.done
    }

    /// Empties both stacks. Stamps keep counting up.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}
