use sandcastle_geom::{GridFrame, Transform};
use sandcastle_grid::{Cell, Voxel, VoxelGrid, can_remove};
use sandcastle_history::{BuildHistory, DecorationEdit, OperationRecord, VoxelEdit};
use sandcastle_shapes::{
    DecorationHandle, DecorationKind, DecorationPlacement, ShapeId, ShapeRegistry, footprint,
};

use crate::config::SessionConfig;
use crate::decoration::DecorationCollaborator;
use crate::event::{
    IgnoreReason, OperationMode, Outcome, PointerSample, SessionError, SessionEvent,
    SessionNotice,
};
use crate::repeat::RepeatGate;

/// What a commit would do right now, recomputed from the pointer every tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    pub mode: OperationMode,
    pub anchor: Cell,
    /// Level the operation targets: the new slot for Add, the removed slot for Subtract.
    pub level: usize,
    pub cells: Vec<Cell>,
    /// Add only: the anchor slot is a gap below the column top.
    pub infill: bool,
    /// Slots a commit would flip. Empty in Decorate mode.
    pub voxels: Vec<Voxel>,
    pub valid: bool,
    pub transform: Transform,
}

impl Candidate {
    fn rejected(mode: OperationMode, anchor: Cell, cells: Vec<Cell>, transform: Transform) -> Self {
        Self {
            mode,
            anchor,
            level: 0,
            cells,
            infill: false,
            voxels: Vec::new(),
            valid: false,
            transform,
        }
    }
}

/// Owns the grid, the history and one decoration collaborator. Driven one tick at a time.
pub struct BuildSession<D: DecorationCollaborator> {
    config: SessionConfig,
    frame: GridFrame,
    registry: ShapeRegistry,
    grid: VoxelGrid,
    history: BuildHistory,
    decorations: D,
    mode: OperationMode,
    shape: ShapeId,
    decoration: DecorationKind,
    preview: Option<DecorationHandle>,
    yaw_deg: f32,
    pointer: Option<PointerSample>,
    candidate: Option<Candidate>,
    repeat: RepeatGate,
    clock: f64,
    notices: Vec<SessionNotice>,
}

impl<D: DecorationCollaborator> BuildSession<D> {
    pub fn new(config: SessionConfig, registry: ShapeRegistry, decorations: D) -> Self {
        let mut session = Self {
            frame: config.frame(),
            grid: VoxelGrid::new(config.grid_size),
            history: BuildHistory::new(),
            decorations,
            mode: config.mode,
            shape: config.shape,
            decoration: config.decoration,
            preview: None,
            yaw_deg: 0.0,
            pointer: None,
            candidate: None,
            repeat: RepeatGate::new(config.repeat_interval_secs),
            clock: 0.0,
            notices: Vec::new(),
            registry,
            config,
        };
        if session.mode == OperationMode::Decorate {
            session.spawn_preview();
        }
        log::info!(target: "build", "session ready: {}x{} grid, mode {}, shape {}",
            session.config.grid_size, session.config.grid_size, session.mode, session.shape);
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    pub fn history(&self) -> &BuildHistory {
        &self.history
    }

    pub fn decorations(&self) -> &D {
        &self.decorations
    }

    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    pub fn shape(&self) -> ShapeId {
        self.shape
    }

    pub fn decoration(&self) -> DecorationKind {
        self.decoration
    }

    pub fn preview(&self) -> Option<DecorationHandle> {
        self.preview
    }

    pub fn candidate(&self) -> Option<&Candidate> {
        self.candidate.as_ref()
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    /// Session clock in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn advance(&mut self, dt_secs: f32) {
        self.clock += f64::from(dt_secs.max(0.0));
    }

    pub fn drain_notices(&mut self) -> Vec<SessionNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Feeds this tick's pick result; `None` means the ray missed the build surface.
    pub fn update_pointer(&mut self, sample: Option<PointerSample>) -> Result<(), SessionError> {
        self.pointer = sample;
        self.refresh()
    }

    pub fn handle(&mut self, event: SessionEvent) -> Result<Outcome, SessionError> {
        match event {
            SessionEvent::PointerMoved(sample) => {
                self.update_pointer(sample)?;
                Ok(Outcome::Applied)
            }
            SessionEvent::BeginPlacement { anchor } => {
                self.update_pointer(Some(anchor))?;
                Ok(Outcome::Applied)
            }
            SessionEvent::Drag { current, .. } => {
                self.update_pointer(Some(current))?;
                Ok(Outcome::Applied)
            }
            SessionEvent::CommitOnRelease => self.commit(),
            SessionEvent::Undo => {
                if !self.repeat.try_fire(self.clock) {
                    return Ok(Outcome::Ignored(IgnoreReason::Throttled));
                }
                self.undo()
            }
            SessionEvent::Redo => {
                if !self.repeat.try_fire(self.clock) {
                    return Ok(Outcome::Ignored(IgnoreReason::Throttled));
                }
                self.redo()
            }
            SessionEvent::ResetZone => {
                self.reset()?;
                Ok(Outcome::Applied)
            }
            SessionEvent::SetMode(mode) => self.set_mode(mode),
            SessionEvent::SetShapeType(shape) => self.set_shape(shape),
            SessionEvent::SetDecoration(kind) => self.set_decoration(kind),
            SessionEvent::RotateCandidate { degrees } => self.rotate(degrees),
        }
    }

    pub fn commit(&mut self) -> Result<Outcome, SessionError> {
        let Some(cand) = self.candidate.take() else {
            return Ok(Outcome::Ignored(IgnoreReason::NoCandidate));
        };
        if !cand.valid {
            log::debug!(target: "build", "commit refused at {} level {}", cand.anchor, cand.level);
            self.candidate = Some(cand);
            return Ok(Outcome::Ignored(IgnoreReason::InvalidCandidate));
        }
        match cand.mode {
            OperationMode::Add | OperationMode::Subtract => {
                let value = cand.mode == OperationMode::Add;
                let mut edit = VoxelEdit::new(self.shape, cand.anchor, cand.level, cand.transform);
                for v in &cand.voxels {
                    if self.grid.set_occupied(v.cell, v.level, value)? {
                        edit.voxels.push(*v);
                    }
                }
                let voxels = edit.voxels.clone();
                let record = if value {
                    OperationRecord::Add(edit)
                } else {
                    OperationRecord::Subtract(edit)
                };
                let kind = record.kind();
                let (stamp, dropped) = self.history.commit(record);
                self.release(dropped);
                log::info!(target: "build", "#{} {:?} {} at {} level {} ({} voxels)",
                    stamp, kind, self.shape, cand.anchor, cand.level, voxels.len());
                self.notices.push(SessionNotice::VoxelsCommitted {
                    stamp,
                    kind,
                    shape: self.shape,
                    voxels,
                    transform: cand.transform,
                });
                if value {
                    self.yaw_deg = 0.0;
                }
            }
            OperationMode::Decorate => {
                let Some(handle) = self.preview.take() else {
                    return Ok(Outcome::Ignored(IgnoreReason::NoCandidate));
                };
                self.decorations.commit(handle, cand.transform);
                let (stamp, dropped) = self.history.commit(OperationRecord::Decorate(DecorationEdit {
                    stamp: 0,
                    kind: self.decoration,
                    handle,
                    transform: cand.transform,
                }));
                self.release(dropped);
                log::info!(target: "build", "#{} Decorate {} as {}", stamp, self.decoration, handle);
                self.notices.push(SessionNotice::DecorationCommitted {
                    handle,
                    transform: cand.transform,
                });
                self.yaw_deg = 0.0;
                self.spawn_preview();
            }
        }
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    /// Inverts the newest record. Not throttled; [`SessionEvent::Undo`] is.
    pub fn undo(&mut self) -> Result<Outcome, SessionError> {
        let Some(record) = self.history.undo() else {
            return Ok(Outcome::Ignored(IgnoreReason::NothingToUndo));
        };
        match record {
            OperationRecord::Add(edit) | OperationRecord::Subtract(edit) => {
                record.revert(&mut self.grid)?;
                log::info!(target: "build", "undo #{} {:?} at {}", edit.stamp, record.kind(), edit.anchor);
                self.notices.push(SessionNotice::VoxelsReverted {
                    stamp: edit.stamp,
                    kind: record.kind(),
                    voxels: edit.voxels.clone(),
                });
            }
            OperationRecord::Decorate(edit) => match self.decorations.undo_last() {
                Some(handle) if handle == edit.handle => {
                    log::info!(target: "build", "undo #{} Decorate {}", edit.stamp, handle);
                }
                other => {
                    log::warn!(target: "build", "undo #{} expected {}, collaborator gave {:?}",
                        edit.stamp, edit.handle, other);
                }
            },
        }
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    /// Re-applies the most recently undone record. Not throttled; [`SessionEvent::Redo`] is.
    pub fn redo(&mut self) -> Result<Outcome, SessionError> {
        let Some(record) = self.history.redo() else {
            return Ok(Outcome::Ignored(IgnoreReason::NothingToRedo));
        };
        match record {
            OperationRecord::Add(edit) | OperationRecord::Subtract(edit) => {
                record.apply(&mut self.grid)?;
                log::info!(target: "build", "redo #{} {:?} at {}", edit.stamp, record.kind(), edit.anchor);
                self.notices.push(SessionNotice::VoxelsCommitted {
                    stamp: edit.stamp,
                    kind: record.kind(),
                    shape: edit.shape,
                    voxels: edit.voxels.clone(),
                    transform: edit.transform,
                });
            }
            OperationRecord::Decorate(edit) => match self.decorations.redo_last() {
                Some(handle) if handle == edit.handle => {
                    log::info!(target: "build", "redo #{} Decorate {}", edit.stamp, handle);
                }
                other => {
                    log::warn!(target: "build", "redo #{} expected {}, collaborator gave {:?}",
                        edit.stamp, edit.handle, other);
                }
            },
        }
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    /// Wipes grid, history and decorations together.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.grid.clear();
        self.history.clear();
        self.decorations.clear_all();
        self.preview = None;
        self.repeat.reset();
        self.notices.push(SessionNotice::GridCleared);
        log::info!(target: "build", "build zone reset");
        if self.mode == OperationMode::Decorate {
            self.spawn_preview();
        }
        self.refresh()
    }

    pub fn set_mode(&mut self, mode: OperationMode) -> Result<Outcome, SessionError> {
        if mode == self.mode {
            return Ok(Outcome::Ignored(IgnoreReason::Unchanged));
        }
        if self.mode == OperationMode::Decorate {
            self.destroy_preview();
        }
        log::info!(target: "build", "mode {} -> {}", self.mode, mode);
        self.mode = mode;
        if mode == OperationMode::Decorate {
            self.spawn_preview();
        }
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    /// Picking a shape while decorating drops back to Add.
    pub fn set_shape(&mut self, shape: ShapeId) -> Result<Outcome, SessionError> {
        if shape == self.shape && self.mode != OperationMode::Decorate {
            return Ok(Outcome::Ignored(IgnoreReason::Unchanged));
        }
        self.shape = shape;
        log::info!(target: "build", "shape {}", shape);
        if self.mode == OperationMode::Decorate {
            return self.set_mode(OperationMode::Add);
        }
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    /// Switches to Decorate with a fresh preview of `kind`, replacing any current preview.
    pub fn set_decoration(&mut self, kind: DecorationKind) -> Result<Outcome, SessionError> {
        self.destroy_preview();
        self.decoration = kind;
        if self.mode != OperationMode::Decorate {
            log::info!(target: "build", "mode {} -> {}", self.mode, OperationMode::Decorate);
            self.mode = OperationMode::Decorate;
        }
        log::info!(target: "build", "decoration {}", kind);
        self.spawn_preview();
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    pub fn rotate(&mut self, degrees: f32) -> Result<Outcome, SessionError> {
        if self.mode == OperationMode::Subtract {
            return Ok(Outcome::Ignored(IgnoreReason::Unchanged));
        }
        self.yaw_deg = (self.yaw_deg + degrees).rem_euclid(360.0);
        log::debug!(target: "build", "yaw {:.1}", self.yaw_deg);
        self.refresh()?;
        Ok(Outcome::Applied)
    }

    fn spawn_preview(&mut self) {
        let handle = self.decorations.create(self.decoration);
        log::debug!(target: "build", "preview {} ({})", handle, self.decoration);
        self.preview = Some(handle);
    }

    fn destroy_preview(&mut self) {
        if let Some(handle) = self.preview.take() {
            self.decorations.destroy(handle);
        }
    }

    /// Frees collaborator state held by redo entries a commit superseded.
    fn release(&mut self, dropped: Vec<OperationRecord>) {
        for record in dropped {
            if let OperationRecord::Decorate(edit) = record {
                self.decorations.destroy(edit.handle);
            }
        }
    }

    fn refresh(&mut self) -> Result<(), SessionError> {
        let next = match self.pointer {
            Some(sample) => Some(self.evaluate(sample)?),
            None => None,
        };
        let before = self.candidate.as_ref().map(|c| (c.valid, c.transform));
        let after = next.as_ref().map(|c| (c.valid, c.transform));
        if before != after {
            let valid = after.is_some_and(|(valid, _)| valid);
            log::trace!(target: "build", "candidate valid={} at {:?}",
                valid, next.as_ref().map(|c| (c.anchor, c.level)));
            self.notices.push(SessionNotice::CandidateChanged {
                valid,
                transform: after.map(|(_, t)| t),
            });
        }
        self.candidate = next;
        Ok(())
    }

    fn evaluate(&mut self, sample: PointerSample) -> Result<Candidate, SessionError> {
        match self.mode {
            OperationMode::Add => self.evaluate_add(sample),
            OperationMode::Subtract => self.evaluate_subtract(sample),
            OperationMode::Decorate => Ok(self.evaluate_decorate(sample)),
        }
    }

    /// Probes half a tile outside the hit face: the empty slot the new shape would take.
    fn evaluate_add(&self, sample: PointerSample) -> Result<Candidate, SessionError> {
        let half = self.frame.tile_size * 0.5;
        let probe = sample.position + sample.normal.normalized() * half;
        let (ix, iy, iz) = self.frame.voxel_index(probe);
        let anchor = Cell::new(ix, iz);
        let mut transform = Transform::at(self.frame.cell_center(ix, 0, iz)).rotated(self.yaw_deg);
        if !self.grid.is_in_bounds(anchor) {
            return Ok(Candidate::rejected(OperationMode::Add, anchor, vec![anchor], transform));
        }
        let spec = self.registry.get(self.shape).rotated(transform.quarter_turns());
        let cells = footprint(&spec, anchor, 0);
        if !self.grid.all_in_bounds(&cells) {
            return Ok(Candidate::rejected(OperationMode::Add, anchor, cells, transform));
        }

        let height = self.grid.height_at(anchor)?;
        let hole = match usize::try_from(iy) {
            Ok(l) if l < height => (!self.grid.occupied_at(anchor, l)?).then_some(l),
            _ => None,
        };
        let level = hole.unwrap_or(height);
        transform.position = self.frame.cell_center(ix, level as i32, iz);
        let n = self.grid.size();
        if level >= n {
            return Ok(Candidate::rejected(OperationMode::Add, anchor, cells, transform));
        }

        // Infill fills the gap at `level`; otherwise every column no taller than the anchor
        // grows by one at its own top.
        let mut voxels = Vec::with_capacity(cells.len() + 1);
        for &c in &cells {
            let col = self.grid.column(c)?;
            if hole.is_some() {
                if !col.is_occupied(level) {
                    voxels.push(Voxel::new(c, level));
                }
            } else if col.height() <= level {
                voxels.push(Voxel::new(c, col.height()));
            }
        }
        if spec.is_wide_base() && level + 1 < n && !self.grid.occupied_at(anchor, level + 1)? {
            voxels.push(Voxel::new(anchor, level + 1));
        }

        let valid = if !self.config.enforce_rules_for_positioning {
            true
        } else if hole.is_some() {
            voxels.iter().filter(|v| v.level == level).count() == cells.len()
        } else {
            self.grid.all_height_at_least(anchor, &cells)?
        };
        Ok(Candidate {
            mode: OperationMode::Add,
            anchor,
            level,
            cells,
            infill: hole.is_some(),
            valid: valid && !voxels.is_empty(),
            voxels,
            transform,
        })
    }

    /// Probes half a tile inside the hit face: the voxel that was hit.
    fn evaluate_subtract(&self, sample: PointerSample) -> Result<Candidate, SessionError> {
        let half = self.frame.tile_size * 0.5;
        let probe = sample.position - sample.normal.normalized() * half;
        let (ix, iy, iz) = self.frame.voxel_index(probe);
        let anchor = Cell::new(ix, iz);
        let transform = Transform::at(self.frame.cell_center(ix, iy, iz));
        let cells = vec![anchor];
        let level = match usize::try_from(iy) {
            Ok(l) if l < self.grid.size() && self.grid.is_in_bounds(anchor) => l,
            _ => return Ok(Candidate::rejected(OperationMode::Subtract, anchor, cells, transform)),
        };
        if !self.grid.has_occupant_at(anchor)? {
            return Ok(Candidate::rejected(OperationMode::Subtract, anchor, cells, transform));
        }

        let valid = (!self.config.enforce_rules_for_positioning
            && self.grid.occupied_at(anchor, level)?)
            || can_remove(&self.grid, anchor, self.config.removal_radius(), level)?;
        Ok(Candidate {
            mode: OperationMode::Subtract,
            anchor,
            level,
            cells,
            infill: false,
            voxels: vec![Voxel::new(anchor, level)],
            valid,
            transform,
        })
    }

    /// Drops the preview onto the hit point. Side decorations lean onto the surface, top
    /// decorations stay upright.
    fn evaluate_decorate(&mut self, sample: PointerSample) -> Candidate {
        let (ix, iy, iz) = self.frame.voxel_index(sample.position);
        let mut transform = Transform::at(sample.position).rotated(self.yaw_deg);
        if self.decoration.placement() == DecorationPlacement::Side {
            transform = transform.with_up(sample.normal);
        }
        if let Some(handle) = self.preview {
            self.decorations.place(handle, transform);
        }
        Candidate {
            mode: OperationMode::Decorate,
            anchor: Cell::new(ix, iz),
            level: usize::try_from(iy).unwrap_or(0),
            cells: Vec::new(),
            infill: false,
            voxels: Vec::new(),
            valid: self.preview.is_some(),
            transform,
        }
    }
}
