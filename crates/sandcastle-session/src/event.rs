use std::fmt;

use serde::Deserialize;

use sandcastle_geom::{Transform, Vec3};
use sandcastle_grid::{GridError, Voxel};
use sandcastle_history::OperationKind;
use sandcastle_shapes::{DecorationHandle, DecorationKind, ShapeId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationMode {
    #[default]
    Add,
    Subtract,
    Decorate,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OperationMode::Add => "add",
            OperationMode::Subtract => "subtract",
            OperationMode::Decorate => "decorate",
        })
    }
}

/// Where the host's pick ray hit the build surface this tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub position: Vec3,
    pub normal: Vec3,
}

impl PointerSample {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Discrete input handed to [`crate::BuildSession::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    PointerMoved(Option<PointerSample>),
    BeginPlacement {
        anchor: PointerSample,
    },
    Drag {
        anchor: PointerSample,
        current: PointerSample,
    },
    CommitOnRelease,
    Undo,
    Redo,
    ResetZone,
    SetMode(OperationMode),
    SetShapeType(ShapeId),
    SetDecoration(DecorationKind),
    RotateCandidate {
        degrees: f32,
    },
}

/// State changes for the rendering side, drained once per tick.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionNotice {
    CandidateChanged {
        valid: bool,
        transform: Option<Transform>,
    },
    /// A commit or a redo wrote these voxels (set for Add, cleared for Subtract).
    VoxelsCommitted {
        stamp: u64,
        kind: OperationKind,
        shape: ShapeId,
        voxels: Vec<Voxel>,
        transform: Transform,
    },
    /// An undo inverted these voxels.
    VoxelsReverted {
        stamp: u64,
        kind: OperationKind,
        voxels: Vec<Voxel>,
    },
    DecorationCommitted {
        handle: DecorationHandle,
        transform: Transform,
    },
    GridCleared,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    NoCandidate,
    InvalidCandidate,
    NothingToUndo,
    NothingToRedo,
    Throttled,
    Unchanged,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IgnoreReason::NoCandidate => "no candidate",
            IgnoreReason::InvalidCandidate => "cannot build here",
            IgnoreReason::NothingToUndo => "nothing to undo",
            IgnoreReason::NothingToRedo => "nothing to redo",
            IgnoreReason::Throttled => "repeat too soon",
            IgnoreReason::Unchanged => "nothing to change",
        })
    }
}

/// Result of an input that was handled without a programming error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Grid(GridError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Grid(e) => write!(f, "grid access failed: {}", e),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Grid(e) => Some(e),
        }
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        SessionError::Grid(e)
    }
}
