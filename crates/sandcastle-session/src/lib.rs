//! Build session: pointer candidates, commits, undo/redo and decorations over one grid.
#![forbid(unsafe_code)]

pub mod config;
pub mod decoration;
pub mod event;
pub mod repeat;
pub mod session;

pub use config::SessionConfig;
pub use decoration::{DecorationCollaborator, InMemoryDecorations};
pub use event::{
    IgnoreReason, OperationMode, Outcome, PointerSample, SessionError, SessionEvent, SessionNotice,
};
pub use repeat::RepeatGate;
pub use session::{BuildSession, Candidate};
