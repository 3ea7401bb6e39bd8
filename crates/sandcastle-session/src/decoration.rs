use hashbrown::HashMap;

use sandcastle_geom::Transform;
use sandcastle_shapes::{DecorationHandle, DecorationKind};

/// Owner of decoration instances. The session only ever holds handles; placement, built
/// state and the decoration undo stack live on this side.
pub trait DecorationCollaborator {
    /// Spawns a preview instance of `kind`.
    fn create(&mut self, kind: DecorationKind) -> DecorationHandle;
    fn destroy(&mut self, handle: DecorationHandle);
    /// Moves a preview to follow the pointer.
    fn place(&mut self, handle: DecorationHandle, transform: Transform);
    /// Turns the preview into a built decoration at `transform`.
    fn commit(&mut self, handle: DecorationHandle, transform: Transform);
    fn undo_last(&mut self) -> Option<DecorationHandle>;
    fn redo_last(&mut self) -> Option<DecorationHandle>;
    fn clear_all(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecorationState {
    Preview,
    Built,
    Undone,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecorationInstance {
    pub kind: DecorationKind,
    pub transform: Transform,
    pub state: DecorationState,
}

/// Headless collaborator: instances in a map, built/undone handle stacks beside it.
#[derive(Default, Debug)]
pub struct InMemoryDecorations {
    live: HashMap<DecorationHandle, DecorationInstance>,
    built: Vec<DecorationHandle>,
    undone: Vec<DecorationHandle>,
    next_id: u64,
}

impl InMemoryDecorations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: DecorationHandle) -> Option<&DecorationInstance> {
        self.live.get(&handle)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Built decorations currently standing, oldest first.
    pub fn built(&self) -> impl Iterator<Item = (DecorationHandle, &DecorationInstance)> {
        self.built
            .iter()
            .filter_map(|h| self.live.get(h).map(|d| (*h, d)))
    }

    fn set_state(&mut self, handle: DecorationHandle, state: DecorationState) {
        if let Some(d) = self.live.get_mut(&handle) {
            d.state = state;
        }
    }
}

impl DecorationCollaborator for InMemoryDecorations {
    fn create(&mut self, kind: DecorationKind) -> DecorationHandle {
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let handle = DecorationHandle(self.next_id);
        self.live.insert(
            handle,
            DecorationInstance {
                kind,
                transform: Transform::default(),
                state: DecorationState::Preview,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: DecorationHandle) {
        self.live.remove(&handle);
        self.built.retain(|h| *h != handle);
        self.undone.retain(|h| *h != handle);
    }

    fn place(&mut self, handle: DecorationHandle, transform: Transform) {
        if let Some(d) = self.live.get_mut(&handle) {
            d.transform = transform;
        }
    }

    fn commit(&mut self, handle: DecorationHandle, transform: Transform) {
        let Some(d) = self.live.get_mut(&handle) else {
            log::warn!(target: "build", "commit of unknown {}", handle);
            return;
        };
        d.transform = transform;
        d.state = DecorationState::Built;
        self.built.push(handle);
        // a new decoration ends the redo chain
        for h in std::mem::take(&mut self.undone) {
            self.live.remove(&h);
        }
    }

    fn undo_last(&mut self) -> Option<DecorationHandle> {
        let handle = self.built.pop()?;
        self.set_state(handle, DecorationState::Undone);
        self.undone.push(handle);
        Some(handle)
    }

    fn redo_last(&mut self) -> Option<DecorationHandle> {
        let handle = self.undone.pop()?;
        self.set_state(handle, DecorationState::Built);
        self.built.push(handle);
        Some(handle)
    }

    fn clear_all(&mut self) {
        self.live.clear();
        self.built.clear();
        self.undone.clear();
    }
}
