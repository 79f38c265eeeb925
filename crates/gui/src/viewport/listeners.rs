//! Input events and the record of listeners the viewport has attached

use egui::{Key, PointerButton, Pos2, Rect};

/// Input delivered to the viewport by its host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Canvas client rectangle changed
    Resize { rect: Rect },
    PointerDown { pos: Pos2, button: PointerButton },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2, button: PointerButton },
    KeyDown { key: Key },
}

impl InputEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            InputEvent::Resize { .. } => ListenerKind::Resize,
            InputEvent::PointerDown { .. } => ListenerKind::PointerDown,
            InputEvent::PointerMove { .. } => ListenerKind::PointerMove,
            InputEvent::PointerUp { .. } => ListenerKind::PointerUp,
            InputEvent::KeyDown { .. } => ListenerKind::KeyDown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerScope {
    /// Shared host window
    Window,
    /// The viewport's own canvas
    Canvas,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub id: ListenerId,
    pub kind: ListenerKind,
    pub scope: ListenerScope,
}

/// Listeners attached by one viewport. Teardown removes exactly these.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: u32,
    registrations: Vec<Registration>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: ListenerKind, scope: ListenerScope) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.registrations.push(Registration { id, kind, scope });
        id
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.registrations.iter().any(|r| r.kind == kind)
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.registrations.len();
        self.registrations.retain(|r| r.id != id);
        before != self.registrations.len()
    }

    /// Remove every recorded listener, returning how many were removed
    pub fn remove_all(&mut self) -> usize {
        let count = self.registrations.len();
        self.registrations.clear();
        count
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}
