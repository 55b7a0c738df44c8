//! Listener registration with guaranteed teardown.
//!
//! The viewer listens for pointer presses and wheel on its drawing surface,
//! and for moves, releases and resizes on the enclosing window so drags keep
//! tracking when the pointer leaves the surface.

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Surface,
    Window,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Resize,
}

impl EventKind {
    /// DOM event name.
    pub fn dom_name(self) -> &'static str {
        match self {
            EventKind::PointerDown => "mousedown",
            EventKind::PointerMove => "mousemove",
            EventKind::PointerUp => "mouseup",
            EventKind::Wheel => "wheel",
            EventKind::Resize => "resize",
        }
    }

    pub fn target(self) -> ListenerTarget {
        match self {
            EventKind::PointerDown | EventKind::Wheel => ListenerTarget::Surface,
            EventKind::PointerMove | EventKind::PointerUp | EventKind::Resize => {
                ListenerTarget::Window
            }
        }
    }
}

/// Every listener the globe viewer installs, in attach order.
pub const GLOBE_EVENTS: [EventKind; 5] = [
    EventKind::PointerDown,
    EventKind::Wheel,
    EventKind::PointerMove,
    EventKind::PointerUp,
    EventKind::Resize,
];

/// Something listeners can be attached to and removed from.
pub trait EventTarget {
    type Handle;
    type Error: std::fmt::Debug;

    fn attach(&mut self, kind: EventKind) -> Result<Self::Handle, Self::Error>;
    fn detach(&mut self, kind: EventKind, handle: Self::Handle) -> Result<(), Self::Error>;
}

/// Listeners currently attached to a target. Dropping the set detaches them.
pub struct ListenerSet<T: EventTarget> {
    target: T,
    attached: Vec<(EventKind, T::Handle)>,
}

impl<T: EventTarget> ListenerSet<T> {
    pub fn new(target: T) -> Self {
        Self {
            target,
            attached: Vec::new(),
        }
    }

    /// Attach one listener per kind. On failure the listeners attached by
    /// this call are removed again before the error is returned.
    pub fn attach_all(&mut self, kinds: &[EventKind]) -> Result<(), T::Error> {
        let before = self.attached.len();
        for &kind in kinds {
            match self.target.attach(kind) {
                Ok(handle) => self.attached.push((kind, handle)),
                Err(err) => {
                    warn!(event = kind.dom_name(), ?err, "listener attach failed");
                    while self.attached.len() > before {
                        if let Some((kind, handle)) = self.attached.pop() {
                            self.detach_one(kind, handle);
                        }
                    }
                    return Err(err);
                }
            }
        }
        debug!(count = self.attached.len(), "listeners attached");
        Ok(())
    }

    /// Remove every attached listener, newest first.
    pub fn detach_all(&mut self) {
        while let Some((kind, handle)) = self.attached.pop() {
            self.detach_one(kind, handle);
        }
    }

    /// Failures are logged; the listener is forgotten either way.
    fn detach_one(&mut self, kind: EventKind, handle: T::Handle) {
        if let Err(err) = self.target.detach(kind, handle) {
            warn!(event = kind.dom_name(), ?err, "listener detach failed");
        }
    }

    pub fn len(&self) -> usize {
        self.attached.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<T: EventTarget> Drop for ListenerSet<T> {
    fn drop(&mut self) {
        self.detach_all();
    }
}
