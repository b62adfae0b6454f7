//! Pointer tracking for interactive fields.
//!
//! The host's event handler writes the pointer position into a
//! [`PointerTracker`]; each field holds a [`PointerSubscription`] and reads the
//! latest value once at the start of every step.
//!
//! Both sides run on the same single-threaded event loop, so the value is a
//! plain `Cell` with no locking. An event may land between two frames but
//! never in the middle of a step. Hosts that deliver events from another
//! thread must serialize them onto the frame thread before calling
//! [`PointerTracker::set`].
//!
//! ```ignore
//! let mut tracker = PointerTracker::new();
//! field.subscribe_pointer(&mut tracker);
//!
//! // in the event handler
//! tracker.handle_event(&event);
//! ```

use std::cell::Cell;
use std::rc::{Rc, Weak};

use glam::Vec2;
use winit::event::WindowEvent;

type Slot = Cell<Option<Vec2>>;

/// Writer side: owned by whoever receives pointer events.
#[derive(Debug, Default)]
pub struct PointerTracker {
    current: Option<Vec2>,
    subscribers: Vec<Weak<Slot>>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest pointer position, `None` when the pointer has left.
    pub fn position(&self) -> Option<Vec2> {
        self.current
    }

    /// Create a reader that starts from the current position.
    pub fn subscribe(&mut self) -> PointerSubscription {
        let slot = Rc::new(Cell::new(self.current));
        self.subscribers.push(Rc::downgrade(&slot));
        PointerSubscription { slot }
    }

    /// Number of readers still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.iter().filter(|s| s.strong_count() > 0).count()
    }

    /// Publish a new pointer position (or `None` for "no pointer").
    pub fn set(&mut self, position: Option<Vec2>) {
        self.current = position;
        self.subscribers.retain(|weak| match weak.upgrade() {
            Some(slot) => {
                slot.set(position);
                true
            }
            None => false,
        });
    }

    /// Feed a winit window event. Returns true if the pointer changed.
    pub fn handle_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.set(Some(Vec2::new(position.x as f32, position.y as f32)));
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.set(None);
                true
            }
            _ => false,
        }
    }
}

/// Reader side: held by a field until teardown.
#[derive(Debug)]
pub struct PointerSubscription {
    slot: Rc<Slot>,
}

impl PointerSubscription {
    /// Latest published pointer position.
    #[inline]
    pub fn get(&self) -> Option<Vec2> {
        self.slot.get()
    }
}
