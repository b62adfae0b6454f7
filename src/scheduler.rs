//! Per-frame scheduling.
//!
//! A [`FrameScheduler`] is the host's "run again before the next repaint"
//! primitive. A field requests one frame at a time and remembers the handle;
//! when the host fires that handle the field steps, renders, and requests the
//! next one. Cancelling the remembered handle ends the loop.

use std::collections::VecDeque;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// Host-side frame scheduling.
pub trait FrameScheduler {
    /// Ask for a callback before the next repaint.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// A scheduler driven by hand: requests queue up until [`tick`](Self::tick)
/// drains them.
///
/// Used for headless rendering and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    pending: VecDeque<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles due on the next repaint, in request order. Each handle fires
    /// once; requests made while handling them wait for the following tick.
    pub fn tick(&mut self) -> Vec<FrameHandle> {
        self.pending.drain(..).collect()
    }

    /// Number of outstanding requests.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        assert_eq!(scheduler.pending(), 2);
    }

    #[test]
    fn test_tick_drains() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        assert_eq!(scheduler.tick(), vec![a]);
        assert!(scheduler.tick().is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        scheduler.cancel_frame(a);
        scheduler.cancel_frame(a);
        assert_eq!(scheduler.tick(), vec![b]);
    }
}
