//! An internal event loop for spooling display refreshes to the/a UI thread.

use std::time::Duration;

mod frame_clock;

pub use self::frame_clock::FrameClock;

/// A deferred unit of work scheduled by a control, usually a single display refresh.
pub type Task = Box<dyn FnOnce() + Send>;

/// Target frame cadence of the fallback [`FrameClock`], roughly one visual update per frame
/// on a 60 Hz display.
pub(crate) const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// This needs to be comfortably larger than the number of controls that can realistically
// request a refresh within a single frame
pub(crate) const TASK_QUEUE_CAPACITY: usize = 4096;

/// A frame-callback capability the presentation layer hands to its controls. Implementations
/// run scheduled tasks once, at the next frame boundary. Scheduling must never block; it is
/// called from inside the setters.
///
/// Hosts with a platform frame primitive implement this on top of it. Everyone else gets the
/// [`FrameClock`] fallback, and tests can substitute an [`ImmediateLoop`] to make refreshes
/// synchronous.
pub trait EventLoop: Send + Sync {
    /// Post a task to run at the next frame. Returns `false` if the task queue is full and
    /// the task was dropped.
    #[must_use]
    fn schedule(&self, task: Task) -> bool;
}

/// An event loop that runs every task inline on the calling thread. There is no frame timing
/// to wait for in tests and headless hosts, so refreshes might as well happen immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateLoop;

impl EventLoop for ImmediateLoop {
    fn schedule(&self, task: Task) -> bool {
        task();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    #[test]
    fn immediate_loops_run_inline() {
        let counter = Arc::new(AtomicUsize::new(0));
        let task_counter = counter.clone();

        let event_loop = ImmediateLoop;
        assert!(event_loop.schedule(Box::new(move || {
            task_counter.fetch_add(1, Ordering::SeqCst);
        })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
