//! The fallback frame scheduler, used when the host has no frame callback primitive of its
//! own: a worker thread that drains scheduled refreshes at a fixed ~16 ms cadence.

use crossbeam::channel;
use std::thread::{self, JoinHandle};

use super::{EventLoop, Task, FRAME_INTERVAL, TASK_QUEUE_CAPACITY};

/// See the module's documentation. Tasks scheduled while a frame is being waited out all run
/// in that frame's batch, so a burst of refreshes causes a single wakeup.
pub struct FrameClock {
    /// The worker thread. This is wrapped in an `Option` so the thread can be taken out of it
    /// and joined when this struct gets dropped.
    worker_thread: Option<JoinHandle<()>>,
    /// A channel for waking up the worker thread and having it perform one of the tasks from
    /// [`Message`].
    tasks_sender: channel::Sender<Message>,
}

/// A message for communicating with the worker thread.
enum Message {
    /// A new task for the frame clock to execute.
    Task(Task),
    /// Shut down the worker thread.
    Shutdown,
}

impl FrameClock {
    pub fn new_and_spawn() -> Self {
        let (tasks_sender, tasks_receiver) = channel::bounded(TASK_QUEUE_CAPACITY);

        Self {
            // With our drop implementation we guarantee that this thread never outlives this
            // struct
            worker_thread: Some(
                thread::Builder::new()
                    .name(String::from("frame-clock"))
                    .spawn(move || worker_thread(tasks_receiver))
                    .expect("Could not spawn frame clock thread"),
            ),
            tasks_sender,
        }
    }
}

impl EventLoop for FrameClock {
    fn schedule(&self, task: Task) -> bool {
        self.tasks_sender.try_send(Message::Task(task)).is_ok()
    }
}

impl Drop for FrameClock {
    fn drop(&mut self) {
        self.tasks_sender
            .send(Message::Shutdown)
            .expect("Failed while sending frame clock shutdown request");
        if let Some(join_handle) = self.worker_thread.take() {
            join_handle.join().expect("Frame clock thread panicked");
        }
    }
}

/// Waits for work, sleeps out the remainder of the frame, then runs everything that
/// accumulated in the meantime as one batch.
fn worker_thread(tasks_receiver: channel::Receiver<Message>) {
    loop {
        let first = match tasks_receiver.recv() {
            Ok(Message::Task(task)) => task,
            Ok(Message::Shutdown) => return,
            Err(_) => {
                ctl_trace!("Frame clock got disconnected unexpectedly, shutting down");
                return;
            }
        };

        thread::sleep(FRAME_INTERVAL);

        first();
        loop {
            match tasks_receiver.try_recv() {
                Ok(Message::Task(task)) => task(),
                Ok(Message::Shutdown) => return,
                Err(_) => break,
            }
        }
    }
}
