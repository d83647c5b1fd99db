//! Bounded queue between producer threads and the UI loop.
//!
//! Terminal events and submitted tasks share one FIFO so they are handled in
//! arrival order. Senders block when the queue is full.

use std::sync::mpsc::{self, Receiver, RecvError, SyncSender};
use std::thread::{self, JoinHandle};

use crossterm::event::{self, Event};
use tracing::{debug, warn};

use crate::app::Model;

/// Work run on the UI thread with full access to the model.
pub type Task = Box<dyn FnOnce(&mut Model) -> anyhow::Result<()> + Send>;

pub enum Incoming {
    Input(Event),
    Task(Task),
}

impl std::fmt::Debug for Incoming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input(event) => f.debug_tuple("Input").field(event).finish(),
            Self::Task(_) => f.write_str("Task(..)"),
        }
    }
}

/// Cloneable handle for submitting tasks from any thread.
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: SyncSender<Incoming>,
}

impl TaskSender {
    /// Queue `task`, blocking while the queue is full.
    ///
    /// Returns `false` once the UI loop has gone away.
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut Model) -> anyhow::Result<()> + Send + 'static,
    {
        self.tx.send(Incoming::Task(Box::new(task))).is_ok()
    }
}

/// Create the queue with room for `capacity` pending items.
pub fn channel(capacity: usize) -> (SyncSender<Incoming>, Receiver<Incoming>) {
    mpsc::sync_channel(capacity.max(1))
}

pub fn task_sender(tx: &SyncSender<Incoming>) -> TaskSender {
    TaskSender { tx: tx.clone() }
}

/// Forward terminal events into the queue until either side closes.
pub fn spawn_input_reader(tx: SyncSender<Incoming>) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("termview-input".into())
        .spawn(move || {
            loop {
                match event::read() {
                    Ok(event) => {
                        if tx.send(Incoming::Input(event)).is_err() {
                            debug!("input queue closed");
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(%err, "terminal input failed");
                        break;
                    }
                }
            }
        })
}

/// Wait for the next item, then take everything else already queued.
///
/// # Errors
///
/// [`RecvError`] once every sender is gone and the queue is empty.
pub fn next_batch(rx: &Receiver<Incoming>) -> Result<Vec<Incoming>, RecvError> {
    let mut batch = vec![rx.recv()?];
    while let Ok(item) = rx.try_recv() {
        batch.push(item);
    }
    Ok(batch)
}
