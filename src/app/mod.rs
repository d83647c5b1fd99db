//! Application state and main event loop.
//!
//! This module follows The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Terminal input and submitted [`Task`]s arrive over one bounded queue
//! ([`queue`]) and are handled on the UI thread only.

mod event_loop;
mod input;
mod model;
pub mod queue;
mod update;

pub use input::handle_event;
pub use model::{HISTORY_VIEW, MAIN_VIEW, Model};
pub use queue::{Incoming, Task, TaskSender};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, SyncSender};

use crate::editor::keymap::Editor;

/// Main application struct that owns the queue and runs the event loop.
pub struct App {
    file_path: Option<PathBuf>,
    wrap: bool,
    overwrite: bool,
    history_visible: bool,
    autoscroll: bool,
    editor: Option<Box<dyn Editor>>,
    tx: SyncSender<Incoming>,
    rx: Receiver<Incoming>,
}

impl App {
    /// Create an application whose queue holds up to `queue_capacity` items.
    pub fn new(queue_capacity: usize) -> Self {
        let (tx, rx) = queue::channel(queue_capacity);
        Self {
            file_path: None,
            wrap: false,
            overwrite: false,
            history_visible: true,
            autoscroll: false,
            editor: None,
            tx,
            rx,
        }
    }

    /// Load `path` into the main view once the loop starts.
    pub fn with_file(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    pub const fn with_wrap(mut self, enabled: bool) -> Self {
        self.wrap = enabled;
        self
    }

    /// Start the main view in overwrite mode.
    pub const fn with_overwrite(mut self, enabled: bool) -> Self {
        self.overwrite = enabled;
        self
    }

    /// Show or hide the history panel initially.
    pub const fn with_history_visible(mut self, visible: bool) -> Self {
        self.history_visible = visible;
        self
    }

    pub const fn with_autoscroll(mut self, enabled: bool) -> Self {
        self.autoscroll = enabled;
        self
    }

    /// Replace the default key table.
    pub fn with_editor(mut self, editor: Box<dyn Editor>) -> Self {
        self.editor = Some(editor);
        self
    }

    /// Handle for running work on the UI thread from other threads.
    pub fn task_sender(&self) -> TaskSender {
        queue::task_sender(&self.tx)
    }

    /// Build the initial model for a terminal of `size`.
    fn initial_model(&mut self, size: (u16, u16)) -> Model {
        let mut model = Model::new(size);
        if let Some(editor) = self.editor.take() {
            model.editor = editor;
        }
        if model.history_visible != self.history_visible {
            model.history_visible = self.history_visible;
            model.layout();
        }
        if let Some(main) = model.main_view_mut() {
            main.wrap = self.wrap;
            main.overwrite = self.overwrite;
            main.autoscroll = self.autoscroll;
        }
        model.refresh_history();
        model
    }
}
