use std::io::stdout;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::{DefaultTerminal, Frame};
use tracing::{debug, info, warn};

use crate::app::queue::{self, Incoming, TaskSender};
use crate::app::{App, Model, handle_event, update};
use crate::editor::buffer::Position;
use crate::ui::tree::inner_area;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization, the input thread or
    /// drawing fails.
    pub fn run(mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - termview requires an interactive terminal")?;
        let result = execute!(stdout(), EnableMouseCapture)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.run_in(&mut terminal));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();
        result
    }

    fn run_in(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let size = terminal.size()?;
        let model = self.initial_model((size.width, size.height));

        let _input = queue::spawn_input_reader(self.tx.clone())
            .context("Failed to start input thread")?;
        if let Some(path) = self.file_path.clone() {
            spawn_loader(path, self.task_sender()).context("Failed to start file loader")?;
        }

        self.event_loop(terminal, model)
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, mut model: Model) -> Result<()> {
        let mut frame_idx: u64 = 0;
        loop {
            terminal.draw(|frame| Self::view(&mut model, frame))?;
            frame_idx += 1;
            if model.should_quit {
                break;
            }

            let Ok(batch) = queue::next_batch(&self.rx) else {
                debug!("queue closed");
                break;
            };
            debug!(frame = frame_idx, items = batch.len(), "drain");
            for item in batch {
                model = Self::handle_incoming(model, item);
                if model.should_quit {
                    break;
                }
            }
        }
        info!(frames = frame_idx, "event loop finished");
        Ok(())
    }

    pub(super) fn handle_incoming(mut model: Model, item: Incoming) -> Model {
        match item {
            Incoming::Input(event) => {
                if let Some(msg) = handle_event(&event) {
                    model = update(model, msg);
                }
            }
            Incoming::Task(task) => {
                if let Err(err) = task(&mut model) {
                    warn!("task failed: {err:#}");
                    model.status = Some(format!("{err:#}"));
                }
                model.refresh_history();
            }
        }
        model
    }

    /// Draw every view in tree order and place the cursor in the focused one.
    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        let focus = model.focus.clone();
        let mut cursor = None;
        model.tree.for_each_view_mut(|view, area| {
            frame.render_widget(&mut *view, area);
            if view.name() == focus && view.editable {
                cursor = Some(view.screen_cursor(inner_area(view, area)));
            }
        });
        if let Some(pos) = cursor {
            frame.set_cursor_position(pos);
        }
    }
}

/// Read `path` off the UI thread and hand its text to the main view.
fn spawn_loader(path: PathBuf, tasks: TaskSender) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("termview-load".into())
        .spawn(move || {
            let loaded = std::fs::read(&path)
                .with_context(|| format!("Failed to read {}", path.display()));
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let submitted = tasks.submit(move |model| {
                let bytes = loaded?;
                let text = String::from_utf8_lossy(&bytes).replace("\r\n", "\n");
                if let Some(main) = model.main_view_mut() {
                    main.write_str(&text);
                    main.title = format!(" {name} ");
                    main.move_to_real(Position::default());
                }
                Ok(())
            });
            if !submitted {
                debug!("loader finished after the loop closed");
            }
        })
}
