//! termview - an editable terminal view with a live undo history panel.
//!
//! # Usage
//!
//! ```bash
//! termview
//! termview --wrap notes.txt
//! TERMVIEW_LOG=debug termview --log-file termview.log
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use termview::app::App;
use termview::config::{
    ConfigFlags, clear_config_flags, global_config_path, load_config_flags, local_override_path,
    save_config_flags,
};

/// An editable terminal view with undo history
#[derive(Parser, Debug)]
#[command(name = "termview", version, about, long_about = None)]
struct Cli {
    /// Text file to load into the view
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Wrap long lines at the view width
    #[arg(long)]
    wrap: bool,

    /// Do not wrap, even if a config file enables it
    #[arg(long)]
    no_wrap: bool,

    /// Start in overwrite mode
    #[arg(long)]
    overwrite: bool,

    /// Hide the history panel
    #[arg(long)]
    no_history: bool,

    /// Keep the last line in view as text is loaded
    #[arg(long)]
    autoscroll: bool,

    /// Pending input/task items before producers block
    #[arg(long, value_name = "N")]
    queue_capacity: Option<usize>,

    /// Write logs to a file (filter with TERMVIEW_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    fn flags(&self) -> ConfigFlags {
        ConfigFlags {
            wrap: self.wrap,
            no_wrap: self.no_wrap,
            overwrite: self.overwrite,
            no_history: self.no_history,
            autoscroll: self.autoscroll,
            queue_capacity: self.queue_capacity,
            log_file: self.log_file.clone(),
        }
    }
}

/// Install the subscriber; without a log file output is discarded so the
/// alternate screen stays clean.
fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_env("TERMVIEW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false);
    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;
    tracing::debug!(?effective, "configuration");

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let app = App::new(effective.queue_capacity())
        .with_file(cli.file)
        .with_wrap(effective.wrap_enabled())
        .with_overwrite(effective.overwrite)
        .with_history_visible(!effective.no_history)
        .with_autoscroll(effective.autoscroll);

    app.run().context("Application error")
}
