//! Quill - A minimal terminal text editor.
//!
//! # Usage
//!
//! ```bash
//! quill
//! quill notes.txt
//! quill --tab-width 2 --save
//! ```

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quill::app::App;
use quill::config::{
    ConfigFlags, MAX_TAB_WIDTH, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};

/// A minimal terminal text editor
#[derive(Parser, Debug)]
#[command(name = "quill", version, about, long_about = None)]
struct Cli {
    /// File to open; a missing file is created on first save
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Hide the line-number gutter
    #[arg(long)]
    no_line_numbers: bool,

    /// Spaces inserted for Tab (0 inserts a literal tab)
    #[arg(long, value_name = "N", value_parser = parse_tab_width_arg)]
    tab_width: Option<usize>,

    /// Append debug logs to a file (also QUILL_LOG_FILE)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

fn parse_tab_width_arg(s: &str) -> Result<usize, String> {
    let width: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if width > MAX_TAB_WIDTH {
        return Err(format!("tab width must be at most {MAX_TAB_WIDTH}"));
    }
    Ok(width)
}

/// Send tracing output to `path`, or nowhere.
///
/// The terminal belongs to the editor, so logs never go to stdout or stderr.
fn init_logging(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("warn"))
            .with_writer(std::io::sink)
            .init();
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quill=debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        no_line_numbers: cli.no_line_numbers,
        tab_width: cli.tab_width,
        log_file: cli.log_file.clone(),
    };

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

    let log_path = effective
        .log_file
        .clone()
        .or_else(|| std::env::var_os("QUILL_LOG_FILE").map(PathBuf::from));
    init_logging(log_path.as_deref())?;
    tracing::debug!(?effective, file = ?cli.file, "starting");

    let mut app = App::new(cli.file)
        .with_line_numbers(!effective.no_line_numbers)
        .with_tab_width(effective.effective_tab_width())
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
