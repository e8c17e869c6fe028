use crate::repl::highlighter::ReplHelper;
use rustyline::Editor;
use rustyline::history::DefaultHistory;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info, warn};

const HISTORY_FILE_NAME: &str = "history.txt";

/// Picks a per-user location for the history file, preferring the data
/// directory and falling back to the config directory.
pub(crate) fn get_history_path() -> Option<PathBuf> {
    let crate_name = env!("CARGO_PKG_NAME");
    dirs::data_dir().or_else(dirs::config_dir).map(|mut path| {
        path.push(crate_name);
        path.push(HISTORY_FILE_NAME);
        path
    })
}

pub(crate) fn load_history_from_path(
    rl: &mut Editor<ReplHelper, DefaultHistory>,
    history_path: &PathBuf,
) {
    if let Some(parent_dir) = history_path.parent() {
        if !parent_dir.exists() {
            if let Err(e) = fs::create_dir_all(parent_dir) {
                // Loading and saving will fail below and log their own warnings.
                warn!(
                    "Failed to create history directory {}: {}",
                    parent_dir.display(),
                    e
                );
            }
        }
    }

    if !history_path.exists() {
        info!(
            "History file {} does not exist. Will create on exit.",
            history_path.display()
        );
        return;
    }

    match rl.load_history(history_path) {
        Ok(()) => info!("Loaded history from {}", history_path.display()),
        Err(err) => warn!(
            "Could not load history from {}: {}",
            history_path.display(),
            err
        ),
    }
}

pub(crate) fn save_history_to_path(
    rl: &mut Editor<ReplHelper, DefaultHistory>,
    history_path: &PathBuf,
) {
    match rl.save_history(history_path) {
        Ok(()) => info!("Saved history to {}", history_path.display()),
        Err(err) => error!(
            "Could not save history to {}: {}",
            history_path.display(),
            err
        ),
    }
}
