//! Command handler modules for the librarian CLI.
//!
//! Each command is implemented in its own module file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - All errors propagated via `CliError`

mod cfg;
mod classify;
mod import;
mod init;
mod resolve;
mod survivors;
mod texture;

pub use cfg::handle_cfg_command;
pub use classify::handle_classify_command;
pub use import::handle_import_command;
pub use init::handle_init_command;
pub use resolve::handle_resolve_command;
pub use survivors::handle_survivors_command;
pub use texture::handle_texture_command;

use std::io::Write;
use std::path::Path;

use librarian_engine::hand::HandContext;

use crate::config;
use crate::error::CliError;
use crate::io_utils::{jsonl_lines, read_text_auto};
use crate::store::SqliteStore;
use crate::ui;

/// One hand from a JSONL file, with the line it came from.
pub(crate) struct LoadedHand {
    pub line: usize,
    pub hand: HandContext,
}

impl LoadedHand {
    /// The hand's own id, or its line number when it has none.
    pub fn label(&self) -> String {
        self.hand
            .hand_id
            .clone()
            .unwrap_or_else(|| format!("line {}", self.line))
    }
}

/// Reads hands from plain or `.zst` JSONL, skipping lines that do not parse.
///
/// Fails only when the file cannot be read or when it has records and none of
/// them are hands.
pub(crate) fn load_hands(input: &str, err: &mut dyn Write) -> Result<Vec<LoadedHand>, CliError> {
    let content = read_text_auto(input)
        .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;

    let mut hands = Vec::new();
    let mut corrupted = 0usize;
    for (line, raw) in jsonl_lines(&content) {
        match serde_json::from_str::<HandContext>(raw) {
            Ok(hand) => hands.push(LoadedHand { line, hand }),
            Err(e) => {
                corrupted += 1;
                ui::display_warning(err, &format!("Skipping line {}: {}", line, e))?;
            }
        }
    }

    if corrupted > 0 && hands.is_empty() {
        return Err(CliError::InvalidInput("Invalid record".to_string()));
    }
    Ok(hands)
}

/// `--library` if given, otherwise the configured library path.
pub(crate) fn library_path(flag: Option<String>) -> Result<String, CliError> {
    match flag {
        Some(path) => Ok(path),
        None => Ok(load_config()?.library_path),
    }
}

pub(crate) fn load_config() -> Result<config::Config, CliError> {
    config::load().map_err(|e| CliError::Config(format!("Invalid configuration: {}", e)))
}

pub(crate) fn open_library(path: &str) -> Result<SqliteStore, CliError> {
    Ok(SqliteStore::open_existing(Path::new(path))?)
}

pub(crate) fn write_json_line(out: &mut dyn Write, value: &serde_json::Value) -> Result<(), CliError> {
    let line = serde_json::to_string(value).map_err(std::io::Error::other)?;
    writeln!(out, "{}", line)?;
    Ok(())
}
