//! Library import from a JSON snapshot file.

use std::io::Write;
use std::path::Path;

use librarian_engine::library::LibrarySnapshot;

use crate::commands::library_path;
use crate::error::CliError;
use crate::io_utils::{ensure_parent_dir, read_text_auto};
use crate::store::SqliteStore;

/// Handle the import command.
///
/// The input has the same shape as an in-memory library snapshot. Everything
/// is written in one transaction, so a bad snapshot leaves the library as it was.
pub fn handle_import_command(
    input: &str,
    library: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let path = library_path(library)?;
    let content = read_text_auto(input)
        .map_err(|e| CliError::InvalidInput(format!("Failed to read {}: {}", input, e)))?;
    let snapshot: LibrarySnapshot = serde_json::from_str(&content)
        .map_err(|e| CliError::InvalidInput(format!("Invalid library snapshot {}: {}", input, e)))?;

    ensure_parent_dir(Path::new(&path)).map_err(CliError::Library)?;
    let mut store = SqliteStore::open(Path::new(&path))?;
    let summary = store.import(&snapshot)?;
    tracing::info!(library = %path, tags = summary.tags, spots = summary.spots, "imported library");

    let json_str = serde_json::to_string_pretty(&summary).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
