//! Library initialisation: creates the schema and seeds game profiles.

use std::io::Write;
use std::path::Path;

use librarian_engine::library::LibraryStore;

use crate::commands::library_path;
use crate::error::CliError;
use crate::io_utils::ensure_parent_dir;
use crate::store::SqliteStore;

/// Handle the init command. Safe to run against an existing library.
pub fn handle_init_command(library: Option<String>, out: &mut dyn Write) -> Result<(), CliError> {
    let path = library_path(library)?;
    ensure_parent_dir(Path::new(&path)).map_err(CliError::Library)?;
    let store = SqliteStore::open(Path::new(&path))?;
    store.init()?;
    let profiles = store.load_spot_library()?.profiles;

    let report = serde_json::json!({
        "library": path,
        "profiles": profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
    });
    let json_str = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
