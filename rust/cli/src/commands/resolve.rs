//! Spot resolution over a JSONL hand file.
//!
//! Writes one JSON line per hand: `{"hand": ..., "spot": {..} | null}`. A hand
//! that matches several spots is reported on stderr and the command fails once
//! every hand has been processed.

use std::io::Write;

use librarian_engine::errors::SpotError;
use librarian_engine::library::CachedStore;
use librarian_engine::spot::SpotResolver;

use crate::commands::{library_path, load_hands, open_library, write_json_line};
use crate::error::CliError;
use crate::ui;

pub fn handle_resolve_command(
    input: &str,
    library: Option<String>,
    profile: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = library_path(library)?;
    let hands = load_hands(input, err)?;
    let resolver = SpotResolver::new(CachedStore::new(open_library(&path)?));

    let mut ambiguous = 0usize;
    for loaded in &hands {
        let label = loaded.label();
        match resolver.resolve_with_documents(&loaded.hand, profile.as_deref()) {
            Ok(found) => {
                write_json_line(out, &serde_json::json!({ "hand": label, "spot": found }))?;
            }
            Err(e @ SpotError::Ambiguous { .. }) => {
                ambiguous += 1;
                ui::write_error(err, &format!("{}: {}", label, e))?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if ambiguous > 0 {
        return Err(CliError::Ambiguous(format!(
            "{} hand(s) matched more than one spot",
            ambiguous
        )));
    }
    Ok(())
}
