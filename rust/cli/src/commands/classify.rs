//! Tag classification over a JSONL hand file.
//!
//! Loads the tag library once and writes one JSON line per hand:
//! `{"hand": ..., "tags": [..], "tag_names": [..], "documents": [..]}`.

use std::io::Write;

use librarian_engine::classify::TagClassifier;

use crate::commands::{library_path, load_hands, open_library, write_json_line};
use crate::error::CliError;

pub fn handle_classify_command(
    input: &str,
    library: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let path = library_path(library)?;
    let hands = load_hands(input, err)?;
    let store = open_library(&path)?;
    let classifier = TagClassifier::new(&store);

    let results = classifier.classify_all(hands.iter().map(|h| &h.hand))?;
    for (loaded, classification) in hands.iter().zip(results) {
        write_json_line(
            out,
            &serde_json::json!({
                "hand": loaded.label(),
                "tags": classification.tags,
                "tag_names": classification.tag_names,
                "documents": classification.documents,
            }),
        )?;
    }
    tracing::debug!(hands = hands.len(), library = %path, "classified hand file");
    Ok(())
}
