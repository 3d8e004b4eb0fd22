//! Error types for the CLI application.
//!
//! Engine errors are folded into [`CliError`] so every command handler can use
//! `?` and `run()` only has to map one type to an exit code.

use std::fmt;

use librarian_engine::errors::{CardError, LibraryError, SequenceError, SpotError};

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (file operations, stdout/stderr writes, etc.)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// The rule library could not be opened, read or written
    Library(String),

    /// The rule library maps one hand to several spots
    Ambiguous(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Library(msg) => write!(f, "Library error: {}", msg),
            CliError::Ambiguous(msg) => write!(f, "Ambiguous spot: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<LibraryError> for CliError {
    fn from(error: LibraryError) -> Self {
        CliError::Library(error.message)
    }
}

impl From<SpotError> for CliError {
    fn from(error: SpotError) -> Self {
        match error {
            SpotError::Library(e) => e.into(),
            SpotError::Ambiguous { spot_names } => CliError::Ambiguous(spot_names.join(", ")),
            e @ SpotError::UnknownProfile { .. } => CliError::InvalidInput(e.to_string()),
        }
    }
}

impl From<CardError> for CliError {
    fn from(error: CardError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

impl From<SequenceError> for CliError {
    fn from(error: SequenceError) -> Self {
        CliError::InvalidInput(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_error_keeps_store_message() {
        let e: CliError = LibraryError::new("no such table: study_tags").into();
        assert_eq!(e.to_string(), "Library error: no such table: study_tags");
    }

    #[test]
    fn ambiguous_spot_lists_names() {
        let e: CliError = SpotError::Ambiguous {
            spot_names: vec!["a".into(), "b".into()],
        }
        .into();
        assert_eq!(e.to_string(), "Ambiguous spot: a, b");
    }
}
