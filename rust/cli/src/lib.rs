//! # Librarian CLI Library
//!
//! Command-line front end for `librarian-engine`: a SQLite-backed rule library,
//! configuration, logging, and subcommands that run the engine over JSONL hand files.
//!
//! ## Main Entry Point
//!
//! The primary entry point is the [`run`] function, which parses command-line arguments
//! and executes the appropriate subcommand.
//!
//! ## Example Usage
//!
//! ```
//! use std::io;
//! let args = vec!["librarian", "texture", "--board", "Ah Kh 2h"];
//! let code = librarian_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `texture`: Texture tags of a board
//! - `survivors`: Positions still in after a sequence, plus a position filter
//! - `classify`: Active study tags and documents per hand
//! - `resolve`: Canonical spot per hand
//! - `init`: Create the library schema
//! - `import`: Load a library snapshot
//! - `cfg`: Display current configuration settings

use clap::Parser;
use std::io::Write;
pub mod cli;
mod commands;
mod config;
mod error;
pub mod exit_code;
pub mod io_utils;
pub mod logging;
pub mod store;
pub mod ui;

use cli::{Commands, LibrarianCli};
use commands::{
    handle_cfg_command, handle_classify_command, handle_import_command, handle_init_command,
    handle_resolve_command, handle_survivors_command, handle_texture_command,
};

pub use error::CliError;

const COMMANDS: &[&str] = &[
    "texture",
    "survivors",
    "classify",
    "resolve",
    "init",
    "import",
    "cfg",
];

/// Main entry point for the CLI application.
///
/// Parses command-line arguments and dispatches to the appropriate subcommand handler.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match LibrarianCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return usage_error(e, out, err),
    };

    let result = match cli.cmd {
        Commands::Texture { board } => handle_texture_command(&board, out),
        Commands::Survivors {
            sequence,
            positions,
            player,
        } => handle_survivors_command(&sequence, positions, player, out),
        Commands::Classify { input, library } => handle_classify_command(&input, library, out, err),
        Commands::Resolve {
            input,
            library,
            profile,
        } => handle_resolve_command(&input, library, profile, out, err),
        Commands::Init { library } => handle_init_command(library, out),
        Commands::Import { input, library } => handle_import_command(&input, library, out),
        Commands::Cfg => handle_cfg_command(out),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn usage_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    // Help and version should print to stdout and exit 0
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Usage: librarian <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            let _ = writeln!(err, "\nFor full help, run: librarian --help");
            exit_code::ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_command_parses() {
        let commands = vec![
            vec!["librarian", "texture", "--board", "Ah Kh 2h"],
            vec!["librarian", "survivors", "--sequence", "1f2r"],
            vec!["librarian", "classify", "--input", "h.jsonl"],
            vec!["librarian", "resolve", "--input", "h.jsonl", "--profile", "Spingo"],
            vec!["librarian", "init"],
            vec!["librarian", "import", "--input", "lib.json"],
            vec!["librarian", "cfg"],
        ];
        assert_eq!(commands.len(), COMMANDS.len());
        for (args, name) in commands.iter().zip(COMMANDS) {
            assert_eq!(args[1], *name);
            let result = LibrarianCli::try_parse_from(args);
            assert!(result.is_ok(), "Failed to parse: {:?}", args);
        }
    }

    #[test]
    fn positions_outside_table_sizes_are_rejected() {
        for bad in ["1", "10"] {
            let result = LibrarianCli::try_parse_from([
                "librarian",
                "survivors",
                "--sequence",
                "1f",
                "--positions",
                bad,
            ]);
            assert!(result.is_err());
        }
    }
}
