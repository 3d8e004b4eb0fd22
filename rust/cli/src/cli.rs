//! Command-line argument definitions.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "librarian",
    version,
    about = "Classify poker hands against a study library of tags and spots"
)]
pub struct LibrarianCli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the texture tags of a board
    Texture {
        /// Cards separated by spaces or commas, e.g. "Ah Kh 2h"
        #[arg(long)]
        board: String,
    },
    /// Positions that have not folded after an action sequence
    Survivors {
        /// Encoded sequence, e.g. 1f2f3f4r5r6r5c
        #[arg(long)]
        sequence: String,
        /// Seats at the table (defaults to the configured position count)
        #[arg(long, value_parser = clap::value_parser!(u8).range(2..=9))]
        positions: Option<u8>,
        /// Player name for the position filter (defaults to the configured hero)
        #[arg(long)]
        player: Option<String>,
    },
    /// Active study tags and documents for each hand in a JSONL file
    Classify {
        #[arg(long)]
        input: String,
        #[arg(long)]
        library: Option<String>,
    },
    /// Canonical spot for each hand in a JSONL file
    Resolve {
        #[arg(long)]
        input: String,
        #[arg(long)]
        library: Option<String>,
        /// Only consider spots assigned to this game profile
        #[arg(long)]
        profile: Option<String>,
    },
    /// Create the library schema and seed game profiles
    Init {
        #[arg(long)]
        library: Option<String>,
    },
    /// Load a JSON library snapshot into the library
    Import {
        #[arg(long)]
        input: String,
        #[arg(long)]
        library: Option<String>,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}
