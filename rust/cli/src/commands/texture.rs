//! Board texture command: prints the texture tags of a board.

use std::io::Write;

use librarian_engine::texture::analyze_board;

use crate::error::CliError;

/// Handle the texture command.
///
/// `board` is a list of cards separated by spaces or commas, e.g. `"Ah Kh 2h"`.
/// Prints a JSON array of tag names.
pub fn handle_texture_command(board: &str, out: &mut dyn Write) -> Result<(), CliError> {
    let cards: Vec<&str> = board
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect();
    let tags = analyze_board(&cards)?;
    let names: Vec<String> = tags.iter().map(|t| t.name()).collect();
    writeln!(out, "{}", serde_json::to_string(&names).map_err(std::io::Error::other)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_and_spaces_both_separate_cards() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        handle_texture_command("Ah Kh 2h", &mut a).unwrap();
        handle_texture_command("Ah,Kh, 2h", &mut b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn malformed_card_is_invalid_input() {
        let mut out = Vec::new();
        let err = handle_texture_command("Ah Zz", &mut out).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
        assert!(out.is_empty());
    }
}
