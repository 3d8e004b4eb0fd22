//! Surviving-positions command.
//!
//! Prints which positions are still in after a sequence and, when a player is
//! known, the position filter a hand search could use.

use std::io::Write;

use librarian_engine::query::{build_position_filter, flop_survivor_positions_for};

use crate::commands::load_config;
use crate::error::CliError;

/// Handle the survivors command.
///
/// `positions` and `player` fall back to the configured `position_count` and
/// `hero_name`.
pub fn handle_survivors_command(
    sequence: &str,
    positions: Option<u8>,
    player: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let (position_count, player) = match (positions, player) {
        (Some(n), Some(p)) => (n, Some(p)),
        (positions, player) => {
            let cfg = load_config()?;
            (
                positions.unwrap_or(cfg.position_count),
                player.or(cfg.hero_name),
            )
        }
    };

    let alive = flop_survivor_positions_for(sequence, position_count)?;
    let filter = player
        .as_deref()
        .map(|p| build_position_filter(&alive, p).to_sql());

    let report = serde_json::json!({
        "sequence": sequence,
        "position_count": position_count,
        "positions": alive,
        "player": player,
        "filter": filter,
    });
    let json_str = serde_json::to_string_pretty(&report).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
