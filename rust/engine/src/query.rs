//! Query narrowing hints.
//!
//! When searching stored hands for a player's flop play, the positions still
//! in the hand after preflop bound where that player can sit. These helpers
//! turn that into a cheap equality filter; they never decide correctness.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::SequenceError;
use crate::sequence::surviving_positions;

/// Seat count assumed when the caller does not know the table size.
pub const DEFAULT_POSITION_COUNT: u8 = 6;

/// Positions that did not fold preflop, assuming a 6-handed table.
pub fn flop_survivor_positions(preflop: &str) -> Result<BTreeSet<u8>, SequenceError> {
    flop_survivor_positions_for(preflop, DEFAULT_POSITION_COUNT)
}

pub fn flop_survivor_positions_for(
    preflop: &str,
    position_count: u8,
) -> Result<BTreeSet<u8>, SequenceError> {
    surviving_positions(preflop, position_count)
}

/// `positions->>'<position>' = '<player>'`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionClause {
    pub position: u8,
    pub player: String,
}

impl PositionClause {
    pub fn to_sql(&self) -> String {
        format!(
            "positions->>'{}' = '{}'",
            self.position,
            self.player.replace('\'', "''")
        )
    }
}

/// One equality check per surviving position, to be OR'd by the query layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PositionFilter {
    pub clauses: Vec<PositionClause>,
}

impl PositionFilter {
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Renders the OR'd clauses. An empty filter can match nothing.
    pub fn to_sql(&self) -> String {
        if self.clauses.is_empty() {
            return "FALSE".to_string();
        }
        let parts: Vec<String> = self.clauses.iter().map(PositionClause::to_sql).collect();
        format!("({})", parts.join(" OR "))
    }
}

pub fn build_position_filter(positions: &BTreeSet<u8>, player: &str) -> PositionFilter {
    PositionFilter {
        clauses: positions
            .iter()
            .map(|&position| PositionClause {
                position,
                player: player.to_string(),
            })
            .collect(),
    }
}
