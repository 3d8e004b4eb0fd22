//! Compact action-sequence encoding.
//!
//! A betting round is written as repeated `<position digit><action letter>`
//! pairs in chronological order, e.g. `1f2f3r4c`. An empty string means the
//! street was not reached or nobody acted voluntarily.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::SequenceError;

/// A voluntary action as encoded in a sequence string.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Action {
    Fold,
    Call,
    Raise,
    Check,
    Bet,
}

impl Action {
    pub fn from_char(c: char) -> Option<Action> {
        match c {
            'f' => Some(Action::Fold),
            'c' => Some(Action::Call),
            'r' => Some(Action::Raise),
            'k' => Some(Action::Check),
            'b' => Some(Action::Bet),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Action::Fold => 'f',
            Action::Call => 'c',
            Action::Raise => 'r',
            Action::Check => 'k',
            Action::Bet => 'b',
        }
    }
}

/// One `(position, action)` token.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SequenceStep {
    pub position: u8,
    pub action: Action,
}

impl fmt::Display for SequenceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.position, self.action.to_char())
    }
}

/// Decodes a sequence string into its steps.
pub fn parse_sequence(sequence: &str) -> Result<Vec<SequenceStep>, SequenceError> {
    let mut steps = Vec::with_capacity(sequence.len() / 2);
    let mut chars = sequence.char_indices();
    while let Some((offset, p)) = chars.next() {
        let Some(position) = p.to_digit(10) else {
            return Err(SequenceError::InvalidPosition {
                sequence: sequence.to_string(),
                found: p,
                offset,
            });
        };
        let position = position as u8;
        let Some((action_offset, a)) = chars.next() else {
            return Err(SequenceError::TrailingPosition {
                sequence: sequence.to_string(),
                position,
            });
        };
        let action = Action::from_char(a).ok_or_else(|| SequenceError::UnknownAction {
            sequence: sequence.to_string(),
            action: a,
            offset: action_offset,
        })?;
        steps.push(SequenceStep { position, action });
    }
    Ok(steps)
}

/// Positions `1..=position_count` that have not folded by the end of `sequence`.
///
/// A position leaves the set the moment it is seen folding; every other action
/// leaves membership alone. This is a hint for narrowing queries, not proof that
/// a position saw the next street.
pub fn surviving_positions(
    sequence: &str,
    position_count: u8,
) -> Result<BTreeSet<u8>, SequenceError> {
    let mut alive: BTreeSet<u8> = (1..=position_count).collect();
    for step in parse_sequence(sequence)? {
        if step.action == Action::Fold {
            alive.remove(&step.position);
        }
    }
    Ok(alive)
}
