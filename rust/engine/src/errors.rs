use thiserror::Error;

/// A card string that is not `<rank><suit>` with a known rank and suit.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CardError {
    #[error("Malformed card '{card}': {reason}")]
    Malformed { card: String, reason: &'static str },
}

/// An action sequence that does not decode as `(position digit, action letter)` pairs.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Malformed sequence '{sequence}': position {position} has no action")]
    TrailingPosition { sequence: String, position: u8 },
    #[error("Malformed sequence '{sequence}': unknown action '{action}' at offset {offset}")]
    UnknownAction {
        sequence: String,
        action: char,
        offset: usize,
    },
    #[error("Malformed sequence '{sequence}': expected position digit, found '{found}' at offset {offset}")]
    InvalidPosition {
        sequence: String,
        found: char,
        offset: usize,
    },
}

/// No flop could be derived for a hand that a texture predicate needs.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum BoardError {
    #[error("No flop cards could be resolved for the hand")]
    Unresolvable,
    #[error(transparent)]
    Card(#[from] CardError),
}

/// The rule/tag/spot store could not produce a snapshot.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error("Rule library unavailable: {message}")]
pub struct LibraryError {
    pub message: String,
}

impl LibraryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single rule could not be evaluated. Callers isolate the rule and keep going.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RuleError {
    #[error("Rule {rule_id}: invalid {street} pattern '{pattern}': {reason}")]
    InvalidRegex {
        rule_id: i64,
        street: &'static str,
        pattern: String,
        reason: String,
    },
    #[error("Rule {rule_id}: invalid {field} glob '{pattern}': {reason}")]
    InvalidGlob {
        rule_id: i64,
        field: &'static str,
        pattern: String,
        reason: String,
    },
    #[error("Rule {rule_id}: invalid condition params: {reason}")]
    InvalidCondition { rule_id: i64, reason: String },
    #[error("Rule {rule_id}: unknown condition type '{condition_type}'")]
    UnknownConditionType {
        rule_id: i64,
        condition_type: String,
    },
    #[error("Rule {rule_id}: board texture could not be derived: {source}")]
    Board {
        rule_id: i64,
        #[source]
        source: CardError,
    },
}

impl RuleError {
    pub fn rule_id(&self) -> i64 {
        match self {
            RuleError::InvalidRegex { rule_id, .. }
            | RuleError::InvalidGlob { rule_id, .. }
            | RuleError::InvalidCondition { rule_id, .. }
            | RuleError::UnknownConditionType { rule_id, .. }
            | RuleError::Board { rule_id, .. } => *rule_id,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SpotError {
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("Hand matches {} spots ({}); the catalog must map a situation to at most one spot", .spot_names.len(), .spot_names.join(", "))]
    Ambiguous { spot_names: Vec<String> },
    #[error("Unknown game profile '{name}'")]
    UnknownProfile { name: String },
}
