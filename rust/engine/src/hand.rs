use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cards::{parse_cards, Card};
use crate::errors::BoardError;
use crate::format::{derive_from_legacy, FormatDetails, ResolvedFormat};

/// Represents a betting street in Texas Hold'em poker.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn as_str(&self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

/// Everything the engine reads about one parsed hand.
///
/// Built fresh by the caller for each evaluation; the engine only borrows it.
/// Optional data is modelled with `Option` so a missing stack or board is
/// explicit rather than probed for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HandContext {
    /// Caller's identifier, echoed back in reports
    #[serde(default)]
    pub hand_id: Option<String>,
    #[serde(default)]
    pub preflop: String,
    #[serde(default)]
    pub flop: String,
    #[serde(default)]
    pub turn: String,
    #[serde(default)]
    pub river: String,
    /// Flop cards as supplied by the parser (`["Ah", "Kh", "2h"]`)
    #[serde(default)]
    pub flop_cards: Option<Vec<String>>,
    /// Raw hand-history text, used only when `flop_cards` is absent
    #[serde(default)]
    pub raw_text: Option<String>,
    #[serde(default)]
    pub effective_stack_bb: Option<f64>,
    /// Structured format, when the parser provides one
    #[serde(default)]
    pub format: Option<FormatDetails>,
    /// Legacy free-text game type (e.g. `zoom_cash_6max`)
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub number_of_players: Option<u32>,
}

impl HandContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequence(mut self, street: Street, sequence: impl Into<String>) -> Self {
        let sequence = sequence.into();
        match street {
            Street::Preflop => self.preflop = sequence,
            Street::Flop => self.flop = sequence,
            Street::Turn => self.turn = sequence,
            Street::River => self.river = sequence,
        }
        self
    }

    pub fn with_flop_cards<S: Into<String>>(mut self, cards: impl IntoIterator<Item = S>) -> Self {
        self.flop_cards = Some(cards.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = Some(text.into());
        self
    }

    pub fn with_effective_stack(mut self, bb: f64) -> Self {
        self.effective_stack_bb = Some(bb);
        self
    }

    pub fn with_format(mut self, format: FormatDetails) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_game_type(mut self, game_type: impl Into<String>) -> Self {
        self.game_type = Some(game_type.into());
        self
    }

    pub fn with_players(mut self, players: u32) -> Self {
        self.number_of_players = Some(players);
        self
    }

    /// The encoded action sequence for a street; empty if the street was not reached.
    pub fn sequence(&self, street: Street) -> &str {
        match street {
            Street::Preflop => &self.preflop,
            Street::Flop => &self.flop,
            Street::Turn => &self.turn,
            Street::River => &self.river,
        }
    }

    /// Flop card strings, preferring the structured list over raw-text extraction.
    pub fn flop_card_strings(&self) -> Option<Vec<String>> {
        match &self.flop_cards {
            Some(cards) if !cards.is_empty() => Some(cards.clone()),
            _ => self.raw_text.as_deref().and_then(extract_flop_from_text),
        }
    }

    /// Parsed flop cards, or why they could not be produced.
    pub fn resolve_flop(&self) -> Result<Vec<Card>, BoardError> {
        let cards = self.flop_card_strings().ok_or(BoardError::Unresolvable)?;
        Ok(parse_cards(&cards)?)
    }

    /// The hand's format, tagged with whether it is authoritative or sniffed.
    pub fn resolved_format(&self) -> ResolvedFormat {
        match self.format {
            Some(details) => ResolvedFormat::Structured(details),
            None => ResolvedFormat::DerivedFromLegacy(derive_from_legacy(
                self.game_type.as_deref(),
                self.number_of_players,
            )),
        }
    }
}

fn flop_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*\*\s*FLOP\s*\*\*\*\s*\[([^\]]+)\]").expect("flop marker pattern is valid")
    })
}

/// Pulls the first `*** FLOP *** [..]` card group out of raw hand-history text.
pub fn extract_flop_from_text(text: &str) -> Option<Vec<String>> {
    let caps = flop_marker().captures(text)?;
    let cards: Vec<String> = caps[1].split_whitespace().map(str::to_string).collect();
    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}
