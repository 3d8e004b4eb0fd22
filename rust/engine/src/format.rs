//! Game format attributes: class, variant and table size.
//!
//! Newer hand records carry these as structured fields. Older records only have
//! a free-text `game_type` (e.g. `zoom_cash_6max`), from which a best-effort
//! triple is sniffed. The two origins are kept apart in [`ResolvedFormat`].

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameClass {
    Cash,
    Tournament,
}

impl GameClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameClass::Cash => "cash",
            GameClass::Tournament => "tournament",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Zoom,
    Regular,
}

impl GameVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameVariant::Zoom => "zoom",
            GameVariant::Regular => "regular",
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TableSize {
    #[serde(rename = "2-max")]
    TwoMax,
    #[serde(rename = "3-max")]
    ThreeMax,
    #[serde(rename = "6-max")]
    SixMax,
    #[serde(rename = "9-max")]
    NineMax,
}

impl TableSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSize::TwoMax => "2-max",
            TableSize::ThreeMax => "3-max",
            TableSize::SixMax => "6-max",
            TableSize::NineMax => "9-max",
        }
    }

    pub fn from_seats(seats: u32) -> Option<TableSize> {
        match seats {
            2 => Some(TableSize::TwoMax),
            3 => Some(TableSize::ThreeMax),
            6 => Some(TableSize::SixMax),
            9 => Some(TableSize::NineMax),
            _ => None,
        }
    }
}

impl fmt::Display for GameClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GameVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TableSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The structured format triple.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct FormatDetails {
    pub game_class: GameClass,
    pub game_variant: GameVariant,
    pub table_size: TableSize,
}

impl Default for FormatDetails {
    /// The most common format, used when nothing better is known.
    fn default() -> Self {
        Self {
            game_class: GameClass::Cash,
            game_variant: GameVariant::Regular,
            table_size: TableSize::SixMax,
        }
    }
}

/// A format triple together with where it came from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResolvedFormat {
    /// Supplied by the hand parser.
    Structured(FormatDetails),
    /// Sniffed from legacy free text; may be wrong.
    DerivedFromLegacy(FormatDetails),
}

impl ResolvedFormat {
    pub fn details(&self) -> &FormatDetails {
        match self {
            ResolvedFormat::Structured(d) | ResolvedFormat::DerivedFromLegacy(d) => d,
        }
    }

    pub fn is_approximate(&self) -> bool {
        matches!(self, ResolvedFormat::DerivedFromLegacy(_))
    }
}

/// Best-effort format triple from a legacy `game_type` string and player count.
///
/// Never fails: anything unrecognised falls back to cash / regular / 6-max.
pub fn derive_from_legacy(game_type: Option<&str>, number_of_players: Option<u32>) -> FormatDetails {
    let text = game_type.unwrap_or_default().to_lowercase();
    let has = |needle: &str| text.contains(needle);

    let game_class = if has("cash") {
        GameClass::Cash
    } else if ["tournament", "mtt", "sitgo", "sng", "spingo"]
        .iter()
        .any(|n| has(n))
    {
        GameClass::Tournament
    } else {
        GameClass::Cash
    };

    let game_variant = if has("zoom") {
        GameVariant::Zoom
    } else {
        GameVariant::Regular
    };

    let table_size = if has("6max") || has("6-max") {
        TableSize::SixMax
    } else if has("2max") || has("2-max") {
        TableSize::TwoMax
    } else if has("9max") || has("9-max") {
        TableSize::NineMax
    } else if has("3max") || has("3-max") {
        TableSize::ThreeMax
    } else if has("heads") || has("hu") {
        TableSize::TwoMax
    } else {
        number_of_players
            .and_then(TableSize::from_seats)
            .unwrap_or(TableSize::SixMax)
    };

    FormatDetails {
        game_class,
        game_variant,
        table_size,
    }
}

/// A named, reusable format triple (e.g. "Zoom 6-max").
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameProfile {
    pub name: String,
    #[serde(flatten)]
    pub format: FormatDetails,
}

impl GameProfile {
    pub fn new(name: impl Into<String>, format: FormatDetails) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}

/// The profiles a fresh library is seeded with.
pub fn default_profiles() -> Vec<GameProfile> {
    use GameClass::*;
    use GameVariant::*;
    use TableSize::*;
    let p = |name: &str, game_class, game_variant, table_size| {
        GameProfile::new(
            name,
            FormatDetails {
                game_class,
                game_variant,
                table_size,
            },
        )
    };
    vec![
        p("Zoom 6-max", Cash, Zoom, SixMax),
        p("Spingo", Tournament, Regular, ThreeMax),
        p("Live Cash 9-max", Cash, Regular, NineMax),
        p("Online MTT 6-max", Tournament, Regular, SixMax),
        p("Zoom 9-max", Cash, Zoom, NineMax),
        p("Heads-up Cash", Cash, Regular, TwoMax),
        p("Heads-up Tournament", Tournament, Regular, TwoMax),
    ]
}
