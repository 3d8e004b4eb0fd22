//! Board texture analysis.
//!
//! Turns a list of community cards into the closed vocabulary of texture tags
//! that rules reference by name (`monotone`, `paired`, `A-high`, ...).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::cards::{parse_cards, Card, Rank};
use crate::errors::CardError;

/// A semantic descriptor of a board, derived purely from ranks and suits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum TextureTag {
    /// Every card shares one suit
    Monotone,
    /// Exactly two suits present
    TwoTone,
    /// Exactly three suits present
    Rainbow,
    Quads,
    Trips,
    /// Trips plus a second paired rank
    FullHouse,
    TwoPair,
    Paired,
    /// Highest rank on the board
    High(Rank),
    /// Every card is a distinct broadway rank
    BroadwayHeavy,
    /// At least two distinct broadway ranks
    BroadwayPresent,
}

impl TextureTag {
    pub fn name(&self) -> String {
        match self {
            TextureTag::Monotone => "monotone".to_string(),
            TextureTag::TwoTone => "two_tone".to_string(),
            TextureTag::Rainbow => "rainbow".to_string(),
            TextureTag::Quads => "quads".to_string(),
            TextureTag::Trips => "trips".to_string(),
            TextureTag::FullHouse => "full_house".to_string(),
            TextureTag::TwoPair => "two_pair".to_string(),
            TextureTag::Paired => "paired".to_string(),
            TextureTag::High(rank) => format!("{}-high", rank.to_char()),
            TextureTag::BroadwayHeavy => "broadway_heavy".to_string(),
            TextureTag::BroadwayPresent => "broadway_present".to_string(),
        }
    }
}

impl fmt::Display for TextureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Derives the texture tag set for a board. An empty board has no texture.
///
/// Boards with four distinct suits get no suit tag; only 1-3 suits are named.
pub fn analyze(cards: &[Card]) -> BTreeSet<TextureTag> {
    let mut tags = BTreeSet::new();
    if cards.is_empty() {
        return tags;
    }

    let suits: BTreeSet<_> = cards.iter().map(|c| c.suit).collect();
    match suits.len() {
        1 => {
            tags.insert(TextureTag::Monotone);
        }
        2 => {
            tags.insert(TextureTag::TwoTone);
        }
        3 => {
            tags.insert(TextureTag::Rainbow);
        }
        _ => {}
    }

    let mut rank_counts: BTreeMap<Rank, usize> = BTreeMap::new();
    for card in cards {
        *rank_counts.entry(card.rank).or_insert(0) += 1;
    }
    let count_of = |n: usize| rank_counts.values().filter(|&&c| c == n).count();
    if rank_counts.values().any(|&c| c >= 4) {
        tags.insert(TextureTag::Quads);
    } else if count_of(3) > 0 {
        tags.insert(TextureTag::Trips);
        if count_of(2) > 0 {
            tags.insert(TextureTag::FullHouse);
        }
    } else if count_of(2) == 2 {
        tags.insert(TextureTag::TwoPair);
    } else if count_of(2) == 1 {
        tags.insert(TextureTag::Paired);
    }

    // rank_counts is ordered, so the last key is the highest rank
    if let Some(&high) = rank_counts.keys().next_back() {
        tags.insert(TextureTag::High(high));
    }

    if cards.len() >= 3 {
        let broadway = rank_counts.keys().filter(|r| r.is_broadway()).count();
        if broadway == cards.len() {
            tags.insert(TextureTag::BroadwayHeavy);
        } else if broadway >= 2 {
            tags.insert(TextureTag::BroadwayPresent);
        }
    }

    tags
}

/// Parses card strings then analyzes them.
pub fn analyze_board<S: AsRef<str>>(cards: &[S]) -> Result<BTreeSet<TextureTag>, CardError> {
    let parsed = parse_cards(cards)?;
    Ok(analyze(&parsed))
}

/// Texture tag names, the form rules are written against.
pub fn tag_names(tags: &BTreeSet<TextureTag>) -> BTreeSet<String> {
    tags.iter().map(TextureTag::name).collect()
}

/// Parses a rule's comma-separated texture list (`"monotone, A-high"`).
/// Entries are trimmed and empty entries dropped.
pub fn parse_texture_list(list: &str) -> BTreeSet<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// True when every required texture is present on the board.
pub fn satisfies(required: &BTreeSet<String>, board: &BTreeSet<TextureTag>) -> bool {
    let names = tag_names(board);
    required.is_subset(&names)
}
