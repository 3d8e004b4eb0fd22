//! Rule predicates for study tags.
//!
//! A [`TagRule`] is a conjunction of optional predicates. Each predicate is
//! inert when its controlling field is unset (or blank), so a rule with
//! nothing set matches every hand.

use std::collections::BTreeSet;

use globset::{Glob, GlobMatcher};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{BoardError, RuleError};
use crate::format::FormatDetails;
use crate::hand::{HandContext, Street};
use crate::texture::{analyze, parse_texture_list, satisfies};

/// One authored rule belonging to a tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagRule {
    pub id: i64,
    pub tag_id: i64,
    #[serde(default)]
    pub description: Option<String>,
    /// Regex searched (unanchored) in the preflop sequence
    #[serde(default)]
    pub preflop_pattern: Option<String>,
    #[serde(default)]
    pub flop_pattern: Option<String>,
    #[serde(default)]
    pub turn_pattern: Option<String>,
    #[serde(default)]
    pub river_pattern: Option<String>,
    /// Comma-separated texture names that must all be on the flop
    #[serde(default)]
    pub board_texture: Option<String>,
    #[serde(default)]
    pub min_effective_stack_bb: Option<f64>,
    #[serde(default)]
    pub max_effective_stack_bb: Option<f64>,
    #[serde(default)]
    pub game_class_pattern: Option<String>,
    #[serde(default)]
    pub game_variant_pattern: Option<String>,
    #[serde(default)]
    pub table_size_pattern: Option<String>,
    /// Legacy glob over the free-text game type
    #[serde(default)]
    pub game_type_pattern: Option<String>,
    #[serde(default)]
    pub num_players: Option<u32>,
}

impl TagRule {
    pub fn new(id: i64, tag_id: i64) -> Self {
        Self {
            id,
            tag_id,
            ..Self::default()
        }
    }

    pub fn street_pattern(&self, street: Street) -> Option<&str> {
        let field = match street {
            Street::Preflop => &self.preflop_pattern,
            Street::Flop => &self.flop_pattern,
            Street::Turn => &self.turn_pattern,
            Street::River => &self.river_pattern,
        };
        present(field)
    }

    /// Texture names the flop must carry. A list of only separators is unset.
    pub fn texture_requirements(&self) -> Option<BTreeSet<String>> {
        present(&self.board_texture)
            .map(parse_texture_list)
            .filter(|list| !list.is_empty())
    }

    /// True when no predicate is set.
    pub fn is_wildcard(&self) -> bool {
        Street::ALL.iter().all(|s| self.street_pattern(*s).is_none())
            && self.texture_requirements().is_none()
            && self.min_effective_stack_bb.is_none()
            && self.max_effective_stack_bb.is_none()
            && present(&self.game_class_pattern).is_none()
            && present(&self.game_variant_pattern).is_none()
            && present(&self.table_size_pattern).is_none()
            && present(&self.game_type_pattern).is_none()
            && self.num_players.is_none()
    }
}

/// Blank strings count as unset; stores write `''` for "any".
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

type FormatField = fn(&FormatDetails) -> &'static str;

/// A rule with its patterns compiled, ready to be evaluated against many hands.
///
/// Compiling surfaces every broken pattern up front, so a rule that fails here
/// never matches any hand.
#[derive(Debug, Clone)]
pub struct CompiledRule<'r> {
    rule: &'r TagRule,
    streets: Vec<(Street, Regex)>,
    textures: Option<BTreeSet<String>>,
    formats: Vec<(FormatField, GlobMatcher)>,
    game_type: Option<GlobMatcher>,
}

fn compile_regex(rule_id: i64, street: Street, pattern: &str) -> Result<Regex, RuleError> {
    Regex::new(pattern).map_err(|e| RuleError::InvalidRegex {
        rule_id,
        street: street.as_str(),
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}

fn compile_glob(rule_id: i64, field: &'static str, pattern: &str) -> Result<GlobMatcher, RuleError> {
    let glob = Glob::new(pattern).map_err(|e| RuleError::InvalidGlob {
        rule_id,
        field,
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;
    Ok(glob.compile_matcher())
}

impl<'r> CompiledRule<'r> {
    pub fn compile(rule: &'r TagRule) -> Result<Self, RuleError> {
        let mut streets = Vec::new();
        for street in Street::ALL {
            if let Some(pattern) = rule.street_pattern(street) {
                streets.push((street, compile_regex(rule.id, street, pattern)?));
            }
        }

        let mut formats = Vec::new();
        let format_fields: [(&'static str, &Option<String>, FormatField); 3] = [
            ("game_class", &rule.game_class_pattern, |f| f.game_class.as_str()),
            ("game_variant", &rule.game_variant_pattern, |f| f.game_variant.as_str()),
            ("table_size", &rule.table_size_pattern, |f| f.table_size.as_str()),
        ];
        for (field, pattern, value) in format_fields {
            if let Some(pattern) = present(pattern) {
                formats.push((value, compile_glob(rule.id, field, pattern)?));
            }
        }

        let game_type = present(&rule.game_type_pattern)
            .map(|p| compile_glob(rule.id, "game_type", p))
            .transpose()?;

        Ok(Self {
            rule,
            streets,
            textures: rule.texture_requirements(),
            formats,
            game_type,
        })
    }

    pub fn rule(&self) -> &'r TagRule {
        self.rule
    }

    /// Evaluates every predicate against `hand`.
    ///
    /// Only a board that cannot be parsed fails at this point; pattern errors
    /// were reported by [`CompiledRule::compile`].
    pub fn matches(&self, hand: &HandContext) -> Result<bool, RuleError> {
        let rule = self.rule;
        for (street, re) in &self.streets {
            if !re.is_match(hand.sequence(*street)) {
                return Ok(false);
            }
        }

        if let Some(required) = &self.textures {
            let cards = match hand.resolve_flop() {
                Ok(cards) => cards,
                Err(BoardError::Unresolvable) => {
                    debug!(rule_id = rule.id, "texture rule skipped: no flop for hand");
                    return Ok(false);
                }
                Err(BoardError::Card(source)) => {
                    return Err(RuleError::Board {
                        rule_id: rule.id,
                        source,
                    })
                }
            };
            if !satisfies(required, &analyze(&cards)) {
                return Ok(false);
            }
        }

        if rule.min_effective_stack_bb.is_some() || rule.max_effective_stack_bb.is_some() {
            let Some(stack) = hand.effective_stack_bb else {
                return Ok(false);
            };
            // NaN satisfies neither bound
            let within = rule.min_effective_stack_bb.is_none_or(|min| min <= stack)
                && rule.max_effective_stack_bb.is_none_or(|max| stack <= max);
            if !within {
                return Ok(false);
            }
        }

        if !self.formats.is_empty() {
            let resolved = hand.resolved_format();
            if resolved.is_approximate() {
                debug!(rule_id = rule.id, "format predicate using legacy game type");
            }
            let format = resolved.details();
            for (value, matcher) in &self.formats {
                if !matcher.is_match(value(format)) {
                    return Ok(false);
                }
            }
        }

        if let Some(matcher) = &self.game_type {
            let Some(game_type) = hand.game_type.as_deref() else {
                return Ok(false);
            };
            if !matcher.is_match(game_type) {
                return Ok(false);
            }
        }

        if let Some(players) = rule.num_players {
            if hand.number_of_players != Some(players) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Evaluates every predicate of `rule` against `hand`.
///
/// `Ok(false)` means some predicate did not hold (including "cannot tell",
/// such as a texture rule on a hand without a flop). `Err` means the rule
/// itself is broken and should be skipped by the caller.
pub fn matches(rule: &TagRule, hand: &HandContext) -> Result<bool, RuleError> {
    CompiledRule::compile(rule)?.matches(hand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{FormatDetails, GameClass, GameVariant, TableSize};

    fn rule() -> TagRule {
        TagRule::new(1, 10)
    }

    fn zoom_hand() -> HandContext {
        HandContext::new()
            .with_sequence(Street::Preflop, "1f2f3r4c5f6f")
            .with_sequence(Street::Flop, "4k3b4c")
            .with_flop_cards(["Jd", "3d", "5d"])
            .with_effective_stack(98.5)
            .with_format(FormatDetails {
                game_class: GameClass::Cash,
                game_variant: GameVariant::Zoom,
                table_size: TableSize::SixMax,
            })
            .with_game_type("zoom_cash_6max")
            .with_players(6)
    }

    #[test]
    fn empty_rule_is_wildcard() {
        assert!(rule().is_wildcard());
        assert_eq!(matches(&rule(), &HandContext::new()), Ok(true));
        assert_eq!(matches(&rule(), &zoom_hand()), Ok(true));
    }

    #[test]
    fn blank_patterns_are_unset() {
        let r = TagRule {
            preflop_pattern: Some("  ".into()),
            board_texture: Some(String::new()),
            ..rule()
        };
        assert!(r.is_wildcard());
        assert_eq!(matches(&r, &HandContext::new()), Ok(true));
    }

    #[test]
    fn street_pattern_is_unanchored_search() {
        let r = TagRule {
            preflop_pattern: Some("3r4c".into()),
            ..rule()
        };
        assert_eq!(matches(&r, &zoom_hand()), Ok(true));

        let anchored = TagRule {
            preflop_pattern: Some("^3r".into()),
            ..rule()
        };
        assert_eq!(matches(&anchored, &zoom_hand()), Ok(false));
    }

    #[test]
    fn pattern_on_unreached_street_fails() {
        let r = TagRule {
            river_pattern: Some("b".into()),
            ..rule()
        };
        assert_eq!(matches(&r, &zoom_hand()), Ok(false));
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let r = TagRule {
            flop_pattern: Some("(unclosed".into()),
            ..rule()
        };
        assert!(matches!(
            matches(&r, &zoom_hand()),
            Err(RuleError::InvalidRegex { street: "flop", .. })
        ));
    }

    #[test]
    fn texture_subset_must_hold() {
        let mono = TagRule {
            board_texture: Some("monotone, J-high".into()),
            ..rule()
        };
        assert_eq!(matches(&mono, &zoom_hand()), Ok(true));

        let paired = TagRule {
            board_texture: Some("monotone,paired".into()),
            ..rule()
        };
        assert_eq!(matches(&paired, &zoom_hand()), Ok(false));
    }

    #[test]
    fn texture_without_flop_fails_closed() {
        let r = TagRule {
            board_texture: Some("monotone".into()),
            ..rule()
        };
        assert_eq!(matches(&r, &HandContext::new()), Ok(false));
    }

    #[test]
    fn malformed_flop_card_is_an_error() {
        let r = TagRule {
            board_texture: Some("monotone".into()),
            ..rule()
        };
        let hand = HandContext::new().with_flop_cards(["Zz", "Kh", "2h"]);
        assert!(matches!(matches(&r, &hand), Err(RuleError::Board { rule_id: 1, .. })));
    }

    #[test]
    fn stack_bounds_are_inclusive_and_independent() {
        let r = TagRule {
            min_effective_stack_bb: Some(85.0),
            max_effective_stack_bb: Some(95.0),
            ..rule()
        };
        let at = |bb| HandContext::new().with_effective_stack(bb);
        assert_eq!(matches(&r, &at(90.0)), Ok(true));
        assert_eq!(matches(&r, &at(85.0)), Ok(true));
        assert_eq!(matches(&r, &at(95.0)), Ok(true));
        assert_eq!(matches(&r, &at(104.0)), Ok(false));
        assert_eq!(matches(&r, &at(80.0)), Ok(false));

        let min_only = TagRule {
            min_effective_stack_bb: Some(40.0),
            ..rule()
        };
        assert_eq!(matches(&min_only, &at(400.0)), Ok(true));
    }

    #[test]
    fn stack_rule_needs_a_stack() {
        let r = TagRule {
            max_effective_stack_bb: Some(30.0),
            ..rule()
        };
        assert_eq!(matches(&r, &HandContext::new()), Ok(false));
    }

    #[test]
    fn nan_stack_satisfies_no_bound() {
        let r = TagRule {
            min_effective_stack_bb: Some(40.0),
            max_effective_stack_bb: Some(60.0),
            ..rule()
        };
        let nan = HandContext::new().with_effective_stack(f64::NAN);
        assert_eq!(matches(&r, &nan), Ok(false));

        let max_only = TagRule {
            max_effective_stack_bb: Some(60.0),
            ..rule()
        };
        assert_eq!(matches(&max_only, &nan), Ok(false));
    }

    #[test]
    fn separator_only_texture_list_is_unset() {
        let r = TagRule {
            board_texture: Some(" , ,".into()),
            ..rule()
        };
        assert!(r.is_wildcard());
        assert_eq!(r.texture_requirements(), None);
        assert_eq!(matches(&r, &HandContext::new()), Ok(true));
    }

    #[test]
    fn compiled_rule_is_reusable_across_hands() {
        let r = TagRule {
            preflop_pattern: Some("3r".into()),
            game_variant_pattern: Some("zoom".into()),
            ..rule()
        };
        let compiled = CompiledRule::compile(&r).unwrap();
        assert_eq!(compiled.rule().id, 1);
        assert_eq!(compiled.matches(&zoom_hand()), Ok(true));
        assert_eq!(compiled.matches(&HandContext::new()), Ok(false));
        assert_eq!(
            compiled.matches(&zoom_hand().with_sequence(Street::Preflop, "1r2c")),
            Ok(false)
        );
    }

    #[test]
    fn broken_pattern_fails_at_compile_time() {
        let r = TagRule {
            preflop_pattern: Some("^$".into()),
            river_pattern: Some("([".into()),
            ..rule()
        };
        assert!(matches!(
            CompiledRule::compile(&r),
            Err(RuleError::InvalidRegex { street: "river", .. })
        ));
    }

    #[test]
    fn structured_format_globs() {
        let r = TagRule {
            game_class_pattern: Some("cash".into()),
            game_variant_pattern: Some("zo*".into()),
            table_size_pattern: Some("?-max".into()),
            ..rule()
        };
        assert_eq!(matches(&r, &zoom_hand()), Ok(true));

        let mtt = TagRule {
            game_class_pattern: Some("tournament".into()),
            ..rule()
        };
        assert_eq!(matches(&mtt, &zoom_hand()), Ok(false));
    }

    #[test]
    fn format_falls_back_to_legacy_game_type() {
        let r = TagRule {
            game_variant_pattern: Some("zoom".into()),
            table_size_pattern: Some("6-max".into()),
            ..rule()
        };
        let legacy = HandContext::new().with_game_type("zoom_cash_6max");
        assert_eq!(matches(&r, &legacy), Ok(true));
    }

    #[test]
    fn legacy_game_type_and_player_count() {
        let r = TagRule {
            game_type_pattern: Some("zoom_cash_*".into()),
            num_players: Some(6),
            ..rule()
        };
        assert_eq!(matches(&r, &zoom_hand()), Ok(true));
        assert_eq!(matches(&r, &zoom_hand().with_players(5)), Ok(false));
        assert_eq!(matches(&r, &HandContext::new().with_players(6)), Ok(false));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let r = TagRule {
            game_type_pattern: Some("zoom[".into()),
            ..rule()
        };
        assert!(matches!(
            matches(&r, &zoom_hand()),
            Err(RuleError::InvalidGlob { field: "game_type", .. })
        ));
    }
}
