//! Canonical spot resolution.
//!
//! A spot matches only when every one of its conditions holds (AND across
//! rules, the opposite of tag classification). The catalog is expected to map
//! any situation to at most one spot; a hand that matches several is reported
//! as [`SpotError::Ambiguous`] rather than resolved by load order.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::{RuleError, SpotError};
use crate::hand::{HandContext, Street};
use crate::library::{Document, LibraryStore, Spot, SpotLibrary, SpotRule};

pub const ACTION_SEQUENCE: &str = "action_sequence";

/// A decoded spot condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpotCondition {
    /// The street's encoded sequence must equal `pattern` exactly.
    ActionSequence { street: Street, pattern: String },
}

#[derive(Deserialize)]
struct ActionSequenceParams {
    #[serde(default = "preflop")]
    street: Street,
    pattern: String,
}

fn preflop() -> Street {
    Street::Preflop
}

impl SpotCondition {
    pub fn from_rule(rule: &SpotRule) -> Result<Self, RuleError> {
        match rule.condition_type.as_str() {
            ACTION_SEQUENCE => {
                let params: ActionSequenceParams =
                    serde_json::from_value(rule.condition_params.clone()).map_err(|e| {
                        RuleError::InvalidCondition {
                            rule_id: rule.id,
                            reason: e.to_string(),
                        }
                    })?;
                Ok(SpotCondition::ActionSequence {
                    street: params.street,
                    pattern: params.pattern,
                })
            }
            other => Err(RuleError::UnknownConditionType {
                rule_id: rule.id,
                condition_type: other.to_string(),
            }),
        }
    }

    pub fn holds(&self, hand: &HandContext) -> bool {
        match self {
            SpotCondition::ActionSequence { street, pattern } => {
                hand.sequence(*street) == pattern.as_str()
            }
        }
    }
}

fn condition_holds(rule: &SpotRule, hand: &HandContext) -> bool {
    match SpotCondition::from_rule(rule) {
        Ok(condition) => condition.holds(hand),
        Err(e) => {
            warn!(rule_id = rule.id, error = %e, "skipping spot condition that cannot be evaluated");
            false
        }
    }
}

/// True when the spot has at least one condition and all of them hold.
pub fn spot_matches(rules: &[&SpotRule], hand: &HandContext) -> bool {
    !rules.is_empty() && rules.iter().all(|r| condition_holds(r, hand))
}

fn resolve_among<'a>(
    library: &'a SpotLibrary,
    candidates: impl Iterator<Item = &'a Spot>,
    hand: &HandContext,
) -> Result<Option<&'a Spot>, SpotError> {
    let grouped = library.rules_by_spot();
    let matched: Vec<&Spot> = candidates
        .filter(|s| {
            grouped
                .get(&s.id)
                .is_some_and(|rules| spot_matches(rules, hand))
        })
        .collect();
    match matched.as_slice() {
        [] => Ok(None),
        [one] => {
            debug!(spot = %one.name, "resolved spot");
            Ok(Some(*one))
        }
        many => Err(SpotError::Ambiguous {
            spot_names: many.iter().map(|s| s.name.clone()).collect(),
        }),
    }
}

/// The single spot whose conditions all hold for `hand`, if any.
pub fn resolve<'a>(library: &'a SpotLibrary, hand: &HandContext) -> Result<Option<&'a Spot>, SpotError> {
    resolve_among(library, library.spots.iter(), hand)
}

/// Like [`resolve`], considering only spots assigned to the named game profile.
///
/// Profile names compare case-insensitively; a name the library does not know
/// is an error rather than an empty candidate set.
pub fn resolve_in_profile<'a>(
    library: &'a SpotLibrary,
    hand: &HandContext,
    profile_name: &str,
) -> Result<Option<&'a Spot>, SpotError> {
    let profile = library
        .profile(profile_name)
        .ok_or_else(|| SpotError::UnknownProfile {
            name: profile_name.to_string(),
        })?;
    resolve_among(
        library,
        library.spots_for_profile(&profile.name).into_iter(),
        hand,
    )
}

/// A resolved spot with its study material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpotMatch {
    pub spot: Spot,
    pub default_document: Option<Document>,
    pub documents: Vec<Document>,
}

impl SpotMatch {
    fn from_library(library: &SpotLibrary, spot: &Spot) -> Self {
        Self {
            spot: spot.clone(),
            default_document: library.default_document(spot.id).cloned(),
            documents: library.documents_for_spot(spot.id).into_iter().cloned().collect(),
        }
    }
}

/// Loads a fresh spot snapshot per call and resolves against it.
#[derive(Debug, Clone)]
pub struct SpotResolver<S> {
    store: S,
}

impl<S: LibraryStore> SpotResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn resolve(&self, hand: &HandContext) -> Result<Option<Spot>, SpotError> {
        let library = self.store.load_spot_library()?;
        Ok(resolve(&library, hand)?.cloned())
    }

    pub fn resolve_with_documents(
        &self,
        hand: &HandContext,
        profile: Option<&str>,
    ) -> Result<Option<SpotMatch>, SpotError> {
        let library = self.store.load_spot_library()?;
        let spot = match profile {
            Some(name) => resolve_in_profile(&library, hand, name)?,
            None => resolve(&library, hand)?,
        };
        Ok(spot.map(|s| SpotMatch::from_library(&library, s)))
    }
}
