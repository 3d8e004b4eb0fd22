//! Study-tag classification.
//!
//! A tag is active when any of its rules matches (OR across rules, each rule
//! being an AND of predicates). Documents linked to active tags are surfaced
//! once each.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::{LibraryError, RuleError};
use crate::hand::HandContext;
use crate::library::{Document, LibraryStore, TagId, TagLibrary};
use crate::rules::CompiledRule;

fn skip_rule(e: &RuleError) {
    warn!(rule_id = e.rule_id(), error = %e, "skipping rule that cannot be evaluated");
}

/// Evaluates one compiled rule, isolating a failure as "never matches".
fn rule_holds(rule: &CompiledRule<'_>, hand: &HandContext) -> bool {
    match rule.matches(hand) {
        Ok(hit) => hit,
        Err(e) => {
            skip_rule(&e);
            false
        }
    }
}

/// A tag library with every rule compiled once.
///
/// Rules whose patterns do not compile are logged and dropped here; a tag left
/// without rules is never active.
#[derive(Debug)]
pub struct PreparedTags<'a> {
    library: &'a TagLibrary,
    rules: Vec<(TagId, Vec<CompiledRule<'a>>)>,
}

impl<'a> PreparedTags<'a> {
    pub fn new(library: &'a TagLibrary) -> Self {
        let rules = library
            .rules_by_tag()
            .into_iter()
            .map(|(tag_id, rules)| {
                let compiled = rules
                    .into_iter()
                    .filter_map(|r| CompiledRule::compile(r).inspect_err(skip_rule).ok())
                    .collect();
                (tag_id, compiled)
            })
            .collect();
        Self { library, rules }
    }

    pub fn active_tags(&self, hand: &HandContext) -> BTreeSet<TagId> {
        self.rules
            .iter()
            .filter(|(_, rules)| rules.iter().any(|r| rule_holds(r, hand)))
            .map(|(tag_id, _)| *tag_id)
            .collect()
    }

    pub fn classify(&self, hand: &HandContext) -> Classification {
        let library = self.library;
        let tags = self.active_tags(hand);
        let tag_names = tags
            .iter()
            .filter_map(|id| library.tag(*id).map(|t| t.name.clone()))
            .collect();
        let documents = documents_for_tags(library, &tags);
        debug!(
            rules = library.rules.len(),
            active = tags.len(),
            documents = documents.len(),
            "classified hand"
        );
        Classification {
            tags,
            tag_names,
            documents,
        }
    }
}

/// Tags with at least one matching rule.
pub fn active_tags(library: &TagLibrary, hand: &HandContext) -> BTreeSet<TagId> {
    PreparedTags::new(library).active_tags(hand)
}

/// Documents linked to any of `tags`, deduplicated.
pub fn documents_for_tags(library: &TagLibrary, tags: &BTreeSet<TagId>) -> BTreeSet<Document> {
    tags.iter()
        .flat_map(|t| library.documents_for_tag(*t))
        .cloned()
        .collect()
}

pub fn relevant_documents(library: &TagLibrary, hand: &HandContext) -> BTreeSet<Document> {
    documents_for_tags(library, &active_tags(library, hand))
}

/// Result of classifying one hand against one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub tags: BTreeSet<TagId>,
    pub tag_names: Vec<String>,
    pub documents: BTreeSet<Document>,
}

pub fn classify(library: &TagLibrary, hand: &HandContext) -> Classification {
    PreparedTags::new(library).classify(hand)
}

/// Loads a fresh tag snapshot per call and classifies against it.
#[derive(Debug, Clone)]
pub struct TagClassifier<S> {
    store: S,
}

impl<S: LibraryStore> TagClassifier<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn active_tags(&self, hand: &HandContext) -> Result<BTreeSet<TagId>, LibraryError> {
        let library = self.store.load_tag_library()?;
        Ok(active_tags(&library, hand))
    }

    pub fn relevant_documents(&self, hand: &HandContext) -> Result<BTreeSet<Document>, LibraryError> {
        let library = self.store.load_tag_library()?;
        Ok(relevant_documents(&library, hand))
    }

    pub fn classify(&self, hand: &HandContext) -> Result<Classification, LibraryError> {
        let library = self.store.load_tag_library()?;
        Ok(classify(&library, hand))
    }

    /// Classifies many hands against a single snapshot, compiling its rules once.
    pub fn classify_all<'a, I>(&self, hands: I) -> Result<Vec<Classification>, LibraryError>
    where
        I: IntoIterator<Item = &'a HandContext>,
    {
        let library = self.store.load_tag_library()?;
        let prepared = PreparedTags::new(&library);
        Ok(hands.into_iter().map(|h| prepared.classify(h)).collect())
    }
}
