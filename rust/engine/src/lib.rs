//! # librarian-engine: Hand Classification Core
//!
//! Decides which study tags apply to a parsed poker hand and which canonical
//! spot (if any) it corresponds to, by evaluating a user-authored rule library.
//! Evaluation is pure: callers load a library snapshot, build a
//! [`hand::HandContext`], and get results back without any shared state.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card, Rank and Suit parsing (`"Ah"`, `"Td"`)
//! - [`texture`] - Board texture analysis (`monotone`, `paired`, `A-high`, ...)
//! - [`sequence`] - Compact action-sequence encoding and surviving positions
//! - [`format`] - Game class / variant / table size, legacy derivation, profiles
//! - [`hand`] - The [`hand::HandContext`] every evaluation reads
//! - [`rules`] - Tag rule predicates (AND within a rule)
//! - [`library`] - Library snapshots, the [`library::LibraryStore`] trait, caching
//! - [`classify`] - Tag classification (OR across a tag's rules)
//! - [`spot`] - Spot resolution (AND across a spot's rules)
//! - [`query`] - Position filters for narrowing external hand queries
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use librarian_engine::texture::{analyze_board, tag_names};
//!
//! let tags = tag_names(&analyze_board(&["Ah", "Kh", "2h"]).unwrap());
//! assert!(tags.contains("monotone"));
//! assert!(tags.contains("A-high"));
//! assert!(tags.contains("broadway_present"));
//! ```
//!
//! ## Classifying a Hand
//!
//! ```rust
//! use librarian_engine::classify::TagClassifier;
//! use librarian_engine::hand::{HandContext, Street};
//! use librarian_engine::library::{LibrarySnapshot, Tag};
//! use librarian_engine::rules::TagRule;
//!
//! let library = LibrarySnapshot {
//!     tags: vec![Tag { id: 1, name: "3bet pots".into(), description: None }],
//!     tag_rules: vec![TagRule { preflop_pattern: Some("r.*r".into()), ..TagRule::new(1, 1) }],
//!     ..LibrarySnapshot::default()
//! };
//! let hand = HandContext::new().with_sequence(Street::Preflop, "1f2r3r2c");
//! let tags = TagClassifier::new(&library).active_tags(&hand).unwrap();
//! assert!(tags.contains(&1));
//! ```

pub mod cards;
pub mod classify;
pub mod errors;
pub mod format;
pub mod hand;
pub mod library;
pub mod query;
pub mod rules;
pub mod sequence;
pub mod spot;
pub mod texture;
