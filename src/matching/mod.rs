//! Catalog matching: similarity primitives, candidate rankers, strategies,
//! and the engine that strings them together.
//!
//! ## Overview
//!
//! Each source card is resolved independently, in source order, by trying
//! an ordered list of named strategies:
//!
//! - **Special archetype** (planeswalkers by default): strongest creature
//!   carrying all of the card's colors, then any single one of them.
//! - **Ordinary cards**: a fuzziness relaxation loop over type line, rarity,
//!   power/toughness and cost value, then any rarity-compatible creature,
//!   then, for expensive cards, the most expensive target of the same colors.
//!
//! The assignment is greedy: nothing stops two sources landing on the same
//! target, and earlier catalog records win every tie.
//!
//! ## Usage
//!
//! ```rust
//! use ccg_remap::cards::Catalog;
//! use ccg_remap::core::config::{AcceptancePolicy, MatchConfig};
//! use ccg_remap::matching::MatchEngine;
//!
//! fn example(source: &Catalog, target: &Catalog) {
//!     let config = MatchConfig::default().with_acceptance(AcceptancePolicy::CostRelaxed);
//!     let report = MatchEngine::new(target, config).run(source);
//!
//!     for miss in &report.unmatched {
//!         println!("unmatched: {}", miss);
//!     }
//!     println!("matched {} of {}", report.stats.matched, report.stats.sources_seen);
//! }
//! ```

pub mod engine;
pub mod rankers;
pub mod similarity;
pub mod stats;
pub mod strategy;

pub use engine::{MatchEngine, MatchReport};
pub use rankers::{best_by_archetype_and_color, best_by_color_and_max_cost};
pub use similarity::{rarity_compatible, similarity_ratio, text_similar};
pub use stats::MatchStats;
pub use strategy::{fuzziness_levels, Candidate, MatchContext, Strategy};
