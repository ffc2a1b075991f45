//! # ccg-remap
//!
//! Heuristic conversion of deck lists between two trading card catalogs.
//!
//! A source catalog (cards a deck was built from) is matched card by card
//! onto a target catalog using attribute similarity, yielding a name
//! mapping. The mapping then rewrites deck files so they reference only
//! target cards.
//!
//! ## Pipeline
//!
//! 1. **Fetch** (optional): build a source catalog from the cards named in a
//!    directory of deck files, via a remote card API.
//! 2. **Match**: `MatchEngine` walks the source catalog in order and tries a
//!    fixed list of strategies per card. The result is a `MappingTable`.
//! 3. **Convert**: `DeckRewriter` applies the mapping line by line;
//!    `convert_tree` does it for a whole directory.
//!
//! Matching is greedy, deterministic and single-threaded. Running it twice
//! on the same inputs yields the same mapping.
//!
//! ## Modules
//!
//! - `cards`: Catalog records, attribute extractors, the catalog
//! - `matching`: Similarity, rankers, strategies, the engine
//! - `mapping`: Mapping entries and persistence
//! - `deck`: Deck line grammar and rewriting
//! - `fetch`: Remote lookup with retry and an on-disk cache
//! - `core`: Configuration
//! - `error`: Error types

pub mod cards;
pub mod core;
pub mod deck;
pub mod error;
pub mod fetch;
pub mod mapping;
pub mod matching;

// Re-export commonly used types
pub use crate::cards::{CardEntity, Catalog, ColorSet, Rarity};

pub use crate::core::{
    AcceptancePolicy, AppConfig, FailurePolicy, FetchConfig, MatchConfig, RewriteConfig, Strictness,
};

pub use crate::deck::{convert_tree, CardLine, DeckRewriter, RewrittenDeck, TreeSummary};

pub use crate::error::{DeckError, Error, FetchError, MatchError, Result};

pub use crate::fetch::{CardSource, FetchCache, ScryfallClient};

pub use crate::mapping::{MappingEntry, MappingTable};

pub use crate::matching::{Candidate, MatchEngine, MatchReport, MatchStats, Strategy};
