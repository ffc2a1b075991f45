//! Deck file parsing and rewriting.
//!
//! - `line`: the card line grammar and section headers
//! - `rewriter`: applies a `MappingTable` to one deck's text
//! - `tree`: converts a whole directory of deck files

pub mod line;
pub mod rewriter;
pub mod tree;

pub use line::{referenced_names, section_header, CardLine, METADATA_SECTION};
pub use rewriter::{DeckRewriter, RewrittenDeck};
pub use tree::{convert_tree, TreeSummary};
