//! Card name mappings produced by the matcher and consumed by the deck rewriter.

pub mod table;

pub use table::{MappingEntry, MappingTable};
