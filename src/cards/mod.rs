//! Card system: catalog records, derived attributes, and the catalog itself.
//!
//! ## Key Types
//!
//! - `CardEntity`: Immutable catalog record (name, type, cost, rarity, stats)
//! - `Rarity`: Normalized rarity tier
//! - `ColorSet`: Color tags derived from a cost expression
//! - `Catalog`: Ordered collection with name lookup
//!
//! Derived values (`cost_value`, `ColorSet::from_cost`, `creature_score`)
//! are pure functions over the raw strings and never fail.

pub mod attributes;
pub mod definition;
pub mod registry;

pub use attributes::{
    cost_value, creature_score, is_special_archetype, power_toughness, stat_value, ColorSet,
    CANONICAL_COLORS, COLORLESS, VARIABLE,
};
pub use definition::{CardEntity, Rarity};
pub use registry::Catalog;
