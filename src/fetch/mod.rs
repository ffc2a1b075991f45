//! Remote card lookup for building catalogs from deck files.

pub mod cache;
pub mod retry;
pub mod scryfall;

pub use cache::{FetchCache, FillSummary};
pub use retry::retry_with_backoff;
pub use scryfall::{CardSource, ScryfallClient};
