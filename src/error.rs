//! Error types for catalog matching, deck rewriting and remote fetching.
//!
//! Extraction and similarity functions never fail. Everything that can fail
//! surfaces one of the enums below, each carrying the offending entity name or
//! file position so the caller can report it without extra context.

use std::path::PathBuf;

use thiserror::Error;

use crate::cards::{ColorSet, Rarity};

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// A source entity the engine could not place in the target catalog.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// Special-archetype entity with no color-compatible creature at any tier.
    #[error("no match for special entity '{name}' with any of the colors {colors}")]
    UnmatchedSpecialEntity {
        /// Source entity name.
        name: String,
        /// Color set that was searched (after colorless reduction).
        colors: ColorSet,
    },

    /// Ordinary entity for which the whole relaxation and fallback chain failed.
    #[error(
        "no match for '{name}' (type '{type_line}', cost value {cost_value}, rarity {rarity}, \
         p/t '{power_toughness}', colors {colors}) after relaxing fuzziness to {final_fuzziness:.1}"
    )]
    UnmatchedOrdinaryEntity {
        /// Source entity name.
        name: String,
        /// Type line compared against targets.
        type_line: String,
        /// Derived cost value compared against targets.
        cost_value: u32,
        /// Source rarity tier.
        rarity: Rarity,
        /// Power/toughness slash string compared against targets.
        power_toughness: String,
        /// Colors used by the high-cost fallback.
        colors: ColorSet,
        /// Last fuzziness level tried by the relaxation loop.
        final_fuzziness: f64,
    },
}

impl MatchError {
    /// Name of the source entity that failed to match.
    #[must_use]
    pub fn entity_name(&self) -> &str {
        match self {
            MatchError::UnmatchedSpecialEntity { name, .. } => name,
            MatchError::UnmatchedOrdinaryEntity { name, .. } => name,
        }
    }
}

/// Deck file rewriting failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeckError {
    /// Card line that does not split into quantity, name and set code.
    #[error("invalid line {line_number}: '{line}'")]
    MalformedInputLine {
        /// 1-based line number.
        line_number: usize,
        /// Offending line text.
        line: String,
    },

    /// Card line whose name has no mapping entry.
    #[error("card not found in mapping on line {line_number}: '{line}'")]
    LookupMiss {
        /// 1-based line number.
        line_number: usize,
        /// Offending line text.
        line: String,
        /// Card name that was looked up.
        name: String,
    },
}

/// Remote catalog fetch failures.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote answered with a non-success status.
    #[error("unexpected status {status} for '{name}'")]
    Status {
        /// Card name that was requested.
        name: String,
        /// HTTP status code.
        status: u16,
    },

    /// Remote does not know the card. Never retried.
    #[error("card not found: {0}")]
    NotFound(String),

    /// All attempts failed.
    #[error("{operation} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Operation label used in logs.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
        /// Message of the final failure.
        last: String,
    },
}

impl FetchError {
    /// Whether another attempt could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Http(_) => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::NotFound(_) | FetchError::RetriesExhausted { .. } => false,
        }
    }
}

/// Top-level error for loading, persisting and running the pipeline stages.
#[derive(Error, Debug)]
pub enum Error {
    /// Matching failed under the abort policy.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Deck rewriting failed.
    #[error("deck {}: {source}", .path.display())]
    Deck {
        /// Deck file being rewritten.
        path: PathBuf,
        /// Underlying line error.
        #[source]
        source: DeckError,
    },

    /// Remote fetch failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// I/O operation error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}
