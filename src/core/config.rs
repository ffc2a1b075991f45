//! Pipeline configuration.
//!
//! Each stage is configured by its own struct:
//! - `MatchConfig`: Relaxation loop, fallbacks, acceptance and failure policy
//! - `RewriteConfig`: Deck rewriting strictness and basic land handling
//! - `FetchConfig`: Remote card API endpoint and retry budget
//!
//! `AppConfig` bundles all three and loads from a TOML file with
//! `[matching]`, `[rewrite]` and `[fetch]` tables. Missing keys keep defaults.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the relaxation loop accepts a candidate at a given fuzziness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptancePolicy {
    /// Type, rarity, power/toughness and exact cost value must all hold.
    /// First such target wins.
    #[default]
    Strict,
    /// An exact-cost target still wins immediately. Failing that, the
    /// highest-cost target satisfying the other three predicates is accepted
    /// once the pass completes.
    CostRelaxed,
}

/// What to do with a source entity no strategy could place.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop the run at the first unmatched entity.
    #[default]
    Abort,
    /// Record a diagnostic and continue with the next entity.
    Skip,
}

/// Matching engine configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Starting similarity threshold for the relaxation loop.
    pub initial_fuzziness: f64,

    /// Amount the threshold drops after each unsuccessful pass.
    pub fuzziness_step: f64,

    /// Sources with a cost value above this get the max-cost color fallback.
    pub high_cost_threshold: u32,

    /// Type-line tag selecting the special-archetype path.
    pub special_tag: String,

    /// Type-line tag identifying creature-like targets.
    pub creature_tag: String,

    pub acceptance: AcceptancePolicy,

    pub on_unmatched: FailurePolicy,

    /// Carry the source's set code into each mapping entry.
    pub emit_set_code: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            initial_fuzziness: 0.8,
            fuzziness_step: 0.1,
            high_cost_threshold: 6,
            special_tag: "Planeswalker".to_string(),
            creature_tag: "Creature".to_string(),
            acceptance: AcceptancePolicy::Strict,
            on_unmatched: FailurePolicy::Abort,
            emit_set_code: true,
        }
    }
}

impl MatchConfig {
    /// Set the starting fuzziness.
    #[must_use]
    pub fn with_fuzziness(mut self, fuzziness: f64) -> Self {
        self.initial_fuzziness = fuzziness;
        self
    }

    /// Set the acceptance policy.
    #[must_use]
    pub fn with_acceptance(mut self, acceptance: AcceptancePolicy) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Set the failure policy.
    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.on_unmatched = policy;
        self
    }

    /// Set the high-cost threshold.
    #[must_use]
    pub fn with_high_cost_threshold(mut self, threshold: u32) -> Self {
        self.high_cost_threshold = threshold;
        self
    }

    /// Enable or disable set codes in mapping entries.
    #[must_use]
    pub fn with_set_codes(mut self, emit: bool) -> Self {
        self.emit_set_code = emit;
        self
    }

    /// Reject values the relaxation loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_fuzziness > 0.0 && self.initial_fuzziness <= 1.0) {
            return Err(Error::Config(format!(
                "initial_fuzziness must be in (0, 1], got {}",
                self.initial_fuzziness
            )));
        }
        if !(self.fuzziness_step > 0.0) {
            return Err(Error::Config(format!(
                "fuzziness_step must be positive, got {}",
                self.fuzziness_step
            )));
        }
        if self.special_tag.is_empty() || self.creature_tag.is_empty() {
            return Err(Error::Config("archetype tags must not be empty".to_string()));
        }
        Ok(())
    }
}

/// How the deck rewriter treats card lines it cannot map.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strictness {
    /// Abort on the first line whose name has no mapping entry.
    #[default]
    Strict,
    /// Keep unmapped lines unchanged and report them.
    Lenient,
}

/// Deck rewriting configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    pub strictness: Strictness,

    /// Set code every basic land line is rewritten to.
    pub basic_set_code: String,

    /// Names that are always rewritten to `basic_set_code`.
    pub basic_names: Vec<String>,

    /// File extension of deck files, without the dot.
    pub deck_extension: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            strictness: Strictness::Strict,
            basic_set_code: "LTR".to_string(),
            basic_names: ["Plains", "Island", "Swamp", "Mountain", "Forest"]
                .into_iter()
                .map(String::from)
                .collect(),
            deck_extension: "dck".to_string(),
        }
    }
}

impl RewriteConfig {
    /// Set the strictness.
    #[must_use]
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set the basic land set code.
    #[must_use]
    pub fn with_basic_set_code(mut self, set_code: impl Into<String>) -> Self {
        self.basic_set_code = set_code.into();
        self
    }

    /// Whether `name` is a basic land name.
    #[must_use]
    pub fn is_basic(&self, name: &str) -> bool {
        self.basic_names.iter().any(|b| b == name)
    }
}

/// Remote card API configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// API root, without trailing slash.
    pub base_url: String,

    /// Total attempts per card, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry; doubles after each failure.
    pub initial_backoff_ms: u64,

    /// Per-request timeout.
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.scryfall.com".to_string(),
            max_attempts: 5,
            initial_backoff_ms: 1000,
            timeout_secs: 15,
            user_agent: concat!("ccg-remap/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    #[must_use]
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Complete configuration file.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchConfig,
    pub rewrite: RewriteConfig,
    pub fetch: FetchConfig,
}

impl AppConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml)?;
        config.matching.validate()?;
        Ok(config)
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
