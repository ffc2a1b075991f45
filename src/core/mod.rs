//! Shared configuration for the matching, rewriting and fetching stages.

pub mod config;

pub use config::{
    AcceptancePolicy, AppConfig, FailurePolicy, FetchConfig, MatchConfig, RewriteConfig, Strictness,
};
