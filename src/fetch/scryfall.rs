//! Scryfall card lookup over blocking HTTP.

use std::thread;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::retry::retry_with_backoff;
use crate::cards::{CardEntity, Rarity};
use crate::core::config::FetchConfig;
use crate::error::FetchError;

/// Something that can resolve a card name to a full record.
pub trait CardSource {
    /// Look up one card by exact name.
    fn fetch(&self, name: &str) -> Result<CardEntity, FetchError>;
}

/// Subset of a Scryfall card object.
#[derive(Debug, Clone, Deserialize)]
struct ScryfallCard {
    name: String,
    type_line: String,
    #[serde(default)]
    mana_cost: Option<String>,
    #[serde(default)]
    rarity: Option<String>,
    #[serde(default)]
    set: Option<String>,
    #[serde(default)]
    oracle_text: Option<String>,
    #[serde(default)]
    power: Option<String>,
    #[serde(default)]
    toughness: Option<String>,
}

impl From<ScryfallCard> for CardEntity {
    fn from(card: ScryfallCard) -> Self {
        let mut entity = CardEntity::new(card.name, card.type_line, card.mana_cost.unwrap_or_default())
            .with_rarity(Rarity::normalized(card.rarity.as_deref().unwrap_or_default()))
            .with_set(card.set.unwrap_or_default())
            .with_text(card.oracle_text.unwrap_or_default());
        if let (Some(power), Some(toughness)) = (card.power, card.toughness) {
            entity = entity.with_stats(power, toughness);
        }
        entity
    }
}

/// Blocking client for `GET /cards/named?exact=<name>`.
pub struct ScryfallClient {
    http_client: Client,
    config: FetchConfig,
}

impl ScryfallClient {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()?;

        Ok(Self { http_client, config })
    }

    /// One request, no retries.
    fn fetch_once(&self, name: &str) -> Result<CardEntity, FetchError> {
        let url = format!("{}/cards/named", self.config.base_url.trim_end_matches('/'));
        debug!(card = name, url = %url, "Querying Scryfall");

        let response = self.http_client.get(&url).query(&[("exact", name)]).send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        let card: ScryfallCard = response.json()?;
        Ok(card.into())
    }
}

impl CardSource for ScryfallClient {
    fn fetch(&self, name: &str) -> Result<CardEntity, FetchError> {
        retry_with_backoff(
            &format!("fetch '{name}'"),
            self.config.max_attempts,
            self.config.initial_backoff(),
            thread::sleep,
            || self.fetch_once(name),
        )
    }
}
