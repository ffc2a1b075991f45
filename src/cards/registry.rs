//! Ordered card catalog with name lookup.
//!
//! A `Catalog` keeps records in input order; the matcher's tie-breaks depend
//! on that order, so nothing here ever sorts or deduplicates the records.

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{CardEntity, Rarity};
use crate::error::Result;

/// Ordered, read-only collection of card entities.
///
/// ## Example
///
/// ```
/// use ccg_remap::cards::{Catalog, CardEntity};
///
/// let catalog = Catalog::from_cards(vec![
///     CardEntity::new("Shock", "Instant", "R"),
///     CardEntity::new("Opt", "Instant", "U"),
/// ]);
///
/// assert_eq!(catalog.len(), 2);
/// assert_eq!(catalog.get("Opt").unwrap().cost, "U");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    cards: Vec<CardEntity>,
    by_name: FxHashMap<String, usize>,
}

impl Catalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records, keeping their order.
    #[must_use]
    pub fn from_cards(cards: Vec<CardEntity>) -> Self {
        let mut catalog = Self::new();
        for card in cards {
            catalog.push(card);
        }
        catalog
    }

    /// Parse a flat JSON list of records.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cards: Vec<CardEntity> = serde_json::from_str(json)?;
        Ok(Self::from_cards(cards))
    }

    /// Parse a name-keyed JSON object of remote records into a flat catalog.
    ///
    /// Records use the remote field names (`type_line`, `mana_cost`,
    /// `oracle_text`); the object key becomes the card name. Output order is
    /// the order the keys appear in the document.
    pub fn from_keyed_json_str(json: &str) -> Result<Self> {
        let records: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let cards = records
            .into_iter()
            .map(|(name, value)| Ok(serde_json::from_value::<KeyedRecord>(value)?.into_entity(name)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_cards(cards))
    }

    /// Load a flat JSON catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Write the catalog as a pretty-printed flat JSON list.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.cards)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Append a record.
    ///
    /// Name lookup resolves to the first record with a given name.
    pub fn push(&mut self, card: CardEntity) {
        let index = self.cards.len();
        self.by_name.entry(card.name.clone()).or_insert(index);
        self.cards.push(card);
    }

    /// Look up a record by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CardEntity> {
        self.by_name.get(name).map(|&index| &self.cards[index])
    }

    /// Check if a name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate records in input order.
    pub fn iter(&self) -> impl Iterator<Item = &CardEntity> {
        self.cards.iter()
    }

    /// Records in input order.
    #[must_use]
    pub fn as_slice(&self) -> &[CardEntity] {
        &self.cards
    }

    /// Find records matching a predicate, in input order.
    pub fn find<F>(&self, predicate: F) -> impl Iterator<Item = &CardEntity>
    where
        F: Fn(&CardEntity) -> bool,
    {
        self.cards.iter().filter(move |c| predicate(c))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CardEntity;
    type IntoIter = std::slice::Iter<'a, CardEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// A record as returned by the remote card API, keyed by name.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KeyedRecord {
    type_line: Option<String>,
    mana_cost: Option<String>,
    rarity: Option<String>,
    #[serde(rename = "setCode", alias = "set")]
    set_code: Option<String>,
    oracle_text: Option<String>,
    power: Option<String>,
    toughness: Option<String>,
}

impl KeyedRecord {
    fn into_entity(self, name: String) -> CardEntity {
        CardEntity {
            name,
            type_line: self.type_line.unwrap_or_default(),
            cost: self.mana_cost.unwrap_or_default(),
            rarity: Rarity::normalized(self.rarity.as_deref().unwrap_or_default()),
            power: self.power.filter(|s| !s.is_empty()),
            toughness: self.toughness.filter(|s| !s.is_empty()),
            set_code: self.set_code.unwrap_or_default(),
            text: self.oracle_text.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let catalog = Catalog::from_cards(vec![
            CardEntity::new("B", "Instant", "U"),
            CardEntity::new("A", "Instant", "U"),
            CardEntity::new("C", "Instant", "U"),
        ]);

        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_lookup_first_duplicate_wins() {
        let catalog = Catalog::from_cards(vec![
            CardEntity::new("Dup", "Instant", "U").with_set("ONE"),
            CardEntity::new("Dup", "Instant", "U").with_set("TWO"),
        ]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Dup").unwrap().set_code, "ONE");
        assert!(catalog.contains("Dup"));
        assert!(!catalog.contains("Missing"));
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"[
            {"name": "Frodo", "type": "Legendary Creature — Halfling", "manaCost": "{W}",
             "rarity": "uncommon", "setCode": "LTR", "power": "1", "toughness": "2"},
            {"name": "The One Ring", "type": "Legendary Artifact", "manaCost": "{4}",
             "rarity": "mythic", "setCode": "LTR"}
        ]"#;
        let catalog = Catalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.as_slice()[0].name, "Frodo");
        assert_eq!(catalog.get("The One Ring").unwrap().rarity, Rarity::Mythic);
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(Catalog::from_json_str("{not json").is_err());
    }

    #[test]
    fn test_from_keyed_json_str() {
        let json = r#"{
            "Lightning Bolt": {"type_line": "Instant", "mana_cost": "{R}", "rarity": "common",
                               "setCode": "M10", "oracle_text": "Deal 3.", "power": "", "toughness": ""},
            "Ancestral Recall": {"type_line": "Instant", "mana_cost": "{U}", "rarity": "bonus"}
        }"#;
        let catalog = Catalog::from_keyed_json_str(json).unwrap();

        let bolt = catalog.get("Lightning Bolt").unwrap();
        assert_eq!(bolt.cost, "{R}");
        assert_eq!(bolt.text, "Deal 3.");
        assert_eq!(bolt.power, None);

        let recall = catalog.get("Ancestral Recall").unwrap();
        assert_eq!(recall.rarity, Rarity::Rare);
        assert_eq!(recall.set_code, "");
    }

    #[test]
    fn test_from_keyed_json_str_keeps_document_order() {
        let json = r#"{
            "Zebra Unicorn": {"type_line": "Creature — Unicorn", "mana_cost": "{2}{W}"},
            "Apple Tree": {"type_line": "Artifact", "mana_cost": "{1}"},
            "Mule": {"type_line": "Creature — Horse", "mana_cost": "{G}"}
        }"#;
        let catalog = Catalog::from_keyed_json_str(json).unwrap();

        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Zebra Unicorn", "Apple Tree", "Mule"]);
    }

    #[test]
    fn test_from_keyed_json_str_rejects_bad_record() {
        assert!(Catalog::from_keyed_json_str(r#"{"Opt": {"mana_cost": 7}}"#).is_err());
    }

    #[test]
    fn test_find_with_predicate() {
        let catalog = Catalog::from_cards(vec![
            CardEntity::new("Cheap", "Instant", "R"),
            CardEntity::new("Expensive", "Sorcery", "5RR"),
        ]);

        let costly: Vec<_> = catalog.find(|c| c.cost_value() > 3).collect();
        assert_eq!(costly.len(), 1);
        assert_eq!(costly[0].name, "Expensive");
    }
}
