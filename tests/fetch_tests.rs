//! Catalog building tests: deck directory scan, retrying lookups, reshaping.

use std::cell::Cell;
use std::fs;
use std::time::Duration;

use ccg_remap::cards::{CardEntity, Catalog, Rarity};
use ccg_remap::error::{Error, FetchError};
use ccg_remap::fetch::{retry_with_backoff, CardSource, FetchCache};

/// Fails every other request with a 503 and retries through
/// `retry_with_backoff` without sleeping.
struct FlakySource {
    requests: Cell<u32>,
}

impl FlakySource {
    fn fetch_once(&self, name: &str) -> Result<CardEntity, FetchError> {
        let n = self.requests.get() + 1;
        self.requests.set(n);
        if n % 2 == 1 {
            return Err(FetchError::Status { name: name.to_string(), status: 503 });
        }
        if name.starts_with("Unknown") {
            return Err(FetchError::NotFound(name.to_string()));
        }
        Ok(CardEntity::new(name, "Creature — Elf", "{G}").with_rarity(Rarity::Common).with_set("m19"))
    }
}

impl CardSource for FlakySource {
    fn fetch(&self, name: &str) -> Result<CardEntity, FetchError> {
        retry_with_backoff(name, 3, Duration::from_millis(1), |_| {}, || self.fetch_once(name))
    }
}

/// Every request fails with a server error.
struct DownSource;

impl CardSource for DownSource {
    fn fetch(&self, name: &str) -> Result<CardEntity, FetchError> {
        retry_with_backoff(
            name,
            2,
            Duration::from_millis(1),
            |_| {},
            || Err(FetchError::Status { name: name.to_string(), status: 500 }),
        )
    }
}

// =============================================================================
// Fetch Cache Tests
// =============================================================================

#[test]
fn test_fill_survives_transient_failures() {
    let dir = tempfile::tempdir().unwrap();
    let decks = dir.path().join("decks");
    fs::create_dir_all(&decks).unwrap();
    fs::write(decks.join("elves.dck"), "[metadata]\nName=Elves\n[Main]\n4 Llanowar Elves|M19\n4 Elvish Mystic|M14\n").unwrap();

    let source = FlakySource { requests: Cell::new(0) };
    let catalog_path = dir.path().join("all_cards.json");
    let mut cache = FetchCache::open(&catalog_path).unwrap();
    let summary = cache.fill_from_decks(&decks, "dck", &source).unwrap();

    assert_eq!(summary.fetched, 2);
    assert_eq!(source.requests.get(), 4);

    let saved = Catalog::load(&catalog_path).unwrap();
    let names: Vec<_> = saved.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Llanowar Elves", "Elvish Mystic"]);
}

#[test]
fn test_second_fill_fetches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let decks = dir.path().join("decks");
    fs::create_dir_all(&decks).unwrap();
    fs::write(decks.join("a.dck"), "[Main]\n4 Llanowar Elves|M19\n").unwrap();
    let catalog_path = dir.path().join("all_cards.json");

    let source = FlakySource { requests: Cell::new(0) };
    FetchCache::open(&catalog_path).unwrap().fill_from_decks(&decks, "dck", &source).unwrap();
    let before = source.requests.get();

    let summary = FetchCache::open(&catalog_path)
        .unwrap()
        .fill_from_decks(&decks, "dck", &source)
        .unwrap();

    assert_eq!(summary.fetched, 0);
    assert_eq!(summary.already_cached, 1);
    assert_eq!(source.requests.get(), before);
}

#[test]
fn test_unknown_card_is_reported_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.dck"), "[Main]\n1 Unknown Card|XXX\n2 Llanowar Elves|M19\n").unwrap();

    let source = FlakySource { requests: Cell::new(0) };
    let mut cache = FetchCache::open(dir.path().join("cards.json")).unwrap();
    let summary = cache.fill_from_decks(dir.path(), "dck", &source).unwrap();

    assert_eq!(summary.not_found, vec!["Unknown Card".to_string()]);
    assert_eq!(summary.fetched, 1);
}

#[test]
fn test_exhausted_retries_stop_the_fill() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.dck"), "[Main]\n1 Opt|XLN\n").unwrap();

    let mut cache = FetchCache::open(dir.path().join("cards.json")).unwrap();
    let err = cache.fill_from_decks(dir.path(), "dck", &DownSource).unwrap_err();

    assert!(matches!(err, Error::Fetch(FetchError::RetriesExhausted { attempts: 2, .. })));
    assert!(cache.catalog().is_empty());
}

// =============================================================================
// Reshape Tests
// =============================================================================

#[test]
fn test_keyed_dump_reshapes_to_flat_catalog() {
    let keyed = r#"{
        "Shock": {"type_line": "Instant", "mana_cost": "{R}", "rarity": "common", "setCode": "M19", "oracle_text": "Shock deals 2 damage to any target."},
        "Grizzly Bears": {"type_line": "Creature — Bear", "mana_cost": "{1}{G}", "rarity": "bonus", "setCode": "M10", "power": "2", "toughness": "2"}
    }"#;

    let catalog = Catalog::from_keyed_json_str(keyed).unwrap();

    let bears = catalog.get("Grizzly Bears").unwrap();
    assert_eq!(bears.rarity, Rarity::Rare);
    assert_eq!(bears.power_toughness(), "2/2");
    assert_eq!(catalog.get("Shock").unwrap().set_code, "M19");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flat.json");
    catalog.save(&path).unwrap();
    let flat: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(flat[0]["name"], "Shock");
    assert_eq!(flat[0]["type"], "Instant");
    assert_eq!(flat[1]["name"], "Grizzly Bears");
    assert_eq!(flat[1]["manaCost"], "{1}{G}");
}
