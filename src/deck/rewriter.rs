//! Rewrite deck files from source card names to mapped target names.
//!
//! Every input line produces exactly one output line, in order:
//! - Lines before the first header and inside `[metadata]` are copied.
//! - Headers and blank lines are copied.
//! - Card lines become `<quantity> <name>|<set>`. Basic lands keep their
//!   name and take the configured basic set code; everything else takes the
//!   mapped target name and that target's set code.

use tracing::warn;

use super::line::{section_header, CardLine, METADATA_SECTION};
use crate::cards::Catalog;
use crate::core::config::{RewriteConfig, Strictness};
use crate::error::DeckError;
use crate::mapping::MappingTable;

/// Which part of the deck file a line belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Section {
    Preamble,
    Metadata,
    Cards,
}

/// Result of rewriting one deck file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RewrittenDeck {
    /// Output lines, one per input line.
    pub lines: Vec<String>,
    /// Unmapped card lines passed through under `Strictness::Lenient`.
    pub diagnostics: Vec<DeckError>,
    /// Card lines rewritten through the mapping.
    pub mapped: usize,
    /// Basic land lines rewritten to the basic set code.
    pub basics: usize,
    trailing_newline: bool,
    crlf: bool,
}

impl RewrittenDeck {
    /// Output text with the input's line ending (`\r\n` if the input used
    /// it, `\n` otherwise) and its trailing newline if it had one.
    #[must_use]
    pub fn to_text(&self) -> String {
        let ending = if self.crlf { "\r\n" } else { "\n" };
        let mut text = self.lines.join(ending);
        if self.trailing_newline {
            text.push_str(ending);
        }
        text
    }
}

/// Applies a mapping to deck text.
///
/// ## Example
///
/// ```
/// use ccg_remap::cards::{CardEntity, Catalog};
/// use ccg_remap::core::config::RewriteConfig;
/// use ccg_remap::deck::DeckRewriter;
/// use ccg_remap::mapping::{MappingEntry, MappingTable};
///
/// let mapping = MappingTable::from_entries(vec![MappingEntry::new("Shock", "Fiery Inscription")]);
/// let target = Catalog::from_cards(vec![CardEntity::new("Fiery Inscription", "Enchantment", "{2}{R}").with_set("LTR")]);
/// let config = RewriteConfig::default();
///
/// let rewriter = DeckRewriter::new(&mapping, &config).with_target(&target);
/// let deck = rewriter.rewrite("[Main]\n4 Shock|M19\n18 Mountain|M19").unwrap();
///
/// assert_eq!(deck.lines, vec!["[Main]", "4 Fiery Inscription|LTR", "18 Mountain|LTR"]);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct DeckRewriter<'a> {
    mapping: &'a MappingTable,
    target: Option<&'a Catalog>,
    config: &'a RewriteConfig,
}

impl<'a> DeckRewriter<'a> {
    #[must_use]
    pub fn new(mapping: &'a MappingTable, config: &'a RewriteConfig) -> Self {
        Self { mapping, target: None, config }
    }

    /// Resolve set codes from the target catalog (builder pattern).
    #[must_use]
    pub fn with_target(mut self, target: &'a Catalog) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn config(&self) -> &RewriteConfig {
        self.config
    }

    /// Rewrite a whole deck file.
    ///
    /// Malformed card lines are always fatal. Unmapped names are fatal under
    /// `Strictness::Strict` and copied with a diagnostic otherwise.
    pub fn rewrite(&self, text: &str) -> Result<RewrittenDeck, DeckError> {
        let mut deck = RewrittenDeck {
            trailing_newline: text.ends_with('\n'),
            crlf: text.contains("\r\n"),
            ..RewrittenDeck::default()
        };
        let mut section = Section::Preamble;

        for (index, raw) in text.lines().enumerate() {
            let line_number = index + 1;

            if let Some(name) = section_header(raw) {
                section = if name.eq_ignore_ascii_case(METADATA_SECTION) {
                    Section::Metadata
                } else {
                    Section::Cards
                };
                deck.lines.push(raw.trim().to_string());
                continue;
            }

            if section != Section::Cards || raw.trim().is_empty() {
                deck.lines.push(raw.to_string());
                continue;
            }

            let card = CardLine::parse(raw).ok_or_else(|| DeckError::MalformedInputLine {
                line_number,
                line: raw.to_string(),
            })?;

            if self.config.is_basic(card.name) {
                deck.basics += 1;
                deck.lines
                    .push(format!("{} {}|{}", card.quantity_text, card.name, self.config.basic_set_code));
                continue;
            }

            match self.rewrite_card(&card) {
                Some(line) => {
                    deck.mapped += 1;
                    deck.lines.push(line);
                }
                None => {
                    let miss = DeckError::LookupMiss {
                        line_number,
                        line: raw.to_string(),
                        name: card.name.to_string(),
                    };
                    if self.config.strictness == Strictness::Strict {
                        return Err(miss);
                    }
                    warn!(line_number, card = card.name, "Card not found in mapping, keeping line");
                    deck.diagnostics.push(miss);
                    deck.lines.push(raw.to_string());
                }
            }
        }

        Ok(deck)
    }

    /// Mapped line for a card, or `None` if its name is not mapped.
    fn rewrite_card(&self, card: &CardLine<'_>) -> Option<String> {
        let entry = self.mapping.get(card.name)?;
        let set_code = self
            .target
            .and_then(|catalog| catalog.get(&entry.target_name))
            .map(|target| target.set_code.as_str())
            .filter(|code| !code.is_empty())
            .or(entry.set_code.as_deref())
            .unwrap_or(card.set_code);
        Some(format!("{} {}|{}", card.quantity_text, entry.target_name, set_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardEntity;
    use crate::mapping::MappingEntry;

    fn mapping() -> MappingTable {
        MappingTable::from_entries(vec![
            MappingEntry::new("Llanowar Elves", "Elven Chorus").with_set("M19"),
            MappingEntry::new("Naturalize", "Ent's Fury").with_set("M19"),
        ])
    }

    fn target() -> Catalog {
        Catalog::from_cards(vec![CardEntity::new("Elven Chorus", "Enchantment", "{3}{G}").with_set("LTR")])
    }

    const DECK: &str = "[metadata]\nName=Elves\n4 Not A Card\n[Main]\n4 Llanowar Elves|M19\n\n20 Forest|M19|2\n[Sideboard]\n2 Naturalize|M19\n";

    #[test]
    fn test_rewrite_full_deck() {
        let mapping = mapping();
        let target = target();
        let config = RewriteConfig::default();
        let deck = DeckRewriter::new(&mapping, &config)
            .with_target(&target)
            .rewrite(DECK)
            .unwrap();

        assert_eq!(
            deck.lines,
            vec![
                "[metadata]",
                "Name=Elves",
                "4 Not A Card",
                "[Main]",
                "4 Elven Chorus|LTR",
                "",
                "20 Forest|LTR",
                "[Sideboard]",
                "2 Ent's Fury|M19",
            ]
        );
        assert_eq!(deck.mapped, 2);
        assert_eq!(deck.basics, 1);
        assert!(deck.to_text().ends_with("Fury|M19\n"));
    }

    #[test]
    fn test_set_code_falls_back_to_line() {
        let mapping = MappingTable::from_entries(vec![MappingEntry::new("Opt", "Palantir")]);
        let config = RewriteConfig::default();
        let deck = DeckRewriter::new(&mapping, &config).rewrite("[Main]\n1 Opt|XLN").unwrap();

        assert_eq!(deck.lines[1], "1 Palantir|XLN");
        assert_eq!(deck.to_text(), "[Main]\n1 Palantir|XLN");
    }

    #[test]
    fn test_strict_lookup_miss() {
        let mapping = mapping();
        let config = RewriteConfig::default();
        let err = DeckRewriter::new(&mapping, &config)
            .rewrite("[Main]\n1 Unknown Card|ABC")
            .unwrap_err();

        assert_eq!(
            err,
            DeckError::LookupMiss {
                line_number: 2,
                line: "1 Unknown Card|ABC".to_string(),
                name: "Unknown Card".to_string(),
            }
        );
    }

    #[test]
    fn test_lenient_lookup_miss_passes_through() {
        let mapping = mapping();
        let config = RewriteConfig::default().with_strictness(Strictness::Lenient);
        let deck = DeckRewriter::new(&mapping, &config)
            .rewrite("[Main]\n1 Unknown Card|ABC\n4 Naturalize|M19")
            .unwrap();

        assert_eq!(deck.lines, vec!["[Main]", "1 Unknown Card|ABC", "4 Ent's Fury|M19"]);
        assert_eq!(deck.diagnostics.len(), 1);
    }

    #[test]
    fn test_malformed_line_always_fatal() {
        let mapping = mapping();
        let config = RewriteConfig::default().with_strictness(Strictness::Lenient);
        let err = DeckRewriter::new(&mapping, &config)
            .rewrite("[Main]\n4 Naturalize|M19\nfour Forest|LTR")
            .unwrap_err();

        assert!(matches!(err, DeckError::MalformedInputLine { line_number: 3, .. }));
    }

    #[test]
    fn test_quantity_written_as_given() {
        let mapping = mapping();
        let config = RewriteConfig::default();
        let deck = DeckRewriter::new(&mapping, &config)
            .rewrite("[Main]\n04 Llanowar Elves|M19\n+20 Forest|M19")
            .unwrap();

        assert_eq!(deck.lines[1], "04 Elven Chorus|M19");
        assert_eq!(deck.lines[2], "+20 Forest|LTR");
    }

    #[test]
    fn test_crlf_line_endings_kept() {
        let mapping = mapping();
        let config = RewriteConfig::default();
        let deck = DeckRewriter::new(&mapping, &config)
            .rewrite("[metadata]\r\nName=Elves\r\n[Main]\r\n4 Llanowar Elves|M19\r\n")
            .unwrap();

        assert_eq!(deck.lines[3], "4 Elven Chorus|M19");
        assert_eq!(deck.to_text(), "[metadata]\r\nName=Elves\r\n[Main]\r\n4 Elven Chorus|M19\r\n");
    }

    #[test]
    fn test_basic_land_ignores_mapping() {
        let mapping = MappingTable::from_entries(vec![MappingEntry::new("Island", "Something Else")]);
        let config = RewriteConfig::default().with_basic_set_code("PLST");
        let deck = DeckRewriter::new(&mapping, &config).rewrite("[Main]\n17 Island|DOM").unwrap();

        assert_eq!(deck.lines[1], "17 Island|PLST");
    }
}
