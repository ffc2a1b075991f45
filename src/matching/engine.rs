//! The matching engine: one pass over the source catalog.
//!
//! For each source entity, in catalog order, the engine builds a
//! `MatchContext`, tries the entity's strategy list, and either records a
//! `MappingEntry` or handles the miss according to `FailurePolicy`. The
//! target catalog is only ever read.

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::stats::MatchStats;
use super::strategy::{Candidate, MatchContext};
use crate::cards::{CardEntity, Catalog};
use crate::core::config::{FailurePolicy, MatchConfig};
use crate::error::MatchError;
use crate::mapping::{MappingEntry, MappingTable};

/// Outcome of a matching run.
///
/// Under `FailurePolicy::Abort` the run stops at the first miss: `mapping`
/// holds everything matched before it, `unmatched` holds that one miss and
/// `aborted` is set. Under `FailurePolicy::Skip` every miss is collected and
/// the run always completes.
#[derive(Clone, Debug, Default)]
pub struct MatchReport {
    pub mapping: MappingTable,
    pub unmatched: Vec<MatchError>,
    pub aborted: bool,
    pub stats: MatchStats,
}

impl MatchReport {
    /// Whether every source entity was matched.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unmatched.is_empty()
    }

    /// The mapping, or the miss that stopped an aborted run.
    pub fn into_result(self) -> Result<MappingTable, MatchError> {
        match (self.aborted, self.unmatched.into_iter().next()) {
            (true, Some(err)) => Err(err),
            _ => Ok(self.mapping),
        }
    }
}

/// Greedy, order-dependent matcher from a source catalog onto a target catalog.
///
/// ## Example
///
/// ```
/// use ccg_remap::cards::{CardEntity, Catalog, Rarity};
/// use ccg_remap::core::config::MatchConfig;
/// use ccg_remap::matching::MatchEngine;
///
/// let target = Catalog::from_cards(vec![
///     CardEntity::new("Samwise", "Creature — Halfling", "{1}{W}")
///         .with_rarity(Rarity::Common)
///         .with_stats("2", "2")
///         .with_set("LTR"),
/// ]);
/// let source = Catalog::from_cards(vec![
///     CardEntity::new("Grizzly Bears", "Creature — Bear", "{1}{G}")
///         .with_rarity(Rarity::Common)
///         .with_stats("2", "2")
///         .with_set("M10"),
/// ]);
///
/// let engine = MatchEngine::new(&target, MatchConfig::default());
/// let mapping = engine.run(&source).into_result().unwrap();
///
/// assert_eq!(mapping.get("Grizzly Bears").unwrap().target_name, "Samwise");
/// ```
#[derive(Clone, Debug)]
pub struct MatchEngine<'a> {
    target: &'a Catalog,
    config: MatchConfig,
}

impl<'a> MatchEngine<'a> {
    /// Create an engine over a target catalog.
    #[must_use]
    pub fn new(target: &'a Catalog, config: MatchConfig) -> Self {
        Self { target, config }
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find a target for a single source entity.
    pub fn match_entity(&self, source: &CardEntity) -> Result<Candidate<'a>, MatchError> {
        let ctx = MatchContext::new(source, self.target, &self.config);

        for &strategy in ctx.strategies() {
            if let Some(candidate) = strategy.attempt(&ctx) {
                return Ok(candidate);
            }
        }

        Err(unmatched_error(&ctx))
    }

    /// Match every source entity in order.
    pub fn run(&self, source: &Catalog) -> MatchReport {
        let mut report = MatchReport::default();
        let mut seen: FxHashSet<&str> = FxHashSet::default();

        info!(
            sources = source.len(),
            targets = self.target.len(),
            acceptance = ?self.config.acceptance,
            on_unmatched = ?self.config.on_unmatched,
            "Matching source catalog"
        );

        for card in source {
            report.stats.sources_seen += 1;
            if !seen.insert(card.name.as_str()) {
                debug!(source = %card.name, "Source already mapped, skipping repeat");
                report.stats.duplicates_skipped += 1;
                continue;
            }

            match self.match_entity(card) {
                Ok(candidate) => {
                    report.stats.record_match(candidate.strategy);
                    let mut entry = MappingEntry::new(&card.name, &candidate.card.name);
                    if self.config.emit_set_code {
                        entry = entry.with_set(&card.set_code);
                    }
                    report.mapping.insert(entry);
                }
                Err(err) => {
                    report.stats.unmatched += 1;
                    warn!(source = %card.name, error = %err, "No match found");
                    report.unmatched.push(err);
                    if self.config.on_unmatched == FailurePolicy::Abort {
                        report.aborted = true;
                        break;
                    }
                }
            }
        }

        info!(
            matched = report.stats.matched,
            unmatched = report.stats.unmatched,
            aborted = report.aborted,
            "Matching finished"
        );
        report
    }
}

fn unmatched_error(ctx: &MatchContext<'_, '_>) -> MatchError {
    if ctx.is_special() {
        return MatchError::UnmatchedSpecialEntity {
            name: ctx.source.name.clone(),
            colors: ctx.special_colors.clone(),
        };
    }
    MatchError::UnmatchedOrdinaryEntity {
        name: ctx.source.name.clone(),
        type_line: ctx.source.type_line.clone(),
        cost_value: ctx.cost_value,
        rarity: ctx.source.rarity,
        power_toughness: ctx.power_toughness.clone(),
        colors: ctx.colors.clone(),
        final_fuzziness: ctx.fuzziness_levels().last().copied().unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ColorSet, Rarity};
    use crate::matching::Strategy;

    fn target() -> Catalog {
        Catalog::from_cards(vec![
            CardEntity::new("Eowyn", "Legendary Creature — Human Knight", "{2}{W}{W}")
                .with_rarity(Rarity::Mythic)
                .with_stats("3", "4")
                .with_set("LTR"),
            CardEntity::new("Rohirrim", "Creature — Human Knight", "{1}{W}")
                .with_rarity(Rarity::Common)
                .with_stats("2", "1")
                .with_set("LTR"),
            CardEntity::new("Witch-king", "Creature — Wraith Noble", "{3}{B}{B}")
                .with_rarity(Rarity::Mythic)
                .with_stats("5", "3")
                .with_set("LTR"),
        ])
    }

    #[test]
    fn test_ordinary_exact_match() {
        let target = target();
        let engine = MatchEngine::new(&target, MatchConfig::default());
        let knight = CardEntity::new("Knight", "Creature — Human Knight", "{1}{W}")
            .with_rarity(Rarity::Common)
            .with_stats("2", "1");

        let candidate = engine.match_entity(&knight).unwrap();
        assert_eq!(candidate.card.name, "Rohirrim");
        assert_eq!(candidate.strategy, Strategy::Relaxation);
        assert_eq!(candidate.fuzziness, Some(0.8));
    }

    #[test]
    fn test_special_entity_uses_creature_ranker() {
        let target = target();
        let engine = MatchEngine::new(&target, MatchConfig::default());
        let walker = CardEntity::new("Liliana", "Legendary Planeswalker — Liliana", "{3}{B}{B}");

        let candidate = engine.match_entity(&walker).unwrap();
        assert_eq!(candidate.card.name, "Witch-king");
        assert_eq!(candidate.strategy, Strategy::SpecialFullColors);
    }

    #[test]
    fn test_unmatched_special_reports_colors() {
        let target = target();
        let engine = MatchEngine::new(&target, MatchConfig::default());
        let walker = CardEntity::new("Chandra", "Legendary Planeswalker — Chandra", "{2}{R}{C}");

        let err = engine.match_entity(&walker).unwrap_err();
        assert_eq!(
            err,
            MatchError::UnmatchedSpecialEntity {
                name: "Chandra".to_string(),
                colors: ColorSet::from_tags(['R']),
            }
        );
    }

    #[test]
    fn test_abort_stops_run() {
        let target = target();
        let source = Catalog::from_cards(vec![
            CardEntity::new("Knight", "Creature — Human Knight", "{1}{W}")
                .with_rarity(Rarity::Common)
                .with_stats("2", "1"),
            CardEntity::new("Chandra", "Legendary Planeswalker — Chandra", "{R}"),
            CardEntity::new("Squire", "Creature — Human Knight", "{1}{W}")
                .with_rarity(Rarity::Common)
                .with_stats("2", "1"),
        ]);
        let engine = MatchEngine::new(&target, MatchConfig::default());

        let report = engine.run(&source);
        assert!(report.aborted);
        assert_eq!(report.mapping.len(), 1);
        assert_eq!(report.stats.sources_seen, 2);
        assert_eq!(report.unmatched[0].entity_name(), "Chandra");
        assert!(report.into_result().is_err());
    }

    #[test]
    fn test_skip_continues_run() {
        let target = target();
        let source = Catalog::from_cards(vec![
            CardEntity::new("Chandra", "Legendary Planeswalker — Chandra", "{R}"),
            CardEntity::new("Squire", "Creature — Human Knight", "{1}{W}")
                .with_rarity(Rarity::Common)
                .with_stats("2", "1"),
        ]);
        let config = MatchConfig::default().with_failure_policy(FailurePolicy::Skip);
        let engine = MatchEngine::new(&target, config);

        let report = engine.run(&source);
        assert!(!report.aborted);
        assert!(!report.is_complete());
        assert_eq!(report.mapping.len(), 1);
        assert_eq!(report.stats.unmatched, 1);
        assert_eq!(report.into_result().unwrap().len(), 1);
    }

    #[test]
    fn test_set_code_emission() {
        let target = target();
        let source = Catalog::from_cards(vec![CardEntity::new("Knight", "Creature — Human Knight", "{1}{W}")
            .with_rarity(Rarity::Common)
            .with_stats("2", "1")
            .with_set("DOM")]);

        let with = MatchEngine::new(&target, MatchConfig::default()).run(&source);
        assert_eq!(with.mapping.get("Knight").unwrap().set_code.as_deref(), Some("DOM"));

        let without = MatchEngine::new(&target, MatchConfig::default().with_set_codes(false)).run(&source);
        assert_eq!(without.mapping.get("Knight").unwrap().set_code, None);
    }

    #[test]
    fn test_duplicate_source_names_mapped_once() {
        let target = target();
        let knight = CardEntity::new("Knight", "Creature — Human Knight", "{1}{W}")
            .with_rarity(Rarity::Common)
            .with_stats("2", "1");
        let source = Catalog::from_cards(vec![knight.clone(), knight]);

        let report = MatchEngine::new(&target, MatchConfig::default()).run(&source);
        assert_eq!(report.mapping.len(), 1);
        assert_eq!(report.stats.duplicates_skipped, 1);
    }
}
