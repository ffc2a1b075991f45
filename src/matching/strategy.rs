//! Named matching strategies and the relaxation loop.
//!
//! Every source entity is run through an ordered list of strategies; the
//! first one that yields a target wins. Special-archetype entities use
//! `Strategy::SPECIAL`, everything else `Strategy::ORDINARY`.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::rankers::{best_by_archetype_and_color, best_by_color_and_max_cost};
use super::similarity::{rarity_compatible, text_similar};
use crate::cards::{is_special_archetype, CardEntity, Catalog, ColorSet};
use crate::core::config::{AcceptancePolicy, MatchConfig};

/// Levels at or below this count as zero fuzziness.
const FUZZINESS_EPSILON: f64 = 1e-9;

/// One step of the per-entity decision procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Strongest creature carrying the full (reduced) color set.
    SpecialFullColors,
    /// Strongest creature carrying any single color of a multicolor set.
    SpecialSingleColor,
    /// Fuzziness relaxation over type, rarity, power/toughness and cost.
    Relaxation,
    /// First rarity-compatible creature.
    AnyCreature,
    /// Highest-cost target of the source's colors, for expensive sources.
    HighCostByColor,
}

impl Strategy {
    /// Strategies for special-archetype entities, in order.
    pub const SPECIAL: [Strategy; 2] = [Strategy::SpecialFullColors, Strategy::SpecialSingleColor];

    /// Strategies for ordinary entities, in order.
    pub const ORDINARY: [Strategy; 3] = [Strategy::Relaxation, Strategy::AnyCreature, Strategy::HighCostByColor];

    /// All strategies, for stats tables.
    pub const ALL: [Strategy; 5] = [
        Strategy::SpecialFullColors,
        Strategy::SpecialSingleColor,
        Strategy::Relaxation,
        Strategy::AnyCreature,
        Strategy::HighCostByColor,
    ];

    /// Stable label for logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::SpecialFullColors => "special-full-colors",
            Strategy::SpecialSingleColor => "special-single-color",
            Strategy::Relaxation => "relaxation",
            Strategy::AnyCreature => "any-creature",
            Strategy::HighCostByColor => "high-cost-by-color",
        }
    }

    /// Position in `Strategy::ALL`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Run this strategy for one source entity.
    #[must_use]
    pub fn attempt<'t>(self, ctx: &MatchContext<'_, 't>) -> Option<Candidate<'t>> {
        let creature = ctx.config.creature_tag.as_str();
        let found = match self {
            Strategy::SpecialFullColors => {
                best_by_archetype_and_color(ctx.target, &ctx.special_colors, creature, creature)
                    .map(|card| (card, None))
            }
            Strategy::SpecialSingleColor => {
                if ctx.special_colors.len() <= 1 {
                    return None;
                }
                ctx.special_colors
                    .singles()
                    .find_map(|single| best_by_archetype_and_color(ctx.target, &single, creature, creature))
                    .map(|card| (card, None))
            }
            Strategy::Relaxation => ctx
                .fuzziness_levels()
                .into_iter()
                .find_map(|level| relaxation_pass(ctx, level).map(|card| (card, Some(level)))),
            Strategy::AnyCreature => ctx
                .target
                .iter()
                .find(|card| card.type_line.contains(creature) && ctx.rarity_matches(card))
                .map(|card| (card, None)),
            Strategy::HighCostByColor => {
                if ctx.cost_value <= ctx.config.high_cost_threshold {
                    return None;
                }
                best_by_color_and_max_cost(ctx.target, &ctx.colors).map(|card| (card, None))
            }
        };

        let (card, fuzziness) = found?;
        debug!(
            source = %ctx.source.name,
            target = %card.name,
            strategy = self.name(),
            fuzziness,
            "Strategy accepted candidate"
        );
        Some(Candidate { card, strategy: self, fuzziness })
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A target picked for a source entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<'a> {
    pub card: &'a CardEntity,
    /// Strategy that produced the pick.
    pub strategy: Strategy,
    /// Fuzziness level of the accepting pass, for relaxation matches.
    pub fuzziness: Option<f64>,
}

/// Everything the strategies need about one source entity, derived once.
#[derive(Clone, Debug)]
pub struct MatchContext<'c, 't> {
    pub source: &'c CardEntity,
    pub target: &'t Catalog,
    pub config: &'c MatchConfig,
    /// Source cost value.
    pub cost_value: u32,
    /// Source power/toughness slash string.
    pub power_toughness: String,
    /// Source color set as extracted.
    pub colors: ColorSet,
    /// Source color set with mixed colorless dropped (special path).
    pub special_colors: ColorSet,
}

impl<'c, 't> MatchContext<'c, 't> {
    #[must_use]
    pub fn new(source: &'c CardEntity, target: &'t Catalog, config: &'c MatchConfig) -> Self {
        let colors = source.colors();
        Self {
            source,
            target,
            config,
            cost_value: source.cost_value(),
            power_toughness: source.power_toughness(),
            special_colors: colors.clone().without_mixed_colorless(),
            colors,
        }
    }

    /// Whether the source takes the special-archetype path.
    #[must_use]
    pub fn is_special(&self) -> bool {
        is_special_archetype(&self.source.type_line, &self.config.special_tag)
    }

    /// Strategies to try, in order.
    #[must_use]
    pub fn strategies(&self) -> &'static [Strategy] {
        if self.is_special() {
            &Strategy::SPECIAL
        } else {
            &Strategy::ORDINARY
        }
    }

    /// Fuzziness levels of the relaxation loop, highest first.
    #[must_use]
    pub fn fuzziness_levels(&self) -> Vec<f64> {
        fuzziness_levels(self.config.initial_fuzziness, self.config.fuzziness_step)
    }

    fn rarity_matches(&self, card: &CardEntity) -> bool {
        rarity_compatible(self.source.rarity.as_str(), card.rarity)
    }
}

/// Relaxation thresholds from `initial` down by `step`, all strictly positive.
///
/// Levels are computed as `initial - k·step` rather than by repeated
/// subtraction so float drift never adds a pass at a level of ~0.
///
/// ```
/// use ccg_remap::matching::fuzziness_levels;
///
/// let levels = fuzziness_levels(0.8, 0.1);
/// assert_eq!(levels.len(), 8);
/// assert!((levels[7] - 0.1).abs() < 1e-9);
/// ```
#[must_use]
pub fn fuzziness_levels(initial: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) {
        return if initial > FUZZINESS_EPSILON { vec![initial] } else { Vec::new() };
    }
    (0u32..)
        .map(|k| initial - f64::from(k) * step)
        .take_while(|&level| level > FUZZINESS_EPSILON)
        .collect()
}

/// One full scan of the target catalog at a fixed fuzziness.
fn relaxation_pass<'t>(ctx: &MatchContext<'_, 't>, fuzziness: f64) -> Option<&'t CardEntity> {
    trace!(source = %ctx.source.name, fuzziness, "Relaxation pass");
    let mut fallback: Option<(&'t CardEntity, u32)> = None;

    for card in ctx.target {
        let similar = text_similar(&ctx.source.type_line, &card.type_line, fuzziness)
            && ctx.rarity_matches(card)
            && text_similar(&ctx.power_toughness, &card.power_toughness(), fuzziness);
        if !similar {
            continue;
        }

        let value = card.cost_value();
        if value == ctx.cost_value {
            return Some(card);
        }
        if ctx.config.acceptance == AcceptancePolicy::CostRelaxed
            && fallback.map_or(true, |(_, top)| value > top)
        {
            fallback = Some((card, value));
        }
    }

    fallback.map(|(card, _)| card)
}
