//! Candidate rankers: pick one target out of a filtered catalog.
//!
//! Both rankers scan in catalog order and keep the first candidate with a
//! strictly higher score, so ties always go to the earliest record.
//!
//! Color requirements are checked by literal character containment in the
//! target's cost expression (`ColorSet::all_in_cost`), not by comparing
//! derived color sets.

use crate::cards::{creature_score, CardEntity, Catalog, ColorSet, Rarity};

/// Strongest target of an archetype that carries every requested color.
///
/// Tiers are searched mythic, then rare, then uncommon; the first tier with
/// any qualifying record decides the result even if a lower tier holds a
/// higher-scoring one. Within a tier the score is power + toughness when
/// `archetype_prefix` is the creature tag, otherwise every candidate scores
/// 0 and the first one wins.
#[must_use]
pub fn best_by_archetype_and_color<'a>(
    catalog: &'a Catalog,
    colors: &ColorSet,
    archetype_prefix: &str,
    creature_tag: &str,
) -> Option<&'a CardEntity> {
    let scored = archetype_prefix.starts_with(creature_tag);

    Rarity::PRIORITY.iter().find_map(|&tier| {
        let mut best: Option<(&CardEntity, u32)> = None;
        for card in catalog.find(|c| {
            c.rarity == tier && c.type_line.starts_with(archetype_prefix) && colors.all_in_cost(&c.cost)
        }) {
            let score = if scored {
                creature_score(card.power.as_deref(), card.toughness.as_deref())
            } else {
                0
            };
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((card, score));
            }
        }
        best.map(|(card, _)| card)
    })
}

/// Highest cost-value target carrying every requested color.
#[must_use]
pub fn best_by_color_and_max_cost<'a>(catalog: &'a Catalog, colors: &ColorSet) -> Option<&'a CardEntity> {
    let mut best: Option<(&CardEntity, u32)> = None;
    for card in catalog.find(|c| colors.all_in_cost(&c.cost)) {
        let value = card.cost_value();
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((card, value));
        }
    }
    best.map(|(card, _)| card)
}
