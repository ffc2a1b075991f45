//! Attribute extractors: derived features of a card's cost and type line.
//!
//! All functions here are total. Malformed fragments degrade to 0 or the
//! empty set rather than failing.
//!
//! ## Cost notation
//!
//! A cost expression mixes digit runs (generic cost) with single-letter
//! symbols (`W U B R G`, `C`, `X`, hybrid letters...). Braces and other
//! punctuation are ignored except that they end a digit run, so `"3RRU"` and
//! `"{3}{R}{R}{U}"` are equivalent.

use smallvec::SmallVec;

/// The colorless tag. Also stands in for every non-canonical cost letter.
pub const COLORLESS: char = 'C';

/// Variable-cost marker. Contributes nothing to a color set.
pub const VARIABLE: char = 'X';

/// The five canonical color letters.
pub const CANONICAL_COLORS: [char; 5] = ['W', 'U', 'B', 'R', 'G'];

/// Total cost value of a cost expression.
///
/// Every maximal digit run counts as its base-10 value, every alphabetic
/// character counts as 1.
///
/// ```
/// use ccg_remap::cards::cost_value;
///
/// assert_eq!(cost_value("3RRU"), 6);
/// assert_eq!(cost_value("{10}{G}"), 11);
/// assert_eq!(cost_value(""), 0);
/// ```
#[must_use]
pub fn cost_value(cost: &str) -> u32 {
    let mut total: u32 = 0;
    let mut run: Option<u32> = None;

    for ch in cost.chars() {
        if let Some(digit) = ch.to_digit(10) {
            let acc = run.unwrap_or(0);
            run = Some(acc.saturating_mul(10).saturating_add(digit));
            continue;
        }
        if let Some(value) = run.take() {
            total = total.saturating_add(value);
        }
        if ch.is_alphabetic() {
            total = total.saturating_add(1);
        }
    }

    if let Some(value) = run {
        total = total.saturating_add(value);
    }
    total
}

/// Whether a type line carries the given archetype tag anywhere.
#[must_use]
pub fn is_special_archetype(type_line: &str, special_tag: &str) -> bool {
    type_line.contains(special_tag)
}

/// Literal `power/toughness` string; missing halves render empty.
#[must_use]
pub fn power_toughness(power: Option<&str>, toughness: Option<&str>) -> String {
    format!("{}/{}", power.unwrap_or_default(), toughness.unwrap_or_default())
}

/// Numeric value of an all-digit stat, 0 for anything else (`*`, `1+*`, `-1`).
#[must_use]
pub fn stat_value(stat: &str) -> u32 {
    if stat.is_empty() || !stat.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    stat.bytes()
        .fold(0u32, |acc, b| acc.saturating_mul(10).saturating_add(u32::from(b - b'0')))
}

/// Combined power + toughness used to rank creatures.
#[must_use]
pub fn creature_score(power: Option<&str>, toughness: Option<&str>) -> u32 {
    stat_value(power.unwrap_or_default()).saturating_add(stat_value(toughness.unwrap_or_default()))
}

/// Set of single-character color tags derived from a cost expression.
///
/// Members keep the order in which they first appear in the cost, so
/// iteration is deterministic. Equality ignores order.
#[derive(Clone, Debug, Default, Eq)]
pub struct ColorSet {
    tags: SmallVec<[char; 6]>,
}

impl ColorSet {
    /// Create an empty color set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the color set of a cost expression.
    ///
    /// ```
    /// use ccg_remap::cards::ColorSet;
    ///
    /// let colors = ColorSet::from_cost("2WUB");
    /// assert_eq!(colors, ColorSet::from_tags(['W', 'U', 'B']));
    ///
    /// // X contributes nothing, other letters become colorless.
    /// assert_eq!(ColorSet::from_cost("XC"), ColorSet::from_tags(['C']));
    /// ```
    #[must_use]
    pub fn from_cost(cost: &str) -> Self {
        let mut set = Self::new();
        for ch in cost.chars() {
            if CANONICAL_COLORS.contains(&ch) {
                set.insert(ch);
            } else if ch.is_alphabetic() && ch != VARIABLE {
                set.insert(COLORLESS);
            }
        }
        set
    }

    /// Build a set from explicit tags. Duplicates collapse.
    #[must_use]
    pub fn from_tags(tags: impl IntoIterator<Item = char>) -> Self {
        let mut set = Self::new();
        for tag in tags {
            set.insert(tag);
        }
        set
    }

    /// Add a tag. Returns false if it was already present.
    pub fn insert(&mut self, tag: char) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag. Returns false if it was absent.
    pub fn remove(&mut self, tag: char) -> bool {
        match self.tags.iter().position(|&t| t == tag) {
            Some(index) => {
                self.tags.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn contains(&self, tag: char) -> bool {
        self.tags.contains(&tag)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate tags in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.tags.iter().copied()
    }

    /// Drop the colorless tag when it sits next to at least one real color.
    ///
    /// ```
    /// use ccg_remap::cards::ColorSet;
    ///
    /// let mixed = ColorSet::from_cost("2CW").without_mixed_colorless();
    /// assert_eq!(mixed, ColorSet::from_tags(['W']));
    ///
    /// let pure = ColorSet::from_cost("CC").without_mixed_colorless();
    /// assert_eq!(pure, ColorSet::from_tags(['C']));
    /// ```
    #[must_use]
    pub fn without_mixed_colorless(mut self) -> Self {
        if self.contains(COLORLESS) && self.len() > 1 {
            self.remove(COLORLESS);
        }
        self
    }

    /// One single-tag set per member, in first-seen order.
    pub fn singles(&self) -> impl Iterator<Item = ColorSet> + '_ {
        self.tags.iter().map(|&tag| ColorSet::from_tags([tag]))
    }

    /// Every tag occurs as a character somewhere in `cost`.
    ///
    /// This is literal character containment on the raw expression, not a
    /// comparison of derived color sets: a `C` tag is only satisfied by a
    /// literal `C` in the target cost.
    #[must_use]
    pub fn all_in_cost(&self, cost: &str) -> bool {
        self.tags.iter().all(|&tag| cost.contains(tag))
    }
}

impl PartialEq for ColorSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.tags.iter().all(|&t| other.contains(t))
    }
}

impl std::fmt::Display for ColorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.tags.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_value_examples() {
        assert_eq!(cost_value(""), 0);
        assert_eq!(cost_value("3RRU"), 6);
        assert_eq!(cost_value("{3}{R}{R}{U}"), 6);
        assert_eq!(cost_value("12"), 12);
        assert_eq!(cost_value("{1}{0}"), 1);
        assert_eq!(cost_value("{X}{X}{G}"), 3);
        assert_eq!(cost_value("{2/W}"), 3);
    }

    #[test]
    fn test_cost_value_saturates() {
        assert_eq!(cost_value("99999999999999999999"), u32::MAX);
    }

    #[test]
    fn test_color_set_canonical_and_colorless() {
        let colors = ColorSet::from_cost("{2}{W}{U}{B}");
        assert_eq!(colors.len(), 3);
        assert!(colors.contains('W'));
        assert!(!colors.contains(COLORLESS));

        let colorless = ColorSet::from_cost("{X}{C}{S}");
        assert_eq!(colorless, ColorSet::from_tags(['C']));

        assert!(ColorSet::from_cost("{4}").is_empty());
    }

    #[test]
    fn test_color_set_first_seen_order() {
        let colors = ColorSet::from_cost("GGWU");
        let order: Vec<char> = colors.iter().collect();
        assert_eq!(order, vec!['G', 'W', 'U']);
    }

    #[test]
    fn test_color_set_equality_ignores_order() {
        assert_eq!(ColorSet::from_tags(['W', 'U']), ColorSet::from_tags(['U', 'W']));
        assert_ne!(ColorSet::from_tags(['W']), ColorSet::from_tags(['W', 'U']));
    }

    #[test]
    fn test_color_set_display() {
        assert_eq!(ColorSet::from_cost("1RG").to_string(), "{R, G}");
        assert_eq!(ColorSet::new().to_string(), "{}");
    }

    #[test]
    fn test_all_in_cost_is_literal() {
        let colors = ColorSet::from_tags(['U', 'R']);
        assert!(colors.all_in_cost("{3}{U}{R}"));
        assert!(!colors.all_in_cost("{3}{U}"));
        assert!(ColorSet::new().all_in_cost(""));

        // Colorless only matches a literal C.
        let colorless = ColorSet::from_tags([COLORLESS]);
        assert!(!colorless.all_in_cost("{4}"));
        assert!(colorless.all_in_cost("{C}{C}"));
    }

    #[test]
    fn test_singles() {
        let singles: Vec<ColorSet> = ColorSet::from_cost("WB").singles().collect();
        assert_eq!(singles, vec![ColorSet::from_tags(['W']), ColorSet::from_tags(['B'])]);
    }

    #[test]
    fn test_special_archetype() {
        assert!(is_special_archetype("Legendary Planeswalker — Jace", "Planeswalker"));
        assert!(!is_special_archetype("Legendary Creature — Human", "Planeswalker"));
    }

    #[test]
    fn test_creature_score() {
        assert_eq!(creature_score(Some("3"), Some("4")), 7);
        assert_eq!(creature_score(Some("*"), Some("4")), 4);
        assert_eq!(creature_score(Some("1+*"), Some("-1")), 0);
        assert_eq!(creature_score(None, None), 0);
    }

    #[test]
    fn test_power_toughness_string() {
        assert_eq!(power_toughness(Some("2"), Some("5")), "2/5");
        assert_eq!(power_toughness(None, None), "/");
    }
}
