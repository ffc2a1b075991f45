//! Card entities - immutable catalog records.
//!
//! `CardEntity` holds the attributes the matcher compares: type line, mana
//! cost expression, rarity and power/toughness. The field names on the wire
//! follow the flat catalog JSON (`type`, `manaCost`, `setCode`).

use serde::{Deserialize, Deserializer, Serialize};

use super::attributes::{cost_value, power_toughness, ColorSet};

/// Rarity tier of a card.
///
/// Anything outside the four canonical tiers (`special`, `bonus`, empty, ...)
/// normalizes to `Rare`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    #[default]
    Rare,
    Mythic,
}

impl Rarity {
    /// Tier order used by the archetype ranker: best first.
    pub const PRIORITY: [Rarity; 3] = [Rarity::Mythic, Rarity::Rare, Rarity::Uncommon];

    /// Normalize a raw rarity string.
    ///
    /// ```
    /// use ccg_remap::cards::Rarity;
    ///
    /// assert_eq!(Rarity::normalized("mythic"), Rarity::Mythic);
    /// assert_eq!(Rarity::normalized("special"), Rarity::Rare);
    /// ```
    #[must_use]
    pub fn normalized(raw: &str) -> Self {
        match raw {
            "common" => Rarity::Common,
            "uncommon" => Rarity::Uncommon,
            "mythic" => Rarity::Mythic,
            _ => Rarity::Rare,
        }
    }

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }
}

impl std::fmt::Display for Rarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Rarity {
    fn from(raw: &str) -> Self {
        Self::normalized(raw)
    }
}

impl<'de> Deserialize<'de> for Rarity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(Rarity::normalized(raw.as_deref().unwrap_or_default()))
    }
}

/// Treat JSON `null` the same as a missing string.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Treat an empty string the same as a missing value.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

/// A single catalog record.
///
/// ## Example
///
/// ```
/// use ccg_remap::cards::{CardEntity, Rarity};
///
/// let bear = CardEntity::new("Grizzly Bears", "Creature — Bear", "1G")
///     .with_rarity(Rarity::Common)
///     .with_stats("2", "2");
///
/// assert_eq!(bear.cost_value(), 2);
/// assert_eq!(bear.power_toughness(), "2/2");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntity {
    /// Card name, unique within a catalog by convention.
    pub name: String,

    /// Free-text type line, e.g. `"Legendary Creature — Human Wizard"`.
    #[serde(rename = "type", default, deserialize_with = "null_as_empty")]
    pub type_line: String,

    /// Compact cost notation, e.g. `"3RRU"` or `"{3}{R}{R}{U}"`.
    #[serde(rename = "manaCost", default, deserialize_with = "null_as_empty")]
    pub cost: String,

    /// Normalized rarity tier.
    #[serde(default)]
    pub rarity: Rarity,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub power: Option<String>,

    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub toughness: Option<String>,

    /// Set the card was printed in.
    #[serde(rename = "setCode", default, deserialize_with = "null_as_empty")]
    pub set_code: String,

    /// Rules text. Carried for round-tripping; never compared.
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl CardEntity {
    /// Create an entity with the given name, type line and cost.
    #[must_use]
    pub fn new(name: impl Into<String>, type_line: impl Into<String>, cost: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_line: type_line.into(),
            cost: cost.into(),
            rarity: Rarity::default(),
            power: None,
            toughness: None,
            set_code: String::new(),
            text: String::new(),
        }
    }

    /// Set the rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Set power and toughness (builder pattern).
    #[must_use]
    pub fn with_stats(mut self, power: impl Into<String>, toughness: impl Into<String>) -> Self {
        self.power = Some(power.into());
        self.toughness = Some(toughness.into());
        self
    }

    /// Set the set code (builder pattern).
    #[must_use]
    pub fn with_set(mut self, set_code: impl Into<String>) -> Self {
        self.set_code = set_code.into();
        self
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Derived cost value of this entity.
    #[must_use]
    pub fn cost_value(&self) -> u32 {
        cost_value(&self.cost)
    }

    /// Derived color set of this entity.
    #[must_use]
    pub fn colors(&self) -> ColorSet {
        ColorSet::from_cost(&self.cost)
    }

    /// Literal `"power/toughness"` string used for similarity comparison.
    #[must_use]
    pub fn power_toughness(&self) -> String {
        power_toughness(self.power.as_deref(), self.toughness.as_deref())
    }
}
