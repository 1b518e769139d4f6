//! Card data model as delivered by the catalog feed

use serde::{Deserialize, Deserializer, Serialize};

/// A single card from the catalog feed
///
/// Field names follow the feed's camelCase keys. Every field is optional in
/// the feed and defaults to empty whether missing or `null`; unknown keys are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Card {
    /// Display name, unique within a catalog
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,

    /// Component names of a multi-faced card (split, flip, transform)
    #[serde(deserialize_with = "null_as_default")]
    pub names: Vec<String>,

    /// Mana cost, e.g. "{1}{R}"
    #[serde(deserialize_with = "null_as_default")]
    pub mana_cost: String,

    /// Converted mana cost
    #[serde(deserialize_with = "null_as_default")]
    pub cmc: f64,

    /// Colors by full name ("White", "Blue", ...)
    #[serde(deserialize_with = "null_as_default")]
    pub colors: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub color_identity: Vec<String>,

    /// Full type line, e.g. "Legendary Creature — Elf Warrior"
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub type_line: String,

    #[serde(rename = "supertypes", deserialize_with = "null_as_default")]
    pub super_types: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub types: Vec<String>,

    #[serde(rename = "subtypes", deserialize_with = "null_as_default")]
    pub sub_types: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub rarity: String,

    /// Rules text
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,

    #[serde(deserialize_with = "null_as_default")]
    pub flavor: String,

    // Strings rather than numbers: "*", "1+*" and "X" all occur.
    #[serde(deserialize_with = "null_as_default")]
    pub power: String,
    #[serde(deserialize_with = "null_as_default")]
    pub toughness: String,

    /// Set codes this card was printed in
    #[serde(deserialize_with = "null_as_default")]
    pub printings: Vec<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub legalities: Vec<FormatLegality>,

    #[serde(deserialize_with = "null_as_default")]
    pub rulings: Vec<Ruling>,
}

/// Legality of a card in one format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatLegality {
    #[serde(deserialize_with = "null_as_default")]
    pub format: String,
    #[serde(deserialize_with = "null_as_default")]
    pub legality: String,
}

/// An official ruling on a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruling {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub text: String,
}

impl Card {
    /// Whether the card has more than one color
    pub fn is_multicolored(&self) -> bool {
        self.colors.len() > 1
    }

    /// Whether the card has several faces with their own names
    pub fn is_multi_faced(&self) -> bool {
        !self.names.is_empty()
    }
}

/// Treat an explicit `null` the same as a missing key
///
/// The feed writes `null` for absent lists and text on some cards; one such
/// card must not fail the whole document.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Deserialize::deserialize(d).map(|x: Option<T>| x.unwrap_or_default())
}

/// Single-letter short form of a color name
///
/// Only the five colors have one; anything else returns `None`.
pub fn short_color(long: &str) -> Option<char> {
    match long {
        "White" => Some('w'),
        "Blue" => Some('u'),
        "Black" => Some('b'),
        "Red" => Some('r'),
        "Green" => Some('g'),
        _ => None,
    }
}
