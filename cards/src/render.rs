//! Display helpers for query results
//!
//! Produces the short title, one-line description and markdown body a chat
//! front end shows for each hit.

use url::form_urlencoded;

use crate::card::Card;

/// How many hits a front end should show for one query
pub const MAX_RESULTS: usize = 10;

/// Maximum description length in characters, ellipsis included
pub const MAX_DESCRIPTION: usize = 100;

const IMAGE_URL: &str = "https://api.scryfall.com/cards/named/";

/// Rendered view of a single card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    /// Name followed by the card types, e.g. `Shock [Instant]`
    pub title: String,

    /// Rules text cut to `MAX_DESCRIPTION`
    pub description: String,

    /// Markdown message: bold name, cost, rules text and an image link
    pub body: String,
}

impl CardSummary {
    pub fn from_card(card: &Card) -> Self {
        Self {
            title: format!("{} [{}]", card.name, card.types.join(" ")),
            description: truncate_description(&card.text),
            body: format!("*{}* {}\n{}\n{}", card.name, card.mana_cost, card.text, image_url(&card.name)),
        }
    }
}

/// Link to a rendered image of the named card
pub fn image_url(name: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(name.as_bytes()).collect();
    format!("{IMAGE_URL}?exact={encoded}&format=image")
}

fn truncate_description(text: &str) -> String {
    if text.chars().count() <= MAX_DESCRIPTION {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_DESCRIPTION - 3).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shock() -> Card {
        Card {
            name: "Shock".to_string(),
            mana_cost: "{R}".to_string(),
            types: vec!["Instant".to_string()],
            text: "Shock deals 2 damage to any target.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_summary() {
        let summary = CardSummary::from_card(&shock());
        assert_eq!(summary.title, "Shock [Instant]");
        assert_eq!(summary.description, "Shock deals 2 damage to any target.");
        assert_eq!(
            summary.body,
            "*Shock* {R}\nShock deals 2 damage to any target.\n\
             https://api.scryfall.com/cards/named/?exact=Shock&format=image"
        );
    }

    #[test]
    fn test_title_with_several_types() {
        let card = Card {
            name: "Dryad Arbor".to_string(),
            types: vec!["Land".to_string(), "Creature".to_string()],
            ..Default::default()
        };
        assert_eq!(CardSummary::from_card(&card).title, "Dryad Arbor [Land Creature]");
    }

    #[test]
    fn test_long_description_truncated() {
        let card = Card {
            text: "a".repeat(250),
            ..shock()
        };
        let summary = CardSummary::from_card(&card);
        assert_eq!(summary.description.chars().count(), MAX_DESCRIPTION);
        assert!(summary.description.ends_with("..."));
        // The body keeps the full text
        assert!(summary.body.contains(&"a".repeat(250)));
    }

    #[test]
    fn test_description_truncation_is_char_safe() {
        let text = "Æ".repeat(150);
        let out = truncate_description(&text);
        assert_eq!(out.chars().count(), MAX_DESCRIPTION);
    }

    #[test]
    fn test_image_url_encodes_name() {
        assert_eq!(
            image_url("Fire // Ice"),
            "https://api.scryfall.com/cards/named/?exact=Fire+%2F%2F+Ice&format=image"
        );
    }
}
