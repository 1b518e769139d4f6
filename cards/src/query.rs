//! Compact query language over a catalog
//!
//! A query is a whitespace-separated list of tokens:
//!
//! - `o:<text>` - rules text contains `<text>`
//! - `t:<text>` - type line contains `<text>`
//! - `c:<letters>` - card has each listed color (`w`, `u`, `b`, `r`, `g`, or `m` for multicolored)
//! - `c!<letters>` - card has none of the listed colors
//! - anything else - card name contains the token
//!
//! Matching is case-insensitive and every token must hold. Parsing is lenient:
//! unknown color letters are dropped and nothing is ever rejected.

use std::collections::HashSet;

use tracing::{debug, trace};

use crate::card::{Card, short_color};
use crate::catalog::Catalog;

/// Color a color predicate refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorLetter {
    White,
    Blue,
    Black,
    Red,
    Green,
    /// More than one color
    Multicolored,
}

impl ColorLetter {
    /// Parse a query letter; anything outside `wubrgm` is not a color
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(Self::White),
            'u' => Some(Self::Blue),
            'b' => Some(Self::Black),
            'r' => Some(Self::Red),
            'g' => Some(Self::Green),
            'm' => Some(Self::Multicolored),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::White => 'w',
            Self::Blue => 'u',
            Self::Black => 'b',
            Self::Red => 'r',
            Self::Green => 'g',
            Self::Multicolored => 'm',
        }
    }
}

/// One color predicate, possibly negated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorFilter {
    pub color: ColorLetter,
    pub negated: bool,
}

/// A parsed query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Lowercase name substrings
    pub name: Vec<String>,

    /// Lowercase rules text substrings
    pub rule: Vec<String>,

    /// Lowercase type line substrings
    pub type_line: Vec<String>,

    /// Color predicates in query order
    pub color: Vec<ColorFilter>,
}

impl Query {
    /// Parse a query string. Never fails.
    pub fn parse(text: &str) -> Self {
        debug!(%text, "Query::parse: called");
        let mut query = Self::default();

        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            if let Some(rule) = token.strip_prefix("o:") {
                query.rule.push(rule.to_string());
            } else if let Some(type_line) = token.strip_prefix("t:") {
                query.type_line.push(type_line.to_string());
            } else if let Some(letters) = token.strip_prefix("c:") {
                query.push_colors(letters, false);
            } else if let Some(letters) = token.strip_prefix("c!") {
                query.push_colors(letters, true);
            } else {
                query.name.push(token);
            }
        }

        query
    }

    fn push_colors(&mut self, letters: &str, negated: bool) {
        self.color.extend(
            letters
                .chars()
                .filter_map(ColorLetter::from_char)
                .map(|color| ColorFilter { color, negated }),
        );
    }

    /// Whether the query has no predicates at all (and so matches every card)
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.rule.is_empty() && self.type_line.is_empty() && self.color.is_empty()
    }

    /// Whether a card satisfies every predicate of this query
    pub fn matches(&self, card: &Card) -> bool {
        let name = card.name.to_lowercase();
        if let Some(missing) = self.name.iter().find(|q| !name.contains(q.as_str())) {
            trace!(card = %card.name, name = %missing, "Query::matches: name mismatch");
            return false;
        }

        let text = card.text.to_lowercase();
        if let Some(missing) = self.rule.iter().find(|q| !text.contains(q.as_str())) {
            trace!(card = %card.name, rule = %missing, "Query::matches: rule mismatch");
            return false;
        }

        let type_line = card.type_line.to_lowercase();
        if let Some(missing) = self.type_line.iter().find(|q| !type_line.contains(q.as_str())) {
            trace!(card = %card.name, type_line = %missing, "Query::matches: type mismatch");
            return false;
        }

        if let Some(failed) = self.color.iter().find(|filter| !color_matches(card, filter)) {
            trace!(
                card = %card.name,
                color = %failed.color.as_char(),
                negated = failed.negated,
                "Query::matches: color mismatch"
            );
            return false;
        }

        true
    }
}

/// Evaluate one color predicate against a card
fn color_matches(card: &Card, filter: &ColorFilter) -> bool {
    let has = match filter.color {
        ColorLetter::Multicolored => card.is_multicolored(),
        color => {
            let letter = color.as_char();
            card.colors.iter().any(|c| short_color(c) == Some(letter))
        }
    };
    has != filter.negated
}

impl Catalog {
    /// Run a query and return every matching card
    ///
    /// Order follows the catalog's internal iteration and is unspecified.
    /// Each card appears at most once.
    pub fn query(&self, text: &str) -> Vec<&Card> {
        let query = Query::parse(text);
        let mut seen = HashSet::new();
        let matches: Vec<&Card> = self
            .iter()
            .filter(|card| query.matches(card))
            .filter(|card| seen.insert(card.name.as_str()))
            .collect();
        debug!(%text, count = matches.len(), "Catalog::query: done");
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn card(name: &str, type_line: &str, colors: &[&str], text: &str) -> Card {
        Card {
            name: name.to_string(),
            type_line: type_line.to_string(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    fn sample_catalog() -> Catalog {
        let cards = vec![
            card("Shock", "Instant", &["Red"], "Shock deals 2 damage to any target."),
            card("Counterspell", "Instant", &["Blue"], "Counter target spell."),
            card("Absorb", "Instant", &["White", "Blue"], "Counter target spell. You gain 3 life."),
            card("Swords to Plowshares", "Instant", &["White"], "Exile target creature."),
            card("Boros Guildmage", "Creature — Human Wizard", &["Red", "White"], ""),
            card("Sol Ring", "Artifact", &[], "{T}: Add {C}{C}."),
            card("Llanowar Elves", "Creature — Elf Druid", &["Green"], "{T}: Add {G}."),
        ];
        Catalog::from_cards(cards.into_iter().map(|c| (c.name.clone(), c)).collect())
    }

    fn names(mut cards: Vec<&Card>) -> Vec<String> {
        cards.sort_by(|a, b| a.name.cmp(&b.name));
        cards.into_iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn test_parse_groups() {
        let q = Query::parse("o:Draw t:Creature c:wU c!r elf");
        assert_eq!(q.rule, vec!["draw"]);
        assert_eq!(q.type_line, vec!["creature"]);
        assert_eq!(q.name, vec!["elf"]);
        assert_eq!(
            q.color,
            vec![
                ColorFilter {
                    color: ColorLetter::White,
                    negated: false
                },
                ColorFilter {
                    color: ColorLetter::Blue,
                    negated: false
                },
                ColorFilter {
                    color: ColorLetter::Red,
                    negated: true
                },
            ]
        );
    }

    #[test]
    fn test_parse_drops_invalid_colors() {
        let q = Query::parse("c:wxz c!q");
        assert_eq!(
            q.color,
            vec![ColorFilter {
                color: ColorLetter::White,
                negated: false
            }]
        );
    }

    #[test]
    fn test_parse_prefix_is_case_insensitive() {
        let q = Query::parse("O:draw T:elf");
        assert_eq!(q.rule, vec!["draw"]);
        assert_eq!(q.type_line, vec!["elf"]);
        assert!(q.name.is_empty());
    }

    #[test]
    fn test_parse_unknown_prefix_is_name() {
        let q = Query::parse("x:foo");
        assert_eq!(q.name, vec!["x:foo"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(Query::parse("").is_empty());
        assert!(Query::parse("   \t ").is_empty());
        assert!(Query::parse("c:xyz").is_empty());
        assert!(!Query::parse("o:").is_empty());
    }

    #[test]
    fn test_query_by_name() {
        let cat = sample_catalog();
        let result = cat.query("shock");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Shock");
        assert_eq!(result[0].type_line, "Instant");
    }

    #[test]
    fn test_query_name_tokens_are_anded() {
        let cat = sample_catalog();
        assert_eq!(names(cat.query("swords plow")), vec!["Swords to Plowshares"]);
        assert!(cat.query("swords shock").is_empty());
    }

    #[test]
    fn test_query_rules_text() {
        let cat = sample_catalog();
        assert_eq!(names(cat.query("o:counter")), vec!["Absorb", "Counterspell"]);
        assert_eq!(names(cat.query("o:counter o:life")), vec!["Absorb"]);
    }

    #[test]
    fn test_query_type_line() {
        let cat = sample_catalog();
        assert_eq!(names(cat.query("t:elf")), vec!["Llanowar Elves"]);
        assert_eq!(names(cat.query("t:creature")), vec!["Boros Guildmage", "Llanowar Elves"]);
    }

    #[test]
    fn test_query_colors_are_required_together() {
        let cat = sample_catalog();
        assert_eq!(names(cat.query("c:wu t:instant")), vec!["Absorb"]);
        assert_eq!(names(cat.query("c:u")), vec!["Absorb", "Counterspell"]);
    }

    #[test]
    fn test_query_color_exclusion() {
        let cat = sample_catalog();
        let result = names(cat.query("c!r"));
        assert_eq!(
            result,
            vec![
                "Absorb",
                "Counterspell",
                "Llanowar Elves",
                "Sol Ring",
                "Swords to Plowshares"
            ]
        );
    }

    #[test]
    fn test_query_multicolored() {
        let cat = sample_catalog();
        assert_eq!(names(cat.query("c:m")), vec!["Absorb", "Boros Guildmage"]);
        assert_eq!(names(cat.query("c:mr")), vec!["Boros Guildmage"]);

        let not_multi = names(cat.query("c!m"));
        assert!(not_multi.contains(&"Sol Ring".to_string()));
        assert!(!not_multi.contains(&"Absorb".to_string()));
        assert_eq!(not_multi.len(), 5);
    }

    #[test]
    fn test_negated_color_only_excludes() {
        let cat = sample_catalog();
        assert!(cat.query("c!w counterspell").iter().any(|c| c.name == "Counterspell"));
        assert!(cat.query("c!u counterspell").is_empty());
    }

    #[test]
    fn test_colorless_card_color_predicates() {
        let sol_ring = card("Sol Ring", "Artifact", &[], "");
        assert!(!Query::parse("c:w").matches(&sol_ring));
        assert!(!Query::parse("c:m").matches(&sol_ring));
        assert!(Query::parse("c!wubrgm").matches(&sol_ring));
    }

    #[test]
    fn test_unknown_color_name_never_matches_letter() {
        let odd = card("Odd", "Artifact", &["Purple"], "");
        assert!(!Query::parse("c:w").matches(&odd));
        assert!(Query::parse("c!w").matches(&odd));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let cat = sample_catalog();
        assert_eq!(cat.query("").len(), cat.len());
        assert_eq!(cat.query("c:?").len(), cat.len());
    }

    proptest! {
        #[test]
        fn parse_is_case_insensitive(text in "[a-zA-Z:! ]{0,40}") {
            prop_assert_eq!(Query::parse(&text), Query::parse(&text.to_ascii_uppercase()));
        }

        #[test]
        fn every_token_lands_in_one_group(tokens in proptest::collection::vec("(o:|t:|c:|c!)?[a-z]{1,6}", 0..8)) {
            let q = Query::parse(&tokens.join(" "));
            let color_tokens = tokens.iter().filter(|t| t.starts_with("c:") || t.starts_with("c!")).count();
            prop_assert_eq!(q.name.len() + q.rule.len() + q.type_line.len() + color_tokens, tokens.len());
        }

        #[test]
        fn query_results_match_and_are_unique(text in "(shock|c:[wubrgmx]{1,3}|c![wubrgm]{1,2}|t:instant|o:target| ){0,6}") {
            let cat = sample_catalog();
            let query = Query::parse(&text);
            let result = cat.query(&text);
            let unique: HashSet<&str> = result.iter().map(|c| c.name.as_str()).collect();
            prop_assert_eq!(unique.len(), result.len());
            prop_assert!(result.iter().all(|c| query.matches(c)));
            prop_assert_eq!(result.len(), cat.iter().filter(|c| query.matches(c)).count());
        }
    }

    #[test]
    fn test_query_is_repeatable() {
        let cat = sample_catalog();
        let first = names(cat.query("c!r t:instant"));
        for _ in 0..5 {
            assert_eq!(names(cat.query("c!r t:instant")), first);
        }
    }
}
