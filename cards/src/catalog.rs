//! Immutable catalog snapshot with exact and normalized name indexes

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::card::Card;

/// Separators used when indexing the component names of a multi-faced card
const FACE_SEPARATORS: [&str; 3] = [" & ", " / ", " // "];

/// A complete snapshot of the card catalog at one point in time
///
/// A catalog is never mutated once built. The store publishes a new one on
/// every successful refresh, so a reader holding an `Arc<Catalog>` keeps a
/// consistent view for as long as it likes.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Exact card name -> card
    cards: HashMap<String, Arc<Card>>,

    /// Normalized name -> card, derived from `cards`
    normalized: HashMap<String, Arc<Card>>,
}

impl Catalog {
    /// Build a catalog from the feed's name -> card mapping
    pub fn from_cards(cards: HashMap<String, Card>) -> Self {
        debug!(count = cards.len(), "Catalog::from_cards: called");
        let cards: HashMap<String, Arc<Card>> = cards.into_iter().map(|(name, card)| (name, Arc::new(card))).collect();
        let normalized = build_normalized(&cards);
        Self { cards, normalized }
    }

    /// Decode a feed document and build a catalog from it
    ///
    /// A `null` card entry decodes as an empty card under its key.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let cards: HashMap<String, Option<Card>> = serde_json::from_slice(body)?;
        Ok(Self::from_cards(
            cards.into_iter().map(|(name, card)| (name, card.unwrap_or_default())).collect(),
        ))
    }

    /// Look up a card by its exact name
    pub fn get(&self, name: &str) -> Option<&Card> {
        self.cards.get(name).map(Arc::as_ref)
    }

    /// Look up a card ignoring case and a few punctuation differences
    ///
    /// "Beck // Call", "beck & CALL" and "Beck / Call" all find the same card.
    pub fn lookup_normalized(&self, name: &str) -> Option<&Card> {
        self.normalized.get(&normalize_key(name)).map(Arc::as_ref)
    }

    /// Iterate over all cards in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[cfg(test)]
    fn normalized_len(&self) -> usize {
        self.normalized.len()
    }
}

/// Derive the normalized index from the primary map
///
/// When two cards produce the same key, whichever is visited last wins.
/// HashMap iteration order is unspecified, so such collisions resolve
/// arbitrarily.
fn build_normalized(cards: &HashMap<String, Arc<Card>>) -> HashMap<String, Arc<Card>> {
    let mut normalized = HashMap::with_capacity(cards.len());
    for card in cards.values() {
        if card.is_multi_faced() {
            for sep in FACE_SEPARATORS {
                normalized.insert(card.names.join(sep).to_lowercase(), Arc::clone(card));
            }
        }
        normalized.insert(normalize_key(&card.name), Arc::clone(card));
    }
    debug!(
        cards = cards.len(),
        keys = normalized.len(),
        "build_normalized: index built"
    );
    normalized
}

/// Replace characters that users rarely type with their plain equivalents
pub fn normalize_card_name(name: &str) -> String {
    name.replace('Æ', "Ae").replace('\u{2019}', "'")
}

/// Lookup key for a name: substituted and case-folded
fn normalize_key(name: &str) -> String {
    normalize_card_name(name).to_lowercase()
}
