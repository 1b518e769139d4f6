//! CardStore - self-refreshing in-memory card catalog
//!
//! Fetches the full card catalog from a remote endpoint, keeps it fresh in the
//! background with conditional requests, and answers name lookups and compact
//! structured queries against the latest snapshot.
//!
//! # Modules
//!
//! - [`store`] - background refresh loop and reader access
//! - [`catalog`] - immutable snapshot with exact and normalized name indexes
//! - [`query`] - the `o:` / `t:` / `c:` / `c!` query language
//! - [`source`] - conditional fetch seam and its HTTP implementation
//! - [`render`] - display helpers for query results
//!
//! # Example
//!
//! ```ignore
//! use cardstore::Store;
//!
//! let store = Store::new();
//! let cards = store.cards().await;
//! for card in cards.query("c:r t:instant o:damage") {
//!     println!("{}", card.name);
//! }
//! let vial = cards.lookup_normalized("aether vial");
//! ```

pub mod card;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod latch;
pub mod query;
pub mod render;
pub mod source;
pub mod store;

pub use card::{Card, FormatLegality, Ruling, short_color};
pub use catalog::{Catalog, normalize_card_name};
pub use config::{Config, StoreConfig};
pub use error::{FetchError, StoreError};
pub use latch::Latch;
pub use query::{ColorFilter, ColorLetter, Query};
pub use render::{CardSummary, MAX_RESULTS};
pub use source::{CatalogSource, FetchOutcome, HttpSource};
pub use store::Store;
