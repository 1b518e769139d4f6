//! Self-refreshing catalog store
//!
//! A `Store` owns one background task that refreshes the catalog from its
//! source on a fixed interval. Readers get the latest published snapshot via
//! [`Store::cards`] or wait for the next one via [`Store::wait_for_update`].

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::config::StoreConfig;
use crate::error::{FetchError, StoreError, excerpt};
use crate::latch::Latch;
use crate::source::{CatalogSource, FetchOutcome, HttpSource};

/// Card store that keeps itself up to date from a catalog source
///
/// Dropping the store stops future refreshes, the same as [`Store::close`].
pub struct Store {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn CatalogSource>,
    refresh_interval: Duration,
    excerpt_limit: usize,

    /// Fires once, on the first successful refresh
    ready: Latch,

    /// Fires once, on close
    closed: Latch,

    state: RwLock<State>,
}

/// Everything a refresh swaps, guarded by one lock
struct State {
    /// Empty until the first successful refresh; `ready` gates access to it
    catalog: Arc<Catalog>,

    /// Cache validator from the last successful fetch
    etag: String,

    /// Fires when the generation after this one is published
    update: Latch,
}

impl Store {
    /// Create a store for the default catalog endpoint and start refreshing
    ///
    /// Must be called from within a Tokio runtime. Returns immediately; the
    /// first refresh runs in the background.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    /// Create a store for the configured endpoint and start refreshing
    pub fn with_config(config: &StoreConfig) -> Self {
        Self::with_source(config, Arc::new(HttpSource::new(config)))
    }

    /// Create a store over any catalog source and start refreshing
    ///
    /// Only the interval and excerpt limit are taken from `config`.
    pub fn with_source(config: &StoreConfig, source: Arc<dyn CatalogSource>) -> Self {
        debug!(
            refresh_interval_ms = config.refresh_interval_ms,
            "Store::with_source: called"
        );
        let inner = Arc::new(Inner {
            source,
            refresh_interval: config.refresh_interval(),
            excerpt_limit: config.excerpt_limit,
            ready: Latch::new(),
            closed: Latch::new(),
            state: RwLock::new(State {
                catalog: Arc::new(Catalog::default()),
                etag: String::new(),
                update: Latch::new(),
            }),
        });

        tokio::spawn(watch(Arc::clone(&inner)));

        Self { inner }
    }

    /// The current catalog, waiting for the first successful refresh if needed
    ///
    /// If no refresh ever succeeds this never returns.
    pub async fn cards(&self) -> Arc<Catalog> {
        self.inner.cards().await
    }

    /// The current catalog, or `None` before the first successful refresh
    pub fn try_cards(&self) -> Option<Arc<Catalog>> {
        if !self.inner.ready.is_fired() {
            return None;
        }
        Some(Arc::clone(&self.inner.read_state().catalog))
    }

    /// Resolve with the catalog published by the next successful refresh
    ///
    /// The generation is captured when this is called, not when the future is
    /// first polled, so an update landing in between still wakes it.
    ///
    /// ```ignore
    /// let store = Store::new();
    /// let cards = store.cards().await;
    /// // index cards...
    /// loop {
    ///     let cards = store.wait_for_update().await;
    ///     // re-index cards...
    /// }
    /// ```
    pub fn wait_for_update(&self) -> impl Future<Output = Arc<Catalog>> + Send + use<> {
        let update = self.inner.read_state().update.clone();
        let inner = Arc::clone(&self.inner);
        async move {
            update.wait().await;
            inner.cards().await
        }
    }

    /// Stop future refreshes
    ///
    /// A refresh already in flight is allowed to finish. Fails if the store
    /// was already closed.
    pub fn close(&self) -> Result<(), StoreError> {
        if !self.inner.closed.fire() {
            return Err(StoreError::AlreadyClosed);
        }
        info!("Store closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_fired()
    }

    /// Cache validator of the current catalog (empty before the first success)
    pub fn etag(&self) -> String {
        self.inner.read_state().etag.clone()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Store {
    fn drop(&mut self) {
        self.inner.closed.fire();
    }
}

impl Inner {
    fn read_state(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    async fn cards(&self) -> Arc<Catalog> {
        self.ready.wait().await;
        Arc::clone(&self.read_state().catalog)
    }

    /// Run one refresh attempt; failures leave the published state untouched
    async fn maybe_update(&self) {
        let etag = self.read_state().etag.clone();

        let (body, next_etag) = match self.source.fetch(&etag).await {
            Ok(FetchOutcome::NotModified) => {
                debug!(%etag, "maybe_update: not modified");
                return;
            }
            Ok(FetchOutcome::Fetched { body, etag }) => (body, etag),
            Err(e) => {
                match e.status() {
                    Some(status) => warn!(status, error = %e, "Card update failed"),
                    None => warn!(error = %e, "Could not update cards"),
                }
                return;
            }
        };

        // Decode and index outside the lock; readers keep the old snapshot meanwhile
        let catalog = match Catalog::from_json(&body) {
            Ok(catalog) => Arc::new(catalog),
            Err(source) => {
                let e = FetchError::Decode {
                    source,
                    excerpt: excerpt(&body, self.excerpt_limit),
                };
                error!(error = %e, "Card update failed");
                return;
            }
        };

        let previous = {
            let mut state = self.write_state();
            state.catalog = Arc::clone(&catalog);
            state.etag = next_etag;
            std::mem::replace(&mut state.update, Latch::new())
        };

        // Both fire only after the new catalog is visible to readers
        self.ready.fire();
        previous.fire();

        info!(cards = catalog.len(), "Card update successful");
    }
}

/// Background refresh loop: one attempt now, then one per interval until closed
async fn watch(inner: Arc<Inner>) {
    info!(interval = ?inner.refresh_interval, "Store watcher started");
    inner.maybe_update().await;

    loop {
        if inner.refresh_interval.is_zero() {
            debug!("watch: periodic refresh disabled, exiting");
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(inner.refresh_interval) => {}
            _ = inner.closed.wait() => {
                debug!("watch: closed, exiting");
                return;
            }
        }

        inner.maybe_update().await;
    }
}
