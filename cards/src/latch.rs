//! Single-fire signal readable by any number of waiters

use std::sync::Arc;

use tokio::sync::watch;

/// A latch starts open and can be fired exactly once
///
/// Waiters that arrive after the latch fired return immediately. Clones share
/// the same underlying signal.
#[derive(Debug, Clone)]
pub struct Latch {
    tx: Arc<watch::Sender<bool>>,
}

impl Latch {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Fire the latch, waking every waiter
    ///
    /// Returns true only for the call that actually fired it.
    pub fn fire(&self) -> bool {
        self.tx.send_if_modified(|fired| {
            if *fired {
                false
            } else {
                *fired = true;
                true
            }
        })
    }

    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }

    /// Wait until the latch has fired
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|fired| *fired).await;
    }
}

impl Default for Latch {
    fn default() -> Self {
        Self::new()
    }
}
