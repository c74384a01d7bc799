//! Usage counter service.
//!
//! Wraps a [`CounterStore`] with the error policy the HTTP layer relies on:
//! store failures are logged here and never surface to callers. A failed
//! increment loses one count; a failed read reports 0.

use tracing::{debug, error};

use crate::error::StoreError;

use super::store::CounterStore;

/// Error-absorbing front end to a [`CounterStore`].
pub struct UsageCounter<C: CounterStore> {
    store: C,
}

impl<C: CounterStore> UsageCounter<C> {
    /// Create a usage counter backed by `store`.
    pub fn new(store: C) -> Self {
        Self { store }
    }

    /// Create the counter record if absent.
    ///
    /// Unlike the other operations this reports failure, so startup can
    /// decide whether to continue.
    pub async fn initialize(&self) -> Result<(), StoreError> {
        self.store.initialize().await
    }

    /// Count one successful generation.
    ///
    /// Best-effort: returns whether the increment was persisted, but a
    /// failure is only logged. Callers must not change their response based
    /// on the result.
    pub async fn record_generation(&self) -> bool {
        match self.store.increment().await {
            Ok(()) => {
                debug!("Incremented generation counter");
                true
            }
            Err(e) => {
                error!(error = %e, "Error incrementing QR count");
                false
            }
        }
    }

    /// All-time generation count, or 0 if the store cannot be read.
    pub async fn total(&self) -> u64 {
        match self.store.read().await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "Error fetching QR count");
                0
            }
        }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &C {
        &self.store
    }
}
