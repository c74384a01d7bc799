use async_trait::async_trait;

use crate::error::StoreError;

/// Primary key of the singleton counter row.
pub const COUNTER_ROW_ID: i64 = 1;

// =============================================================================
// CounterStore Trait
// =============================================================================

/// Persistent home of the all-time generation count.
///
/// Exactly one counter exists per store. Implementations must make
/// `increment` atomic at the storage layer: concurrent callers may not lose
/// updates, and no in-process lock is expected to guard it.
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Create the counter record with value 0 if it does not exist.
    ///
    /// Idempotent: an existing counter is left untouched.
    async fn initialize(&self) -> Result<(), StoreError>;

    /// Atomically add one to the counter.
    async fn increment(&self) -> Result<(), StoreError>;

    /// Current counter value, or 0 when the record does not exist.
    async fn read(&self) -> Result<u64, StoreError>;
}
