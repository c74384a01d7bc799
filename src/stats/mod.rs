//! Usage statistics layer.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │             UsageCounter                │
//! │   (logs and absorbs store failures)     │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          CounterStore Trait             │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │          SqliteCounterStore             │
//! │   (r2d2 pool, atomic UPDATE per call)   │
//! └─────────────────────────────────────────┘
//! ```

mod counter;
mod sqlite;
mod store;

pub use counter::UsageCounter;
pub use sqlite::{SqliteCounterStore, SqliteOptions, DEFAULT_BUSY_TIMEOUT, DEFAULT_POOL_SIZE};
pub use store::{CounterStore, COUNTER_ROW_ID};
