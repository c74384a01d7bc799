//! # qrgen-server
//!
//! A small HTTP service that renders QR codes as PNG images and keeps a
//! persistent count of every code it has generated.
//!
//! ## Features
//!
//! - **Validated input**: every out-of-range field is reported at once, with a 422
//! - **PNG output**: minimal symbol version at error-correction level L, with
//!   configurable module size, quiet zone and colors
//! - **Usage counter**: a single SQLite row, incremented atomically under
//!   concurrent requests
//! - **Best-effort counting**: store failures never fail a generation request
//!
//! ## Architecture
//!
//! - [`qr`] - Request validation and PNG rendering
//! - [`stats`] - Counter store trait, SQLite implementation and usage counter
//! - [`server`] - Axum handlers and router
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use qrgen_server::{create_router, RouterConfig, SqliteCounterStore, UsageCounter};
//! use qrgen_server::stats::CounterStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteCounterStore::open("database/stats.db")?;
//!     store.initialize().await?;
//!
//!     let router = create_router(UsageCounter::new(store), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//!     axum::serve(listener, router).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod qr;
pub mod server;
pub mod stats;

// Re-export commonly used types
pub use config::{CheckConfig, Cli, Command, ServeConfig};
pub use error::{EncodingError, FieldViolation, StoreError, ValidationError};
pub use qr::{GenerationRequest, QrEncoder, RawGenerationRequest, PNG_CONTENT_TYPE};
pub use server::{
    create_router, generate_handler, health_handler, index_handler, stats_handler, ApiError,
    AppState, ErrorResponse, HealthResponse, RouterConfig, StatsResponse,
};
pub use stats::{CounterStore, SqliteCounterStore, SqliteOptions, UsageCounter};
