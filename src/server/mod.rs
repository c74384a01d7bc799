//! HTTP server layer for the QR generation service.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │     POST /qr/generate    GET /stats/    GET /health    GET /    │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │          routes             │  │
//! │  │ (validate, encode, count)│  │ (CORS, tracing, /static)    │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    generate_handler, health_handler, index_handler, stats_handler, ApiError, AppState,
    ErrorResponse, HealthResponse, MessageResponse, StatsResponse, FRONTEND_NOT_FOUND_MESSAGE,
    GENERATION_FAILED_MESSAGE,
};
pub use routes::{create_router, RouterConfig};
