//! Router configuration for the QR generation service.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and static assets.
//!
//! # Route Structure
//!
//! ```text
//! /                  - Landing page (static/index.html)
//! /health            - Health check
//! /qr/generate       - QR generation (POST)
//! /stats/            - Generation count
//! /static/*          - Static assets, when the directory exists
//! ```
//!
//! # Example
//!
//! ```ignore
//! use qrgen_server::server::routes::{create_router, RouterConfig};
//! use qrgen_server::stats::{SqliteCounterStore, UsageCounter};
//!
//! let store = SqliteCounterStore::open("database/stats.db")?;
//! let counter = UsageCounter::new(store);
//! counter.initialize().await?;
//!
//! let config = RouterConfig::new()
//!     .with_static_dir("static")
//!     .with_cors_origins(vec!["https://example.com".to_string()]);
//!
//! let router = create_router(counter, config);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::Method;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::handlers::{
    generate_handler, health_handler, index_handler, stats_handler, AppState,
};
use crate::stats::{CounterStore, UsageCounter};

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Directory with `index.html` and assets served under `/static`
    pub static_dir: Option<PathBuf>,

    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterConfig {
    /// Create a new router configuration.
    ///
    /// By default:
    /// - No static directory
    /// - CORS allows any origin
    /// - Tracing is enabled
    pub fn new() -> Self {
        Self {
            static_dir: None,
            cors_origins: None,
            enable_tracing: true,
        }
    }

    /// Serve the landing page and `/static` from `dir`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    /// Pass None (or don't call this method) to allow any origin.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the main application router.
///
/// This function builds the complete Axum router with:
/// - API routes (generate, stats, health)
/// - Landing page and static assets
/// - CORS configuration
/// - Request tracing (optional)
///
/// The counter should already be initialized; the router never creates the
/// counter record itself.
pub fn create_router<C>(counter: UsageCounter<C>, config: RouterConfig) -> Router
where
    C: CounterStore,
{
    let mut app_state = AppState::new(counter);
    if let Some(ref dir) = config.static_dir {
        app_state = app_state.with_static_dir(dir.clone());
    }

    let cors = build_cors_layer(&config);

    let mut router = Router::new()
        .route("/", get(index_handler::<C>))
        .route("/health", get(health_handler))
        .route("/qr/generate", post(generate_handler::<C>))
        .route("/stats", get(stats_handler::<C>))
        .route("/stats/", get(stats_handler::<C>))
        .with_state(app_state);

    // Mounted only when the directory exists at startup
    if let Some(dir) = config.static_dir.as_ref().filter(|d| d.is_dir()) {
        debug!(path = %dir.display(), "Serving static assets");
        router = router.nest_service("/static", ServeDir::new(dir));
    }

    let router = router.layer(cors);

    // Add tracing if enabled
    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => {
            // No origins allowed - this effectively disables CORS
            cors
        }
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
