//! Configuration management for the QR generation service.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `QRGEN_` prefix
//! - A `.env` file in the working directory (loaded by the binary)
//! - Sensible defaults for all settings
//!
//! # Environment Variables
//!
//! - `QRGEN_HOST` - Server bind address (default: 0.0.0.0)
//! - `QRGEN_PORT` - Server port (default: 8000)
//! - `QRGEN_DATABASE` - SQLite database file (default: database/stats.db)
//! - `QRGEN_STATIC_DIR` - Landing page and assets (default: static)
//! - `QRGEN_DB_POOL_SIZE` - Pooled SQLite connections (default: 8)
//! - `QRGEN_DB_BUSY_TIMEOUT_MS` - Wait on a locked database (default: 5000)
//! - `QRGEN_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::server::RouterConfig;
use crate::stats::{SqliteOptions, DEFAULT_POOL_SIZE};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default SQLite database location.
pub const DEFAULT_DATABASE_PATH: &str = "database/stats.db";

/// Default static asset directory.
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default SQLite busy timeout in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// QR code generation service.
///
/// Renders QR codes as PNG images over HTTP and keeps a persistent count of
/// every code generated.
#[derive(Parser, Debug, Clone)]
#[command(name = "qrgen-server")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Options for `serve`, accepted without the subcommand name
    #[command(flatten)]
    pub serve: ServeConfig,
}

impl Cli {
    /// Resolve the command to run; `serve` when none was given.
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Serve(self.serve))
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeConfig),

    /// Check that the counter database is readable and print the count
    Check(CheckConfig),
}

// =============================================================================
// Serve Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "QRGEN_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "QRGEN_PORT")]
    pub port: u16,

    /// Directory holding index.html and assets served under /static.
    #[arg(long, default_value = DEFAULT_STATIC_DIR, env = "QRGEN_STATIC_DIR")]
    pub static_dir: PathBuf,

    // =========================================================================
    // Database Configuration
    // =========================================================================
    /// SQLite database file holding the generation counter.
    ///
    /// Created (with its parent directory) if it does not exist.
    #[arg(long, default_value = DEFAULT_DATABASE_PATH, env = "QRGEN_DATABASE")]
    pub database: PathBuf,

    /// Maximum number of pooled SQLite connections.
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE, env = "QRGEN_DB_POOL_SIZE")]
    pub db_pool_size: u32,

    /// Milliseconds a statement waits on a locked database before failing.
    #[arg(long, default_value_t = DEFAULT_BUSY_TIMEOUT_MS, env = "QRGEN_DB_BUSY_TIMEOUT_MS")]
    pub db_busy_timeout_ms: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "QRGEN_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.database.as_os_str().is_empty() {
            return Err(
                "Database path is required. Set --database or QRGEN_DATABASE".to_string(),
            );
        }

        if self.db_pool_size == 0 {
            return Err("db_pool_size must be greater than 0".to_string());
        }

        if self.db_busy_timeout_ms == 0 {
            return Err("db_busy_timeout_ms must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection settings for the counter store.
    pub fn sqlite_options(&self) -> SqliteOptions {
        SqliteOptions::default()
            .with_pool_size(self.db_pool_size)
            .with_busy_timeout(Duration::from_millis(self.db_busy_timeout_ms))
    }

    /// Router settings derived from this configuration.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new()
            .with_static_dir(self.static_dir.clone())
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Check Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    /// SQLite database file holding the generation counter.
    #[arg(long, default_value = DEFAULT_DATABASE_PATH, env = "QRGEN_DATABASE")]
    pub database: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
