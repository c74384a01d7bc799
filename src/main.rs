//! qrgen-server - QR code generation service.
//!
//! This binary starts the HTTP server and configures all components.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qrgen_server::{
    config::{CheckConfig, Cli, Command, ServeConfig},
    server::create_router,
    stats::{CounterStore, SqliteCounterStore, SqliteOptions, UsageCounter},
};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("qrgen-server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Database: {}", config.database.display());
    info!(
        "  Pool: {} connections, {}ms busy timeout",
        config.db_pool_size, config.db_busy_timeout_ms
    );
    if config.static_dir.is_dir() {
        info!("  Static files: {}", config.static_dir.display());
    } else {
        warn!(
            "  Static files: {} not found, landing page disabled",
            config.static_dir.display()
        );
    }

    let store = match SqliteCounterStore::open_with_options(&config.database, config.sqlite_options())
    {
        Ok(store) => store,
        Err(e) => {
            error!(
                "Failed to open database {}: {}",
                config.database.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let counter = UsageCounter::new(store);

    // Generation still works without a counter, so keep serving
    if let Err(e) = counter.initialize().await {
        error!("Error initializing database: {}", e);
    }

    let router = create_router(counter, config.router_config());

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("    curl http://{}/stats/", addr);
    info!(
        "    curl -X POST http://{}/qr/generate -H 'Content-Type: application/json' \\",
        addr
    );
    info!("         -d '{{\"content\": \"https://example.com\"}}' -o qr.png");
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Server stopped");
    ExitCode::SUCCESS
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "qrgen_server=debug,tower_http=debug"
    } else {
        "qrgen_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("qrgen-server Database Check");
    println!("═══════════════════════════");
    println!();

    let path = &config.database;
    if path.exists() {
        println!("✓ Database: {}", path.display());
    } else {
        println!("✗ Database: {} does not exist", path.display());
        println!();
        println!("  It will be created on the first `serve`.");
        return ExitCode::FAILURE;
    }

    let options = SqliteOptions::default().with_pool_size(1);
    let store = match SqliteCounterStore::open_with_options(path, options) {
        Ok(store) => store,
        Err(e) => {
            println!("✗ Open failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match store.read().await {
        Ok(count) => println!("✓ Total QR codes generated: {}", count),
        Err(e) => {
            println!("✗ Counter unreadable: {}", e);
            return ExitCode::FAILURE;
        }
    }

    println!();
    println!("═══════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}
