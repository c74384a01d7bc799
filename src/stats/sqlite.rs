//! SQLite-backed counter store.
//!
//! The counter lives in a one-row table:
//!
//! ```sql
//! CREATE TABLE stats (
//!     id                 INTEGER PRIMARY KEY,
//!     total_qr_generated INTEGER NOT NULL DEFAULT 0
//! );
//! ```
//!
//! Connections come from an `r2d2` pool. Each operation checks out one
//! connection on the blocking thread pool and returns it when the statement
//! completes. Every connection runs in WAL mode with a busy timeout, so
//! concurrent increments queue on SQLite's write lock instead of failing with
//! `SQLITE_BUSY`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::StoreError;

use super::store::{CounterStore, COUNTER_ROW_ID};

/// Default number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 8;

/// Default time a connection waits for SQLite's write lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS stats (
    id INTEGER PRIMARY KEY,
    total_qr_generated INTEGER NOT NULL DEFAULT 0
)";

const SEED_ROW_SQL: &str =
    "INSERT OR IGNORE INTO stats (id, total_qr_generated) VALUES (?1, 0)";

// Single statement: SQLite holds the write lock across the read and the write.
const INCREMENT_SQL: &str = "INSERT INTO stats (id, total_qr_generated) VALUES (?1, 1)
    ON CONFLICT(id) DO UPDATE SET total_qr_generated = total_qr_generated + 1";

const READ_SQL: &str = "SELECT total_qr_generated FROM stats WHERE id = ?1";

type SqlitePool = Pool<SqliteConnectionManager>;

// =============================================================================
// Options
// =============================================================================

/// Connection settings for [`SqliteCounterStore`].
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    /// Maximum number of pooled connections
    pub pool_size: u32,

    /// How long a statement waits on a locked database before failing
    pub busy_timeout: Duration,

    /// How long a caller waits to check out a pooled connection
    pub connection_timeout: Duration,
}

impl Default for SqliteOptions {
    fn default() -> Self {
        Self {
            pool_size: DEFAULT_POOL_SIZE,
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            connection_timeout: Duration::from_secs(10),
        }
    }
}

impl SqliteOptions {
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }
}

// =============================================================================
// SqliteCounterStore
// =============================================================================

/// Counter store persisted in a SQLite database file.
#[derive(Clone, Debug)]
pub struct SqliteCounterStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteCounterStore {
    /// Open (or create) the database at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_options(path, SqliteOptions::default())
    }

    /// Open (or create) the database at `path`.
    ///
    /// Creates the parent directory if it is missing. The counter table is
    /// not touched here; call [`CounterStore::initialize`] for that.
    pub fn open_with_options(
        path: impl AsRef<Path>,
        options: SqliteOptions,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!("Database {} not found. Creating...", path.display());
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let busy_timeout = options.busy_timeout;
        let manager = SqliteConnectionManager::file(&path)
            .with_init(move |conn| configure_connection(conn, busy_timeout));

        let pool = Pool::builder()
            .max_size(options.pool_size)
            .connection_timeout(options.connection_timeout)
            .build(manager)?;

        debug!(
            path = %path.display(),
            pool_size = options.pool_size,
            "Opened SQLite counter store"
        );

        Ok(Self { pool, path })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `op` with a pooled connection on the blocking thread pool.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn: PooledConnection<SqliteConnectionManager> = pool.get()?;
            op(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn configure_connection(conn: &mut Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    conn.busy_timeout(busy_timeout)?;
    // journal_mode returns the resulting mode as a row
    let _mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
    Ok(())
}

#[async_trait]
impl CounterStore for SqliteCounterStore {
    async fn initialize(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(CREATE_TABLE_SQL, [])?;
            let seeded = tx.execute(SEED_ROW_SQL, params![COUNTER_ROW_ID])?;
            tx.commit()?;

            if seeded > 0 {
                info!("Counter initialized at 0");
            }
            Ok(())
        })
        .await?;

        info!("Database initialized successfully.");
        Ok(())
    }

    async fn increment(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(INCREMENT_SQL, params![COUNTER_ROW_ID])?;
            Ok(())
        })
        .await
    }

    async fn read(&self) -> Result<u64, StoreError> {
        self.with_conn(|conn| {
            let value: Option<i64> = conn
                .query_row(READ_SQL, params![COUNTER_ROW_ID], |row| row.get(0))
                .optional()?;
            Ok(value.map(|v| v.max(0) as u64).unwrap_or(0))
        })
        .await
    }
}

// =============================================================================
// Tests
// =============================================================================
