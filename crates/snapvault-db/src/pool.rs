//! SQLite connection pooling.
//!
//! One r2d2 pool serves the whole process. Connections are tuned for the
//! ingest workload on checkout: WAL keeps reads live while a batch insert
//! is writing, and a busy timeout covers the write locks that remain.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use snapvault_common::{Error, Result};

use crate::migrations;

/// Type alias for the database connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled database connection.
pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

const POOL_SIZE: u32 = 4;
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Open the database at `db_path`, creating the file if needed, and return
/// a pool with all migrations applied.
///
/// # Example
///
/// ```no_run
/// use snapvault_db::pool::init_pool;
///
/// let pool = init_pool("/var/lib/snapvault/db.sqlite").unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_pool(db_path: &str) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(&format!(
            "PRAGMA journal_mode = WAL; PRAGMA busy_timeout = {};",
            BUSY_TIMEOUT_MS
        ))
    });

    build_pool(manager)
}

/// In-memory variant for tests.
///
/// All pooled connections share the one database, which disappears when
/// the pool is dropped. WAL does not apply to in-memory databases, so only
/// the busy timeout is set.
///
/// # Example
///
/// ```
/// use snapvault_db::pool::init_memory_pool;
///
/// let pool = init_memory_pool().unwrap();
/// let conn = pool.get().unwrap();
/// ```
pub fn init_memory_pool() -> Result<DbPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch(&format!("PRAGMA busy_timeout = {};", BUSY_TIMEOUT_MS))
    });

    build_pool(manager)
}

fn build_pool(manager: SqliteConnectionManager) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(POOL_SIZE)
        .build(manager)
        .map_err(|e| Error::database(format!("failed to create connection pool: {}", e)))?;

    let conn = pool
        .get()
        .map_err(|e| Error::database(format!("failed to check out connection: {}", e)))?;
    migrations::run_migrations(&conn)?;

    Ok(pool)
}

/// Check a connection out of the pool.
///
/// Wraps `pool.get()` and maps the r2d2 error into our common error type.
///
/// # Example
///
/// ```
/// use snapvault_db::pool::{init_memory_pool, get_conn};
///
/// let pool = init_memory_pool().unwrap();
/// let conn = get_conn(&pool).unwrap();
/// ```
pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::database(format!("failed to get connection from pool: {}", e)))
}
