//! Snapvault-DB: Database schema, migrations, and query operations
//!
//! This crate provides database functionality for snapvault using SQLite
//! with rusqlite and r2d2 connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching database schema
//! - `queries` - Database query operations
//!
//! # Example
//!
//! ```no_run
//! use snapvault_db::pool::{init_pool, get_conn};
//! use snapvault_db::queries::images;
//!
//! let pool = init_pool("/var/lib/snapvault/db.sqlite").unwrap();
//! let conn = get_conn(&pool).unwrap();
//!
//! let record = images::find_by_id(&conn, "vault/abc123").unwrap();
//! println!("Found: {:?}", record);
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
