#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

use sqlx::sqlite;
use std::{str::FromStr, time::Duration};
use tokio::try_join;

pub mod config;
mod r#impl;
pub mod types;

use config::SqliteConfig;

/// SQLite database implementation for the award engine repositories.
///
/// This struct provides separate reader and writer connection pools to a
/// SQLite database, implementing all the repository traits defined in
/// `cae-core`. The separation of read and write connections allows for
/// better concurrency control and follows SQLite best practices for
/// Write-Ahead Logging (WAL) mode.
///
/// # Connection Management
///
/// - `reader`: A connection pool for read operations, allowing concurrent reads
/// - `writer`: A single-connection pool for write operations, ensuring serialized writes
///
/// The serialized writer is not just a performance choice: the bid
/// ledger's check-then-insert relies on it. Every bid decision runs in a
/// transaction on the one writer connection, so the decreasing-value guard
/// always compares against the committed ledger minimum.
///
/// # Example
///
/// ```no_run
/// # use cae_sqlite::{Db, config::SqliteConfig};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SqliteConfig::default();
/// let db = Db::open(&config).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Db {
    /// Connection pool for read operations
    pub reader: sqlx::Pool<sqlx::Sqlite>,
    /// Connection pool for write operations (limited to 1 connection)
    pub writer: sqlx::Pool<sqlx::Sqlite>,
}

impl Db {
    /// Open a connection to the specified SQLite database.
    ///
    /// Creates a new database if one doesn't exist (when
    /// `create_if_missing` is true) and applies all pending migrations.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if:
    /// - Database connection fails
    /// - Migrations fail to apply
    pub async fn open(config: &SqliteConfig) -> Result<Self, sqlx::Error> {
        let options = match &config.database_path {
            Some(path) => sqlite::SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(config.create_if_missing),
            // Every connection in both pools must see the same database,
            // so in-memory databases get a unique shared-cache name.
            None => sqlite::SqliteConnectOptions::from_str(&format!(
                "file:{}?mode=memory&cache=shared",
                uuid::Uuid::new_v4().simple()
            ))?,
        };
        let options = options
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true)
            .journal_mode(sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlite::SqliteSynchronous::Normal)
            .pragma("temp_store", "memory");

        let reader = sqlite::SqlitePoolOptions::new().connect_with(options.clone());
        let writer = sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options);

        let (reader, writer) = try_join!(reader, writer)?;

        // Run any pending migrations before returning
        sqlx::migrate!("./schema").run(&writer).await?;

        Ok(Self { reader, writer })
    }
}
