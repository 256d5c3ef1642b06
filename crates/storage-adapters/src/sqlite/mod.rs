//! # SQLite store
//!
//! Maps between the SQLite relational model and the `domains` models.
//! Every statement binds its values; listing queries are picked from the
//! fixed set in [`plan`].

pub mod plan;
mod repo;

use std::str::FromStr;
use std::time::Duration;

use domains::DomainError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            BLOB PRIMARY KEY,
        username      TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at    TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS ads (
        id         BLOB PRIMARY KEY,
        user_id    BLOB NOT NULL REFERENCES users(id),
        title      TEXT NOT NULL,
        text       TEXT NOT NULL DEFAULT '',
        image_url  TEXT,
        price      REAL NOT NULL CHECK (price >= 0),
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS ads_created_at_idx ON ads (created_at, id)",
    "CREATE INDEX IF NOT EXISTS ads_price_idx ON ads (price, id)",
];

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(map_sqlx)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(map_sqlx)?;
        Ok(Self { pool })
    }

    /// A private in-memory database. Pinned to a single connection that is
    /// never recycled, otherwise each new connection would see an empty schema.
    pub async fn in_memory() -> Result<Self, DomainError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(map_sqlx)?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await
            .map_err(map_sqlx)?;
        Ok(Self { pool })
    }

    /// Creates tables and indexes. Safe to run on every startup.
    pub async fn migrate(&self) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx)?;
        }
        tx.commit().await.map_err(map_sqlx)?;
        tracing::debug!("sqlite schema is up to date");
        Ok(())
    }
}

/// Translates driver errors into the domain taxonomy.
/// Constraint violations are caller mistakes; everything else is internal.
fn map_sqlx(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return DomainError::Conflict(db.message().to_string());
        }
        if db.is_foreign_key_violation() {
            return DomainError::NotFound("user".into(), "referenced owner".into());
        }
        if db.is_check_violation() {
            return DomainError::Validation(db.message().to_string());
        }
    }
    tracing::error!(error = %err, "sqlite error");
    DomainError::Internal(err.to_string())
}
