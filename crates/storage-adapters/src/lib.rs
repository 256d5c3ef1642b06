//! # storage-adapters
//!
//! Relational implementations of the `UserRepo` and `AdRepo` ports.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::SqliteStore;
