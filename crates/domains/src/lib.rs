//! The central domain types and port definitions for the marketplace.

pub mod error;
pub mod listing;
pub mod models;
pub mod ports;

// Re-exporting for easier access in other crates
pub use error::*;
pub use listing::*;
pub use models::*;
pub use ports::*;
