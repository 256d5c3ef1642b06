//! # api-adapters
//!
//! The web routing and orchestration layer for the marketplace.

#[cfg(feature = "web-axum")]
pub mod http;
