//! # auth-adapters
//!
//! Password hashing and bearer-token implementations of the auth ports.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2PasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::{JwtTokenIssuer, DEFAULT_TOKEN_TTL_SECS};
