//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.

use async_trait::async_trait;

use crate::error::Result;
use crate::listing::ListQuery;
use crate::models::{Ad, ListedAd, User, UserId};

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `Conflict` when the username is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Fails with `NotFound` when no such user exists.
    async fn find_user_by_username(&self, username: &str) -> Result<User>;
}

/// Persistence contract for ads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdRepo: Send + Sync {
    async fn create_ad(&self, ad: &Ad) -> Result<()>;

    /// Runs a validated listing query, joined with each ad's owner.
    async fn list_ads(&self, query: &ListQuery) -> Result<Vec<ListedAd>>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String>;

    /// Returns `Ok(false)` on mismatch; `Err` only on infrastructure failure.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Issues and verifies bearer tokens binding a request to a user.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: UserId) -> Result<String>;

    /// Fails with `Unauthorized` for malformed, forged or expired tokens.
    fn verify(&self, token: &str) -> Result<UserId>;
}
