//! Registration and login.

use std::sync::Arc;

use chrono::Utc;
use domains::{Credentials, DomainError, PasswordHasher, Result, TokenIssuer, User, UserRepo};
use uuid::Uuid;

const BAD_CREDENTIALS: &str = "invalid username or password";

pub struct AccountService {
    users: Arc<dyn UserRepo>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self { users, hasher, tokens }
    }

    /// Hashes the password and persists a new account.
    pub async fn register(&self, creds: Credentials) -> Result<User> {
        creds.validate()?;

        let user = User {
            id: Uuid::now_v7(),
            username: creds.username.trim().to_string(),
            password_hash: self.hasher.hash(&creds.password).await?,
            created_at: Utc::now(),
        };
        self.users.create_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(user)
    }

    /// Checks the credentials and issues a bearer token.
    ///
    /// Unknown usernames and wrong passwords produce the same error so that
    /// callers cannot probe which accounts exist.
    pub async fn login(&self, creds: Credentials) -> Result<String> {
        creds.validate()?;

        let user = match self.users.find_user_by_username(creds.username.trim()).await {
            Ok(user) => user,
            Err(DomainError::NotFound(..)) => {
                tracing::warn!(username = %creds.username, "login for unknown user");
                return Err(DomainError::unauthorized(BAD_CREDENTIALS));
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(&creds.password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "login with wrong password");
            return Err(DomainError::unauthorized(BAD_CREDENTIALS));
        }

        self.tokens.issue(user.id)
    }
}
