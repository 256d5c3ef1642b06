//! Argon2-based implementation of `PasswordHasher`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use domains::{DomainError, PasswordHasher, Result};

/// Argon2id with a random per-password salt, stored in PHC string format.
///
/// Hashing is CPU-bound, so both operations run on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Custom cost parameters (memory in KiB, passes, lanes).
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::internal(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<String> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
        })
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {e}")))?
        .map_err(|e| DomainError::internal(format!("password hashing failed: {e}")))
    }

    /// A stored hash that cannot be parsed never matches.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool> {
        let argon2 = self.argon2();
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let Ok(parsed) = PasswordHash::new(&hash) else {
                tracing::warn!("stored password hash is not in PHC format");
                return false;
            };
            argon2.verify_password(password.as_bytes(), &parsed).is_ok()
        })
        .await
        .map_err(|e| DomainError::internal(format!("hashing task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn hash_then_verify() {
        let h = hasher();
        let hash = h.hash("pw1").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("pw1"));
        assert!(h.verify("pw1", &hash).await.unwrap());
        assert!(!h.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn salts_differ_per_hash() {
        let h = hasher();
        let a = h.hash("same").await.unwrap();
        let b = h.hash("same").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn hashes_from_other_cost_settings_still_verify() {
        let hash = hasher().hash("pw1").await.unwrap();
        assert!(Argon2PasswordHasher::default().verify("pw1", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_does_not_match() {
        assert!(!hasher().verify("pw1", "not-a-phc-string").await.unwrap());
    }

    #[test]
    fn rejects_invalid_cost() {
        assert!(Argon2PasswordHasher::with_cost(1, 0, 0).is_err());
    }
}
