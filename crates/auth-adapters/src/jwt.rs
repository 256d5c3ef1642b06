//! HS256 bearer tokens.

use chrono::{Duration, Utc};
use domains::{DomainError, Result, TokenIssuer, UserId};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a token when none is configured.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and checks tokens with a single process-wide secret.
/// Changing the secret invalidates every token issued before.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user_id: UserId) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("token signing failed: {e}")))
    }

    fn verify(&self, token: &str) -> Result<UserId> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::unauthorized("token expired"),
                _ => DomainError::unauthorized("invalid token"),
            })?;
        Uuid::parse_str(&data.claims.sub)
            .map_err(|_| DomainError::unauthorized("invalid token subject"))
    }
}
