//! Bearer-token extractors.
//!
//! Handlers receive the caller identity as an explicit argument.
//! [`AuthUser`] demands a valid token; [`MaybeAuthUser`] lets anonymous
//! requests through but still rejects a token that is present and invalid.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::UserId;

use super::error::ApiError;
use super::AppState;

/// Caller identity on routes that require authentication.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// Caller identity on routes that also serve anonymous users.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthUser(pub Option<UserId>);

/// `Ok(None)` when no `Authorization` header is sent at all.
fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(value) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("malformed authorization header"))?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(Some(token.trim()))
        }
        _ => Err(ApiError::unauthorized("expected a bearer token")),
    }
}

fn authenticate(parts: &Parts, state: &AppState) -> Result<Option<UserId>, ApiError> {
    let Some(token) = bearer_token(parts)? else {
        return Ok(None);
    };
    match state.tokens.verify(token) {
        Ok(user_id) => Ok(Some(user_id)),
        Err(err) => {
            tracing::warn!(error = %err, "rejected bearer token");
            Err(err.into())
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(parts, state)?
            .map(Self)
            .ok_or_else(|| ApiError::unauthorized("missing bearer token"))
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(parts, state).map(Self)
    }
}
