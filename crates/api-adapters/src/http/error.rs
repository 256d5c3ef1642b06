//! Maps domain failures onto HTTP responses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;

/// Error returned by every handler and extractor.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(DomainError::Validation(msg.into()))
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self(DomainError::Unauthorized(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            // Only accounts are looked up, and an unknown one is an auth failure.
            DomainError::Unauthorized(_) | DomainError::NotFound(..) => StatusCode::UNAUTHORIZED,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(format!("invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(format!("invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match &self.0 {
            DomainError::Validation(msg) => ("bad_request", msg.clone()),
            DomainError::Unauthorized(msg) => ("unauthorized", msg.clone()),
            DomainError::NotFound(kind, _) => ("unauthorized", format!("unknown {kind}")),
            DomainError::Conflict(msg) => ("conflict", msg.clone()),
            DomainError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                ("internal_error", "internal server error".into())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::Unauthorized("x".into()), StatusCode::UNAUTHORIZED),
            (DomainError::NotFound("user".into(), "bob".into()), StatusCode::UNAUTHORIZED),
            (DomainError::Conflict("x".into()), StatusCode::CONFLICT),
            (DomainError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err.clone()).status(), status, "{err:?}");
            assert_eq!(ApiError(err).into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn not_found_names_the_kind_but_not_the_key() {
        let response =
            ApiError(DomainError::NotFound("user".into(), "bob".into())).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "unknown user");
        assert!(!bytes.windows(3).any(|w| w == b"bob"));
    }
}
