//! # Handlers
//!
//! This module coordinates the flow between HTTP requests and the services.
//! Body and query rejections are turned into 400s rather than axum's defaults.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use domains::{Ad, AdView, Credentials, NewAd, RawListParams, User};
use serde::Serialize;
use serde_json::{json, Value};

use super::auth::{AuthUser, MaybeAuthUser};
use super::error::ApiError;
use super::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Every route takes an auth extractor, so a bad token is a 401 even where
/// no identity is needed.
pub async fn health(_caller: MaybeAuthUser) -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// `POST /user/register`
pub async fn register(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(creds) = body?;
    let user = state.accounts.register(creds).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /user/login`
pub async fn login(
    State(state): State<AppState>,
    _caller: MaybeAuthUser,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(creds) = body?;
    let token = state.accounts.login(creds).await?;
    Ok(Json(LoginResponse { token }))
}

/// `POST /item/add`, authenticated.
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(owner): AuthUser,
    body: Result<Json<NewAd>, JsonRejection>,
) -> Result<(StatusCode, Json<Ad>), ApiError> {
    let Json(input) = body?;
    let ad = state.ads.create(owner, input).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// `GET /item/get`, anonymous or authenticated.
pub async fn list_items(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    params: Result<Query<RawListParams>, QueryRejection>,
) -> Result<Json<Vec<AdView>>, ApiError> {
    let Query(raw) = params?;
    let ads = state.ads.list(&raw, caller).await?;
    Ok(Json(ads))
}
