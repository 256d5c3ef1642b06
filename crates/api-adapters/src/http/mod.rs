//! Axum routing for the marketplace API.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use domains::TokenIssuer;
use services::{AccountService, AdService};

/// State shared across all request handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub ads: Arc<AdService>,
    pub tokens: Arc<dyn TokenIssuer>,
}

/// Builds the API routes. Layers are added separately by [`middleware`].
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/user/register", post(handlers::register))
        .route("/user/login", post(handlers::login))
        .route("/item/add", post(handlers::add_item))
        .route("/item/get", get(handlers::list_items))
        .with_state(state)
}
