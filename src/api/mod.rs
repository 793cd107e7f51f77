use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::gateway::GatewayClient;
use crate::session::SessionStore;

pub mod handlers;
pub mod models;
pub mod page;

/// Shared by every request. Sessions are independent; the gateway (and its
/// cache) is shared across all of them.
pub struct AppState {
    pub gateway: GatewayClient,
    pub sessions: SessionStore,
    pub require_scheme: bool,
}

impl AppState {
    pub fn new(gateway: GatewayClient, require_scheme: bool) -> Self {
        Self {
            gateway,
            sessions: SessionStore::new(),
            require_scheme,
        }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // HTML form
        .route("/", get(handlers::index_handler))
        .route("/lookup", post(handlers::lookup_form_handler))
        // JSON API
        .route("/api/lookup", get(handlers::lookup_api_handler))
        .route("/health", get(handlers::health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
