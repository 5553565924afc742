//! API route definitions.
//!
//! - POST   /api/v1/price                 — estimate a property price
//! - GET    /api/v1/price/history         — all recorded price predictions
//! - DELETE /api/v1/price/:id             — delete one price prediction
//! - POST   /api/v1/sale-potential        — score a listing's sale potential
//! - GET    /api/v1/sale-potential/history
//! - DELETE /api/v1/sale-potential/:id

use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::{self, AppState};

/// Create all /api/v1 routes.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/price", post(handlers::predict_price))
        .route("/price/history", get(handlers::price_history))
        .route("/price/:id", delete(handlers::delete_price))
        .route("/sale-potential", post(handlers::predict_sale_potential))
        .route("/sale-potential/history", get(handlers::sale_history))
        .route("/sale-potential/:id", delete(handlers::delete_sale))
        .with_state(state)
}

/// Health endpoint at root level.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .with_state(state)
}
