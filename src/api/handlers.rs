//! HTTP endpoint handlers.
//!
//! Handlers are thin: deserialize, run the pipeline, persist on success,
//! wrap in the envelope. A record is appended only after the pipeline
//! succeeds, so a failed preparation or estimation never leaves a partial
//! record behind.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::envelope::{ApiErrorResponse, ApiResponse};
use crate::features::PrepareError;
use crate::pipeline::{ModelContext, PipelineError};
use crate::store::{RecordStore, StoreError};
use crate::types::{ListingStatusInput, PriceEntry, PropertyInput, SaleEntry};

/// Shared state for all endpoints.
///
/// The model context is read-only after training; the stores do unsynchronized
/// read-modify-write on their files, so each sits behind a mutex to keep ID
/// assignment race-free under concurrent requests.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<ModelContext>,
    pub price_store: Arc<Mutex<RecordStore<PriceEntry>>>,
    pub sale_store: Arc<Mutex<RecordStore<SaleEntry>>>,
}

fn pipeline_error_response(err: &PipelineError) -> Response {
    match err {
        PipelineError::Prepare(PrepareError::UnknownCategory { .. }) => {
            ApiErrorResponse::unknown_category(err.to_string())
        }
        PipelineError::Prepare(PrepareError::SchemaMismatch { .. }) => {
            ApiErrorResponse::internal(err.to_string())
        }
        PipelineError::Domain(_) => ApiErrorResponse::domain(err.to_string()),
        PipelineError::Dataset(_) => ApiErrorResponse::internal(err.to_string()),
    }
}

fn store_error_response(err: &StoreError) -> Response {
    match err {
        StoreError::NotFound { .. } => ApiErrorResponse::not_found(err.to_string()),
        StoreError::Decode { .. } => ApiErrorResponse::decode(err.to_string()),
        StoreError::Io(_) => ApiErrorResponse::internal(err.to_string()),
    }
}

// ============================================================================
// Price pipeline endpoints
// ============================================================================

#[derive(Debug, Serialize)]
struct PricePredictionResponse {
    id: u64,
    predicted_price: f64,
}

/// POST /api/v1/price
pub async fn predict_price(
    State(state): State<AppState>,
    Json(input): Json<PropertyInput>,
) -> Response {
    let predicted_price = match state.ctx.estimate_price(&input) {
        Ok(price) => price,
        Err(err) => {
            warn!(error = %err, "price estimation failed");
            return pipeline_error_response(&err);
        }
    };

    let store = state.price_store.lock().await;
    match store.append(PriceEntry {
        input,
        predicted_price,
    }) {
        Ok(id) => {
            info!(id, predicted_price, "price prediction recorded");
            ApiResponse::ok(PricePredictionResponse {
                id,
                predicted_price,
            })
        }
        Err(err) => {
            warn!(error = %err, "failed to persist price prediction");
            store_error_response(&err)
        }
    }
}

/// GET /api/v1/price/history
pub async fn price_history(State(state): State<AppState>) -> Response {
    let store = state.price_store.lock().await;
    match store.load() {
        Ok(records) => ApiResponse::ok(records),
        Err(err) => store_error_response(&err),
    }
}

#[derive(Debug, Serialize)]
struct DeletedResponse {
    deleted: u64,
}

/// DELETE /api/v1/price/:id
pub async fn delete_price(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let store = state.price_store.lock().await;
    match store.delete(id) {
        Ok(()) => {
            info!(id, "price prediction deleted");
            ApiResponse::ok(DeletedResponse { deleted: id })
        }
        Err(err) => store_error_response(&err),
    }
}

// ============================================================================
// Sale-potential endpoints
// ============================================================================

#[derive(Debug, Serialize)]
struct SalePotentialResponse {
    id: u64,
    tier: crate::types::SaleTier,
    score: f64,
}

/// POST /api/v1/sale-potential
pub async fn predict_sale_potential(
    State(state): State<AppState>,
    Json(input): Json<ListingStatusInput>,
) -> Response {
    let prediction = match state.ctx.estimate_sale_potential(&input) {
        Ok(prediction) => prediction,
        Err(err) => {
            warn!(error = %err, "sale-potential scoring failed");
            return pipeline_error_response(&err);
        }
    };

    let store = state.sale_store.lock().await;
    match store.append(SaleEntry {
        input,
        score: prediction.score,
        tier: prediction.tier,
    }) {
        Ok(id) => {
            info!(id, score = prediction.score, tier = ?prediction.tier, "sale potential recorded");
            ApiResponse::ok(SalePotentialResponse {
                id,
                tier: prediction.tier,
                score: prediction.score,
            })
        }
        Err(err) => {
            warn!(error = %err, "failed to persist sale-potential prediction");
            store_error_response(&err)
        }
    }
}

/// GET /api/v1/sale-potential/history
pub async fn sale_history(State(state): State<AppState>) -> Response {
    let store = state.sale_store.lock().await;
    match store.load() {
        Ok(records) => ApiResponse::ok(records),
        Err(err) => store_error_response(&err),
    }
}

/// DELETE /api/v1/sale-potential/:id
pub async fn delete_sale(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let store = state.sale_store.lock().await;
    match store.delete(id) {
        Ok(()) => {
            info!(id, "sale-potential prediction deleted");
            ApiResponse::ok(DeletedResponse { deleted: id })
        }
        Err(err) => store_error_response(&err),
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    models: String,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Response {
    ApiResponse::ok(HealthResponse {
        status: "ok",
        models: state.ctx.summary(),
    })
}
