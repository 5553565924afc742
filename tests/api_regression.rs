//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! the /api/v1/* endpoints using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use homeval::api::{create_app, AppState};
use homeval::config::ModelConfig;
use homeval::dataset::{HouseRow, MarketRow};
use homeval::store::RecordStore;
use homeval::types::SaleStatus;
use homeval::ModelContext;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

fn fixture_config() -> ModelConfig {
    ModelConfig {
        reference_year: 2024,
        n_trees: 12,
        max_depth: 8,
        min_samples_split: 2,
        max_features: 1.0,
        seed: 42,
    }
}

fn house_rows() -> Vec<HouseRow> {
    let suburbs = ["Carlton", "Richmond", "Fitzroy", "Brunswick"];
    let types = ["h", "u", "t"];
    (0..24)
        .map(|i| HouseRow {
            cbd_distance: 2.0 + (i % 12) as f64,
            bedrooms: 1.0 + (i % 4) as f64,
            bathrooms: 1.0 + (i % 2) as f64,
            car_spaces: (i % 3) as f64,
            landsize: 150.0 + 40.0 * (i % 8) as f64,
            building_area: 80.0 + 20.0 * (i % 6) as f64,
            built_year: 1970.0 + 2.0 * i as f64,
            suburb: suburbs[i % suburbs.len()].to_string(),
            property_type: types[i % types.len()].to_string(),
            price: 400_000.0 + 45_000.0 * (i % 10) as f64,
        })
        .collect()
}

fn market_rows() -> Vec<MarketRow> {
    let agencies = ["Ray White", "Jellis Craig", "Nelson"];
    (0..24)
        .map(|i| MarketRow {
            price: if i % 2 == 0 {
                620_000.0 + 5_000.0 * (i % 4) as f64
            } else {
                900_000.0 + 20_000.0 * (i % 4) as f64
            },
            cbd_distance: 3.0 + (i % 10) as f64,
            bedrooms: 2.0 + (i % 3) as f64,
            bathrooms: 1.0 + (i % 2) as f64,
            car_spaces: (i % 2) as f64,
            landsize: 200.0 + 30.0 * (i % 6) as f64,
            agency: agencies[i % agencies.len()].to_string(),
            median_price: 630_000.0,
            median_rental: 480.0,
            status: if i % 2 == 0 {
                SaleStatus::Sold
            } else {
                SaleStatus::OnSale
            },
        })
        .collect()
}

/// App plus the tempdir keeping the store files alive.
fn create_test_app() -> (Router, tempfile::TempDir) {
    let ctx = ModelContext::train(&fixture_config(), &house_rows(), &market_rows())
        .expect("fixture training");
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState {
        ctx: Arc::new(ctx),
        price_store: Arc::new(Mutex::new(
            RecordStore::open(dir.path().join("predictions.json")).expect("price store"),
        )),
        sale_store: Arc::new(Mutex::new(
            RecordStore::open(dir.path().join("sale_predictions.json")).expect("sale store"),
        )),
    };
    (create_app(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).expect("encode")))
        .expect("request")
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn property_body() -> Value {
    json!({
        "cbd_distance": 6.0,
        "bedrooms": 3,
        "bathrooms": 2,
        "car_spaces": 1,
        "landsize": 350.0,
        "building_area": 140.0,
        "built_year": 1995,
        "suburb": "Richmond",
        "property_type": "h"
    })
}

fn listing_body() -> Value {
    json!({
        "price": 625000.0,
        "cbd_distance": 5.0,
        "bedrooms": 3,
        "bathrooms": 1,
        "car_spaces": 1,
        "landsize": 260.0,
        "agency": "Ray White",
        "median_price": 630000.0,
        "median_rental": 480
    })
}

#[tokio::test]
async fn test_health_reports_models() {
    let (app, _dir) = create_test_app();
    let resp = app.oneshot(get("/health")).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let v = body_json(resp).await;
    assert_eq!(v["data"]["status"], "ok");
    assert!(v["data"]["models"].as_str().expect("models").contains("trees"));
}

#[tokio::test]
async fn test_price_prediction_appends_record() {
    let (app, _dir) = create_test_app();

    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/price", &property_body()))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    assert_eq!(v["data"]["id"], 1);
    let price = v["data"]["predicted_price"].as_f64().expect("price");
    assert!(price > 0.0);

    let resp = app.oneshot(get("/api/v1/price/history")).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    let records = v["data"].as_array().expect("records");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[0]["predicted_price"], price);
    assert_eq!(records[0]["input"]["suburb"], "Richmond");
}

#[tokio::test]
async fn test_price_delete_then_missing_is_404() {
    let (app, _dir) = create_test_app();

    app.clone()
        .oneshot(post_json("/api/v1/price", &property_body()))
        .await
        .expect("response");

    let resp = app.clone().oneshot(delete("/api/v1/price/1")).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(delete("/api/v1/price/1")).await.expect("response");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "NOT_FOUND");

    let resp = app.oneshot(get("/api/v1/price/history")).await.expect("response");
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().expect("records").len(), 0);
}

#[tokio::test]
async fn test_unknown_property_type_rejected_without_record() {
    let (app, _dir) = create_test_app();

    let mut body = property_body();
    body["property_type"] = json!("castle");
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/price", &body))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "UNKNOWN_CATEGORY");

    // failed pipeline must leave no partial record
    let resp = app.oneshot(get("/api/v1/price/history")).await.expect("response");
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().expect("records").len(), 0);
}

#[tokio::test]
async fn test_sale_potential_returns_tier_and_score() {
    let (app, _dir) = create_test_app();

    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/sale-potential", &listing_body()))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    let v = body_json(resp).await;
    let score = v["data"]["score"].as_f64().expect("score");
    assert!(score > 0.0 && score <= 100.0);
    assert!(["Bad", "Average", "Good"]
        .contains(&v["data"]["tier"].as_str().expect("tier")));

    let resp = app
        .oneshot(get("/api/v1/sale-potential/history"))
        .await
        .expect("response");
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().expect("records").len(), 1);
}

#[tokio::test]
async fn test_zero_price_is_domain_error_and_not_persisted() {
    let (app, _dir) = create_test_app();

    let mut body = listing_body();
    body["price"] = json!(0.0);
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/sale-potential", &body))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "DOMAIN_ERROR");

    let resp = app
        .oneshot(get("/api/v1/sale-potential/history"))
        .await
        .expect("response");
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().expect("records").len(), 0);
}

#[tokio::test]
async fn test_unknown_agency_rejected_without_record() {
    let (app, _dir) = create_test_app();

    let mut body = listing_body();
    body["agency"] = json!("Imaginary Estates");
    let resp = app
        .clone()
        .oneshot(post_json("/api/v1/sale-potential", &body))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let v = body_json(resp).await;
    assert_eq!(v["error"]["code"], "UNKNOWN_CATEGORY");

    let resp = app
        .oneshot(get("/api/v1/sale-potential/history"))
        .await
        .expect("response");
    let v = body_json(resp).await;
    assert_eq!(v["data"].as_array().expect("records").len(), 0);
}

#[tokio::test]
async fn test_missing_optional_fields_accepted() {
    let (app, _dir) = create_test_app();

    let body = json!({
        "cbd_distance": 6.0,
        "bedrooms": 2,
        "bathrooms": 1,
        "car_spaces": 0,
        "property_type": "u"
    });
    let resp = app
        .oneshot(post_json("/api/v1/price", &body))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let (app, _dir) = create_test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/price")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("request");
    let resp = app.oneshot(req).await.expect("response");
    assert!(resp.status().is_client_error());
}

#[tokio::test]
async fn test_sale_delete_missing_is_404() {
    let (app, _dir) = create_test_app();
    let resp = app
        .oneshot(delete("/api/v1/sale-potential/99"))
        .await
        .expect("response");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
