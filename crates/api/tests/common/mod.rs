//! Shared helpers for API integration tests.
//!
//! Requests are sent straight to the router with `tower::ServiceExt::oneshot`,
//! no TCP listener involved.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use inventory_core::types::DbId;
use inventory_db::models::product::CreateProduct;
use inventory_db::models::purchase::CreatePurchase;
use inventory_db::models::user::CreateUser;
use inventory_db::repositories::{ProductRepo, PurchaseRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

use inventory_api::config::ServerConfig;
use inventory_api::router::build_app_router;
use inventory_api::state::AppState;

/// A `ServerConfig` with the development defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
    }
}

/// Build the full application router, middleware included, on `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState::new(pool, config.clone());
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn seed_user(pool: &PgPool, name: &str) -> DbId {
    let input = CreateUser {
        name: name.to_string(),
        location: None,
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

pub async fn seed_product(pool: &PgPool, name: &str, is_parent_type: bool) -> DbId {
    let input = CreateProduct {
        name: name.to_string(),
        is_parent_type,
    };
    ProductRepo::create(pool, &input).await.unwrap().id
}

pub async fn seed_purchase(
    pool: &PgPool,
    product_id: DbId,
    owner_user_id: Option<DbId>,
    serial_number: &str,
) -> DbId {
    let input = CreatePurchase {
        product_id,
        supplier_id: None,
        owner_user_id,
        serial_number: Some(serial_number.to_string()),
        purchase_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        warranty_end: None,
    };
    PurchaseRepo::create(pool, &input).await.unwrap().id
}

/// Ids of a small inventory: Ana owns a laptop and a RAM module, Bruno owns
/// an SSD, and one monitor is unassigned.
pub struct Inventory {
    pub ana: DbId,
    pub bruno: DbId,
    pub laptop: DbId,
    pub ram: DbId,
    pub ssd: DbId,
    pub unassigned: DbId,
}

pub async fn seed_inventory(pool: &PgPool) -> Inventory {
    let ana = seed_user(pool, "Ana").await;
    let bruno = seed_user(pool, "Bruno").await;
    let laptop_product = seed_product(pool, "Laptop X1", true).await;
    let ram_product = seed_product(pool, "RAM 16GB", false).await;
    let ssd_product = seed_product(pool, "SSD 1TB", false).await;
    let monitor_product = seed_product(pool, "Monitor 27in", false).await;

    Inventory {
        ana,
        bruno,
        laptop: seed_purchase(pool, laptop_product, Some(ana), "LPT-001").await,
        ram: seed_purchase(pool, ram_product, Some(ana), "RAM-001").await,
        ssd: seed_purchase(pool, ssd_product, Some(bruno), "SSD-001").await,
        unassigned: seed_purchase(pool, monitor_product, None, "MON-001").await,
    }
}
