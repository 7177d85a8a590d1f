//! HTTP transport — maps storefront operations onto routes.
//!
//! Requires the `http` feature. Uses axum for routing.
//!
//! ## Routes
//!
//! - `GET /health` — liveness check.
//! - `GET /products` — full catalog.
//! - `GET /orders/:order_id` — one placed order.
//! - `POST /place-order` — run the checkout pipeline; `201` with the
//!   order id on success, the classified error's status and message
//!   otherwise.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dcomm::{http, LogMailer, Storefront};
//!
//! let shop = Arc::new(Storefront::in_memory(LogMailer::new()));
//!
//! // Get the router to compose with other axum routes
//! let app = http::router(shop.clone());
//!
//! // Or serve directly
//! http::serve(shop, "0.0.0.0:5000").await?;
//! ```

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::checkout::CheckoutRequest;
use crate::feed::StockPublisher;
use crate::inventory::InventoryStore;
use crate::ledger::OrderLedger;
use crate::mailer::CustomerMailer;
use crate::storefront::Storefront;

/// Build an axum `Router` over a shared storefront.
pub fn router<S, L, M, P>(storefront: Arc<Storefront<S, L, M, P>>) -> Router
where
    S: InventoryStore + 'static,
    L: OrderLedger + 'static,
    M: CustomerMailer + 'static,
    P: StockPublisher + 'static,
{
    Router::new()
        .route("/health", get(health_handler))
        .route("/products", get(products_handler))
        .route("/orders/:order_id", get(order_handler))
        .route("/place-order", post(place_order_handler))
        .with_state(storefront)
}

/// Serve the storefront over HTTP at the given address (e.g. `"0.0.0.0:5000"`).
pub async fn serve<S, L, M, P>(
    storefront: Arc<Storefront<S, L, M, P>>,
    addr: &str,
) -> Result<(), std::io::Error>
where
    S: InventoryStore + 'static,
    L: OrderLedger + 'static,
    M: CustomerMailer + 'static,
    P: StockPublisher + 'static,
{
    let app = router(storefront);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn products_handler<S, L, M, P>(
    State(storefront): State<Arc<Storefront<S, L, M, P>>>,
) -> impl IntoResponse
where
    S: InventoryStore + 'static,
    L: OrderLedger + 'static,
    M: CustomerMailer + 'static,
    P: StockPublisher + 'static,
{
    match storefront.products() {
        Ok(products) => (StatusCode::OK, Json(products)).into_response(),
        Err(e) => {
            eprintln!("product listing failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Error fetching products" })),
            )
                .into_response()
        }
    }
}

async fn order_handler<S, L, M, P>(
    State(storefront): State<Arc<Storefront<S, L, M, P>>>,
    Path(order_id): Path<String>,
) -> impl IntoResponse
where
    S: InventoryStore + 'static,
    L: OrderLedger + 'static,
    M: CustomerMailer + 'static,
    P: StockPublisher + 'static,
{
    match storefront.order(&order_id) {
        Ok(Some(order)) => (StatusCode::OK, Json(order)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Order not found" })),
        )
            .into_response(),
        Err(e) => {
            eprintln!("order lookup for {} failed: {}", order_id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Server error" })),
            )
                .into_response()
        }
    }
}

async fn place_order_handler<S, L, M, P>(
    State(storefront): State<Arc<Storefront<S, L, M, P>>>,
    Json(request): Json<CheckoutRequest>,
) -> impl IntoResponse
where
    S: InventoryStore + 'static,
    L: OrderLedger + 'static,
    M: CustomerMailer + 'static,
    P: StockPublisher + 'static,
{
    match storefront.place_order(&request) {
        Ok(placed) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Order placed successfully",
                "orderID": placed.order_id,
            })),
        )
            .into_response(),
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(json!({ "message": e.to_string() }))).into_response()
        }
    }
}
