//! Warehouse handlers

use std::sync::Arc;

use axum::{Json, extract::State};

use super::super::state::AppState;
use super::super::types::FulfillOrderJson;
use crate::fulfillment::{FulfillOrderRequest, FulfillOrderResponse, FulfillmentError};

/// Fulfill an order into a warehouse
///
/// Matches the oldest open order for the product with the same amount that
/// was created before `CreatedAt`, marks it fulfilled and records the stock
/// movement. Errors are returned as plain text.
#[utoipa::path(
    post,
    path = "/Warehouse/AddProductToWarehouse",
    request_body = FulfillOrderRequest,
    responses(
        (status = 200, description = "Order fulfilled", body = FulfillOrderResponse, content_type = "application/json"),
        (status = 400, description = "Amount must be greater than 0. | No matching order found or it was already fulfilled.", body = String, content_type = "text/plain"),
        (status = 404, description = "Product not found. | Warehouse not found.", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = String, content_type = "text/plain")
    ),
    tag = "Warehouse"
)]
pub async fn add_product_to_warehouse(
    State(state): State<Arc<AppState>>,
    FulfillOrderJson(req): FulfillOrderJson,
) -> Result<Json<FulfillOrderResponse>, FulfillmentError> {
    let id_product_warehouse = state.fulfillment.add_product_to_warehouse(&req).await?;
    Ok(Json(FulfillOrderResponse {
        id_product_warehouse,
    }))
}
