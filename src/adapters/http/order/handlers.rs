//! HTTP handlers for order endpoints.
//!
//! Any authenticated scope may place and progress orders; sales staff take
//! them and station staff mark their products done.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::parse_id;
use crate::adapters::http::middleware::RequireScope;
use crate::application::handlers::order::{
    CancelOrderCommand, CancelOrderHandler, CreateOrderCommand, CreateOrderHandler,
    GetOrderHandler, GetOrderQuery, MarkFulfilledCommand, MarkFulfilledHandler,
};
use crate::domain::foundation::{OrderId, ProductId};
use crate::domain::order::OrderRequest;

use super::dto::OrderResponse;

#[derive(Clone)]
pub struct OrderHandlers {
    pub create: Arc<CreateOrderHandler>,
    pub get: Arc<GetOrderHandler>,
    pub mark_fulfilled: Arc<MarkFulfilledHandler>,
    pub cancel: Arc<CancelOrderHandler>,
}

/// POST /api/orders
pub async fn create_order(
    State(handlers): State<OrderHandlers>,
    RequireScope(_scope): RequireScope,
    Json(request): Json<OrderRequest>,
) -> Response {
    match handlers.create.handle(CreateOrderCommand { request }).await {
        Ok(order) => (StatusCode::CREATED, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /api/orders/:id
pub async fn get_order(
    State(handlers): State<OrderHandlers>,
    RequireScope(_scope): RequireScope,
    Path(order_id): Path<String>,
) -> Response {
    let order_id: OrderId = match parse_id("order", &order_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.get.handle(GetOrderQuery { order_id }).await {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /api/orders/:id/products/:product_id/fulfilled
pub async fn mark_fulfilled(
    State(handlers): State<OrderHandlers>,
    RequireScope(_scope): RequireScope,
    Path((order_id, product_id)): Path<(String, String)>,
) -> Response {
    let order_id: OrderId = match parse_id("order", &order_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let product_id: ProductId = match parse_id("product", &product_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = MarkFulfilledCommand {
        order_id,
        product_id,
    };
    match handlers.mark_fulfilled.handle(cmd).await {
        Ok(result) => (StatusCode::OK, Json(OrderResponse::from(&result.order))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/orders/:id - cancel
pub async fn cancel_order(
    State(handlers): State<OrderHandlers>,
    RequireScope(_scope): RequireScope,
    Path(order_id): Path<String>,
) -> Response {
    let order_id: OrderId = match parse_id("order", &order_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    match handlers.cancel.handle(CancelOrderCommand { order_id }).await {
        Ok(order) => (StatusCode::OK, Json(OrderResponse::from(&order))).into_response(),
        Err(e) => e.into_response(),
    }
}
