//! HTTP handlers for catalog endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::parse_id;
use crate::adapters::http::middleware::RequireScope;
use crate::application::handlers::catalog::{
    AssignProductHandler, CreateProductCommand, CreateProductHandler, CreateProductTypeCommand,
    CreateProductTypeHandler, CreateStationCommand, CreateStationHandler,
    DiscontinueProductCommand, DiscontinueProductHandler, ListProductsHandler,
    ListStationsHandler, RemoveProductHandler, StationAssignmentCommand, UpdateProductCommand,
    UpdateProductHandler,
};
use crate::domain::catalog::{NewProduct, ProductChanges};
use crate::domain::foundation::{AuthScope, ProductId, StationId};

use super::dto::{
    AssignmentResponse, CreateProductTypeRequest, CreateStationRequest, ProductResponse,
    ProductTypeResponse, StationResponse, UpdateProductResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct CatalogHandlers {
    pub create_product: Arc<CreateProductHandler>,
    pub update_product: Arc<UpdateProductHandler>,
    pub discontinue_product: Arc<DiscontinueProductHandler>,
    pub list_products: Arc<ListProductsHandler>,
    pub create_product_type: Arc<CreateProductTypeHandler>,
    pub create_station: Arc<CreateStationHandler>,
    pub list_stations: Arc<ListStationsHandler>,
    pub assign_product: Arc<AssignProductHandler>,
    pub remove_product: Arc<RemoveProductHandler>,
}

// ════════════════════════════════════════════════════════════════════════════
// Products
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/products
pub async fn list_products(
    State(handlers): State<CatalogHandlers>,
    RequireScope(_scope): RequireScope,
) -> Response {
    match handlers.list_products.handle().await {
        Ok(products) => {
            let body: Vec<ProductResponse> = products.iter().map(ProductResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /api/products
pub async fn create_product(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Json(product): Json<NewProduct>,
) -> Response {
    match handlers
        .create_product
        .handle(CreateProductCommand { scope, product })
        .await
    {
        Ok(product) => (StatusCode::CREATED, Json(ProductResponse::from(&product))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// PUT /api/products/:id
pub async fn update_product(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Path(product_id): Path<String>,
    Json(changes): Json<ProductChanges>,
) -> Response {
    let product_id: ProductId = match parse_id("product", &product_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = UpdateProductCommand {
        scope,
        product_id,
        changes,
    };
    match handlers.update_product.handle(cmd).await {
        Ok(result) => {
            let body = UpdateProductResponse {
                product: ProductResponse::from(&result.product),
                changed: result.changed,
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/products/:id - soft discontinue
pub async fn discontinue_product(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Path(product_id): Path<String>,
) -> Response {
    let product_id: ProductId = match parse_id("product", &product_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers
        .discontinue_product
        .handle(DiscontinueProductCommand { scope, product_id })
        .await
    {
        Ok(product) => (StatusCode::OK, Json(ProductResponse::from(&product))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// POST /api/product-types
pub async fn create_product_type(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Json(req): Json<CreateProductTypeRequest>,
) -> Response {
    let cmd = CreateProductTypeCommand {
        scope,
        name: req.name,
        title: req.title,
    };
    match handlers.create_product_type.handle(cmd).await {
        Ok(product_type) => (
            StatusCode::CREATED,
            Json(ProductTypeResponse::from(product_type)),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Stations
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/stations
pub async fn list_stations(
    State(handlers): State<CatalogHandlers>,
    RequireScope(_scope): RequireScope,
) -> Response {
    match handlers.list_stations.handle().await {
        Ok(stations) => {
            let body: Vec<StationResponse> = stations.iter().map(StationResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// POST /api/stations
pub async fn create_station(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Json(req): Json<CreateStationRequest>,
) -> Response {
    match handlers
        .create_station
        .handle(CreateStationCommand {
            scope,
            name: req.name,
        })
        .await
    {
        Ok(station) => (StatusCode::CREATED, Json(StationResponse::from(&station))).into_response(),
        Err(e) => e.into_response(),
    }
}

fn assignment_command(
    scope: AuthScope,
    station_id: &str,
    product_id: &str,
) -> Result<StationAssignmentCommand, Response> {
    let station_id: StationId = parse_id("station", station_id)?;
    let product_id: ProductId = parse_id("product", product_id)?;
    Ok(StationAssignmentCommand {
        scope,
        station_id,
        product_id,
    })
}

/// POST /api/stations/:id/products/:product_id
pub async fn assign_product(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Path((station_id, product_id)): Path<(String, String)>,
) -> Response {
    let cmd = match assignment_command(scope, &station_id, &product_id) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };
    match handlers.assign_product.handle(cmd).await {
        Ok(changed) => (
            StatusCode::OK,
            Json(AssignmentResponse {
                station_id: cmd.station_id,
                product_id: cmd.product_id,
                changed,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

/// DELETE /api/stations/:id/products/:product_id
pub async fn remove_product(
    State(handlers): State<CatalogHandlers>,
    RequireScope(scope): RequireScope,
    Path((station_id, product_id)): Path<(String, String)>,
) -> Response {
    let cmd = match assignment_command(scope, &station_id, &product_id) {
        Ok(cmd) => cmd,
        Err(response) => return response,
    };
    match handlers.remove_product.handle(cmd).await {
        Ok(changed) => (
            StatusCode::OK,
            Json(AssignmentResponse {
                station_id: cmd.station_id,
                product_id: cmd.product_id,
                changed,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}
