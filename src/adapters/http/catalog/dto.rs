//! DTOs for catalog endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{Product, ProductType, Station};
use crate::domain::foundation::{ProductId, ProductTypeId, StationId};

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductTypeRequest {
    pub name: String,
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub type_id: ProductTypeId,
    pub discontinued: bool,
    pub sold_out: bool,
}

impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id(),
            name: product.name().to_string(),
            price: product.price(),
            type_id: product.type_id(),
            discontinued: product.is_discontinued(),
            sold_out: product.is_sold_out(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductResponse {
    pub product: ProductResponse,
    pub changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductTypeResponse {
    pub id: ProductTypeId,
    pub name: String,
    pub title: String,
}

impl From<ProductType> for ProductTypeResponse {
    fn from(product_type: ProductType) -> Self {
        Self {
            id: product_type.id,
            name: product_type.name,
            title: product_type.title,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StationResponse {
    pub id: StationId,
    pub name: String,
    pub products: Vec<ProductId>,
}

impl From<&Station> for StationResponse {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id(),
            name: station.name().to_string(),
            products: station.products().iter().copied().collect(),
        }
    }
}

/// Outcome of an assignment change; `changed` is false for no-ops.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub station_id: StationId,
    pub product_id: ProductId,
    pub changed: bool,
}
