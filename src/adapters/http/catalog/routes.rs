//! HTTP routes for catalog endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    assign_product, create_product, create_product_type, create_station, discontinue_product,
    list_products, list_stations, remove_product, update_product, CatalogHandlers,
};

/// Creates the catalog router. Mounted under `/api`.
pub fn catalog_routes(handlers: CatalogHandlers) -> Router {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(discontinue_product))
        .route("/product-types", post(create_product_type))
        .route("/stations", get(list_stations).post(create_station))
        .route(
            "/stations/:id/products/:product_id",
            post(assign_product).delete(remove_product),
        )
        .with_state(handlers)
}
