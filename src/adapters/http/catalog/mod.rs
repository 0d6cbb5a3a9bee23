//! HTTP adapter for the catalog: products, product types, stations and
//! station assignments.

mod dto;
mod handlers;
mod routes;

pub use dto::{ProductResponse, StationResponse};
pub use handlers::CatalogHandlers;
pub use routes::catalog_routes;
