//! Catalog module - products, product types and stations.

mod errors;
mod product;
mod station;

pub use errors::CatalogError;
pub use product::{NewProduct, Product, ProductChanges};
pub use station::{ProductType, Station};
