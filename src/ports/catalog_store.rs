//! Catalog store port.
//!
//! Persists products, product types, stations and the station ↔ product
//! assignments that drive event routing.

use async_trait::async_trait;

use crate::domain::catalog::{NewProduct, Product, ProductType, Station};
use crate::domain::foundation::{DomainError, ProductId, ProductTypeId, StationId};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Insert a validated product draft and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// - `ProductTypeNotFound` if the draft's type does not exist
    /// - `DatabaseError` on persistence failure
    async fn insert_product(&self, draft: NewProduct) -> Result<Product, DomainError>;

    /// Overwrite an existing product.
    ///
    /// # Errors
    ///
    /// - `ProductNotFound` if the product doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_product(&self, product: &Product) -> Result<(), DomainError>;

    /// Find a product by id, discontinued or not.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError>;

    /// Fetch several products at once. Unknown ids are simply absent.
    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError>;

    /// Every product, ordered by id.
    async fn list_products(&self) -> Result<Vec<Product>, DomainError>;

    async fn insert_product_type(
        &self,
        name: &str,
        title: &str,
    ) -> Result<ProductType, DomainError>;

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, DomainError>;

    async fn insert_station(&self, name: &str) -> Result<Station, DomainError>;

    async fn find_station(&self, id: StationId) -> Result<Option<Station>, DomainError>;

    /// Every station with its assigned products, ordered by id.
    async fn list_stations(&self) -> Result<Vec<Station>, DomainError>;

    /// Assign a product to a station. Returns false if it was already assigned.
    ///
    /// # Errors
    ///
    /// - `StationNotFound` / `ProductNotFound` for unknown ids
    async fn assign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError>;

    /// Remove an assignment. Returns false if there was none.
    ///
    /// # Errors
    ///
    /// - `StationNotFound` for an unknown station
    async fn unassign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn CatalogStore) {}
    }
}
