//! In-memory catalog store.
//!
//! Default store when no database is configured, and the store used by tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::catalog::{NewProduct, Product, ProductType, Station};
use crate::domain::foundation::{DomainError, ErrorCode, ProductId, ProductTypeId, StationId};
use crate::ports::CatalogStore;

#[derive(Debug, Default)]
struct CatalogState {
    next_id: i64,
    products: BTreeMap<ProductId, Product>,
    product_types: BTreeMap<ProductTypeId, ProductType>,
    stations: BTreeMap<StationId, Station>,
}

impl CatalogState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory [`CatalogStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn product_not_found(id: ProductId) -> DomainError {
    DomainError::new(ErrorCode::ProductNotFound, format!("Product not found: {}", id))
}

fn station_not_found(id: StationId) -> DomainError {
    DomainError::new(ErrorCode::StationNotFound, format!("Station not found: {}", id))
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn insert_product(&self, draft: NewProduct) -> Result<Product, DomainError> {
        let mut state = self.state.write().await;
        if !state.product_types.contains_key(&draft.type_id) {
            return Err(DomainError::new(
                ErrorCode::ProductTypeNotFound,
                format!("Product type not found: {}", draft.type_id),
            ));
        }
        let id = ProductId::new(state.allocate_id());
        let product = Product::from_draft(id, draft);
        state.products.insert(id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, product: &Product) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let slot = state
            .products
            .get_mut(&product.id())
            .ok_or_else(|| product_not_found(product.id()))?;
        *slot = product.clone();
        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.products.get(id).cloned())
            .collect())
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        Ok(self.state.read().await.products.values().cloned().collect())
    }

    async fn insert_product_type(
        &self,
        name: &str,
        title: &str,
    ) -> Result<ProductType, DomainError> {
        let mut state = self.state.write().await;
        let id = ProductTypeId::new(state.allocate_id());
        let product_type = ProductType {
            id,
            name: name.to_string(),
            title: title.to_string(),
        };
        state.product_types.insert(id, product_type.clone());
        Ok(product_type)
    }

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, DomainError> {
        Ok(self.state.read().await.product_types.get(&id).cloned())
    }

    async fn insert_station(&self, name: &str) -> Result<Station, DomainError> {
        let mut state = self.state.write().await;
        let id = StationId::new(state.allocate_id());
        let station = Station::new(id, name);
        state.stations.insert(id, station.clone());
        Ok(station)
    }

    async fn find_station(&self, id: StationId) -> Result<Option<Station>, DomainError> {
        Ok(self.state.read().await.stations.get(&id).cloned())
    }

    async fn list_stations(&self) -> Result<Vec<Station>, DomainError> {
        Ok(self.state.read().await.stations.values().cloned().collect())
    }

    async fn assign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        if !state.products.contains_key(&product_id) {
            return Err(product_not_found(product_id));
        }
        let station = state
            .stations
            .get_mut(&station_id)
            .ok_or_else(|| station_not_found(station_id))?;
        Ok(station.assign(product_id))
    }

    async fn unassign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;
        let station = state
            .stations
            .get_mut(&station_id)
            .ok_or_else(|| station_not_found(station_id))?;
        Ok(station.unassign(product_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_with_type() -> (InMemoryCatalogStore, ProductTypeId) {
        let store = InMemoryCatalogStore::new();
        let kind = store.insert_product_type("food", "Food").await.unwrap();
        (store, kind.id)
    }

    fn draft(name: &str, type_id: ProductTypeId) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            price: 4.5,
            type_id,
        }
    }

    #[tokio::test]
    async fn insert_product_assigns_id() {
        let (store, kind) = store_with_type().await;
        let product = store.insert_product(draft("Burger", kind)).await.unwrap();

        let found = store.find_product(product.id()).await.unwrap().unwrap();
        assert_eq!(found.name(), "Burger");
        assert_eq!(store.list_products().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn insert_product_requires_known_type() {
        let store = InMemoryCatalogStore::new();
        let err = store
            .insert_product(draft("Burger", ProductTypeId::new(99)))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductTypeNotFound);
    }

    #[tokio::test]
    async fn update_unknown_product_fails() {
        let (store, kind) = store_with_type().await;
        let ghost = Product::from_draft(ProductId::new(500), draft("Ghost", kind));
        let err = store.update_product(&ghost).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }

    #[tokio::test]
    async fn find_products_skips_unknown_ids() {
        let (store, kind) = store_with_type().await;
        let a = store.insert_product(draft("A", kind)).await.unwrap();
        let found = store
            .find_products(&[a.id(), ProductId::new(404)])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn assignment_round_trip() {
        let (store, kind) = store_with_type().await;
        let product = store.insert_product(draft("Fries", kind)).await.unwrap();
        let station = store.insert_station("Fryer").await.unwrap();

        assert!(store.assign_product(station.id(), product.id()).await.unwrap());
        assert!(!store.assign_product(station.id(), product.id()).await.unwrap());
        let stored = store.find_station(station.id()).await.unwrap().unwrap();
        assert!(stored.handles(product.id()));

        assert!(store.unassign_product(station.id(), product.id()).await.unwrap());
        assert!(!store.unassign_product(station.id(), product.id()).await.unwrap());
    }

    #[tokio::test]
    async fn assign_rejects_unknown_ids() {
        let (store, kind) = store_with_type().await;
        let product = store.insert_product(draft("Fries", kind)).await.unwrap();
        let station = store.insert_station("Fryer").await.unwrap();

        let err = store
            .assign_product(StationId::new(404), product.id())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StationNotFound);

        let err = store
            .assign_product(station.id(), ProductId::new(404))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
    }
}
