//! Catalog queries.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Product, Station};
use crate::ports::CatalogStore;

/// Lists products, including discontinued ones so that old orders still
/// resolve on screens.
pub struct ListProductsHandler {
    catalog: Arc<dyn CatalogStore>,
}

impl ListProductsHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.catalog.list_products().await?)
    }
}

/// Lists stations with their assigned products.
pub struct ListStationsHandler {
    catalog: Arc<dyn CatalogStore>,
}

impl ListStationsHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self) -> Result<Vec<Station>, CatalogError> {
        Ok(self.catalog.list_stations().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalogStore;

    #[tokio::test]
    async fn lists_stations_with_assignments() {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let station = catalog.insert_station("Bar").await.unwrap();
        let handler = ListStationsHandler::new(catalog);

        let stations = handler.handle().await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id(), station.id());
        assert!(stations[0].products().is_empty());
    }
}
