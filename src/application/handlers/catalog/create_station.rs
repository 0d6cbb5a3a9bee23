//! Handlers for catalog reference data: product types and stations.
//!
//! Neither produces an event; stations only start mattering for routing
//! once products are assigned to them.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, ProductType, Station};
use crate::domain::foundation::{AuthScope, ValidationError};
use crate::ports::CatalogStore;

#[derive(Debug, Clone)]
pub struct CreateProductTypeCommand {
    pub scope: AuthScope,
    pub name: String,
    pub title: String,
}

pub struct CreateProductTypeHandler {
    catalog: Arc<dyn CatalogStore>,
}

impl CreateProductTypeHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, cmd: CreateProductTypeCommand) -> Result<ProductType, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }
        let name = required("name", &cmd.name)?;
        let product_type = self
            .catalog
            .insert_product_type(&name, cmd.title.trim())
            .await?;
        tracing::info!(product_type_id = %product_type.id, "product type created");
        Ok(product_type)
    }
}

#[derive(Debug, Clone)]
pub struct CreateStationCommand {
    pub scope: AuthScope,
    pub name: String,
}

pub struct CreateStationHandler {
    catalog: Arc<dyn CatalogStore>,
}

impl CreateStationHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self { catalog }
    }

    pub async fn handle(&self, cmd: CreateStationCommand) -> Result<Station, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }
        let name = required("name", &cmd.name)?;
        let station = self.catalog.insert_station(&name).await?;
        tracing::info!(station_id = %station.id(), "station created");
        Ok(station)
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalogStore;

    #[tokio::test]
    async fn creates_station_with_trimmed_name() {
        let handler = CreateStationHandler::new(Arc::new(InMemoryCatalogStore::new()));
        let station = handler
            .handle(CreateStationCommand {
                scope: AuthScope::admin(),
                name: " Bar ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(station.name(), "Bar");
        assert!(station.products().is_empty());
    }

    #[tokio::test]
    async fn blank_names_are_rejected() {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let stations = CreateStationHandler::new(catalog.clone());
        let types = CreateProductTypeHandler::new(catalog);

        let err = stations
            .handle(CreateStationCommand {
                scope: AuthScope::admin(),
                name: "  ".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationFailed { .. }));

        let err = types
            .handle(CreateProductTypeCommand {
                scope: AuthScope::admin(),
                name: String::new(),
                title: "Drinks".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn sales_cannot_create_reference_data() {
        let handler = CreateProductTypeHandler::new(Arc::new(InMemoryCatalogStore::new()));
        let err = handler
            .handle(CreateProductTypeCommand {
                scope: AuthScope::sales(),
                name: "drinks".to_string(),
                title: "Drinks".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Forbidden);
    }
}
