//! DiscontinueProductHandler - Command handler for retiring catalog products.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Product};
use crate::domain::events::{DomainEvent, ProductDiscontinuedPayload};
use crate::domain::foundation::{AuthScope, ProductId};
use crate::application::handlers::ProductLocks;
use crate::ports::{CatalogStore, EventPublisher};

#[derive(Debug, Clone)]
pub struct DiscontinueProductCommand {
    pub scope: AuthScope,
    pub product_id: ProductId,
}

/// Handler for discontinuing products. Discontinuing twice is a no-op.
pub struct DiscontinueProductHandler {
    catalog: Arc<dyn CatalogStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: ProductLocks,
}

impl DiscontinueProductHandler {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        publisher: Arc<dyn EventPublisher>,
        locks: ProductLocks,
    ) -> Self {
        Self {
            catalog,
            publisher,
            locks,
        }
    }

    pub async fn handle(&self, cmd: DiscontinueProductCommand) -> Result<Product, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }

        let _guard = self.locks.lock(cmd.product_id).await;
        let mut product = self
            .catalog
            .find_product(cmd.product_id)
            .await?
            .ok_or_else(|| CatalogError::product_not_found(cmd.product_id))?;

        if product.discontinue() {
            self.catalog.update_product(&product).await?;
            let sequence = self
                .publisher
                .publish(DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload {
                    id: product.id(),
                }));
            tracing::info!(product_id = %product.id(), sequence, "product discontinued");
        }

        Ok(product)
    }
}
