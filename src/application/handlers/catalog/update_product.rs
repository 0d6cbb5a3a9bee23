//! UpdateProductHandler - Command handler for editing catalog products.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, Product, ProductChanges};
use crate::domain::events::{DomainEvent, ProductPayload};
use crate::domain::foundation::{AuthScope, ProductId};
use crate::application::handlers::ProductLocks;
use crate::ports::{CatalogStore, EventPublisher};

/// Command to update a product.
#[derive(Debug, Clone)]
pub struct UpdateProductCommand {
    pub scope: AuthScope,
    pub product_id: ProductId,
    pub changes: ProductChanges,
}

/// Result of an update.
#[derive(Debug, Clone)]
pub struct UpdateProductResult {
    pub product: Product,
    /// False when the changes matched the stored product; nothing was written or published.
    pub changed: bool,
}

/// Handler for updating products.
///
/// The product's lock covers the read, the write and the publish, so
/// concurrent edits neither lose updates nor publish out of commit order.
pub struct UpdateProductHandler {
    catalog: Arc<dyn CatalogStore>,
    publisher: Arc<dyn EventPublisher>,
    locks: ProductLocks,
}

impl UpdateProductHandler {
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

    pub async fn handle(&self, cmd: UpdateProductCommand) -> Result<UpdateProductResult, CatalogError> {
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }

        let _guard = self.locks.lock(cmd.product_id).await;
        let mut product = self
            .catalog
            .find_product(cmd.product_id)
            .await?
            .ok_or_else(|| CatalogError::product_not_found(cmd.product_id))?;

        if let Some(type_id) = cmd.changes.type_id {
            if self.catalog.find_product_type(type_id).await?.is_none() {
                return Err(CatalogError::product_type_not_found(type_id));
            }
        }

        let changed = product.apply(cmd.changes)?;
        if changed {
            self.catalog.update_product(&product).await?;
            let sequence = self
                .publisher
                .publish(DomainEvent::ProductUpdated(ProductPayload::from(&product)));
            tracing::info!(product_id = %product.id(), sequence, "product updated");
        }

        Ok(UpdateProductResult { product, changed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalogStore;
    use crate::application::handlers::testing::RecordingPublisher;
    use crate::domain::catalog::NewProduct;
    use crate::domain::foundation::{ErrorCode, ProductTypeId};

    struct Fixture {
        handler: UpdateProductHandler,
        catalog: Arc<InMemoryCatalogStore>,
        publisher: Arc<RecordingPublisher>,
        product: Product,
    }

    async fn setup() -> Fixture {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let kind = catalog.insert_product_type("food", "Food").await.unwrap();
        let product = catalog
            .insert_product(NewProduct {
                name: "Burger".to_string(),
                price: 8.0,
                type_id: kind.id,
            })
            .await
            .unwrap();
        let publisher = Arc::new(RecordingPublisher::new());
        Fixture {
            handler: UpdateProductHandler::new(catalog.clone(), publisher.clone(), ProductLocks::new()),
            catalog,
            publisher,
            product,
        }
    }

    fn command(product_id: ProductId, changes: ProductChanges) -> UpdateProductCommand {
        UpdateProductCommand {
            scope: AuthScope::admin(),
            product_id,
            changes,
        }
    }

    #[tokio::test]
    async fn update_persists_and_publishes_full_state() {
        let fx = setup().await;
        let result = fx
            .handler
            .handle(command(
                fx.product.id(),
                ProductChanges {
                    sold_out: Some(true),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        assert!(result.changed);
        let stored = fx.catalog.find_product(fx.product.id()).await.unwrap().unwrap();
        assert!(stored.is_sold_out());

        match fx.publisher.events().as_slice() {
            [DomainEvent::ProductUpdated(payload)] => {
                assert!(payload.sold_out);
                assert_eq!(payload.name, "Burger");
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_op_update_publishes_nothing() {
        let fx = setup().await;
        let result = fx
            .handler
            .handle(command(
                fx.product.id(),
                ProductChanges {
                    price: Some(8.0),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        assert!(!result.changed);
        assert!(fx.publisher.events().is_empty());
    }

    #[tokio::test]
    async fn unknown_product_and_type_are_not_found() {
        let fx = setup().await;
        let err = fx
            .handler
            .handle(command(ProductId::new(404), ProductChanges::default()))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductNotFound);

        let err = fx
            .handler
            .handle(command(
                fx.product.id(),
                ProductChanges {
                    type_id: Some(ProductTypeId::new(404)),
                    ..Default::default()
                },
            ))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductTypeNotFound);
    }

    #[tokio::test]
    async fn station_scope_cannot_edit() {
        let fx = setup().await;
        let err = fx
            .handler
            .handle(UpdateProductCommand {
                scope: AuthScope::station(crate::domain::foundation::StationId::new(1)),
                product_id: fx.product.id(),
                changes: ProductChanges::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Forbidden);
    }
}
