//! CreateProductHandler - Command handler for adding catalog products.

use std::sync::Arc;

use crate::domain::catalog::{CatalogError, NewProduct, Product};
use crate::domain::events::{DomainEvent, ProductPayload};
use crate::domain::foundation::AuthScope;
use crate::ports::{CatalogStore, EventPublisher};

/// Command to create a product.
#[derive(Debug, Clone)]
pub struct CreateProductCommand {
    pub scope: AuthScope,
    pub product: NewProduct,
}

/// Handler for creating products.
pub struct CreateProductHandler {
    catalog: Arc<dyn CatalogStore>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateProductHandler {
    pub fn new(catalog: Arc<dyn CatalogStore>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self { catalog, publisher }
    }

    pub async fn handle(&self, cmd: CreateProductCommand) -> Result<Product, CatalogError> {
        // 1. Authorize
        if !cmd.scope.is_admin() {
            return Err(CatalogError::Forbidden);
        }

        // 2. Validate
        let draft = cmd.product.validated()?;

        // 3. Persist (the store rejects unknown product types)
        let product = self.catalog.insert_product(draft).await?;

        // 4. Publish
        let sequence = self
            .publisher
            .publish(DomainEvent::ProductCreated(ProductPayload::from(&product)));
        tracing::info!(product_id = %product.id(), sequence, "product created");

        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryCatalogStore;
    use crate::application::handlers::testing::RecordingPublisher;
    use crate::domain::events::EventKind;
    use crate::domain::foundation::{ErrorCode, ProductTypeId};

    async fn setup() -> (CreateProductHandler, Arc<RecordingPublisher>, ProductTypeId) {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let kind = catalog.insert_product_type("drinks", "Drinks").await.unwrap();
        let publisher = Arc::new(RecordingPublisher::new());
        let handler = CreateProductHandler::new(catalog, publisher.clone());
        (handler, publisher, kind.id)
    }

    fn command(scope: AuthScope, name: &str, price: f64, type_id: ProductTypeId) -> CreateProductCommand {
        CreateProductCommand {
            scope,
            product: NewProduct {
                name: name.to_string(),
                price,
                type_id,
            },
        }
    }

    #[tokio::test]
    async fn creates_product_and_publishes() {
        let (handler, publisher, kind) = setup().await;

        let product = handler
            .handle(command(AuthScope::admin(), "  Lemonade ", 2.5, kind))
            .await
            .unwrap();

        assert_eq!(product.name(), "Lemonade");
        assert_eq!(publisher.kinds(), vec![EventKind::ProductCreated]);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let (handler, publisher, kind) = setup().await;
        let err = handler
            .handle(command(AuthScope::sales(), "Lemonade", 2.5, kind))
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::Forbidden);
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn invalid_draft_is_rejected_without_event() {
        let (handler, publisher, kind) = setup().await;
        let err = handler
            .handle(command(AuthScope::admin(), "Lemonade", -1.0, kind))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn unknown_type_is_not_found() {
        let (handler, _, _) = setup().await;
        let err = handler
            .handle(command(AuthScope::admin(), "Lemonade", 1.0, ProductTypeId::new(77)))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ProductTypeNotFound);
    }
}
