//! Shared wiring for integration tests: in-memory stores, the real bus and
//! subscriber manager, and the command handlers on top.

#![allow(dead_code)]

use std::sync::Arc;

use pos_live::adapters::events::InMemoryEventBus;
use pos_live::adapters::memory::{InMemoryCatalogStore, InMemoryOrderStore};
use pos_live::adapters::realtime::{QueueSettings, SubscriberHandle, SubscriberManager};
use pos_live::application::handlers::catalog::{
    AssignProductHandler, CreateProductHandler, StationAssignmentCommand, UpdateProductHandler,
};
use pos_live::application::handlers::{OrderLocks, ProductLocks};
use pos_live::application::handlers::order::{
    CancelOrderHandler, CreateOrderCommand, CreateOrderHandler, MarkFulfilledHandler,
};
use pos_live::domain::catalog::NewProduct;
use pos_live::domain::events::{DomainEvent, Event};
use pos_live::domain::foundation::{AuthScope, OrderId, ProductId, ProductTypeId, StationId};
use pos_live::domain::order::{OrderRequest, OrderRequestLine};
use pos_live::domain::routing::StationRouter;
use pos_live::ports::CatalogStore;

pub struct Harness {
    pub catalog: Arc<InMemoryCatalogStore>,
    pub orders: Arc<InMemoryOrderStore>,
    pub router: Arc<StationRouter>,
    pub bus: Arc<InMemoryEventBus>,
    pub manager: SubscriberManager,
    pub create_product: CreateProductHandler,
    pub update_product: UpdateProductHandler,
    pub assign: AssignProductHandler,
    pub create_order: CreateOrderHandler,
    pub mark_fulfilled: Arc<MarkFulfilledHandler>,
    pub cancel: CancelOrderHandler,
    product_type: ProductTypeId,
}

impl Harness {
    pub async fn new() -> Self {
        Self::with_queue(QueueSettings::default()).await
    }

    pub async fn with_queue(settings: QueueSettings) -> Self {
        let catalog = Arc::new(InMemoryCatalogStore::new());
        let orders = Arc::new(InMemoryOrderStore::new());
        let router = Arc::new(StationRouter::default());
        let bus = Arc::new(InMemoryEventBus::new(router.clone()));
        let manager = SubscriberManager::new(bus.clone(), settings);
        let product_type = catalog
            .insert_product_type("menu", "Menu")
            .await
            .unwrap()
            .id;

        let order_locks = OrderLocks::new();
        let product_locks = ProductLocks::new();

        Self {
            create_product: CreateProductHandler::new(catalog.clone(), bus.clone()),
            update_product: UpdateProductHandler::new(
                catalog.clone(),
                bus.clone(),
                product_locks.clone(),
            ),
            assign: AssignProductHandler::new(catalog.clone(), router.clone()),
            create_order: CreateOrderHandler::new(
                catalog.clone(),
                orders.clone(),
                bus.clone(),
                product_locks,
            ),
            mark_fulfilled: Arc::new(MarkFulfilledHandler::new(
                orders.clone(),
                bus.clone(),
                order_locks.clone(),
            )),
            cancel: CancelOrderHandler::new(orders.clone(), bus.clone(), order_locks),
            catalog,
            orders,
            router,
            bus,
            manager,
            product_type,
        }
    }

    pub async fn product(&self, name: &str) -> ProductId {
        self.catalog
            .insert_product(NewProduct {
                name: name.to_string(),
                price: 4.5,
                type_id: self.product_type,
            })
            .await
            .unwrap()
            .id()
    }

    /// Creates a station handling exactly `products`.
    pub async fn station(&self, name: &str, products: &[ProductId]) -> StationId {
        let station = self.catalog.insert_station(name).await.unwrap().id();
        for &product_id in products {
            self.assign
                .handle(StationAssignmentCommand {
                    scope: AuthScope::admin(),
                    station_id: station,
                    product_id,
                })
                .await
                .unwrap();
        }
        station
    }

    pub async fn order(&self, products: &[ProductId]) -> OrderId {
        let request = OrderRequest {
            lines: products
                .iter()
                .map(|&product_id| OrderRequestLine {
                    product_id,
                    quantity: 1,
                })
                .collect(),
        };
        self.create_order
            .handle(CreateOrderCommand { request })
            .await
            .unwrap()
            .id()
    }
}

/// Everything currently pending for a subscriber, without waiting.
pub fn drain(handle: &SubscriberHandle) -> Vec<Arc<Event>> {
    let mut out = Vec::new();
    while let Some(Some(event)) = handle.queue().try_recv() {
        out.push(event);
    }
    out
}

pub fn payloads(events: &[Arc<Event>]) -> Vec<DomainEvent> {
    events.iter().map(|e| e.payload.clone()).collect()
}
