//! Realtime state over the real bus, for transport tests.

use std::sync::Arc;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::InMemoryOrderStore;
use crate::application::handlers::order::AnnounceOrderHandler;
use crate::application::handlers::OrderLocks;
use crate::domain::events::{DomainEvent, ProductDiscontinuedPayload};
use crate::domain::foundation::ProductId;
use crate::domain::routing::StationRouter;

use super::{QueueSettings, RealtimeState, SubscriberManager, TransportSettings};

pub(super) fn realtime_state(settings: TransportSettings) -> (Arc<InMemoryEventBus>, RealtimeState) {
    let router = Arc::new(StationRouter::default());
    let bus = Arc::new(InMemoryEventBus::new(router.clone()));
    let manager = Arc::new(SubscriberManager::new(bus.clone(), QueueSettings::default()));
    let announcer = AnnounceOrderHandler::new(
        Arc::new(InMemoryOrderStore::new()),
        bus.clone(),
        router,
        OrderLocks::new(),
    );
    let state = RealtimeState::new(manager, Arc::new(announcer), settings);
    (bus, state)
}

pub(super) fn discontinued(product: i64) -> DomainEvent {
    DomainEvent::ProductDiscontinued(ProductDiscontinuedPayload {
        id: ProductId::new(product),
    })
}
