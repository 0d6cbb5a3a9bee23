//! In-memory order store.
//!
//! Each order sits behind its own mutex. The outer map lock is held only long
//! enough to look an order up, so transitions on different orders never wait
//! on each other while transitions on the same order are serialized.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, OrderLineId, ProductId, Timestamp};
use crate::domain::order::{Order, OrderError, OrderLine};
use crate::ports::{CancelOutcome, OrderStore};

type OrderSlot = Arc<Mutex<Order>>;

/// In-memory [`OrderStore`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<OrderId, OrderSlot>>>,
    next_order_id: Arc<AtomicI64>,
    next_line_id: Arc<AtomicI64>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    async fn slot(&self, id: OrderId) -> Result<OrderSlot, DomainError> {
        self.orders
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| OrderError::order_not_found(id).into())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(
        &self,
        created_at: Timestamp,
        lines: &[ProductId],
    ) -> Result<Order, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::new(
                ErrorCode::InvalidArgument,
                "An order needs at least one line",
            ));
        }

        let id = OrderId::new(self.next_order_id.fetch_add(1, Ordering::SeqCst) + 1);
        let lines = lines
            .iter()
            .map(|&product_id| {
                let line_id = self.next_line_id.fetch_add(1, Ordering::SeqCst) + 1;
                OrderLine::pending(OrderLineId::new(line_id), product_id)
            })
            .collect();
        let order = Order::reconstitute(id, created_at, false, lines)?;

        self.orders
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(order.clone())));
        Ok(order)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let slot = self.orders.read().await.get(&id).cloned();
        match slot {
            Some(slot) => Ok(Some(slot.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn fulfill_product(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<Order, DomainError> {
        let slot = self.slot(order_id).await?;
        let mut order = slot.lock().await;

        // Work on a copy so a failed transition leaves the stored order untouched.
        let mut next = order.clone();
        next.fulfill_product(product_id)?;
        *order = next;
        Ok(order.clone())
    }

    async fn cancel_order(&self, id: OrderId) -> Result<CancelOutcome, DomainError> {
        let slot = self.slot(id).await?;
        let mut order = slot.lock().await;
        if order.cancel() {
            Ok(CancelOutcome::Cancelled(order.clone()))
        } else {
            Ok(CancelOutcome::AlreadyCancelled(order.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::AggregateStatus;

    fn p(id: i64) -> ProductId {
        ProductId::new(id)
    }

    #[tokio::test]
    async fn insert_creates_one_pending_line_per_entry() {
        let store = InMemoryOrderStore::new();
        let order = store
            .insert_order(Timestamp::now(), &[p(1), p(1), p(2)])
            .await
            .unwrap();

        assert_eq!(order.lines().len(), 3);
        assert_eq!(order.aggregate_status(), AggregateStatus::InProgress);
        assert_eq!(store.find_order(order.id()).await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn insert_rejects_empty_order() {
        let store = InMemoryOrderStore::new();
        let err = store.insert_order(Timestamp::now(), &[]).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
        assert_eq!(store.order_count().await, 0);
    }

    #[tokio::test]
    async fn fulfill_reports_missing_order_and_line() {
        let store = InMemoryOrderStore::new();
        let err = store.fulfill_product(OrderId::new(9), p(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotFound);

        let order = store.insert_order(Timestamp::now(), &[p(1)]).await.unwrap();
        let err = store.fulfill_product(order.id(), p(2)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderLineNotFound);
    }

    #[tokio::test]
    async fn second_fulfill_conflicts() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(Timestamp::now(), &[p(1)]).await.unwrap();

        let done = store.fulfill_product(order.id(), p(1)).await.unwrap();
        assert_eq!(done.aggregate_status(), AggregateStatus::Complete);

        let err = store.fulfill_product(order.id(), p(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn cancel_is_idempotent_and_blocks_fulfillment() {
        let store = InMemoryOrderStore::new();
        let order = store.insert_order(Timestamp::now(), &[p(1)]).await.unwrap();

        assert!(store.cancel_order(order.id()).await.unwrap().changed());
        assert!(!store.cancel_order(order.id()).await.unwrap().changed());

        let err = store.fulfill_product(order.id(), p(1)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn concurrent_sibling_fulfillments_both_land() {
        let store = InMemoryOrderStore::new();
        let order = store
            .insert_order(Timestamp::now(), &[p(1), p(2)])
            .await
            .unwrap();

        let (a, b) = tokio::join!(
            store.fulfill_product(order.id(), p(1)),
            store.fulfill_product(order.id(), p(2)),
        );
        let statuses = [a.unwrap().aggregate_status(), b.unwrap().aggregate_status()];

        assert!(statuses.contains(&AggregateStatus::Complete));
        let stored = store.find_order(order.id()).await.unwrap().unwrap();
        assert_eq!(stored.aggregate_status(), AggregateStatus::Complete);
    }
}
