//! PostgreSQL implementation of OrderStore.
//!
//! Transitions lock the order row (`SELECT ... FOR UPDATE`) for the length
//! of one transaction. Concurrent transitions on the same order queue up on
//! that row lock; other orders are unaffected.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::foundation::{
    DomainError, ErrorCode, OrderId, OrderLineId, ProductId, Timestamp,
};
use crate::domain::order::{FulfillmentStatus, Order, OrderError, OrderLine};
use crate::ports::{CancelOutcome, OrderStore};

/// PostgreSQL implementation of OrderStore.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

type OrderRow = (i64, bool, chrono::DateTime<chrono::Utc>);
type LineRow = (i64, i64, bool);

/// Loads an order inside `tx`, optionally taking the row lock.
async fn load_order(
    tx: &mut Transaction<'_, Postgres>,
    id: OrderId,
    lock: bool,
) -> Result<Option<Order>, DomainError> {
    let sql = if lock {
        "SELECT id, cancelled, created_at FROM orders WHERE id = $1 FOR UPDATE"
    } else {
        "SELECT id, cancelled, created_at FROM orders WHERE id = $1"
    };
    let row: Option<OrderRow> = sqlx::query_as(sql)
        .bind(id.value())
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| DomainError::database("Failed to fetch order", e))?;

    let Some((_, cancelled, created_at)) = row else {
        return Ok(None);
    };

    let lines: Vec<LineRow> = sqlx::query_as(
        "SELECT id, product_id, fulfilled FROM order_products WHERE order_id = $1 ORDER BY id",
    )
    .bind(id.value())
    .fetch_all(&mut **tx)
    .await
    .map_err(|e| DomainError::database("Failed to fetch order lines", e))?;

    let lines = lines
        .into_iter()
        .map(|(line_id, product_id, fulfilled)| OrderLine {
            id: OrderLineId::new(line_id),
            product_id: ProductId::new(product_id),
            status: if fulfilled {
                FulfillmentStatus::Fulfilled
            } else {
                FulfillmentStatus::Pending
            },
        })
        .collect();

    let order = Order::reconstitute(id, Timestamp::from_datetime(created_at), cancelled, lines)?;
    Ok(Some(order))
}

async fn begin(pool: &PgPool) -> Result<Transaction<'static, Postgres>, DomainError> {
    pool.begin()
        .await
        .map_err(|e| DomainError::database("Failed to start transaction", e))
}

async fn commit(tx: Transaction<'_, Postgres>) -> Result<(), DomainError> {
    tx.commit()
        .await
        .map_err(|e| DomainError::database("Failed to commit transaction", e))
}

/// First id in `wanted` with no row in `orderable`.
fn first_unavailable(wanted: &[i64], orderable: &[(i64,)]) -> Option<i64> {
    wanted
        .iter()
        .copied()
        .find(|id| !orderable.iter().any(|(found,)| found == id))
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
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

        let mut tx = begin(&self.pool).await?;

        // Availability is checked again under a share lock, so a product
        // discontinued or sold out since the caller looked is not ordered.
        let mut wanted: Vec<i64> = lines.iter().map(|p| p.value()).collect();
        wanted.sort_unstable();
        wanted.dedup();
        let orderable: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM products
            WHERE id = ANY($1) AND discontinued = FALSE AND sold_out = FALSE
            ORDER BY id
            FOR SHARE
            "#,
        )
        .bind(&wanted[..])
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to check product availability", e))?;

        if let Some(missing) = first_unavailable(&wanted, &orderable) {
            return Err(DomainError::new(
                ErrorCode::InvalidArgument,
                format!("Product {} is not available to order", missing),
            ));
        }

        let (order_id,): (i64,) =
            sqlx::query_as("INSERT INTO orders (created_at) VALUES ($1) RETURNING id")
                .bind(created_at.as_datetime())
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| DomainError::database("Failed to insert order", e))?;

        let mut order_lines = Vec::with_capacity(lines.len());
        for &product_id in lines {
            let (line_id,): (i64,) = sqlx::query_as(
                "INSERT INTO order_products (order_id, product_id) VALUES ($1, $2) RETURNING id",
            )
            .bind(order_id)
            .bind(product_id.value())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to insert order line", e))?;
            order_lines.push(OrderLine::pending(OrderLineId::new(line_id), product_id));
        }

        commit(tx).await?;

        Ok(Order::reconstitute(
            OrderId::new(order_id),
            created_at,
            false,
            order_lines,
        )?)
    }

    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, DomainError> {
        let mut tx = begin(&self.pool).await?;
        let order = load_order(&mut tx, id, false).await?;
        commit(tx).await?;
        Ok(order)
    }

    async fn fulfill_product(
        &self,
        order_id: OrderId,
        product_id: ProductId,
    ) -> Result<Order, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let mut order = load_order(&mut tx, order_id, true)
            .await?
            .ok_or_else(|| DomainError::from(OrderError::order_not_found(order_id)))?;

        // Decides NotFound/Conflict against the locked, current line set.
        let expected = order.fulfill_product(product_id)?;

        let result = sqlx::query(
            r#"
            UPDATE order_products SET fulfilled = TRUE
            WHERE order_id = $1 AND product_id = $2 AND fulfilled = FALSE
            "#,
        )
        .bind(order_id.value())
        .bind(product_id.value())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::database("Failed to fulfill order lines", e))?;

        if result.rows_affected() != expected as u64 {
            return Err(DomainError::new(
                ErrorCode::InternalError,
                format!(
                    "Order {} changed while locked: expected {} lines, updated {}",
                    order_id,
                    expected,
                    result.rows_affected()
                ),
            ));
        }

        commit(tx).await?;
        Ok(order)
    }

    async fn cancel_order(&self, id: OrderId) -> Result<CancelOutcome, DomainError> {
        let mut tx = begin(&self.pool).await?;

        let mut order = load_order(&mut tx, id, true)
            .await?
            .ok_or_else(|| DomainError::from(OrderError::order_not_found(id)))?;

        if !order.cancel() {
            commit(tx).await?;
            return Ok(CancelOutcome::AlreadyCancelled(order));
        }

        sqlx::query("UPDATE orders SET cancelled = TRUE WHERE id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::database("Failed to cancel order", e))?;

        commit(tx).await?;
        Ok(CancelOutcome::Cancelled(order))
    }
}
