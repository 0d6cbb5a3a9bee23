//! PostgreSQL implementation of CatalogStore.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::domain::catalog::{NewProduct, Product, ProductType, Station};
use crate::domain::foundation::{DomainError, ErrorCode, ProductId, ProductTypeId, StationId};
use crate::ports::CatalogStore;

const PRODUCT_COLUMNS: &str = "id, name, price, product_type_id, discontinued, sold_out";

/// PostgreSQL implementation of CatalogStore.
#[derive(Clone)]
pub struct PostgresCatalogStore {
    pool: PgPool,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn station_exists(&self, id: StationId) -> Result<bool, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stations WHERE id = $1")
            .bind(id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to check station", e))?;
        Ok(count > 0)
    }

    async fn product_exists(&self, id: ProductId) -> Result<bool, DomainError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE id = $1")
            .bind(id.value())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to check product", e))?;
        Ok(count > 0)
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn insert_product(&self, draft: NewProduct) -> Result<Product, DomainError> {
        if self.find_product_type(draft.type_id).await?.is_none() {
            return Err(DomainError::new(
                ErrorCode::ProductTypeNotFound,
                format!("Product type not found: {}", draft.type_id),
            ));
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO products (name, price, product_type_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&draft.name)
        .bind(draft.price)
        .bind(draft.type_id.value())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert product", e))?;

        Ok(Product::from_draft(ProductId::new(id), draft))
    }

    async fn update_product(&self, product: &Product) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = $2,
                price = $3,
                product_type_id = $4,
                discontinued = $5,
                sold_out = $6,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(product.id().value())
        .bind(product.name())
        .bind(product.price())
        .bind(product.type_id().value())
        .bind(product.is_discontinued())
        .bind(product.is_sold_out())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to update product", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProductNotFound,
                format!("Product not found: {}", product.id()),
            ));
        }
        Ok(())
    }

    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to fetch product", e))?;

        row.map(row_to_product).transpose()
    }

    async fn find_products(&self, ids: &[ProductId]) -> Result<Vec<Product>, DomainError> {
        let raw: Vec<i64> = ids.iter().map(ProductId::value).collect();
        let rows = sqlx::query(&format!(
            "SELECT {} FROM products WHERE id = ANY($1) ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch products", e))?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn list_products(&self) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM products ORDER BY id", PRODUCT_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to list products", e))?;

        rows.into_iter().map(row_to_product).collect()
    }

    async fn insert_product_type(
        &self,
        name: &str,
        title: &str,
    ) -> Result<ProductType, DomainError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO product_types (name, title) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(title)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to insert product type", e))?;

        Ok(ProductType {
            id: ProductTypeId::new(id),
            name: name.to_string(),
            title: title.to_string(),
        })
    }

    async fn find_product_type(
        &self,
        id: ProductTypeId,
    ) -> Result<Option<ProductType>, DomainError> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, title FROM product_types WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch product type", e))?;

        Ok(row.map(|(id, name, title)| ProductType {
            id: ProductTypeId::new(id),
            name,
            title,
        }))
    }

    async fn insert_station(&self, name: &str) -> Result<Station, DomainError> {
        let (id,): (i64,) = sqlx::query_as("INSERT INTO stations (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database("Failed to insert station", e))?;

        Ok(Station::new(StationId::new(id), name))
    }

    async fn find_station(&self, id: StationId) -> Result<Option<Station>, DomainError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM stations WHERE id = $1")
                .bind(id.value())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to fetch station", e))?;

        let Some((_, name)) = row else {
            return Ok(None);
        };

        let products: Vec<(i64,)> = sqlx::query_as(
            "SELECT product_id FROM station_products WHERE station_id = $1 ORDER BY product_id",
        )
        .bind(id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to fetch station products", e))?;

        Ok(Some(Station::reconstitute(
            id,
            name,
            products.into_iter().map(|(p,)| ProductId::new(p)),
        )))
    }

    async fn list_stations(&self) -> Result<Vec<Station>, DomainError> {
        let stations: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM stations ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to list stations", e))?;

        let assignments: Vec<(i64, i64)> =
            sqlx::query_as("SELECT station_id, product_id FROM station_products")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to list station products", e))?;

        let mut by_station: BTreeMap<i64, Vec<ProductId>> = BTreeMap::new();
        for (station_id, product_id) in assignments {
            by_station
                .entry(station_id)
                .or_default()
                .push(ProductId::new(product_id));
        }

        Ok(stations
            .into_iter()
            .map(|(id, name)| {
                let products = by_station.remove(&id).unwrap_or_default();
                Station::reconstitute(StationId::new(id), name, products)
            })
            .collect())
    }

    async fn assign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError> {
        if !self.station_exists(station_id).await? {
            return Err(DomainError::new(
                ErrorCode::StationNotFound,
                format!("Station not found: {}", station_id),
            ));
        }
        if !self.product_exists(product_id).await? {
            return Err(DomainError::new(
                ErrorCode::ProductNotFound,
                format!("Product not found: {}", product_id),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO station_products (station_id, product_id)
            VALUES ($1, $2)
            ON CONFLICT (station_id, product_id) DO NOTHING
            "#,
        )
        .bind(station_id.value())
        .bind(product_id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to assign product", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn unassign_product(
        &self,
        station_id: StationId,
        product_id: ProductId,
    ) -> Result<bool, DomainError> {
        if !self.station_exists(station_id).await? {
            return Err(DomainError::new(
                ErrorCode::StationNotFound,
                format!("Station not found: {}", station_id),
            ));
        }

        let result =
            sqlx::query("DELETE FROM station_products WHERE station_id = $1 AND product_id = $2")
                .bind(station_id.value())
                .bind(product_id.value())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::database("Failed to unassign product", e))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_product(row: PgRow) -> Result<Product, DomainError> {
    let read = |e: sqlx::Error| DomainError::database("Failed to read product row", e);
    Ok(Product::reconstitute(
        ProductId::new(row.try_get("id").map_err(read)?),
        row.try_get("name").map_err(read)?,
        row.try_get("price").map_err(read)?,
        ProductTypeId::new(row.try_get("product_type_id").map_err(read)?),
        row.try_get("discontinued").map_err(read)?,
        row.try_get("sold_out").map_err(read)?,
    ))
}
