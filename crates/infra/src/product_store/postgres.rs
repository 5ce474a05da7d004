//! Postgres-backed product store.
//!
//! Rows live in the `products` table. Soft delete sets `deleted_at`; every query
//! filters on `deleted_at IS NULL`, so retired rows keep their id (the `BIGSERIAL`
//! sequence never hands it out again) but are invisible.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | RowNotFound | `NotFound` |
//! | PoolClosed | `Unavailable` |
//! | anything else | `Database` |
//!
//! ## Thread Safety
//!
//! `PostgresProductStore` is `Send + Sync`. The pool is the only shared state and
//! SQLx manages it; each statement is atomic on its own, nothing more.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use catalog_core::ProductId;
use catalog_products::{Product, ProductDraft};

use super::r#trait::{ProductStore, StoreError};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGSERIAL PRIMARY KEY,
        name        TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price       DOUBLE PRECISION NOT NULL CHECK (price >= 0),
        stock       INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at  TIMESTAMPTZ NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products (deleted_at)",
];

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: f64,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: ProductId::from_raw(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

/// Postgres-backed product store.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Wrap an already opened pool. The caller owns the pool lifecycle.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `products` table and its index if they do not exist yet.
    ///
    /// Idempotent; safe to run on every startup.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in MIGRATIONS {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::database("migrate", e))?;
        }
        tracing::info!("products schema is up to date");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self, draft), fields(name = %draft.name), err)]
    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (name, description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, price, stock, created_at, updated_at, deleted_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(draft.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::database("create", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at, deleted_at
            FROM products
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database("get_by_id", e))?;

        Ok(row.map(Product::from))
    }

    #[instrument(skip(self), err)]
    async fn get_all(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), StoreError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE deleted_at IS NULL")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| StoreError::database("count", e))?;

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, price, stock, created_at, updated_at, deleted_at
            FROM products
            WHERE deleted_at IS NULL
            ORDER BY id ASC
            OFFSET $1
            LIMIT $2
            "#,
        )
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::database("get_all", e))?;

        let products = rows.into_iter().map(Product::from).collect();
        Ok((products, u64::try_from(total).unwrap_or(0)))
    }

    #[instrument(skip(self, product), fields(id = %product.id), err)]
    async fn update(&self, product: Product) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $2,
                description = $3,
                price = $4,
                stock = $5,
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING id, name, description, price, stock, created_at, updated_at, deleted_at
            "#,
        )
        .bind(product.id.get())
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::database("update", e))?;

        row.map(Product::from).ok_or(StoreError::NotFound)
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET deleted_at = NOW(),
                updated_at = GREATEST(NOW(), updated_at + INTERVAL '1 microsecond')
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::database("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
