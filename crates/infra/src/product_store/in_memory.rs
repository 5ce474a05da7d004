use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};

use catalog_core::{Entity, ProductId};
use catalog_products::{Product, ProductDraft};

use super::r#trait::{ProductStore, StoreError};

#[derive(Debug, Default)]
struct Rows {
    /// Last id handed out. Ids come from this counter only, so they are never reused.
    last_id: i64,
    by_id: BTreeMap<ProductId, Product>,
}

/// In-memory product store.
///
/// Intended for tests/dev. Soft-deleted rows stay in the map with their marker set,
/// mirroring what the Postgres table keeps.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Rows>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows physically held, soft-deleted ones included.
    pub fn row_count(&self) -> usize {
        self.rows.read().map(|r| r.by_id.len()).unwrap_or(0)
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

/// `updated_at` must move forward on every write even if the clock has not ticked.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

#[async_trait::async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, draft: ProductDraft) -> Result<Product, StoreError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;

        rows.last_id += 1;
        let id = ProductId::from_raw(rows.last_id);
        let now = Utc::now();
        let product = Product {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        rows.by_id.insert(id, product.clone());
        Ok(product)
    }

    async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;
        Ok(rows.by_id.get(&id).filter(|p| !p.is_deleted()).cloned())
    }

    async fn get_all(&self, offset: u64, limit: u32) -> Result<(Vec<Product>, u64), StoreError> {
        let rows = self.rows.read().map_err(|_| Self::poisoned())?;

        let live = rows.by_id.values().filter(|p| !p.is_deleted());
        let total = live.clone().count() as u64;
        let page = live
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(limit as usize)
            .cloned()
            .collect();

        Ok((page, total))
    }

    async fn update(&self, product: Product) -> Result<Product, StoreError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;

        let stored = rows
            .by_id
            .get_mut(&product.id)
            .filter(|p| !p.is_deleted())
            .ok_or(StoreError::NotFound)?;

        stored.name = product.name;
        stored.description = product.description;
        stored.price = product.price;
        stored.stock = product.stock;
        stored.updated_at = next_timestamp(stored.updated_at);
        Ok(stored.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(|_| Self::poisoned())?;

        let stored = rows
            .by_id
            .get_mut(&id)
            .filter(|p| !p.is_deleted())
            .ok_or(StoreError::NotFound)?;

        let now = next_timestamp(stored.updated_at);
        stored.deleted_at = Some(now);
        stored.updated_at = now;
        Ok(())
    }
}
