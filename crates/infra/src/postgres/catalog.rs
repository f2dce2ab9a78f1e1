use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use tracing::instrument;
use uuid::Uuid;

use scoopshop_catalog::{Item, ItemPage, ItemQuery, ItemStore};
use scoopshop_core::{ItemId, Money, StorageError};
use scoopshop_orders::ports::{ItemCatalog, StockLedger};

use super::{get_column, map_sqlx};

/// Postgres store for the `items` table.
///
/// Implements both the catalog CRUD port and the order workflow's
/// `ItemCatalog`/`StockLedger` ports; they share the one table.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: Arc<PgPool>,
}

impl PostgresCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn map_item(row: &PgRow) -> Result<Item, StorageError> {
        Ok(Item {
            id: ItemId::from_uuid(get_column::<Uuid>(row, "id")?),
            title: get_column(row, "title")?,
            description: get_column(row, "description")?,
            price: Money::new(
                get_column::<i64>(row, "price_minor")?,
                get_column::<String>(row, "currency")?,
            ),
            image_url: get_column(row, "image_url")?,
            stock: get_column(row, "stock")?,
            created_at: get_column(row, "created_at")?,
            updated_at: get_column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl ItemStore for PostgresCatalog {
    #[instrument(skip(self), fields(item_id = %id))]
    async fn get(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        let row = sqlx::query("SELECT * FROM items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref().map(Self::map_item).transpose()
    }

    #[instrument(skip(self, query))]
    async fn list(&self, query: ItemQuery) -> Result<ItemPage, StorageError> {
        let query = query.clamped();
        let (rows, total) = if let Some(search) = &query.search {
            let pattern = format!("%{search}%");
            let rows = sqlx::query(
                r#"
                SELECT * FROM items
                WHERE title ILIKE $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(&pattern)
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE title ILIKE $1")
                .bind(&pattern)
                .fetch_one(&*self.pool)
                .await
                .map_err(map_sqlx)?;
            (rows, total)
        } else {
            let rows = sqlx::query(
                r#"
                SELECT * FROM items
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
                .fetch_one(&*self.pool)
                .await
                .map_err(map_sqlx)?;
            (rows, total)
        };

        let items = rows
            .iter()
            .map(Self::map_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ItemPage {
            items,
            page: query.page,
            page_size: query.page_size,
            total,
        })
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn insert(&self, item: &Item) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO items
                (id, title, description, price_minor, currency, image_url, stock,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.price.amount_minor)
        .bind(&item.price.currency)
        .bind(&item.image_url)
        .bind(item.stock)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    #[instrument(skip(self, item), fields(item_id = %item.id))]
    async fn update(&self, item: &Item) -> Result<bool, StorageError> {
        // Currency is fixed at creation and deliberately absent from the SET.
        let result = sqlx::query(
            r#"
            UPDATE items
            SET title = $2, description = $3, price_minor = $4,
                image_url = $5, stock = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.price.amount_minor)
        .bind(&item.image_url)
        .bind(item.stock)
        .bind(item.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ItemCatalog for PostgresCatalog {
    async fn get_item(&self, id: ItemId) -> Result<Option<Item>, StorageError> {
        ItemStore::get(self, id).await
    }
}

#[async_trait]
impl StockLedger for PostgresCatalog {
    /// The reservation primitive: one conditional UPDATE, guarded by the
    /// post-condition. Concurrent placements for the last unit serialize on
    /// the row lock and at most one sees `rows_affected > 0`.
    #[instrument(skip(self), fields(item_id = %item_id, delta))]
    async fn adjust_stock(&self, item_id: ItemId, delta: i64) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET stock = stock + $2, updated_at = now()
            WHERE id = $1 AND stock + $2 >= 0
            "#,
        )
        .bind(item_id.as_uuid())
        .bind(delta)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }
}
