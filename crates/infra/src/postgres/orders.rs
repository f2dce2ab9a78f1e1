use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgRow;
use tracing::instrument;
use uuid::Uuid;

use scoopshop_core::{ItemId, Money, OrderId, PaymentId, StorageError};
use scoopshop_orders::ports::{OrderPage, OrderQuery, OrderStore};
use scoopshop_orders::{CustomerInfo, Order, OrderNumber, OrderStatus};

use super::{get_column, map_sqlx};

/// Postgres store for the `item_orders` table.
#[derive(Debug, Clone)]
pub struct PostgresOrderStore {
    pool: Arc<PgPool>,
}

impl PostgresOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    fn map_order(row: &PgRow) -> Result<Order, StorageError> {
        let currency: String = get_column(row, "currency")?;
        let status: String = get_column(row, "status")?;
        let status: OrderStatus = status
            .parse()
            .map_err(|e| StorageError::backend(format!("corrupt status column: {e}")))?;
        Ok(Order {
            id: OrderId::from_uuid(get_column::<Uuid>(row, "id")?),
            order_no: OrderNumber::from(get_column::<String>(row, "order_no")?),
            customer: CustomerInfo {
                name: get_column(row, "customer_name")?,
                email: get_column(row, "email")?,
                phone: get_column(row, "phone")?,
                address: get_column(row, "address")?,
            },
            item_id: ItemId::from_uuid(get_column::<Uuid>(row, "item_id")?),
            quantity: get_column(row, "quantity")?,
            unit_price: Money::new(get_column::<i64>(row, "unit_price_minor")?, currency.as_str()),
            total_cost: Money::new(get_column::<i64>(row, "total_cost_minor")?, currency.as_str()),
            payment_id: get_column::<Option<Uuid>>(row, "payment_id")?.map(PaymentId::from_uuid),
            status,
            created_at: get_column(row, "created_at")?,
            updated_at: get_column(row, "updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    #[instrument(skip(self, order), fields(order_id = %order.id, order_no = %order.order_no))]
    async fn insert(&self, order: &Order) -> Result<(), StorageError> {
        sqlx::query(
            r#"
            INSERT INTO item_orders
                (id, order_no, customer_name, email, phone, address,
                 item_id, quantity, unit_price_minor, currency, total_cost_minor,
                 payment_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(order.order_no.as_str())
        .bind(&order.customer.name)
        .bind(&order.customer.email)
        .bind(&order.customer.phone)
        .bind(&order.customer.address)
        .bind(order.item_id.as_uuid())
        .bind(order.quantity)
        .bind(order.unit_price.amount_minor)
        .bind(&order.unit_price.currency)
        .bind(order.total_cost.amount_minor)
        .bind(order.payment_id.map(|p| *p.as_uuid()))
        .bind(order.status.as_str())
        .bind(order.created_at)
        .bind(order.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get(&self, id: OrderId) -> Result<Option<Order>, StorageError> {
        let row = sqlx::query("SELECT * FROM item_orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(map_sqlx)?;
        row.as_ref().map(Self::map_order).transpose()
    }

    /// Guarded in SQL so the status check and the write are one atomic
    /// statement; a lost race shows up as zero affected rows, never as a
    /// double transition.
    #[instrument(skip(self), fields(order_id = %id, from = %from, to = %to))]
    async fn transition(
        &self,
        id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
        payment_id: Option<PaymentId>,
    ) -> Result<bool, StorageError> {
        let result = sqlx::query(
            r#"
            UPDATE item_orders
            SET status = $3, payment_id = COALESCE($4, payment_id), updated_at = now()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id.as_uuid())
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(payment_id.map(|p| *p.as_uuid()))
        .execute(&*self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(result.rows_affected() > 0)
    }

    async fn order_number_exists(&self, number: &OrderNumber) -> Result<bool, StorageError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM item_orders WHERE order_no = $1)")
            .bind(number.as_str())
            .fetch_one(&*self.pool)
            .await
            .map_err(map_sqlx)
    }

    #[instrument(skip(self, query))]
    async fn list(&self, query: OrderQuery) -> Result<OrderPage, StorageError> {
        let query = query.clamped();
        let (rows, total) = if let Some(status) = query.status {
            let rows = sqlx::query(
                r#"
                SELECT * FROM item_orders
                WHERE status = $1
                ORDER BY created_at DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(status.as_str())
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM item_orders WHERE status = $1")
                    .bind(status.as_str())
                    .fetch_one(&*self.pool)
                    .await
                    .map_err(map_sqlx)?;
            (rows, total)
        } else {
            let rows = sqlx::query(
                r#"
                SELECT * FROM item_orders
                ORDER BY created_at DESC
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(query.page_size)
            .bind(query.offset())
            .fetch_all(&*self.pool)
            .await
            .map_err(map_sqlx)?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM item_orders")
                .fetch_one(&*self.pool)
                .await
                .map_err(map_sqlx)?;
            (rows, total)
        };

        let orders = rows
            .iter()
            .map(Self::map_order)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrderPage {
            orders,
            page: query.page,
            page_size: query.page_size,
            total,
        })
    }
}
