use async_trait::async_trait;
use uuid::Uuid;
use sqlx::PgPool;
use tracing::debug;
use ordo_core::{Order, OrderStatus, OrderStore};

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Arrival order, ties broken by id so repeated reads agree
const ORDERS_BY_PRODUCT_SQL: &str = r#"
    SELECT id, product_id, total_price, quantity, status, created_at
    FROM orders
    WHERE product_id = $1
    ORDER BY created_at, id
"#;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    product_id: String,
    total_price: f64,
    quantity: i32,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = ordo_core::CoreError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            id: row.id,
            product_id: row.product_id,
            total_price: row.total_price,
            quantity: row.quantity,
            status: row.status.parse::<OrderStatus>()?,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn create_order(
        &self,
        order: &Order,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            r#"
            INSERT INTO orders (id, product_id, total_price, quantity, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(order.id)
        .bind(&order.product_id)
        .bind(order.total_price)
        .bind(order.quantity)
        .bind(order.status.as_str())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        debug!("Inserted order {} for product {}", order.id, order.product_id);
        Ok(())
    }

    async fn list_orders_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Order>, Box<dyn std::error::Error + Send + Sync>> {
        let rows = sqlx::query_as::<_, OrderRow>(ORDERS_BY_PRODUCT_SQL)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        let orders = rows
            .into_iter()
            .map(Order::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(orders)
    }
}
