//! Order history reads for the chat assistant.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// One past order summarized for a chat reply: the first line item lends the
/// card its name and image, `item_count` covers the rest.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderHistoryRow {
    pub order_id: i64,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub total_price: Decimal,
    pub item_count: i64,
    pub first_item_name: String,
    pub first_item_image: Option<String>,
}

/// The user's four most recent orders, newest first, one row per order.
///
/// `DISTINCT ON (o.id)` collapses the item join to the earliest line item
/// before the outer query applies the date order and the cap.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn recent_orders_for_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<OrderHistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, OrderHistoryRow>(
        "SELECT * FROM ( \
             SELECT DISTINCT ON (o.id) \
                 o.id AS order_id, o.order_date, o.status, o.total_price, \
                 (SELECT COUNT(*) FROM order_items WHERE order_id = o.id) AS item_count, \
                 p.name AS first_item_name, p.image_url AS first_item_image \
             FROM orders o \
             JOIN order_items oi ON oi.order_id = o.id \
             JOIN products p ON p.id = oi.product_id \
             WHERE o.user_id = $1 \
             ORDER BY o.id, oi.id \
         ) AS latest \
         ORDER BY order_date DESC LIMIT 4",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
