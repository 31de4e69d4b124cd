//! Per-size stock levels.

use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryRow {
    pub size: String,
    pub stock_quantity: i32,
}

/// Stock per size for a product, in size order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sizes_for_product(pool: &PgPool, product_id: i64) -> Result<Vec<InventoryRow>, DbError> {
    let rows = sqlx::query_as::<_, InventoryRow>(
        "SELECT size, stock_quantity FROM inventory WHERE product_id = $1 ORDER BY size",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Atomically takes `quantity` units of one size off the shelf.
///
/// The guard lives in the statement itself: the `WHERE` clause only matches
/// when enough stock remains, so a zero row count means the decrement did not
/// happen and no partial state was written.
///
/// # Errors
///
/// Returns [`DbError::InsufficientStock`] when the size is missing or stock
/// is too low, or [`DbError::Sqlx`] if the update fails.
pub async fn decrement_stock(
    pool: &PgPool,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE inventory SET stock_quantity = stock_quantity - $3 \
         WHERE product_id = $1 AND size = $2 AND stock_quantity >= $3",
    )
    .bind(product_id)
    .bind(size)
    .bind(quantity)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InsufficientStock {
            product_id,
            size: size.to_owned(),
        });
    }
    Ok(())
}

/// Puts `quantity` units back, e.g. for a cancelled order line.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the product/size row does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn increment_stock(
    pool: &PgPool,
    product_id: i64,
    size: &str,
    quantity: i32,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE inventory SET stock_quantity = stock_quantity + $3 \
         WHERE product_id = $1 AND size = $2",
    )
    .bind(product_id)
    .bind(size)
    .bind(quantity)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
