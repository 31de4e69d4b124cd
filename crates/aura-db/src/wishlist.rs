//! Wishlist reads and writes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::DbError;

/// A wishlist entry joined with the product fields the account page shows.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WishlistItemRow {
    pub product_id: i64,
    pub name: String,
    pub original_price: Decimal,
    pub discount_percent: i32,
    pub image_url: Option<String>,
    pub added_date: DateTime<Utc>,
}

impl WishlistItemRow {
    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        aura_core::pricing::sale_price(self.original_price, self.discount_percent)
    }
}

/// Adds a product to the user's wishlist. Re-adding is a no-op thanks to the
/// unique pair constraint.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn add_to_wishlist(pool: &PgPool, user_id: i64, product_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO wishlist (user_id, product_id) VALUES ($1, $2) \
         ON CONFLICT (user_id, product_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(product_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Removes a product from the user's wishlist.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the entry was not on the list, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn remove_from_wishlist(
    pool: &PgPool,
    user_id: i64,
    product_id: i64,
) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM wishlist WHERE user_id = $1 AND product_id = $2")
        .bind(user_id)
        .bind(product_id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// The user's wishlist, most recently added first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_wishlist(pool: &PgPool, user_id: i64) -> Result<Vec<WishlistItemRow>, DbError> {
    let rows = sqlx::query_as::<_, WishlistItemRow>(
        "SELECT w.product_id, p.name, p.original_price, p.discount_percent, \
                p.image_url, w.added_date \
         FROM wishlist w JOIN products p ON p.id = w.product_id \
         WHERE w.user_id = $1 ORDER BY w.added_date DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{insert_product, insert_user};

    #[sqlx::test(migrations = "../../migrations")]
    async fn add_is_idempotent(pool: PgPool) {
        let user = insert_user(&pool, "wisher").await;
        let tee = insert_product(&pool, "Plain tee", "Aura Basics", "Tops", "899", 0, None, 0).await;

        add_to_wishlist(&pool, user, tee).await.expect("first add");
        add_to_wishlist(&pool, user, tee).await.expect("second add");

        let items = list_wishlist(&pool, user).await.expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Plain tee");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn remove_of_missing_entry_is_not_found(pool: PgPool) {
        let user = insert_user(&pool, "empty").await;
        let err = remove_from_wishlist(&pool, user, 4242).await.expect_err("nothing to remove");
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn wishlist_rows_carry_the_sale_price(pool: PgPool) {
        let user = insert_user(&pool, "bargain").await;
        let jeans = insert_product(&pool, "Slim jeans", "Aura Denim", "Bottoms", "2000", 25, None, 0).await;

        add_to_wishlist(&pool, user, jeans).await.expect("add");
        let items = list_wishlist(&pool, user).await.expect("items");

        assert_eq!(items[0].sale_price(), Decimal::from(1500));
    }
}
