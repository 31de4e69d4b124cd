//! Review reads and writes.
//!
//! `products.rating` and `products.num_ratings` are denormalized aggregates;
//! [`insert_review`] refreshes them in the same transaction as the insert so
//! listing queries never recompute averages.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::DbError;

/// A review joined with the reviewer's display name, for a detail page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub product_id: i64,
    pub reviewer: String,
    pub rating: i32,
    pub comment: Option<String>,
    pub review_date: DateTime<Utc>,
}

/// A review joined with its product's name, for chat answers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductReviewRow {
    pub product_name: String,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Sort orders for a product's review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Newest,
    Oldest,
    HighestRated,
    LowestRated,
}

impl ReviewSort {
    /// Parses the detail route's `review_sort` parameter. Unknown values fall
    /// back to newest-first.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "oldest" => Self::Oldest,
            "highest" => Self::HighestRated,
            "lowest" => Self::LowestRated,
            _ => Self::Newest,
        }
    }

    fn order_by(self) -> &'static str {
        match self {
            Self::Newest => "r.review_date DESC",
            Self::Oldest => "r.review_date ASC",
            Self::HighestRated => "r.rating DESC, r.review_date DESC",
            Self::LowestRated => "r.rating ASC, r.review_date DESC",
        }
    }
}

/// Top reviews for products whose name matches every token, best rating
/// first, capped at three. Zero tokens is an empty result.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_reviews_for_product(
    pool: &PgPool,
    tokens: &[String],
) -> Result<Vec<ProductReviewRow>, DbError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Postgres>::new(
        "SELECT p.name AS product_name, r.rating, r.comment \
         FROM reviews r JOIN products p ON p.id = r.product_id WHERE ",
    );
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        qb.push("p.name ILIKE ");
        qb.push_bind(format!("%{token}%"));
    }
    qb.push(" ORDER BY r.rating DESC, r.review_date DESC LIMIT 3");

    let rows = qb
        .build_query_as::<ProductReviewRow>()
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// All reviews for one product in the requested order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reviews(
    pool: &PgPool,
    product_id: i64,
    sort: ReviewSort,
) -> Result<Vec<ReviewRow>, DbError> {
    let sql = format!(
        "SELECT r.id, r.product_id, u.first_name AS reviewer, r.rating, r.comment, \
                r.review_date \
         FROM reviews r JOIN users u ON u.id = r.user_id \
         WHERE r.product_id = $1 ORDER BY {}",
        sort.order_by()
    );
    let rows = sqlx::query_as::<_, ReviewRow>(&sql)
        .bind(product_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Inserts a review and refreshes the product's rating aggregates in one
/// transaction. Returns the new review id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the product does not exist, or
/// [`DbError::Sqlx`] on any other failure.
pub async fn insert_review(
    pool: &PgPool,
    product_id: i64,
    user_id: i64,
    rating: i32,
    comment: Option<&str>,
) -> Result<i64, DbError> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        return Err(DbError::NotFound);
    }

    let review_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO reviews (product_id, user_id, rating, comment) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE products SET \
             rating = (SELECT ROUND(AVG(rating)::numeric, 1) FROM reviews WHERE product_id = $1), \
             num_ratings = (SELECT COUNT(*) FROM reviews WHERE product_id = $1) \
         WHERE id = $1",
    )
    .bind(product_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(review_id)
}

/// Mean rating for a product straight from the reviews table, for checks
/// against the denormalized aggregate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn mean_rating(pool: &PgPool, product_id: i64) -> Result<Option<Decimal>, DbError> {
    let mean = sqlx::query_scalar::<_, Option<Decimal>>(
        "SELECT ROUND(AVG(rating)::numeric, 1) FROM reviews WHERE product_id = $1",
    )
    .bind(product_id)
    .fetch_one(pool)
    .await?;
    Ok(mean)
}
