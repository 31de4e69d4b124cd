//! Catalog reads: chat query tools and the storefront listing/search.
//!
//! Sale price is always the SQL expression
//! `original_price * (1 - discount_percent / 100.0)`, computed per read and
//! never stored. Queries with a fixed shape are static SQL; predicates whose
//! arity depends on the token count go through [`sqlx::QueryBuilder`].

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use aura_core::text::{PriceFilter, PriceOp};

use crate::DbError;

/// A row from the `products` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub original_price: Decimal,
    pub discount_percent: i32,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub color: Option<String>,
    /// Mean review rating, `NULL` until the first review lands.
    pub rating: Option<Decimal>,
    pub num_ratings: i32,
}

impl ProductRow {
    /// The derived sale price for this row.
    #[must_use]
    pub fn sale_price(&self) -> Decimal {
        aura_core::pricing::sale_price(self.original_price, self.discount_percent)
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, long_description, original_price, \
     discount_percent, image_url, category, brand, color, rating, num_ratings";

const SALE_PRICE_SQL: &str = "(original_price * (1 - discount_percent / 100.0))";

/// Sort orders accepted by the storefront listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Weighted match score while searching; name order otherwise.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    RatingDesc,
    NameAsc,
}

impl SortKey {
    /// Parses the listing route's `sort` query parameter. Unknown values
    /// fall back to relevance.
    #[must_use]
    pub fn from_param(param: &str) -> Self {
        match param {
            "price_asc" => Self::PriceAsc,
            "price_desc" => Self::PriceDesc,
            "rating_desc" => Self::RatingDesc,
            "name_asc" => Self::NameAsc,
            _ => Self::Relevance,
        }
    }
}

/// Filters for the storefront listing/search query.
#[derive(Debug, Clone, Default)]
pub struct ProductListFilters<'a> {
    /// Free-text search; tokenized on whitespace.
    pub query: Option<&'a str>,
    pub category: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub min_rating: Option<Decimal>,
    /// Inclusive sale-price range in whole currency units.
    pub price_range: Option<(i64, i64)>,
    pub sort: SortKey,
}

/// Top three products by rating among those with at least one review.
///
/// Deterministic: ties on rating break by `num_ratings`, then id so repeated
/// calls return a stable set.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_bestsellers(pool: &PgPool) -> Result<Vec<ProductRow>, DbError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE num_ratings > 0 \
         ORDER BY rating DESC, num_ratings DESC, id ASC LIMIT 3"
    );
    let rows = sqlx::query_as::<_, ProductRow>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Products whose computed sale price is above/below the limit, priciest
/// first, capped at three.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_products_by_price(
    pool: &PgPool,
    filter: PriceFilter,
) -> Result<Vec<ProductRow>, DbError> {
    let op = match filter.op {
        PriceOp::Above => ">",
        PriceOp::Below => "<",
    };
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE {SALE_PRICE_SQL} {op} $1 \
         ORDER BY {SALE_PRICE_SQL} DESC LIMIT 3"
    );
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(filter.limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Products matching every token against name, brand or category
/// (OR across columns, AND across tokens), most-reviewed first, capped at
/// three. Zero tokens is an empty result, not an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_products_by_tokens(
    pool: &PgPool,
    tokens: &[String],
) -> Result<Vec<ProductRow>, DbError> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE "
    ));
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            qb.push(" AND ");
        }
        let pattern = format!("%{token}%");
        qb.push("(name ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR brand ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR category ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }
    qb.push(" ORDER BY num_ratings DESC, rating DESC NULLS LAST, id ASC LIMIT 3");

    let rows = qb.build_query_as::<ProductRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Storefront listing with optional free-text search, filters and sort.
///
/// While searching, each query token contributes a weighted hit score
/// (name match 10, brand match 5, description match 1) summed per row; only
/// rows with a positive total are kept and relevance order is score
/// descending. Explicit sorts override relevance; without a search term the
/// relevance sort falls back to name order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn search_products(
    pool: &PgPool,
    filters: ProductListFilters<'_>,
) -> Result<Vec<ProductRow>, DbError> {
    let tokens: Vec<String> = filters
        .query
        .map(|q| q.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default();
    let searching = !tokens.is_empty();

    let mut qb = QueryBuilder::<Postgres>::new(format!(
        "SELECT * FROM (SELECT {PRODUCT_COLUMNS}, "
    ));
    if searching {
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                qb.push(" + ");
            }
            let pattern = format!("%{token}%");
            qb.push("(CASE WHEN name ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" THEN 10 ELSE 0 END + CASE WHEN brand ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" THEN 5 ELSE 0 END + CASE WHEN description ILIKE ");
            qb.push_bind(pattern);
            qb.push(" THEN 1 ELSE 0 END)");
        }
    } else {
        qb.push("0");
    }
    qb.push(" AS relevance FROM products");

    let mut has_where = false;
    let mut next_clause = |qb: &mut QueryBuilder<'_, Postgres>| {
        qb.push(if has_where { " AND " } else { " WHERE " });
        has_where = true;
    };
    if let Some(category) = filters.category {
        next_clause(&mut qb);
        qb.push("category = ");
        qb.push_bind(category.to_owned());
    }
    if let Some(brand) = filters.brand {
        next_clause(&mut qb);
        qb.push("brand = ");
        qb.push_bind(brand.to_owned());
    }
    if let Some(min_rating) = filters.min_rating {
        next_clause(&mut qb);
        qb.push("rating >= ");
        qb.push_bind(min_rating);
    }
    if let Some((low, high)) = filters.price_range {
        next_clause(&mut qb);
        qb.push(SALE_PRICE_SQL);
        qb.push(" BETWEEN ");
        qb.push_bind(low);
        qb.push(" AND ");
        qb.push_bind(high);
    }

    qb.push(") AS scored");
    if searching {
        qb.push(" WHERE relevance > 0");
    }

    qb.push(" ORDER BY ");
    match (filters.sort, searching) {
        (SortKey::PriceAsc, _) => {
            qb.push(SALE_PRICE_SQL);
            qb.push(" ASC");
        }
        (SortKey::PriceDesc, _) => {
            qb.push(SALE_PRICE_SQL);
            qb.push(" DESC");
        }
        (SortKey::RatingDesc, _) => {
            qb.push("rating DESC NULLS LAST, name ASC");
        }
        (SortKey::Relevance, true) => {
            qb.push("relevance DESC, name ASC");
        }
        (SortKey::Relevance | SortKey::NameAsc, _) => {
            qb.push("name ASC");
        }
    }

    let rows = qb.build_query_as::<ProductRow>().fetch_all(pool).await?;
    Ok(rows)
}

/// Fetches one product by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_product(pool: &PgPool, id: i64) -> Result<Option<ProductRow>, DbError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    let row = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Up to four random same-category products for a detail page.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn related_products(
    pool: &PgPool,
    category: &str,
    exclude_id: i64,
) -> Result<Vec<ProductRow>, DbError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE category = $1 AND id != $2 ORDER BY RANDOM() LIMIT 4"
    );
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(category)
        .bind(exclude_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Compact typeahead search against name and brand, most-reviewed first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn live_search(pool: &PgPool, term: &str) -> Result<Vec<ProductRow>, DbError> {
    let sql = format!(
        "SELECT {PRODUCT_COLUMNS} FROM products \
         WHERE name ILIKE $1 OR brand ILIKE $1 \
         ORDER BY num_ratings DESC, rating DESC NULLS LAST, id ASC LIMIT 5"
    );
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(format!("%{term}%"))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// The most recently added products, used when the catalog has no rated
/// products to call bestsellers yet.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn newest_products(pool: &PgPool, limit: i64) -> Result<Vec<ProductRow>, DbError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id DESC LIMIT $1");
    let rows = sqlx::query_as::<_, ProductRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
