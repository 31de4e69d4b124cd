//! Shared row-insertion helpers for the query-tool tests.

use sqlx::PgPool;

/// Inserts a product and returns its id. `price` and `rating` are bound as
/// text and cast so tests can write literal values.
pub(crate) async fn insert_product(
    pool: &PgPool,
    name: &str,
    brand: &str,
    category: &str,
    price: &str,
    discount: i32,
    rating: Option<&str>,
    num_ratings: i32,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO products \
             (name, description, original_price, discount_percent, image_url, \
              category, brand, rating, num_ratings) \
         VALUES ($1, $2, $3::numeric(10,2), $4, $5, $6, $7, $8::numeric(3,1), $9) \
         RETURNING id",
    )
    .bind(name)
    .bind(format!("{name} for everyday wear"))
    .bind(price)
    .bind(discount)
    .bind(format!("{}.png", name.replace(' ', "-")))
    .bind(category)
    .bind(brand)
    .bind(rating)
    .bind(num_ratings)
    .fetch_one(pool)
    .await
    .expect("insert product")
}

pub(crate) async fn insert_user(pool: &PgPool, username: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (username, email, password_hash, first_name, last_name) \
         VALUES ($1, $2, 'x', $3, 'Tester') RETURNING id",
    )
    .bind(username)
    .bind(format!("{username}@example.com"))
    .bind(username)
    .fetch_one(pool)
    .await
    .expect("insert user")
}

pub(crate) async fn insert_review_row(
    pool: &PgPool,
    product_id: i64,
    user_id: i64,
    rating: i32,
    comment: &str,
    days_ago: i32,
) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO reviews (product_id, user_id, rating, comment, review_date) \
         VALUES ($1, $2, $3, $4, NOW() - $5 * INTERVAL '1 day') RETURNING id",
    )
    .bind(product_id)
    .bind(user_id)
    .bind(rating)
    .bind(comment)
    .bind(days_ago)
    .fetch_one(pool)
    .await
    .expect("insert review")
}

pub(crate) async fn insert_inventory(pool: &PgPool, product_id: i64, size: &str, qty: i32) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO inventory (product_id, size, stock_quantity) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(product_id)
    .bind(size)
    .bind(qty)
    .fetch_one(pool)
    .await
    .expect("insert inventory")
}

/// Inserts an order `days_ago` days old with one item per product id.
pub(crate) async fn insert_order(
    pool: &PgPool,
    user_id: i64,
    days_ago: i32,
    product_ids: &[i64],
) -> i64 {
    let order_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO orders (user_id, order_date, total_price) \
         VALUES ($1, NOW() - $2 * INTERVAL '1 day', 999.00) RETURNING id",
    )
    .bind(user_id)
    .bind(days_ago)
    .fetch_one(pool)
    .await
    .expect("insert order");

    for product_id in product_ids {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, size, quantity, price) \
             VALUES ($1, $2, 'M', 1, 999.00)",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(pool)
        .await
        .expect("insert order item");
    }

    order_id
}
