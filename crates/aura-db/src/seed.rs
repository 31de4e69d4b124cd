//! Demo catalog seeding for local development.

use sqlx::PgPool;

use crate::DbError;

/// (name, description, category, color, price, discount_percent, image)
const DEMO_PRODUCTS: &[(&str, &str, &str, &str, &str, i32, &str)] = &[
    ("Classic Crew-Neck T-Shirt", "Soft cotton tee for everyday wear", "Tops", "White", "899", 0, "crew-tee.png"),
    ("Graphic Print T-Shirt", "Bold print on a relaxed fit", "Tops", "Black", "999", 10, "graphic-tee.png"),
    ("Fleece Hoodie", "Brushed fleece with a kangaroo pocket", "Tops", "Grey", "1599", 0, "fleece-hoodie.png"),
    ("Merino Crew Sweater", "Fine-gauge merino knit", "Tops", "Navy", "2499", 20, "merino-sweater.png"),
    ("Slim-Fit Jeans", "Stretch denim in a dark wash", "Bottoms", "Indigo", "1999", 0, "slim-jeans.png"),
    ("Straight Jeans", "Classic straight leg, light wash", "Bottoms", "Light Blue", "1899", 15, "straight-jeans.png"),
    ("Tapered Chinos", "Garment-dyed cotton twill", "Bottoms", "Khaki", "1799", 0, "chinos.png"),
    ("Running Shorts", "Lightweight with a liner", "Activewear", "Black", "999", 0, "running-shorts.png"),
    ("Performance Track Jacket", "Breathable athletic shell", "Activewear", "Blue", "1999", 10, "track-jacket.png"),
    ("Compression Training Shirt", "Moisture-wicking base layer", "Activewear", "Charcoal", "1299", 0, "compression-shirt.png"),
    ("Bomber Jacket", "Satin-finish bomber with ribbed cuffs", "Outerwear", "Olive", "3499", 0, "bomber-jacket.png"),
    ("Wool Trench Coat", "Double-breasted formal coat", "Outerwear", "Camel", "5999", 25, "trench-coat.png"),
];

/// (username, first, last)
const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("priya", "Priya", "Sharma"),
    ("arjun", "Arjun", "Mehta"),
    ("neha", "Neha", "Iyer"),
];

/// (product index, user index, rating, comment, days ago)
const DEMO_REVIEWS: &[(usize, usize, i32, &str, i32)] = &[
    (0, 0, 5, "Perfect weight for summer, holds its shape after washing.", 12),
    (0, 1, 4, "Runs slightly large but the fabric is great.", 8),
    (2, 1, 5, "Warmest hoodie I own.", 20),
    (2, 2, 4, "Good fit, pocket could be deeper.", 5),
    (4, 0, 5, "Best jeans I have bought in years.", 30),
    (4, 2, 3, "Nice wash but the stretch fades.", 14),
    (8, 2, 5, "Breathes well on long runs.", 3),
    (11, 0, 4, "Sharp coat, sizing is generous.", 40),
];

fn brand_for_product(name: &str, category: &str) -> &'static str {
    let lower = name.to_lowercase();
    let athletic = ["athletic", "running", "performance", "training", "compression", "track"];
    let luxe = ["formal", "sweater", "merino", "bomber", "trench", "wool", "blazer"];
    if category == "Activewear" || athletic.iter().any(|k| lower.contains(k)) {
        "Aura Active"
    } else if lower.contains("jeans") || lower.contains("denim") {
        "Aura Denim"
    } else if luxe.iter().any(|k| lower.contains(k)) {
        "Aura Luxe"
    } else {
        "Aura Basics"
    }
}

fn sizes_for_category(category: &str) -> &'static [&'static str] {
    match category {
        "Bottoms" => &["30", "32", "34", "36", "38"],
        _ => &["S", "M", "L", "XL", "XXL"],
    }
}

/// Seeds a small demo catalog with users, reviews, inventory and one order
/// per user. Skips entirely when products already exist, so it is safe to run
/// on every startup in development.
///
/// Returns the number of products inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement fails.
pub async fn seed_demo_catalog(pool: &PgPool) -> Result<usize, DbError> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;

    let mut user_ids = Vec::with_capacity(DEMO_USERS.len());
    for (username, first, last) in DEMO_USERS {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO users (username, email, password_hash, first_name, last_name) \
             VALUES ($1, $2, 'demo', $3, $4) RETURNING id",
        )
        .bind(username)
        .bind(format!("{username}@example.com"))
        .bind(first)
        .bind(last)
        .fetch_one(&mut *tx)
        .await?;
        user_ids.push(id);
    }

    let mut product_ids = Vec::with_capacity(DEMO_PRODUCTS.len());
    for (name, description, category, color, price, discount, image) in DEMO_PRODUCTS {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO products \
                 (name, description, long_description, original_price, discount_percent, \
                  image_url, category, brand, color) \
             VALUES ($1, $2, $3, $4::numeric(10,2), $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .bind(format!("{description}. Part of the AURA Apparel collection."))
        .bind(price)
        .bind(discount)
        .bind(format!("/static/images/{image}"))
        .bind(category)
        .bind(brand_for_product(name, category))
        .bind(color)
        .fetch_one(&mut *tx)
        .await?;
        product_ids.push(id);

        for size in sizes_for_category(category) {
            sqlx::query(
                "INSERT INTO inventory (product_id, size, stock_quantity) VALUES ($1, $2, 25)",
            )
            .bind(id)
            .bind(size)
            .execute(&mut *tx)
            .await?;
        }
    }

    for (product_idx, user_idx, rating, comment, days_ago) in DEMO_REVIEWS {
        sqlx::query(
            "INSERT INTO reviews (product_id, user_id, rating, comment, review_date) \
             VALUES ($1, $2, $3, $4, NOW() - $5 * INTERVAL '1 day')",
        )
        .bind(product_ids[*product_idx])
        .bind(user_ids[*user_idx])
        .bind(rating)
        .bind(comment)
        .bind(days_ago)
        .execute(&mut *tx)
        .await?;
    }

    // Refresh the denormalized aggregates in one pass.
    sqlx::query(
        "UPDATE products p SET \
             rating = agg.mean, num_ratings = agg.cnt \
         FROM (SELECT product_id, ROUND(AVG(rating)::numeric, 1) AS mean, \
                      COUNT(*)::int AS cnt \
               FROM reviews GROUP BY product_id) agg \
         WHERE p.id = agg.product_id",
    )
    .execute(&mut *tx)
    .await?;

    for (i, user_id) in user_ids.iter().enumerate() {
        let product_id = product_ids[i % product_ids.len()];
        let order_id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO orders (user_id, order_date, total_price) \
             VALUES ($1, NOW() - $2 * INTERVAL '1 day', 899.00) RETURNING id",
        )
        .bind(user_id)
        .bind(i32::try_from(i).unwrap_or(0) * 7 + 3)
        .fetch_one(&mut *tx)
        .await?;
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, size, quantity, price) \
             VALUES ($1, $2, 'M', 1, 899.00)",
        )
        .bind(order_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(product_ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brand_mapping_follows_keywords() {
        assert_eq!(brand_for_product("Running Shorts", "Activewear"), "Aura Active");
        assert_eq!(brand_for_product("Slim-Fit Jeans", "Bottoms"), "Aura Denim");
        assert_eq!(brand_for_product("Merino Crew Sweater", "Tops"), "Aura Luxe");
        assert_eq!(brand_for_product("Classic Crew-Neck T-Shirt", "Tops"), "Aura Basics");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn seeding_twice_inserts_once(pool: PgPool) {
        let first = seed_demo_catalog(&pool).await.expect("first run");
        let second = seed_demo_catalog(&pool).await.expect("second run");

        assert_eq!(first, DEMO_PRODUCTS.len());
        assert_eq!(second, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn seeded_catalog_supports_the_chat_tools(pool: PgPool) {
        seed_demo_catalog(&pool).await.expect("seed");

        let bestsellers = crate::find_bestsellers(&pool).await.expect("bestsellers");
        assert_eq!(bestsellers.len(), 3);
        assert!(bestsellers.iter().all(|p| p.num_ratings > 0));

        let jeans = crate::find_products_by_tokens(&pool, &["jean".to_owned()])
            .await
            .expect("jeans");
        assert!(!jeans.is_empty());
    }
}
