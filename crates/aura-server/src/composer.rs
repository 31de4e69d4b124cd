//! Turns one chat utterance into one reply.
//!
//! The classifier picks an intent, the matching query tool runs against the
//! catalog, and a fixed intro line frames the result. Only when the catalog
//! has nothing to say does the generative client get involved, and every
//! failure on that path degrades to a single apology string. The transport
//! never sees an error from here.

use std::future::Future;

use serde::Serialize;
use sqlx::PgPool;

use aura_core::text::{price_filter, review_search_tokens, search_tokens};
use aura_core::{classify, Intent, Transcript};
use aura_db::{DbError, OrderHistoryRow, ProductRow};
use aura_genai::{build_chat_prompt, GenAiClient, GenAiError};

pub(crate) const GREETING: &str = "Hello! I'm Aura Assistant. I can help you find products, \
check on reviews, or look up your recent orders. What can I do for you today?";
const RETURN_POLICY: &str = "We have a 30-day return policy for unworn items with the original \
tags attached. You can start a return from the 'My Orders' section of your account.";
const BESTSELLER_INTRO: &str = "Of course! Here are our current top-selling products:";
const NEWEST_INTRO: &str = "We don't have enough ratings for a top-sellers list yet, but here \
are our newest arrivals:";
const PRODUCTS_INTRO: &str = "Certainly! Here are some products I found for you:";
const NO_REVIEWS: &str = "I'm sorry, I couldn't find any reviews for that product.";
const LOGIN_PROMPT: &str = "Please log in to view your order history.";
const NO_ORDERS: &str = "You haven't placed any orders with us yet.";
const ORDERS_INTRO: &str = "Here are your most recent orders:";
const APOLOGY: &str = "I'm sorry, I'm not sure how to answer that.";

/// Anything that can answer a free-form prompt with text. [`GenAiClient`] in
/// production, a fake in tests.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str)
        -> impl Future<Output = Result<String, GenAiError>> + Send;
}

impl TextGenerator for GenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        GenAiClient::generate(self, prompt).await
    }
}

/// A product rendered for a chat reply.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    /// Currency-prefixed computed sale price, whole units: `₹1899`.
    pub sale_price: String,
}

impl From<&ProductRow> for ProductCard {
    fn from(row: &ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            image_url: row.image_url.clone(),
            sale_price: aura_core::format_sale_price(row.original_price, row.discount_percent),
        }
    }
}

/// A past order rendered for a chat reply.
#[derive(Debug, Clone, Serialize)]
pub struct OrderCard {
    pub order_id: i64,
    pub order_date: String,
    pub image_url: Option<String>,
    pub name: String,
}

impl From<&OrderHistoryRow> for OrderCard {
    fn from(row: &OrderHistoryRow) -> Self {
        Self {
            order_id: row.order_id,
            order_date: row.order_date.format("%d %b %Y").to_string(),
            image_url: row.first_item_image.clone(),
            name: row.first_item_name.clone(),
        }
    }
}

/// One chat reply: `text` is always present, the card lists are usually
/// empty.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub products: Vec<ProductCard>,
    pub orders: Vec<OrderCard>,
}

impl ChatReply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            products: Vec::new(),
            orders: Vec::new(),
        }
    }

    fn with_products(text: &str, rows: &[ProductRow]) -> Self {
        Self {
            text: text.to_owned(),
            products: rows.iter().map(ProductCard::from).collect(),
            orders: Vec::new(),
        }
    }
}

/// The connect-time greeting, also used for the `Greeting` intent.
pub(crate) fn welcome() -> ChatReply {
    ChatReply::text_only(GREETING)
}

/// Composes the reply for one utterance. `history` is the transcript up to
/// but not including `message`; `user_id` is `None` for anonymous visitors.
///
/// Infallible: database and generative failures are logged and collapse to
/// the apology reply.
pub async fn compose<G: TextGenerator>(
    pool: &PgPool,
    genai: Option<&G>,
    history: &Transcript,
    message: &str,
    user_id: Option<i64>,
) -> ChatReply {
    let result = match classify(message) {
        Intent::FindBestsellers => bestsellers(pool).await,
        Intent::FindReviews => reviews(pool, message).await,
        Intent::OrderHistory => order_history(pool, user_id).await,
        Intent::ReturnPolicy => Ok(ChatReply::text_only(RETURN_POLICY)),
        Intent::Greeting => Ok(welcome()),
        Intent::FindProduct => find_product(pool, genai, history, message).await,
    };

    result.unwrap_or_else(|error| {
        tracing::error!(error = %error, "chat query tool failed");
        ChatReply::text_only(APOLOGY)
    })
}

async fn bestsellers(pool: &PgPool) -> Result<ChatReply, DbError> {
    let rows = aura_db::find_bestsellers(pool).await?;
    if rows.is_empty() {
        let newest = aura_db::newest_products(pool, 3).await?;
        return Ok(ChatReply::with_products(NEWEST_INTRO, &newest));
    }
    Ok(ChatReply::with_products(BESTSELLER_INTRO, &rows))
}

async fn reviews(pool: &PgPool, message: &str) -> Result<ChatReply, DbError> {
    let tokens = review_search_tokens(message);
    let rows = aura_db::find_reviews_for_product(pool, &tokens).await?;

    let Some(first) = rows.first() else {
        return Ok(ChatReply::text_only(NO_REVIEWS));
    };

    let mut text = format!("Absolutely! Here are the top reviews for '{}':", first.product_name);
    for row in &rows {
        let comment = row.comment.as_deref().unwrap_or("No comment left");
        text.push_str(&format!("\n- \"{comment}\" ({}/5 stars)", row.rating));
    }
    Ok(ChatReply::text_only(text))
}

async fn order_history(pool: &PgPool, user_id: Option<i64>) -> Result<ChatReply, DbError> {
    let Some(user_id) = user_id else {
        return Ok(ChatReply::text_only(LOGIN_PROMPT));
    };

    let rows = aura_db::recent_orders_for_user(pool, user_id).await?;
    if rows.is_empty() {
        return Ok(ChatReply::text_only(NO_ORDERS));
    }
    Ok(ChatReply {
        text: ORDERS_INTRO.to_owned(),
        products: Vec::new(),
        orders: rows.iter().map(OrderCard::from).collect(),
    })
}

async fn find_product<G: TextGenerator>(
    pool: &PgPool,
    genai: Option<&G>,
    history: &Transcript,
    message: &str,
) -> Result<ChatReply, DbError> {
    if let Some(filter) = price_filter(message) {
        let rows = aura_db::find_products_by_price(pool, filter).await?;
        if !rows.is_empty() {
            return Ok(ChatReply::with_products(PRODUCTS_INTRO, &rows));
        }
    } else {
        let tokens = search_tokens(message);
        let rows = aura_db::find_products_by_tokens(pool, &tokens).await?;
        if !rows.is_empty() {
            return Ok(ChatReply::with_products(PRODUCTS_INTRO, &rows));
        }
    }
    Ok(ai_fallback(genai, history, message).await)
}

/// Last resort: hand the utterance to the generative model. Absent client or
/// any [`GenAiError`] becomes the apology.
async fn ai_fallback<G: TextGenerator>(
    genai: Option<&G>,
    history: &Transcript,
    message: &str,
) -> ChatReply {
    let Some(client) = genai else {
        tracing::debug!("no generative client configured, returning apology");
        return ChatReply::text_only(APOLOGY);
    };

    let prompt = build_chat_prompt(history, message);
    match client.generate(&prompt).await {
        Ok(text) => ChatReply::text_only(text),
        Err(error) => {
            tracing::warn!(error = %error, "generative fallback failed");
            ChatReply::text_only(APOLOGY)
        }
    }
}
