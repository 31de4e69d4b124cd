//! Sale-price math.
//!
//! The catalog stores `original_price` and `discount_percent`; the sale
//! price is derived on every read and never stored.

use rust_decimal::Decimal;

/// Currency prefix for formatted prices (the storefront trades in Rupees).
pub const CURRENCY_SYMBOL: &str = "₹";

/// Computes the sale price: `original * (1 - discount_percent / 100)`.
///
/// `discount_percent` is expected in `0..=100`; values are clamped so a bad
/// row can never produce a price above the original or below zero.
#[must_use]
pub fn sale_price(original: Decimal, discount_percent: i32) -> Decimal {
    let discount = Decimal::from(discount_percent.clamp(0, 100));
    original * (Decimal::ONE - discount / Decimal::from(100))
}

/// Formats a product's sale price for a chat product card.
///
/// Currency-prefixed, rounded to zero decimal places: `₹1899`.
#[must_use]
pub fn format_sale_price(original: Decimal, discount_percent: i32) -> String {
    format!(
        "{CURRENCY_SYMBOL}{}",
        sale_price(original, discount_percent).round_dp(0)
    )
}
