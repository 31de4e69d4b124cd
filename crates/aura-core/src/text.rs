//! Query-text normalization for the chat query tools.
//!
//! Canonical tokenization order: strip boilerplate phrases, lowercase and
//! split, drop stopwords, then trim one trailing `s` per token. Trimming
//! happens last so the stopword lists never need plural forms.

use regex::Regex;

/// Filler words dropped from product-search utterances before matching.
const SEARCH_STOPWORDS: &[&str] = &[
    "a", "some", "you", "your", "me", "about", "do", "have", "any", "show", "find", "get", "for",
    "i", "am", "looking",
];

/// Articles dropped from review-lookup utterances.
const REVIEW_STOPWORDS: &[&str] = &["the", "a", "an"];

/// Whether a price filter keeps products above or below the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceOp {
    Above,
    Below,
}

/// A price constraint extracted from an utterance, in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceFilter {
    pub op: PriceOp,
    pub limit: i64,
}

/// Extracts a price filter from an utterance, if it contains a numeric token.
///
/// The operator is [`PriceOp::Above`] when the text contains "above", "over"
/// or "more than", otherwise [`PriceOp::Below`]. Returns `None` when no
/// numeric token is present so the caller falls through to token search.
#[must_use]
pub fn price_filter(utterance: &str) -> Option<PriceFilter> {
    let lower = utterance.to_lowercase();
    let digits = Regex::new(r"\d+").expect("valid digits regex");
    let limit: i64 = digits.find(&lower)?.as_str().parse().ok()?;

    let op = if ["above", "over", "more than"].iter().any(|w| lower.contains(w)) {
        PriceOp::Above
    } else {
        PriceOp::Below
    };
    Some(PriceFilter { op, limit })
}

/// Normalizes a product-search utterance into match tokens.
///
/// Lowercases, folds "tshirt"/"t-shirts" spellings to "t-shirt", splits on
/// whitespace, drops stopwords, then trims one trailing `s` per token. An
/// utterance of nothing but stopwords yields an empty vec.
#[must_use]
pub fn search_tokens(utterance: &str) -> Vec<String> {
    let lower = utterance.to_lowercase();
    let tee = Regex::new(r"t-?shirts?").expect("valid t-shirt regex");
    let normalized = tee.replace_all(&lower, "t-shirt");

    normalized
        .split_whitespace()
        .filter(|w| !SEARCH_STOPWORDS.contains(w))
        .map(singularize)
        .filter(|w| !w.is_empty())
        .collect()
}

/// Normalizes a review-lookup utterance into product-name match tokens.
///
/// Strips the boilerplate phrases "reviews for", "people say about" and
/// "thoughts on", then splits and drops articles. No plural trimming here:
/// review lookups match the product name as typed.
#[must_use]
pub fn review_search_tokens(utterance: &str) -> Vec<String> {
    let boilerplate =
        Regex::new(r"(?i)reviews? for|people say about|thoughts on").expect("valid phrase regex");
    let cleaned = boilerplate.replace_all(utterance, "");

    cleaned
        .to_lowercase()
        .split_whitespace()
        .filter(|w| !REVIEW_STOPWORDS.contains(w))
        .map(str::to_owned)
        .collect()
}

/// Trims at most one trailing `s`, so "jeans" and "jean" match the same rows.
fn singularize(word: &str) -> String {
    word.strip_suffix('s').unwrap_or(word).to_owned()
}
