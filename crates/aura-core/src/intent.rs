//! Intent classification for chat utterances.
//!
//! A fixed set of keyword and phrase rules evaluated in priority order; the
//! first rule that matches wins and [`Intent::FindProduct`] is the universal
//! fallback, so every utterance maps to some intent. Keyword rules match
//! whole words only, so "hi" inside "shirt" or "archive" is not a greeting.

use std::collections::HashSet;

/// The classified purpose of one user utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Top-selling products ("bestseller", "top selling").
    FindBestsellers,
    /// Reviews for a named product ("review", "say about").
    FindReviews,
    /// The user's recent orders ("order", "history").
    OrderHistory,
    /// The store's return policy ("return policy").
    ReturnPolicy,
    /// A salutation ("hello", "hi", "hey").
    Greeting,
    /// Default: treat the utterance as a product search.
    FindProduct,
}

/// Classifies an utterance into an [`Intent`].
///
/// Pure and deterministic: lowercases the input, splits it into
/// word-boundary tokens, and checks the rules in priority order. Keyword
/// rules accept the explicit singular and plural token forms; phrase rules
/// are substring checks against the lowercased utterance.
#[must_use]
pub fn classify(utterance: &str) -> Intent {
    let lower = utterance.to_lowercase();
    let words: HashSet<&str> = words_of(&lower).collect();

    if words.contains("bestseller") || words.contains("bestsellers") || lower.contains("top selling")
    {
        return Intent::FindBestsellers;
    }
    if words.contains("review") || words.contains("reviews") || lower.contains("say about") {
        return Intent::FindReviews;
    }
    if words.contains("order") || words.contains("orders") || words.contains("history") {
        return Intent::OrderHistory;
    }
    if lower.contains("return policy") {
        return Intent::ReturnPolicy;
    }
    if ["hello", "hi", "hey"].iter().any(|w| words.contains(w)) {
        return Intent::Greeting;
    }

    Intent::FindProduct
}

/// Splits text into alphanumeric word runs, the equivalent of `\b\w+\b`.
fn words_of(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bestseller_token_wins_regardless_of_case_and_context() {
        assert_eq!(classify("show me your BESTSELLER items"), Intent::FindBestsellers);
        assert_eq!(classify("bestsellers?"), Intent::FindBestsellers);
        assert_eq!(classify("what are the top selling jeans"), Intent::FindBestsellers);
    }

    #[test]
    fn bestseller_outranks_review_keyword() {
        // "review" also appears, but bestsellers has higher priority.
        assert_eq!(
            classify("review your bestseller list"),
            Intent::FindBestsellers
        );
    }

    #[test]
    fn review_keyword_and_phrase() {
        assert_eq!(classify("reviews for the grey tee"), Intent::FindReviews);
        assert_eq!(
            classify("what do people say about the bomber jacket"),
            Intent::FindReviews
        );
    }

    #[test]
    fn order_history_keywords() {
        assert_eq!(classify("where is my order"), Intent::OrderHistory);
        assert_eq!(classify("show purchase history"), Intent::OrderHistory);
    }

    #[test]
    fn return_policy_phrase_only() {
        assert_eq!(classify("what is your return policy"), Intent::ReturnPolicy);
        // "return" alone is not enough.
        assert_eq!(classify("return flights to delhi"), Intent::FindProduct);
    }

    #[test]
    fn greeting_tokens() {
        assert_eq!(classify("Hello!"), Intent::Greeting);
        assert_eq!(classify("hey there"), Intent::Greeting);
        assert_eq!(classify("HI"), Intent::Greeting);
    }

    #[test]
    fn greeting_does_not_match_inside_other_words() {
        // "hi" is a substring of "shirt" and "archive" but not a word.
        assert_eq!(classify("white shirt"), Intent::FindProduct);
        assert_eq!(classify("archive"), Intent::FindProduct);
        // "his" must not be trimmed into "hi".
        assert_eq!(classify("his jacket"), Intent::FindProduct);
    }

    #[test]
    fn everything_else_falls_through_to_product_search() {
        assert_eq!(classify("blue denim jacket"), Intent::FindProduct);
        assert_eq!(classify(""), Intent::FindProduct);
        assert_eq!(classify("?!"), Intent::FindProduct);
    }
}
