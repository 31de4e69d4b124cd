//! Prompt assembly for chat questions the keyword rules cannot handle.

use aura_core::chat::Transcript;

const PERSONA: &str = "You are 'Aura', the friendly shopping assistant for AURA Apparel, an \
online clothing store. AURA Apparel sells its own four house brands: Aura Basics, Aura Active, \
Aura Denim and Aura Luxe. Answer in one or two short sentences, stay on the topic of the store \
and its products, and never invent discounts, stock levels or order details. If the question is \
unrelated to shopping at AURA Apparel, politely steer the customer back to the store.";

/// Builds the full prompt for a free-form question: persona rules, the
/// running conversation, then the new question.
#[must_use]
pub fn build_chat_prompt(history: &Transcript, question: &str) -> String {
    let mut prompt = String::from(PERSONA);
    if !history.is_empty() {
        prompt.push_str("\n\nConversation so far:\n");
        prompt.push_str(&history.render());
    }
    prompt.push_str("\n\nCustomer: ");
    prompt.push_str(question);
    prompt.push_str("\nAura:");
    prompt
}
