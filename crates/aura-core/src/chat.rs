//! Chat transcript types.
//!
//! A transcript is scoped to one connection or one request. It is never
//! persisted and carries no identity beyond the messages themselves.

use serde::{Deserialize, Serialize};

/// Who produced a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a chat conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Ordered record of a single chat session's turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Serializes the transcript for inclusion in a generative prompt,
    /// one `User:`/`Assistant:` line per turn.
    #[must_use]
    pub fn render(&self) -> String {
        self.messages
            .iter()
            .map(|m| match m.role {
                ChatRole::User => format!("User: {}", m.content),
                ChatRole::Assistant => format!("Assistant: {}", m.content),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_interleaves_roles_in_order() {
        let mut t = Transcript::new();
        t.push_assistant("Welcome!");
        t.push_user("any blue jeans?");
        t.push_assistant("Here are some options.");
        assert_eq!(
            t.render(),
            "Assistant: Welcome!\nUser: any blue jeans?\nAssistant: Here are some options."
        );
    }

    #[test]
    fn empty_transcript_renders_empty() {
        assert_eq!(Transcript::new().render(), "");
        assert!(Transcript::new().is_empty());
    }

    #[test]
    fn serde_roundtrip_is_a_plain_array() {
        let mut t = Transcript::new();
        t.push_user("hello");
        let json = serde_json::to_string(&t).expect("serialize");
        assert_eq!(json, r#"[{"role":"user","content":"hello"}]"#);
        let back: Transcript = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.messages().len(), 1);
        assert_eq!(back.messages()[0].role, ChatRole::User);
    }
}
