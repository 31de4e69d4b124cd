use thiserror::Error;

/// Errors returned by the Gemini API client.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API refused the prompt or withheld the completion, e.g. a safety
    /// block. Carries the reported reason.
    #[error("generation blocked: {0}")]
    Blocked(String),

    /// The API answered 2xx but the payload carried no usable completion.
    #[error("Gemini API error: {0}")]
    ApiError(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
