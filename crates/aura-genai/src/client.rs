//! HTTP client for the Gemini `generateContent` REST endpoint.
//!
//! Wraps `reqwest` with typed error handling, API key management and the
//! retry policy from [`crate::retry`]. Safety blocks are surfaced as
//! [`GenAiError::Blocked`] so callers can fall back without retrying.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GenAiError;
use crate::retry::retry_with_backoff;
use crate::types::{GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Settings for constructing a [`GenAiClient`].
#[derive(Debug, Clone)]
pub struct GenAiSettings {
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl GenAiSettings {
    /// Pulls the Gemini settings out of the application config. Returns
    /// `None` when no API key is configured, which disables the fallback.
    #[must_use]
    pub fn from_app_config(config: &aura_core::AppConfig) -> Option<Self> {
        config.genai_api_key.as_ref().map(|key| Self {
            api_key: key.clone(),
            model: config.genai_model.clone(),
            timeout_secs: config.genai_timeout_secs,
            max_retries: config.genai_max_retries,
            backoff_base_ms: config.genai_backoff_base_ms,
        })
    }
}

/// Client for the Gemini REST API.
///
/// Use [`GenAiClient::new`] for production or [`GenAiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GenAiClient {
    client: Client,
    endpoint: Url,
    model: String,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl GenAiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(settings: &GenAiSettings) -> Result<Self, GenAiError> {
        Self::with_base_url(settings, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GenAiError::ApiError`] if `base_url` is
    /// not a valid URL.
    pub fn with_base_url(settings: &GenAiSettings, base_url: &str) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("aura-apparel/0.1 (storefront-assistant)")
            .build()?;

        // Normalise to exactly one trailing slash so the join below appends
        // rather than replaces the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let mut endpoint = Url::parse(&normalised)
            .and_then(|base| {
                base.join(&format!("v1beta/models/{}:generateContent", settings.model))
            })
            .map_err(|e| GenAiError::ApiError(format!("invalid base URL '{base_url}': {e}")))?;
        endpoint
            .query_pairs_mut()
            .append_pair("key", &settings.api_key);

        Ok(Self {
            client,
            endpoint,
            model: settings.model.clone(),
            max_retries: settings.max_retries,
            backoff_base_ms: settings.backoff_base_ms,
        })
    }

    /// The configured model name, for logging.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generates a completion for `prompt`, retrying transient failures per
    /// the configured back-off policy.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::Blocked`] if the API withheld the completion.
    /// - [`GenAiError::ApiError`] if the payload carried no text.
    /// - [`GenAiError::Http`] on network failure or non-2xx HTTP status.
    /// - [`GenAiError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenAiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.generate_once(prompt)
        })
        .await
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, GenAiError> {
        let request = GenerateContentRequest::from_prompt(prompt);
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| GenAiError::Deserialize {
                context: format!("generateContent(model={})", self.model),
                source: e,
            })?;

        Self::extract_text(parsed)
    }

    /// Pulls the completion text out of the response, mapping safety blocks
    /// and empty payloads to typed errors.
    fn extract_text(response: GenerateContentResponse) -> Result<String, GenAiError> {
        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(GenAiError::Blocked(reason));
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return Err(GenAiError::ApiError(
                "response contained no candidates".to_owned(),
            ));
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                return Err(GenAiError::Blocked(reason));
            }
            return Err(GenAiError::ApiError(
                "candidate contained no text".to_owned(),
            ));
        }

        Ok(text.trim().to_owned())
    }
}
