use thiserror::Error;

pub mod app_config;
pub mod chat;
pub mod config;
pub mod intent;
pub mod pricing;
pub mod text;

pub use app_config::{AppConfig, Environment};
pub use chat::{ChatMessage, ChatRole, Transcript};
pub use config::{load_app_config, load_app_config_from_env};
pub use intent::{classify, Intent};
pub use pricing::{format_sale_price, sale_price, CURRENCY_SYMBOL};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
