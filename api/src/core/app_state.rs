use ai_llm_service::AiLlmError;
use ai_llm_service::error_handler::{env_bool, env_or};
use question_tagger::Tagger;
use thiserror::Error;

/// Listen address used when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8000";

/// Startup configuration errors of the HTTP layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API_ADDRESS must be host:port, got {0:?}")]
    InvalidAddress(String),

    #[error(transparent)]
    Env(#[from] AiLlmError),
}

/// HTTP-layer settings read from the environment.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Listener address, e.g. "127.0.0.1:8000".
    pub address: String,
    /// Mount `GET /questions` at all.
    pub questions_enabled: bool,
    /// When set, `/questions` requires a matching `x-debug-token` header.
    pub questions_token: Option<String>,
}

impl ApiConfig {
    /// Load settings from `API_ADDRESS`, `QUESTIONS_DEBUG_ENABLED` and
    /// `QUESTIONS_DEBUG_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let address = env_or("API_ADDRESS", DEFAULT_API_ADDRESS);
        validate_address(&address)?;

        let questions_token = std::env::var("QUESTIONS_DEBUG_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        Ok(Self {
            address,
            questions_enabled: env_bool("QUESTIONS_DEBUG_ENABLED", true)?,
            questions_token,
        })
    }
}

fn validate_address(address: &str) -> Result<(), ConfigError> {
    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(ConfigError::InvalidAddress(address.to_string())),
    }
}

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Classifier with its injected completion service and document store.
    pub tagger: Tagger,
    pub config: ApiConfig,
}
