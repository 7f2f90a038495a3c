//! Shared LLM client library: OpenAI-compatible chat completions, env-driven
//! config, unified errors, a health check and a library-scoped log layer.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod services;
pub mod telemetry;

pub use config::default_config::config_openai_tagging;
pub use config::llm_model_config::LlmModelConfig;
pub use error_handler::AiLlmError;
pub use health_service::{HealthService, HealthStatus};
pub use services::open_ai_service::{ChatMessage, ChatRole, OpenAiService};
