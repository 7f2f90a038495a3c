//! Default LLM configs loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY`      = bearer credential (mandatory)
//! - `OPENAI_URL`          = API base, defaults to `https://api.openai.com`
//! - `OPENAI_MODEL`        = chat model, defaults to `gpt-3.5-turbo`
//! - `OPENAI_TIMEOUT_SECS` = request timeout, defaults to `60`

use crate::{
    config::llm_model_config::LlmModelConfig,
    error_handler::{
        AiLlmError, parse_opt_u64, required_var, validate_http_endpoint, var_or,
    },
};

/// Default OpenAI API base.
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
/// Default chat model used for question tagging.
pub const DEFAULT_TAGGING_MODEL: &str = "gpt-3.5-turbo";
/// Low sampling temperature used for classification.
pub const TAGGING_TEMPERATURE: f32 = 0.2;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Constructs the config for the **tagging** chat model from the process
/// environment. See [`tagging_config_from`].
pub fn config_openai_tagging() -> Result<LlmModelConfig, AiLlmError> {
    tagging_config_from(|name| std::env::var(name).ok())
}

/// Constructs the tagging config from an arbitrary variable lookup.
///
/// The temperature is pinned to [`TAGGING_TEMPERATURE`]; callers of the HTTP
/// API cannot change it.
///
/// # Errors
///
/// - [`ConfigError::MissingVar`] if `OPENAI_API_KEY` is absent
/// - [`ConfigError::InvalidFormat`] if `OPENAI_URL` has no http/https scheme
/// - [`ConfigError::InvalidNumber`] if `OPENAI_TIMEOUT_SECS` is not a number
pub fn tagging_config_from<F>(get: F) -> Result<LlmModelConfig, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = required_var("OPENAI_API_KEY", get("OPENAI_API_KEY"))?;
    let endpoint = var_or(get("OPENAI_URL"), DEFAULT_OPENAI_URL);
    validate_http_endpoint("OPENAI_URL", &endpoint)?;

    let model = var_or(get("OPENAI_MODEL"), DEFAULT_TAGGING_MODEL).trim().to_string();

    let timeout_secs =
        parse_opt_u64("OPENAI_TIMEOUT_SECS", get("OPENAI_TIMEOUT_SECS"))?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(LlmModelConfig {
        model,
        endpoint,
        api_key: Some(api_key),
        max_tokens: None,
        temperature: Some(TAGGING_TEMPERATURE),
        top_p: None,
        timeout_secs: Some(timeout_secs),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handler::ConfigError;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_are_gpt35_at_low_temperature() {
        let cfg = tagging_config_from(lookup(&[("OPENAI_API_KEY", "sk-test")])).unwrap();
        assert_eq!(cfg.model, "gpt-3.5-turbo");
        assert_eq!(cfg.temperature, Some(0.2));
        assert_eq!(cfg.endpoint, "https://api.openai.com");
        assert_eq!(cfg.timeout_secs, Some(60));
        assert_eq!(cfg.api_key.as_deref(), Some("sk-test"));
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.top_p, None);
    }

    #[test]
    fn overrides_do_not_touch_temperature() {
        let cfg = tagging_config_from(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("OPENAI_URL", "http://localhost:8080"),
            ("OPENAI_MODEL", " gpt-4o-mini "),
            ("OPENAI_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.endpoint, "http://localhost:8080");
        assert_eq!(cfg.timeout_secs, Some(5));
        assert_eq!(cfg.temperature, Some(0.2));
    }

    #[test]
    fn missing_key_and_bad_values_are_rejected() {
        assert!(matches!(
            tagging_config_from(lookup(&[])),
            Err(AiLlmError::Config(ConfigError::MissingVar("OPENAI_API_KEY")))
        ));
        assert!(matches!(
            tagging_config_from(lookup(&[("OPENAI_API_KEY", "k"), ("OPENAI_URL", "api.openai.com")])),
            Err(AiLlmError::Config(ConfigError::InvalidFormat { var: "OPENAI_URL", .. }))
        ));
        assert!(matches!(
            tagging_config_from(lookup(&[("OPENAI_API_KEY", "k"), ("OPENAI_TIMEOUT_SECS", "1m")])),
            Err(AiLlmError::Config(ConfigError::InvalidNumber { .. }))
        ));
    }
}
