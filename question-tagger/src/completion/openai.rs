//! [`CompletionService`] backed by the OpenAI chat completions API.

use ai_llm_service::{ChatMessage, HealthService, OpenAiService};

use crate::completion::{BoxFuture, CompletionService, CheckStatus};
use crate::errors::{CompletionError, TaggerError};

/// OpenAI client plus the health checker used by `/health`.
pub struct OpenAiCompletion {
    client: OpenAiService,
    health: HealthService,
}

impl OpenAiCompletion {
    /// Builds the adapter from a ready client.
    ///
    /// # Errors
    /// Returns `TaggerError::Completion` if the health client cannot be built.
    pub fn new(client: OpenAiService) -> Result<Self, TaggerError> {
        let health = HealthService::new(client.config().timeout_secs)
            .map_err(|e| TaggerError::Completion(CompletionError::Upstream(e)))?;
        Ok(Self { client, health })
    }
}

impl CompletionService for OpenAiCompletion {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, CompletionError>> {
        Box::pin(async move { Ok(self.client.chat(messages).await?) })
    }

    fn check(&self) -> BoxFuture<'_, CheckStatus> {
        Box::pin(async move {
            let st = self.health.check(self.client.config()).await;
            CheckStatus {
                ok: st.ok,
                latency_ms: st.latency_ms,
                message: st.message,
            }
        })
    }
}
