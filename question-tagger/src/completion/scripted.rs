//! Deterministic [`CompletionService`] for tests.

use std::sync::Mutex;

use ai_llm_service::ChatMessage;

use crate::completion::{BoxFuture, CompletionService, CheckStatus};
use crate::errors::CompletionError;

/// Replies with a fixed text (or fails) and records every conversation it receives.
pub struct ScriptedCompletion {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletion {
    /// Always answers `reply`.
    pub fn replying(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with [`CompletionError::Unavailable`].
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            reply: Err(reason.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Conversations received so far, oldest first.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }
}

impl CompletionService for ScriptedCompletion {
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, CompletionError>> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        let out = self
            .reply
            .clone()
            .map_err(CompletionError::Unavailable);
        Box::pin(async move { out })
    }

    fn check(&self) -> BoxFuture<'_, CheckStatus> {
        let status = match &self.reply {
            Ok(_) => CheckStatus {
                ok: true,
                latency_ms: 0,
                message: "scripted completion".into(),
            },
            Err(reason) => CheckStatus {
                ok: false,
                latency_ms: 0,
                message: reason.clone(),
            },
        };
        Box::pin(async move { status })
    }
}
