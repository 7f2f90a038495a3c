use std::{future::Future, pin::Pin};

use ai_llm_service::ChatMessage;
use serde::Serialize;

use crate::errors::CompletionError;

/// Boxed future returned by the capability traits so they stay object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result of a reachability check against an external collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckStatus {
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

/// Chat completion backend.
///
/// Implement this trait to plug in another model provider. The handler only
/// needs the first choice's text for a full conversation.
pub trait CompletionService: Send + Sync {
    /// Sends `messages` as the whole conversation and returns the reply text.
    fn complete<'a>(
        &'a self,
        messages: &'a [ChatMessage],
    ) -> BoxFuture<'a, Result<String, CompletionError>>;

    /// Best-effort reachability check; never fails.
    fn check(&self) -> BoxFuture<'_, CheckStatus>;
}

pub mod openai;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;
