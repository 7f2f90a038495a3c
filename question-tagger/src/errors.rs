//! Unified error types for the crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Top-level error for tagging operations.
#[derive(Debug, Error)]
pub enum TaggerError {
    /// The completion service could not produce a reply.
    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    /// Document store read/write failures.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A record could not be built from the request/result pair.
    #[error("record error: {0}")]
    Record(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Failure of a [`CompletionService`](crate::CompletionService) call.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Error reported by the LLM client (transport, HTTP status, decode, timeout).
    #[error(transparent)]
    Upstream(#[from] AiLlmError),

    /// Backend refused or is not reachable (used by non-HTTP implementations).
    #[error("completion backend unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a [`DocumentStore`](crate::DocumentStore) call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// MongoDB driver errors (wrapped).
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Record could not be converted to BSON.
    #[error("bson error: {0}")]
    Bson(#[from] mongodb::bson::ser::Error),

    /// Store returned something that is not a document.
    #[error("unexpected stored value: {0}")]
    Malformed(String),

    /// Store is not reachable or refuses the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
