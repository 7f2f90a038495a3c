use ai_llm_service::AiLlmError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use question_tagger::{TaggerError, TaggingResult};
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] AiLlmError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("missing or invalid debug token")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// The question was classified but the record was not stored.
    #[error("classification not persisted: {reason}")]
    NotPersisted {
        result: TaggingResult,
        reason: String,
    },

    /// Rich HTTP error mapped from lower layers with specific status & code.
    #[error("{message}")]
    Http {
        status: StatusCode,
        code: &'static str,
        message: String,
    },
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // 4xx
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,

            // custom mapped
            AppError::NotPersisted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Http { status, .. } => *status,

            // 5xx, startup-only
            AppError::Config(_) | AppError::Llm(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Llm(_) => "LLM_CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::NotFound => "NOT_FOUND",
            AppError::NotPersisted { .. } => "NOT_PERSISTED",
            AppError::Http { code, .. } => code,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<TaggingResult>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.error_code();
        let message = self.to_string();
        let result = match self {
            AppError::NotPersisted { result, .. } => Some(result),
            _ => None,
        };
        (
            status,
            Json(ErrorBody {
                error,
                message,
                result,
            }),
        )
            .into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::Http {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                code: "PAYLOAD_TOO_LARGE",
                message: err.body_text(),
            };
        }
        AppError::BadRequest(err.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}

/// Maps tagging failures to HTTP status & code.
impl From<TaggerError> for AppError {
    fn from(err: TaggerError) -> Self {
        let (status, code) = match &err {
            TaggerError::Completion(_) => (StatusCode::BAD_GATEWAY, "COMPLETION_FAILED"),
            TaggerError::Store(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORE_ERROR"),
            TaggerError::Record(_) => (StatusCode::INTERNAL_SERVER_ERROR, "RECORD_ERROR"),
            TaggerError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
        };
        AppError::Http {
            status,
            code,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use question_tagger::{CompletionError, StoreError};

    #[test]
    fn tagger_errors_map_to_status_and_code() {
        let e = AppError::from(TaggerError::Completion(CompletionError::Unavailable(
            "rate limited".into(),
        )));
        assert_eq!(e.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(e.error_code(), "COMPLETION_FAILED");

        let e = AppError::from(TaggerError::Store(StoreError::Unavailable("down".into())));
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.error_code(), "STORE_ERROR");
    }

    #[test]
    fn not_persisted_is_service_unavailable() {
        let e = AppError::NotPersisted {
            result: TaggingResult::fallback(),
            reason: "store error: store unavailable: down".into(),
        };
        assert_eq!(e.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(e.error_code(), "NOT_PERSISTED");
        assert!(e.to_string().starts_with("classification not persisted"));
    }
}
