use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::{core::app_state::AppState, error_handler::AppError};

/// Header carrying the `/questions` debug token.
pub const DEBUG_TOKEN_HEADER: &str = "x-debug-token";

/// Rejects the request with 401 unless it carries the configured debug token.
/// Passes everything through when no token is configured.
pub async fn require_debug_token(
    State(state): State<Arc<AppState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(expected) = state.config.questions_token.as_deref() {
        let provided = req
            .headers()
            .get(DEBUG_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !tokens_match(provided, expected) {
            warn!(path = %req.uri().path(), "debug token rejected");
            return AppError::Unauthorized.into_response();
        }
    }

    next.run(req).await
}

/// Compares fixed-length digests so the token length does not leak.
fn tokens_match(provided: &str, expected: &str) -> bool {
    let provided = blake3::hash(provided.as_bytes());
    let expected = blake3::hash(expected.as_bytes());
    bool::from(provided.as_bytes().ct_eq(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_identical_tokens_match() {
        assert!(tokens_match("s3cret", "s3cret"));
        assert!(!tokens_match("s3cret ", "s3cret"));
        assert!(!tokens_match("", "s3cret"));
    }
}
