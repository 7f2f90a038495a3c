//! POST /tag: classifies one question and stores the tagged record.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use question_tagger::{Persistence, TaggingRequest, TaggingResult};
use tracing::{debug, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

/// Handler: POST /tag
///
/// Returns the classification. An unusable model reply still answers 200 with
/// the fallback `{chapters: [], difficulty: "medium"}`. A classification that
/// could not be stored answers 503 `NOT_PERSISTED` with the result attached.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8000/tag \
///   -H 'content-type: application/json' \
///   -d '{"text":"Show that the vectors are perpendicular.","marks":5}'
/// ```
#[instrument(name = "tag_route", skip_all)]
pub async fn tag_question(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TaggingRequest>, JsonRejection>,
) -> AppResult<Json<TaggingResult>> {
    let Json(request) = payload?;

    let outcome = state.tagger.classify(&request).await?;

    match outcome.persistence {
        Persistence::Persisted { id } => {
            debug!(%id, reply_status = ?outcome.reply_status, "tag response ready");
            Ok(Json(outcome.result))
        }
        Persistence::NotPersisted { reason } => Err(AppError::NotPersisted {
            result: outcome.result,
            reason,
        }),
    }
}
