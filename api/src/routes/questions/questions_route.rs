//! GET /questions: debug listing of stored records.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use question_tagger::{DEFAULT_LIST_LIMIT, StoredRecord};
use serde::Deserialize;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
};

/// Query string of /questions.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Max records to return; defaults to [`DEFAULT_LIST_LIMIT`].
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Handler: GET /questions?limit=N
///
/// Records come back verbatim, `_id` included, in store order.
pub async fn list_questions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<StoredRecord>>> {
    let Query(query) = query?;
    let limit = match query.limit {
        None => DEFAULT_LIST_LIMIT,
        Some(n) => u64::try_from(n)
            .map_err(|_| AppError::BadRequest(format!("limit must be >= 0, got {n}")))?,
    };

    let records = state.tagger.list_first(limit).await?;
    Ok(Json(records))
}
