//! The tagging handler: prompt → completion → parse-or-fallback → persist.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::completion::{CompletionService, CheckStatus};
use crate::errors::TaggerError;
use crate::parse::{self, ErrorKind};
use crate::prompt;
use crate::record::{self, InsertedId, StoredRecord, TaggingRequest, TaggingResult};
use crate::store::DocumentStore;

/// How the returned result was obtained from the model reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// Reply decoded into a valid result.
    Parsed,
    /// Reply was unusable; the fallback value was substituted.
    Fallback(ErrorKind),
}

/// Whether the merged record reached the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Persisted { id: InsertedId },
    NotPersisted { reason: String },
}

/// Everything `classify` learned about one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOutcome {
    pub result: TaggingResult,
    pub reply_status: ReplyStatus,
    pub persistence: Persistence,
}

impl TagOutcome {
    pub fn is_persisted(&self) -> bool {
        matches!(self.persistence, Persistence::Persisted { .. })
    }
}

/// Health of both collaborators.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub completion: CheckStatus,
    pub store: CheckStatus,
}

impl HealthReport {
    pub fn ok(&self) -> bool {
        self.completion.ok && self.store.ok
    }
}

/// Classifies questions and stores the tagged records.
///
/// Both collaborators are injected once at startup and shared read-only.
pub struct Tagger {
    completion: Arc<dyn CompletionService>,
    store: Arc<dyn DocumentStore>,
}

impl Tagger {
    pub fn new(completion: Arc<dyn CompletionService>, store: Arc<dyn DocumentStore>) -> Self {
        Self { completion, store }
    }

    /// Classifies one question and persists `request ∪ result`.
    ///
    /// An unusable reply never fails the call: the fallback is returned and
    /// [`TagOutcome::reply_status`] says why. A store failure does not drop
    /// the classification either; it is reported as
    /// [`Persistence::NotPersisted`].
    ///
    /// # Errors
    /// [`TaggerError::Completion`] when the completion service fails; nothing
    /// is stored in that case.
    #[instrument(skip_all, fields(marks = request.marks, text_len = request.text.len()))]
    pub async fn classify(&self, request: &TaggingRequest) -> Result<TagOutcome, TaggerError> {
        let started = Instant::now();
        let messages = prompt::build_messages(request);

        let raw = self.completion.complete(&messages).await.map_err(|e| {
            error!(error = %e, "completion service failed");
            TaggerError::Completion(e)
        })?;
        debug!(reply_len = raw.len(), "completion reply received");

        let (result, reply_status) = match parse::parse_reply(&raw) {
            Ok(r) => (r, ReplyStatus::Parsed),
            Err(kind) => {
                warn!(
                    %kind,
                    reply = %ai_llm_service::error_handler::make_snippet(&raw),
                    "unusable completion reply; using fallback"
                );
                (TaggingResult::fallback(), ReplyStatus::Fallback(kind))
            }
        };

        let persistence = match self.persist(request, &result).await {
            Ok(id) => Persistence::Persisted { id },
            Err(e) => {
                warn!(error = %e, "classification not persisted");
                Persistence::NotPersisted {
                    reason: e.to_string(),
                }
            }
        };

        info!(
            difficulty = %result.difficulty,
            chapters = result.chapters.len(),
            parsed = matches!(reply_status, ReplyStatus::Parsed),
            persisted = matches!(persistence, Persistence::Persisted { .. }),
            latency_ms = started.elapsed().as_millis(),
            "question tagged"
        );

        Ok(TagOutcome {
            result,
            reply_status,
            persistence,
        })
    }

    /// Stores `request ∪ result` (result keys win) without re-classifying.
    ///
    /// # Errors
    /// [`TaggerError::Store`] if the insert fails.
    pub async fn persist(
        &self,
        request: &TaggingRequest,
        result: &TaggingResult,
    ) -> Result<InsertedId, TaggerError> {
        let record = record::merge_record(request, result)?;
        let id = self.store.insert_one(record).await?;
        debug!(%id, "record persisted");
        Ok(id)
    }

    /// Up to `limit` stored records, verbatim, in store order.
    ///
    /// # Errors
    /// [`TaggerError::Store`] if the read fails.
    pub async fn list_first(&self, limit: u64) -> Result<Vec<StoredRecord>, TaggerError> {
        let records = self.store.find_first(limit).await?;
        debug!(limit, returned = records.len(), "listed stored questions");
        Ok(records)
    }

    /// Checks both collaborators; never fails.
    pub async fn health(&self) -> HealthReport {
        let completion = self.completion.check().await;

        let started = Instant::now();
        let store = match self.store.ping().await {
            Ok(()) => CheckStatus {
                ok: true,
                latency_ms: started.elapsed().as_millis(),
                message: "store is reachable".into(),
            },
            Err(e) => {
                warn!(error = %e, "store ping failed");
                CheckStatus {
                    ok: false,
                    latency_ms: started.elapsed().as_millis(),
                    message: e.to_string(),
                }
            }
        };

        HealthReport { completion, store }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::scripted::ScriptedCompletion;
    use crate::record::Difficulty;
    use crate::store::in_memory::InMemoryStore;
    use ai_llm_service::ChatRole;
    use serde_json::json;

    fn req() -> TaggingRequest {
        TaggingRequest {
            text: "Show that the vectors are perpendicular.".into(),
            marks: 5,
        }
    }

    fn tagger(reply: &str) -> (Tagger, Arc<ScriptedCompletion>, Arc<InMemoryStore>) {
        let completion = Arc::new(ScriptedCompletion::replying(reply));
        let store = Arc::new(InMemoryStore::new());
        (
            Tagger::new(completion.clone(), store.clone()),
            completion,
            store,
        )
    }

    #[tokio::test]
    async fn valid_reply_is_returned_and_stored() {
        let (t, _, store) = tagger(r#"{"chapters":["Vectors"],"difficulty":"hard"}"#);

        let out = t.classify(&req()).await.unwrap();
        assert_eq!(
            out.result,
            TaggingResult {
                chapters: vec!["Vectors".into()],
                difficulty: Difficulty::Hard
            }
        );
        assert_eq!(out.reply_status, ReplyStatus::Parsed);
        assert!(out.is_persisted());

        let stored = store.find_first(10).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["text"], req().text);
        assert_eq!(stored[0]["marks"], 5);
        assert_eq!(stored[0]["chapters"], json!(["Vectors"]));
        assert_eq!(stored[0]["difficulty"], "hard");
    }

    #[tokio::test]
    async fn prose_reply_falls_back() {
        let (t, _, store) = tagger("I cannot classify this.");

        let out = t.classify(&req()).await.unwrap();
        assert_eq!(out.result, TaggingResult::fallback());
        assert_eq!(
            out.reply_status,
            ReplyStatus::Fallback(ErrorKind::InvalidSyntax)
        );
        // The fallback is still persisted.
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn wrong_shape_reply_falls_back() {
        let (t, _, _) = tagger(r#"{"topic":"Algebra"}"#);

        let out = t.classify(&req()).await.unwrap();
        assert_eq!(out.result, TaggingResult::fallback());
        assert_eq!(
            out.reply_status,
            ReplyStatus::Fallback(ErrorKind::InvalidShape)
        );
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let (t, completion, _) = tagger(r#"{"chapters":[],"difficulty":"easy"}"#);
        t.classify(&req()).await.unwrap();

        let calls = completion.calls();
        assert_eq!(calls.len(), 1);
        let msgs = &calls[0];
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, ChatRole::System);
        assert_eq!(msgs[0].content, prompt::SYSTEM_PROMPT);
        assert_eq!(msgs[1].role, ChatRole::User);
        assert_eq!(
            msgs[1].content,
            "Show that the vectors are perpendicular.\nMarks:(5)"
        );
    }

    #[tokio::test]
    async fn store_failure_keeps_result_and_is_reported() {
        let (t, _, store) = tagger(r#"{"chapters":["Vectors"],"difficulty":"hard"}"#);
        store.set_fail_inserts(true);

        let out = t.classify(&req()).await.unwrap();
        assert_eq!(out.result.difficulty, Difficulty::Hard);
        assert!(matches!(out.persistence, Persistence::NotPersisted { .. }));
        assert!(store.is_empty());

        // Retrying only the persist step succeeds once the store recovers.
        store.set_fail_inserts(false);
        t.persist(&req(), &out.result).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn completion_failure_is_an_error_and_stores_nothing() {
        let completion = Arc::new(ScriptedCompletion::failing("rate limited"));
        let store = Arc::new(InMemoryStore::new());
        let t = Tagger::new(completion, store.clone());

        let err = t.classify(&req()).await.unwrap_err();
        assert!(matches!(err, TaggerError::Completion(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn list_first_returns_verbatim_subset() {
        let (t, _, _) = tagger(r#"{"chapters":["Series"],"difficulty":"medium"}"#);
        let expected = TaggingResult {
            chapters: vec!["Series".into()],
            difficulty: Difficulty::Medium,
        };
        let mut inserted = Vec::new();
        for i in 0..5 {
            let r = TaggingRequest {
                text: format!("question {i}"),
                marks: i,
            };
            t.classify(&r).await.unwrap();
            inserted.push(record::merge_record(&r, &expected).unwrap());
        }

        let listed = t.list_first(3).await.unwrap();
        assert_eq!(listed.len(), 3);
        for rec in &listed {
            assert!(rec.contains_key("_id"));
            let mut without_id = rec.clone();
            without_id.remove("_id");
            assert!(inserted.contains(&without_id));
        }
    }

    #[tokio::test]
    async fn health_reports_both_collaborators() {
        let (t, _, _) = tagger("{}");
        let report = t.health().await;
        assert!(report.ok());

        let t = Tagger::new(
            Arc::new(ScriptedCompletion::failing("down")),
            Arc::new(InMemoryStore::new()),
        );
        let report = t.health().await;
        assert!(!report.ok());
        assert!(report.store.ok);
        assert_eq!(report.completion.message, "down");
    }
}
