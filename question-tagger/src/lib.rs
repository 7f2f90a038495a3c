//! Exam question tagging: asks a chat model for chapters and difficulty,
//! validates the reply and stores the tagged record.
//!
//! The two external collaborators are capability traits injected into
//! [`Tagger`]:
//! - [`CompletionService`]: OpenAI adapter in [`completion::openai`]
//! - [`DocumentStore`]: MongoDB adapter in [`store::mongo`]
//!
//! Deterministic implementations (`completion::scripted`, `store::in_memory`)
//! back the tests. Downstream crates enable them with the `testing` feature.

pub mod completion;
pub mod config;
mod errors;
pub mod parse;
pub mod prompt;
mod record;
pub mod store;
mod tagger;

pub use completion::{BoxFuture, CompletionService, CheckStatus};
pub use config::{DEFAULT_LIST_LIMIT, StoreConfig};
pub use errors::{CompletionError, StoreError, TaggerError};
pub use parse::ErrorKind;
pub use record::{
    Difficulty, InsertedId, StoredRecord, TaggingRequest, TaggingResult, merge_record,
};
pub use store::DocumentStore;
pub use tagger::{HealthReport, Persistence, ReplyStatus, TagOutcome, Tagger};
