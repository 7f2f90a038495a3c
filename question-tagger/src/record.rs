//! Request/result models and the stored record built from them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Schema-less stored document (request fields ∪ result fields, plus `_id` once stored).
pub type StoredRecord = Map<String, Value>;

/// A question block to classify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingRequest {
    /// Question body, passed to the model as is.
    pub text: String,
    /// Mark allocation of the question.
    pub marks: i64,
}

/// Difficulty label produced by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

/// Classification returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggingResult {
    pub chapters: Vec<String>,
    pub difficulty: Difficulty,
}

impl TaggingResult {
    /// Value substituted when the model reply is unusable.
    pub fn fallback() -> Self {
        Self {
            chapters: Vec::new(),
            difficulty: Difficulty::Medium,
        }
    }
}

/// Identifier assigned by the store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InsertedId(pub String);

impl fmt::Display for InsertedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Merges two serializable objects into one record; keys of `overlay` win.
///
/// Non-object values contribute nothing.
pub fn merge_record<B, O>(base: &B, overlay: &O) -> Result<StoredRecord, serde_json::Error>
where
    B: Serialize,
    O: Serialize,
{
    let mut merged = match serde_json::to_value(base)? {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    if let Value::Object(top) = serde_json::to_value(overlay)? {
        merged.extend(top);
    }
    Ok(merged)
}
