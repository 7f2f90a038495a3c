use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde_json::{Value, json};

use crate::completion::BoxFuture;
use crate::errors::StoreError;
use crate::record::{InsertedId, StoredRecord};
use crate::store::DocumentStore;

/// Process-local [`DocumentStore`] keeping records in insertion order.
///
/// Ids are 24 hex digits rendered as `{"$oid": ...}`, matching what the
/// Mongo adapter returns. Failures can be switched on to exercise error paths.
pub struct InMemoryStore {
    records: RwLock<Vec<StoredRecord>>,
    next_id: AtomicU64,
    fail_inserts: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            fail_inserts: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert_sync(&self, mut record: StoredRecord) -> Result<InsertedId, StoreError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("inserts disabled".into()));
        }

        let id = match record.get("_id") {
            Some(existing) => existing_id(existing),
            None => {
                let n = self.next_id.fetch_add(1, Ordering::SeqCst);
                let hex = format!("{n:024x}");
                record.insert("_id".into(), json!({ "$oid": hex }));
                InsertedId(hex)
            }
        };

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        records.push(record);
        Ok(id)
    }

    fn find_sync(&self, limit: u64) -> Result<Vec<StoredRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".into()))?;
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(records.iter().take(take).cloned().collect())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn existing_id(value: &Value) -> InsertedId {
    match value {
        Value::String(s) => InsertedId(s.clone()),
        Value::Object(m) => match m.get("$oid").and_then(Value::as_str) {
            Some(hex) => InsertedId(hex.to_string()),
            None => InsertedId(value.to_string()),
        },
        other => InsertedId(other.to_string()),
    }
}

impl DocumentStore for InMemoryStore {
    fn insert_one(&self, record: StoredRecord) -> BoxFuture<'_, Result<InsertedId, StoreError>> {
        let out = self.insert_sync(record);
        Box::pin(async move { out })
    }

    fn find_first(&self, limit: u64) -> BoxFuture<'_, Result<Vec<StoredRecord>, StoreError>> {
        let out = self.find_sync(limit);
        Box::pin(async move { out })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> StoredRecord {
        let Value::Object(m) = json!({"text": text, "marks": 1}) else {
            unreachable!()
        };
        m
    }

    #[tokio::test]
    async fn assigns_sequential_object_ids() {
        let store = InMemoryStore::new();
        let a = store.insert_one(record("a")).await.unwrap();
        let b = store.insert_one(record("b")).await.unwrap();
        assert_eq!(a.0, "000000000000000000000001");
        assert_ne!(a, b);

        let all = store.find_first(10).await.unwrap();
        assert_eq!(all[0]["_id"], json!({"$oid": a.0}));
        assert_eq!(all[1]["text"], "b");
    }

    #[tokio::test]
    async fn keeps_caller_supplied_id() {
        let store = InMemoryStore::new();
        let mut r = record("a");
        r.insert("_id".into(), json!("custom"));
        assert_eq!(store.insert_one(r).await.unwrap().0, "custom");
    }

    #[tokio::test]
    async fn limit_caps_and_zero_is_empty() {
        let store = InMemoryStore::new();
        for i in 0..4 {
            store.insert_one(record(&i.to_string())).await.unwrap();
        }
        assert_eq!(store.find_first(2).await.unwrap().len(), 2);
        assert_eq!(store.find_first(100).await.unwrap().len(), 4);
        assert!(store.find_first(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failures_can_be_injected() {
        let store = InMemoryStore::new();
        store.set_fail_inserts(true);
        assert!(store.insert_one(record("a")).await.is_err());
        assert!(store.is_empty());

        store.set_fail_reads(true);
        assert!(store.find_first(1).await.is_err());
    }
}
