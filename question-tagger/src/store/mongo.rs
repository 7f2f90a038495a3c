//! Thin adapter around the `mongodb` driver to isolate API usage.

use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use mongodb::{Client, Collection, Database};
use serde_json::Value;
use tracing::{debug, info};

use crate::completion::BoxFuture;
use crate::config::StoreConfig;
use crate::errors::{StoreError, TaggerError};
use crate::record::{InsertedId, StoredRecord};
use crate::store::DocumentStore;

/// MongoDB-backed [`DocumentStore`].
///
/// The driver client is cheap to clone and pools connections internally;
/// one instance is built at startup and shared.
pub struct MongoStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Creates the client for `cfg.mongo_uri`. The driver connects lazily,
    /// so an unreachable server surfaces on the first operation.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self, TaggerError> {
        cfg.validate()?;

        let client = Client::with_uri_str(&cfg.mongo_uri)
            .await
            .map_err(StoreError::from)?;
        let database = client.database(&cfg.database);
        let collection = database.collection::<Document>(&cfg.collection);

        info!(
            database = %cfg.database,
            collection = %cfg.collection,
            "MongoStore initialized"
        );

        Ok(Self {
            database,
            collection,
        })
    }
}

impl DocumentStore for MongoStore {
    fn insert_one(&self, record: StoredRecord) -> BoxFuture<'_, Result<InsertedId, StoreError>> {
        Box::pin(async move {
            let document = bson::to_document(&record)?;
            let res = self.collection.insert_one(document).await?;
            let id = inserted_id(&res.inserted_id);
            debug!(%id, "inserted question record");
            Ok(id)
        })
    }

    fn find_first(&self, limit: u64) -> BoxFuture<'_, Result<Vec<StoredRecord>, StoreError>> {
        Box::pin(async move {
            // The driver treats a zero limit as "no limit".
            if limit == 0 {
                return Ok(Vec::new());
            }
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);

            let cursor = self.collection.find(doc! {}).limit(limit).await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            debug!(count = docs.len(), "read question records");

            docs.into_iter().map(document_to_record).collect()
        })
    }

    fn ping(&self) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            self.database.run_command(doc! { "ping": 1 }).await?;
            Ok(())
        })
    }
}

fn inserted_id(id: &Bson) -> InsertedId {
    match id {
        Bson::ObjectId(oid) => InsertedId(oid.to_hex()),
        Bson::String(s) => InsertedId(s.clone()),
        other => InsertedId(other.to_string()),
    }
}

/// Relaxed extended JSON keeps `_id` as `{"$oid": "..."}`.
fn document_to_record(document: Document) -> Result<StoredRecord, StoreError> {
    match Bson::Document(document).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Malformed(other.to_string())),
    }
}
