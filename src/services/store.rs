use bson::{doc, Bson, Document};
use futures::TryStreamExt;
use mongodb::Database;
use thiserror::Error;
use tracing::debug;

const TRIALS_COLLECTION: &str = "trials";
const TRIALS_SUBJECT_FIELD: &str = "subject_id";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Backend(#[from] mongodb::error::Error),
    #[error("{0}")]
    Other(String),
}

/// The two participant collections this tooling is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Active,
    Finished,
}

impl Target {
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(Target::Active),
            "2" => Some(Target::Finished),
            _ => None,
        }
    }

    pub fn collection_name(&self) -> &'static str {
        match self {
            Target::Active => "participants",
            Target::Finished => "participants_finished",
        }
    }
}

/// Backing-store capabilities the admin tools need. Kept as a seam so the
/// control flow can run against an in-memory store in tests.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Identifiers of every document in the collection, in listing order.
    /// An empty collection yields an empty vec, not an error.
    async fn list_ids(&self, target: Target) -> Result<Vec<String>, StoreError>;

    /// Deletes one participant document together with everything nested
    /// under it (its trial documents).
    async fn recursive_delete(&self, target: Target, id: &str) -> Result<(), StoreError>;

    /// Full trial documents recorded for one participant.
    async fn trials_for(&self, subject_id: &str) -> Result<Vec<Document>, StoreError>;
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl DocumentStore for MongoStore {
    async fn list_ids(&self, target: Target) -> Result<Vec<String>, StoreError> {
        let mut cursor = self
            .db
            .collection::<Document>(target.collection_name())
            .find(doc! {})
            .projection(doc! { "_id": 1 })
            .await?;

        let mut ids = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            match document.get("_id") {
                Some(id) => ids.push(bson_id_string(id)),
                None => continue,
            }
        }
        Ok(ids)
    }

    async fn recursive_delete(&self, target: Target, id: &str) -> Result<(), StoreError> {
        // Nested trial documents first, then the participant itself.
        let removed = self
            .db
            .collection::<Document>(TRIALS_COLLECTION)
            .delete_many(doc! { TRIALS_SUBJECT_FIELD: id })
            .await?;
        debug!(subject = id, trials = removed.deleted_count, "removed nested trial documents");

        self.db
            .collection::<Document>(target.collection_name())
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(())
    }

    async fn trials_for(&self, subject_id: &str) -> Result<Vec<Document>, StoreError> {
        let cursor = self
            .db
            .collection::<Document>(TRIALS_COLLECTION)
            .find(doc! { TRIALS_SUBJECT_FIELD: subject_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }
}

pub fn bson_id_string(id: &Bson) -> String {
    match id {
        Bson::String(s) => s.clone(),
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}
