use bson::{Bson, Document};
use serde::Serialize;
use thiserror::Error;

use crate::services::store::bson_id_string;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("trial document has no _id")]
    MissingDocumentId,
}

/// One trial document flattened for analysis, tagged with the participant
/// that owns it and with its own document ID.
#[derive(Debug, Serialize)]
pub struct TrialRecord {
    pub subject_id: String,
    pub trial_document_id: String,
    #[serde(flatten)]
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl TrialRecord {
    /// A `subject_id` already present on the document wins over the listed
    /// participant ID.
    pub fn from_document(participant_id: &str, mut document: Document) -> Result<Self, ExportError> {
        let trial_document_id = document
            .remove("_id")
            .map(|id| bson_id_string(&id))
            .ok_or(ExportError::MissingDocumentId)?;

        let subject_id = match document.remove("subject_id") {
            Some(Bson::String(s)) => s,
            Some(other) => {
                document.insert("subject_id", other);
                participant_id.to_string()
            }
            None => participant_id.to_string(),
        };

        let fields = match Bson::Document(document).into_relaxed_extjson() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(Self {
            subject_id,
            trial_document_id,
            fields,
        })
    }
}
