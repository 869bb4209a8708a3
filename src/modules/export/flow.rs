use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;
use tracing::{debug, info, warn};

use crate::modules::export::model::TrialRecord;
use crate::services::store::{DocumentStore, StoreError, Target};

/// Walks every participant in the collection and gathers their trial
/// documents. A malformed trial is logged and skipped, never fatal.
pub async fn collect_trials<S: DocumentStore>(
    store: &S,
    target: Target,
) -> Result<Vec<TrialRecord>, StoreError> {
    let participant_ids = store.list_ids(target).await?;
    info!(
        collection = target.collection_name(),
        participants = participant_ids.len(),
        "listed participant documents"
    );

    let mut records = Vec::new();
    for participant_id in &participant_ids {
        let trials = store.trials_for(participant_id).await?;
        if trials.is_empty() {
            debug!(subject = %participant_id, "participant has no trial documents");
            continue;
        }

        for document in trials {
            match TrialRecord::from_document(participant_id, document) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(subject = %participant_id, error = %e, "skipping malformed trial document")
                }
            }
        }
    }
    Ok(records)
}

/// Writes the records as pretty-printed JSON under `out_dir`, with the
/// collection name and a timestamp in the file name. Returns the path of
/// the written file.
pub fn write_json(
    records: &[TrialRecord],
    target: Target,
    out_dir: &Path,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let file_name = format!("{}_trials_export_{}.json", target.collection_name(), timestamp);
    let path = out_dir.join(file_name);

    let json = serde_json::to_string_pretty(records).context("Failed to serialize trial records")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write export file {}", path.display()))?;

    Ok(path)
}
