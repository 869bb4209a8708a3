use std::io::{self, BufRead, Write};

use futures::future;
use thiserror::Error;
use tracing::{info, warn};

use crate::modules::prune::model::{PruneCandidate, PruneOutcome};
use crate::services::store::{DocumentStore, StoreError, Target};

/// Exact token the operator must type to release a deletion.
pub const CONFIRM_TOKEN: &str = "YES";

/// How many candidate identifiers to print before eliding the rest.
const PREVIEW_LIMIT: usize = 50;

#[derive(Error, Debug)]
pub enum PruneError {
    #[error("unrecognized collection choice {0:?} (expected \"1\" or \"2\")")]
    InvalidChoice(String),
}

pub fn select_collection(choice: &str) -> Result<Target, PruneError> {
    Target::from_choice(choice).ok_or_else(|| PruneError::InvalidChoice(choice.to_string()))
}

/// Lists the collection once and keeps every identifier whose length is not
/// `valid_len`. The snapshot is not re-checked before deletion.
pub async fn list_candidates<S: DocumentStore>(
    store: &S,
    target: Target,
    valid_len: usize,
) -> Result<Vec<PruneCandidate>, StoreError> {
    let ids = store.list_ids(target).await?;
    info!(
        collection = target.collection_name(),
        total = ids.len(),
        "listed document references"
    );

    Ok(ids
        .into_iter()
        .filter(|id| id.len() != valid_len)
        .map(|id| PruneCandidate { id })
        .collect())
}

/// Shows the candidate set and blocks for one line of input. Returns true
/// only for the exact confirmation token; nothing is trimmed beyond the
/// line terminator, so "yes", "Yes" and "YES " all cancel.
pub fn confirm_deletion<R: BufRead, W: Write>(
    candidates: &[PruneCandidate],
    mut input: R,
    mut out: W,
) -> io::Result<bool> {
    writeln!(
        out,
        "\nIdentified {} document(s) with an invalid identifier to be DELETED:",
        candidates.len()
    )?;
    for candidate in candidates.iter().take(PREVIEW_LIMIT) {
        writeln!(out, " - {}", candidate.id)?;
    }
    if candidates.len() > PREVIEW_LIMIT {
        writeln!(out, "   (... and {} more)", candidates.len() - PREVIEW_LIMIT)?;
    }
    writeln!(out, "\nDeletion is permanent and removes each document together with everything nested under it.")?;
    write!(
        out,
        "Type exactly '{}' to confirm deletion of these {} document(s): ",
        CONFIRM_TOKEN,
        candidates.len()
    )?;
    out.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(strip_line_ending(&line) == CONFIRM_TOKEN)
}

fn strip_line_ending(line: &str) -> &str {
    match line.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => line,
    }
}

/// Issues one recursive delete per candidate, all concurrently, and waits
/// for every attempt to settle. One failure never aborts the siblings;
/// exactly one outcome comes back per candidate.
pub async fn prune_all<S: DocumentStore>(
    store: &S,
    target: Target,
    candidates: &[PruneCandidate],
) -> Vec<PruneOutcome> {
    let deletes = candidates.iter().map(|candidate| {
        let id = candidate.id.clone();
        async move {
            match store.recursive_delete(target, &id).await {
                Ok(()) => {
                    info!(id = %id, "recursively deleted document");
                    PruneOutcome { id, error: None }
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "failed to recursively delete document");
                    PruneOutcome {
                        id,
                        error: Some(e.to_string()),
                    }
                }
            }
        }
    });

    future::join_all(deletes).await
}
