use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::repository::{RepositoryError, SnapshotRepository};
use crate::models::{LineItem, MAX_AMOUNT};

/// Envelope version written by [`PersistenceAdapter::save`].
pub const SNAPSHOT_VERSION: u32 = 1;

/// Highest item id a snapshot may carry. Ids above it would leave the
/// store no room to assign new ones.
pub const MAX_ITEM_ID: u64 = i64::MAX as u64;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    items: Vec<LineItem>,
}

/// Encodes estimation lists into versioned JSON snapshots and stores them
/// through a [`SnapshotRepository`].
///
/// A missing snapshot loads as an empty list. So does a stored payload that
/// cannot be decoded, with a warning in the log. A failed read is returned
/// to the caller, since the stored list may still be intact.
pub struct PersistenceAdapter {
    repository: Box<dyn SnapshotRepository>,
}

impl PersistenceAdapter {
    pub fn new(repository: Box<dyn SnapshotRepository>) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &dyn SnapshotRepository {
        self.repository.as_ref()
    }

    /// # Errors
    ///
    /// Returns the repository's error when the snapshot cannot be read.
    pub async fn load(
        &self,
        key: &str,
    ) -> Result<Vec<LineItem>, RepositoryError> {
        let Some(payload) = self.repository.read(key).await? else {
            tracing::debug!(key, "no snapshot stored");
            return Ok(Vec::new());
        };

        match decode(&payload) {
            Ok(items) => {
                tracing::debug!(key, count = items.len(), "snapshot loaded");
                Ok(items)
            }
            Err(reason) => {
                tracing::warn!(key, reason, "discarding unreadable snapshot");
                Ok(Vec::new())
            }
        }
    }

    /// Full overwrite of the snapshot under `key`.
    pub async fn save(
        &self,
        key: &str,
        items: &[LineItem],
    ) -> Result<(), RepositoryError> {
        let payload = encode(items)?;
        self.repository.write(key, &payload).await?;
        tracing::debug!(key, count = items.len(), "snapshot saved");
        Ok(())
    }
}

fn encode(items: &[LineItem]) -> Result<String, RepositoryError> {
    serde_json::to_string(&EnvelopeRef {
        version: SNAPSHOT_VERSION,
        items,
    })
    .map_err(|e| RepositoryError::Database(format!("failed to encode snapshot: {e}")))
}

fn decode(payload: &str) -> Result<Vec<LineItem>, String> {
    let envelope: Envelope =
        serde_json::from_str(payload).map_err(|e| format!("invalid snapshot JSON: {e}"))?;

    if envelope.version != SNAPSHOT_VERSION {
        return Err(format!("unsupported snapshot version {}", envelope.version));
    }

    let mut seen = HashSet::with_capacity(envelope.items.len());
    for item in &envelope.items {
        if item.amount().is_sign_negative() {
            return Err(format!("item {} has a negative amount", item.id()));
        }
        if item.amount() > MAX_AMOUNT {
            return Err(format!("item {} has an amount above {MAX_AMOUNT}", item.id()));
        }
        if item.id().0 > MAX_ITEM_ID {
            return Err(format!("item id {} is above {MAX_ITEM_ID}", item.id().0));
        }
        if !seen.insert(item.id()) {
            return Err(format!("item id {} appears more than once", item.id().0));
        }
    }
    Ok(envelope.items)
}
