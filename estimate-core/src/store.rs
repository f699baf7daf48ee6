//! The estimation list: an ordered, optionally persisted collection of
//! accepted line items.
//!
//! A store is owned by exactly one caller; every mutation takes `&mut self`
//! and, when persistence is configured, awaits the snapshot write before
//! returning.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::db::{PersistenceAdapter, RepositoryError};
use crate::models::{ItemId, LineItem, NewLineItem};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("index {index} is out of bounds for a list of {len} item(s)")]
    IndexOutOfBounds { index: usize, len: usize },
}

struct Persistence {
    adapter: PersistenceAdapter,
    key: String,
}

pub struct EstimationStore {
    items: Vec<LineItem>,
    next_id: u64,
    persistence: Option<Persistence>,
    saved: bool,
}

impl EstimationStore {
    /// An empty store that never touches storage.
    pub fn ephemeral() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
            persistence: None,
            saved: true,
        }
    }

    /// Rehydrates the list stored under `key` and mirrors every later
    /// mutation back to it.
    ///
    /// # Errors
    ///
    /// Fails when the snapshot cannot be read. Nothing is written in that
    /// case, so the stored list survives for a later attempt.
    pub async fn open(
        adapter: PersistenceAdapter,
        key: impl Into<String>,
    ) -> Result<Self, RepositoryError> {
        let key = key.into();
        let items = adapter.load(&key).await?;
        // loaded ids never exceed MAX_ITEM_ID
        let next_id = items
            .iter()
            .map(|i| i.id().0)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        tracing::info!(key = %key, count = items.len(), "estimation list opened");

        Ok(Self {
            items,
            next_id,
            persistence: Some(Persistence { adapter, key }),
            saved: true,
        })
    }

    /// Snapshot key, if this store is persisted.
    pub fn key(&self) -> Option<&str> {
        self.persistence.as_ref().map(|p| p.key.as_str())
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(
        &self,
        index: usize,
    ) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Sum of every item's amount; zero for an empty list.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(LineItem::amount).sum()
    }

    pub async fn add(
        &mut self,
        item: NewLineItem,
    ) -> ItemId {
        let id = self.push(item);
        tracing::debug!(%id, len = self.items.len(), "item added");
        self.mirror().await;
        id
    }

    /// Appends every item in order with a single snapshot write.
    pub async fn add_all(
        &mut self,
        items: impl IntoIterator<Item = NewLineItem>,
    ) -> Vec<ItemId> {
        let ids: Vec<ItemId> = items.into_iter().map(|item| self.push(item)).collect();
        tracing::debug!(added = ids.len(), len = self.items.len(), "items added");
        if !ids.is_empty() {
            self.mirror().await;
        }
        ids
    }

    /// Removes and returns the item at `index`; later items shift left.
    pub async fn remove_at(
        &mut self,
        index: usize,
    ) -> Result<LineItem, StoreError> {
        if index >= self.items.len() {
            return Err(StoreError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        let removed = self.items.remove(index);
        tracing::debug!(id = %removed.id(), index, "item removed");
        self.mirror().await;
        Ok(removed)
    }

    /// Empties the list. An empty snapshot is written even when the list
    /// was already empty.
    pub async fn clear(&mut self) {
        self.items.clear();
        tracing::debug!("list cleared");
        self.mirror().await;
    }

    /// False when the latest mutation could not be written. Cleared by the
    /// next successful write.
    pub fn is_saved(&self) -> bool {
        self.saved
    }

    /// Writes the current list, surfacing any storage error.
    pub async fn persist(&self) -> Result<(), RepositoryError> {
        match &self.persistence {
            Some(p) => p.adapter.save(&p.key, &self.items).await,
            None => Ok(()),
        }
    }

    fn push(
        &mut self,
        item: NewLineItem,
    ) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.push(LineItem::from_new(id, item));
        id
    }

    async fn mirror(&mut self) {
        match self.persist().await {
            Ok(()) => self.saved = true,
            Err(e) => {
                tracing::error!(key = ?self.key(), error = %e, "failed to write snapshot");
                self.saved = false;
            }
        }
    }
}

impl Default for EstimationStore {
    fn default() -> Self {
        Self::ephemeral()
    }
}
