//! In-process [`SubtitleStore`] backed by hash maps behind a tokio `RwLock`.

use std::collections::HashMap;

use async_trait::async_trait;
use subline_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::{CreateSubtitleSet, StoredSubtitle, SubtitleSet};
use crate::{StoreError, SubtitleStore};

#[derive(Default)]
struct Tables {
    sets: HashMap<DbId, SubtitleSet>,
    entries: HashMap<DbId, StoredSubtitle>,
    /// Entry ids per set, already in display order.
    set_entries: HashMap<DbId, Vec<DbId>>,
    last_set_id: DbId,
    last_entry_id: DbId,
}

/// Subtitle store kept entirely in memory.
///
/// Designed to be wrapped in `Arc` and shared across the application.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubtitleStore for MemoryStore {
    async fn create_set(&self, input: CreateSubtitleSet) -> Result<SubtitleSet, StoreError> {
        let mut tables = self.tables.write().await;

        tables.last_set_id += 1;
        let set_id = tables.last_set_id;

        let mut ids = Vec::with_capacity(input.entries.len());
        for entry in input.entries {
            tables.last_entry_id += 1;
            let id = tables.last_entry_id;
            tables.entries.insert(
                id,
                StoredSubtitle {
                    id,
                    set_id,
                    index: entry.index,
                    timestamp: entry.timestamp,
                    text: entry.text,
                    translated_text: None,
                },
            );
            ids.push(id);
        }

        // Stable sort: equal indexes keep upload order, unreadable ones go last.
        let entries = &tables.entries;
        ids.sort_by_key(|id| {
            let index = entries[id].index;
            (index.is_none(), index)
        });

        let set = SubtitleSet {
            id: set_id,
            original_filename: input.original_filename,
            total_subtitles: ids.len(),
            created_at: chrono::Utc::now(),
        };
        tables.set_entries.insert(set_id, ids);
        tables.sets.insert(set_id, set.clone());

        tracing::debug!(set_id, total = set.total_subtitles, "Subtitle set created");
        Ok(set)
    }

    async fn find_set(&self, set_id: DbId) -> Result<Option<SubtitleSet>, StoreError> {
        Ok(self.tables.read().await.sets.get(&set_id).cloned())
    }

    async fn list_entries(&self, set_id: DbId) -> Result<Vec<StoredSubtitle>, StoreError> {
        let tables = self.tables.read().await;
        let ids = tables
            .set_entries
            .get(&set_id)
            .ok_or(StoreError::SetNotFound(set_id))?;

        Ok(ids.iter().map(|id| tables.entries[id].clone()).collect())
    }

    async fn set_translation(
        &self,
        entry_id: DbId,
        translated_text: &str,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .entries
            .get_mut(&entry_id)
            .ok_or(StoreError::EntryNotFound(entry_id))?;
        entry.translated_text = Some(translated_text.to_string());
        Ok(())
    }
}
