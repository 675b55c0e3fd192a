//! Storage for uploaded subtitle sets and their translations.
//!
//! The pipeline and the HTTP handlers only see the [`SubtitleStore`] trait.
//! [`MemoryStore`] is the in-process implementation; it lives as long as the
//! server process.

pub mod memory;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use subline_core::types::DbId;

pub use memory::MemoryStore;
pub use models::{CreateSubtitleSet, StoredSubtitle, SubtitleSet};

/// Shared handle to a store, as held in application state.
pub type SharedStore = Arc<dyn SubtitleStore>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Subtitle set {0} not found")]
    SetNotFound(DbId),

    #[error("Subtitle entry {0} not found")]
    EntryNotFound(DbId),
}

/// Persistence operations required by the translation flow.
///
/// Every call is atomic on its own; callers never need a transaction that
/// spans several calls.
#[async_trait]
pub trait SubtitleStore: Send + Sync {
    /// Create a set together with all of its entries.
    async fn create_set(&self, input: CreateSubtitleSet) -> Result<SubtitleSet, StoreError>;

    async fn find_set(&self, set_id: DbId) -> Result<Option<SubtitleSet>, StoreError>;

    /// All entries of a set ordered by index. Entries without a readable
    /// index come last; ties keep upload order.
    async fn list_entries(&self, set_id: DbId) -> Result<Vec<StoredSubtitle>, StoreError>;

    /// Record the translation of a single entry.
    async fn set_translation(&self, entry_id: DbId, translated_text: &str)
        -> Result<(), StoreError>;
}
