//! Stored subtitle sets and entries.

use serde::Serialize;
use subline_core::srt::SubtitleEntry;
use subline_core::types::{DbId, Timestamp};

/// One uploaded subtitle file.
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleSet {
    pub id: DbId,
    /// Cosmetic only; never fed back into the codec.
    pub original_filename: String,
    pub total_subtitles: usize,
    pub created_at: Timestamp,
}

/// A persisted subtitle entry.
#[derive(Debug, Clone, Serialize)]
pub struct StoredSubtitle {
    pub id: DbId,
    pub set_id: DbId,
    pub index: Option<i64>,
    pub timestamp: String,
    pub text: String,
    pub translated_text: Option<String>,
}

impl StoredSubtitle {
    /// The entry as it should appear in a download: the translation when
    /// one has been stored, the original text otherwise.
    pub fn to_output_entry(&self) -> SubtitleEntry {
        SubtitleEntry {
            index: self.index,
            timestamp: self.timestamp.clone(),
            text: self
                .translated_text
                .clone()
                .unwrap_or_else(|| self.text.clone()),
        }
    }
}

/// Input for [`SubtitleStore::create_set`](crate::SubtitleStore::create_set).
#[derive(Debug, Clone)]
pub struct CreateSubtitleSet {
    pub original_filename: String,
    pub entries: Vec<SubtitleEntry>,
}
