//! Progress notifications for translation jobs.
//!
//! A job publishes `{current: 0}` first, one event per finished batch, and
//! exactly one terminal event: `completed` on success, `error` on failure.
//! `current` never decreases within a job.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// A single progress notification, serialized as one SSE `data:` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// The subtitle set being translated.
    pub job_id: DbId,
    /// Entries processed so far.
    pub current: usize,
    /// Entries in the job.
    pub total: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub completed: bool,
    /// Set only on the terminal event of a failed job.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ProgressEvent {
    /// Intermediate event: `current` of `total` entries done.
    pub fn advanced(job_id: DbId, current: usize, total: usize) -> Self {
        Self {
            job_id,
            current,
            total,
            completed: false,
            error: None,
        }
    }

    /// The first event of a job.
    pub fn started(job_id: DbId, total: usize) -> Self {
        Self::advanced(job_id, 0, total)
    }

    pub fn completed(job_id: DbId, total: usize) -> Self {
        Self {
            completed: true,
            ..Self::advanced(job_id, total, total)
        }
    }

    pub fn failed(job_id: DbId, current: usize, total: usize, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::advanced(job_id, current, total)
        }
    }

    /// Whether no further events follow this one for the job.
    pub fn is_terminal(&self) -> bool {
        self.completed || self.error.is_some()
    }
}
