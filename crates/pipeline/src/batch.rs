//! The translation job runner.
//!
//! 1. Load the set's entries in index order.
//! 2. Publish `{current: 0}`.
//! 3. For each batch: translate all entries concurrently, wait for the whole
//!    batch, persist each translation, publish the running count.
//! 4. Publish `{current: total, completed: true}`, which stands in for the
//!    last batch's count event.
//!
//! The first failure aborts the job. Batches persisted before it stay
//! translated; the failing batch and everything after it stay untouched.
//! A failed job ends with a terminal event carrying `error`.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::Serialize;
use subline_core::progress::ProgressEvent;
use subline_core::types::DbId;
use subline_events::ProgressChannel;
use subline_store::{SharedStore, StoreError, StoredSubtitle};
use subline_translate::{SharedTranslator, TranslationError};

/// Entries translated together before the next group starts.
pub const DEFAULT_BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    /// Upper bound on concurrent provider calls for one job. Always >= 1.
    pub batch_size: usize,
}

impl PipelineConfig {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

/// Outcome of a successful job.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: DbId,
    pub total: usize,
    pub batches: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Translation of subtitle entry {entry_id} failed: {source}")]
    Translation {
        entry_id: DbId,
        #[source]
        source: TranslationError,
    },
}

/// Runs translation jobs against a store, a translator and a progress channel.
///
/// Cheap to clone; all collaborators are behind `Arc`.
#[derive(Clone)]
pub struct TranslationPipeline {
    store: SharedStore,
    translator: SharedTranslator,
    channel: Arc<ProgressChannel>,
    config: PipelineConfig,
}

impl TranslationPipeline {
    pub fn new(
        store: SharedStore,
        translator: SharedTranslator,
        channel: Arc<ProgressChannel>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            store,
            translator,
            channel,
            config,
        }
    }

    /// Translate every entry of set `job_id` into `target_language`.
    ///
    /// Nothing is published when the set cannot be loaded.
    pub async fn run(
        &self,
        job_id: DbId,
        target_language: &str,
    ) -> Result<JobSummary, PipelineError> {
        let entries = self.store.list_entries(job_id).await?;
        let total = entries.len();

        tracing::info!(
            job_id,
            total,
            target_language,
            translator = self.translator.name(),
            batch_size = self.config.batch_size,
            "Translation job started"
        );
        self.channel.publish(ProgressEvent::started(job_id, total));

        let mut processed = 0;
        match self
            .process_batches(job_id, &entries, target_language, &mut processed)
            .await
        {
            Ok(batches) => {
                self.channel.publish(ProgressEvent::completed(job_id, total));
                tracing::info!(job_id, total, batches, "Translation job completed");
                Ok(JobSummary {
                    job_id,
                    total,
                    batches,
                })
            }
            Err(err) => {
                tracing::error!(
                    job_id,
                    processed,
                    total,
                    error = %err,
                    "Translation job aborted"
                );
                self.channel.publish(ProgressEvent::failed(
                    job_id,
                    processed,
                    total,
                    err.to_string(),
                ));
                Err(err)
            }
        }
    }

    /// Returns the number of batches committed. `processed` tracks the
    /// committed entry count so the caller can report it on failure.
    async fn process_batches(
        &self,
        job_id: DbId,
        entries: &[StoredSubtitle],
        target_language: &str,
        processed: &mut usize,
    ) -> Result<usize, PipelineError> {
        let total = entries.len();
        let mut batches = 0;

        for (batch_no, batch) in entries.chunks(self.config.batch_size).enumerate() {
            let translations = self.translate_batch(batch, target_language).await?;

            for (entry, translated) in batch.iter().zip(&translations) {
                self.store.set_translation(entry.id, translated).await?;
            }

            *processed += batch.len();
            batches += 1;

            tracing::debug!(
                job_id,
                batch = batch_no + 1,
                processed = *processed,
                total,
                "Batch committed"
            );
            // The last batch is reported by the completed event.
            if *processed < total {
                self.channel
                    .publish(ProgressEvent::advanced(job_id, *processed, total));
            }
        }

        Ok(batches)
    }

    /// Issue every call of the batch before awaiting any; the first error
    /// drops the remaining calls.
    async fn translate_batch(
        &self,
        batch: &[StoredSubtitle],
        target_language: &str,
    ) -> Result<Vec<String>, PipelineError> {
        try_join_all(batch.iter().map(|entry| async move {
            self.translator
                .translate(&entry.text, target_language)
                .await
                .map_err(|source| PipelineError::Translation {
                    entry_id: entry.id,
                    source,
                })
        }))
        .await
    }
}
