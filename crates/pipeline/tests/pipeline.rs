//! Integration tests for `TranslationPipeline`.
//!
//! Jobs run against `MemoryStore` and `MockTranslator`; progress is read
//! back through a real `ProgressChannel` subscription.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use futures::StreamExt;
use subline_core::progress::ProgressEvent;
use subline_core::srt::SubtitleEntry;
use subline_core::types::DbId;
use subline_events::ProgressChannel;
use subline_pipeline::{PipelineConfig, PipelineError, TranslationPipeline};
use subline_store::{
    CreateSubtitleSet, MemoryStore, StoreError, StoredSubtitle, SubtitleSet, SubtitleStore,
};
use subline_translate::{MockTranslator, TranslationError};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Wraps a `MemoryStore` and records, for every persisted translation, how
/// many provider calls had been made at that moment. Persists that share a
/// value belong to the same commit group.
struct RecordingStore {
    inner: MemoryStore,
    translator: Arc<MockTranslator>,
    commits: Mutex<Vec<usize>>,
}

impl RecordingStore {
    fn commit_groups(&self) -> usize {
        let mut seen = self.commits.lock().unwrap().clone();
        seen.dedup();
        seen.len()
    }
}

#[async_trait]
impl SubtitleStore for RecordingStore {
    async fn create_set(&self, input: CreateSubtitleSet) -> Result<SubtitleSet, StoreError> {
        self.inner.create_set(input).await
    }

    async fn find_set(&self, set_id: DbId) -> Result<Option<SubtitleSet>, StoreError> {
        self.inner.find_set(set_id).await
    }

    async fn list_entries(&self, set_id: DbId) -> Result<Vec<StoredSubtitle>, StoreError> {
        self.inner.list_entries(set_id).await
    }

    async fn set_translation(
        &self,
        entry_id: DbId,
        translated_text: &str,
    ) -> Result<(), StoreError> {
        self.commits.lock().unwrap().push(self.translator.calls());
        self.inner.set_translation(entry_id, translated_text).await
    }
}

fn entries(n: usize) -> Vec<SubtitleEntry> {
    (1..=n)
        .map(|i| {
            SubtitleEntry::new(
                i as i64,
                format!("00:00:{i:02},000 --> 00:00:{i:02},500"),
                format!("line {i}"),
            )
        })
        .collect()
}

struct Harness {
    store: Arc<RecordingStore>,
    translator: Arc<MockTranslator>,
    channel: Arc<ProgressChannel>,
    pipeline: TranslationPipeline,
}

fn harness(translator: MockTranslator, batch_size: usize) -> Harness {
    let translator = Arc::new(translator);
    let store = Arc::new(RecordingStore {
        inner: MemoryStore::new(),
        translator: Arc::clone(&translator),
        commits: Mutex::new(Vec::new()),
    });
    let channel = Arc::new(ProgressChannel::new());
    let pipeline = TranslationPipeline::new(
        store.clone(),
        translator.clone(),
        Arc::clone(&channel),
        PipelineConfig::new(batch_size),
    );
    Harness {
        store,
        translator,
        channel,
        pipeline,
    }
}

async fn create_set(store: &RecordingStore, n: usize) -> DbId {
    store
        .create_set(CreateSubtitleSet {
            original_filename: "episode.srt".to_string(),
            entries: entries(n),
        })
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Test: 25 entries -> 0, 10, 20, 25(completed)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn twenty_five_entries_report_progress_per_batch() {
    let h = harness(MockTranslator::new(), 10);
    let job_id = create_set(&h.store, 25).await;
    let progress = h.channel.subscribe(job_id).into_stream();

    let summary = h.pipeline.run(job_id, "es").await.unwrap();
    assert_eq!(summary.total, 25);
    assert_eq!(summary.batches, 3);

    let events: Vec<ProgressEvent> = progress.collect().await;
    let currents: Vec<_> = events.iter().map(|e| e.current).collect();
    assert_eq!(currents, vec![0, 10, 20, 25]);
    assert!(events.iter().all(|e| e.total == 25));
    assert_eq!(events.iter().filter(|e| e.completed).count(), 1);
    assert!(events.last().unwrap().completed);
}

// ---------------------------------------------------------------------------
// Test: the last batch is reported once, by the completed event
// ---------------------------------------------------------------------------

#[tokio::test]
async fn final_batch_is_reported_only_as_completed() {
    for (n, expected) in [(10, vec![0, 10]), (20, vec![0, 10, 20]), (7, vec![0, 7])] {
        let h = harness(MockTranslator::new(), 10);
        let job_id = create_set(&h.store, n).await;
        let progress = h.channel.subscribe(job_id).into_stream();

        h.pipeline.run(job_id, "es").await.unwrap();

        let events: Vec<ProgressEvent> = progress.collect().await;
        let currents: Vec<_> = events.iter().map(|e| e.current).collect();
        assert_eq!(currents, expected, "N = {n}");
        assert_eq!(events.last(), Some(&ProgressEvent::completed(job_id, n)));
        assert_eq!(events.iter().filter(|e| e.current == n).count(), 1, "N = {n}");
    }
}

// ---------------------------------------------------------------------------
// Test: every entry is translated and persisted
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_entries_are_persisted_with_translation() {
    let h = harness(MockTranslator::new(), 10);
    let job_id = create_set(&h.store, 12).await;

    h.pipeline.run(job_id, "de").await.unwrap();

    let stored = h.store.list_entries(job_id).await.unwrap();
    assert_eq!(stored.len(), 12);
    for entry in stored {
        let expected = MockTranslator::render(&entry.text, "de");
        assert_eq!(entry.translated_text.as_deref(), Some(expected.as_str()));
    }
    assert_eq!(h.translator.calls(), 12);
}

// ---------------------------------------------------------------------------
// Test: commit groups == ceil(N / batch_size)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn commit_groups_match_batch_count() {
    for (n, expected) in [(1, 1), (10, 1), (11, 2), (25, 3), (30, 3)] {
        let h = harness(MockTranslator::new(), 10);
        let job_id = create_set(&h.store, n).await;

        h.pipeline.run(job_id, "es").await.unwrap();

        assert_eq!(h.store.commit_groups(), expected, "N = {n}");
    }
}

// ---------------------------------------------------------------------------
// Test: in-flight provider calls never exceed the batch size
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concurrency_is_bounded_by_batch_size() {
    let h = harness(
        MockTranslator::new().with_delay(Duration::from_millis(5)),
        10,
    );
    let job_id = create_set(&h.store, 25).await;

    h.pipeline.run(job_id, "es").await.unwrap();

    assert_eq!(h.translator.max_in_flight(), 10);
}

// ---------------------------------------------------------------------------
// Test: custom batch size
// ---------------------------------------------------------------------------

#[tokio::test]
async fn custom_batch_size_changes_progress_steps() {
    let h = harness(MockTranslator::new(), 4);
    let job_id = create_set(&h.store, 10).await;
    let progress = h.channel.subscribe(job_id).into_stream();

    let summary = h.pipeline.run(job_id, "es").await.unwrap();
    assert_eq!(summary.batches, 3);

    let currents: Vec<_> = progress.map(|e| e.current).collect().await;
    assert_eq!(currents, vec![0, 4, 8, 10]);
}

// ---------------------------------------------------------------------------
// Test: failure keeps earlier batches, leaves the rest untranslated
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_keeps_earlier_batches_only() {
    let h = harness(MockTranslator::new().failing_on("line 15"), 10);
    let job_id = create_set(&h.store, 25).await;
    let progress = h.channel.subscribe(job_id).into_stream();

    let result = h.pipeline.run(job_id, "es").await;
    assert_matches!(
        result,
        Err(PipelineError::Translation {
            source: TranslationError::Failure(_),
            ..
        })
    );

    let stored = h.store.list_entries(job_id).await.unwrap();
    for entry in &stored[..10] {
        assert!(entry.translated_text.is_some(), "{} should be translated", entry.text);
    }
    for entry in &stored[10..] {
        assert!(entry.translated_text.is_none(), "{} should be untouched", entry.text);
    }

    let events: Vec<ProgressEvent> = progress.collect().await;
    let currents: Vec<_> = events.iter().map(|e| e.current).collect();
    assert_eq!(currents, vec![0, 10, 10]);

    let last = events.last().unwrap();
    assert!(!last.completed);
    assert!(last.error.as_deref().unwrap().contains("line 15"));
    assert!(events.iter().all(|e| !e.completed));
}

// ---------------------------------------------------------------------------
// Test: failure in the first batch persists nothing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failure_in_first_batch_persists_nothing() {
    let h = harness(MockTranslator::new().failing_on("line 1"), 10);
    let job_id = create_set(&h.store, 5).await;

    assert!(h.pipeline.run(job_id, "es").await.is_err());

    let stored = h.store.list_entries(job_id).await.unwrap();
    assert!(stored.iter().all(|e| e.translated_text.is_none()));
    assert_eq!(h.store.commit_groups(), 0);
}

// ---------------------------------------------------------------------------
// Test: empty set completes immediately
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_set_completes_without_batches() {
    let h = harness(MockTranslator::new(), 10);
    let job_id = create_set(&h.store, 0).await;
    let progress = h.channel.subscribe(job_id).into_stream();

    let summary = h.pipeline.run(job_id, "es").await.unwrap();
    assert_eq!(summary.batches, 0);

    let events: Vec<ProgressEvent> = progress.collect().await;
    assert_eq!(
        events,
        vec![ProgressEvent::started(job_id, 0), ProgressEvent::completed(job_id, 0)]
    );
    assert_eq!(h.translator.calls(), 0);
}

// ---------------------------------------------------------------------------
// Test: unknown set fails before publishing anything
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_set_publishes_nothing() {
    let h = harness(MockTranslator::new(), 10);
    let mut subscription = h.channel.subscribe(404);

    assert_matches!(
        h.pipeline.run(404, "es").await,
        Err(PipelineError::Store(StoreError::SetNotFound(404)))
    );

    h.channel.unsubscribe(subscription.id());
    assert!(subscription.recv().await.is_none());
}
