//! Batch translation pipeline.
//!
//! Drives the store, the translator and the progress channel for one job:
//! entries are translated in fixed-size batches, each batch fanned out
//! concurrently and joined before the next one starts.

pub mod batch;

pub use batch::{JobSummary, PipelineConfig, PipelineError, TranslationPipeline, DEFAULT_BATCH_SIZE};
