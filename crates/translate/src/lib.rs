//! Machine-translation gateway.
//!
//! [`Translator`] sends one string to a provider and returns the translated
//! string. The source language is always auto-detected by the provider.
//! Implementations make a single round trip and never retry.
//!
//! - [`AwsTranslator`] -- Amazon Translate.
//! - [`MockTranslator`] -- deterministic offline translator for local runs
//!   and tests.

pub mod aws;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

pub use aws::AwsTranslator;
pub use mock::MockTranslator;

/// Source language code that asks the provider to detect the language.
pub const AUTO_DETECT: &str = "auto";

/// A failed provider call. Both variants are fatal to the current job.
#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    /// The provider answered with an error or an unusable response.
    #[error("Translation failed: {0}")]
    Failure(String),

    /// The provider could not be reached.
    #[error("Translation provider unavailable: {0}")]
    Unavailable(String),
}

/// Shared handle to a translator, as held in application state.
pub type SharedTranslator = Arc<dyn Translator>;

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target_language`.
    async fn translate(&self, text: &str, target_language: &str)
        -> Result<String, TranslationError>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
