//! Offline translator.
//!
//! Prefixes the text with the target language (`"Hello"` -> `"[es] Hello"`).
//! Can be told to fail on a given input and to wait before answering, and
//! records how many calls were in flight at once.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::{TranslationError, Translator};

#[derive(Debug, Default)]
pub struct MockTranslator {
    fail_on: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with [`TranslationError::Failure`] whenever `text` is requested.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    /// Sleep for `delay` inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Total number of calls made.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Expected output for `text`.
    pub fn render(text: &str, target_language: &str) -> String {
        format!("[{target_language}] {text}")
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.as_deref() == Some(text) {
            return Err(TranslationError::Failure(format!(
                "mock provider rejected '{text}'"
            )));
        }
        Ok(Self::render(text, target_language))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
