//! Scripted provider client for tests and offline runs

use super::client::{GeneratedContent, GenerationOutput, GenerationRequest, ProviderClient};
use crate::error::VendorError;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

type Outcome = std::result::Result<GenerationOutput, VendorError>;

/// A client that replays queued outcomes, then a default one.
pub struct MockClient {
    queued: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockClient {
    /// Always succeed with the given text and token count
    #[must_use]
    pub fn text(content: impl Into<String>, tokens: u64) -> Self {
        Self::with_outcome(Ok(GenerationOutput {
            content: GeneratedContent::Text(content.into()),
            units: tokens,
        }))
    }

    /// Always succeed with the given image URLs
    #[must_use]
    pub fn images(urls: Vec<String>) -> Self {
        let units = urls.len() as u64;
        Self::with_outcome(Ok(GenerationOutput {
            content: GeneratedContent::Images(urls),
            units,
        }))
    }

    /// Always fail with `error`
    #[must_use]
    pub fn failing(error: VendorError) -> Self {
        Self::with_outcome(Err(error))
    }

    fn with_outcome(fallback: Outcome) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Sleep before answering
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue an outcome for the next call
    pub fn push(&self, outcome: Outcome) {
        self.queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(outcome);
    }

    /// Number of `generate` calls started so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ProviderClient for MockClient {
    async fn generate(&self, _request: &GenerationRequest) -> Outcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self
            .queued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        queued.unwrap_or_else(|| self.fallback.clone())
    }
}
