//! Multi-sample generation.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Sample, SampleSet};
use crate::domain::ports::{CompletionClient, NullProgress, ProgressObserver};

/// Issues N independent completion calls for the same prompt.
///
/// Calls run one at a time, in order. The first failure aborts the whole
/// batch and nothing collected so far is returned.
pub struct Sampler {
    client: Arc<dyn CompletionClient>,
    progress: Arc<dyn ProgressObserver>,
}

impl Sampler {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            progress: Arc::new(NullProgress),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    /// Generate `sample_count` samples for `input_prompt`.
    ///
    /// # Errors
    /// - `DomainError::InvalidSampleCount` when `sample_count < 1`, before any call
    /// - `DomainError::Completion` on the first failed completion call
    #[instrument(
        skip(self, input_prompt),
        fields(client = self.client.client_id(), prompt_len = input_prompt.len())
    )]
    pub async fn generate(
        &self,
        input_prompt: &str,
        sample_count: i64,
        model: &str,
    ) -> DomainResult<SampleSet> {
        let total = usize::try_from(sample_count)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or(DomainError::InvalidSampleCount(sample_count))?;

        let mut samples = Vec::with_capacity(total);
        for i in 0..total {
            let raw = self.client.complete(input_prompt, model).await?;
            let sample = Sample::from_completion(&raw);
            debug!(sample = i + 1, total, chars = sample.char_len(), "sample generated");
            samples.push(sample);
            self.progress.on_sample_generated(i + 1, total);
        }

        SampleSet::new(samples)
    }
}
