//! Model-assisted ranking of samples.
//!
//! The judge answers in free text. [`extract_choice`] pulls a response
//! number out of that text; [`Selector`] falls back to the first sample when
//! nothing usable is found, so ranking never fails on a bad reply.

use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{Ranking, SampleSet};
use crate::domain::ports::{CompletionClient, NullProgress, ProgressObserver};
use crate::services::prompts::build_ranking_prompt;

/// Characters of each sample shown to the judge by default.
pub const DEFAULT_PREVIEW_CHARS: usize = 150;

/// Find the judge's choice in `reply` for a set of `sample_count` samples.
///
/// Scans every maximal run of ASCII digits that stands alone as a token (no
/// letter, digit or underscore directly before or after it) and returns the
/// first whose value lies in `1..=sample_count`, converted to a 0-based index.
pub fn extract_choice(reply: &str, sample_count: usize) -> Option<usize> {
    let bytes = reply.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        if !bytes[pos].is_ascii_digit() {
            pos += 1;
            continue;
        }

        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }

        let before = reply[..start].chars().next_back();
        let after = reply[pos..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            continue;
        }

        // Runs too long for usize cannot be in range anyway.
        if let Ok(value) = reply[start..pos].parse::<usize>() {
            if (1..=sample_count).contains(&value) {
                return Some(value - 1);
            }
        }
    }

    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Asks the model to judge a sample set and resolves its answer to an index.
pub struct Selector {
    client: Arc<dyn CompletionClient>,
    progress: Arc<dyn ProgressObserver>,
    preview_chars: usize,
}

impl Selector {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            progress: Arc::new(NullProgress),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressObserver>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn with_preview_chars(mut self, preview_chars: usize) -> Self {
        self.preview_chars = preview_chars;
        self
    }

    /// Pick the best sample with a single judge call.
    ///
    /// # Errors
    /// Only a failed completion call is an error. An unusable reply yields
    /// `Ranking::fallback()`.
    #[instrument(skip(self, samples), fields(sample_count = samples.len()))]
    pub async fn select_best(&self, samples: &SampleSet, model: &str) -> DomainResult<Ranking> {
        let prompt = build_ranking_prompt(samples, self.preview_chars);
        let reply = self.client.complete(&prompt, model).await?;

        match extract_choice(&reply, samples.len()) {
            Some(index) => {
                debug!(best = index + 1, "judge picked a response");
                Ok(Ranking::extracted(index))
            }
            None => {
                warn!(
                    reply_len = reply.len(),
                    sample_count = samples.len(),
                    "ranking reply had no valid response number, using first response"
                );
                self.progress.on_ranking_fallback();
                Ok(Ranking::fallback())
            }
        }
    }
}
