//! Reverse-prompt synthesis.
//!
//! Shows the model its best response and asks for the prompt that would have
//! produced it directly, then cleans the reply up.

use std::sync::Arc;
use tracing::{debug, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{OptimizedPrompt, Sample};
use crate::domain::ports::CompletionClient;
use crate::services::prompts::build_synthesis_prompt;

/// Characters of the best sample embedded in the request by default.
pub const DEFAULT_SYNTHESIS_CHARS: usize = 400;

/// Labels models like to put in front of the prompt. Matched case-insensitively.
const LABELS: [&str; 3] = ["best prompt:", "optimized prompt:", "prompt:"];

const QUOTES: &[char] = &['"', '\''];

/// Clean up a raw synthesis reply.
///
/// Trims whitespace, removes at most one quote character (`"` or `'`) from
/// each end, then removes at most one leading label. The result is trimmed
/// again so whitespace inside the quotes never survives.
pub fn normalize_reply(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(QUOTES) {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix(QUOTES) {
        text = rest;
    }

    for label in LABELS {
        if let Some(head) = text.get(..label.len()) {
            if head.eq_ignore_ascii_case(label) {
                text = &text[label.len()..];
                break;
            }
        }
    }

    text.trim().to_string()
}

/// Produces the optimized prompt for a chosen sample.
pub struct Synthesizer {
    client: Arc<dyn CompletionClient>,
    max_chars: usize,
    reject_empty: bool,
}

impl Synthesizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            client,
            max_chars: DEFAULT_SYNTHESIS_CHARS,
            reject_empty: true,
        }
    }

    #[must_use]
    pub const fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Allow or refuse a reply that normalizes to nothing.
    #[must_use]
    pub const fn with_reject_empty(mut self, reject_empty: bool) -> Self {
        self.reject_empty = reject_empty;
        self
    }

    /// Ask the model for the prompt behind `best_sample`.
    ///
    /// # Errors
    /// - `DomainError::Completion` when the call fails
    /// - `DomainError::EmptyOptimizedPrompt` when the normalized reply is blank
    ///   and empty prompts are rejected
    #[instrument(skip(self, best_sample), fields(sample_chars = best_sample.char_len()))]
    pub async fn synthesize_prompt(
        &self,
        best_sample: &Sample,
        model: &str,
    ) -> DomainResult<OptimizedPrompt> {
        let request = build_synthesis_prompt(best_sample.as_str(), self.max_chars);
        let raw = self.client.complete(&request, model).await?;

        let prompt = OptimizedPrompt::new(normalize_reply(&raw));
        if self.reject_empty && prompt.is_blank() {
            return Err(DomainError::EmptyOptimizedPrompt);
        }

        debug!(raw_len = raw.len(), prompt_len = prompt.as_str().len(), "prompt synthesized");
        Ok(prompt)
    }
}
