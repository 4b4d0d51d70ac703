//! Mock completion client for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::domain::ports::{CompletionClient, CompletionError};
use crate::domain::models::{RANKING_PREAMBLE, SYNTHESIS_PREAMBLE};

/// Scripted reply: generated text or a simulated failure.
pub type MockReply = Result<String, CompletionError>;

/// Which of the optimizer's prompt kinds a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptShape {
    /// The user's input prompt, sent once per sample
    Sampling,
    /// The judge prompt listing every sample
    Ranking,
    /// The reverse-prompt request for the best sample
    Synthesis,
}

impl PromptShape {
    /// Classify a prompt by its fixed opening line.
    pub fn of(prompt: &str) -> Self {
        if prompt.starts_with(RANKING_PREAMBLE) {
            Self::Ranking
        } else if prompt.starts_with(SYNTHESIS_PREAMBLE) {
            Self::Synthesis
        } else {
            Self::Sampling
        }
    }
}

/// One request received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub prompt: String,
    pub model: String,
    pub shape: PromptShape,
}

/// Mock completion client.
///
/// Ranking and synthesis prompts get their configured reply when one is set.
/// Everything else consumes the script in order and then repeats the default.
pub struct MockCompletionClient {
    script: Mutex<VecDeque<MockReply>>,
    default_reply: MockReply,
    ranking_reply: Option<MockReply>,
    synthesis_reply: Option<MockReply>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::with_default_reply(Ok("Mock completion.".to_string()))
    }

    pub fn with_default_reply(reply: MockReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default_reply: reply,
            ranking_reply: None,
            synthesis_reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Canned replies for each of the three prompt shapes.
    pub fn by_shape(
        sample_reply: impl Into<String>,
        ranking_reply: impl Into<String>,
        synthesis_reply: impl Into<String>,
    ) -> Self {
        Self::with_default_reply(Ok(sample_reply.into()))
            .with_ranking_reply(Ok(ranking_reply.into()))
            .with_synthesis_reply(Ok(synthesis_reply.into()))
    }

    /// Queue replies served in order before falling back to the default.
    #[must_use]
    pub fn with_script<I>(self, replies: I) -> Self
    where
        I: IntoIterator<Item = MockReply>,
    {
        lock(&self.script).extend(replies);
        self
    }

    #[must_use]
    pub fn with_ranking_reply(mut self, reply: MockReply) -> Self {
        self.ranking_reply = Some(reply);
        self
    }

    #[must_use]
    pub fn with_synthesis_reply(mut self, reply: MockReply) -> Self {
        self.synthesis_reply = Some(reply);
        self
    }

    /// Every request received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of requests of the given shape received so far.
    pub fn count(&self, shape: PromptShape) -> usize {
        lock(&self.calls).iter().filter(|c| c.shape == shape).count()
    }

    fn next_reply(&self, shape: PromptShape) -> MockReply {
        let fixed = match shape {
            PromptShape::Ranking => self.ranking_reply.as_ref(),
            PromptShape::Synthesis => self.synthesis_reply.as_ref(),
            PromptShape::Sampling => None,
        };
        if let Some(reply) = fixed {
            return reply.clone();
        }

        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| self.default_reply.clone())
    }
}

impl Default for MockCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn client_id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError> {
        let shape = PromptShape::of(prompt);
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
            shape,
        });
        self.next_reply(shape)
    }
}
