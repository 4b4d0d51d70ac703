//! Completion client implementations.

pub mod mock;
pub mod ollama;
pub mod retry;

pub use mock::{MockCompletionClient, MockReply, PromptShape, RecordedCall};
pub use ollama::{OllamaClient, OllamaConfig};
pub use retry::RetryPolicy;
