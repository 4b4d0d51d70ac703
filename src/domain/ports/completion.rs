//! Completion client port.
//!
//! The whole optimizer talks to a text model through a single capability:
//! `complete(prompt, model) -> text`. Backends (Ollama over HTTP, scripted
//! mocks in tests) implement [`CompletionClient`]; the core never inspects
//! error details beyond propagating them.

use async_trait::async_trait;

/// Error types for completion calls
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompletionError {
    /// The backend could not be reached or the call did not complete
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-success status
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// The backend answered, but not with a usable completion body
    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),
}

impl CompletionError {
    /// Returns true if the failure happened before the backend produced a reply
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns true if a client-side retry could plausibly succeed
    ///
    /// Transport failures, rate limiting and 5xx statuses are transient;
    /// everything else is permanent.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Backend { status, .. } => *status == 429 || (500..600).contains(status),
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Port trait for text-completion backends
///
/// Implementations own every transport concern: URL, timeouts, retry and
/// backoff. Callers issue one request at a time and await it.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single handle can be shared.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short identifier for this backend (e.g. "ollama", "mock")
    fn client_id(&self) -> &str;

    /// Run one completion call and return the generated text
    ///
    /// # Errors
    /// - `CompletionError::Transport` - backend unreachable, timed out, body unreadable
    /// - `CompletionError::Backend` - backend reported a non-success status
    /// - `CompletionError::InvalidResponse` - reply body had an unexpected shape
    async fn complete(&self, prompt: &str, model: &str) -> Result<String, CompletionError>;

    /// Check whether the backend is reachable
    ///
    /// Default implementation assumes the backend is always available.
    async fn health_check(&self) -> Result<bool, CompletionError> {
        Ok(true)
    }
}
