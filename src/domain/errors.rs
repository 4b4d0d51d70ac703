//! Domain errors for the prompt optimizer.

use thiserror::Error;

use crate::domain::ports::CompletionError;

/// Domain-level errors that can abort a pipeline run.
///
/// An unparseable judge reply is not an error; ranking falls back to the
/// first sample.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid sample count: {0}. Must be at least 1")]
    InvalidSampleCount(i64),

    #[error("Model returned an empty optimized prompt")]
    EmptyOptimizedPrompt,

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

pub type DomainResult<T> = Result<T, DomainError>;
