//! Reprompt - prompt optimizer
//!
//! Reprompt asks a local model for several answers to a prompt, has the same
//! model judge which answer is best, and then asks it to reverse-engineer the
//! prompt that would produce that answer.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors, and port traits
//! - **Service Layer** (`services`): sampler, selector, synthesizer, and the pipeline driver
//! - **Adapters** (`adapters`): completion clients (Ollama over HTTP, scripted mock)
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use reprompt::adapters::completion::{OllamaClient, OllamaConfig};
//! use reprompt::services::PromptOptimizer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OllamaClient::new(OllamaConfig::default())?;
//!     let optimizer = PromptOptimizer::new(Arc::new(client));
//!     let result = optimizer.run("Describe a sunset", 5, "llama3.1").await?;
//!     println!("{}", result.optimized_prompt);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::completion::{MockCompletionClient, OllamaClient, OllamaConfig};
pub use domain::models::{
    Config, LoggingConfig, ModelConfig, OptimizationResult, OptimizedPrompt, OptimizerConfig,
    Ranking, Sample, SampleSet, Stage,
};
pub use domain::ports::{CompletionClient, CompletionError, NullProgress, ProgressObserver};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{extract_choice, normalize_reply, PromptOptimizer};
