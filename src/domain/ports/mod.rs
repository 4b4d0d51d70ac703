//! Port trait definitions (Hexagonal Architecture)
//!
//! - CompletionClient: text-completion backend
//! - ProgressObserver: progress notifications for long-running runs
//!
//! These traits keep the optimizer core independent of any particular
//! backend or terminal.

pub mod completion;
pub mod progress;

pub use completion::{CompletionClient, CompletionError};
pub use progress::{NullProgress, ProgressObserver};
