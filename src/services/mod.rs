//! Service layer: the three optimizer stages and the driver that chains them.

pub mod optimizer;
pub mod prompts;
pub mod sampler;
pub mod selector;
pub mod synthesizer;

pub use optimizer::PromptOptimizer;
pub use sampler::Sampler;
pub use selector::{extract_choice, Selector};
pub use synthesizer::{normalize_reply, Synthesizer};
