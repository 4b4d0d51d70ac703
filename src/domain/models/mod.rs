pub mod config;
pub mod optimization;
pub mod sample;

pub use config::{Config, LoggingConfig, ModelConfig, OptimizerConfig};
pub use optimization::{
    OptimizationResult, OptimizedPrompt, Ranking, Stage, RANKING_PREAMBLE, SYNTHESIS_PREAMBLE,
};
pub use sample::{Sample, SampleSet};
