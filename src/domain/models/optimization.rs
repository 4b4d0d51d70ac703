//! Pipeline artifacts: ranking outcome, optimized prompt and run result.

use serde::{Deserialize, Serialize};

use super::sample::{Sample, SampleSet};

/// Opening line of the ranking prompt.
pub const RANKING_PREAMBLE: &str = "Rank these responses from best (1) to worst based on quality:";

/// Opening line of the reverse-prompt request.
pub const SYNTHESIS_PREAMBLE: &str =
    "Generate the single best prompt that would get this quality response:";

/// Stages of a single optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Generating candidate responses
    Sampling,
    /// Asking the model to judge the candidates
    Ranking,
    /// Asking the model for the prompt behind the best candidate
    Synthesizing,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sampling => "sampling",
            Self::Ranking => "ranking",
            Self::Synthesizing => "synthesizing",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of judging a sample set.
///
/// `index` is 0-based and always within the judged set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub index: usize,
    pub fallback_used: bool,
}

impl Ranking {
    /// A choice taken from the judge's reply.
    pub fn extracted(index: usize) -> Self {
        Self { index, fallback_used: false }
    }

    /// The deterministic default: first sample.
    pub fn fallback() -> Self {
        Self { index: 0, fallback_used: true }
    }
}

/// Normalized prompt reverse-engineered from the best sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptimizedPrompt(String);

impl OptimizedPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// True when the prompt holds nothing but whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for OptimizedPrompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a finished pipeline run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub optimized_prompt: OptimizedPrompt,
    pub best_sample: Sample,
    /// 0-based index of `best_sample` within `samples`
    pub best_index: usize,
    pub fallback_used: bool,
    pub samples: SampleSet,
}
