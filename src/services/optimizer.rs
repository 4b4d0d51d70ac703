//! Pipeline driver: sample, judge, reverse-prompt.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{OptimizationResult, OptimizerConfig, Stage};
use crate::domain::ports::{CompletionClient, NullProgress, ProgressObserver};
use crate::services::sampler::Sampler;
use crate::services::selector::Selector;
use crate::services::synthesizer::Synthesizer;

/// Runs the three optimizer stages in sequence against one completion client.
///
/// Nothing survives between runs; each `run` builds its samples from scratch.
pub struct PromptOptimizer {
    sampler: Sampler,
    selector: Selector,
    synthesizer: Synthesizer,
    progress: Arc<dyn ProgressObserver>,
}

impl PromptOptimizer {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self::with_config(client, &OptimizerConfig::default(), Arc::new(NullProgress))
    }

    pub fn with_config(
        client: Arc<dyn CompletionClient>,
        config: &OptimizerConfig,
        progress: Arc<dyn ProgressObserver>,
    ) -> Self {
        Self {
            sampler: Sampler::new(client.clone()).with_progress(progress.clone()),
            selector: Selector::new(client.clone())
                .with_progress(progress.clone())
                .with_preview_chars(config.preview_chars),
            synthesizer: Synthesizer::new(client)
                .with_max_chars(config.synthesis_chars)
                .with_reject_empty(config.reject_empty_prompt),
            progress,
        }
    }

    /// Optimize `input_prompt` using `sample_count` candidates from `model`.
    ///
    /// Any stage failure is returned unchanged and no partial result is kept.
    #[instrument(skip(self, input_prompt), fields(prompt_len = input_prompt.len()))]
    pub async fn run(
        &self,
        input_prompt: &str,
        sample_count: i64,
        model: &str,
    ) -> DomainResult<OptimizationResult> {
        self.progress.on_stage(Stage::Sampling);
        let samples = self.sampler.generate(input_prompt, sample_count, model).await?;

        self.progress.on_stage(Stage::Ranking);
        let ranking = self.selector.select_best(&samples, model).await?;
        let best_sample = samples
            .get_or_first(ranking.index)
            .cloned()
            .ok_or(DomainError::InvalidSampleCount(0))?;

        self.progress.on_stage(Stage::Synthesizing);
        let optimized_prompt = self.synthesizer.synthesize_prompt(&best_sample, model).await?;

        info!(
            best_index = ranking.index,
            fallback_used = ranking.fallback_used,
            sample_count = samples.len(),
            "prompt optimization complete"
        );

        Ok(OptimizationResult {
            optimized_prompt,
            best_sample,
            best_index: ranking.index,
            fallback_used: ranking.fallback_used,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::completion::{MockCompletionClient, PromptShape};
    use crate::domain::ports::CompletionError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StageRecorder {
        stages: Mutex<Vec<Stage>>,
    }

    impl ProgressObserver for StageRecorder {
        fn on_stage(&self, stage: Stage) {
            self.stages.lock().unwrap().push(stage);
        }
    }

    #[tokio::test]
    async fn test_run_sequences_all_stages() {
        let client = Arc::new(
            MockCompletionClient::by_shape("unused", "The best is 2", "\"Prompt: Write a haiku about rain\"")
                .with_script(vec![
                    Ok("Rain taps the window".to_string()),
                    Ok("Soft rain on cedar".to_string()),
                    Ok("Clouds weep".to_string()),
                ]),
        );
        let recorder = Arc::new(StageRecorder::default());
        let optimizer =
            PromptOptimizer::with_config(client.clone(), &OptimizerConfig::default(), recorder.clone());

        let result = optimizer.run("haiku about rain", 3, "llama3.1").await.unwrap();

        assert_eq!(result.best_index, 1);
        assert_eq!(result.best_sample.as_str(), "Soft rain on cedar");
        assert_eq!(result.optimized_prompt.as_str(), "Write a haiku about rain");
        assert!(!result.fallback_used);
        assert_eq!(result.samples.len(), 3);
        assert_eq!(
            *recorder.stages.lock().unwrap(),
            vec![Stage::Sampling, Stage::Ranking, Stage::Synthesizing]
        );

        let shapes: Vec<PromptShape> = client.calls().iter().map(|c| c.shape).collect();
        assert_eq!(
            shapes,
            vec![
                PromptShape::Sampling,
                PromptShape::Sampling,
                PromptShape::Sampling,
                PromptShape::Ranking,
                PromptShape::Synthesis,
            ]
        );
        let synthesis_prompt = &client.calls()[4].prompt;
        assert!(synthesis_prompt.contains("\"Soft rain on cedar\""));
    }

    #[tokio::test]
    async fn test_run_stops_at_failing_stage() {
        let client = Arc::new(
            MockCompletionClient::new().with_ranking_reply(Err(CompletionError::Backend {
                status: 500,
                message: "model crashed".to_string(),
            })),
        );
        let optimizer = PromptOptimizer::new(client.clone());

        let result = optimizer.run("prompt", 2, "m").await;

        assert!(matches!(
            result,
            Err(DomainError::Completion(CompletionError::Backend { status: 500, .. }))
        ));
        assert_eq!(client.count(PromptShape::Synthesis), 0);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_count_before_any_call() {
        let client = Arc::new(MockCompletionClient::new());
        let optimizer = PromptOptimizer::new(client.clone());

        let result = optimizer.run("prompt", 0, "m").await;

        assert!(matches!(result, Err(DomainError::InvalidSampleCount(0))));
        assert!(client.calls().is_empty());
    }
}
