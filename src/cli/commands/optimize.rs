//! Implementation of the `reprompt` optimize run.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::sync::Arc;
use tracing::warn;

use crate::adapters::completion::{OllamaClient, OllamaConfig};
use crate::cli::output::{output, rule, CommandOutput, TerminalProgress};
use crate::cli::types::Cli;
use crate::domain::models::{Config, OptimizationResult};
use crate::domain::ports::{CompletionClient, NullProgress, ProgressObserver};
use crate::infrastructure::config::ConfigLoader;
use crate::services::PromptOptimizer;

/// Settings for one run after CLI flags are layered over the loaded config.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub input_prompt: String,
    pub model: String,
    pub sample_count: i64,
    pub config: Config,
}

impl RunSettings {
    pub fn resolve(cli: &Cli, mut config: Config) -> Self {
        if let Some(base_url) = &cli.base_url {
            config.model.base_url.clone_from(base_url);
        }
        Self {
            input_prompt: cli.input.clone(),
            model: cli
                .model
                .clone()
                .unwrap_or_else(|| config.model.default_model.clone()),
            sample_count: cli.count.unwrap_or(config.optimizer.sample_count),
            config,
        }
    }
}

/// Load configuration from `--config` when given, otherwise from `.reprompt/`.
pub fn load_config(cli: &Cli) -> Result<Config> {
    match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

#[derive(Debug, Serialize)]
pub struct OptimizeOutput {
    pub input_prompt: String,
    pub model: String,
    pub sample_count: usize,
    pub best_index: usize,
    pub best_sample: String,
    pub optimized_prompt: String,
    pub fallback_used: bool,
}

impl OptimizeOutput {
    pub fn new(settings: &RunSettings, result: OptimizationResult) -> Self {
        Self {
            input_prompt: settings.input_prompt.clone(),
            model: settings.model.clone(),
            sample_count: result.samples.len(),
            best_index: result.best_index,
            best_sample: result.best_sample.into_inner(),
            optimized_prompt: result.optimized_prompt.into_inner(),
            fallback_used: result.fallback_used,
        }
    }
}

impl CommandOutput for OptimizeOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Prompt optimization for: '{}'", self.input_prompt),
            format!("Model: {}", self.model),
            format!("Compared {} responses", self.sample_count),
            rule(50),
        ];

        if self.fallback_used {
            lines.push(format!(
                "{} ranking reply had no usable number, using the first response",
                style("Warning:").yellow().bold()
            ));
        }

        lines.push(format!(
            "\n{}",
            style(format!("Best Response (#{}):", self.best_index + 1)).bold()
        ));
        lines.push(rule(40));
        lines.push(self.best_sample.clone());

        lines.push(format!("\n{}", style("Optimized Prompt:").bold().green()));
        lines.push(rule(40));
        lines.push(format!("\"{}\"", self.optimized_prompt));

        lines.push(format!(
            "\nOptimization complete! From '{}' to professional prompt!",
            self.input_prompt
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(cli: &Cli, config: Config) -> Result<()> {
    let settings = RunSettings::resolve(cli, config);
    let client = OllamaClient::new(OllamaConfig::from(&settings.config.model))
        .context("Failed to build model client")?;

    match client.health_check().await {
        Ok(true) => {}
        Ok(false) => warn!(
            client = client.client_id(),
            base_url = client.base_url(),
            "backend answered health check with an error status"
        ),
        Err(err) => warn!(
            client = client.client_id(),
            base_url = client.base_url(),
            error = %err,
            "backend health check failed"
        ),
    }

    let terminal = (!cli.quiet && !cli.json).then(|| Arc::new(TerminalProgress::new()));
    let progress: Arc<dyn ProgressObserver> = match &terminal {
        Some(bar) => bar.clone() as Arc<dyn ProgressObserver>,
        None => Arc::new(NullProgress),
    };

    let optimizer =
        PromptOptimizer::with_config(Arc::new(client), &settings.config.optimizer, progress);
    let result = optimizer
        .run(&settings.input_prompt, settings.sample_count, &settings.model)
        .await;

    if let Some(bar) = &terminal {
        bar.finish();
    }
    let result = result.context("Prompt optimization failed")?;

    output(&OptimizeOutput::new(&settings, result), cli.json);
    Ok(())
}
