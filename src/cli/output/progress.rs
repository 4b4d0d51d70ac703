//! Progress bar utilities using indicatif for terminal output
//!
//! [`TerminalProgress`] turns pipeline notifications into a spinner per
//! stage and a counted bar while samples are generated. Everything is drawn
//! on stderr.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::domain::models::Stage;
use crate::domain::ports::ProgressObserver;

/// Style templates for different progress bar types
const PROGRESS_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";
const SPINNER_TEMPLATE: &str = "[{elapsed_precise}] {spinner:.green} {msg}";

/// Progress bar characters for visual effect
const PROGRESS_CHARS: &str = "█▓▒░ ";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Create a progress bar for an operation with a known total
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        pb.set_style(style.progress_chars(PROGRESS_CHARS));
    }
    pb
}

/// Create a spinner for indeterminate operations
pub fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template(SPINNER_TEMPLATE) {
        spinner.set_style(style.tick_chars(SPINNER_CHARS));
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Create a spinner with a custom message
pub fn create_spinner_with_message(message: impl Into<String>) -> ProgressBar {
    let spinner = create_spinner();
    spinner.set_message(message.into());
    spinner
}

/// Extension trait for ProgressBar to add common utility methods
pub trait ProgressBarExt {
    /// Finish with a success message (green checkmark)
    fn finish_success(&self, message: impl Into<String>);

    /// Finish with a warning message (yellow !)
    fn finish_warning(&self, message: impl Into<String>);
}

impl ProgressBarExt for ProgressBar {
    fn finish_success(&self, message: impl Into<String>) {
        self.finish_with_message(format!("✓ {}", message.into()));
    }

    fn finish_warning(&self, message: impl Into<String>) {
        self.finish_with_message(format!("! {}", message.into()));
    }
}

/// Progress observer that draws on the terminal.
pub struct TerminalProgress {
    current: Mutex<Option<ProgressBar>>,
    hidden: bool,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            current: Mutex::new(None),
            hidden: false,
        }
    }

    /// Observer that tracks state but draws nothing (for testing)
    pub fn hidden() -> Self {
        Self {
            current: Mutex::new(None),
            hidden: true,
        }
    }

    /// Finish whatever bar is still active.
    pub fn finish(&self) {
        if let Some(bar) = self.slot().take() {
            bar.finish_and_clear();
        }
    }

    /// Message of the active bar, if any.
    pub fn current_message(&self) -> Option<String> {
        self.slot().as_ref().map(|bar| bar.message())
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ProgressBar>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn prepare(&self, bar: ProgressBar) -> ProgressBar {
        if self.hidden {
            bar.disable_steady_tick();
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }
        bar
    }

    fn replace(&self, bar: ProgressBar) {
        let mut slot = self.slot();
        if let Some(previous) = slot.take() {
            if !previous.is_finished() {
                previous.finish_success(previous.message());
            }
        }
        *slot = Some(bar);
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for TerminalProgress {
    fn on_stage(&self, stage: Stage) {
        let message = match stage {
            Stage::Sampling => "Generating responses...",
            Stage::Ranking => "Ranking responses...",
            Stage::Synthesizing => "Generating optimized prompt...",
        };
        self.replace(self.prepare(create_spinner_with_message(message)));
    }

    fn on_sample_generated(&self, completed: usize, total: usize) {
        let mut slot = self.slot();
        let needs_bar = slot.as_ref().and_then(ProgressBar::length) != Some(total as u64);
        if needs_bar {
            if let Some(spinner) = slot.take() {
                spinner.finish_and_clear();
            }
            *slot = Some(self.prepare(create_progress_bar(total as u64)));
        }

        if let Some(bar) = slot.as_ref() {
            bar.set_position(completed as u64);
            bar.set_message(format!("{completed}. Generated"));
            if completed >= total {
                bar.finish_success(format!("Generated {total} responses"));
            }
        }
    }

    fn on_ranking_fallback(&self) {
        if let Some(bar) = self.slot().as_ref() {
            bar.finish_warning("Ranking unclear, using first response as fallback");
        }
    }
}
