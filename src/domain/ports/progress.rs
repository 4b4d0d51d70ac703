//! Progress reporting port.

use crate::domain::models::Stage;

/// Observer notified as a pipeline run advances.
///
/// All methods default to no-ops so observers only implement what they show.
pub trait ProgressObserver: Send + Sync {
    /// A pipeline stage is about to start.
    fn on_stage(&self, _stage: Stage) {}

    /// One more sample has been generated (`completed` of `total`).
    fn on_sample_generated(&self, _completed: usize, _total: usize) {}

    /// The judge reply could not be parsed and the first sample was chosen.
    fn on_ranking_fallback(&self) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressObserver for NullProgress {}
