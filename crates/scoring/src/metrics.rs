// Metrics hooks for the scoring crate.
//
// Callers install a global `ScoringMetrics` implementation via
// [`set_scoring_metrics`], then every successful call to
// `Scorer::most_guessable_match_sequence` reports its latency and sizes.
// This keeps instrumentation decoupled from any specific metrics backend.
use std::sync::{Arc, RwLock};
use std::time::Duration;

use once_cell::sync::OnceCell;

/// Metrics observer for sequence searches.
pub trait ScoringMetrics: Send + Sync {
    /// Record the outcome of one sequence search.
    ///
    /// `password_chars` is the password length in characters,
    /// `candidate_count` the number of producer matches handed in,
    /// `latency` the wall-clock duration of the search, and
    /// `sequence_len` the number of matches in the selected cover.
    fn record_score(
        &self,
        password_chars: usize,
        candidate_count: usize,
        latency: Duration,
        sequence_len: usize,
    );
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn ScoringMetrics>>> {
    static METRICS: OnceCell<RwLock<Option<Arc<dyn ScoringMetrics>>>> = OnceCell::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

pub(crate) fn metrics_recorder() -> Option<Arc<dyn ScoringMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global scoring metrics recorder.
///
/// Typically called once during startup so all `Scorer` instances share the
/// same metrics backend.
pub fn set_scoring_metrics(recorder: Option<Arc<dyn ScoringMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().expect("scoring metrics lock poisoned");
    *guard = recorder;
}
