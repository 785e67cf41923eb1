//! Run-scoped logging.
//!
//! All log output goes through `tracing`. A [`RunContext`] belongs to a
//! single training run: it owns the run's span, so every event emitted while
//! training carries the run name, and it keeps the progress-report cadence
//! and timers. Nothing here is process-wide except the subscriber installed
//! by [`init`].

use std::time::{Duration, Instant};

use tracing::{info, info_span, Span};
use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};
use crate::metrics::RunStatistics;

/// Install a `fmt` subscriber filtered by `RUST_LOG`, falling back to `default_filter`.
///
/// Fails if a global subscriber is already set.
pub fn init(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::config("logging".to_string(), e.to_string()))
}

/// Logging state of one training run.
#[derive(Debug)]
pub struct RunContext {
    span: Span,
    show_every: usize,
    run_start: Instant,
    window_start: Instant,
}

impl RunContext {
    pub fn new(run_name: &str, show_every: usize) -> Self {
        let now = Instant::now();
        RunContext {
            span: info_span!("training_run", run = %run_name),
            show_every: show_every.max(1),
            run_start: now,
            window_start: now,
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn show_every(&self) -> usize {
        self.show_every
    }

    pub fn elapsed(&self) -> Duration {
        self.run_start.elapsed()
    }

    /// Whether a progress report is due after `completed_episodes` episodes.
    pub fn report_due(&self, completed_episodes: usize) -> bool {
        completed_episodes > 0 && completed_episodes % self.show_every == 0
    }

    /// Log a summary of the last `show_every` episodes and restart the window timer.
    pub fn report_progress(&mut self, statistics: &RunStatistics, cycle: usize, episode: usize, epsilon: f32) {
        let rewards = statistics.recent_rewards(self.show_every);
        let _entered = self.span.enter();
        info!(
            cycle,
            episode,
            epsilon,
            window = self.show_every,
            mean_reward = rewards.mean,
            max_reward = rewards.max,
            wins = statistics.recent_wins(self.show_every),
            window_secs = self.window_start.elapsed().as_secs_f32(),
            "progress"
        );
        self.window_start = Instant::now();
    }
}
