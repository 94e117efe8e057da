//! Tracking of recent (provider, model) failures.
//!
//! The resolver only ever reads this signal through [`FailureOracle`]. Whoever executes
//! requests against the resolved clients is responsible for recording outcomes.

use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Answers whether a (provider, model) pair failed recently.
///
/// Answers may be stale. A stale "no recent failure" only makes the resolver prefer the
/// direct client over the gateway backup.
pub trait FailureOracle: Send + Sync {
    fn has_recent_failure(&self, provider: &str, model: &str) -> bool;
}

/// An oracle that never reports failures.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFailures;

impl FailureOracle for NoFailures {
    fn has_recent_failure(&self, _provider: &str, _model: &str) -> bool {
        false
    }
}

pub const DEFAULT_FAILURE_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Remembers the last failure of each (provider, model) pair for a fixed window.
#[derive(Debug)]
pub struct RecentFailureTracker {
    last_failure: DashMap<(String, String), Instant>,
    window: Duration,
}

impl RecentFailureTracker {
    pub fn new() -> RecentFailureTracker {
        RecentFailureTracker::with_window(DEFAULT_FAILURE_WINDOW)
    }

    pub fn with_window(window: Duration) -> RecentFailureTracker {
        RecentFailureTracker {
            last_failure: DashMap::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a failed request.
    pub fn record_failure(&self, provider: &str, model: &str) {
        self.last_failure
            .insert((provider.to_string(), model.to_string()), Instant::now());

        tracing::warn!(provider = provider, model = model, "recorded model failure");
    }

    /// Record a successful request, clearing any remembered failure.
    pub fn record_success(&self, provider: &str, model: &str) {
        if self
            .last_failure
            .remove(&(provider.to_string(), model.to_string()))
            .is_some()
        {
            tracing::debug!(provider = provider, model = model, "cleared model failure");
        }
    }

    /// Forget failures older than the window.
    pub fn prune(&self) {
        let window = self.window;

        self.last_failure.retain(|_, at| at.elapsed() < window);
    }
}

impl Default for RecentFailureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FailureOracle for RecentFailureTracker {
    fn has_recent_failure(&self, provider: &str, model: &str) -> bool {
        self.last_failure
            .get(&(provider.to_string(), model.to_string()))
            .map(|at| at.elapsed() < self.window)
            .unwrap_or(false)
    }
}
