//! Search configuration for wikipath

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{Error, Result};
use crate::core::observer::ProgressObserver;

/// Minimum number of workers per search direction
pub const MIN_THREADS_PER_DIRECTION: usize = 1;

/// Default number of short waits the master performs on an empty queue
pub const DEFAULT_DEQUEUE_TRIALS: u32 = 100;

/// Default length of one of those waits
pub const DEFAULT_TRIAL_WAIT_TIME: Duration = Duration::from_millis(10);

/// Shared progress observer handle
pub type ObserverHandle = Arc<dyn ProgressObserver>;

/// Options for search operations
#[derive(Clone)]
pub struct SearchOptions {
    /// Workers per direction; values below 1 are raised to 1
    pub threads_per_direction: usize,

    /// Number of waits the master performs before declaring its direction
    /// exhausted; zero still waits once
    pub dequeue_trials: u32,

    /// Length of each of those waits; also bounds how long an idle slave sleeps
    pub trial_wait_time: Duration,

    /// Optional progress observer
    pub observer: Option<ObserverHandle>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threads_per_direction: MIN_THREADS_PER_DIRECTION,
            dequeue_trials: DEFAULT_DEQUEUE_TRIALS,
            trial_wait_time: DEFAULT_TRIAL_WAIT_TIME,
            observer: None,
        }
    }
}

impl fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchOptions")
            .field("threads_per_direction", &self.threads_per_direction)
            .field("dequeue_trials", &self.dequeue_trials)
            .field("trial_wait_time", &self.trial_wait_time)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl SearchOptions {
    pub fn with_threads(mut self, threads_per_direction: usize) -> Self {
        self.threads_per_direction = threads_per_direction;
        self
    }

    pub fn with_pacing(mut self, dequeue_trials: u32, trial_wait_time: Duration) -> Self {
        self.dequeue_trials = dequeue_trials;
        self.trial_wait_time = trial_wait_time;
        self
    }

    pub fn with_observer(mut self, observer: ObserverHandle) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Worker count actually used per direction
    pub fn effective_threads(&self) -> usize {
        self.threads_per_direction.max(MIN_THREADS_PER_DIRECTION)
    }

    /// Reject pacing values that would make idle workers spin
    pub fn validate(&self) -> Result<()> {
        if self.trial_wait_time.is_zero() {
            return Err(Error::InvalidInput(
                "trial wait time must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
