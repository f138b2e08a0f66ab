use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tokio::runtime::Handle;

use crate::error::SchedulerError;

/// Anything whose image source can be re-assigned, typically a mounted
/// `<img>` handle owned by the view layer.
pub trait ImageTarget: Send + Sync + 'static {
    fn set_source(&self, source: &str);
}

#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "base_delay_ms")]
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1_000),
        }
    }
}

impl RetryPolicy {
    /// Linear backoff: attempt `n` waits `base_delay * n`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    Scheduled { attempt: u32, delay: Duration },
    Exhausted,
}

#[derive(Debug, Default)]
struct RetryState {
    attempts: u32,
}

/// Re-assigns the same source to an image after load failures, with a
/// bounded number of linearly spaced attempts. Exhaustion is silent.
pub struct ImageRetryLoader<T: ImageTarget> {
    target: Weak<T>,
    source: Arc<str>,
    policy: RetryPolicy,
    runtime: Handle,
    state: Mutex<RetryState>,
}

impl<T: ImageTarget> ImageRetryLoader<T> {
    pub fn new(
        target: Weak<T>,
        source: impl Into<Arc<str>>,
        policy: RetryPolicy,
    ) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Ok(Self {
            target,
            source: source.into(),
            policy,
            runtime,
            state: Mutex::new(RetryState::default()),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn attempts(&self) -> u32 {
        self.state.lock().attempts
    }

    /// Called from the image's failure callback.
    pub fn on_error(&self) -> RetryOutcome {
        let mut state = self.state.lock();
        if state.attempts >= self.policy.max_attempts {
            tracing::debug!(
                source = %self.source,
                attempts = state.attempts,
                "image retries exhausted"
            );
            return RetryOutcome::Exhausted;
        }
        state.attempts += 1;
        let attempt = state.attempts;
        let delay = self.policy.delay_for(attempt);

        let target = Weak::clone(&self.target);
        let source = Arc::clone(&self.source);
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Resolved only now: the view may have unmounted the image meanwhile.
            let Some(target) = target.upgrade() else {
                tracing::debug!(%source, attempt, "image target gone, skipping retry");
                return;
            };
            tracing::debug!(%source, attempt, "retrying image load");
            target.set_source(&source);
        });
        tracing::debug!(source = %self.source, attempt, ?delay, "image retry scheduled");
        RetryOutcome::Scheduled { attempt, delay }
    }

    /// Called once the image loads; forgets earlier failures.
    pub fn on_load(&self) {
        self.state.lock().attempts = 0;
    }
}
