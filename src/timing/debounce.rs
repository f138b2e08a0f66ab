use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::error::SchedulerError;

type BoxedFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
type BoxedAction<A> = Arc<dyn Fn(A) -> BoxedFuture + Send + Sync>;

/// Trailing-edge debounce over an action taking `A`.
///
/// Each [`call`](Self::call) restarts the delay window with the latest
/// arguments; the action runs once the window closes without another call.
/// Only the pending timer is ever cancelled. An action that has started runs
/// to completion, and executions never overlap: a window that closes while
/// the previous run is still in flight waits for it before starting.
pub struct Debouncer<A> {
    delay: Duration,
    runtime: Handle,
    action: BoxedAction<A>,
    state: Arc<Mutex<DebounceState>>,
    running: Arc<tokio::sync::Mutex<()>>,
}

#[derive(Debug, Default)]
struct DebounceState {
    generation: u64,
    pending: Option<PendingWindow>,
}

#[derive(Debug)]
struct PendingWindow {
    generation: u64,
    timer: JoinHandle<()>,
}

impl<A: Send + 'static> Debouncer<A> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Result<Self, SchedulerError>
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        let action: BoxedAction<A> =
            Arc::new(move |args| -> BoxedFuture { Box::pin(action(args)) });
        Ok(Self {
            delay,
            runtime,
            action,
            state: Arc::new(Mutex::new(DebounceState::default())),
            running: Arc::new(tokio::sync::Mutex::new(())),
        })
    }

    pub fn from_fn<F>(delay: Duration, action: F) -> Result<Self, SchedulerError>
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self::new(delay, move |args| {
            action(args);
            future::ready(())
        })
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn call(&self, args: A) {
        let mut state = self.state.lock();
        if let Some(previous) = state.pending.take() {
            previous.timer.abort();
            tracing::trace!(generation = previous.generation, "debounce window superseded");
        }
        state.generation += 1;
        let generation = state.generation;

        let delay = self.delay;
        let shared = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let action = Arc::clone(&self.action);
        // The state lock is held until the window is recorded, so the timer
        // cannot observe the slot before it is filled.
        let timer = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = shared.lock();
                let current = state.pending.as_ref().map(|window| window.generation);
                if current != Some(generation) {
                    return;
                }
                state.pending = None;
            }
            let _guard = running.lock().await;
            tracing::debug!(generation, "debounced action firing");
            action(args).await;
        });
        state.pending = Some(PendingWindow { generation, timer });
    }

    /// Drops the pending window, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        match self.state.lock().pending.take() {
            Some(window) => {
                window.timer.abort();
                tracing::debug!(generation = window.generation, "debounce window cancelled");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending.is_some()
    }
}

impl<A> fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Debouncer")
            .field("delay", &self.delay)
            .field("generation", &state.generation)
            .field("pending", &state.pending.is_some())
            .finish_non_exhaustive()
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(window) = self.state.lock().pending.take() {
            window.timer.abort();
        }
    }
}
