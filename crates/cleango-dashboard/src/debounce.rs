//! Trailing-edge debouncing on the tokio timer.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Collapses bursts of triggers into one delayed action.
///
/// At most one action is pending; each trigger replaces it and restarts the
/// delay. Dropping the debouncer cancels whatever is pending.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with nothing pending.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Run `action` once `delay` passes without another trigger.
    ///
    /// Must be called from within a tokio runtime.
    pub fn trigger<F>(&mut self, action: F, delay: Duration)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action();
        }));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether an action is still waiting to run.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
