use std::{future::Future, time::Duration};
use tokio::{task::JoinHandle, time::sleep};
use tracing::{Instrument, debug, debug_span};

/// Delay between the last keystroke and the search it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Trailing-edge debouncer.
///
/// Scheduling replaces any pending timer. Once a timer fires, its work runs
/// as its own task, so a later `schedule` or `cancel` never aborts a request
/// already in flight. Stale responses are filtered by the caller.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&mut self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(
            async move {
                sleep(delay).await;
                debug!("Debounce elapsed");
                tokio::spawn(work.in_current_span());
            }
            .instrument(debug_span!("debounce", delay_ms = delay.as_millis() as u64)),
        ));
    }

    /// Drop the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a timer is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
