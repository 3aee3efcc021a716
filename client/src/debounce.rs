//! Delay-and-collapse wrapper around an action.
//!
//! Each call cancels the previously scheduled invocation and schedules a new
//! one after the delay, carrying the most recent call's value. If no further
//! call arrives before the delay elapses, the action fires exactly once with
//! the last-supplied value. At most one timer is live per debouncer.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;

pub struct Debouncer<T> {
    delay: Duration,
    action: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: Mutex::new(None),
        }
    }

    /// Schedules the action with `value`, cancelling any pending invocation.
    pub fn call(&self, value: T) {
        let action = Arc::clone(&self.action);
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            sleep(delay).await;
            action(value);
        });

        let mut pending = self.pending.lock().unwrap();
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Discards the pending invocation, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.lock().unwrap().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    fn recording_debouncer(delay_ms: u64) -> (Debouncer<u32>, Arc<Mutex<Vec<u32>>>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |value: u32| {
            sink.lock().unwrap().push(value);
        });
        (debouncer, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_calls_collapse_into_last_value() {
        let (debouncer, fired) = recording_debouncer(100);

        for value in [1, 2, 3] {
            debouncer.call(value);
            advance(Duration::from_millis(30)).await;
        }
        sleep(Duration::from_millis(200)).await;

        assert_eq!(*fired.lock().unwrap(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn fires_once_per_quiet_period() {
        let (debouncer, fired) = recording_debouncer(100);

        debouncer.call(1);
        sleep(Duration::from_millis(150)).await;
        debouncer.call(2);
        sleep(Duration::from_millis(150)).await;

        assert_eq!(*fired.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_before_the_delay_elapses() {
        let (debouncer, fired) = recording_debouncer(100);

        debouncer.call(1);
        advance(Duration::from_millis(99)).await;

        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_the_pending_invocation() {
        let (debouncer, fired) = recording_debouncer(100);

        debouncer.call(1);
        debouncer.cancel();
        sleep(Duration::from_millis(200)).await;

        assert!(fired.lock().unwrap().is_empty());
    }
}
