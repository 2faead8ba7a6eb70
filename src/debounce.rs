//! Single-slot debouncer for the search text stream
use log::trace;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds at most one pending value. Scheduling again replaces the value and
/// restarts the delay, so only the last value of a burst is ever released.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arms the timer with `value`, returning the value it superseded.
    pub fn schedule(&mut self, value: T, now: Instant) -> Option<T> {
        let deadline = now + self.delay;
        let superseded = self.pending.replace(Pending { value, deadline });
        if superseded.is_some() {
            trace!("Debounced value superseded; deadline reset to +{:?}", self.delay);
        }
        superseded.map(|pending| pending.value)
    }

    /// Releases the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = matches!(&self.pending, Some(pending) if now >= pending.deadline);
        if !due {
            return None;
        }
        self.pending.take().map(|pending| pending.value)
    }

    /// Releases the pending value regardless of its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.flush()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Sleeps until the pending value is due, then releases it. Returns
    /// `None` immediately when nothing is pending. Needs a tokio runtime with
    /// the time driver enabled.
    pub async fn wait_due(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.poll(Instant::now())
    }
}
