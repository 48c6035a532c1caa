//! Debounced input: coalesce bursts of values into one delayed apply.
//!
//! Each scheduled value cancels the pending one, so a burst applies exactly
//! once with its last value after the quiet window has elapsed.

use std::ops::Add;
use std::time::Duration;

/// Point in time a [`Debouncer`] can schedule against
pub trait Moment: Copy + Ord + Add<Duration, Output = Self> {}

impl<T> Moment for T where T: Copy + Ord + Add<Duration, Output = T> {}

#[derive(Debug, Clone)]
struct PendingApply<T, I> {
    value: T,
    deadline: I,
}

/// Cancellable delayed apply for one input channel
#[derive(Debug, Clone)]
pub struct Debouncer<T, I = std::time::Instant> {
    delay: Duration,
    pending: Option<PendingApply<T, I>>,
    superseded: u64,
    fired: u64,
}

impl<T, I: Moment> Debouncer<T, I> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            superseded: 0,
            fired: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to apply after the quiet window, replacing any
    /// pending value
    pub fn schedule(&mut self, value: T, now: I) {
        if self.pending.is_some() {
            self.superseded += 1;
        }
        self.pending = Some(PendingApply {
            value,
            deadline: now + self.delay,
        });
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|pending| pending.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<I> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    /// Take the pending value once its deadline has passed
    pub fn poll(&mut self, now: I) -> Option<T> {
        let ready = matches!(&self.pending, Some(pending) if now >= pending.deadline);
        if !ready {
            return None;
        }
        self.fired += 1;
        self.pending.take().map(|pending| pending.value)
    }

    /// Take the pending value immediately
    pub fn flush(&mut self) -> Option<T> {
        let value = self.pending.take().map(|pending| pending.value);
        if value.is_some() {
            self.fired += 1;
        }
        value
    }

    /// Number of values replaced before their deadline
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }

    /// Number of values applied
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

/// Drive a debouncer from a channel until the channel closes.
///
/// `apply` runs once per quiet window with the last value received. A value
/// still pending when the channel closes is dropped.
#[cfg(not(target_arch = "wasm32"))]
pub async fn run_debounced<T, F>(
    mut inputs: tokio::sync::mpsc::UnboundedReceiver<T>,
    delay: Duration,
    mut apply: F,
) where
    F: FnMut(T),
{
    use tokio::time::Instant;

    let mut debouncer: Debouncer<T, Instant> = Debouncer::new(delay);

    loop {
        match debouncer.deadline() {
            Some(deadline) => {
                tokio::select! {
                    input = inputs.recv() => match input {
                        Some(value) => debouncer.schedule(value, Instant::now()),
                        None => {
                            if debouncer.cancel().is_some() {
                                log::debug!("Input channel closed with a pending value");
                            }
                            break;
                        }
                    },
                    _ = tokio::time::sleep_until(deadline) => {
                        if let Some(value) = debouncer.poll(Instant::now()) {
                            apply(value);
                        }
                    }
                }
            }
            None => match inputs.recv().await {
                Some(value) => debouncer.schedule(value, Instant::now()),
                None => break,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_burst_fires_once_with_last_value() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));

        for (i, term) in ["t", "te", "tem", "temp", "tempe"].iter().enumerate() {
            let now = start + Duration::from_millis(i as u64 * 150);
            debouncer.schedule(term.to_string(), now);
            assert_eq!(debouncer.poll(now), None);
        }

        // 1000ms after the first keystroke, but not after the last
        assert_eq!(debouncer.poll(start + Duration::from_millis(1100)), None);

        let fired = debouncer.poll(start + Duration::from_millis(1600));
        assert_eq!(fired.as_deref(), Some("tempe"));
        assert_eq!(debouncer.poll(start + Duration::from_millis(5000)), None);
        assert_eq!(debouncer.fired_count(), 1);
        assert_eq!(debouncer.superseded_count(), 4);
    }

    #[test]
    fn test_cancel_and_flush() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(200));

        debouncer.schedule(1, start);
        assert_eq!(debouncer.cancel(), Some(1));
        assert!(!debouncer.is_pending());

        debouncer.schedule(2, start);
        assert_eq!(debouncer.flush(), Some(2));
        assert_eq!(debouncer.flush(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_channel_driver_applies_once() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let applied = Arc::new(Mutex::new(Vec::new()));
        let sink = applied.clone();

        let driver = tokio::spawn(run_debounced(rx, Duration::from_millis(1000), move |term: String| {
            sink.lock().push(term);
        }));

        for term in ["t", "te", "tem", "temp", "tempe"] {
            tx.send(term.to_string()).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(applied.lock().is_empty());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(*applied.lock(), vec!["tempe".to_string()]);

        drop(tx);
        driver.await.unwrap();
        assert_eq!(applied.lock().len(), 1);
    }
}
