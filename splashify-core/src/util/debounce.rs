//!  src/util/debounce.rs
//!  ===================================================================
//!  Cancellable delayed action for search input.
//!
//!  Every `submit` aborts the pending sleeper and schedules a new one.
//!  Fired values carry the sequence number of their submission, and the
//!  owner only acts on the one matching [`Debouncer::accept`]; a sleeper
//!  that already sent before it was aborted can never win.

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tracing::{debug, trace};

/* ======================== DebounceConfig ============================ */

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebounceConfig {
    pub delay: Duration,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self::search_input()
    }
}

impl DebounceConfig {
    /// Quick config for search input debouncing
    #[must_use]
    pub const fn search_input() -> Self {
        Self {
            delay: Duration::from_millis(1000),
        }
    }

    #[must_use]
    pub const fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

/* ============================ Debouncer ============================ */

/// A value whose quiet window elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Debounced<T> {
    pub seq: u64,
    pub value: T,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    cfg: DebounceConfig,
    seq: u64,
    sleeper: Option<JoinHandle<()>>,
    closed: bool,
    tx: mpsc::UnboundedSender<Debounced<T>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a new debouncer and its Rx endpoint
    #[must_use]
    pub fn new(cfg: DebounceConfig) -> (Self, mpsc::UnboundedReceiver<Debounced<T>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let deb = Self {
            cfg,
            seq: 0,
            sleeper: None,
            closed: false,
            tx,
        };
        (deb, rx)
    }

    /// Schedule `value`, replacing whatever was pending. Returns its sequence
    /// number, or `None` after [`shutdown`](Self::shutdown).
    pub fn submit(&mut self, value: T) -> Option<u64> {
        if self.closed {
            trace!("Debouncer closed, dropping submission");
            return None;
        }

        self.abort_sleeper();
        self.seq += 1;
        let seq = self.seq;

        let delay = self.cfg.delay;
        let tx = self.tx.clone();
        self.sleeper = Some(tokio::spawn(async move {
            sleep(delay).await;
            trace!(seq, "Debounce window elapsed");
            let _ = tx.send(Debounced { seq, value });
        }));

        Some(seq)
    }

    /// Drop the pending value, if any. Anything already fired is invalidated.
    pub fn cancel(&mut self) {
        if self.abort_sleeper() {
            debug!(seq = self.seq, "Pending debounce cancelled");
        }
        self.seq += 1;
    }

    /// True when `fired` is the latest live submission.
    pub fn accept(&mut self, fired: &Debounced<T>) -> bool {
        let live = !self.closed && fired.seq == self.seq;
        if live {
            self.sleeper = None;
        } else {
            trace!(fired = fired.seq, current = self.seq, "Stale debounce ignored");
        }
        live
    }

    pub fn is_pending(&self) -> bool {
        self.sleeper.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel and refuse further submissions.
    pub fn shutdown(&mut self) {
        self.cancel();
        self.closed = true;
        debug!("Debouncer shut down");
    }

    fn abort_sleeper(&mut self) -> bool {
        match self.sleeper.take() {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.sleeper.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const WINDOW: Duration = Duration::from_millis(1000);

    async fn next<T>(rx: &mut mpsc::UnboundedReceiver<Debounced<T>>) -> Option<Debounced<T>> {
        timeout(Duration::from_secs(10), rx.recv()).await.ok().flatten()
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_value() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::with_delay(WINDOW));

        for text in ["m", "mo", "mou", "mountains"] {
            deb.submit(text);
            tokio::time::sleep(Duration::from_millis(200)).await;
        }

        let fired = next(&mut rx).await.unwrap();
        assert_eq!(fired.value, "mountains");
        assert!(deb.accept(&fired));
        assert!(next(&mut rx).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stable_values_each_fire_once() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::with_delay(WINDOW));

        deb.submit("cats");
        tokio::time::sleep(Duration::from_millis(1200)).await;
        deb.submit("dogs");
        tokio::time::sleep(Duration::from_millis(1200)).await;

        let first = next(&mut rx).await.unwrap();
        let second = next(&mut rx).await.unwrap();
        assert_eq!((first.value, second.value), ("cats", "dogs"));
        assert!(!deb.accept(&first));
        assert!(deb.accept(&second));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_fires_before_the_window() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::with_delay(WINDOW));

        deb.submit(1u8);
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert!(rx.try_recv().is_err());
        assert!(deb.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_suppresses_and_invalidates() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::with_delay(WINDOW));

        deb.submit("gone");
        deb.cancel();
        assert!(!deb.is_pending());
        assert!(next(&mut rx).await.is_none());

        // a value that slipped out before cancel is rejected
        let seq = deb.submit("late").unwrap();
        deb.cancel();
        assert!(!deb.accept(&Debounced { seq, value: "late" }));
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_refuses_new_work() {
        let (mut deb, mut rx) = Debouncer::new(DebounceConfig::default());

        deb.submit("pending");
        deb.shutdown();
        assert_eq!(deb.submit("after"), None);
        assert!(next(&mut rx).await.is_none());
    }

    #[test]
    fn search_input_window_is_one_second() {
        assert_eq!(DebounceConfig::search_input().delay, WINDOW);
    }
}
