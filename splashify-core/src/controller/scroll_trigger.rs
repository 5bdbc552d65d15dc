//! src/controller/scroll_trigger.rs
//! ============================================================================
//! # SentinelObserver: visibility subscription for infinite scroll
//!
//! At most one subscription is active. [`report`](SentinelObserver::report)
//! is fed the sentinel's visibility after every layout change and fires on
//! hidden→visible edges only. A fresh subscription starts hidden, so it fires
//! right away when the sentinel is already on screen.

use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Subscription {
    id: u64,
    was_visible: bool,
}

#[derive(Debug, Default)]
pub struct SentinelObserver {
    active: Option<Subscription>,
    next_id: u64,
}

impl SentinelObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any previous subscription with a new one.
    pub fn observe(&mut self) -> u64 {
        self.disconnect();
        self.next_id += 1;
        self.active = Some(Subscription {
            id: self.next_id,
            was_visible: false,
        });
        trace!(subscription = self.next_id, "Sentinel observed");
        self.next_id
    }

    /// Like [`observe`](Self::observe), but the new subscription starts from
    /// the given visibility, so it waits for the next hidden→visible edge.
    pub fn observe_from(&mut self, visible: bool) -> u64 {
        let id = self.observe();
        if let Some(sub) = self.active.as_mut() {
            sub.was_visible = visible;
        }
        id
    }

    pub fn disconnect(&mut self) {
        if let Some(sub) = self.active.take() {
            trace!(subscription = sub.id, "Sentinel disconnected");
        }
    }

    pub fn is_observing(&self) -> bool {
        self.active.is_some()
    }

    /// Deliver the current visibility. Returns true when the subscriber
    /// should be notified.
    pub fn report(&mut self, visible: bool) -> bool {
        let Some(sub) = self.active.as_mut() else {
            return false;
        };

        let fire = visible && !sub.was_visible;
        sub.was_visible = visible;
        if fire {
            debug!(subscription = sub.id, "Sentinel became visible");
        }
        fire
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_edge() {
        let mut obs = SentinelObserver::new();
        obs.observe();

        assert!(!obs.report(false));
        assert!(obs.report(true));
        assert!(!obs.report(true));
        assert!(!obs.report(false));
        assert!(obs.report(true));
    }

    #[test]
    fn fresh_subscription_fires_when_already_visible() {
        let mut obs = SentinelObserver::new();
        obs.observe();
        assert!(obs.report(true));

        // re-arming after a cycle while the sentinel is still on screen
        obs.observe();
        assert!(obs.report(true));
    }

    #[test]
    fn observe_from_visible_waits_for_next_edge() {
        let mut obs = SentinelObserver::new();
        obs.observe_from(true);
        assert!(!obs.report(true));
        assert!(!obs.report(false));
        assert!(obs.report(true));
    }

    #[test]
    fn disconnected_observer_is_silent() {
        let mut obs = SentinelObserver::new();
        assert!(!obs.report(true));

        obs.observe();
        obs.disconnect();
        assert!(!obs.is_observing());
        assert!(!obs.report(true));
    }

    #[test]
    fn observe_replaces_previous() {
        let mut obs = SentinelObserver::new();
        let a = obs.observe();
        let b = obs.observe();
        assert_ne!(a, b);
        assert!(obs.is_observing());
    }
}
