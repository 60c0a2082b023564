//! Host connectivity signal.
//!
//! An explicit observable for the network state: producers (submit
//! failures, a probe task) report the current state, and consumers are
//! woken only on the offline→online edge.

use tokio::sync::watch;

/// Online/offline state with edge-triggered restoration.
#[derive(Debug)]
pub struct Connectivity {
    tx: watch::Sender<bool>,
}

/// Consumer half: awaits offline→online transitions.
#[derive(Debug, Clone)]
pub struct ConnectivityWatcher {
    rx: watch::Receiver<bool>,
}

impl Connectivity {
    /// Starts in the given state; a fresh page load assumes online.
    pub fn new(online: bool) -> (Self, ConnectivityWatcher) {
        let (tx, rx) = watch::channel(online);
        (Self { tx }, ConnectivityWatcher { rx })
    }

    /// Report the current state. Repeated reports of the same state do not
    /// wake watchers, so only true transitions fire.
    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|state| {
            let changed = *state != online;
            *state = online;
            changed
        });
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }
}

impl ConnectivityWatcher {
    pub fn is_online(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next offline→online transition.
    ///
    /// Returns `Err` only when the producer half has been dropped.
    pub async fn restored(&mut self) -> Result<(), watch::error::RecvError> {
        loop {
            self.rx.changed().await?;
            if *self.rx.borrow_and_update() {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn fires_on_offline_to_online_edge() {
        let (signal, mut watcher) = Connectivity::new(true);

        signal.set_online(false);
        signal.set_online(true);

        tokio::time::timeout(Duration::from_secs(1), watcher.restored())
            .await
            .expect("restored should fire")
            .unwrap();
    }

    #[tokio::test]
    async fn does_not_fire_while_still_offline() {
        let (signal, mut watcher) = Connectivity::new(true);

        signal.set_online(false);
        signal.set_online(false);

        let fired = tokio::time::timeout(Duration::from_millis(20), watcher.restored()).await;
        assert!(fired.is_err(), "no edge yet, restored must not fire");
        assert!(!watcher.is_online());
    }

    #[tokio::test]
    async fn repeated_online_reports_do_not_refire() {
        let (signal, mut watcher) = Connectivity::new(false);

        signal.set_online(true);
        tokio::time::timeout(Duration::from_secs(1), watcher.restored())
            .await
            .expect("first edge fires")
            .unwrap();

        signal.set_online(true);
        let fired = tokio::time::timeout(Duration::from_millis(20), watcher.restored()).await;
        assert!(fired.is_err(), "same-state report is not an edge");
    }
}
