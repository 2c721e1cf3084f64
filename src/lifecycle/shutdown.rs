//! Shutdown coordination for the gateway.
//!
//! The binary holds one `Shutdown`. Listeners take a receiver before they
//! start serving; the OS signal task (or a test) fires it once.

use tokio::sync::broadcast;

use super::signals;

/// Fan-out stop signal shared by the listener and the signal task.
#[derive(Debug, Clone)]
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Receiver that resolves once `trigger` is called.
    ///
    /// Subscribe before the trigger can fire; late subscribers miss it.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Ask every subscribed listener to stop accepting and drain.
    ///
    /// Returns how many listeners were told.
    pub fn trigger(&self) -> usize {
        let notified = self.notify.send(()).unwrap_or(0);
        tracing::debug!(listeners = notified, "Shutdown triggered");
        notified
    }

    /// Fire the signal when SIGINT or SIGTERM arrives.
    pub fn trigger_on_signal(&self) -> tokio::task::JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
