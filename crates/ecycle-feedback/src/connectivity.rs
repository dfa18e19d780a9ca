use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::{debug, info};

/// A change in network reachability reported by the host environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Online,
    Offline,
}

type Handler = Arc<dyn Fn(Transition) + Send + Sync>;

/// Tracks the last known reachability state and fans transitions out to
/// subscribers.
///
/// The monitor never polls. Whoever observes the environment (the kiosk shell
/// forwarding browser `online`/`offline` events, a test) calls
/// [`on_online_transition`](Self::on_online_transition) or
/// [`on_offline_transition`](Self::on_offline_transition). Repeated events for
/// the state we are already in are dropped, so subscribers only ever see real
/// changes.
pub struct ConnectivityMonitor {
    offline: AtomicBool,
    handlers: Mutex<Vec<Handler>>,
}

impl ConnectivityMonitor {
    /// Start from the environment's reachability flag.
    pub fn new(online: bool) -> Self {
        Self {
            offline: AtomicBool::new(!online),
            handlers: Mutex::new(Vec::new()),
        }
    }

    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// Register a handler for every future state change.
    pub fn on_transition<F>(&self, handler: F)
    where
        F: Fn(Transition) + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Returns `false` (and notifies nobody) if we were already online.
    pub fn on_online_transition(&self) -> bool {
        self.transition(Transition::Online)
    }

    /// Returns `false` (and notifies nobody) if we were already offline.
    pub fn on_offline_transition(&self) -> bool {
        self.transition(Transition::Offline)
    }

    fn transition(&self, to: Transition) -> bool {
        let offline = to == Transition::Offline;
        if self.offline.swap(offline, Ordering::SeqCst) == offline {
            debug!(?to, "duplicate connectivity event ignored");
            return false;
        }

        info!(?to, "connectivity changed");

        // Handlers may subscribe further handlers; call them without the lock.
        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in handlers {
            handler(to);
        }
        true
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}
