//! Connected-client set and push calls
//!
//! The transport owns connection liveness; the bridge only needs a set of
//! push channels to fan telemetry out to. Each client registers an unbounded
//! channel, so a send from the native audio thread never blocks, and a
//! `host` flag gating whether it receives telemetry broadcasts.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::dispatch::Value;

/// An unsolicited server-to-client call
#[derive(Debug, Clone)]
pub struct PushCall {
    /// Collection the event belongs to
    pub collection: String,
    /// Event name
    pub method: String,
    /// Event payload
    pub args: Vec<Value>,
}

impl PushCall {
    /// Create a new push call
    pub fn new(
        collection: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Value>,
    ) -> Self {
        Self {
            collection: collection.into(),
            method: method.into(),
            args,
        }
    }
}

struct ClientHandle {
    host: bool,
    tx: mpsc::UnboundedSender<PushCall>,
}

/// Set of clients eligible to receive broadcast telemetry
pub struct ClientSet {
    clients: Mutex<HashMap<u64, ClientHandle>>,
    next_id: AtomicU64,
}

impl ClientSet {
    /// Create an empty client set
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, ClientHandle>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a client; returns its id and the push-call receiver
    pub fn register(&self, host: bool) -> (u64, mpsc::UnboundedReceiver<PushCall>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(id, ClientHandle { host, tx });
        tracing::debug!(client = id, host, "client registered");
        (id, rx)
    }

    /// Change a client's host flag; false if the client is unknown
    pub fn set_host(&self, id: u64, host: bool) -> bool {
        match self.lock().get_mut(&id) {
            Some(client) => {
                client.host = host;
                true
            }
            None => false,
        }
    }

    /// Remove a client; false if it was not registered
    pub fn unregister(&self, id: u64) -> bool {
        let removed = self.lock().remove(&id).is_some();
        if removed {
            tracing::debug!(client = id, "client unregistered");
        }
        removed
    }

    /// Number of registered clients
    pub fn client_count(&self) -> usize {
        self.lock().len()
    }

    /// Deliver a push call to every host client
    ///
    /// A failed send (receiver dropped mid-iteration) is logged and skipped;
    /// it never aborts delivery to the remaining clients. Returns the number
    /// of successful deliveries.
    pub fn broadcast_hosts(&self, call: &PushCall) -> usize {
        let clients = self.lock();
        let mut delivered = 0;
        for (id, client) in clients.iter() {
            if !client.host {
                continue;
            }
            if client.tx.send(call.clone()).is_err() {
                tracing::debug!(client = id, method = %call.method, "push delivery failed");
            } else {
                delivered += 1;
            }
        }
        delivered
    }
}

impl Default for ClientSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> PushCall {
        PushCall::new("Volmeter", "UpdateVolmeter", vec![Value::UInt64(1)])
    }

    #[test]
    fn test_register_unregister() {
        let clients = ClientSet::new();
        let (id, _rx) = clients.register(true);

        assert_eq!(clients.client_count(), 1);
        assert!(clients.unregister(id));
        assert!(!clients.unregister(id));
        assert_eq!(clients.client_count(), 0);
    }

    #[test]
    fn test_broadcast_only_to_hosts() {
        let clients = ClientSet::new();
        let (_host_id, mut host_rx) = clients.register(true);
        let (_other_id, mut other_rx) = clients.register(false);

        assert_eq!(clients.broadcast_hosts(&call()), 1);
        assert!(host_rx.try_recv().is_ok());
        assert!(other_rx.try_recv().is_err());
    }

    #[test]
    fn test_set_host() {
        let clients = ClientSet::new();
        let (id, mut rx) = clients.register(false);

        assert_eq!(clients.broadcast_hosts(&call()), 0);

        assert!(clients.set_host(id, true));
        assert_eq!(clients.broadcast_hosts(&call()), 1);
        assert!(rx.try_recv().is_ok());

        assert!(!clients.set_host(999, true));
    }

    #[test]
    fn test_failed_delivery_is_isolated() {
        let clients = ClientSet::new();
        let (_dead_id, dead_rx) = clients.register(true);
        let (_live_id, mut live_rx) = clients.register(true);

        // Dropping the receiver makes the first client's sends fail
        drop(dead_rx);

        assert_eq!(clients.broadcast_hosts(&call()), 1);
        assert!(live_rx.try_recv().is_ok());
    }
}
