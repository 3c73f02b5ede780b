//! Change notification for the settings store
//!
//! Every successful mutation produces one `SettingsChanged` event per affected
//! uri. Events are delivered in two ways:
//! - Callbacks: registered per uri, invoked in registration order
//! - Broadcast: a `tokio::sync::broadcast` stream of every event
//!
//! Delivery happens after the store has released its state lock, so a
//! callback may call back into the store. Deliveries are serialized through a
//! dispatch gate that the store acquires before releasing the state lock,
//! which keeps delivery order equal to mutation order.

use crate::contract::{Document, SettingsUri};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, MutexGuard};

/// A settings document changed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsChanged {
    /// Uri of the changed document
    pub uri: SettingsUri,
    /// Document value right after the mutation
    pub document: Document,
    /// Time the mutation was persisted
    pub timestamp: DateTime<Utc>,
}

impl SettingsChanged {
    pub fn new(uri: SettingsUri, document: Document) -> Self {
        Self {
            uri,
            document,
            timestamp: Utc::now(),
        }
    }
}

/// Callback invoked for every change of one uri
pub type ChangeHandler = Arc<dyn Fn(&SettingsChanged) + Send + Sync>;

/// Publish-subscribe channel keyed by uri
pub struct ChangeNotifier {
    handlers: RwLock<HashMap<SettingsUri, Vec<ChangeHandler>>>,
    sender: broadcast::Sender<SettingsChanged>,
    gate: Mutex<()>,
}

impl ChangeNotifier {
    /// Create a notifier whose broadcast stream buffers `capacity` events
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            handlers: RwLock::new(HashMap::new()),
            sender,
            gate: Mutex::new(()),
        }
    }

    /// Register a callback for changes of exactly `uri`
    pub fn register(&self, uri: SettingsUri, handler: ChangeHandler) {
        self.handlers.write().entry(uri).or_default().push(handler);
    }

    /// Number of callbacks registered for `uri`
    pub fn handler_count(&self, uri: &SettingsUri) -> usize {
        self.handlers.read().get(uri).map_or(0, Vec::len)
    }

    /// Stream of all change events from now on
    pub fn watch(&self) -> broadcast::Receiver<SettingsChanged> {
        self.sender.subscribe()
    }

    /// Reserve the next delivery slot.
    ///
    /// Acquire this while still holding the store lock, release the store
    /// lock, then deliver through the returned ticket.
    pub(crate) async fn reserve(&self) -> DispatchTicket<'_> {
        DispatchTicket {
            notifier: self,
            _gate: self.gate.lock().await,
        }
    }

    fn deliver(&self, event: &SettingsChanged) {
        let handlers: Vec<ChangeHandler> = self
            .handlers
            .read()
            .get(&event.uri)
            .cloned()
            .unwrap_or_default();

        tracing::debug!(uri = %event.uri, handlers = handlers.len(), "Dispatching settings change");
        for handler in handlers {
            handler(event);
        }

        // No receivers is not an error
        let _ = self.sender.send(event.clone());
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Exclusive right to deliver notifications, held in mutation order
pub(crate) struct DispatchTicket<'a> {
    notifier: &'a ChangeNotifier,
    _gate: MutexGuard<'a, ()>,
}

impl DispatchTicket<'_> {
    /// Deliver events in order and release the slot
    pub(crate) fn deliver(self, events: &[SettingsChanged]) {
        for event in events {
            self.notifier.deliver(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uri(s: &str) -> SettingsUri {
        SettingsUri::new(s).unwrap()
    }

    #[tokio::test]
    async fn test_handlers_receive_only_their_uri() {
        let notifier = ChangeNotifier::new(8);
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = seen.clone();
        notifier.register(
            uri("ui/theme"),
            Arc::new(move |event: &SettingsChanged| sink.lock().push(event.document.clone())),
        );

        notifier.reserve().await.deliver(&[
            SettingsChanged::new(uri("UI/Theme"), json!({"dark": true})),
            SettingsChanged::new(uri("net/proxy"), json!({"port": 1})),
        ]);

        assert_eq!(*seen.lock(), vec![json!({"dark": true})]);
    }

    #[tokio::test]
    async fn test_handlers_run_in_registration_order() {
        let notifier = ChangeNotifier::new(8);
        let order = Arc::new(parking_lot::Mutex::new(Vec::new()));

        for id in 0..3 {
            let sink = order.clone();
            notifier.register(uri("a"), Arc::new(move |_: &SettingsChanged| sink.lock().push(id)));
        }
        assert_eq!(notifier.handler_count(&uri("a")), 3);

        notifier
            .reserve()
            .await
            .deliver(&[SettingsChanged::new(uri("a"), json!({}))]);

        assert_eq!(*order.lock(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_broadcast_receives_every_event() {
        let notifier = ChangeNotifier::new(8);
        let mut rx = notifier.watch();

        notifier.reserve().await.deliver(&[
            SettingsChanged::new(uri("a"), json!(1)),
            SettingsChanged::new(uri("b"), json!(2)),
        ]);

        assert_eq!(rx.recv().await.unwrap().uri, uri("a"));
        assert_eq!(rx.recv().await.unwrap().uri, uri("b"));
    }

    #[tokio::test]
    async fn test_deliver_without_receivers_is_ok() {
        let notifier = ChangeNotifier::default();
        notifier
            .reserve()
            .await
            .deliver(&[SettingsChanged::new(uri("a"), json!(1))]);
    }
}
