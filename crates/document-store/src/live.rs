//! Live subscriber registry for the in-process store.
//!
//! Subscribers are notified after a write has been applied, with the full
//! collection as it stands after that write.

use std::collections::HashMap;
use tokio::sync::mpsc;

use crate::stream::SnapshotEvent;
use crate::{CollectionPath, Document, StoreError};

type SubscriberId = u64;

/// Map of collection to its live subscribers.
#[derive(Debug, Default)]
pub(crate) struct LiveHub {
    next_id: SubscriberId,
    subscribers: HashMap<CollectionPath, Vec<(SubscriberId, mpsc::UnboundedSender<SnapshotEvent>)>>,
}

impl LiveHub {
    /// Registers a subscriber and hands it `initial` as its first snapshot.
    pub fn subscribe(
        &mut self,
        path: &CollectionPath,
        initial: Vec<Document>,
    ) -> (SubscriberId, mpsc::UnboundedReceiver<SnapshotEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let _ = sender.send(Ok(initial));

        self.next_id += 1;
        let id = self.next_id;
        self.subscribers
            .entry(path.clone())
            .or_default()
            .push((id, sender));

        (id, receiver)
    }

    /// Broadcasts a snapshot, dropping subscribers whose receiver is gone.
    pub fn notify(&mut self, path: &CollectionPath, snapshot: &[Document]) {
        if let Some(senders) = self.subscribers.get_mut(path) {
            senders.retain(|(_, sender)| sender.send(Ok(snapshot.to_vec())).is_ok());
        }
    }

    /// Delivers an error to every subscriber of `path` and closes their
    /// streams, the way a backend listener ends after an error.
    pub fn fail(&mut self, path: &CollectionPath, make_error: impl Fn() -> StoreError) {
        if let Some(senders) = self.subscribers.remove(path) {
            for (_, sender) in senders {
                let _ = sender.send(Err(make_error()));
            }
        }
    }

    pub fn unsubscribe(&mut self, path: &CollectionPath, id: SubscriberId) {
        if let Some(senders) = self.subscribers.get_mut(path) {
            senders.retain(|(subscriber, _)| *subscriber != id);
            if senders.is_empty() {
                self.subscribers.remove(path);
            }
        }
    }

    /// Registered subscribers for `path`, including any whose receiver was
    /// dropped since the last notify.
    pub fn subscriber_count(&self, path: &CollectionPath) -> usize {
        self.subscribers.get(path).map(Vec::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str) -> Document {
        Document::new(id, json!({ "strainName": id }))
    }

    #[test]
    fn subscribe_receives_initial_then_updates() {
        let mut hub = LiveHub::default();
        let path = CollectionPath::from_string("app/x");

        let (_, mut rx) = hub.subscribe(&path, vec![doc("a")]);
        hub.notify(&path, &[doc("a"), doc("b")]);

        assert_eq!(rx.try_recv().unwrap().unwrap().len(), 1);
        assert_eq!(rx.try_recv().unwrap().unwrap().len(), 2);
    }

    #[test]
    fn dead_subscriber_cleanup() {
        let mut hub = LiveHub::default();
        let path = CollectionPath::from_string("app/x");

        {
            let _sub = hub.subscribe(&path, vec![]);
            assert_eq!(hub.subscriber_count(&path), 1);
        }

        hub.notify(&path, &[]);
        assert_eq!(hub.subscriber_count(&path), 0);
    }

    #[test]
    fn collections_are_isolated() {
        let mut hub = LiveHub::default();
        let first = CollectionPath::from_string("app/one");
        let second = CollectionPath::from_string("app/two");

        let (_, mut rx1) = hub.subscribe(&first, vec![]);
        let (_, mut rx2) = hub.subscribe(&second, vec![]);
        rx1.try_recv().unwrap().unwrap();
        rx2.try_recv().unwrap().unwrap();

        hub.notify(&first, &[doc("a")]);
        assert!(rx1.try_recv().is_ok());
        assert!(rx2.try_recv().is_err());
    }

    #[test]
    fn fail_closes_streams() {
        let mut hub = LiveHub::default();
        let path = CollectionPath::from_string("app/x");
        let (_, mut rx) = hub.subscribe(&path, vec![]);
        rx.try_recv().unwrap().unwrap();

        hub.fail(&path, || StoreError::PermissionDenied("revoked".to_string()));
        assert!(rx.try_recv().unwrap().is_err());
        assert_eq!(hub.subscriber_count(&path), 0);
    }

    #[test]
    fn unsubscribe_removes_only_that_subscriber() {
        let mut hub = LiveHub::default();
        let path = CollectionPath::from_string("app/x");
        let (first, _rx1) = hub.subscribe(&path, vec![]);
        let (_second, _rx2) = hub.subscribe(&path, vec![]);

        hub.unsubscribe(&path, first);
        assert_eq!(hub.subscriber_count(&path), 1);
    }
}
