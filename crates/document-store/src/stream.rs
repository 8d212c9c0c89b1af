//! Cancellable snapshot streams.

use tokio::sync::mpsc;

use crate::{Document, StoreResult};

/// One delivery on a live subscription: a full collection snapshot or the
/// error that ended the stream.
pub type SnapshotEvent = StoreResult<Vec<Document>>;

type CancelFn = Box<dyn FnOnce() + Send>;

/// Live view of a collection.
///
/// Every item is the whole collection, never a diff. Snapshots arrive in
/// the order the store produced them. Cancelling (or dropping) the stream
/// releases the store-side listener.
pub struct SnapshotStream {
    receiver: mpsc::UnboundedReceiver<SnapshotEvent>,
    on_cancel: Option<CancelFn>,
}

impl SnapshotStream {
    pub fn new(
        receiver: mpsc::UnboundedReceiver<SnapshotEvent>,
        on_cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            receiver,
            on_cancel: Some(Box::new(on_cancel)),
        }
    }

    /// Waits for the next snapshot. `None` once the stream is closed or
    /// cancelled and drained.
    pub async fn next(&mut self) -> Option<SnapshotEvent> {
        self.receiver.recv().await
    }

    /// Releases the listener. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
        self.receiver.close();
    }

    pub fn is_cancelled(&self) -> bool {
        self.on_cancel.is_none()
    }
}

impl Drop for SnapshotStream {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for SnapshotStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStream")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn cancel_runs_once_and_closes() {
        let (tx, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut stream = SnapshotStream::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tx.send(Ok(vec![])).unwrap();
        assert!(stream.next().await.unwrap().unwrap().is_empty());

        stream.cancel();
        stream.cancel();
        drop(stream);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(tx.send(Ok(vec![])).is_err());
    }

    #[tokio::test]
    async fn drop_cancels() {
        let (_tx, rx) = mpsc::unbounded_channel();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let stream = SnapshotStream::new(rx, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        drop(stream);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
