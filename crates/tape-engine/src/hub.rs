//! Subscriber registry and broadcast fan-out.
//!
//! Every connected client owns a bounded outbound queue registered here. Each
//! tick, the engine serializes the table once and the hub pushes that single
//! payload to every queue with a non-blocking send — a slow or dead
//! subscriber can drop frames or get removed, but it can never stall the
//! other subscribers or delay the next tick.
//!
//! Registration and removal race freely with an in-flight fan-out: the
//! subscriber map is locked only long enough to snapshot the send handles,
//! then iteration happens on the snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;
use tokio::sync::{Mutex, mpsc};
use tokio::sync::mpsc::error::TrySendError;
use tokio_tungstenite::tungstenite::Utf8Bytes;
use tracing::{debug, warn};

/// Frames buffered per subscriber before new frames are dropped for it.
const SUBSCRIBER_QUEUE: usize = 16;

/// The set of live subscriber channels.
pub struct BroadcastHub {
    subscribers: Mutex<AHashMap<u64, mpsc::Sender<Utf8Bytes>>>,
    next_id: AtomicU64,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self { subscribers: Mutex::new(AHashMap::new()), next_id: AtomicU64::new(0) }
    }

    /// Register a new subscriber and immediately queue the given snapshot as
    /// its first frame — every joiner gets the full current table, never a
    /// diff.
    ///
    /// Returns the subscriber id and the receiving end for the transport to
    /// pump into the connection.
    pub async fn subscribe(&self, snapshot: Utf8Bytes) -> (u64, mpsc::Receiver<Utf8Bytes>) {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_QUEUE);
        // A fresh queue can be neither full nor closed.
        let _ = tx.try_send(snapshot);

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let active = {
            let mut subscribers = self.subscribers.lock().await;
            subscribers.insert(id, tx);
            subscribers.len()
        };
        debug!("subscriber {id} registered ({active} active)");
        (id, rx)
    }

    /// Remove a subscriber. Idempotent — removing twice (or after a broadcast
    /// already dropped it) is a no-op.
    pub async fn unsubscribe(&self, id: u64) {
        let mut subscribers = self.subscribers.lock().await;
        if subscribers.remove(&id).is_some() {
            debug!("subscriber {id} removed ({} active)", subscribers.len());
        }
    }

    /// Push one payload to every live subscriber.
    ///
    /// The payload is shared, not re-serialized per subscriber. A full queue
    /// drops this frame for that subscriber only; a closed queue drops the
    /// subscriber itself.
    pub async fn broadcast(&self, payload: Utf8Bytes) {
        let targets: Vec<(u64, mpsc::Sender<Utf8Bytes>)> = {
            let subscribers = self.subscribers.lock().await;
            subscribers.iter().map(|(id, tx)| (*id, tx.clone())).collect()
        };

        let mut dead = Vec::new();
        for (id, tx) in targets {
            match tx.try_send(payload.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    warn!("subscriber {id} queue full, dropping frame");
                }
                Err(TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut subscribers = self.subscribers.lock().await;
            for id in dead {
                if subscribers.remove(&id).is_some() {
                    debug!("subscriber {id} gone, dropped from hub");
                }
            }
        }
    }

    /// Number of currently registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.lock().await.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new()
    }
}
