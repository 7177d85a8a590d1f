//! Stock change broadcast.
//!
//! One-way fan-out of post-mutation stock snapshots to every currently
//! connected observer. Publishing never blocks the checkout that triggered
//! it: each subscriber gets its own unbounded channel, disconnected
//! subscribers are pruned on the next publish, and observers that connect
//! after an event never see it (no replay, no acks). Observers receive the
//! full stream and filter by product id client-side.

use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::product::StockSnapshot;

/// A stock change event: the full flattened snapshot of one product's
/// stock table, taken right after a mutation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub product_id: String,
    pub new_stock: StockSnapshot,
}

impl StockUpdate {
    pub fn new(product_id: impl Into<String>, new_stock: StockSnapshot) -> Self {
        StockUpdate {
            product_id: product_id.into(),
            new_stock,
        }
    }

    /// Wire JSON, `{ "productId": …, "newStock": … }`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Compact binary encoding for non-JSON consumers.
    pub fn encode(&self) -> Result<Vec<u8>, bitcode::Error> {
        bitcode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::deserialize(bytes)
    }
}

/// Error type for broadcast operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    RegistryPoisoned,
    SerializationFailed(String),
}

impl fmt::Display for BroadcastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BroadcastError::RegistryPoisoned => write!(f, "subscriber registry poisoned"),
            BroadcastError::SerializationFailed(msg) => {
                write!(f, "stock update serialization failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for BroadcastError {}

/// Trait for broadcasting stock updates.
///
/// Fire-and-forget from the pipeline's perspective: a slow or absent
/// observer must never block the publishing request. Implementations
/// might include the in-process [`StockFeed`], an [`EmitterPublisher`]
/// bridge, or a websocket fan-out.
pub trait StockPublisher: Send + Sync {
    /// Broadcast one update. Returns how many observers it was handed to.
    fn publish(&self, update: StockUpdate) -> Result<usize, BroadcastError>;
}

/// In-process subscriber registry.
///
/// `Clone` shares the registry, so the feed can be handed to the pipeline
/// as publisher and to any number of viewers for subscription.
#[derive(Clone, Default)]
pub struct StockFeed {
    subscribers: Arc<Mutex<Vec<Sender<StockUpdate>>>>,
}

impl StockFeed {
    pub fn new() -> Self {
        StockFeed {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a new observer. The subscription only sees events
    /// published after this call.
    pub fn subscribe(&self) -> StockSubscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        StockSubscription { rx }
    }

    /// Currently registered subscribers, counting ones that have hung up
    /// but haven't been pruned by a publish yet.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

impl StockPublisher for StockFeed {
    fn publish(&self, update: StockUpdate) -> Result<usize, BroadcastError> {
        let mut subscribers = self
            .subscribers
            .lock()
            .map_err(|_| BroadcastError::RegistryPoisoned)?;
        // Unbounded channels: send never blocks. Hung-up receivers drop out.
        subscribers.retain(|tx| tx.send(update.clone()).is_ok());
        Ok(subscribers.len())
    }
}

/// The receiving end of a [`StockFeed::subscribe`] call.
pub struct StockSubscription {
    rx: Receiver<StockUpdate>,
}

impl StockSubscription {
    /// Block up to `timeout_ms` for the next update.
    pub fn poll(&self, timeout_ms: u64) -> Option<StockUpdate> {
        self.rx.recv_timeout(Duration::from_millis(timeout_ms)).ok()
    }

    /// Next update if one is already queued.
    pub fn try_next(&self) -> Option<StockUpdate> {
        self.rx.try_recv().ok()
    }

    /// Block up to `timeout_ms` for the next update for one product,
    /// discarding events for other products along the way.
    pub fn poll_for(&self, product_id: &str, timeout_ms: u64) -> Option<StockUpdate> {
        let deadline = std::time::Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let remaining = deadline.checked_duration_since(std::time::Instant::now())?;
            let update = self.rx.recv_timeout(remaining).ok()?;
            if update.product_id == product_id {
                return Some(update);
            }
        }
    }
}

/// Forwards stock updates as JSON to an in-process
/// [`EventEmitter`](event_emitter_rs::EventEmitter) under the
/// `"stockUpdated"` event name, for callback-style observers.
#[cfg(feature = "emitter")]
pub struct EmitterPublisher {
    emitter: Mutex<event_emitter_rs::EventEmitter>,
}

#[cfg(feature = "emitter")]
impl EmitterPublisher {
    /// Event name updates are emitted under.
    pub const EVENT: &'static str = "stockUpdated";

    pub fn new(emitter: event_emitter_rs::EventEmitter) -> Self {
        EmitterPublisher {
            emitter: Mutex::new(emitter),
        }
    }
}

#[cfg(feature = "emitter")]
impl StockPublisher for EmitterPublisher {
    fn publish(&self, update: StockUpdate) -> Result<usize, BroadcastError> {
        let json = update
            .to_json()
            .map_err(|e| BroadcastError::SerializationFailed(e.to_string()))?;
        let mut emitter = self
            .emitter
            .lock()
            .map_err(|_| BroadcastError::RegistryPoisoned)?;
        emitter.emit(Self::EVENT, json);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn update(product_id: &str, quantity: u32) -> StockUpdate {
        let mut sizes = HashMap::new();
        sizes.insert("M".to_string(), quantity);
        let mut stock = HashMap::new();
        stock.insert("Red".to_string(), sizes);
        StockUpdate::new(product_id, stock)
    }

    #[test]
    fn fan_out_reaches_every_subscriber() {
        let feed = StockFeed::new();
        let a = feed.subscribe();
        let b = feed.subscribe();

        let delivered = feed.publish(update("P0000001", 1)).unwrap();
        assert_eq!(delivered, 2);
        assert_eq!(a.poll(100).unwrap().product_id, "P0000001");
        assert_eq!(b.poll(100).unwrap().product_id, "P0000001");
    }

    #[test]
    fn late_subscribers_see_no_replay() {
        let feed = StockFeed::new();
        feed.publish(update("P0000001", 1)).unwrap();

        let late = feed.subscribe();
        assert!(late.try_next().is_none());
    }

    #[test]
    fn hung_up_subscribers_are_pruned() {
        let feed = StockFeed::new();
        let keep = feed.subscribe();
        drop(feed.subscribe());
        assert_eq!(feed.subscriber_count(), 2);

        let delivered = feed.publish(update("P0000001", 1)).unwrap();
        assert_eq!(delivered, 1);
        assert_eq!(feed.subscriber_count(), 1);
        assert!(keep.try_next().is_some());
    }

    #[test]
    fn poll_for_filters_by_product() {
        let feed = StockFeed::new();
        let sub = feed.subscribe();
        feed.publish(update("P0000001", 1)).unwrap();
        feed.publish(update("P0000002", 5)).unwrap();

        let hit = sub.poll_for("P0000002", 100).unwrap();
        assert_eq!(hit.new_stock["Red"]["M"], 5);
    }

    #[test]
    fn wire_json_shape() {
        let json = update("P0000001", 3).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["productId"], "P0000001");
        assert_eq!(value["newStock"]["Red"]["M"], 3);
    }

    #[test]
    fn binary_roundtrip() {
        let original = update("P0000001", 3);
        let decoded = StockUpdate::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[cfg(feature = "emitter")]
    #[test]
    fn emitter_bridge_forwards_updates_as_json() {
        use std::time::Instant;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut emitter = event_emitter_rs::EventEmitter::new();
        emitter.on(EmitterPublisher::EVENT, move |payload: String| {
            sink.lock().unwrap().push(payload);
        });

        let publisher = EmitterPublisher::new(emitter);
        publisher.publish(update("P0000001", 2)).unwrap();

        // listeners may run on their own threads
        let deadline = Instant::now() + Duration::from_millis(500);
        let payload = loop {
            if let Some(first) = seen.lock().unwrap().first().cloned() {
                break first;
            }
            assert!(Instant::now() < deadline, "listener never ran");
            std::thread::sleep(Duration::from_millis(10));
        };

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["productId"], "P0000001");
        assert_eq!(value["newStock"]["Red"]["M"], 2);
    }
}
