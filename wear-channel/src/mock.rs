//! Mock data layer for testing.
//!
//! Captures publishes, delivers queued event batches, and models the
//! store's duplicate-write suppression. [`MockDataLayer::pair`] links two
//! mocks back-to-back so a publish on one side arrives as a change batch on
//! the other - a loopback replicated store for integration tests and the
//! demo binary.

use super::layer::{DataLayer, LayerError};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::Notify;
use wear_types::{AssetToken, DataMap, SyncEvent};

/// Mock data layer for testing.
#[derive(Debug, Default)]
pub struct MockDataLayer {
    inner: Arc<Mutex<Inner>>,
    wakeup: Arc<Notify>,
}

#[derive(Debug, Default)]
struct Inner {
    connected: bool,
    subscribed: bool,
    published: Vec<(String, DataMap)>,
    last_values: HashMap<String, DataMap>,
    batch_queue: VecDeque<Vec<SyncEvent>>,
    assets: Arc<Mutex<HashMap<AssetToken, Vec<u8>>>>,
    fail_next_connect: Option<String>,
    fail_next_publish: Option<String>,
    stall_next_fetch: bool,
    peer: Option<(Weak<Mutex<Inner>>, Arc<Notify>)>,
}

impl MockDataLayer {
    /// Create a standalone mock layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create two linked layers sharing one asset store.
    ///
    /// A publish on either side surfaces as a `Changed` batch on the other,
    /// subject to duplicate suppression.
    pub fn pair() -> (Self, Self) {
        let a = Self::new();
        let b = Self::new();
        {
            let mut a_inner = a.inner.lock().unwrap();
            let mut b_inner = b.inner.lock().unwrap();
            b_inner.assets = Arc::clone(&a_inner.assets);
            a_inner.peer = Some((Arc::downgrade(&b.inner), Arc::clone(&b.wakeup)));
            b_inner.peer = Some((Arc::downgrade(&a.inner), Arc::clone(&a.wakeup)));
        }
        (a, b)
    }

    /// Queue a batch to be returned by a later `next_batch` call.
    pub fn queue_batch(&self, batch: Vec<SyncEvent>) {
        self.inner.lock().unwrap().batch_queue.push_back(batch);
        self.wakeup.notify_one();
    }

    /// All maps that were published, in order.
    pub fn published(&self) -> Vec<(String, DataMap)> {
        self.inner.lock().unwrap().published.clone()
    }

    /// Whether the change subscription is currently registered.
    pub fn subscribed(&self) -> bool {
        self.inner.lock().unwrap().subscribed
    }

    /// Insert asset bytes under a known token.
    pub fn seed_asset(&self, token: AssetToken, bytes: Vec<u8>) {
        let assets = {
            let inner = self.inner.lock().unwrap();
            Arc::clone(&inner.assets)
        };
        assets.lock().unwrap().insert(token, bytes);
    }

    /// Cause the next `connect()` to fail with the given error.
    pub fn fail_next_connect(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_connect = Some(error.to_string());
    }

    /// Cause the next `publish()` to fail with the given error.
    pub fn fail_next_publish(&self, error: &str) {
        self.inner.lock().unwrap().fail_next_publish = Some(error.to_string());
    }

    /// Make the next `fetch_asset()` hang forever (for timeout tests).
    pub fn stall_next_fetch(&self) {
        self.inner.lock().unwrap().stall_next_fetch = true;
    }

    fn deliver_to_peer(&self, path: &str, payload: DataMap) {
        // Grab the peer handle without holding our own lock while touching
        // the peer's.
        let peer = {
            let inner = self.inner.lock().unwrap();
            inner.peer.clone()
        };
        if let Some((peer_inner, peer_wakeup)) = peer {
            if let Some(peer_inner) = peer_inner.upgrade() {
                peer_inner
                    .lock()
                    .unwrap()
                    .batch_queue
                    .push_back(vec![SyncEvent::changed(path, payload)]);
                peer_wakeup.notify_one();
            }
        }
    }
}

impl Clone for MockDataLayer {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            wakeup: Arc::clone(&self.wakeup),
        }
    }
}

#[async_trait]
impl DataLayer for MockDataLayer {
    async fn connect(&self) -> Result<(), LayerError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_connect.take() {
            return Err(LayerError::ConnectionFailed(error));
        }
        inner.connected = true;
        Ok(())
    }

    async fn publish(&self, path: &str, payload: DataMap) -> Result<(), LayerError> {
        let duplicate = {
            let mut inner = self.inner.lock().unwrap();
            if !inner.connected {
                return Err(LayerError::NotConnected);
            }
            if let Some(error) = inner.fail_next_publish.take() {
                return Err(LayerError::PublishFailed(error));
            }
            inner.published.push((path.to_string(), payload.clone()));
            let duplicate = inner.last_values.get(path) == Some(&payload);
            if !duplicate {
                inner.last_values.insert(path.to_string(), payload.clone());
            }
            duplicate
        };
        // Identical payloads are accepted but generate no change event.
        if !duplicate {
            self.deliver_to_peer(path, payload);
        }
        Ok(())
    }

    async fn subscribe(&self) -> Result<(), LayerError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.connected {
            return Err(LayerError::NotConnected);
        }
        inner.subscribed = true;
        drop(inner);
        self.wakeup.notify_one();
        Ok(())
    }

    async fn unsubscribe(&self) -> Result<(), LayerError> {
        self.inner.lock().unwrap().subscribed = false;
        Ok(())
    }

    async fn next_batch(&self) -> Result<Vec<SyncEvent>, LayerError> {
        loop {
            {
                let mut inner = self.inner.lock().unwrap();
                if !inner.connected {
                    return Err(LayerError::Closed);
                }
                if inner.subscribed {
                    if let Some(batch) = inner.batch_queue.pop_front() {
                        return Ok(batch);
                    }
                }
            }
            self.wakeup.notified().await;
        }
    }

    async fn fetch_asset(&self, token: &AssetToken) -> Result<Vec<u8>, LayerError> {
        let (stalled, assets) = {
            let mut inner = self.inner.lock().unwrap();
            let stalled = inner.stall_next_fetch;
            inner.stall_next_fetch = false;
            (stalled, Arc::clone(&inner.assets))
        };
        if stalled {
            // Simulates a peer that never answers; callers bound this with
            // a timeout.
            return std::future::pending().await;
        }
        let bytes = assets.lock().unwrap().get(token).cloned();
        bytes.ok_or(LayerError::AssetUnavailable)
    }

    async fn store_asset(&self, bytes: Vec<u8>) -> Result<AssetToken, LayerError> {
        let assets = {
            let inner = self.inner.lock().unwrap();
            Arc::clone(&inner.assets)
        };
        let token = AssetToken::new();
        assets.lock().unwrap().insert(token, bytes);
        Ok(token)
    }

    fn is_connected(&self) -> bool {
        self.inner.lock().unwrap().connected
    }

    async fn close(&self) -> Result<(), LayerError> {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.connected = false;
            inner.subscribed = false;
        }
        self.wakeup.notify_one();
        Ok(())
    }
}
