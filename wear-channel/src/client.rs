//! ChannelClient - the wearable's connection manager.
//!
//! Drives the pure link state machine (wear-core) and interprets its actions
//! against the [`DataLayer`]: connect, register the change subscription,
//! publish the nonce-tagged refresh request, and tear everything down on
//! visibility-off. Also owns the bounded asset fetch.

use std::sync::Mutex as StdMutex;
use std::time::Duration;

use tokio::sync::Mutex;
use wear_core::{LinkAction, LinkEvent, LinkState};
use wear_types::{paths, AssetToken, DataMap, SyncError, SyncEvent};

use crate::layer::{DataLayer, LayerError};

/// Upper bound on the blocking asset-fetch path. A fetch that misses this
/// deadline is treated as unavailable, never allowed to hang its caller.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(1000);

impl From<LayerError> for SyncError {
    fn from(err: LayerError) -> Self {
        match err {
            LayerError::ConnectionFailed(e) => SyncError::ConnectionUnavailable(e),
            LayerError::NotConnected => SyncError::NotConnected,
            LayerError::Closed => SyncError::Transport("layer closed".into()),
            LayerError::PublishFailed(e) => SyncError::Transport(e),
            LayerError::AssetUnavailable => {
                SyncError::ConnectionUnavailable("asset unavailable".into())
            }
        }
    }
}

/// The wearable's channel client.
///
/// Owns the link state machine; all transitions go through
/// [`drive`](Self::drive) so the machine stays the single source of truth.
pub struct ChannelClient<L: DataLayer> {
    layer: L,
    state: Mutex<LinkState>,
    last_nonce: StdMutex<Option<String>>,
}

impl<L: DataLayer> ChannelClient<L> {
    /// Create a client over the given data layer.
    pub fn new(layer: L) -> Self {
        Self {
            layer,
            state: Mutex::new(LinkState::new()),
            last_nonce: StdMutex::new(None),
        }
    }

    /// Connect to the data layer.
    ///
    /// Idempotent; asynchronous; never blocks a render frame. On success the
    /// change subscription is registered and a one-shot refresh request goes
    /// out with a fresh nonce. Failure is reported but not retried - the
    /// next visibility-on transition drives the retry.
    pub async fn connect(&self) -> Result<(), SyncError> {
        let actions = self.drive(LinkEvent::ConnectRequested).await;
        if !actions.contains(&LinkAction::Connect) {
            // Already connected (or mid-connect); nothing to do.
            return Ok(());
        }

        match self.layer.connect().await {
            Ok(()) => {
                tracing::info!("data layer connected");
                let actions = self.drive(LinkEvent::ConnectSucceeded).await;
                match self.run_actions(actions).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        // A failed subscribe or request leaves the link
                        // unusable; the machine must not report Connected.
                        tracing::warn!("link setup failed: {e}");
                        self.drive(LinkEvent::Suspended {
                            reason: e.to_string(),
                        })
                        .await;
                        Err(e)
                    }
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!("data layer connect failed: {reason}");
                self.drive(LinkEvent::ConnectFailed {
                    reason: reason.clone(),
                })
                .await;
                Err(SyncError::ConnectionUnavailable(reason))
            }
        }
    }

    /// Disconnect from the data layer. Idempotent.
    pub async fn disconnect(&self) {
        let actions = self.drive(LinkEvent::DisconnectRequested).await;
        if let Err(e) = self.run_actions(actions).await {
            // Teardown is best-effort; the link is going away regardless.
            tracing::debug!("disconnect cleanup error: {e}");
        } else {
            tracing::info!("data layer disconnected");
        }
    }

    /// Record a transport-reported suspension.
    pub async fn suspended(&self, reason: &str) {
        tracing::warn!("data layer suspended: {reason}");
        self.drive(LinkEvent::Suspended {
            reason: reason.to_string(),
        })
        .await;
    }

    /// Check if connected.
    pub async fn is_connected(&self) -> bool {
        self.state.lock().await.is_connected()
    }

    /// Wait for the next batch of change events.
    pub async fn next_batch(&self) -> Result<Vec<SyncEvent>, SyncError> {
        Ok(self.layer.next_batch().await?)
    }

    /// Ask the peer to push fresh weather data.
    ///
    /// The request map carries only a fresh nonce: the store suppresses
    /// identical writes, and the nonce makes every request distinct.
    pub async fn request_refresh(&self) -> Result<(), SyncError> {
        let nonce = uuid::Uuid::new_v4().to_string();
        let mut map = DataMap::new();
        map.put_str(paths::FIELD_NONCE, nonce.clone());
        self.layer.publish(paths::REQUEST_PATH, map).await?;
        tracing::debug!("refresh requested (nonce {nonce})");
        *self.last_nonce.lock().unwrap() = Some(nonce);
        Ok(())
    }

    /// Resolve an asset token to its bytes, bounded by [`FETCH_TIMEOUT`].
    ///
    /// Runs off the redraw path - callers spawn it on a worker and marshal
    /// the result back to the engine.
    pub async fn fetch_asset(&self, token: &AssetToken) -> Result<Vec<u8>, SyncError> {
        match tokio::time::timeout(FETCH_TIMEOUT, self.layer.fetch_asset(token)).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => {
                tracing::warn!("asset fetch failed: {e}");
                Err(e.into())
            }
            Err(_) => {
                tracing::warn!("asset fetch timed out after {FETCH_TIMEOUT:?}");
                Err(SyncError::FetchTimeout)
            }
        }
    }

    /// The nonce of the most recent refresh request, if any.
    pub fn last_request_nonce(&self) -> Option<String> {
        self.last_nonce.lock().unwrap().clone()
    }

    /// Access the underlying layer (for testing).
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Feed one event into the state machine and collect its actions.
    async fn drive(&self, event: LinkEvent) -> Vec<LinkAction> {
        let mut state = self.state.lock().await;
        let (next, actions) = state.clone().on_event(event);
        *state = next;
        actions
    }

    /// Execute machine actions in order.
    async fn run_actions(&self, actions: Vec<LinkAction>) -> Result<(), SyncError> {
        for action in actions {
            match action {
                LinkAction::Connect => {
                    // connect() executes this inline; nothing to do here.
                }
                LinkAction::Subscribe => self.layer.subscribe().await?,
                LinkAction::PublishRequest => self.request_refresh().await?,
                LinkAction::Unsubscribe => self.layer.unsubscribe().await?,
                LinkAction::Disconnect => self.layer.close().await?,
            }
        }
        Ok(())
    }
}
