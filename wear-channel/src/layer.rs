//! Data layer abstraction for wearsync.
//!
//! This module provides a pluggable boundary to the OS's replicated
//! key/value store (the real platform layer, or a mock for testing).
//!
//! # Design
//!
//! The layer is path-addressed and eventually consistent: a `publish` on one
//! device surfaces as a batch of change events on the peer, with
//! at-most-one-latest-value-wins semantics per path. Binary assets travel as
//! opaque tokens resolved through a separate fetch call.

use async_trait::async_trait;
use thiserror::Error;
use wear_types::{AssetToken, DataMap, SyncEvent};

/// Data layer errors.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Not connected.
    #[error("not connected")]
    NotConnected,

    /// The layer was closed while waiting for events.
    #[error("layer closed")]
    Closed,

    /// A write was rejected.
    #[error("publish failed: {0}")]
    PublishFailed(String),

    /// The requested asset has no bytes behind it.
    #[error("asset unavailable")]
    AssetUnavailable,
}

/// The replicated key/value channel between the two devices.
///
/// Implementations handle the underlying replication mechanism; this core
/// only publishes maps, consumes change batches, and resolves asset tokens.
#[async_trait]
pub trait DataLayer: Send + Sync {
    /// Establish the connection to the peer/store.
    async fn connect(&self) -> Result<(), LayerError>;

    /// Write a payload map to a path.
    ///
    /// The store suppresses writes identical to the current value at the
    /// path - callers that need guaranteed propagation tag the map with a
    /// fresh nonce.
    async fn publish(&self, path: &str, payload: DataMap) -> Result<(), LayerError>;

    /// Register for change events. Until registered, no batches are
    /// delivered.
    async fn subscribe(&self) -> Result<(), LayerError>;

    /// Remove the change-event registration.
    async fn unsubscribe(&self) -> Result<(), LayerError>;

    /// Wait for the next batch of change events.
    ///
    /// The callback model of the platform maps to one awaited batch per
    /// call; events inside a batch preserve write order.
    async fn next_batch(&self) -> Result<Vec<SyncEvent>, LayerError>;

    /// Resolve an asset token to its bytes.
    ///
    /// May block for a network round trip - callers bound it with a timeout
    /// and keep it off the render path.
    async fn fetch_asset(&self, token: &AssetToken) -> Result<Vec<u8>, LayerError>;

    /// Store bytes and mint a token for them (phone side).
    async fn store_asset(&self, bytes: Vec<u8>) -> Result<AssetToken, LayerError>;

    /// Check if currently connected.
    fn is_connected(&self) -> bool;

    /// Close the connection.
    async fn close(&self) -> Result<(), LayerError>;
}
