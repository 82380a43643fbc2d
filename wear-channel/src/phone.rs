//! Phone-side relay: answers refresh requests with fresh weather.
//!
//! The wearable never fetches weather itself - it publishes a request-path
//! write, and this relay reacts by invoking the external weather provider
//! and publishing a payload-path map with temperatures and the icon asset.

use async_trait::async_trait;
use wear_types::{paths, DataMap, SyncError, SyncEvent};

use crate::layer::{DataLayer, LayerError};

/// One weather reading from the external provider.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    /// High temperature.
    pub high: f64,
    /// Low temperature.
    pub low: f64,
    /// Encoded icon image bytes, if the provider has one.
    pub icon: Option<Vec<u8>>,
}

/// The phone's weather source - external to this core.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Perform an immediate refresh and return the current reading.
    async fn refresh(&self) -> Result<WeatherReport, SyncError>;
}

/// Listens for request-path events and publishes payload-path updates.
pub struct PhoneRelay<L: DataLayer, P: WeatherProvider> {
    layer: L,
    provider: P,
}

impl<L: DataLayer, P: WeatherProvider> PhoneRelay<L, P> {
    /// Create a relay over the phone's data layer and weather source.
    pub fn new(layer: L, provider: P) -> Self {
        Self { layer, provider }
    }

    /// Connect the phone side and register for change events.
    pub async fn start(&self) -> Result<(), SyncError> {
        self.layer.connect().await.map_err(SyncError::from)?;
        self.layer.subscribe().await.map_err(SyncError::from)?;
        tracing::info!("phone relay listening");
        Ok(())
    }

    /// Handle one delivered batch. Returns whether a payload was published.
    ///
    /// Only `Changed` events on the request path trigger a refresh; several
    /// requests in one batch collapse into a single publish.
    pub async fn handle_batch(&self, batch: &[SyncEvent]) -> Result<bool, SyncError> {
        let requested = batch
            .iter()
            .any(|event| event.is_changed_on(paths::REQUEST_PATH));
        if !requested {
            return Ok(false);
        }
        tracing::debug!("refresh request received");
        self.publish_current().await?;
        Ok(true)
    }

    /// Run until the layer closes, answering every request batch.
    pub async fn run(&self) -> Result<(), SyncError> {
        loop {
            match self.layer.next_batch().await {
                Ok(batch) => {
                    if let Err(e) = self.handle_batch(&batch).await {
                        tracing::warn!("refresh publish failed: {e}");
                    }
                }
                Err(LayerError::Closed) => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn publish_current(&self) -> Result<(), SyncError> {
        let report = self.provider.refresh().await?;

        let mut map = DataMap::new();
        map.put_f64(paths::FIELD_HIGH, report.high)
            .put_f64(paths::FIELD_LOW, report.low)
            // Same-looking weather must still propagate, so payloads carry
            // a nonce just as requests do.
            .put_str(paths::FIELD_NONCE, uuid::Uuid::new_v4().to_string());
        if let Some(icon) = report.icon {
            let token = self.layer.store_asset(icon).await?;
            map.put_asset(paths::FIELD_ICON, token);
        }

        self.layer.publish(paths::WEATHER_PATH, map).await?;
        tracing::info!(
            "weather published (high {:.1}, low {:.1})",
            report.high,
            report.low
        );
        Ok(())
    }
}
