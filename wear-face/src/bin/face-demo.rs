//! Terminal demo of the paired weather face.
//!
//! Runs both halves in one process over paired in-memory data layers: a
//! phone relay serving canned weather, and the face engine printing each
//! composed frame to stdout.
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin face-demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing_subscriber::EnvFilter;
use wear_channel::{ChannelClient, MockDataLayer, PhoneRelay, WeatherProvider, WeatherReport};
use wear_types::SyncError;
use wearsync_face::{Clock, EngineLoop, EngineMessage, Renderer, SystemClock, TextStyle};

/// Prints each frame as indented text lines.
struct TermRenderer {
    width: f32,
}

impl Renderer for TermRenderer {
    type Image = Vec<u8>;

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.width
    }

    fn measure_text(&self, text: &str, style: TextStyle) -> f32 {
        let per_glyph = match style {
            TextStyle::Hour => 20.0,
            TextStyle::Time => 16.0,
            TextStyle::Secondary => 10.0,
        };
        text.chars().count() as f32 * per_glyph
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        match style {
            TextStyle::Hour | TextStyle::Time => 30.0,
            TextStyle::Secondary => 20.0,
        }
    }

    fn clear(&mut self, flat_black: bool) {
        let mode = if flat_black { "ambient" } else { "interactive" };
        println!("\n-- frame ({mode}) --");
    }

    fn draw_text(&mut self, text: &str, x: f32, _y: f32, _style: TextStyle, _antialias: bool) {
        let indent = (x / 10.0).max(0.0) as usize;
        println!("{:indent$}{text}", "");
    }

    fn draw_line(&mut self, x0: f32, _y0: f32, x1: f32, _y1: f32) {
        let indent = (x0 / 10.0).max(0.0) as usize;
        let dashes = ((x1 - x0) / 10.0).max(1.0) as usize;
        println!("{:indent$}{}", "", "-".repeat(dashes));
    }

    fn draw_image(&mut self, image: &Self::Image, x: f32, _y: f32) {
        let indent = (x / 10.0).max(0.0) as usize;
        println!("{:indent$}[icon {} bytes]", "", image.len());
    }

    fn image_width(&self, _image: &Self::Image) -> f32 {
        24.0
    }

    fn decode_image(&self, bytes: &[u8]) -> Option<Self::Image> {
        if bytes.is_empty() {
            None
        } else {
            Some(bytes.to_vec())
        }
    }
}

struct CannedProvider;

#[async_trait]
impl WeatherProvider for CannedProvider {
    async fn refresh(&self) -> Result<WeatherReport, SyncError> {
        Ok(WeatherReport {
            high: 74.6,
            low: 58.2,
            icon: Some(vec![0x89, 0x50, 0x4e, 0x47]),
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (wear_layer, phone_layer) = MockDataLayer::pair();

    let relay = PhoneRelay::new(phone_layer, CannedProvider);
    if let Err(error) = relay.start().await {
        tracing::error!("phone relay failed to start: {error}");
        return;
    }
    tokio::spawn(async move {
        if let Err(error) = relay.run().await {
            tracing::warn!("phone relay stopped: {error}");
        }
    });

    let client = Arc::new(ChannelClient::new(wear_layer));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let engine_loop = EngineLoop::new(TermRenderer { width: 320.0 }, client, clock);
    let tx = engine_loop.sender();
    let handle = tokio::spawn(engine_loop.run());

    let _ = tx.send(EngineMessage::Visibility(true));
    tokio::time::sleep(Duration::from_secs(3)).await;

    tracing::info!("entering ambient");
    let _ = tx.send(EngineMessage::AmbientChanged(true));
    tokio::time::sleep(Duration::from_secs(2)).await;

    tracing::info!("back to interactive");
    let _ = tx.send(EngineMessage::AmbientChanged(false));
    tokio::time::sleep(Duration::from_secs(2)).await;

    let _ = tx.send(EngineMessage::Shutdown);
    let _ = handle.await;
}
