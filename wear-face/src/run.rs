//! Single-task engine loop.
//!
//! Everything that mutates the engine arrives as an [`EngineMessage`] on
//! one channel and is handled on one task, so the snapshot and the frame
//! config never need locking. Host events (visibility, ambient, shape),
//! timer ticks, delivered batches and fetched icons all funnel through
//! here; only asset fetches run on side tasks, reporting back as messages.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use wear_channel::{ChannelClient, DataLayer};
use wear_core::DisplayMode;
use wear_types::{AssetToken, SyncEvent};

use crate::clock::Clock;
use crate::engine::FaceEngine;
use crate::lifecycle::Lifecycle;
use crate::render::Renderer;

/// One unit of work for the engine task.
#[derive(Debug)]
pub enum EngineMessage {
    /// Whole-second redraw tick.
    Tick,
    /// A batch of change events delivered by the channel.
    SyncBatch(Vec<SyncEvent>),
    /// Icon asset bytes fetched off the render path.
    IconFetched(Vec<u8>),
    /// The face became visible (true) or hidden (false).
    Visibility(bool),
    /// The host entered (true) or left (false) ambient mode.
    AmbientChanged(bool),
    /// Display capability flags from the host.
    PropertiesChanged {
        /// Low-bit ambient support.
        low_bit_ambient: bool,
    },
    /// Device shape from the host's window insets.
    InsetsChanged {
        /// Round vs rectangular.
        round: bool,
    },
    /// The system time zone changed; the next frame rereads it.
    TimezoneChanged,
    /// Tear everything down and exit the loop.
    Shutdown,
}

/// Owns the engine and lifecycle and drains the message channel.
pub struct EngineLoop<R: Renderer, L: DataLayer + 'static> {
    engine: FaceEngine<R>,
    lifecycle: Lifecycle<L>,
    clock: Arc<dyn Clock>,
    tx: UnboundedSender<EngineMessage>,
    rx: UnboundedReceiver<EngineMessage>,
}

impl<R: Renderer, L: DataLayer + 'static> EngineLoop<R, L> {
    /// Wire up an engine loop over a renderer, a channel client and a clock.
    pub fn new(renderer: R, client: Arc<ChannelClient<L>>, clock: Arc<dyn Clock>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let lifecycle = Lifecycle::new(client, Arc::clone(&clock), tx.clone());
        Self {
            engine: FaceEngine::new(renderer),
            lifecycle,
            clock,
            tx,
            rx,
        }
    }

    /// A sender for injecting host events into the loop.
    pub fn sender(&self) -> UnboundedSender<EngineMessage> {
        self.tx.clone()
    }

    /// Drain messages until [`EngineMessage::Shutdown`] or all senders drop.
    pub async fn run(mut self) {
        while let Some(message) = self.rx.recv().await {
            if !self.handle(message).await {
                break;
            }
        }
        tracing::info!("engine loop exited");
    }

    /// Handle one message. Returns false when the loop should exit.
    async fn handle(&mut self, message: EngineMessage) -> bool {
        match message {
            EngineMessage::Tick => {
                if self.lifecycle.is_visible() {
                    self.draw();
                }
            }
            EngineMessage::SyncBatch(batch) => {
                if !self.lifecycle.is_visible() {
                    tracing::debug!("dropping {} event(s) while hidden", batch.len());
                    return true;
                }
                let now_ms = self.clock.now().millis;
                let mut redraw = false;
                for event in &batch {
                    let (changed, fetch) = self.engine.apply_event(event, now_ms);
                    redraw |= changed;
                    if let Some(token) = fetch {
                        self.spawn_fetch(token);
                    }
                }
                if redraw {
                    self.draw();
                }
            }
            EngineMessage::IconFetched(bytes) => {
                if self.engine.install_icon(&bytes) && self.lifecycle.is_visible() {
                    self.draw();
                }
            }
            EngineMessage::Visibility(true) => {
                self.lifecycle.on_visible(self.engine.mode()).await;
                self.draw();
            }
            EngineMessage::Visibility(false) => {
                self.lifecycle.on_hidden(self.engine.mode()).await;
            }
            EngineMessage::AmbientChanged(ambient) => {
                let mode = if ambient {
                    DisplayMode::Ambient
                } else {
                    DisplayMode::Interactive
                };
                if self.engine.set_mode(mode) {
                    self.lifecycle.on_mode_changed(mode);
                    if self.lifecycle.is_visible() {
                        self.draw();
                    }
                }
            }
            EngineMessage::PropertiesChanged { low_bit_ambient } => {
                self.engine.set_low_bit_ambient(low_bit_ambient);
            }
            EngineMessage::InsetsChanged { round } => {
                self.engine.set_round(round);
                if self.lifecycle.is_visible() {
                    self.draw();
                }
            }
            EngineMessage::TimezoneChanged => {
                if self.lifecycle.is_visible() {
                    self.draw();
                }
            }
            EngineMessage::Shutdown => {
                self.lifecycle.shutdown().await;
                return false;
            }
        }
        true
    }

    fn draw(&mut self) {
        let now = self.clock.now();
        self.engine.draw_frame(&now);
    }

    fn spawn_fetch(&self, token: AssetToken) {
        let client = Arc::clone(self.lifecycle.client());
        let tx = self.tx.clone();
        tokio::spawn(async move {
            match client.fetch_asset(&token).await {
                Ok(bytes) => {
                    let _ = tx.send(EngineMessage::IconFetched(bytes));
                }
                Err(error) => tracing::warn!("icon fetch failed for {token}: {error}"),
            }
        });
    }
}
