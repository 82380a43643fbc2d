//! Visibility and timer lifecycle.
//!
//! Connection lifetime tracks visibility: becoming visible connects the
//! channel and starts pumping event batches into the engine loop, becoming
//! hidden tears both down. The redraw timer runs only while the face is
//! visible and interactive; ambient frames are driven by the host's own
//! minute cadence, so no timer is needed there.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use wear_channel::{ChannelClient, DataLayer};
use wear_core::{frame, DisplayMode, TimerState};

use crate::clock::Clock;
use crate::run::EngineMessage;

/// Re-registration hook for time-zone change notifications.
///
/// Hosts that can observe zone changes register while the face is visible
/// and deliver them as [`EngineMessage::TimezoneChanged`].
pub trait TimeZoneWatcher: Send {
    /// Start observing zone changes.
    fn register(&mut self);
    /// Stop observing zone changes.
    fn unregister(&mut self);
}

/// Watcher for hosts with no zone-change source.
pub struct NoopWatcher;

impl TimeZoneWatcher for NoopWatcher {
    fn register(&mut self) {}
    fn unregister(&mut self) {}
}

/// Whole-second redraw timer.
///
/// Each iteration sleeps to the next second boundary and sends a tick, so
/// the colon blink stays phase-aligned with the wall clock regardless of
/// how long frames take to draw.
pub struct RedrawTimer {
    handle: Option<JoinHandle<()>>,
}

impl RedrawTimer {
    /// A stopped timer.
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Whether the tick task is alive.
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start (or restart) the tick task.
    pub fn restart(&mut self, tx: UnboundedSender<EngineMessage>, clock: Arc<dyn Clock>) {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            loop {
                let delay = frame::next_tick_delay_ms(clock.now().millis);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                if tx.send(EngineMessage::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop the tick task. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Default for RedrawTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RedrawTimer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Ties channel connection, batch reader, zone watcher and redraw timer to
/// the face's visibility.
pub struct Lifecycle<L: DataLayer + 'static> {
    client: Arc<ChannelClient<L>>,
    clock: Arc<dyn Clock>,
    tx: UnboundedSender<EngineMessage>,
    timer: RedrawTimer,
    reader: Option<JoinHandle<()>>,
    watcher: Box<dyn TimeZoneWatcher>,
    visible: bool,
}

impl<L: DataLayer + 'static> Lifecycle<L> {
    /// A hidden lifecycle over a channel client and a clock.
    pub fn new(
        client: Arc<ChannelClient<L>>,
        clock: Arc<dyn Clock>,
        tx: UnboundedSender<EngineMessage>,
    ) -> Self {
        Self {
            client,
            clock,
            tx,
            timer: RedrawTimer::new(),
            reader: None,
            watcher: Box::new(NoopWatcher),
            visible: false,
        }
    }

    /// Install a zone-change watcher in place of the no-op default.
    pub fn with_watcher(mut self, watcher: Box<dyn TimeZoneWatcher>) -> Self {
        self.watcher = watcher;
        self
    }

    /// The channel client driven by this lifecycle.
    pub fn client(&self) -> &Arc<ChannelClient<L>> {
        &self.client
    }

    /// Whether the face is currently visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the redraw timer is running.
    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// The face became visible: connect, start reading batches, watch the
    /// zone, and re-evaluate the timer. A failed connect is logged and left
    /// for the next visibility edge to retry.
    pub async fn on_visible(&mut self, mode: DisplayMode) {
        if self.visible {
            return;
        }
        self.visible = true;
        self.watcher.register();
        match self.client.connect().await {
            Ok(()) => self.spawn_reader(),
            Err(error) => tracing::warn!("channel connect failed: {error}"),
        }
        self.update_timer(mode);
    }

    /// The face was hidden: stop the reader, disconnect, unregister the
    /// watcher, and stop the timer.
    pub async fn on_hidden(&mut self, mode: DisplayMode) {
        if !self.visible {
            return;
        }
        self.visible = false;
        self.watcher.unregister();
        if let Some(handle) = self.reader.take() {
            handle.abort();
        }
        self.client.disconnect().await;
        self.update_timer(mode);
    }

    /// Display mode flipped; the timer may need starting or stopping.
    pub fn on_mode_changed(&mut self, mode: DisplayMode) {
        self.update_timer(mode);
    }

    /// Tear down all background tasks.
    pub async fn shutdown(&mut self) {
        let mode = DisplayMode::Ambient;
        self.on_hidden(mode).await;
        self.timer.stop();
    }

    fn spawn_reader(&mut self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.reader = Some(tokio::spawn(async move {
            loop {
                match client.next_batch().await {
                    Ok(batch) => {
                        if tx.send(EngineMessage::SyncBatch(batch)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        tracing::debug!("event stream ended: {error}");
                        break;
                    }
                }
            }
        }));
    }

    fn update_timer(&mut self, mode: DisplayMode) {
        let state = TimerState::update(self.visible, mode, self.clock.now().millis);
        if state.running {
            if !self.timer.is_running() {
                tracing::debug!("redraw timer on, next tick at {:?}", state.next_deadline_ms);
                self.timer.restart(self.tx.clone(), Arc::clone(&self.clock));
            }
        } else {
            self.timer.stop();
        }
    }
}
