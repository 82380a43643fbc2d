//! # wear-face
//!
//! The wearable's watch-face display engine.
//!
//! A single engine task owns all mutable face state; timer ticks, change
//! batches from the data layer, asset-fetch results, and system events all
//! enter as [`EngineMessage`]s through one channel:
//!
//! ```text
//! redraw timer ──┐
//! data layer ────┼──► EngineLoop ──► FaceEngine ──► Renderer
//! fetch worker ──┤        │
//! system events ─┘   Lifecycle ──► ChannelClient
//! ```
//!
//! The [`Renderer`] and [`Clock`] traits keep the canvas and the wall clock
//! at the boundary, so every frame decision is testable with a recording
//! renderer and a manual clock.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod clock;
pub mod engine;
pub mod lifecycle;
pub mod recording;
pub mod render;
pub mod run;

pub use clock::{Clock, ManualClock, SystemClock, WallTime};
pub use engine::FaceEngine;
pub use lifecycle::{Lifecycle, NoopWatcher, RedrawTimer, TimeZoneWatcher};
pub use recording::{DrawOp, RecordingRenderer};
pub use render::{Renderer, TextStyle};
pub use run::{EngineLoop, EngineMessage};
