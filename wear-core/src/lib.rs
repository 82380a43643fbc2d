//! # wear-core
//!
//! Pure logic for wearsync (no I/O, instant tests).
//!
//! This crate implements the state machines and frame math for the wearable
//! weather face without any network, clock, or canvas I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (data layer, timers, canvas) is performed by `wear-channel`
//! and `wear-face`, which interpret the actions and layouts produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod frame;
pub mod link;
pub mod weather;

pub use frame::{
    DisplayMode, FrameConfig, Segment, SegmentStyle, TimerState, TICK_PERIOD_MS,
};
pub use link::{LinkAction, LinkEvent, LinkState};
pub use weather::WeatherSnapshot;
