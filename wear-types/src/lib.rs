//! # wear-types
//!
//! Wire format types for the wearsync phone/wearable weather channel.
//!
//! This crate provides the foundational types used across all wearsync crates:
//! - [`paths`] - Canonical channel path and field-name constants
//! - [`Value`], [`DataMap`] - Typed key/value payloads with typed getters
//! - [`EventKind`], [`SyncEvent`] - Change events delivered by the transport
//! - [`AssetToken`] - Opaque handle to a binary resource
//! - [`WeatherUpdate`] - Per-field extraction of a payload-path event
//! - [`SyncError`] - Error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

mod asset;
mod error;
mod event;
pub mod paths;
mod value;

pub use asset::AssetToken;
pub use error::SyncError;
pub use event::{EventKind, SyncEvent, WeatherUpdate};
pub use value::{DataMap, Value};
