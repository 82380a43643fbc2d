//! # wear-channel
//!
//! Client for the replicated key/value channel between the phone and the
//! wearable.
//!
//! ## Architecture
//!
//! [`ChannelClient`] uses the pure link state machine (from wear-core) for
//! connection logic and interprets its actions to perform actual I/O via the
//! [`DataLayer`] trait.
//!
//! ```text
//! Display engine → ChannelClient → DataLayer → replicated store
//!                       ↓
//!                  wear-core (pure state machine)
//! ```
//!
//! The phone side of the protocol lives here too: [`PhoneRelay`] answers
//! request-path events by publishing fresh weather through the same trait.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod layer;
pub mod mock;
pub mod phone;

pub use client::{ChannelClient, FETCH_TIMEOUT};
pub use layer::{DataLayer, LayerError};
pub use mock::MockDataLayer;
pub use phone::{PhoneRelay, WeatherProvider, WeatherReport};
