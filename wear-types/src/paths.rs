//! Canonical channel paths and payload field names.
//!
//! Both ends of the channel use these constants. The original design carried
//! a request-path literal on the wearable that never matched the payload-path
//! literal checked on receipt; keeping a single constant per logical path in
//! the shared types crate closes that defect class.

/// Request path: the wearable writes here to ask the phone for fresh data.
pub const REQUEST_PATH: &str = "/weather/request";

/// Payload path: the phone writes temperature + icon here for the wearable.
pub const WEATHER_PATH: &str = "/weather/info";

/// High temperature field (f64).
pub const FIELD_HIGH: &str = "high";

/// Low temperature field (f64).
pub const FIELD_LOW: &str = "low";

/// Weather icon field (asset token).
pub const FIELD_ICON: &str = "icon";

/// Freshness nonce field (string).
///
/// The replicated store suppresses writes whose payload is identical to the
/// current value at the path; a unique nonce forces every write to propagate
/// as a change event on the peer.
pub const FIELD_NONCE: &str = "nonce";

/// Whether a path is one of the two paths this protocol owns.
///
/// Unrelated apps share the replicated namespace, so events on other paths
/// are a normal occurrence and get ignored, not rejected.
pub fn is_known(path: &str) -> bool {
    path == REQUEST_PATH || path == WEATHER_PATH
}
