//! Error types for wearsync.

use thiserror::Error;

/// Errors that can occur in wearsync operations.
///
/// `ConnectionUnavailable` and `FetchTimeout` are non-fatal by policy:
/// rendering continues with stale or default data and the error is logged,
/// never surfaced to a user-facing channel.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The data layer could not be reached.
    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    /// Not connected to the data layer.
    #[error("not connected")]
    NotConnected,

    /// A bounded asset fetch did not complete within its deadline.
    #[error("asset fetch timed out")]
    FetchTimeout,

    /// A payload field is present but has the wrong type.
    #[error("malformed payload: field `{field}`")]
    MalformedPayload {
        /// The offending field name.
        field: String,
    },

    /// An event arrived on a path this protocol does not own.
    ///
    /// Normal in a shared replicated namespace; callers ignore it.
    #[error("unknown path: {0}")]
    UnknownPath(String),

    /// MessagePack serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[source] rmp_serde::encode::Error),

    /// MessagePack deserialization failed.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] rmp_serde::decode::Error),

    /// Transport-level failure.
    #[error("transport error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = SyncError::MalformedPayload {
            field: "high".into(),
        };
        assert_eq!(err.to_string(), "malformed payload: field `high`");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SyncError>();
    }
}
