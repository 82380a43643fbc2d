//! Connection state machine for the device-to-device link.
//!
//! This module provides a pure, side-effect-free state machine for the
//! wearable's connection to the replicated data layer. The machine takes
//! events as input and produces a new state plus a list of actions to
//! execute.
//!
//! The actual I/O (connecting, subscribing, publishing the refresh request)
//! is performed by wear-channel, not by this module. There is deliberately
//! no reconnect ladder: a failed or suspended link stays down until the next
//! visibility-on cycle requests a fresh connect.

/// Link state machine - NO I/O, just state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Not connected to the data layer.
    Disconnected,
    /// Connection attempt in progress.
    Connecting,
    /// Connected; change events flow and writes are accepted.
    Connected,
    /// Connection failed or was suspended; held until the next connect.
    Failed {
        /// Why the link went down.
        reason: String,
    },
}

impl LinkState {
    /// Create a new state machine in the Disconnected state.
    pub fn new() -> Self {
        Self::Disconnected
    }

    /// Process an event and return the new state plus actions to execute.
    ///
    /// Pure function - the caller (wear-channel) executes the actions.
    pub fn on_event(self, event: LinkEvent) -> (Self, Vec<LinkAction>) {
        match (self, event) {
            // From Disconnected
            (Self::Disconnected, LinkEvent::ConnectRequested) => {
                (Self::Connecting, vec![LinkAction::Connect])
            }

            // From Connecting
            //
            // A successful connect registers the change subscription first and
            // then asks the peer for fresh data, in that order - requesting
            // before subscribing could miss the reply.
            (Self::Connecting, LinkEvent::ConnectSucceeded) => (
                Self::Connected,
                vec![LinkAction::Subscribe, LinkAction::PublishRequest],
            ),
            (Self::Connecting, LinkEvent::ConnectFailed { reason }) => {
                (Self::Failed { reason }, vec![])
            }
            (Self::Connecting, LinkEvent::DisconnectRequested) => {
                (Self::Disconnected, vec![LinkAction::Disconnect])
            }

            // From Connected
            (Self::Connected, LinkEvent::Suspended { reason }) => {
                (Self::Failed { reason }, vec![])
            }
            (Self::Connected, LinkEvent::DisconnectRequested) => (
                Self::Disconnected,
                vec![LinkAction::Unsubscribe, LinkAction::Disconnect],
            ),
            // connect() is idempotent while already up
            (Self::Connected, LinkEvent::ConnectRequested) => (Self::Connected, vec![]),

            // From Failed - retry arrives as the next visibility-on connect
            (Self::Failed { .. }, LinkEvent::ConnectRequested) => {
                (Self::Connecting, vec![LinkAction::Connect])
            }
            (Self::Failed { .. }, LinkEvent::DisconnectRequested) => {
                (Self::Disconnected, vec![])
            }

            // disconnect() is idempotent while already down
            (Self::Disconnected, LinkEvent::DisconnectRequested) => {
                (Self::Disconnected, vec![])
            }

            // Invalid transitions - stay in current state
            (state, _) => (state, vec![]),
        }
    }

    /// Check if currently connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

/// Events that can occur in the link lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Visibility-on (or caller) requested a connection.
    ConnectRequested,
    /// Transport connection succeeded.
    ConnectSucceeded,
    /// Transport connection failed.
    ConnectFailed {
        /// Error message describing the failure.
        reason: String,
    },
    /// An established connection was suspended by the transport.
    Suspended {
        /// Reason reported by the transport.
        reason: String,
    },
    /// Visibility-off (or caller) requested a disconnect.
    DisconnectRequested,
}

/// Actions to be executed by wear-channel.
///
/// These are instructions, not side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Initiate the transport connection.
    Connect,
    /// Register the change-event subscription.
    Subscribe,
    /// Publish a nonce-tagged refresh request to the peer.
    PublishRequest,
    /// Remove the change-event subscription.
    Unsubscribe,
    /// Close the transport connection.
    Disconnect,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disconnected() {
        assert!(matches!(LinkState::new(), LinkState::Disconnected));
    }

    #[test]
    fn connect_request_transitions_to_connecting() {
        let (state, actions) = LinkState::Disconnected.on_event(LinkEvent::ConnectRequested);

        assert!(matches!(state, LinkState::Connecting));
        assert_eq!(actions, vec![LinkAction::Connect]);
    }

    #[test]
    fn connect_success_subscribes_then_requests() {
        let (state, actions) = LinkState::Connecting.on_event(LinkEvent::ConnectSucceeded);

        assert!(matches!(state, LinkState::Connected));
        // Order matters: subscribe before asking for data.
        assert_eq!(
            actions,
            vec![LinkAction::Subscribe, LinkAction::PublishRequest]
        );
    }

    #[test]
    fn connect_failure_is_terminal_until_next_request() {
        let (state, actions) = LinkState::Connecting.on_event(LinkEvent::ConnectFailed {
            reason: "no peer".into(),
        });

        assert!(matches!(state, LinkState::Failed { .. }));
        // No retry action: the next visibility-on drives the retry.
        assert!(actions.is_empty());
    }

    #[test]
    fn failed_link_reconnects_on_request() {
        let state = LinkState::Failed {
            reason: "no peer".into(),
        };
        let (state, actions) = state.on_event(LinkEvent::ConnectRequested);

        assert!(matches!(state, LinkState::Connecting));
        assert_eq!(actions, vec![LinkAction::Connect]);
    }

    #[test]
    fn suspension_takes_link_down_without_actions() {
        let (state, actions) = LinkState::Connected.on_event(LinkEvent::Suspended {
            reason: "peer out of range".into(),
        });

        assert!(matches!(state, LinkState::Failed { reason } if reason == "peer out of range"));
        assert!(actions.is_empty());
    }

    #[test]
    fn disconnect_from_connected_unsubscribes_first() {
        let (state, actions) = LinkState::Connected.on_event(LinkEvent::DisconnectRequested);

        assert!(matches!(state, LinkState::Disconnected));
        assert_eq!(
            actions,
            vec![LinkAction::Unsubscribe, LinkAction::Disconnect]
        );
    }

    #[test]
    fn connect_is_idempotent_when_connected() {
        let (state, actions) = LinkState::Connected.on_event(LinkEvent::ConnectRequested);
        assert!(matches!(state, LinkState::Connected));
        assert!(actions.is_empty());
    }

    #[test]
    fn disconnect_is_idempotent_when_disconnected() {
        let (state, actions) = LinkState::Disconnected.on_event(LinkEvent::DisconnectRequested);
        assert!(matches!(state, LinkState::Disconnected));
        assert!(actions.is_empty());
    }

    #[test]
    fn disconnect_while_connecting_aborts() {
        let (state, actions) = LinkState::Connecting.on_event(LinkEvent::DisconnectRequested);
        assert!(matches!(state, LinkState::Disconnected));
        assert_eq!(actions, vec![LinkAction::Disconnect]);
    }

    #[test]
    fn invalid_transitions_stay_put() {
        let (state, actions) = LinkState::Disconnected.on_event(LinkEvent::ConnectSucceeded);
        assert!(matches!(state, LinkState::Disconnected));
        assert!(actions.is_empty());

        let (state, actions) = LinkState::Connected.on_event(LinkEvent::ConnectSucceeded);
        assert!(matches!(state, LinkState::Connected));
        assert!(actions.is_empty());
    }

    #[test]
    fn is_connected_helper() {
        assert!(!LinkState::Disconnected.is_connected());
        assert!(!LinkState::Connecting.is_connected());
        assert!(LinkState::Connected.is_connected());
        assert!(!LinkState::Failed {
            reason: "x".into()
        }
        .is_connected());
    }

    #[test]
    fn visibility_cycle_round_trip() {
        // visibility-on
        let (state, _) = LinkState::new().on_event(LinkEvent::ConnectRequested);
        let (state, _) = state.on_event(LinkEvent::ConnectSucceeded);
        assert!(state.is_connected());

        // visibility-off
        let (state, _) = state.on_event(LinkEvent::DisconnectRequested);
        assert!(matches!(state, LinkState::Disconnected));

        // next visibility-on connects again
        let (state, actions) = state.on_event(LinkEvent::ConnectRequested);
        assert!(matches!(state, LinkState::Connecting));
        assert_eq!(actions, vec![LinkAction::Connect]);
    }
}
