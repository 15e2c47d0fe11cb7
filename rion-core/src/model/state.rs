use std::fmt;

/// Lifecycle of a signaling session.
///
/// `Idle → Negotiating → GatheringCandidates → ExchangingWithServer → Connected → Closed`,
/// with `Renegotiating` reachable from `Connected` for subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Idle,
    Negotiating,
    GatheringCandidates,
    ExchangingWithServer,
    Connected,
    Renegotiating,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Negotiating => "negotiating",
            SessionState::GatheringCandidates => "gathering-candidates",
            SessionState::ExchangingWithServer => "exchanging-with-server",
            SessionState::Connected => "connected",
            SessionState::Renegotiating => "renegotiating",
            SessionState::Closed => "closed",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ICE connectivity as reported by the negotiation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityState {
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

impl fmt::Display for ConnectivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectivityState::New => "new",
            ConnectivityState::Checking => "checking",
            ConnectivityState::Connected => "connected",
            ConnectivityState::Completed => "completed",
            ConnectivityState::Disconnected => "disconnected",
            ConnectivityState::Failed => "failed",
            ConnectivityState::Closed => "closed",
        };
        f.write_str(s)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl From<webrtc::ice_transport::ice_connection_state::RTCIceConnectionState>
    for ConnectivityState
{
    fn from(s: webrtc::ice_transport::ice_connection_state::RTCIceConnectionState) -> Self {
        use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState as Ice;

        match s {
            Ice::Unspecified | Ice::New => ConnectivityState::New,
            Ice::Checking => ConnectivityState::Checking,
            Ice::Connected => ConnectivityState::Connected,
            Ice::Completed => ConnectivityState::Completed,
            Ice::Disconnected => ConnectivityState::Disconnected,
            Ice::Failed => ConnectivityState::Failed,
            Ice::Closed => ConnectivityState::Closed,
        }
    }
}
