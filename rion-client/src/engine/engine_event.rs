use bytes::Bytes;
use rion_core::ConnectivityState;

/// Events the negotiation engine relays to the session that owns it.
#[derive(Debug)]
pub enum EngineEvent<R> {
    /// ICE connectivity changed.
    ConnectivityChanged(ConnectivityState),

    /// Every local candidate has been gathered; the local description is final.
    CandidateGatheringComplete,

    /// A remote track arrived. `stream_id` is the publisher's full identity.
    RemoteMediaReceived {
        stream_id: String,
        track_id: String,
        track: R,
    },

    ControlOpened { label: String },

    ControlClosed { label: String },

    /// Raw payload received on a side-channel.
    MessageReceived { label: String, data: Bytes },
}
