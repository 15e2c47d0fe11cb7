use crate::engine::{LocalStream, NegotiationEngine};
use rion_core::{Error, PeerAnnouncement};

/// A remote track together with the publisher it belongs to.
pub struct RemoteMedia<R> {
    pub stream_id: String,
    pub track_id: String,
    pub track: R,
    pub peer: PeerAnnouncement,
}

/// Observer registered with a session at construction.
///
/// Every callback defaults to a no-op. Each one runs on the session task and
/// fires at most once per logical event; none fire once the session is closed.
pub trait EventSink<E: NegotiationEngine>: Send + Sync {
    /// The stream handed to `publish` is attached and about to be negotiated.
    fn on_local_stream_ready(&self, _stream: &LocalStream<E::LocalTrack>) {}

    /// Subscribers only.
    fn on_remote_stream_received(&self, _media: RemoteMedia<E::RemoteTrack>) {}

    fn on_peer_joined(&self, _peer: &PeerAnnouncement) {}

    fn on_peer_left(&self, _peer: &PeerAnnouncement) {}

    fn on_error(&self, _error: &Error) {}
}

/// Sink that ignores everything.
pub struct NoopSink;

impl<E: NegotiationEngine> EventSink<E> for NoopSink {}
