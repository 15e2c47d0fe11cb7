use async_trait::async_trait;
use rion_core::{ControlMessage, Result, SessionDescription};
use std::sync::Arc;

/// An already-captured media stream handed over for publishing.
#[derive(Clone)]
pub struct LocalStream<T> {
    pub id: String,
    pub tracks: Vec<T>,
}

impl<T> LocalStream<T> {
    pub fn new(id: impl Into<String>, tracks: Vec<T>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }
}

/// Reliable, ordered side-channel negotiated together with the media.
#[async_trait]
pub trait ControlChannel: Send + Sync {
    fn label(&self) -> &str;

    async fn send(&self, message: &ControlMessage) -> Result<()>;
}

/// Capabilities consumed from the media-negotiation engine.
///
/// Implementations only relay: offer/answer creation, description
/// application and candidate gathering are the engine's own business.
/// Asynchronous happenings (connectivity, gathering completion, remote
/// tracks, side-channel traffic) are pushed as
/// [`EngineEvent`](super::EngineEvent)s through the sender the engine was
/// built with.
#[async_trait]
pub trait NegotiationEngine: Send + Sync + 'static {
    type LocalTrack: Clone + Send + Sync + 'static;
    type RemoteTrack: Send + Sync + 'static;

    async fn add_track(&self, track: Self::LocalTrack) -> Result<()>;

    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn apply_local_description(&self, desc: SessionDescription) -> Result<()>;

    async fn apply_remote_description(&self, desc: SessionDescription) -> Result<()>;

    /// Current local description, including every candidate gathered so far.
    async fn local_description(&self) -> Option<SessionDescription>;

    async fn open_control_channel(&self, label: &str) -> Result<Arc<dyn ControlChannel>>;

    /// Release every engine resource. Calling it on a closed engine is harmless.
    async fn close(&self) -> Result<()>;
}
