use crate::engine::{EngineConfig, WebRtcEngine};
use crate::session::{EventSink, Session};
use crate::signaling::{HttpRoomSignaling, RoomSignaling};
use rion_core::{ClientConfig, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Creates a WebRTC-backed session that exchanges offers with the room
/// server at `config.url` over HTTP.
pub async fn connect(
    config: ClientConfig,
    sink: Arc<dyn EventSink<WebRtcEngine>>,
) -> Result<Session<WebRtcEngine>> {
    let signaling = Arc::new(HttpRoomSignaling::new(config.url.clone()));
    connect_with(Arc::new(config), signaling, sink).await
}

/// Like [`connect`], with a caller-provided signaling transport.
pub async fn connect_with(
    config: Arc<ClientConfig>,
    signaling: Arc<dyn RoomSignaling>,
    sink: Arc<dyn EventSink<WebRtcEngine>>,
) -> Result<Session<WebRtcEngine>> {
    let (event_tx, event_rx) = mpsc::channel(256);
    let engine = WebRtcEngine::new(EngineConfig::from(config.as_ref()), event_tx).await?;

    Session::start(config, engine, event_rx, signaling, sink).await
}
