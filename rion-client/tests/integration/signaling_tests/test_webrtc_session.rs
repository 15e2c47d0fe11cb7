use std::sync::Arc;
use std::time::Duration;

use rion_client::{
    ControlChannel, EngineConfig, EngineEvent, HttpRoomSignaling, NegotiationEngine, Session, WebRtcEngine,
};
use rion_core::utils::CONTROL_LABEL;
use rion_core::{AppKind, SdpKind, SessionState};
use tokio::sync::mpsc;

use crate::integration::{init_tracing, test_config};
use crate::utils::{RecordingSink, ServerMode, SinkEvent, TestRoomServer};

/// Host candidates only; no STUN round trips in tests.
fn local_engine_config() -> EngineConfig {
    EngineConfig {
        ice_servers: vec![],
    }
}

#[tokio::test]
async fn test_webrtc_engine_gathers_offer() {
    init_tracing();

    let (tx, mut rx) = mpsc::channel(64);
    let engine = WebRtcEngine::new(local_engine_config(), tx).await.unwrap();
    let control = engine.open_control_channel(CONTROL_LABEL).await.unwrap();
    assert_eq!(control.label(), CONTROL_LABEL);

    let offer = engine.create_offer().await.unwrap();
    assert_eq!(offer.kind, SdpKind::Offer);
    engine.apply_local_description(offer).await.unwrap();

    let gathered = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(event) = rx.recv().await {
            if matches!(event, EngineEvent::CandidateGatheringComplete) {
                return true;
            }
        }
        false
    })
    .await
    .unwrap_or(false);
    assert!(gathered, "gathering never completed");

    let local = engine.local_description().await.expect("local description");
    assert_eq!(local.kind, SdpKind::Offer);
    assert!(local.sdp.contains("m=application"));

    engine.close().await.unwrap();
}

#[tokio::test]
async fn test_subscriber_end_to_end() {
    init_tracing();

    let server = TestRoomServer::start(ServerMode::WebRtc {
        announce: "bob-screen+k2".into(),
    })
    .await
    .unwrap();

    let config = Arc::new(test_config().with_token("s3cret"));
    let (tx, rx) = mpsc::channel(256);
    let engine = WebRtcEngine::new(local_engine_config(), tx).await.unwrap();
    let sink = RecordingSink::new();
    let session = Session::start(
        config,
        engine,
        rx,
        Arc::new(HttpRoomSignaling::new(&server.url)),
        Arc::new(sink.clone()),
    )
    .await
    .unwrap();

    session.subscribe().await.unwrap();
    tokio::time::timeout(
        Duration::from_secs(10),
        session.wait_for_state(SessionState::Connected),
    )
    .await
    .expect("timeout waiting for answer")
    .expect("session closed before connecting");

    // The server announces a publisher once the control channel is up.
    assert!(sink.wait_for_events(1, 10000).await, "no announcement received");
    match &sink.events()[0] {
        SinkEvent::PeerJoined(peer) => {
            assert_eq!(peer.peer_id, "bob");
            assert_eq!(peer.app_kind, AppKind::Screen);
        }
        other => panic!("unexpected event {other:?}"),
    }

    session.close().await;
    server.close().await;
}
