use std::sync::Arc;
use std::time::Duration;

use rion_client::LocalStream;
use rion_core::{PeerAnnouncement, SessionState};

use crate::integration::{
    EVENT_TIMEOUT_MS, connected_subscriber, init_tracing, start_session, test_config, wait_state,
};
use crate::utils::{MockEngine, MockRoomSignaling, MockTrack, SinkEvent};

#[tokio::test]
async fn test_subscriber_receives_remote_media() {
    init_tracing();

    let (test, _signaling) = connected_subscriber().await;

    test.engine.remote_track("{placeholder}", "probe").await;
    test.engine.remote_track("bob+k2", "bob-audio").await;
    assert!(test.sink.wait_for_events(1, EVENT_TIMEOUT_MS).await);

    assert_eq!(
        test.sink.events(),
        vec![SinkEvent::RemoteStream {
            stream_id: "bob+k2".into(),
            track_id: "bob-audio".into(),
            peer: PeerAnnouncement::parse("bob+k2"),
        }]
    );

    test.session.close().await;
}

#[tokio::test]
async fn test_publisher_does_not_report_remote_media() {
    init_tracing();

    let test = start_session(
        MockEngine::new(),
        Arc::new(MockRoomSignaling::answering()),
        test_config(),
    )
    .await;

    test.session
        .publish(LocalStream::new("camera", vec![MockTrack::new("video")]))
        .await
        .unwrap();
    wait_state(&test.session, SessionState::Connected).await;

    test.engine.remote_track("bob+k2", "bob-audio").await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(
        !test
            .sink
            .events()
            .iter()
            .any(|e| matches!(e, SinkEvent::RemoteStream { .. }))
    );

    test.session.close().await;
}
