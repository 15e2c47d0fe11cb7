use std::sync::Arc;

use rion_client::LocalStream;
use rion_core::{Role, SessionState};

use crate::integration::{init_tracing, start_session, test_config, wait_state};
use crate::utils::{MockEngine, MockRoomSignaling, MockTrack, SinkEvent};

#[tokio::test]
async fn test_publisher_connects() {
    init_tracing();

    let signaling = MockRoomSignaling::answering();
    let test = start_session(MockEngine::new(), Arc::new(signaling.clone()), test_config()).await;

    let stream = LocalStream::new("camera", vec![MockTrack::new("audio"), MockTrack::new("video")]);
    test.session.publish(stream).await.expect("publish failed");
    wait_state(&test.session, SessionState::Connected).await;

    assert_eq!(test.session.role(), Some(Role::Publisher));
    test.engine.inspect(|s| {
        assert_eq!(s.tracks, vec!["audio".to_owned(), "video".to_owned()]);
    });
    assert_eq!(
        test.sink.events(),
        vec![SinkEvent::LocalStreamReady {
            stream_id: "camera".into(),
            tracks: 2,
        }]
    );

    let requests = signaling.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].role, Role::Publisher);

    test.session.close().await;
}
