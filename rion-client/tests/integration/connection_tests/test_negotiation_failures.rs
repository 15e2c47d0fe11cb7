use std::sync::Arc;

use rion_client::LocalStream;
use rion_core::{Error, SessionState};

use crate::integration::{
    EVENT_TIMEOUT_MS, connected_subscriber, init_tracing, start_session, test_config, wait_state,
};
use crate::utils::{MockEngine, MockRoomSignaling, MockTrack};

#[tokio::test]
async fn test_second_negotiation_rejected() {
    init_tracing();

    let (test, signaling) = connected_subscriber().await;

    let err = test.session.subscribe().await.unwrap_err();
    assert_eq!(
        err,
        Error::InvalidState {
            operation: "subscribe",
            state: SessionState::Connected,
        }
    );

    let err = test
        .session
        .publish(LocalStream::new("camera", vec![MockTrack::new("video")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidState { operation: "publish", .. }));

    // Rejections are reported too, and nothing was renegotiated.
    assert_eq!(test.sink.errors().len(), 2);
    assert_eq!(signaling.requests().len(), 1);
    assert_eq!(test.session.state(), SessionState::Connected);

    test.session.close().await;
}

#[tokio::test]
async fn test_second_negotiation_rejected_while_in_flight() {
    init_tracing();

    let signaling = MockRoomSignaling::answering();
    let (engine, events) = MockEngine::new();
    let test = start_session(
        (engine.hold_offers(), events),
        Arc::new(signaling.clone()),
        test_config(),
    )
    .await;

    test.session.subscribe().await.unwrap();
    assert_eq!(test.session.state(), SessionState::Negotiating);

    let err = test.session.subscribe().await.unwrap_err();
    assert_eq!(
        err,
        Error::InvalidState {
            operation: "subscribe",
            state: SessionState::Negotiating,
        }
    );
    assert_eq!(test.session.state(), SessionState::Negotiating);

    // The first negotiation carries on untouched.
    test.engine.release_offer();
    wait_state(&test.session, SessionState::Connected).await;

    assert_eq!(test.engine.inspect(|s| s.offers_created), 1);
    assert_eq!(signaling.requests().len(), 1);
    assert_eq!(test.sink.errors(), vec![err]);

    test.session.close().await;
}

#[tokio::test]
async fn test_bad_token_closes_session() {
    init_tracing();

    let test = start_session(
        MockEngine::new(),
        Arc::new(MockRoomSignaling::rejecting_token()),
        test_config().with_token("expired"),
    )
    .await;

    test.session.subscribe().await.unwrap();
    wait_state(&test.session, SessionState::Closed).await;

    assert_eq!(test.sink.errors(), vec![Error::Auth("bad token".into())]);
    assert!(test.engine.inspect(|s| s.closed));
    assert!(test.engine.inspect(|s| s.remote.is_empty()));
}

#[tokio::test]
async fn test_unreachable_server_closes_session() {
    init_tracing();

    let test = start_session(
        MockEngine::new(),
        Arc::new(MockRoomSignaling::failing("connection refused")),
        test_config(),
    )
    .await;

    test.session.subscribe().await.unwrap();
    wait_state(&test.session, SessionState::Closed).await;

    assert_eq!(
        test.sink.errors(),
        vec![Error::Transport("connection refused".into())]
    );
}

#[tokio::test]
async fn test_rejected_answer_closes_session() {
    init_tracing();

    let (engine, events) = MockEngine::new();
    engine.configure(|s| s.fail_remote = true);
    let test = start_session(
        (engine, events),
        Arc::new(MockRoomSignaling::answering()),
        test_config(),
    )
    .await;

    test.session.subscribe().await.unwrap();
    wait_state(&test.session, SessionState::Closed).await;

    let errors = test.sink.errors();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], Error::Negotiation(_)));
}

#[tokio::test]
async fn test_offer_failure_returns_to_idle() {
    init_tracing();

    let (engine, events) = MockEngine::new();
    engine.configure(|s| s.fail_offer = true);
    let signaling = MockRoomSignaling::answering();
    let test = start_session((engine, events), Arc::new(signaling.clone()), test_config()).await;

    test.session.subscribe().await.unwrap();
    assert!(test.sink.wait_for_events(1, EVENT_TIMEOUT_MS).await);
    assert!(matches!(test.sink.errors()[0], Error::Negotiation(_)));
    wait_state(&test.session, SessionState::Idle).await;
    assert!(signaling.requests().is_empty());

    // Same role may retry once the engine recovers.
    test.engine.configure(|s| s.fail_offer = false);
    test.session.subscribe().await.unwrap();
    wait_state(&test.session, SessionState::Connected).await;

    test.session.close().await;
}

#[tokio::test]
async fn test_role_is_fixed_after_first_request() {
    init_tracing();

    let (engine, events) = MockEngine::new();
    engine.configure(|s| s.fail_offer = true);
    let test = start_session(
        (engine, events),
        Arc::new(MockRoomSignaling::answering()),
        test_config(),
    )
    .await;

    test.session.subscribe().await.unwrap();
    assert!(test.sink.wait_for_events(1, EVENT_TIMEOUT_MS).await);
    wait_state(&test.session, SessionState::Idle).await;

    let err = test
        .session
        .publish(LocalStream::new("camera", vec![MockTrack::new("video")]))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidState {
            operation: "publish",
            state: SessionState::Idle,
        }
    );

    test.session.close().await;
}

#[tokio::test]
async fn test_track_failure_aborts_publish() {
    init_tracing();

    let (engine, events) = MockEngine::new();
    engine.configure(|s| s.fail_add_track = true);
    let test = start_session(
        (engine, events),
        Arc::new(MockRoomSignaling::answering()),
        test_config(),
    )
    .await;

    let err = test
        .session
        .publish(LocalStream::new("camera", vec![MockTrack::new("video")]))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Negotiation(_)));
    assert_eq!(test.session.state(), SessionState::Idle);
    assert_eq!(test.sink.errors(), vec![err]);
    assert_eq!(test.engine.inspect(|s| s.offers_created), 0);

    test.session.close().await;
}
