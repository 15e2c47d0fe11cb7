use crate::engine::{EngineEvent, LocalStream, NegotiationEngine};
use crate::session::EventSink;
use crate::session::session_actor::SessionActor;
use crate::session::session_command::SessionCommand;
use crate::signaling::RoomSignaling;
use rion_core::utils::CONTROL_LABEL;
use rion_core::{ClientConfig, Error, Result, Role, SessionState};
use std::sync::{Arc, OnceLock};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::info;

/// Identity facts that are written once and read from any handle.
pub(crate) struct SessionIdentity {
    pub(crate) local_id: String,
    pub(crate) role: OnceLock<Role>,
    pub(crate) full_id: OnceLock<String>,
}

/// Handle to one negotiated connection with the room.
///
/// Handles are cheap to clone. The session task keeps running until
/// [`Session::close`] is called, the session fails terminally, or every
/// handle has been dropped.
pub struct Session<E: NegotiationEngine> {
    cmd_tx: mpsc::Sender<SessionCommand<E>>,
    state_rx: watch::Receiver<SessionState>,
    identity: Arc<SessionIdentity>,
}

impl<E: NegotiationEngine> Clone for Session<E> {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            state_rx: self.state_rx.clone(),
            identity: self.identity.clone(),
        }
    }
}

impl<E: NegotiationEngine> Session<E> {
    /// Opens the control channel on `engine` and starts the session task.
    ///
    /// `engine_events` must be the receiving end of the sender `engine` was
    /// built with.
    pub async fn start(
        config: Arc<ClientConfig>,
        engine: E,
        engine_events: mpsc::Receiver<EngineEvent<E::RemoteTrack>>,
        signaling: Arc<dyn RoomSignaling>,
        sink: Arc<dyn EventSink<E>>,
    ) -> Result<Self> {
        let engine = Arc::new(engine);
        let control = engine.open_control_channel(CONTROL_LABEL).await?;

        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(SessionState::Idle);
        let identity = Arc::new(SessionIdentity {
            local_id: config.id.clone(),
            role: OnceLock::new(),
            full_id: OnceLock::new(),
        });

        info!(id = %config.id, room = %config.room, "Creating session");

        let actor = SessionActor::new(
            config,
            engine,
            control,
            signaling,
            sink,
            identity.clone(),
            state_tx,
            cmd_rx,
            engine_events,
        );
        tokio::spawn(actor.run());

        Ok(Self {
            cmd_tx,
            state_rx,
            identity,
        })
    }

    /// Attaches every track of `stream` and starts negotiating as a publisher.
    ///
    /// Returns once negotiation has started; later failures go to the event
    /// sink. Fails with `Error::InvalidState` past `Idle`.
    pub async fn publish(&self, stream: LocalStream<E::LocalTrack>) -> Result<()> {
        self.request("publish", |reply| SessionCommand::Publish { stream, reply })
            .await
    }

    /// Starts negotiating as a subscriber. Same contract as [`Session::publish`].
    pub async fn subscribe(&self) -> Result<()> {
        self.request("subscribe", |reply| SessionCommand::Subscribe { reply })
            .await
    }

    /// Sends `STOP` best-effort and releases the engine. Idempotent, never fails.
    pub async fn close(&self) {
        let (reply, done) = oneshot::channel();
        if self.cmd_tx.send(SessionCommand::Close { reply }).await.is_ok() {
            let _ = done.await;
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state_rx.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }

    /// Waits until the session reaches `target`.
    ///
    /// A session that closes first yields `Err` with the state it stopped in.
    pub async fn wait_for_state(
        &self,
        target: SessionState,
    ) -> std::result::Result<(), SessionState> {
        let mut rx = self.state_rx.clone();
        let reached = rx
            .wait_for(|s| *s == target || s.is_closed())
            .await
            .map(|s| *s)
            .unwrap_or(SessionState::Closed);

        if reached == target {
            Ok(())
        } else {
            Err(reached)
        }
    }

    pub fn local_id(&self) -> &str {
        &self.identity.local_id
    }

    /// `None` until negotiation has been requested.
    pub fn role(&self) -> Option<Role> {
        self.identity.role.get().copied()
    }

    /// `None` until the first candidate gathering has completed.
    pub fn full_id(&self) -> Option<&str> {
        self.identity.full_id.get().map(String::as_str)
    }

    async fn request<F>(&self, operation: &'static str, build: F) -> Result<()>
    where
        F: FnOnce(oneshot::Sender<Result<()>>) -> SessionCommand<E>,
    {
        let closed = || Error::InvalidState {
            operation,
            state: SessionState::Closed,
        };

        let (reply, result) = oneshot::channel();
        self.cmd_tx
            .send(build(reply))
            .await
            .map_err(|_| closed())?;
        result.await.map_err(|_| closed())?
    }
}
