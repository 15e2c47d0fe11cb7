use crate::engine::{ControlChannel, EngineEvent, LocalStream, NegotiationEngine};
use crate::session::session::SessionIdentity;
use crate::session::session_command::{SessionCommand, StepOutcome};
use crate::session::{EventSink, RemoteMedia};
use crate::signaling::{ExchangeRequest, RoomSignaling};
use rion_core::utils::{CONTROL_LABEL, PLACEHOLDER_STREAM_PREFIX};
use rion_core::{
    ClientConfig, ConnectivityState, ControlMessage, Error, PeerAnnouncement, Result, Role,
    SessionDescription, SessionState, disambiguating_suffix, full_id,
};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Session task. Owns the engine and drives the negotiation state machine.
///
/// Async negotiation steps run as spawned tasks and report back through
/// `step_rx`, so commands (notably `Close`) are never stuck behind them.
pub(crate) struct SessionActor<E: NegotiationEngine> {
    config: Arc<ClientConfig>,
    engine: Arc<E>,
    control: Arc<dyn ControlChannel>,
    signaling: Arc<dyn RoomSignaling>,
    sink: Arc<dyn EventSink<E>>,
    identity: Arc<SessionIdentity>,

    state: SessionState,
    state_tx: watch::Sender<SessionState>,
    started_at: Option<Instant>,
    /// Gathering finished before the offer step reported back.
    gathered_early: bool,
    /// Control messages held back while a renegotiation is in flight.
    pending_control: VecDeque<ControlMessage>,

    cmd_rx: mpsc::Receiver<SessionCommand<E>>,
    engine_rx: mpsc::Receiver<EngineEvent<E::RemoteTrack>>,
    step_tx: mpsc::Sender<StepOutcome>,
    step_rx: mpsc::Receiver<StepOutcome>,
}

impl<E: NegotiationEngine> SessionActor<E> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        config: Arc<ClientConfig>,
        engine: Arc<E>,
        control: Arc<dyn ControlChannel>,
        signaling: Arc<dyn RoomSignaling>,
        sink: Arc<dyn EventSink<E>>,
        identity: Arc<SessionIdentity>,
        state_tx: watch::Sender<SessionState>,
        cmd_rx: mpsc::Receiver<SessionCommand<E>>,
        engine_rx: mpsc::Receiver<EngineEvent<E::RemoteTrack>>,
    ) -> Self {
        let (step_tx, step_rx) = mpsc::channel(8);

        Self {
            config,
            engine,
            control,
            signaling,
            sink,
            identity,
            state: SessionState::Idle,
            state_tx,
            started_at: None,
            gathered_early: false,
            pending_control: VecDeque::new(),
            cmd_rx,
            engine_rx,
            step_tx,
            step_rx,
        }
    }

    pub(crate) async fn run(mut self) {
        debug!(id = %self.config.id, "Session event loop started");

        loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(c) => self.handle_command(c).await,
                        None => {
                            info!(id = %self.config.id, "All session handles dropped. Closing.");
                            self.teardown().await;
                        }
                    }
                }

                Some(evt) = self.engine_rx.recv() => self.handle_engine_event(evt).await,

                Some(outcome) = self.step_rx.recv() => self.handle_step(outcome).await,
            }

            if self.state.is_closed() {
                break;
            }
        }

        debug!(id = %self.config.id, "Session event loop finished");
    }

    async fn handle_command(&mut self, cmd: SessionCommand<E>) {
        match cmd {
            SessionCommand::Publish { stream, reply } => {
                let result = self.begin(Role::Publisher, Some(stream)).await;
                let _ = reply.send(result);
            }

            SessionCommand::Subscribe { reply } => {
                let result = self.begin(Role::Subscriber, None).await;
                let _ = reply.send(result);
            }

            SessionCommand::Close { reply } => {
                self.teardown().await;
                let _ = reply.send(());
            }
        }
    }

    /// `Idle → Negotiating`. Fixes the role and spawns the offer step.
    async fn begin(
        &mut self,
        role: Role,
        stream: Option<LocalStream<E::LocalTrack>>,
    ) -> Result<()> {
        let operation = match role {
            Role::Publisher => "publish",
            Role::Subscriber => "subscribe",
        };

        let role_conflict = self.identity.role.get().is_some_and(|fixed| *fixed != role);
        if self.state != SessionState::Idle || role_conflict {
            let err = Error::InvalidState {
                operation,
                state: self.state,
            };
            self.report(&err);
            return Err(err);
        }

        let _ = self.identity.role.set(role);
        self.set_state(SessionState::Negotiating);

        if let Some(stream) = stream {
            for track in &stream.tracks {
                if let Err(e) = self.engine.add_track(track.clone()).await {
                    self.set_state(SessionState::Idle);
                    self.report(&e);
                    return Err(e);
                }
            }
            info!(role = %role, stream = %stream.id, tracks = stream.tracks.len(), "Local stream attached");
            self.sink.on_local_stream_ready(&stream);
        }

        self.started_at = Some(Instant::now());
        self.gathered_early = false;

        let engine = self.engine.clone();
        let step_tx = self.step_tx.clone();
        let debug = self.config.debug;
        let state = self.state_tx.subscribe();
        tokio::spawn(async move {
            let result = create_and_apply_offer(engine.as_ref(), &state, debug).await;
            let _ = step_tx.send(StepOutcome::OfferApplied(result)).await;
        });

        Ok(())
    }

    async fn handle_step(&mut self, outcome: StepOutcome) {
        match (self.state, outcome) {
            (SessionState::Negotiating, StepOutcome::OfferApplied(Ok(()))) => {
                self.set_state(SessionState::GatheringCandidates);
                if std::mem::take(&mut self.gathered_early) {
                    self.start_exchange();
                }
            }

            (SessionState::Negotiating, StepOutcome::OfferApplied(Err(e))) => {
                self.set_state(SessionState::Idle);
                self.report(&e);
            }

            (SessionState::ExchangingWithServer, StepOutcome::Exchanged(Ok(()))) => {
                info!(role = %self.role_label(), id = ?self.identity.full_id.get(), "Answer applied");
                self.set_state(SessionState::Connected);
            }

            (SessionState::ExchangingWithServer, StepOutcome::Exchanged(Err(e))) => {
                self.report(&e);
                self.teardown().await;
            }

            (SessionState::Renegotiating, StepOutcome::Renegotiated(result)) => {
                self.set_state(SessionState::Connected);
                if let Err(e) = result {
                    let e = match e {
                        Error::Negotiation(_) => e,
                        other => Error::Negotiation(other.to_string()),
                    };
                    self.report(&e);
                }
                self.drain_pending_control();
            }

            (state, outcome) => {
                debug!(%state, ?outcome, "Discarding step outcome");
            }
        }
    }

    async fn handle_engine_event(&mut self, event: EngineEvent<E::RemoteTrack>) {
        match event {
            EngineEvent::ConnectivityChanged(s) => {
                info!(role = %self.role_label(), id = %self.config.id, "ICE Connection State: {}", s);
                if s == ConnectivityState::Connected {
                    self.log_elapsed("connected");
                }
            }

            EngineEvent::CandidateGatheringComplete => match self.state {
                SessionState::GatheringCandidates => self.start_exchange(),
                SessionState::Negotiating => self.gathered_early = true,
                state => debug!(%state, "Ignoring candidate gathering completion"),
            },

            EngineEvent::RemoteMediaReceived {
                stream_id,
                track_id,
                track,
            } => self.handle_remote_media(stream_id, track_id, track),

            EngineEvent::ControlOpened { label } => {
                info!(role = %self.role_label(), id = %self.config.id, "DataChannel '{}' has opened", label);
            }

            EngineEvent::ControlClosed { label } => {
                info!(role = %self.role_label(), id = %self.config.id, "DataChannel '{}' has closed", label);
            }

            EngineEvent::MessageReceived { label, data } => {
                if label != CONTROL_LABEL {
                    debug!(%label, "Ignoring traffic on non-control channel");
                    return;
                }
                let Some(msg) = ControlMessage::decode(&data) else {
                    debug!(len = data.len(), "Ignoring unrecognized control message");
                    return;
                };

                if self.state == SessionState::Renegotiating {
                    self.pending_control.push_back(msg);
                } else {
                    self.dispatch_control(msg);
                }
            }
        }
    }

    fn handle_remote_media(&mut self, stream_id: String, track_id: String, track: E::RemoteTrack) {
        if self.identity.role.get() != Some(&Role::Subscriber) {
            debug!(%stream_id, "Publisher ignores remote track");
            return;
        }
        if stream_id.starts_with(PLACEHOLDER_STREAM_PREFIX) {
            debug!(%stream_id, "Skipping placeholder stream");
            return;
        }

        let peer = PeerAnnouncement::parse(&stream_id);
        info!(role = %self.role_label(), id = %self.config.id, "add track {} {}", stream_id, track_id);
        self.sink.on_remote_stream_received(RemoteMedia {
            stream_id,
            track_id,
            track,
            peer,
        });
    }

    fn dispatch_control(&mut self, msg: ControlMessage) {
        let verb = msg.verb();
        if self.identity.role.get() != Some(&Role::Subscriber) {
            debug!(%verb, "Publisher ignores control message");
            return;
        }

        match msg {
            ControlMessage::SdpOffer(sdp) => {
                if self.state == SessionState::Connected {
                    self.start_renegotiation(sdp);
                } else {
                    warn!(state = %self.state, "Renegotiation offer outside of a connected session");
                }
            }

            ControlMessage::PubJoin(id) | ControlMessage::PubLeft(id) if id.trim().is_empty() => {
                debug!(%verb, "Ignoring membership notice without a publisher");
            }

            ControlMessage::PubJoin(id) => {
                let peer = PeerAnnouncement::parse(&id);
                info!(role = %self.role_label(), id = %self.config.id, "Publisher joined: {}", peer);
                self.sink.on_peer_joined(&peer);
            }

            ControlMessage::PubLeft(id) => {
                let peer = PeerAnnouncement::parse(&id);
                info!(role = %self.role_label(), id = %self.config.id, "Publisher left: {}", peer);
                self.sink.on_peer_left(&peer);
            }

            ControlMessage::SdpAnswer(_) | ControlMessage::Stop => {
                debug!(%verb, "Ignoring client-bound verb from server");
            }
        }
    }

    fn drain_pending_control(&mut self) {
        while self.state == SessionState::Connected {
            let Some(msg) = self.pending_control.pop_front() else {
                break;
            };
            self.dispatch_control(msg);
        }
    }

    /// `GatheringCandidates → ExchangingWithServer`. Assigns the full identity.
    fn start_exchange(&mut self) {
        let full_id = self
            .identity
            .full_id
            .get_or_init(|| full_id(&self.config.id, &disambiguating_suffix()))
            .clone();

        self.log_elapsed("full ICE collected");
        self.set_state(SessionState::ExchangingWithServer);

        let role = self.identity.role.get().copied().unwrap_or(Role::Publisher);
        let engine = self.engine.clone();
        let signaling = self.signaling.clone();
        let step_tx = self.step_tx.clone();
        let debug = self.config.debug;
        let request = PendingExchange {
            role,
            room: self.config.room.clone(),
            full_id,
            token: self.config.token.clone(),
        };

        let state = self.state_tx.subscribe();
        tokio::spawn(async move {
            let result =
                exchange_offer(engine.as_ref(), signaling.as_ref(), request, &state, debug).await;
            let _ = step_tx.send(StepOutcome::Exchanged(result)).await;
        });
    }

    /// `Connected → Renegotiating`. The answer goes back over the control channel.
    fn start_renegotiation(&mut self, offer: String) {
        info!(role = %self.role_label(), id = %self.config.id, "Set remote SDP offer again");
        self.set_state(SessionState::Renegotiating);

        let engine = self.engine.clone();
        let control = self.control.clone();
        let step_tx = self.step_tx.clone();
        let debug = self.config.debug;
        let state = self.state_tx.subscribe();
        tokio::spawn(async move {
            let result = answer_offer(engine.as_ref(), control.as_ref(), offer, &state, debug).await;
            let _ = step_tx.send(StepOutcome::Renegotiated(result)).await;
        });
    }

    /// `* → Closed`. Runs once: the event loop stops right after.
    async fn teardown(&mut self) {
        if self.state.is_closed() {
            return;
        }
        info!(role = %self.role_label(), id = %self.config.id, "closing");
        self.set_state(SessionState::Closed);

        if let Err(e) = self.control.send(&ControlMessage::Stop).await {
            debug!("STOP not delivered: {}", e);
        }
        if let Err(e) = self.engine.close().await {
            warn!("Failed to release negotiation engine: {}", e);
        }
    }

    fn set_state(&mut self, state: SessionState) {
        debug!(role = %self.role_label(), from = %self.state, to = %state, "Session state");
        self.state = state;
        self.state_tx.send_replace(state);
    }

    fn report(&self, err: &Error) {
        error!(role = %self.role_label(), id = %self.config.id, "{}", err);
        self.sink.on_error(err);
    }

    fn role_label(&self) -> &'static str {
        self.identity.role.get().map_or("-", Role::as_str)
    }

    fn log_elapsed(&self, milestone: &str) {
        if !self.config.debug {
            return;
        }
        if let Some(started) = self.started_at {
            info!(
                role = %self.role_label(),
                id = %self.config.id,
                "from createOffer() to {}: {} ms",
                milestone,
                started.elapsed().as_millis()
            );
        }
    }
}

struct PendingExchange {
    role: Role,
    room: String,
    full_id: String,
    token: Option<String>,
}

/// Steps stop touching the engine once the session has closed underneath them.
fn closed(state: &watch::Receiver<SessionState>) -> bool {
    state.borrow().is_closed()
}

async fn create_and_apply_offer<E: NegotiationEngine>(
    engine: &E,
    state: &watch::Receiver<SessionState>,
    debug: bool,
) -> Result<()> {
    let offer = engine.create_offer().await?;
    if closed(state) {
        return Ok(());
    }
    if debug {
        debug!("local SDP Offer: {}", offer.sdp);
    }
    // Applying the offer kicks off candidate gathering.
    engine.apply_local_description(offer).await
}

async fn exchange_offer<E: NegotiationEngine>(
    engine: &E,
    signaling: &dyn RoomSignaling,
    pending: PendingExchange,
    state: &watch::Receiver<SessionState>,
    debug: bool,
) -> Result<()> {
    let offer = engine
        .local_description()
        .await
        .ok_or_else(|| Error::Negotiation("no local description after gathering".into()))?;

    let answer = signaling
        .exchange(ExchangeRequest {
            role: pending.role,
            room: pending.room,
            full_id: pending.full_id,
            token: pending.token,
            offer,
        })
        .await?;

    if closed(state) {
        return Ok(());
    }
    if debug {
        debug!("remote SDP Answer: {}", answer.sdp);
    }
    engine.apply_remote_description(answer).await
}

async fn answer_offer<E: NegotiationEngine>(
    engine: &E,
    control: &dyn ControlChannel,
    offer: String,
    state: &watch::Receiver<SessionState>,
    debug: bool,
) -> Result<()> {
    if debug {
        debug!("remote SDP Offer: {}", offer);
    }
    engine
        .apply_remote_description(SessionDescription::offer(offer))
        .await?;

    let answer = engine.create_answer().await?;
    if closed(state) {
        return Ok(());
    }
    engine.apply_local_description(answer.clone()).await?;
    if debug {
        debug!("local SDP Answer: {}", answer.sdp);
    }

    control.send(&ControlMessage::SdpAnswer(answer.sdp)).await
}
