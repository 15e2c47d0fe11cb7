use crate::engine::{ControlChannel, EngineConfig, EngineEvent, NegotiationEngine};
use async_trait::async_trait;
use rion_core::{ConnectivityState, ControlMessage, Error, Result, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::data_channel::data_channel_message::DataChannelMessage;
use webrtc::ice_transport::ice_candidate::RTCIceCandidate;
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

pub type WebRtcTrack = Arc<dyn TrackLocal + Send + Sync>;
pub type WebRtcRemoteTrack = Arc<TrackRemote>;
pub type WebRtcEvent = EngineEvent<WebRtcRemoteTrack>;

/// [`NegotiationEngine`] backed by a webrtc-rs peer connection.
pub struct WebRtcEngine {
    peer_connection: Arc<RTCPeerConnection>,
    event_tx: mpsc::Sender<WebRtcEvent>,
}

impl WebRtcEngine {
    /// Builds the peer connection and wires its callbacks into `event_tx`.
    pub async fn new(config: EngineConfig, event_tx: mpsc::Sender<WebRtcEvent>) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: config.rtc_ice_servers(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                Box::pin(async move {
                    debug!("Peer connection state: {:?}", s);
                })
            },
        ));

        let ice_tx = event_tx.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let tx = ice_tx.clone();
                Box::pin(async move {
                    let state = ConnectivityState::from(s);
                    let _ = tx.send(EngineEvent::ConnectivityChanged(state)).await;
                })
            },
        ));

        // A `None` candidate marks the end of gathering.
        let gather_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = gather_tx.clone();
            Box::pin(async move {
                if c.is_none() {
                    let _ = tx.send(EngineEvent::CandidateGatheringComplete).await;
                }
            })
        }));

        let track_tx = event_tx.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    let event = EngineEvent::RemoteMediaReceived {
                        stream_id: track.stream_id(),
                        track_id: track.id(),
                        track,
                    };
                    let _ = tx.send(event).await;
                })
            },
        ));

        Ok(Self {
            peer_connection,
            event_tx,
        })
    }

    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.peer_connection
    }

    fn wire_control_channel(&self, dc: &Arc<RTCDataChannel>) {
        let label = dc.label().to_owned();

        let tx_open = self.event_tx.clone();
        let label_open = label.clone();
        dc.on_open(Box::new(move || {
            Box::pin(async move {
                debug!("DataChannel {} open", label_open);
                let _ = tx_open
                    .send(EngineEvent::ControlOpened { label: label_open })
                    .await;
            })
        }));

        let tx_close = self.event_tx.clone();
        let label_close = label.clone();
        dc.on_close(Box::new(move || {
            let tx = tx_close.clone();
            let label = label_close.clone();
            Box::pin(async move {
                debug!("DataChannel {} closed", label);
                let _ = tx.send(EngineEvent::ControlClosed { label }).await;
            })
        }));

        let tx_msg = self.event_tx.clone();
        dc.on_message(Box::new(move |msg: DataChannelMessage| {
            let tx = tx_msg.clone();
            let label = label.clone();
            Box::pin(async move {
                let _ = tx
                    .send(EngineEvent::MessageReceived {
                        label,
                        data: msg.data,
                    })
                    .await;
            })
        }));
    }
}

fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription> {
    let rtc = match desc.kind {
        SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
        SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
    };
    Ok(rtc)
}

#[async_trait]
impl NegotiationEngine for WebRtcEngine {
    type LocalTrack = WebRtcTrack;
    type RemoteTrack = WebRtcRemoteTrack;

    async fn add_track(&self, track: WebRtcTrack) -> Result<()> {
        let sender = self.peer_connection.add_track(track).await?;

        // RTCP has to be drained for the interceptors to make progress.
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while sender.read(&mut buf).await.is_ok() {}
        });
        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn apply_local_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_local_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn apply_remote_description(&self, desc: SessionDescription) -> Result<()> {
        self.peer_connection
            .set_remote_description(to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn local_description(&self) -> Option<SessionDescription> {
        let desc = self.peer_connection.local_description().await?;
        let kind = match desc.sdp_type {
            RTCSdpType::Answer | RTCSdpType::Pranswer => SdpKind::Answer,
            _ => SdpKind::Offer,
        };
        Some(SessionDescription {
            kind,
            sdp: desc.sdp,
        })
    }

    async fn open_control_channel(&self, label: &str) -> Result<Arc<dyn ControlChannel>> {
        let dc = self.peer_connection.create_data_channel(label, None).await?;
        self.wire_control_channel(&dc);
        Ok(Arc::new(DataChannelControl { channel: dc }))
    }

    async fn close(&self) -> Result<()> {
        self.peer_connection.close().await?;
        Ok(())
    }
}

struct DataChannelControl {
    channel: Arc<RTCDataChannel>,
}

#[async_trait]
impl ControlChannel for DataChannelControl {
    fn label(&self) -> &str {
        self.channel.label()
    }

    async fn send(&self, message: &ControlMessage) -> Result<()> {
        self.channel
            .send_text(message.encode())
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(())
    }
}
