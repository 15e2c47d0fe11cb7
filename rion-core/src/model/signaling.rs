use crate::utils::BAD_TOKEN_SENTINEL;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Negotiation payload handed to and produced by the negotiation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

/// Body the room server returns for an offer: `{ "data": { "sdp": ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeResponse {
    pub data: ExchangeData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeData {
    pub sdp: String,
}

impl ExchangeResponse {
    pub fn new(sdp: impl Into<String>) -> Self {
        Self {
            data: ExchangeData { sdp: sdp.into() },
        }
    }

    /// The server rejected the bearer credential instead of answering.
    pub fn is_bad_token(&self) -> bool {
        self.data.sdp == BAD_TOKEN_SENTINEL
    }
}
