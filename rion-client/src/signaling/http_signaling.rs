use crate::signaling::{ExchangeRequest, RoomSignaling};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use rion_core::utils::{BAD_TOKEN_SENTINEL, SDP_CONTENT_TYPE};
use rion_core::{Error, ExchangeResponse, Result, Role, SessionDescription};
use tracing::{debug, warn};

/// [`RoomSignaling`] over HTTP: `POST {url}/room/{role}?room=..&id=..` with
/// the offer SDP as body.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpRoomSignaling {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRoomSignaling {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn endpoint(&self, role: Role) -> String {
        format!("{}/room/{}", self.base_url.trim_end_matches('/'), role)
    }
}

#[async_trait]
impl RoomSignaling for HttpRoomSignaling {
    async fn exchange(&self, request: ExchangeRequest) -> Result<SessionDescription> {
        let url = self.endpoint(request.role);
        debug!(%url, room = %request.room, id = %request.full_id, "Posting SDP offer");

        let mut builder = self
            .http
            .post(&url)
            .query(&[
                ("room", request.room.as_str()),
                ("id", request.full_id.as_str()),
            ])
            .header(CONTENT_TYPE, SDP_CONTENT_TYPE)
            .body(request.offer.sdp);

        if let Some(token) = &request.token {
            builder = builder.bearer_auth(token);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        // The sentinel wins over the status code: servers send it with 200 and 401 alike.
        let envelope = serde_json::from_str::<ExchangeResponse>(&body);
        if let Ok(envelope) = &envelope {
            if envelope.is_bad_token() {
                warn!(room = %request.room, "Room server rejected the token");
                return Err(Error::Auth(BAD_TOKEN_SENTINEL.to_owned()));
            }
        }

        if !status.is_success() {
            return Err(Error::Transport(format!(
                "room server answered {status}"
            )));
        }

        let envelope = envelope
            .map_err(|e| Error::Transport(format!("malformed exchange response: {e}")))?;

        Ok(SessionDescription::answer(envelope.data.sdp))
    }
}
