use crate::model::IceServerConfig;
use serde::{Deserialize, Serialize};

/// Identity and room settings shared by every session of a client.
///
/// Read-only once a session has been created from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base address of the room server, without a trailing slash.
    pub url: String,
    pub room: String,
    /// Stable local identity; a disambiguating suffix is appended per session.
    pub id: String,
    /// Bearer credential sent with every exchange when present.
    #[serde(default)]
    pub token: Option<String>,
    /// Log negotiation timings and session descriptions.
    #[serde(default)]
    pub debug: bool,
    /// Empty means the default public STUN servers.
    #[serde(default)]
    pub ice_servers: Vec<IceServerConfig>,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>, room: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            room: room.into(),
            id: id.into(),
            token: None,
            debug: false,
            ice_servers: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }
}
