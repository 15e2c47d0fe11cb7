use rion_core::utils::{
    DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4,
};
use rion_core::{ClientConfig, IceServerConfig};
use webrtc::ice_transport::ice_server::RTCIceServer;

/// Configuration for the WebRTC negotiation engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec![
                    DEFAULT_STUN_ADDR.to_owned(),
                    DEFAULT_STUN_ADDR_2.to_owned(),
                    DEFAULT_STUN_ADDR_3.to_owned(),
                    DEFAULT_STUN_ADDR_4.to_owned(),
                ],
                username: None,
                credential: None,
            }],
        }
    }
}

impl From<&ClientConfig> for EngineConfig {
    fn from(config: &ClientConfig) -> Self {
        if config.ice_servers.is_empty() {
            return Self::default();
        }
        Self {
            ice_servers: config.ice_servers.clone(),
        }
    }
}

impl EngineConfig {
    pub(crate) fn rtc_ice_servers(&self) -> Vec<RTCIceServer> {
        self.ice_servers
            .iter()
            .map(|server| RTCIceServer {
                urls: server.urls.clone(),
                username: server.username.clone().unwrap_or_default(),
                credential: server.credential.clone().unwrap_or_default(),
            })
            .collect()
    }
}
