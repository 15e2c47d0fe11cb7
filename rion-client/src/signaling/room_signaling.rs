use async_trait::async_trait;
use rion_core::{Result, Role, SessionDescription};

/// Everything the room server needs to answer one offer.
#[derive(Debug, Clone)]
pub struct ExchangeRequest {
    pub role: Role,
    pub room: String,
    pub full_id: String,
    pub token: Option<String>,
    pub offer: SessionDescription,
}

/// Stateless offer/answer exchange with the room server.
///
/// Implementations report an unreachable server or unusable response as
/// `Error::Transport` and a rejected credential as `Error::Auth`. They never
/// retry.
#[async_trait]
pub trait RoomSignaling: Send + Sync {
    async fn exchange(&self, request: ExchangeRequest) -> Result<SessionDescription>;
}
