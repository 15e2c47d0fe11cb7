mod control;
mod identity;
mod room;
mod signaling;
mod state;

pub use control::{ControlMessage, Verb};
pub use identity::{AppKind, PeerAnnouncement, disambiguating_suffix, full_id};
pub use room::Role;
pub use signaling::{ExchangeData, ExchangeResponse, IceServerConfig, SdpKind, SessionDescription};
pub use state::{ConnectivityState, SessionState};
