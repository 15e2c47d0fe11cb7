use crate::model::SessionState;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Every failure a session can report to its event sink.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// The negotiation engine failed to create or apply a session description.
    #[error("negotiation failed: {0}")]
    Negotiation(String),

    /// The room server could not be reached or answered with something unusable.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The room server rejected the bearer credential.
    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
}

#[cfg(not(target_arch = "wasm32"))]
impl From<webrtc::Error> for Error {
    fn from(e: webrtc::Error) -> Self {
        Error::Negotiation(e.to_string())
    }
}
