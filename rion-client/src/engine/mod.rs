mod engine_config;
mod engine_event;
mod negotiation_engine;
mod webrtc_engine;

pub use engine_config::*;
pub use engine_event::*;
pub use negotiation_engine::*;
pub use webrtc_engine::*;
