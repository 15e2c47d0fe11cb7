mod http_signaling;
mod room_signaling;

pub use http_signaling::*;
pub use room_signaling::*;
