pub mod engine;
pub mod session;
pub mod signaling;

mod client;

pub use client::{connect, connect_with};
pub use engine::*;
pub use session::*;
pub use signaling::*;
