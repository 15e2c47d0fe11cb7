mod event_sink;
mod session;
mod session_actor;
mod session_command;

pub use event_sink::*;
pub use session::*;
