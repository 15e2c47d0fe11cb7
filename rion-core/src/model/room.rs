use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the room a session is on. Fixed once negotiation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "pub")]
    Publisher,
    #[serde(rename = "sub")]
    Subscriber,
}

impl Role {
    /// Name used in exchange addresses and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Publisher => "pub",
            Role::Subscriber => "sub",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
