pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_2: &str = "stun:stun1.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_3: &str = "stun:stun2.l.google.com:19302";
pub const DEFAULT_STUN_ADDR_4: &str = "stun:stun3.l.google.com:19302";

/// Label of the reliable side-channel that carries control messages.
pub const CONTROL_LABEL: &str = "control";

/// Separates a base identity from its disambiguating suffix.
pub const IDENTITY_SEPARATOR: char = '+';

/// Base identities ending with this suffix publish a screen share.
pub const SCREEN_SUFFIX: &str = "-screen";

/// Answer text the room server returns instead of an SDP when the token is rejected.
pub const BAD_TOKEN_SENTINEL: &str = "bad token";

/// Remote stream ids starting with this character are placeholders, not publishers.
pub const PLACEHOLDER_STREAM_PREFIX: char = '{';

pub const SDP_CONTENT_TYPE: &str = "application/sdp";
