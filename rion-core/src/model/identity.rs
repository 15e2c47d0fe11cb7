use crate::utils::{IDENTITY_SEPARATOR, SCREEN_SUFFIX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// What a published stream carries, derived from the publisher's identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    #[default]
    Default,
    Screen,
}

impl AppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppKind::Default => "default",
            AppKind::Screen => "screen",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A publisher as advertised by the room, either on the control channel
/// (`PUB_JOIN` / `PUB_LEFT`) or as the id of a remote media stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerAnnouncement {
    /// Base identity with the screen-share suffix removed.
    pub peer_id: String,
    /// Identity exactly as advertised, including the disambiguating suffix.
    pub full_peer_id: String,
    pub app_kind: AppKind,
}

impl PeerAnnouncement {
    /// Everything before the first `+` is the base identity; a base identity
    /// ending in `-screen` is a screen share and loses that suffix.
    pub fn parse(full_peer_id: &str) -> Self {
        let base = full_peer_id
            .split_once(IDENTITY_SEPARATOR)
            .map_or(full_peer_id, |(base, _)| base);

        let (peer_id, app_kind) = match base.strip_suffix(SCREEN_SUFFIX) {
            Some(stripped) => (stripped, AppKind::Screen),
            None => (base, AppKind::Default),
        };

        Self {
            peer_id: peer_id.to_owned(),
            full_peer_id: full_peer_id.to_owned(),
            app_kind,
        }
    }
}

impl fmt::Display for PeerAnnouncement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.full_peer_id, self.app_kind)
    }
}

pub fn full_id(local_id: &str, suffix: &str) -> String {
    format!("{local_id}{IDENTITY_SEPARATOR}{suffix}")
}

/// Current wall-clock time in milliseconds, rendered in lowercase base 36.
pub fn disambiguating_suffix() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    to_base36(millis)
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if n == 0 {
        return "0".to_owned();
    }

    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
