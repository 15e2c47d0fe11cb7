use crate::model::identity::PeerAnnouncement;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    SdpOffer,
    SdpAnswer,
    PubJoin,
    PubLeft,
    Stop,
}

impl Verb {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::SdpOffer => "SDP_OFFER",
            Verb::SdpAnswer => "SDP_ANSWER",
            Verb::PubJoin => "PUB_JOIN",
            Verb::PubLeft => "PUB_LEFT",
            Verb::Stop => "STOP",
        }
    }

    pub fn from_wire(verb: &str) -> Option<Self> {
        match verb {
            "SDP_OFFER" => Some(Verb::SdpOffer),
            "SDP_ANSWER" => Some(Verb::SdpAnswer),
            "PUB_JOIN" => Some(Verb::PubJoin),
            "PUB_LEFT" => Some(Verb::PubLeft),
            "STOP" => Some(Verb::Stop),
            _ => None,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line on the control channel: `<VERB> <payload>`.
///
/// Payloads are carried verbatim; session descriptions keep their `\r\n`
/// line endings. A payload must not contain a newline of its own when it is
/// not an SDP, which callers are expected to uphold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlMessage {
    /// Renegotiation offer pushed by the server.
    SdpOffer(String),
    /// Answer to a pushed offer.
    SdpAnswer(String),
    /// A publisher joined; carries its full identity.
    PubJoin(String),
    /// A publisher left; carries its full identity.
    PubLeft(String),
    /// Teardown notice sent by the client.
    Stop,
}

impl ControlMessage {
    /// Returns `None` for lines whose verb is not part of the protocol.
    pub fn parse(line: &str) -> Option<Self> {
        let (verb, payload) = line.split_once(' ').unwrap_or((line, ""));

        let msg = match Verb::from_wire(verb)? {
            Verb::SdpOffer => ControlMessage::SdpOffer(payload.to_owned()),
            Verb::SdpAnswer => ControlMessage::SdpAnswer(payload.to_owned()),
            Verb::PubJoin => ControlMessage::PubJoin(payload.to_owned()),
            Verb::PubLeft => ControlMessage::PubLeft(payload.to_owned()),
            Verb::Stop => ControlMessage::Stop,
        };
        Some(msg)
    }

    /// Same as [`ControlMessage::parse`], for raw channel bytes. Non UTF-8 data is ignored.
    pub fn decode(data: &[u8]) -> Option<Self> {
        std::str::from_utf8(data).ok().and_then(Self::parse)
    }

    pub fn encode(&self) -> String {
        match self {
            ControlMessage::Stop => Verb::Stop.as_str().to_owned(),
            other => format!("{} {}", other.verb(), other.payload()),
        }
    }

    pub fn verb(&self) -> Verb {
        match self {
            ControlMessage::SdpOffer(_) => Verb::SdpOffer,
            ControlMessage::SdpAnswer(_) => Verb::SdpAnswer,
            ControlMessage::PubJoin(_) => Verb::PubJoin,
            ControlMessage::PubLeft(_) => Verb::PubLeft,
            ControlMessage::Stop => Verb::Stop,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            ControlMessage::SdpOffer(p)
            | ControlMessage::SdpAnswer(p)
            | ControlMessage::PubJoin(p)
            | ControlMessage::PubLeft(p) => p,
            ControlMessage::Stop => "",
        }
    }

    /// Membership messages decode into the announced publisher.
    pub fn announcement(&self) -> Option<PeerAnnouncement> {
        match self {
            ControlMessage::PubJoin(id) | ControlMessage::PubLeft(id) => {
                Some(PeerAnnouncement::parse(id))
            }
            _ => None,
        }
    }
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
