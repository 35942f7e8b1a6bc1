// ── Port mirroring domain types ──

use serde::{Deserialize, Serialize};

use super::bounded_int;

bounded_int! {
    /// Mirroring group / session number.
    MirrorSessionId(u8), 1..=6, "Session id"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorKind {
    Local,
    Remote,
}

impl MirrorKind {
    pub const ALL: [MirrorKind; 2] = [Self::Local, Self::Remote];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote-source",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MirrorDirection {
    In,
    Out,
    Both,
}

impl MirrorDirection {
    pub const ALL: [MirrorDirection; 3] = [Self::In, Self::Out, Self::Both];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::In => "inbound",
            Self::Out => "outbound",
            Self::Both => "both",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
            Self::Both => "both",
        }
    }
}

/// One mirroring session. Ports are stored canonical already.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorSession {
    pub id: MirrorSessionId,
    pub kind: MirrorKind,
    pub source_port: String,
    pub direction: MirrorDirection,
    pub destination_port: String,
    pub description: String,
}
