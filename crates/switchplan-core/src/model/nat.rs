// ── NAT policy domain types ──

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NatKind {
    Source,
    Destination,
}

impl NatKind {
    pub const ALL: [NatKind; 2] = [Self::Source, Self::Destination];

    /// Source NAT configures an address group, destination NAT a server
    /// mapping.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Source => "address-group",
            Self::Destination => "server",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Destination => "destination",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NatPolicy {
    pub name: String,
    pub kind: NatKind,
    pub source: String,
    pub destination: String,
    pub interface: String,
    pub description: String,
}
