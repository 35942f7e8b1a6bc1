// ── Routing domain types ──

use serde::{Deserialize, Serialize};

/// Route source. A closed enum: there is no "unrecognized kind" case for
/// the template to mishandle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteKind {
    Static,
    Rip,
    Ospf,
    Bgp,
}

impl RouteKind {
    pub const ALL: [RouteKind; 4] = [Self::Static, Self::Rip, Self::Ospf, Self::Bgp];

    pub fn label(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Rip => "RIP",
            Self::Ospf => "OSPF",
            Self::Bgp => "BGP",
        }
    }
}

/// One routing intent. `next_hop` is meaningful for static routes only;
/// `param` is protocol-specific free text (RIP version, OSPF area, extra
/// BGP line).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    pub kind: RouteKind,
    pub destination: String,
    pub mask: String,
    pub next_hop: String,
    pub param: String,
}
