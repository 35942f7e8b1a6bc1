// ── Interface IP binding ──

use serde::{Deserialize, Serialize};

use super::port::PortRef;

/// An address/mask assigned to a physical interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBinding {
    pub address: String,
    pub mask: String,
    pub interface: PortRef,
}
