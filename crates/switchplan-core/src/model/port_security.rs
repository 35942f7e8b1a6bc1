// ── Port security domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::bounded_int;

bounded_int! {
    /// Upper bound for learned MAC addresses on one port.
    MaxMacCount(u8), 1..=128, "Max MAC count"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ViolationAction {
    Shutdown,
    Restrict,
    Protect,
}

impl ViolationAction {
    pub const ALL: [ViolationAction; 3] = [Self::Shutdown, Self::Restrict, Self::Protect];
}

/// Security posture of one access port. `sticky_macs` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSecurityBinding {
    pub port: String,
    pub max_mac: MaxMacCount,
    pub sticky_macs: Vec<String>,
    pub violation: ViolationAction,
}

impl PortSecurityBinding {
    pub fn parse_macs(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    pub fn macs_text(&self) -> String {
        self.sticky_macs.join(", ")
    }
}
