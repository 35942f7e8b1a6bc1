// ── Device inventory types ──
//
// Inventory rows are bookkeeping only: no command template hangs off
// them, and status is whatever the operator last recorded.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Management {
    Ssh,
    Telnet,
}

impl Management {
    pub const ALL: [Management; 2] = [Self::Ssh, Self::Telnet];

    pub fn label(self) -> &'static str {
        match self {
            Self::Ssh => "SSH",
            Self::Telnet => "Telnet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceStatus {
    Online,
    Offline,
}

impl DeviceStatus {
    pub const ALL: [DeviceStatus; 2] = [Self::Online, Self::Offline];

    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEntry {
    pub name: String,
    pub address: String,
    pub model: String,
    pub management: Management,
    pub status: DeviceStatus,
}

impl DeviceEntry {
    /// Case-insensitive substring match over name, address and model.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.address.to_lowercase().contains(&needle)
            || self.model.to_lowercase().contains(&needle)
    }
}
