// ── DHCP pool domain types ──

use serde::{Deserialize, Serialize};

use super::bounded_int;

bounded_int! {
    /// Pool lease in hours (one week max).
    LeaseHours(u8), 1..=168, "Lease"
}

/// Address pool handed to `ip pool`. DNS is optional; an empty string
/// suppresses the `dns-list` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DhcpPool {
    pub name: String,
    pub network: String,
    pub mask: String,
    pub gateway: String,
    pub dns: String,
    pub lease_hours: LeaseHours,
}
