// ── VLAN domain types ──

use serde::{Deserialize, Serialize};

use super::bounded_int;
use super::port::PortRef;

bounded_int! {
    /// IEEE 802.1Q VLAN identifier.
    VlanId(u16), 1..=4094, "VLAN ID"
}

/// One VLAN intent: id, optional name, one member port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlanEntry {
    pub id: VlanId,
    pub name: String,
    pub port: PortRef,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn vlan_id_range() {
        assert!(VlanId::new(1).is_ok());
        assert!(VlanId::new(4094).is_ok());
        assert!(VlanId::new(0).is_err());
        assert!(VlanId::new(4095).is_err());
    }

    #[test]
    fn vlan_id_parse_message_names_the_range() {
        let err = VlanId::parse("abc").unwrap_err();
        assert!(err.to_string().contains("1 and 4094"));
    }
}
