//! Screen trait and screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen. Screens 1-9 are navigable by
/// number keys; the rest cycle with Tab/BackTab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Vlan, // 1
    Ip,           // 2
    Acl,          // 3
    Dhcp,         // 4
    Route,        // 5
    Lacp,         // 6
    Mirror,       // 7
    Nat,          // 8
    PortSecurity, // 9
    Qos,
    Snmp,
    Stp,
    Users,
    Devices,
    /// Global settings — opened with `,`, not in the tab bar.
    Settings,
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 14] = [
        Self::Vlan,
        Self::Ip,
        Self::Acl,
        Self::Dhcp,
        Self::Route,
        Self::Lacp,
        Self::Mirror,
        Self::Nat,
        Self::PortSecurity,
        Self::Qos,
        Self::Snmp,
        Self::Stp,
        Self::Users,
        Self::Devices,
    ];

    /// Numeric jump key, if this screen has one.
    pub fn number(self) -> Option<u8> {
        match self {
            Self::Vlan => Some(1),
            Self::Ip => Some(2),
            Self::Acl => Some(3),
            Self::Dhcp => Some(4),
            Self::Route => Some(5),
            Self::Lacp => Some(6),
            Self::Mirror => Some(7),
            Self::Nat => Some(8),
            Self::PortSecurity => Some(9),
            _ => None,
        }
    }

    /// Screen from a numeric key (1-9). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|screen| screen.number() == Some(n))
    }

    /// Next screen in tab order (wraps around; Settings stays put).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self);
        match idx {
            Some(i) => Self::ALL[(i + 1) % Self::ALL.len()],
            None => self,
        }
    }

    /// Previous screen in tab order (wraps around; Settings stays put).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self);
        match idx {
            Some(i) => Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()],
            None => self,
        }
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Vlan => "VLAN",
            Self::Ip => "IP",
            Self::Acl => "ACL",
            Self::Dhcp => "DHCP",
            Self::Route => "Route",
            Self::Lacp => "LACP",
            Self::Mirror => "Mirror",
            Self::Nat => "NAT",
            Self::PortSecurity => "Port-Sec",
            Self::Qos => "QoS",
            Self::Snmp => "SNMP",
            Self::Stp => "STP",
            Self::Users => "Users",
            Self::Devices => "Devices",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for n in 1..=9 {
            let screen = ScreenId::from_number(n).expect("screen for number key");
            assert_eq!(screen.number(), Some(n));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(10), None);
    }

    #[test]
    fn tab_cycle_covers_all_screens() {
        let mut seen = vec![ScreenId::Vlan];
        let mut current = ScreenId::Vlan;
        for _ in 1..ScreenId::ALL.len() {
            current = current.next();
            seen.push(current);
        }
        assert_eq!(seen, ScreenId::ALL.to_vec());
        assert_eq!(current.next(), ScreenId::Vlan);
    }

    #[test]
    fn settings_is_outside_the_cycle() {
        assert_eq!(ScreenId::Settings.number(), None);
        assert_eq!(ScreenId::Settings.next(), ScreenId::Settings);
        assert_eq!(ScreenId::Settings.prev(), ScreenId::Settings);
    }
}
