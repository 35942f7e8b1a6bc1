//! Port references and interface-name canonicalization.
//!
//! Forms collect a short port-type token plus a port number; vendor CLI
//! wants the long interface prefix. Domains that already store canonical
//! names (aggregation members, mirror ports) bypass this entirely.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Short port-type token selectable in the VLAN / IP forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortTag {
    Xge,
    Ge,
    Fe,
    E,
}

impl PortTag {
    /// All tags in form-selector order.
    pub const ALL: [PortTag; 4] = [Self::Xge, Self::Ge, Self::Fe, Self::E];

    /// The short token as shown in tables and forms.
    pub fn short(self) -> &'static str {
        match self {
            Self::Xge => "XGE",
            Self::Ge => "GE",
            Self::Fe => "FE",
            Self::E => "E",
        }
    }

    /// The long vendor interface prefix.
    pub fn canonical_prefix(self) -> &'static str {
        match self {
            Self::Xge => "XGigabitethernet",
            Self::Ge => "Gigabitethernet",
            Self::Fe => "FastEthernet",
            Self::E => "Ethernet",
        }
    }
}

impl fmt::Display for PortTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

/// A structured port reference: type token + slot/port number text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRef {
    pub tag: PortTag,
    pub number: String,
}

impl PortRef {
    pub fn new(tag: PortTag, number: impl Into<String>) -> Self {
        Self {
            tag,
            number: number.into(),
        }
    }

    /// Canonical vendor interface identifier, e.g. `Gigabitethernet1/0/1`.
    pub fn canonical(&self) -> String {
        format!("{}{}", self.tag.canonical_prefix(), self.number)
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag.short(), self.number)
    }
}

// Short-token prefixes in match order. The legacy `口` suffix forms come
// first so `GE口1/0/1` never half-matches the bare `GE` arm.
const SHORT_PREFIXES: [(&str, &str); 8] = [
    ("XGE口", "XGigabitethernet"),
    ("XGE", "XGigabitethernet"),
    ("GE口", "Gigabitethernet"),
    ("GE", "Gigabitethernet"),
    ("FE口", "FastEthernet"),
    ("FE", "FastEthernet"),
    ("E口", "Ethernet"),
    ("E", "Ethernet"),
];

/// Canonicalize a raw interface string.
///
/// A recognized short token followed by a digit is rewritten to the long
/// prefix; anything else (already-canonical names, `Eth-Trunk`, unknown
/// tags) passes through unchanged.
pub fn canonicalize(raw: &str) -> String {
    for (short, long) in SHORT_PREFIXES {
        if let Some(rest) = raw.strip_prefix(short) {
            if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return format!("{long}{rest}");
            }
        }
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_ref_canonical_form() {
        let port = PortRef::new(PortTag::Ge, "1/0/1");
        assert_eq!(port.canonical(), "Gigabitethernet1/0/1");
        assert_eq!(port.to_string(), "GE1/0/1");
    }

    #[test]
    fn canonicalize_legacy_tokens() {
        assert_eq!(canonicalize("GE口1/0/1"), "Gigabitethernet1/0/1");
        assert_eq!(canonicalize("XGE口1/0/5"), "XGigabitethernet1/0/5");
        assert_eq!(canonicalize("FE0/1/1"), "FastEthernet0/1/1");
        assert_eq!(canonicalize("E口0/0/2"), "Ethernet0/0/2");
    }

    #[test]
    fn canonicalize_passes_unknown_through() {
        assert_eq!(canonicalize("Eth-Trunk1"), "Eth-Trunk1");
        assert_eq!(
            canonicalize("Gigabitethernet0/0/3"),
            "Gigabitethernet0/0/3"
        );
        assert_eq!(canonicalize("MGMT0"), "MGMT0");
    }
}
