// ── ACL domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::bounded_int;

bounded_int! {
    /// ACL group number. 2000–2999 is the basic range, 3000–3999 advanced;
    /// the kind field is authoritative for the generated keyword.
    AclNumber(u16), 2000..=3999, "ACL number"
}

bounded_int! {
    /// Rule sequence number, shared with QoS classifier naming.
    RuleSeq(u16), 1..=9999, "Rule sequence"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AclKind {
    Basic,
    Advanced,
}

impl AclKind {
    pub const ALL: [AclKind; 2] = [Self::Basic, Self::Advanced];

    /// The vendor grammar spells advanced ACLs `acl number <n>`.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "number",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AclAction {
    Permit,
    Deny,
}

impl AclAction {
    pub const ALL: [AclAction; 2] = [Self::Permit, Self::Deny];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AclProtocol {
    Ip,
    Tcp,
    Udp,
    Icmp,
}

impl AclProtocol {
    pub const ALL: [AclProtocol; 4] = [Self::Ip, Self::Tcp, Self::Udp, Self::Icmp];
}

/// ACL group header row. Rules live in a `RuleBook` keyed by the number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGroup {
    pub number: AclNumber,
    pub kind: AclKind,
    pub description: String,
}

/// One permit/deny rule. Address and port fields keep the `any` sentinel
/// as stored text; the template decides which clauses it suppresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    pub seq: RuleSeq,
    pub action: AclAction,
    pub protocol: AclProtocol,
    pub source: String,
    pub source_port: String,
    pub destination: String,
    pub destination_port: String,
    pub description: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn acl_number_range() {
        assert!(AclNumber::new(2000).is_ok());
        assert!(AclNumber::new(3999).is_ok());
        assert!(AclNumber::new(1999).is_err());
        assert!(AclNumber::new(4000).is_err());
    }

    #[test]
    fn kind_keywords() {
        assert_eq!(AclKind::Basic.keyword(), "basic");
        assert_eq!(AclKind::Advanced.keyword(), "number");
    }

    #[test]
    fn action_renders_lowercase() {
        assert_eq!(AclAction::Permit.to_string(), "permit");
        assert_eq!(AclProtocol::Icmp.to_string(), "icmp");
    }
}
