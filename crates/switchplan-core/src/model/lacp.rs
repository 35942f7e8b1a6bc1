// ── Link aggregation domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

use super::bounded_int;

bounded_int! {
    /// Eth-Trunk interface number.
    TrunkId(u8), 1..=64, "Aggregation group id"
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LacpMode {
    Lacp,
    Static,
}

impl LacpMode {
    pub const ALL: [LacpMode; 2] = [Self::Lacp, Self::Static];

    pub fn label(self) -> &'static str {
        match self {
            Self::Lacp => "LACP",
            Self::Static => "static",
        }
    }
}

/// Per-flow hash key for member selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LoadBalance {
    SrcMac,
    DstMac,
    SrcDstMac,
    SrcIp,
    DstIp,
    SrcDstIp,
}

impl LoadBalance {
    pub const ALL: [LoadBalance; 6] = [
        Self::SrcMac,
        Self::DstMac,
        Self::SrcDstMac,
        Self::SrcIp,
        Self::DstIp,
        Self::SrcDstIp,
    ];
}

/// One aggregation group. Members are canonical interface names in the
/// order the operator listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationGroup {
    pub id: TrunkId,
    pub mode: LacpMode,
    pub members: Vec<String>,
    pub load_balance: LoadBalance,
    pub description: String,
}

impl AggregationGroup {
    /// Split comma-separated member text, dropping blanks.
    pub fn parse_members(text: &str) -> Vec<String> {
        text.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(ToString::to_string)
            .collect()
    }

    pub fn members_text(&self) -> String {
        self.members.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_members_trims_and_drops_blanks() {
        let members =
            AggregationGroup::parse_members("GigabitEthernet0/0/1, GigabitEthernet0/0/2,,  ");
        assert_eq!(
            members,
            vec!["GigabitEthernet0/0/1", "GigabitEthernet0/0/2"]
        );
    }

    #[test]
    fn load_balance_kebab_display() {
        assert_eq!(LoadBalance::SrcDstMac.to_string(), "src-dst-mac");
        assert_eq!(LoadBalance::SrcIp.to_string(), "src-ip");
    }
}
