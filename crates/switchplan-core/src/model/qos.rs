// ── QoS policy domain types ──

use serde::{Deserialize, Serialize};

use super::acl::RuleSeq;

/// What a classifier matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    Protocol,
    SourceAddress,
    DestAddress,
    Port,
}

impl MatchType {
    pub const ALL: [MatchType; 4] = [
        Self::Protocol,
        Self::SourceAddress,
        Self::DestAddress,
        Self::Port,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::SourceAddress => "src-ip",
            Self::DestAddress => "dst-ip",
            Self::Port => "dport",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::SourceAddress => "source address",
            Self::DestAddress => "destination address",
            Self::Port => "port",
        }
    }
}

/// What the matching behavior does. `RateLimit` and `Priority` carry
/// their argument in the rule's `param` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QosAction {
    RateLimit,
    Priority,
    Discard,
}

impl QosAction {
    pub const ALL: [QosAction; 3] = [Self::RateLimit, Self::Priority, Self::Discard];

    pub fn label(self) -> &'static str {
        match self {
            Self::RateLimit => "rate-limit",
            Self::Priority => "priority",
            Self::Discard => "discard",
        }
    }
}

/// Policy header row; classifiers live in a `RuleBook` keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosPolicy {
    pub name: String,
    pub description: String,
    pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QosRule {
    pub seq: RuleSeq,
    pub match_type: MatchType,
    pub match_value: String,
    pub action: QosAction,
    pub param: String,
    pub note: String,
}
