// ── SNMP domain types ──

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpPermission {
    ReadOnly,
    ReadWrite,
}

impl SnmpPermission {
    pub const ALL: [SnmpPermission; 2] = [Self::ReadOnly, Self::ReadWrite];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::ReadOnly => "ro",
            Self::ReadWrite => "rw",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ReadOnly => "RO",
            Self::ReadWrite => "RW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum TrapKind {
    Trap,
    Inform,
}

impl TrapKind {
    pub const ALL: [TrapKind; 2] = [Self::Trap, Self::Inform];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

impl SnmpVersion {
    pub const ALL: [SnmpVersion; 3] = [Self::V1, Self::V2c, Self::V3];

    pub fn label(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2c => "v2c",
            Self::V3 => "v3",
        }
    }
}

/// Community string with an optional source filter; `any` means
/// unconstrained and suppresses the `source` clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpCommunity {
    pub name: String,
    pub permission: SnmpPermission,
    pub source_filter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnmpTrapTarget {
    pub address: String,
    pub kind: TrapKind,
    pub version: SnmpVersion,
}
