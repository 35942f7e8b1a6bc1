//! Domain layer for the SwitchPlan workspace.
//!
//! This crate owns everything that does not need a terminal:
//!
//! - **Domain model** ([`model`]) — flat record types per configuration
//!   domain (`VlanEntry`, `AclGroup`, `RouteEntry`, …) built on validated
//!   value types (`VlanId`, `AclNumber`, `PrivilegeLevel`, …) so an
//!   out-of-range or non-numeric field cannot survive construction.
//!
//! - **Stores** ([`store`]) — [`Catalog<T>`], the panel-scoped ordered
//!   record collection, and [`RuleBook<K, T>`], the group-keyed child-rule
//!   association used by ACL and QoS.
//!
//! - **Script generation** ([`script`]) — pure template functions mapping
//!   records to vendor CLI command lines, plus the interface-name
//!   canonicalizer ([`model::port::canonicalize`]). Rendering is
//!   deterministic: same records, same bytes.
//!
//! Nothing here performs I/O; error values ([`CoreError`]) carry the
//! operator-facing message verbatim.

pub mod error;
pub mod model;
pub mod script;
pub mod store;

pub use error::CoreError;
pub use script::Script;
pub use store::{Catalog, RuleBook};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    acl::{AclAction, AclGroup, AclKind, AclNumber, AclProtocol, AclRule, RuleSeq},
    device::{DeviceEntry, DeviceStatus, Management},
    dhcp::{DhcpPool, LeaseHours},
    ip::IpBinding,
    lacp::{AggregationGroup, LacpMode, LoadBalance, TrunkId},
    mirror::{MirrorDirection, MirrorKind, MirrorSession, MirrorSessionId},
    nat::{NatKind, NatPolicy},
    port::{PortRef, PortTag, canonicalize},
    port_security::{MaxMacCount, PortSecurityBinding, ViolationAction},
    qos::{MatchType, QosAction, QosPolicy, QosRule},
    require_nonempty,
    route::{RouteEntry, RouteKind},
    snmp::{SnmpCommunity, SnmpPermission, SnmpTrapTarget, SnmpVersion, TrapKind},
    stp::{StpMode, StpPortEntry, StpPortPriority, StpSettings},
    user::{LocalUser, PrivilegeLevel},
    vlan::{VlanEntry, VlanId},
};
