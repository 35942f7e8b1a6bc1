//! One template function per domain.
//!
//! Every function maps records to command lines; nothing here touches
//! stores or UI state. Line forms are load-bearing: the preview text is
//! consumed downstream as-is, so clauses, spacing and `quit` terminators
//! must not drift.

use crate::model::acl::{AclGroup, AclRule};
use crate::model::dhcp::DhcpPool;
use crate::model::ip::IpBinding;
use crate::model::lacp::{AggregationGroup, LacpMode};
use crate::model::mirror::MirrorSession;
use crate::model::nat::{NatKind, NatPolicy};
use crate::model::port_security::PortSecurityBinding;
use crate::model::qos::{QosAction, QosPolicy, QosRule};
use crate::model::route::{RouteEntry, RouteKind};
use crate::model::snmp::{SnmpCommunity, SnmpTrapTarget};
use crate::model::stp::{StpPortEntry, StpSettings};
use crate::model::user::LocalUser;
use crate::model::vlan::VlanEntry;

use super::{Script, clause_unless, or_any};

pub fn vlan(entry: &VlanEntry) -> Script {
    let mut script = Script::new();
    script.push(format!("vlan {}", entry.id));
    script.push_optional("description", &entry.name);
    script.push(format!("port {}", entry.port.canonical()));
    script.push("quit");
    script
}

pub fn acl(group: &AclGroup, rules: &[AclRule]) -> Script {
    let mut script = Script::new();
    script.push(format!("acl {} {}", group.kind.keyword(), group.number));
    script.push_optional("description", &group.description);
    for rule in rules {
        let mut line = format!(
            "rule {} {} {} source {}",
            rule.seq, rule.action, rule.protocol, rule.source
        );
        line.push_str(&clause_unless("source-port eq", &rule.source_port, "any"));
        line.push_str(&format!(" destination {}", rule.destination));
        line.push_str(&clause_unless(
            "destination-port eq",
            &rule.destination_port,
            "any",
        ));
        line.push_str(&clause_unless("//", &rule.description, ""));
        script.push(line);
    }
    script.push("quit");
    script
}

pub fn dhcp(pool: &DhcpPool) -> Script {
    let mut script = Script::new();
    script.push("dhcp enable");
    script.push(format!("ip pool {}", pool.name));
    script.push(format!("network {} {}", pool.network, pool.mask));
    script.push(format!("gateway-list {}", pool.gateway));
    script.push_optional("dns-list", &pool.dns);
    script.push(format!("lease day 0 hour {}", pool.lease_hours));
    script.push("quit");
    script
}

pub fn ip(binding: &IpBinding) -> Script {
    let mut script = Script::new();
    script.push(format!("interface {}", binding.interface.canonical()));
    script.push(format!("ip address {} {}", binding.address, binding.mask));
    script.push("quit");
    script
}

pub fn lacp(group: &AggregationGroup) -> Script {
    let mut script = Script::new();
    script.push(format!("interface Eth-Trunk{}", group.id));
    script.push_optional("description", &group.description);
    script.push(match group.mode {
        LacpMode::Lacp => "mode lacp",
        LacpMode::Static => "mode manual",
    });
    script.push(format!("load-balance {}", group.load_balance));
    script.push("quit");
    for member in &group.members {
        script.push(format!("interface {member}"));
        script.push(format!("eth-trunk {}", group.id));
        script.push("quit");
    }
    script
}

pub fn mirror(session: &MirrorSession) -> Script {
    let kind = session.kind.keyword();
    let mut script = Script::new();
    script.push(format!("mirroring-group {} {kind}", session.id));
    script.push_optional("description", &session.description);
    script.push(format!(
        "mirroring-group {} {kind} source {} {}",
        session.id,
        session.source_port,
        session.direction.keyword()
    ));
    script.push(format!(
        "mirroring-group {} {kind} monitor-port {}",
        session.id, session.destination_port
    ));
    script.push("quit");
    script
}

pub fn nat(policy: &NatPolicy) -> Script {
    let mut script = Script::new();
    script.push(format!("nat {} {}", policy.kind.keyword(), policy.name));
    script.push_optional("description", &policy.description);
    script.push(match policy.kind {
        NatKind::Source => format!(
            "rule 1 source-address {} outbound-interface {}",
            or_any(&policy.source),
            policy.interface
        ),
        NatKind::Destination => format!(
            "rule 1 destination-address {} inbound-interface {}",
            or_any(&policy.destination),
            policy.interface
        ),
    });
    script.push("quit");
    script
}

pub fn port_security(binding: &PortSecurityBinding) -> Script {
    let mut script = Script::new();
    script.push(format!("interface {}", binding.port));
    script.push("port-security enable");
    script.push(format!("port-security max-mac-num {}", binding.max_mac));
    for mac in &binding.sticky_macs {
        script.push(format!("port-security mac-address {mac} sticky"));
    }
    script.push(format!("port-security violation {}", binding.violation));
    script.push("quit");
    script
}

pub fn qos(policy: &QosPolicy, rules: &[QosRule]) -> Script {
    let mut script = Script::new();
    script.push(format!("traffic policy {}", policy.name));
    script.push_optional("description", &policy.description);
    for rule in rules {
        script.push(format!(
            "classifier c{} if-match {} {}",
            rule.seq,
            rule.match_type.keyword(),
            rule.match_value
        ));
        script.push(format!("behavior b{}", rule.seq));
        script.push(match rule.action {
            QosAction::RateLimit => format!("car cir {}", rule.param),
            QosAction::Priority => format!("priority {}", rule.param),
            QosAction::Discard => "discard".to_string(),
        });
        script.push_optional("//", &rule.note);
        script.push("quit");
    }
    script.push("quit");
    script.push(format!("interface {}", policy.interface));
    script.push(format!("traffic-policy {} inbound", policy.name));
    script.push("quit");
    script
}

/// Dispatch is exhaustive over the closed kind enum; every route renders
/// a non-empty script.
pub fn route(entry: &RouteEntry) -> Script {
    let mut script = Script::new();
    match entry.kind {
        RouteKind::Static => {
            script.push(format!(
                "ip route-static {} {} {}",
                entry.destination, entry.mask, entry.next_hop
            ));
        }
        RouteKind::Rip => {
            script.push("rip");
            script.push(format!("version {}", or_default(&entry.param, "2")));
            script.push(format!("network {}", entry.destination));
            script.push("quit");
        }
        RouteKind::Ospf => {
            script.push("ospf 1");
            script.push(format!("area {}", or_default(&entry.param, "0")));
            script.push(format!("network {} {}", entry.destination, entry.mask));
            script.push("quit");
        }
        RouteKind::Bgp => {
            script.push("bgp 100");
            script.push(format!(
                "network {} mask {}",
                entry.destination, entry.mask
            ));
            if !entry.param.is_empty() {
                script.push(entry.param.clone());
            }
            script.push("quit");
        }
    }
    script
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

/// Renders every community and trap target, two loops concatenated.
pub fn snmp(communities: &[SnmpCommunity], targets: &[SnmpTrapTarget]) -> Script {
    let mut script = Script::new();
    for community in communities {
        let mut line = format!(
            "snmp-agent community {} {}",
            community.permission.keyword(),
            community.name
        );
        line.push_str(&clause_unless("source", &community.source_filter, "any"));
        script.push(line);
    }
    for target in targets {
        script.push(format!(
            "snmp-agent target-host {} params securityname public {} version-{}",
            target.address,
            target.kind,
            target.version.label()
        ));
    }
    script
}

pub fn user(user: &LocalUser) -> Script {
    let mut script = Script::new();
    script.push(format!("local-user {}", user.username));
    script.push(format!("password irreversible-cipher {}", user.password));
    script.push(format!("privilege level {}", user.privilege));
    script.push("service-type ssh telnet terminal");
    script.push("quit");
    script
}

pub fn stp(settings: &StpSettings, ports: &[StpPortEntry]) -> Script {
    let mut script = Script::new();
    if !settings.enabled {
        script.push("undo stp enable");
        return script;
    }
    script.push("stp enable");
    script.push(format!("stp mode {}", settings.mode));
    script.push(format!("stp priority {}", settings.bridge_priority));
    for port in ports {
        script.push(format!("interface {}", port.port));
        script.push(format!("stp port priority {}", port.priority));
        script.push(if port.edge_port {
            "stp edged-port enable"
        } else {
            "stp edged-port disable"
        });
        script.push(if port.enabled { "stp enable" } else { "stp disable" });
        script.push("quit");
    }
    script
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::model::acl::{AclAction, AclKind, AclNumber, AclProtocol, RuleSeq};
    use crate::model::dhcp::LeaseHours;
    use crate::model::lacp::{LoadBalance, TrunkId};
    use crate::model::mirror::{MirrorDirection, MirrorKind, MirrorSessionId};
    use crate::model::port::{PortRef, PortTag};
    use crate::model::port_security::{MaxMacCount, ViolationAction};
    use crate::model::qos::MatchType;
    use crate::model::snmp::{SnmpPermission, SnmpVersion, TrapKind};
    use crate::model::stp::{StpMode, StpPortPriority};
    use crate::model::user::PrivilegeLevel;
    use crate::model::vlan::VlanId;

    use super::*;

    fn office_vlan() -> VlanEntry {
        VlanEntry {
            id: VlanId::new(10).unwrap(),
            name: "办公网".to_string(),
            port: PortRef {
                tag: PortTag::Ge,
                number: "1/0/1".to_string(),
            },
        }
    }

    #[test]
    fn vlan_with_name_has_exactly_four_lines() {
        let script = vlan(&office_vlan());
        assert_eq!(
            script.lines(),
            &[
                "vlan 10",
                "description 办公网",
                "port Gigabitethernet1/0/1",
                "quit",
            ]
        );
    }

    #[test]
    fn vlan_without_name_drops_description() {
        let mut entry = office_vlan();
        entry.name.clear();
        let script = vlan(&entry);
        assert_eq!(
            script.lines(),
            &["vlan 10", "port Gigabitethernet1/0/1", "quit"]
        );
    }

    #[test]
    fn templates_are_idempotent() {
        let entry = office_vlan();
        assert_eq!(vlan(&entry).to_string(), vlan(&entry).to_string());
    }

    fn web_rule() -> AclRule {
        AclRule {
            seq: RuleSeq::new(5).unwrap(),
            action: AclAction::Permit,
            protocol: AclProtocol::Tcp,
            source: "192.168.1.0 0.0.0.255".to_string(),
            source_port: "any".to_string(),
            destination: "10.1.1.1".to_string(),
            destination_port: "80".to_string(),
            description: "允许办公区访问Web".to_string(),
        }
    }

    #[test]
    fn acl_rule_suppresses_any_port_clauses() {
        let group = AclGroup {
            number: AclNumber::new(3001).unwrap(),
            kind: AclKind::Advanced,
            description: String::new(),
        };
        let script = acl(&group, &[web_rule()]);
        assert_eq!(
            script.lines(),
            &[
                "acl number 3001",
                "rule 5 permit tcp source 192.168.1.0 0.0.0.255 destination 10.1.1.1 \
                 destination-port eq 80 // 允许办公区访问Web",
                "quit",
            ]
        );
    }

    #[test]
    fn acl_rule_emits_source_port_when_concrete() {
        let mut rule = web_rule();
        rule.source_port = "8080".to_string();
        rule.destination_port = "any".to_string();
        rule.description.clear();
        let group = AclGroup {
            number: AclNumber::new(2500).unwrap(),
            kind: AclKind::Basic,
            description: "办公区".to_string(),
        };
        let script = acl(&group, &[rule]);
        assert_eq!(
            script.lines(),
            &[
                "acl basic 2500",
                "description 办公区",
                "rule 5 permit tcp source 192.168.1.0 0.0.0.255 source-port eq 8080 \
                 destination 10.1.1.1",
                "quit",
            ]
        );
    }

    #[test]
    fn dhcp_pool_renders_lease_and_optional_dns() {
        let pool = DhcpPool {
            name: "vlan10_pool".to_string(),
            network: "192.168.10.0".to_string(),
            mask: "255.255.255.0".to_string(),
            gateway: "192.168.10.1".to_string(),
            dns: "223.5.5.5".to_string(),
            lease_hours: LeaseHours::new(24).unwrap(),
        };
        insta::assert_snapshot!(dhcp(&pool), @r"
        dhcp enable
        ip pool vlan10_pool
        network 192.168.10.0 255.255.255.0
        gateway-list 192.168.10.1
        dns-list 223.5.5.5
        lease day 0 hour 24
        quit
        ");

        let mut bare = pool;
        bare.dns.clear();
        assert!(!dhcp(&bare).to_string().contains("dns-list"));
    }

    #[test]
    fn ip_binding_uses_canonical_interface() {
        let binding = IpBinding {
            address: "10.0.0.1".to_string(),
            mask: "255.255.255.252".to_string(),
            interface: PortRef {
                tag: PortTag::Xge,
                number: "1/0/5".to_string(),
            },
        };
        assert_eq!(
            ip(&binding).lines(),
            &[
                "interface XGigabitethernet1/0/5",
                "ip address 10.0.0.1 255.255.255.252",
                "quit",
            ]
        );
    }

    #[test]
    fn lacp_renders_trunk_then_each_member() {
        let group = AggregationGroup {
            id: TrunkId::new(1).unwrap(),
            mode: LacpMode::Lacp,
            members: vec![
                "Gigabitethernet1/0/1".to_string(),
                "Gigabitethernet1/0/2".to_string(),
            ],
            load_balance: LoadBalance::SrcDstMac,
            description: "上联聚合".to_string(),
        };
        insta::assert_snapshot!(lacp(&group), @r"
        interface Eth-Trunk1
        description 上联聚合
        mode lacp
        load-balance src-dst-mac
        quit
        interface Gigabitethernet1/0/1
        eth-trunk 1
        quit
        interface Gigabitethernet1/0/2
        eth-trunk 1
        quit
        ");
    }

    #[test]
    fn static_lag_uses_manual_mode() {
        let group = AggregationGroup {
            id: TrunkId::new(2).unwrap(),
            mode: LacpMode::Static,
            members: vec![],
            load_balance: LoadBalance::SrcMac,
            description: String::new(),
        };
        assert!(lacp(&group).lines().contains(&"mode manual".to_string()));
    }

    #[test]
    fn mirror_session_lines() {
        let session = MirrorSession {
            id: MirrorSessionId::new(1).unwrap(),
            kind: MirrorKind::Local,
            source_port: "Gigabitethernet1/0/1".to_string(),
            direction: MirrorDirection::Both,
            destination_port: "Gigabitethernet1/0/24".to_string(),
            description: String::new(),
        };
        assert_eq!(
            mirror(&session).lines(),
            &[
                "mirroring-group 1 local",
                "mirroring-group 1 local source Gigabitethernet1/0/1 both",
                "mirroring-group 1 local monitor-port Gigabitethernet1/0/24",
                "quit",
            ]
        );
    }

    #[test]
    fn nat_kind_picks_rule_shape() {
        let mut policy = NatPolicy {
            name: "snat_out".to_string(),
            kind: NatKind::Source,
            source: "192.168.0.0 0.0.255.255".to_string(),
            destination: String::new(),
            interface: "Gigabitethernet1/0/24".to_string(),
            description: String::new(),
        };
        assert_eq!(
            nat(&policy).lines()[1],
            "rule 1 source-address 192.168.0.0 0.0.255.255 \
             outbound-interface Gigabitethernet1/0/24"
        );

        policy.kind = NatKind::Destination;
        assert_eq!(
            nat(&policy).lines(),
            &[
                "nat server snat_out",
                "rule 1 destination-address any inbound-interface Gigabitethernet1/0/24",
                "quit",
            ]
        );
    }

    #[test]
    fn port_security_renders_sticky_macs_in_order() {
        let binding = PortSecurityBinding {
            port: "Gigabitethernet1/0/3".to_string(),
            max_mac: MaxMacCount::new(2).unwrap(),
            sticky_macs: vec![
                "0001-0203-0405".to_string(),
                "0001-0203-0406".to_string(),
            ],
            violation: ViolationAction::Shutdown,
        };
        insta::assert_snapshot!(port_security(&binding), @r"
        interface Gigabitethernet1/0/3
        port-security enable
        port-security max-mac-num 2
        port-security mac-address 0001-0203-0405 sticky
        port-security mac-address 0001-0203-0406 sticky
        port-security violation shutdown
        quit
        ");
    }

    #[test]
    fn qos_policy_with_rules_and_apply_block() {
        let policy = QosPolicy {
            name: "limit_web".to_string(),
            description: String::new(),
            interface: "Gigabitethernet1/0/1".to_string(),
        };
        let rules = vec![QosRule {
            seq: RuleSeq::new(10).unwrap(),
            match_type: MatchType::Port,
            match_value: "80".to_string(),
            action: QosAction::RateLimit,
            param: "10000".to_string(),
            note: "限速10M".to_string(),
        }];
        insta::assert_snapshot!(qos(&policy, &rules), @r"
        traffic policy limit_web
        classifier c10 if-match dport 80
        behavior b10
        car cir 10000
        // 限速10M
        quit
        quit
        interface Gigabitethernet1/0/1
        traffic-policy limit_web inbound
        quit
        ");
    }

    #[test]
    fn route_dispatch_is_total() {
        let base = RouteEntry {
            kind: RouteKind::Static,
            destination: "0.0.0.0".to_string(),
            mask: "0.0.0.0".to_string(),
            next_hop: "192.168.1.254".to_string(),
            param: String::new(),
        };
        for kind in RouteKind::ALL {
            let entry = RouteEntry { kind, ..base.clone() };
            assert!(!route(&entry).is_empty(), "{kind:?} rendered nothing");
        }
    }

    #[test]
    fn static_route_is_one_line() {
        let entry = RouteEntry {
            kind: RouteKind::Static,
            destination: "0.0.0.0".to_string(),
            mask: "0.0.0.0".to_string(),
            next_hop: "192.168.1.254".to_string(),
            param: String::new(),
        };
        assert_eq!(
            route(&entry).lines(),
            &["ip route-static 0.0.0.0 0.0.0.0 192.168.1.254"]
        );
    }

    #[test]
    fn rip_and_ospf_default_their_params() {
        let entry = RouteEntry {
            kind: RouteKind::Rip,
            destination: "10.0.0.0".to_string(),
            mask: "255.0.0.0".to_string(),
            next_hop: String::new(),
            param: String::new(),
        };
        assert_eq!(
            route(&entry).lines(),
            &["rip", "version 2", "network 10.0.0.0", "quit"]
        );

        let entry = RouteEntry {
            kind: RouteKind::Ospf,
            param: "0.0.0.1".to_string(),
            ..entry
        };
        assert_eq!(
            route(&entry).lines(),
            &["ospf 1", "area 0.0.0.1", "network 10.0.0.0 255.0.0.0", "quit"]
        );
    }

    #[test]
    fn snmp_source_clause_omitted_iff_any() {
        let communities = vec![
            SnmpCommunity {
                name: "private".to_string(),
                permission: SnmpPermission::ReadWrite,
                source_filter: "any".to_string(),
            },
            SnmpCommunity {
                name: "public".to_string(),
                permission: SnmpPermission::ReadOnly,
                source_filter: "192.168.1.0 255.255.255.0".to_string(),
            },
        ];
        let script = snmp(&communities, &[]);
        assert_eq!(
            script.lines(),
            &[
                "snmp-agent community rw private",
                "snmp-agent community ro public source 192.168.1.0 255.255.255.0",
            ]
        );
    }

    #[test]
    fn snmp_concatenates_trap_targets_after_communities() {
        let targets = vec![
            SnmpTrapTarget {
                address: "192.168.1.100".to_string(),
                kind: TrapKind::Inform,
                version: SnmpVersion::V2c,
            },
            SnmpTrapTarget {
                address: "192.168.1.101".to_string(),
                kind: TrapKind::Trap,
                version: SnmpVersion::V3,
            },
        ];
        assert_eq!(
            snmp(&[], &targets).lines(),
            &[
                "snmp-agent target-host 192.168.1.100 params securityname public \
                 inform version-v2c",
                "snmp-agent target-host 192.168.1.101 params securityname public \
                 trap version-v3",
            ]
        );
    }

    #[test]
    fn user_account_block() {
        let account = LocalUser {
            username: "admin".to_string(),
            privilege: PrivilegeLevel::new(15).unwrap(),
            password: "Admin@123".to_string(),
            note: String::new(),
        };
        assert_eq!(
            user(&account).lines(),
            &[
                "local-user admin",
                "password irreversible-cipher Admin@123",
                "privilege level 15",
                "service-type ssh telnet terminal",
                "quit",
            ]
        );
    }

    #[test]
    fn stp_disabled_is_a_single_undo_line() {
        let settings = StpSettings {
            enabled: false,
            ..StpSettings::default()
        };
        assert_eq!(stp(&settings, &[]).lines(), &["undo stp enable"]);
    }

    #[test]
    fn stp_enabled_renders_ports() {
        let settings = StpSettings::default();
        let ports = vec![StpPortEntry {
            port: "Gigabitethernet1/0/1".to_string(),
            priority: StpPortPriority::new(64).unwrap(),
            edge_port: true,
            enabled: true,
        }];
        insta::assert_snapshot!(stp(&settings, &ports), @r"
        stp enable
        stp mode mstp
        stp priority 32768
        interface Gigabitethernet1/0/1
        stp port priority 64
        stp edged-port enable
        stp enable
        quit
        ");
    }
}
