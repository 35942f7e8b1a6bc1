//! Screen implementations. Each configuration domain is a top-level
//! Component owning its own record catalog.

pub mod acl;
pub mod devices;
pub mod dhcp;
pub mod ip;
pub mod lacp;
pub mod mirror;
pub mod nat;
pub mod port_security;
pub mod qos;
pub mod route;
pub mod settings;
pub mod snmp;
pub mod stp;
pub mod users;
pub mod vlan;

use std::path::PathBuf;

use ratatui::text::{Line, Span};
use ratatui::widgets::TableState;

use crate::component::Component;
use crate::screen::ScreenId;
use crate::theme;

/// Create all screen components keyed by screen id.
pub fn create_screens(settings_path: Option<PathBuf>) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Vlan, Box::new(vlan::VlanScreen::new()) as Box<dyn Component>),
        (ScreenId::Ip, Box::new(ip::IpScreen::new())),
        (ScreenId::Acl, Box::new(acl::AclScreen::new())),
        (ScreenId::Dhcp, Box::new(dhcp::DhcpScreen::new())),
        (ScreenId::Route, Box::new(route::RouteScreen::new())),
        (ScreenId::Lacp, Box::new(lacp::LacpScreen::new())),
        (ScreenId::Mirror, Box::new(mirror::MirrorScreen::new())),
        (ScreenId::Nat, Box::new(nat::NatScreen::new())),
        (
            ScreenId::PortSecurity,
            Box::new(port_security::PortSecurityScreen::new()),
        ),
        (ScreenId::Qos, Box::new(qos::QosScreen::new())),
        (ScreenId::Snmp, Box::new(snmp::SnmpScreen::new())),
        (ScreenId::Stp, Box::new(stp::StpScreen::new())),
        (ScreenId::Users, Box::new(users::UsersScreen::new())),
        (ScreenId::Devices, Box::new(devices::DevicesScreen::new())),
        (
            ScreenId::Settings,
            Box::new(settings::SettingsScreen::new(settings_path)),
        ),
    ]
}

/// Current selection of a table, defaulting to the first row.
pub(crate) fn selected_index(state: &TableState) -> usize {
    state.selected().unwrap_or(0)
}

/// Move a table selection by `delta`, clamped to the row count.
pub(crate) fn move_selection(state: &mut TableState, len: usize, delta: isize) {
    if len == 0 {
        return;
    }
    #[allow(clippy::cast_possible_wrap)]
    let current = selected_index(state) as isize;
    #[allow(clippy::cast_possible_wrap)]
    let next = (current + delta).clamp(0, len as isize - 1);
    #[allow(clippy::cast_sign_loss)]
    state.select(Some(next as usize));
}

/// Clamp the selection after the row count changed.
pub(crate) fn clamp_selection(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if selected_index(state) >= len {
        state.select(Some(len - 1));
    } else if state.selected().is_none() {
        state.select(Some(0));
    }
}

/// The standard key-hint line for catalog screens.
pub(crate) fn catalog_hints() -> Line<'static> {
    Line::from(vec![
        Span::styled("  j/k ", theme::key_hint_key()),
        Span::styled("navigate  ", theme::key_hint()),
        Span::styled("a ", theme::key_hint_key()),
        Span::styled("add  ", theme::key_hint()),
        Span::styled("e ", theme::key_hint_key()),
        Span::styled("edit  ", theme::key_hint()),
        Span::styled("d ", theme::key_hint_key()),
        Span::styled("delete  ", theme::key_hint()),
        Span::styled("p ", theme::key_hint_key()),
        Span::styled("preview", theme::key_hint()),
    ])
}
