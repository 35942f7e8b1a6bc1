//! SNMP screen — communities and trap targets under two sub-tabs.
//!
//! The script is one unit: `p` previews every community line followed by
//! every target line, whichever sub-tab is active.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, Script, SnmpCommunity, SnmpPermission, SnmpTrapTarget, SnmpVersion,
    TrapKind, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;
use crate::widgets::sub_tabs::render_sub_tabs;

const SUB_TABS: [&str; 2] = ["Communities", "Trap Targets"];

fn seed_communities() -> Catalog<SnmpCommunity> {
    Catalog::with_entries(
        "community",
        vec![
            SnmpCommunity {
                name: "public".to_string(),
                permission: SnmpPermission::ReadOnly,
                source_filter: "192.168.1.0 255.255.255.0".to_string(),
            },
            SnmpCommunity {
                name: "private".to_string(),
                permission: SnmpPermission::ReadWrite,
                source_filter: "any".to_string(),
            },
        ],
    )
}

fn seed_targets() -> Catalog<SnmpTrapTarget> {
    Catalog::with_entries(
        "trap target",
        vec![
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
        ],
    )
}

fn permission_options() -> Vec<&'static str> {
    SnmpPermission::ALL.iter().map(|p| p.label()).collect()
}

fn trap_kind_labels() -> Vec<String> {
    TrapKind::ALL.iter().map(ToString::to_string).collect()
}

fn version_options() -> Vec<&'static str> {
    SnmpVersion::ALL.iter().map(|v| v.label()).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum SubTab {
    Communities,
    Targets,
}

pub struct SnmpScreen {
    focused: bool,
    sub_tab: SubTab,
    communities: Catalog<SnmpCommunity>,
    community_state: TableState,
    targets: Catalog<SnmpTrapTarget>,
    target_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl SnmpScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            sub_tab: SubTab::Communities,
            communities: seed_communities(),
            community_state: TableState::default().with_selected(Some(0)),
            targets: seed_targets(),
            target_state: TableState::default().with_selected(Some(0)),
            form: None,
            editing: None,
            pending_delete: None,
            preview: None,
        }
    }

    fn active_len(&self) -> usize {
        match self.sub_tab {
            SubTab::Communities => self.communities.len(),
            SubTab::Targets => self.targets.len(),
        }
    }

    fn active_state(&mut self) -> &mut TableState {
        match self.sub_tab {
            SubTab::Communities => &mut self.community_state,
            SubTab::Targets => &mut self.target_state,
        }
    }

    fn open_community_form(&mut self, entry: Option<(usize, &SnmpCommunity)>) {
        let (title, name, permission, source) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                (
                    "Edit Community",
                    e.name.clone(),
                    e.permission,
                    e.source_filter.clone(),
                )
            }
            None => {
                self.editing = None;
                (
                    "Add Community",
                    String::new(),
                    SnmpPermission::ReadOnly,
                    "any".to_string(),
                )
            }
        };
        let perm_idx = SnmpPermission::ALL
            .iter()
            .position(|&p| p == permission)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Community", name),
                FormField::select("Permission", permission_options(), perm_idx),
                FormField::text_with("Source", source),
            ],
        ));
    }

    fn open_target_form(&mut self, entry: Option<(usize, &SnmpTrapTarget)>) {
        let (title, address, kind, version) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                ("Edit Trap Target", e.address.clone(), e.kind, e.version)
            }
            None => {
                self.editing = None;
                (
                    "Add Trap Target",
                    String::new(),
                    TrapKind::Trap,
                    SnmpVersion::V2c,
                )
            }
        };
        let kind_idx = TrapKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
        let version_idx = SnmpVersion::ALL
            .iter()
            .position(|&v| v == version)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Address", address),
                FormField::select_owned("Kind", trap_kind_labels(), kind_idx),
                FormField::select("Version", version_options(), version_idx),
            ],
        ));
    }

    fn commit_community(form: &FormState) -> Result<SnmpCommunity, CoreError> {
        let name = require_nonempty("Community name", &form.value(0))?;
        let permission =
            SnmpPermission::ALL[form.select_index(1).min(SnmpPermission::ALL.len() - 1)];
        Ok(SnmpCommunity {
            name,
            permission,
            source_filter: form.value(2),
        })
    }

    fn commit_target(form: &FormState) -> Result<SnmpTrapTarget, CoreError> {
        let address = require_nonempty("Address", &form.value(0))?;
        let kind = TrapKind::ALL[form.select_index(1).min(TrapKind::ALL.len() - 1)];
        let version = SnmpVersion::ALL[form.select_index(2).min(SnmpVersion::ALL.len() - 1)];
        Ok(SnmpTrapTarget {
            address,
            kind,
            version,
        })
    }

    fn build_script(&self) -> Script {
        let communities: Vec<SnmpCommunity> = self.communities.iter().cloned().collect();
        let targets: Vec<SnmpTrapTarget> = self.targets.iter().cloned().collect();
        script::snmp(&communities, &targets)
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = Some(self.build_script());
        }
    }

    fn submit_form(&mut self, form: &FormState) -> Result<Option<Action>> {
        let outcome = match self.sub_tab {
            SubTab::Communities => Self::commit_community(form).map(|entry| {
                match self.editing {
                    Some(idx) => self.communities.update(idx, entry).map(|()| "Community updated"),
                    None => {
                        self.communities.add(entry);
                        self.community_state.select(Some(self.communities.len() - 1));
                        Ok("Community added")
                    }
                }
            }),
            SubTab::Targets => Self::commit_target(form).map(|entry| match self.editing {
                Some(idx) => self.targets.update(idx, entry).map(|()| "Trap target updated"),
                None => {
                    self.targets.add(entry);
                    self.target_state.select(Some(self.targets.len() - 1));
                    Ok("Trap target added")
                }
            }),
        };
        match outcome {
            Ok(stored) => {
                let message = stored?;
                self.refresh_preview();
                Ok(Some(Action::Notify(Notification::success(message))))
            }
            Err(err) => Ok(Some(Action::Notify(Notification::error(err.to_string())))),
        }
    }
}

impl Component for SnmpScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(mut form) = self.form.take() {
            return match form.handle_key(key) {
                FormEvent::Cancelled => Ok(None),
                FormEvent::Submitted => {
                    let action = self.submit_form(&form)?;
                    // A validation failure keeps the form open.
                    if matches!(
                        action,
                        Some(Action::Notify(ref n)) if n.is_error()
                    ) {
                        self.form = Some(form);
                    }
                    Ok(action)
                }
                FormEvent::Edited => {
                    self.form = Some(form);
                    Ok(None)
                }
            };
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.sub_tab = SubTab::Communities;
                Ok(None)
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.sub_tab = SubTab::Targets;
                Ok(None)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.active_len();
                move_selection(self.active_state(), len, 1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.active_len();
                move_selection(self.active_state(), len, -1);
                Ok(None)
            }
            KeyCode::Char('a') => {
                match self.sub_tab {
                    SubTab::Communities => self.open_community_form(None),
                    SubTab::Targets => self.open_target_form(None),
                }
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.sub_tab {
                SubTab::Communities => {
                    let idx = selected_index(&self.community_state);
                    match self.communities.selected(self.community_state.selected()) {
                        Ok(entry) => {
                            let entry = entry.clone();
                            self.open_community_form(Some((idx, &entry)));
                            Ok(None)
                        }
                        Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                    }
                }
                SubTab::Targets => {
                    let idx = selected_index(&self.target_state);
                    match self.targets.selected(self.target_state.selected()) {
                        Ok(entry) => {
                            let entry = entry.clone();
                            self.open_target_form(Some((idx, &entry)));
                            Ok(None)
                        }
                        Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                    }
                }
            },
            KeyCode::Char('d') => match self.sub_tab {
                SubTab::Communities => {
                    match self.communities.selected(self.community_state.selected()) {
                        Ok(entry) => {
                            self.pending_delete = self.community_state.selected();
                            Ok(Some(Action::ShowConfirm(format!(
                                "Delete community {}?",
                                entry.name
                            ))))
                        }
                        Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                    }
                }
                SubTab::Targets => match self.targets.selected(self.target_state.selected()) {
                    Ok(entry) => {
                        self.pending_delete = self.target_state.selected();
                        Ok(Some(Action::ShowConfirm(format!(
                            "Delete trap target {}?",
                            entry.address
                        ))))
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                },
            },
            KeyCode::Char('p') => {
                if self.preview.is_some() {
                    self.preview = None;
                } else {
                    self.preview = Some(self.build_script());
                }
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DeleteConfirmed = action {
            if let Some(idx) = self.pending_delete.take() {
                let message = match self.sub_tab {
                    SubTab::Communities => {
                        self.communities.remove(idx)?;
                        clamp_selection(&mut self.community_state, self.communities.len());
                        "Community deleted"
                    }
                    SubTab::Targets => {
                        self.targets.remove(idx)?;
                        clamp_selection(&mut self.target_state, self.targets.len());
                        "Trap target deleted"
                    }
                };
                self.refresh_preview();
                return Ok(Some(Action::Notify(Notification::success(message))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(
                " SNMP ({} communities, {} targets) ",
                self.communities.len(),
                self.targets.len()
            ))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (table_area, preview_area) = if self.preview.is_some() {
            let chunks =
                Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(table_area);

        let active = match self.sub_tab {
            SubTab::Communities => 0,
            SubTab::Targets => 1,
        };
        frame.render_widget(Paragraph::new(render_sub_tabs(&SUB_TABS, active)), layout[0]);

        match self.sub_tab {
            SubTab::Communities => {
                let header = Row::new(vec![
                    Cell::from("Community").style(theme::table_header()),
                    Cell::from("Permission").style(theme::table_header()),
                    Cell::from("Source").style(theme::table_header()),
                ]);
                let rows: Vec<Row> = self
                    .communities
                    .iter()
                    .map(|entry| {
                        Row::new(vec![
                            Cell::from(entry.name.clone()),
                            Cell::from(entry.permission.label()),
                            Cell::from(entry.source_filter.clone()),
                        ])
                        .style(theme::table_row())
                    })
                    .collect();
                let widths = [
                    Constraint::Length(14),
                    Constraint::Length(11),
                    Constraint::Min(20),
                ];
                let table = Table::new(rows, widths)
                    .header(header)
                    .row_highlight_style(theme::table_selected());
                let mut state = self.community_state;
                frame.render_stateful_widget(table, layout[1], &mut state);
            }
            SubTab::Targets => {
                let header = Row::new(vec![
                    Cell::from("Address").style(theme::table_header()),
                    Cell::from("Kind").style(theme::table_header()),
                    Cell::from("Version").style(theme::table_header()),
                ]);
                let rows: Vec<Row> = self
                    .targets
                    .iter()
                    .map(|entry| {
                        Row::new(vec![
                            Cell::from(entry.address.clone()),
                            Cell::from(entry.kind.to_string()),
                            Cell::from(entry.version.label()),
                        ])
                        .style(theme::table_row())
                    })
                    .collect();
                let widths = [
                    Constraint::Length(18),
                    Constraint::Length(8),
                    Constraint::Length(8),
                ];
                let table = Table::new(rows, widths)
                    .header(header)
                    .row_highlight_style(theme::table_selected());
                let mut state = self.target_state;
                frame.render_stateful_widget(table, layout[1], &mut state);
            }
        }

        let hints = Line::from(vec![
            Span::styled("h/l", theme::key_hint_key()),
            Span::styled(" sub-tab  ", theme::key_hint()),
            Span::styled("j/k", theme::key_hint_key()),
            Span::styled(" navigate  ", theme::key_hint()),
            Span::styled("a", theme::key_hint_key()),
            Span::styled(" add  ", theme::key_hint()),
            Span::styled("e", theme::key_hint_key()),
            Span::styled(" edit  ", theme::key_hint()),
            Span::styled("d", theme::key_hint_key()),
            Span::styled(" delete  ", theme::key_hint()),
            Span::styled("p", theme::key_hint_key()),
            Span::styled(" preview", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "SNMP Script", script);
        }

        if let Some(form) = self.form.as_ref() {
            form.render(frame, area);
        }
    }

    fn overlay_open(&self) -> bool {
        self.form.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "SNMP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_form_requires_a_name() {
        let form = FormState::new(
            "Add Community",
            vec![
                FormField::text_with("Community", "  "),
                FormField::select("Permission", permission_options(), 0),
                FormField::text_with("Source", "any"),
            ],
        );
        assert!(SnmpScreen::commit_community(&form).is_err());
    }

    #[test]
    fn preview_covers_both_sub_tabs() {
        let screen = SnmpScreen::new();
        let script = screen.build_script();
        assert_eq!(script.lines().len(), 4);
        assert!(script.lines()[0].starts_with("snmp-agent community"));
        assert!(script.lines()[2].starts_with("snmp-agent target-host"));
    }
}
