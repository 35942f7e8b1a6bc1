//! Devices screen — switch inventory with incremental search.
//!
//! Inventory rows carry no script template, so there is no preview here;
//! `/` filters, `r` is a placeholder until live polling lands.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{Catalog, CoreError, DeviceEntry, DeviceStatus, Management, require_nonempty};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{clamp_selection, move_selection};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};

fn seed() -> Catalog<DeviceEntry> {
    Catalog::with_entries(
        "device",
        vec![
            DeviceEntry {
                name: "核心交换机".to_string(),
                address: "192.168.1.1".to_string(),
                model: "S5735".to_string(),
                management: Management::Ssh,
                status: DeviceStatus::Online,
            },
            DeviceEntry {
                name: "汇聚交换机1".to_string(),
                address: "192.168.1.2".to_string(),
                model: "S5720".to_string(),
                management: Management::Telnet,
                status: DeviceStatus::Offline,
            },
            DeviceEntry {
                name: "接入交换机A".to_string(),
                address: "192.168.1.101".to_string(),
                model: "S2700".to_string(),
                management: Management::Ssh,
                status: DeviceStatus::Online,
            },
        ],
    )
}

fn management_options() -> Vec<&'static str> {
    Management::ALL.iter().map(|m| m.label()).collect()
}

fn status_options() -> Vec<&'static str> {
    DeviceStatus::ALL.iter().map(|s| s.label()).collect()
}

pub struct DevicesScreen {
    focused: bool,
    catalog: Catalog<DeviceEntry>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    search: Option<String>,
}

impl DevicesScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            catalog: seed(),
            table_state: TableState::default().with_selected(Some(0)),
            form: None,
            editing: None,
            pending_delete: None,
            search: None,
        }
    }

    /// Indices of rows matching the active search, all rows otherwise.
    fn visible(&self) -> Vec<usize> {
        match self.search.as_deref() {
            Some(needle) if !needle.is_empty() => self
                .catalog
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.matches(needle))
                .map(|(idx, _)| idx)
                .collect(),
            _ => (0..self.catalog.len()).collect(),
        }
    }

    /// Map the table selection back to a catalog index.
    fn selected_catalog_index(&self) -> Option<usize> {
        let visible = self.visible();
        self.table_state.selected().and_then(|i| visible.get(i).copied())
    }

    fn selected_entry(&self) -> Result<&DeviceEntry, CoreError> {
        self.selected_catalog_index()
            .and_then(|idx| self.catalog.get(idx))
            .ok_or_else(|| CoreError::nothing_selected("device"))
    }

    fn open_form(&mut self, entry: Option<(usize, &DeviceEntry)>) {
        let (title, entry) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                ("Edit Device", e.clone())
            }
            None => {
                self.editing = None;
                (
                    "Add Device",
                    DeviceEntry {
                        name: String::new(),
                        address: String::new(),
                        model: String::new(),
                        management: Management::Ssh,
                        status: DeviceStatus::Online,
                    },
                )
            }
        };
        let mgmt_idx = Management::ALL
            .iter()
            .position(|&m| m == entry.management)
            .unwrap_or(0);
        let status_idx = DeviceStatus::ALL
            .iter()
            .position(|&s| s == entry.status)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Name", entry.name),
                FormField::text_with("Address", entry.address),
                FormField::text_with("Model", entry.model),
                FormField::select("Management", management_options(), mgmt_idx),
                FormField::select("Status", status_options(), status_idx),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<DeviceEntry, CoreError> {
        let name = require_nonempty("Name", &form.value(0))?;
        let address = require_nonempty("Address", &form.value(1))?;
        let management = Management::ALL[form.select_index(3).min(Management::ALL.len() - 1)];
        let status = DeviceStatus::ALL[form.select_index(4).min(DeviceStatus::ALL.len() - 1)];
        Ok(DeviceEntry {
            name,
            address,
            model: form.value(2),
            management,
            status,
        })
    }
}

impl Component for DevicesScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            return Ok(match form.handle_key(key) {
                FormEvent::Cancelled => {
                    self.form = None;
                    None
                }
                FormEvent::Submitted => match Self::commit_form(form) {
                    Ok(entry) => {
                        let message = match self.editing {
                            Some(idx) => {
                                self.catalog.update(idx, entry)?;
                                "Device updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                "Device added"
                            }
                        };
                        self.form = None;
                        let visible = self.visible().len();
                        clamp_selection(&mut self.table_state, visible);
                        Some(Action::Notify(Notification::success(message)))
                    }
                    Err(err) => Some(Action::Notify(Notification::error(err.to_string()))),
                },
                FormEvent::Edited => None,
            });
        }

        // Search input captures keys until Enter or Esc.
        if let Some(needle) = self.search.as_mut() {
            match key.code {
                KeyCode::Esc => {
                    self.search = None;
                    let visible = self.visible().len();
                    clamp_selection(&mut self.table_state, visible);
                    return Ok(None);
                }
                KeyCode::Enter => return Ok(None),
                KeyCode::Backspace => {
                    if needle.pop().is_none() {
                        self.search = None;
                    }
                    let visible = self.visible().len();
                    clamp_selection(&mut self.table_state, visible);
                    return Ok(None);
                }
                KeyCode::Char(ch) => {
                    needle.push(ch);
                    let visible = self.visible().len();
                    clamp_selection(&mut self.table_state, visible);
                    return Ok(None);
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char('/') => {
                self.search = Some(String::new());
                Ok(None)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let visible = self.visible().len();
                move_selection(&mut self.table_state, visible, 1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let visible = self.visible().len();
                move_selection(&mut self.table_state, visible, -1);
                Ok(None)
            }
            KeyCode::Char('a') => {
                self.open_form(None);
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.selected_entry() {
                Ok(entry) => {
                    let entry = entry.clone();
                    let idx = self.selected_catalog_index().unwrap_or(0);
                    self.open_form(Some((idx, &entry)));
                    Ok(None)
                }
                Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
            },
            KeyCode::Char('d') => match self.selected_entry() {
                Ok(entry) => {
                    let name = entry.name.clone();
                    self.pending_delete = self.selected_catalog_index();
                    Ok(Some(Action::ShowConfirm(format!("Delete device {name}?"))))
                }
                Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
            },
            KeyCode::Char('r') => Ok(Some(Action::Notify(Notification::info(
                "Status refresh is not wired to live devices yet",
            )))),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DeleteConfirmed = action {
            if let Some(idx) = self.pending_delete.take() {
                self.catalog.remove(idx)?;
                let visible = self.visible().len();
                clamp_selection(&mut self.table_state, visible);
                return Ok(Some(Action::Notify(Notification::success(
                    "Device deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let visible = self.visible();
        let block = Block::default()
            .title(format!(" Devices ({}/{}) ", visible.len(), self.catalog.len()))
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

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let search_line = match self.search.as_deref() {
            Some(needle) => Line::from(vec![
                Span::styled(" /", theme::key_hint_key()),
                Span::styled(needle.to_string(), theme::table_row()),
                Span::styled("▎", theme::title_style()),
            ]),
            None => Line::from(Span::styled(" all devices", theme::key_hint())),
        };
        frame.render_widget(Paragraph::new(search_line), layout[0]);

        let header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Address").style(theme::table_header()),
            Cell::from("Model").style(theme::table_header()),
            Cell::from("Mgmt").style(theme::table_header()),
            Cell::from("Status").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = visible
            .iter()
            .filter_map(|&idx| self.catalog.get(idx))
            .map(|entry| {
                let status_style = match entry.status {
                    DeviceStatus::Online => theme::table_selected(),
                    DeviceStatus::Offline => theme::table_row(),
                };
                Row::new(vec![
                    Cell::from(entry.name.clone()),
                    Cell::from(entry.address.clone()),
                    Cell::from(entry.model.clone()),
                    Cell::from(entry.management.label()),
                    Cell::from(entry.status.label()).style(status_style),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(14),
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);

        let hints = Line::from(vec![
            Span::styled("  /", theme::key_hint_key()),
            Span::styled(" search  ", theme::key_hint()),
            Span::styled("j/k", theme::key_hint_key()),
            Span::styled(" navigate  ", theme::key_hint()),
            Span::styled("a", theme::key_hint_key()),
            Span::styled(" add  ", theme::key_hint()),
            Span::styled("e", theme::key_hint_key()),
            Span::styled(" edit  ", theme::key_hint()),
            Span::styled("d", theme::key_hint_key()),
            Span::styled(" delete  ", theme::key_hint()),
            Span::styled("r", theme::key_hint_key()),
            Span::styled(" refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);

        if let Some(form) = self.form.as_ref() {
            form.render(frame, area);
        }
    }

    fn overlay_open(&self) -> bool {
        self.form.is_some() || self.search.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Devices"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn search_narrows_visible_rows() -> Result<()> {
        let mut screen = DevicesScreen::new();
        screen.handle_key_event(key(KeyCode::Char('/')))?;
        screen.handle_key_event(key(KeyCode::Char('s')))?;
        screen.handle_key_event(key(KeyCode::Char('5')))?;
        assert_eq!(screen.visible().len(), 2);
        screen.handle_key_event(key(KeyCode::Esc))?;
        assert_eq!(screen.visible().len(), 3);
        Ok(())
    }

    #[test]
    fn search_clamps_the_selection_to_the_filtered_rows() -> Result<()> {
        let mut screen = DevicesScreen::new();
        screen.handle_key_event(key(KeyCode::Down))?;
        screen.handle_key_event(key(KeyCode::Down))?;
        assert_eq!(screen.table_state.selected(), Some(2));
        screen.handle_key_event(key(KeyCode::Char('/')))?;
        screen.handle_key_event(key(KeyCode::Char('s')))?;
        screen.handle_key_event(key(KeyCode::Char('5')))?;
        // Two rows match, so the selection falls back to the last one.
        assert_eq!(screen.visible().len(), 2);
        assert_eq!(screen.table_state.selected(), Some(1));
        Ok(())
    }

    #[test]
    fn search_matches_addresses_too() {
        let screen = DevicesScreen {
            search: Some("1.101".to_string()),
            ..DevicesScreen::new()
        };
        assert_eq!(screen.visible().len(), 1);
    }
}
