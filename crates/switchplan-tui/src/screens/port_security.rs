//! Port security screen — per-port MAC limiting.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, MaxMacCount, PortSecurityBinding, Script, ViolationAction,
    require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<PortSecurityBinding> {
    Catalog::with_entries(
        "port security",
        vec![
            PortSecurityBinding {
                port: "GigabitEthernet0/0/1".to_string(),
                max_mac: MaxMacCount::new(2).expect("seed"),
                sticky_macs: vec!["00e0-fc12-3456".to_string()],
                violation: ViolationAction::Shutdown,
            },
            PortSecurityBinding {
                port: "GigabitEthernet0/0/2".to_string(),
                max_mac: MaxMacCount::new(1).expect("seed"),
                sticky_macs: vec![],
                violation: ViolationAction::Restrict,
            },
        ],
    )
}

fn violation_labels() -> Vec<String> {
    ViolationAction::ALL.iter().map(ToString::to_string).collect()
}

pub struct PortSecurityScreen {
    focused: bool,
    catalog: Catalog<PortSecurityBinding>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl PortSecurityScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            catalog: seed(),
            table_state: TableState::default().with_selected(Some(0)),
            form: None,
            editing: None,
            pending_delete: None,
            preview: None,
        }
    }

    fn open_form(&mut self, entry: Option<(usize, &PortSecurityBinding)>) {
        let (title, port, max_mac, macs, violation) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                (
                    "Edit Port Security",
                    e.port.clone(),
                    e.max_mac.get().to_string(),
                    e.macs_text(),
                    e.violation,
                )
            }
            None => {
                self.editing = None;
                (
                    "Add Port Security",
                    String::new(),
                    "1".to_string(),
                    String::new(),
                    ViolationAction::Shutdown,
                )
            }
        };
        let violation_idx = ViolationAction::ALL
            .iter()
            .position(|&v| v == violation)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Port", port),
                FormField::text_with("Max MACs", max_mac),
                FormField::text_with("Sticky MACs", macs),
                FormField::select_owned("Violation", violation_labels(), violation_idx),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<PortSecurityBinding, CoreError> {
        let port = require_nonempty("Port", &form.value(0))?;
        let max_mac = MaxMacCount::parse(&form.value(1))?;
        let sticky_macs = PortSecurityBinding::parse_macs(&form.value(2));
        let violation =
            ViolationAction::ALL[form.select_index(3).min(ViolationAction::ALL.len() - 1)];
        Ok(PortSecurityBinding {
            port,
            max_mac,
            sticky_macs,
            violation,
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::port_security)
                .ok();
        }
    }

    fn toggle_preview(&mut self) -> Option<Action> {
        if self.preview.is_some() {
            self.preview = None;
            return None;
        }
        match self.catalog.selected(self.table_state.selected()) {
            Ok(entry) => {
                self.preview = Some(script::port_security(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for PortSecurityScreen {
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
                                "Port security updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "Port security added"
                            }
                        };
                        self.form = None;
                        self.refresh_preview();
                        Some(Action::Notify(Notification::success(message)))
                    }
                    Err(err) => Some(Action::Notify(Notification::error(err.to_string()))),
                },
                FormEvent::Edited => None,
            });
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                move_selection(&mut self.table_state, self.catalog.len(), 1);
                self.refresh_preview();
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                move_selection(&mut self.table_state, self.catalog.len(), -1);
                self.refresh_preview();
                Ok(None)
            }
            KeyCode::Char('a') => {
                self.open_form(None);
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let idx = selected_index(&self.table_state);
                match self.catalog.selected(self.table_state.selected()) {
                    Ok(entry) => {
                        let entry = entry.clone();
                        self.open_form(Some((idx, &entry)));
                        Ok(None)
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                }
            }
            KeyCode::Char('d') => match self.catalog.selected(self.table_state.selected()) {
                Ok(entry) => {
                    self.pending_delete = self.table_state.selected();
                    Ok(Some(Action::ShowConfirm(format!(
                        "Delete port security on {}?",
                        entry.port
                    ))))
                }
                Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
            },
            KeyCode::Char('p') => Ok(self.toggle_preview()),
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DeleteConfirmed = action {
            if let Some(idx) = self.pending_delete.take() {
                self.catalog.remove(idx)?;
                clamp_selection(&mut self.table_state, self.catalog.len());
                self.refresh_preview();
                return Ok(Some(Action::Notify(Notification::success(
                    "Port security deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Port Security ({}) ", self.catalog.len()))
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

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(table_area);

        let header = Row::new(vec![
            Cell::from("Port").style(theme::table_header()),
            Cell::from("Max").style(theme::table_header()),
            Cell::from("Sticky MACs").style(theme::table_header()),
            Cell::from("Violation").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                let macs = if entry.sticky_macs.is_empty() {
                    "-".to_string()
                } else {
                    entry.macs_text()
                };
                Row::new(vec![
                    Cell::from(entry.port.clone()),
                    Cell::from(entry.max_mac.get().to_string()),
                    Cell::from(macs),
                    Cell::from(entry.violation.to_string()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "Port Security Script", script);
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
        "Port-Sec"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_allows_empty_sticky_list() {
        let form = FormState::new(
            "Add Port Security",
            vec![
                FormField::text_with("Port", "GigabitEthernet0/0/3"),
                FormField::text_with("Max MACs", "4"),
                FormField::text_with("Sticky MACs", ""),
                FormField::select_owned("Violation", violation_labels(), 1),
            ],
        );
        let binding = PortSecurityScreen::commit_form(&form).expect("valid binding");
        assert!(binding.sticky_macs.is_empty());
        assert_eq!(binding.violation, ViolationAction::Restrict);
    }

    #[test]
    fn commit_rejects_mac_count_out_of_range() {
        let form = FormState::new(
            "Add Port Security",
            vec![
                FormField::text_with("Port", "GigabitEthernet0/0/3"),
                FormField::text_with("Max MACs", "129"),
                FormField::text_with("Sticky MACs", ""),
                FormField::select_owned("Violation", violation_labels(), 0),
            ],
        );
        assert!(PortSecurityScreen::commit_form(&form).is_err());
    }
}
