//! NAT screen — source and destination translation policies.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{Catalog, CoreError, NatKind, NatPolicy, Script, require_nonempty, script};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<NatPolicy> {
    Catalog::with_entries(
        "NAT policy",
        vec![
            NatPolicy {
                name: "nat_out1".to_string(),
                kind: NatKind::Source,
                source: "192.168.10.0/24".to_string(),
                destination: "any".to_string(),
                interface: "GigabitEthernet0/0/1".to_string(),
                description: "办公区上网".to_string(),
            },
            NatPolicy {
                name: "nat_dmz".to_string(),
                kind: NatKind::Destination,
                source: "any".to_string(),
                destination: "10.1.1.8".to_string(),
                interface: "GigabitEthernet0/0/2".to_string(),
                description: "DMZ服务器".to_string(),
            },
        ],
    )
}

fn kind_options() -> Vec<&'static str> {
    NatKind::ALL.iter().map(|kind| kind.label()).collect()
}

pub struct NatScreen {
    focused: bool,
    catalog: Catalog<NatPolicy>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl NatScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &NatPolicy)>) {
        let (title, entry) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                ("Edit NAT Policy", e.clone())
            }
            None => {
                self.editing = None;
                (
                    "Add NAT Policy",
                    NatPolicy {
                        name: String::new(),
                        kind: NatKind::Source,
                        source: "any".to_string(),
                        destination: "any".to_string(),
                        interface: String::new(),
                        description: String::new(),
                    },
                )
            }
        };
        let kind_idx = NatKind::ALL
            .iter()
            .position(|&k| k == entry.kind)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Name", entry.name),
                FormField::select("Kind", kind_options(), kind_idx),
                FormField::text_with("Source", entry.source),
                FormField::text_with("Destination", entry.destination),
                FormField::text_with("Interface", entry.interface),
                FormField::text_with("Description", entry.description),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<NatPolicy, CoreError> {
        let name = require_nonempty("Name", &form.value(0))?;
        let kind = NatKind::ALL[form.select_index(1).min(NatKind::ALL.len() - 1)];
        let interface = require_nonempty("Interface", &form.value(4))?;
        Ok(NatPolicy {
            name,
            kind,
            source: form.value(2),
            destination: form.value(3),
            interface,
            description: form.value(5),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::nat)
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
                self.preview = Some(script::nat(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for NatScreen {
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
                                "NAT policy updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "NAT policy added"
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
                        "Delete NAT policy {}?",
                        entry.name
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
                    "NAT policy deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" NAT Policies ({}) ", self.catalog.len()))
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
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Kind").style(theme::table_header()),
            Cell::from("Source").style(theme::table_header()),
            Cell::from("Destination").style(theme::table_header()),
            Cell::from("Interface").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.name.clone()),
                    Cell::from(entry.kind.label()),
                    Cell::from(entry.source.clone()),
                    Cell::from(entry.destination.clone()),
                    Cell::from(entry.interface.clone()),
                    Cell::from(entry.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(10),
            Constraint::Length(12),
            Constraint::Min(14),
            Constraint::Min(14),
            Constraint::Min(18),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "NAT Script", script);
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
        "NAT"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_requires_name_and_interface() {
        let form = FormState::new(
            "Add NAT Policy",
            vec![
                FormField::text_with("Name", "nat_lab"),
                FormField::select("Kind", kind_options(), 0),
                FormField::text_with("Source", "any"),
                FormField::text_with("Destination", "any"),
                FormField::text_with("Interface", ""),
                FormField::text_with("Description", ""),
            ],
        );
        assert!(NatScreen::commit_form(&form).is_err());
    }

    #[test]
    fn commit_builds_a_valid_policy() {
        let form = FormState::new(
            "Add NAT Policy",
            vec![
                FormField::text_with("Name", "nat_lab"),
                FormField::select("Kind", kind_options(), 1),
                FormField::text_with("Source", "any"),
                FormField::text_with("Destination", "10.1.1.9"),
                FormField::text_with("Interface", "GigabitEthernet0/0/3"),
                FormField::text_with("Description", ""),
            ],
        );
        let policy = NatScreen::commit_form(&form).expect("valid policy");
        assert_eq!(policy.kind, NatKind::Destination);
        assert_eq!(policy.destination, "10.1.1.9");
    }
}
