//! VLAN screen — VLAN table with add/edit form and script preview.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, PortRef, PortTag, Script, VlanEntry, VlanId, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<VlanEntry> {
    Catalog::with_entries(
        "VLAN",
        vec![
            VlanEntry {
                id: VlanId::new(10).expect("seed"),
                name: "办公网".to_string(),
                port: PortRef::new(PortTag::Ge, "1/0/1"),
            },
            VlanEntry {
                id: VlanId::new(20).expect("seed"),
                name: "服务器".to_string(),
                port: PortRef::new(PortTag::Xge, "1/0/5"),
            },
            VlanEntry {
                id: VlanId::new(30).expect("seed"),
                name: "普通终端".to_string(),
                port: PortRef::new(PortTag::E, "0/0/2"),
            },
            VlanEntry {
                id: VlanId::new(40).expect("seed"),
                name: "旧设备".to_string(),
                port: PortRef::new(PortTag::Fe, "0/1/1"),
            },
        ],
    )
}

fn port_tag_options() -> Vec<&'static str> {
    PortTag::ALL.iter().map(|tag| tag.short()).collect()
}

pub struct VlanScreen {
    focused: bool,
    catalog: Catalog<VlanEntry>,
    table_state: TableState,
    form: Option<FormState>,
    /// Index being edited; None while the form adds a new record.
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl VlanScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &VlanEntry)>) {
        let (title, id, name, tag_idx, number) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                let tag_idx = PortTag::ALL
                    .iter()
                    .position(|&t| t == e.port.tag)
                    .unwrap_or(0);
                (
                    "Edit VLAN",
                    e.id.to_string(),
                    e.name.clone(),
                    tag_idx,
                    e.port.number.clone(),
                )
            }
            None => {
                self.editing = None;
                ("Add VLAN", String::new(), String::new(), 1, String::new())
            }
        };
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("VLAN ID", id),
                FormField::text_with("Name", name),
                FormField::select("Port type", port_tag_options(), tag_idx),
                FormField::text_with("Port number", number),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<VlanEntry, CoreError> {
        let id = VlanId::parse(&form.value(0))?;
        let tag = PortTag::ALL[form.select_index(2).min(PortTag::ALL.len() - 1)];
        let number = require_nonempty("Port number", &form.value(3))?;
        Ok(VlanEntry {
            id,
            name: form.value(1),
            port: PortRef::new(tag, number),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::vlan)
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
                self.preview = Some(script::vlan(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for VlanScreen {
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
                                "VLAN updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "VLAN added"
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
            KeyCode::Char('g') => {
                self.table_state.select(Some(0));
                self.refresh_preview();
                Ok(None)
            }
            KeyCode::Char('G') => {
                if !self.catalog.is_empty() {
                    self.table_state.select(Some(self.catalog.len() - 1));
                    self.refresh_preview();
                }
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
                        "Delete VLAN {}?",
                        entry.id
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
                return Ok(Some(Action::Notify(Notification::success("VLAN deleted"))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" VLANs ({}) ", self.catalog.len()))
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
            Cell::from("VLAN ID").style(theme::table_header()),
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Port").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.id.to_string()),
                    Cell::from(entry.name.clone()),
                    Cell::from(entry.port.canonical()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(9),
            Constraint::Min(12),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "VLAN Script", script);
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
        "VLAN"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_matches_demo_rows() {
        let catalog = seed();
        assert_eq!(catalog.len(), 4);
        let first = catalog.get(0).expect("seed row");
        assert_eq!(first.id.get(), 10);
        assert_eq!(first.port.canonical(), "Gigabitethernet1/0/1");
    }

    #[test]
    fn commit_rejects_out_of_range_id() {
        let form = FormState::new(
            "Add VLAN",
            vec![
                FormField::text_with("VLAN ID", "5000"),
                FormField::text_with("Name", "lab"),
                FormField::select("Port type", port_tag_options(), 1),
                FormField::text_with("Port number", "1/0/2"),
            ],
        );
        assert!(VlanScreen::commit_form(&form).is_err());
    }

    #[test]
    fn commit_builds_a_valid_entry() {
        let form = FormState::new(
            "Add VLAN",
            vec![
                FormField::text_with("VLAN ID", "100"),
                FormField::text_with("Name", ""),
                FormField::select("Port type", port_tag_options(), 1),
                FormField::text_with("Port number", "2/0/1"),
            ],
        );
        let entry = VlanScreen::commit_form(&form).expect("valid form");
        assert_eq!(entry.id.get(), 100);
        assert_eq!(entry.port.canonical(), "Gigabitethernet2/0/1");
    }
}
