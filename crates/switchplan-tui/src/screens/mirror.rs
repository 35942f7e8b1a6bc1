//! Mirror screen — port mirroring sessions.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, MirrorDirection, MirrorKind, MirrorSession, MirrorSessionId, Script,
    require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<MirrorSession> {
    Catalog::with_entries(
        "mirror session",
        vec![
            MirrorSession {
                id: MirrorSessionId::new(1).expect("seed"),
                kind: MirrorKind::Local,
                source_port: "GigabitEthernet0/0/1".to_string(),
                direction: MirrorDirection::Both,
                destination_port: "GigabitEthernet0/0/10".to_string(),
                description: "办公区监控".to_string(),
            },
            MirrorSession {
                id: MirrorSessionId::new(2).expect("seed"),
                kind: MirrorKind::Remote,
                source_port: "GigabitEthernet0/0/2".to_string(),
                direction: MirrorDirection::In,
                destination_port: "GigabitEthernet0/0/20".to_string(),
                description: "远程镜像".to_string(),
            },
        ],
    )
}

fn kind_options() -> Vec<&'static str> {
    MirrorKind::ALL.iter().map(|kind| kind.label()).collect()
}

fn direction_options() -> Vec<&'static str> {
    MirrorDirection::ALL.iter().map(|dir| dir.label()).collect()
}

pub struct MirrorScreen {
    focused: bool,
    catalog: Catalog<MirrorSession>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl MirrorScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &MirrorSession)>) {
        let (title, id, kind, source, direction, destination, description) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                (
                    "Edit Mirror Session",
                    e.id.get().to_string(),
                    e.kind,
                    e.source_port.clone(),
                    e.direction,
                    e.destination_port.clone(),
                    e.description.clone(),
                )
            }
            None => {
                self.editing = None;
                (
                    "Add Mirror Session",
                    String::new(),
                    MirrorKind::Local,
                    String::new(),
                    MirrorDirection::Both,
                    String::new(),
                    String::new(),
                )
            }
        };
        let kind_idx = MirrorKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
        let dir_idx = MirrorDirection::ALL
            .iter()
            .position(|&d| d == direction)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Session ID", id),
                FormField::select("Kind", kind_options(), kind_idx),
                FormField::text_with("Source port", source),
                FormField::select("Direction", direction_options(), dir_idx),
                FormField::text_with("Dest port", destination),
                FormField::text_with("Description", description),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<MirrorSession, CoreError> {
        let id = MirrorSessionId::parse(&form.value(0))?;
        let kind = MirrorKind::ALL[form.select_index(1).min(MirrorKind::ALL.len() - 1)];
        let source_port = require_nonempty("Source port", &form.value(2))?;
        let direction =
            MirrorDirection::ALL[form.select_index(3).min(MirrorDirection::ALL.len() - 1)];
        let destination_port = require_nonempty("Destination port", &form.value(4))?;
        Ok(MirrorSession {
            id,
            kind,
            source_port,
            direction,
            destination_port,
            description: form.value(5),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::mirror)
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
                self.preview = Some(script::mirror(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for MirrorScreen {
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
                                "Mirror session updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "Mirror session added"
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
                        "Delete mirroring group {}?",
                        entry.id.get()
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
                    "Mirror session deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Mirror Sessions ({}) ", self.catalog.len()))
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
            Cell::from("ID").style(theme::table_header()),
            Cell::from("Kind").style(theme::table_header()),
            Cell::from("Source").style(theme::table_header()),
            Cell::from("Dir").style(theme::table_header()),
            Cell::from("Destination").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.id.get().to_string()),
                    Cell::from(entry.kind.label()),
                    Cell::from(entry.source_port.clone()),
                    Cell::from(entry.direction.label()),
                    Cell::from(entry.destination_port.clone()),
                    Cell::from(entry.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Min(20),
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "Mirror Script", script);
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
        "Mirror"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_requires_both_ports() {
        let form = FormState::new(
            "Add Mirror Session",
            vec![
                FormField::text_with("Session ID", "3"),
                FormField::select("Kind", kind_options(), 0),
                FormField::text_with("Source port", "GE1/0/5"),
                FormField::select("Direction", direction_options(), 2),
                FormField::text_with("Dest port", ""),
                FormField::text_with("Description", ""),
            ],
        );
        assert!(MirrorScreen::commit_form(&form).is_err());
    }

    #[test]
    fn commit_rejects_session_id_above_six() {
        let form = FormState::new(
            "Add Mirror Session",
            vec![
                FormField::text_with("Session ID", "7"),
                FormField::select("Kind", kind_options(), 0),
                FormField::text_with("Source port", "GE1/0/5"),
                FormField::select("Direction", direction_options(), 0),
                FormField::text_with("Dest port", "GE1/0/6"),
                FormField::text_with("Description", ""),
            ],
        );
        assert!(MirrorScreen::commit_form(&form).is_err());
    }
}
