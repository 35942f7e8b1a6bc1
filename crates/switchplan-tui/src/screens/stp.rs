//! STP screen — global spanning-tree state plus per-port tuning rows.
//!
//! Unlike the plain catalog screens this one renders the whole
//! configuration in one script: the global section first, then every
//! port row, so `p` previews the lot rather than the selected row.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, Script, StpMode, StpPortEntry, StpPortPriority, StpSettings,
    require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed_ports() -> Catalog<StpPortEntry> {
    Catalog::with_entries(
        "STP port",
        vec![
            StpPortEntry {
                port: "GigabitEthernet0/0/1".to_string(),
                priority: StpPortPriority::new(128).expect("seed"),
                edge_port: true,
                enabled: true,
            },
            StpPortEntry {
                port: "GigabitEthernet0/0/2".to_string(),
                priority: StpPortPriority::new(128).expect("seed"),
                edge_port: false,
                enabled: true,
            },
            StpPortEntry {
                port: "GigabitEthernet0/0/3".to_string(),
                priority: StpPortPriority::new(128).expect("seed"),
                edge_port: false,
                enabled: false,
            },
        ],
    )
}

fn mode_labels() -> Vec<String> {
    StpMode::ALL.iter().map(ToString::to_string).collect()
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

enum StpForm {
    Port { editing: Option<usize> },
    Global,
}

pub struct StpScreen {
    focused: bool,
    settings: StpSettings,
    ports: Catalog<StpPortEntry>,
    table_state: TableState,
    form: Option<(StpForm, FormState)>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl StpScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            settings: StpSettings::default(),
            ports: seed_ports(),
            table_state: TableState::default().with_selected(Some(0)),
            form: None,
            pending_delete: None,
            preview: None,
        }
    }

    fn open_port_form(&mut self, entry: Option<(usize, &StpPortEntry)>) {
        let (title, editing, port, priority, edge, enabled) = match entry {
            Some((idx, e)) => (
                "Edit STP Port",
                Some(idx),
                e.port.clone(),
                e.priority.to_string(),
                e.edge_port,
                e.enabled,
            ),
            None => (
                "Add STP Port",
                None,
                String::new(),
                "128".to_string(),
                false,
                true,
            ),
        };
        let form = FormState::new(
            title,
            vec![
                FormField::text_with("Port", port),
                FormField::text_with("Priority", priority),
                FormField::select("Edge port", vec!["no", "yes"], usize::from(edge)),
                FormField::select("STP on port", vec!["disabled", "enabled"], usize::from(enabled)),
            ],
        );
        self.form = Some((StpForm::Port { editing }, form));
    }

    fn open_global_form(&mut self) {
        let mode_idx = StpMode::ALL
            .iter()
            .position(|&m| m == self.settings.mode)
            .unwrap_or(0);
        let form = FormState::new(
            "STP Global Settings",
            vec![
                FormField::select(
                    "STP",
                    vec!["disabled", "enabled"],
                    usize::from(self.settings.enabled),
                ),
                FormField::select_owned("Mode", mode_labels(), mode_idx),
                FormField::text_with("Bridge prio", self.settings.bridge_priority.clone()),
            ],
        );
        self.form = Some((StpForm::Global, form));
    }

    fn commit_port_form(form: &FormState) -> Result<StpPortEntry, CoreError> {
        let port = require_nonempty("Port", &form.value(0))?;
        let priority = StpPortPriority::parse(&form.value(1))?;
        Ok(StpPortEntry {
            port,
            priority,
            edge_port: form.select_index(2) == 1,
            enabled: form.select_index(3) == 1,
        })
    }

    fn commit_global_form(form: &FormState) -> Result<StpSettings, CoreError> {
        let bridge_priority = require_nonempty("Bridge priority", &form.value(2))?;
        Ok(StpSettings {
            enabled: form.select_index(0) == 1,
            mode: StpMode::ALL[form.select_index(1).min(StpMode::ALL.len() - 1)],
            bridge_priority,
        })
    }

    fn build_script(&self) -> Script {
        let ports: Vec<StpPortEntry> = self.ports.iter().cloned().collect();
        script::stp(&self.settings, &ports)
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = Some(self.build_script());
        }
    }
}

impl Component for StpScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some((kind, mut form)) = self.form.take() {
            match form.handle_key(key) {
                FormEvent::Cancelled => return Ok(None),
                FormEvent::Submitted => {
                    let outcome = match &kind {
                        StpForm::Port { editing } => {
                            Self::commit_port_form(&form).map(|entry| match editing {
                                Some(idx) => {
                                    let result = self.ports.update(*idx, entry);
                                    (result, "STP port updated")
                                }
                                None => {
                                    self.ports.add(entry);
                                    self.table_state.select(Some(self.ports.len() - 1));
                                    (Ok(()), "STP port added")
                                }
                            })
                        }
                        StpForm::Global => Self::commit_global_form(&form).map(|settings| {
                            self.settings = settings;
                            (Ok(()), "STP settings updated")
                        }),
                    };
                    return match outcome {
                        Ok((result, message)) => {
                            result?;
                            self.refresh_preview();
                            Ok(Some(Action::Notify(Notification::success(message))))
                        }
                        Err(err) => {
                            // Validation failed; keep the form open.
                            self.form = Some((kind, form));
                            Ok(Some(Action::Notify(Notification::error(err.to_string()))))
                        }
                    };
                }
                FormEvent::Edited => {
                    self.form = Some((kind, form));
                    return Ok(None);
                }
            }
        }

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                move_selection(&mut self.table_state, self.ports.len(), 1);
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                move_selection(&mut self.table_state, self.ports.len(), -1);
                Ok(None)
            }
            KeyCode::Char('a') => {
                self.open_port_form(None);
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                let idx = selected_index(&self.table_state);
                match self.ports.selected(self.table_state.selected()) {
                    Ok(entry) => {
                        let entry = entry.clone();
                        self.open_port_form(Some((idx, &entry)));
                        Ok(None)
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                }
            }
            KeyCode::Char('s') => {
                self.open_global_form();
                Ok(None)
            }
            KeyCode::Char('t') => {
                self.settings.enabled = !self.settings.enabled;
                self.refresh_preview();
                Ok(Some(Action::Notify(Notification::info(format!(
                    "STP {}",
                    if self.settings.enabled { "enabled" } else { "disabled" }
                )))))
            }
            KeyCode::Char('d') => match self.ports.selected(self.table_state.selected()) {
                Ok(entry) => {
                    self.pending_delete = self.table_state.selected();
                    Ok(Some(Action::ShowConfirm(format!(
                        "Delete STP port {}?",
                        entry.port
                    ))))
                }
                Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
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
                self.ports.remove(idx)?;
                clamp_selection(&mut self.table_state, self.ports.len());
                self.refresh_preview();
                return Ok(Some(Action::Notify(Notification::success(
                    "STP port deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Spanning Tree ({} ports) ", self.ports.len()))
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

        let global = Line::from(vec![
            Span::styled(" STP: ", theme::table_header()),
            Span::styled(
                yes_no(self.settings.enabled),
                if self.settings.enabled {
                    theme::table_selected()
                } else {
                    theme::table_row()
                },
            ),
            Span::styled("  mode: ", theme::table_header()),
            Span::styled(self.settings.mode.to_string(), theme::table_row()),
            Span::styled("  bridge priority: ", theme::table_header()),
            Span::styled(self.settings.bridge_priority.clone(), theme::table_row()),
        ]);
        frame.render_widget(Paragraph::new(global), layout[0]);

        let header = Row::new(vec![
            Cell::from("Port").style(theme::table_header()),
            Cell::from("Priority").style(theme::table_header()),
            Cell::from("Edge").style(theme::table_header()),
            Cell::from("STP").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .ports
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.port.clone()),
                    Cell::from(entry.priority.to_string()),
                    Cell::from(yes_no(entry.edge_port)),
                    Cell::from(if entry.enabled { "enabled" } else { "disabled" }),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(20),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(9),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[1], &mut state);

        let hints = Line::from(vec![
            Span::styled("j/k", theme::key_hint_key()),
            Span::styled(" navigate  ", theme::key_hint()),
            Span::styled("a", theme::key_hint_key()),
            Span::styled(" add  ", theme::key_hint()),
            Span::styled("e", theme::key_hint_key()),
            Span::styled(" edit  ", theme::key_hint()),
            Span::styled("d", theme::key_hint_key()),
            Span::styled(" delete  ", theme::key_hint()),
            Span::styled("s", theme::key_hint_key()),
            Span::styled(" settings  ", theme::key_hint()),
            Span::styled("t", theme::key_hint_key()),
            Span::styled(" toggle  ", theme::key_hint()),
            Span::styled("p", theme::key_hint_key()),
            Span::styled(" preview", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "STP Script", script);
        }

        if let Some((_, form)) = self.form.as_ref() {
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
        "STP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_form_rejects_non_multiple_priority() {
        let form = FormState::new(
            "Add STP Port",
            vec![
                FormField::text_with("Port", "GigabitEthernet0/0/4"),
                FormField::text_with("Priority", "100"),
                FormField::select("Edge port", vec!["no", "yes"], 0),
                FormField::select("STP on port", vec!["disabled", "enabled"], 1),
            ],
        );
        assert!(StpScreen::commit_port_form(&form).is_err());
    }

    #[test]
    fn disabling_globally_yields_a_single_line_script() {
        let mut screen = StpScreen::new();
        screen.settings.enabled = false;
        let script = screen.build_script();
        assert_eq!(script.lines(), ["undo stp enable"]);
    }
}
