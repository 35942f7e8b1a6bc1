//! Settings screen — the four global fields plus import/export.

use std::path::PathBuf;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use switchplan_config::GlobalSettings;

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};

const LOGIN_TYPES: [&str; 2] = ["SSH", "Telnet"];
const SNMP_VERSIONS: [&str; 3] = ["v1", "v2c", "v3"];

enum PathPrompt {
    Import,
    Export,
}

pub struct SettingsScreen {
    focused: bool,
    settings: GlobalSettings,
    settings_path: Option<PathBuf>,
    form: Option<FormState>,
    prompt: Option<(PathPrompt, String)>,
}

impl SettingsScreen {
    pub fn new(settings_path: Option<PathBuf>) -> Self {
        let mut settings = GlobalSettings::default();
        // Load an existing file if one is present; a missing or bad file
        // just leaves the defaults.
        if let Some(path) = settings_path
            .clone()
            .or_else(GlobalSettings::default_path)
        {
            let _ = settings.import(&path);
        }
        Self {
            focused: false,
            settings,
            settings_path,
            form: None,
            prompt: None,
        }
    }

    fn default_prompt_path(&self) -> String {
        self.settings_path
            .clone()
            .or_else(GlobalSettings::default_path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "settings.json".to_string())
    }

    fn open_form(&mut self) {
        let login_idx = LOGIN_TYPES
            .iter()
            .position(|&t| t == self.settings.login_type)
            .unwrap_or(0);
        let version_idx = SNMP_VERSIONS
            .iter()
            .position(|&v| v == self.settings.snmp_ver)
            .unwrap_or(1);
        self.form = Some(FormState::new(
            "Edit Settings",
            vec![
                FormField::select("Login type", LOGIN_TYPES.to_vec(), login_idx),
                FormField::text_with("Timeout (min)", self.settings.timeout.clone()),
                FormField::select("SNMP version", SNMP_VERSIONS.to_vec(), version_idx),
                FormField::text_with("Community", self.settings.snmp_comm.clone()),
            ],
        ));
    }

    fn apply_form(&mut self, form: &FormState) {
        self.settings.login_type = form.value(0);
        self.settings.timeout = form.value(1);
        self.settings.snmp_ver = form.value(2);
        self.settings.snmp_comm = form.value(3);
    }

    fn run_prompt(&mut self, kind: &PathPrompt, path_text: &str) -> Action {
        let path = PathBuf::from(path_text.trim());
        match kind {
            PathPrompt::Import => match self.settings.import(&path) {
                Ok(()) => Action::Notify(Notification::success(format!(
                    "Settings imported from {}",
                    path.display()
                ))),
                Err(err) => Action::Notify(Notification::error(format!("Import failed: {err}"))),
            },
            PathPrompt::Export => match self.settings.export(&path) {
                Ok(()) => Action::Notify(Notification::success(format!(
                    "Settings exported to {}",
                    path.display()
                ))),
                Err(err) => Action::Notify(Notification::error(format!("Export failed: {err}"))),
            },
        }
    }
}

impl Component for SettingsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            return Ok(match form.handle_key(key) {
                FormEvent::Cancelled => {
                    self.form = None;
                    None
                }
                FormEvent::Submitted => {
                    if let Some(form) = self.form.take() {
                        self.apply_form(&form);
                    }
                    Some(Action::Notify(Notification::success("Settings updated")))
                }
                FormEvent::Edited => None,
            });
        }

        if let Some((_, path_text)) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Esc => {
                    self.prompt = None;
                    return Ok(None);
                }
                KeyCode::Enter => {
                    if let Some((kind, path_text)) = self.prompt.take() {
                        return Ok(Some(self.run_prompt(&kind, &path_text)));
                    }
                    return Ok(None);
                }
                KeyCode::Backspace => {
                    path_text.pop();
                    return Ok(None);
                }
                KeyCode::Char(ch) => {
                    path_text.push(ch);
                    return Ok(None);
                }
                _ => return Ok(None),
            }
        }

        match key.code {
            KeyCode::Char('e') | KeyCode::Enter => {
                self.open_form();
                Ok(None)
            }
            KeyCode::Char('i') => {
                self.prompt = Some((PathPrompt::Import, self.default_prompt_path()));
                Ok(None)
            }
            KeyCode::Char('x') => {
                self.prompt = Some((PathPrompt::Export, self.default_prompt_path()));
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Global Settings ")
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
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

        let rows = vec![
            Row::new(vec![
                Cell::from("Login type").style(theme::table_header()),
                Cell::from(self.settings.login_type.clone()).style(theme::table_row()),
            ]),
            Row::new(vec![
                Cell::from("Timeout (min)").style(theme::table_header()),
                Cell::from(self.settings.timeout.clone()).style(theme::table_row()),
            ]),
            Row::new(vec![
                Cell::from("SNMP version").style(theme::table_header()),
                Cell::from(self.settings.snmp_ver.clone()).style(theme::table_row()),
            ]),
            Row::new(vec![
                Cell::from("Community").style(theme::table_header()),
                Cell::from(self.settings.snmp_comm.clone()).style(theme::table_row()),
            ]),
        ];
        let widths = [Constraint::Length(16), Constraint::Min(10)];
        frame.render_widget(Table::new(rows, widths), layout[0]);

        if let Some((kind, path_text)) = self.prompt.as_ref() {
            let verb = match kind {
                PathPrompt::Import => "Import from",
                PathPrompt::Export => "Export to",
            };
            let prompt_line = Line::from(vec![
                Span::styled(format!(" {verb}: "), theme::table_header()),
                Span::styled(path_text.clone(), theme::table_row()),
                Span::styled("▎", theme::title_style()),
            ]);
            frame.render_widget(Paragraph::new(prompt_line), layout[1]);
        }

        let hints = Line::from(vec![
            Span::styled("  e", theme::key_hint_key()),
            Span::styled(" edit  ", theme::key_hint()),
            Span::styled("i", theme::key_hint_key()),
            Span::styled(" import  ", theme::key_hint()),
            Span::styled("x", theme::key_hint_key()),
            Span::styled(" export  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" back", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);

        if let Some(form) = self.form.as_ref() {
            form.render(frame, area);
        }
    }

    fn overlay_open(&self) -> bool {
        self.form.is_some() || self.prompt.is_some()
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "Settings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn form_submit_applies_all_fields() -> Result<()> {
        let mut screen = SettingsScreen::new(Some(PathBuf::from("/nonexistent/settings.json")));
        screen.handle_key_event(key(KeyCode::Char('e')))?;
        // Cycle login type to Telnet, then submit.
        screen.handle_key_event(key(KeyCode::Right))?;
        screen.handle_key_event(key(KeyCode::Enter))?;
        assert_eq!(screen.settings.login_type, "Telnet");
        Ok(())
    }

    #[test]
    fn prompt_opens_with_a_default_path() -> Result<()> {
        let mut screen = SettingsScreen::new(Some(PathBuf::from("/tmp/sp/settings.json")));
        screen.handle_key_event(key(KeyCode::Char('x')))?;
        let (_, path_text) = screen.prompt.as_ref().expect("prompt open");
        assert!(path_text.ends_with("settings.json"));
        Ok(())
    }
}
