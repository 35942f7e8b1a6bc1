//! Users screen — local device accounts.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, LocalUser, PrivilegeLevel, Script, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<LocalUser> {
    Catalog::with_entries(
        "user",
        vec![
            LocalUser {
                username: "admin".to_string(),
                privilege: PrivilegeLevel::new(15).expect("seed"),
                password: "admin@123".to_string(),
                note: "超级管理员".to_string(),
            },
            LocalUser {
                username: "netops".to_string(),
                privilege: PrivilegeLevel::new(3).expect("seed"),
                password: "netops@123".to_string(),
                note: "网络运维".to_string(),
            },
        ],
    )
}

pub struct UsersScreen {
    focused: bool,
    catalog: Catalog<LocalUser>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl UsersScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &LocalUser)>) {
        let (title, username, privilege, password, note) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                (
                    "Edit User",
                    e.username.clone(),
                    e.privilege.to_string(),
                    e.password.clone(),
                    e.note.clone(),
                )
            }
            None => {
                self.editing = None;
                (
                    "Add User",
                    String::new(),
                    "1".to_string(),
                    String::new(),
                    String::new(),
                )
            }
        };
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Username", username),
                FormField::text_with("Privilege", privilege),
                FormField::text_with("Password", password),
                FormField::text_with("Note", note),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<LocalUser, CoreError> {
        let username = require_nonempty("Username", &form.value(0))?;
        let privilege = PrivilegeLevel::parse(&form.value(1))?;
        let password = require_nonempty("Password", &form.value(2))?;
        Ok(LocalUser {
            username,
            privilege,
            password,
            note: form.value(3),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::user)
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
                self.preview = Some(script::user(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for UsersScreen {
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
                                "User updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "User added"
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
                        "Delete user {}?",
                        entry.username
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
                return Ok(Some(Action::Notify(Notification::success("User deleted"))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Local Users ({}) ", self.catalog.len()))
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
            Cell::from("Username").style(theme::table_header()),
            Cell::from("Privilege").style(theme::table_header()),
            Cell::from("Password").style(theme::table_header()),
            Cell::from("Note").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                // Mask the password in the table; the script preview shows it.
                Row::new(vec![
                    Cell::from(entry.username.clone()),
                    Cell::from(entry.privilege.to_string()),
                    Cell::from("*".repeat(entry.password.chars().count())),
                    Cell::from(entry.note.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(14),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "User Script", script);
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
        "Users"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_rejects_disallowed_privilege() {
        let form = FormState::new(
            "Add User",
            vec![
                FormField::text_with("Username", "guest"),
                FormField::text_with("Privilege", "4"),
                FormField::text_with("Password", "guest@123"),
                FormField::text_with("Note", ""),
            ],
        );
        assert!(UsersScreen::commit_form(&form).is_err());
    }

    #[test]
    fn commit_builds_a_valid_user() {
        let form = FormState::new(
            "Add User",
            vec![
                FormField::text_with("Username", "guest"),
                FormField::text_with("Privilege", "2"),
                FormField::text_with("Password", "guest@123"),
                FormField::text_with("Note", "访客"),
            ],
        );
        let user = UsersScreen::commit_form(&form).expect("valid user");
        assert_eq!(user.privilege.get(), 2);
    }
}
