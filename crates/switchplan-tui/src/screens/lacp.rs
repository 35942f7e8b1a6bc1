//! LACP screen — Eth-Trunk aggregation groups.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    AggregationGroup, Catalog, CoreError, LacpMode, LoadBalance, Script, TrunkId, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<AggregationGroup> {
    Catalog::with_entries(
        "aggregation group",
        vec![
            AggregationGroup {
                id: TrunkId::new(1).expect("seed"),
                mode: LacpMode::Lacp,
                members: vec![
                    "GigabitEthernet0/0/1".to_string(),
                    "GigabitEthernet0/0/2".to_string(),
                ],
                load_balance: LoadBalance::SrcDstMac,
                description: "汇聚上行链路".to_string(),
            },
            AggregationGroup {
                id: TrunkId::new(2).expect("seed"),
                mode: LacpMode::Static,
                members: vec![
                    "GigabitEthernet0/0/3".to_string(),
                    "GigabitEthernet0/0/4".to_string(),
                ],
                load_balance: LoadBalance::SrcMac,
                description: "服务器专用".to_string(),
            },
        ],
    )
}

fn mode_options() -> Vec<&'static str> {
    LacpMode::ALL.iter().map(|mode| mode.label()).collect()
}

fn load_balance_labels() -> Vec<String> {
    LoadBalance::ALL.iter().map(ToString::to_string).collect()
}

pub struct LacpScreen {
    focused: bool,
    catalog: Catalog<AggregationGroup>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl LacpScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &AggregationGroup)>) {
        let (title, id, mode, members, lb, description) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                (
                    "Edit Aggregation Group",
                    e.id.get().to_string(),
                    e.mode,
                    e.members_text(),
                    e.load_balance,
                    e.description.clone(),
                )
            }
            None => {
                self.editing = None;
                (
                    "Add Aggregation Group",
                    String::new(),
                    LacpMode::Lacp,
                    String::new(),
                    LoadBalance::SrcDstMac,
                    String::new(),
                )
            }
        };
        let mode_idx = LacpMode::ALL.iter().position(|&m| m == mode).unwrap_or(0);
        let lb_idx = LoadBalance::ALL.iter().position(|&l| l == lb).unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Trunk ID", id),
                FormField::select("Mode", mode_options(), mode_idx),
                FormField::text_with("Members (comma)", members),
                FormField::select_owned("Load balance", load_balance_labels(), lb_idx),
                FormField::text_with("Description", description),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<AggregationGroup, CoreError> {
        let id = TrunkId::parse(&form.value(0))?;
        let mode = LacpMode::ALL[form.select_index(1).min(LacpMode::ALL.len() - 1)];
        let members = AggregationGroup::parse_members(&form.value(2));
        if members.is_empty() {
            return Err(CoreError::validation("Member list must not be empty"));
        }
        let load_balance = LoadBalance::ALL[form.select_index(3).min(LoadBalance::ALL.len() - 1)];
        Ok(AggregationGroup {
            id,
            mode,
            members,
            load_balance,
            description: form.value(4),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::lacp)
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
                self.preview = Some(script::lacp(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for LacpScreen {
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
                                "Aggregation group updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "Aggregation group added"
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
                        "Delete Eth-Trunk{}?",
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
                    "Aggregation group deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Aggregation Groups ({}) ", self.catalog.len()))
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
            Cell::from("Trunk").style(theme::table_header()),
            Cell::from("Mode").style(theme::table_header()),
            Cell::from("Members").style(theme::table_header()),
            Cell::from("Load balance").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.id.get().to_string()),
                    Cell::from(entry.mode.label()),
                    Cell::from(entry.members_text()),
                    Cell::from(entry.load_balance.to_string()),
                    Cell::from(entry.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(6),
            Constraint::Length(7),
            Constraint::Min(24),
            Constraint::Length(13),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "LACP Script", script);
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
        "LACP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_rejects_empty_member_list() {
        let form = FormState::new(
            "Add Aggregation Group",
            vec![
                FormField::text_with("Trunk ID", "3"),
                FormField::select("Mode", mode_options(), 0),
                FormField::text_with("Members (comma)", "  ,  "),
                FormField::select_owned("Load balance", load_balance_labels(), 0),
                FormField::text_with("Description", ""),
            ],
        );
        assert!(LacpScreen::commit_form(&form).is_err());
    }

    #[test]
    fn commit_splits_members() {
        let form = FormState::new(
            "Add Aggregation Group",
            vec![
                FormField::text_with("Trunk ID", "3"),
                FormField::select("Mode", mode_options(), 1),
                FormField::text_with("Members (comma)", "GE1/0/1, GE1/0/2"),
                FormField::select_owned("Load balance", load_balance_labels(), 2),
                FormField::text_with("Description", "lab"),
            ],
        );
        let group = LacpScreen::commit_form(&form).expect("valid group");
        assert_eq!(group.mode, LacpMode::Static);
        assert_eq!(group.members.len(), 2);
        assert_eq!(group.load_balance, LoadBalance::SrcDstMac);
    }
}
