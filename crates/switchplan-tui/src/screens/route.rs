//! Route screen — static and dynamic routing intents.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, RouteEntry, RouteKind, Script, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<RouteEntry> {
    Catalog::with_entries(
        "route",
        vec![
            RouteEntry {
                kind: RouteKind::Static,
                destination: "10.1.1.0".to_string(),
                mask: "255.255.255.0".to_string(),
                next_hop: "192.168.1.254".to_string(),
                param: String::new(),
            },
            RouteEntry {
                kind: RouteKind::Rip,
                destination: "0.0.0.0".to_string(),
                mask: "0.0.0.0".to_string(),
                next_hop: String::new(),
                param: "2".to_string(),
            },
            RouteEntry {
                kind: RouteKind::Ospf,
                destination: "192.168.2.0".to_string(),
                mask: "255.255.255.0".to_string(),
                next_hop: String::new(),
                param: "0".to_string(),
            },
        ],
    )
}

fn kind_options() -> Vec<&'static str> {
    RouteKind::ALL.iter().map(|kind| kind.label()).collect()
}

pub struct RouteScreen {
    focused: bool,
    catalog: Catalog<RouteEntry>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl RouteScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &RouteEntry)>) {
        let (title, entry) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                ("Edit Route", e.clone())
            }
            None => {
                self.editing = None;
                (
                    "Add Route",
                    RouteEntry {
                        kind: RouteKind::Static,
                        destination: String::new(),
                        mask: String::new(),
                        next_hop: String::new(),
                        param: String::new(),
                    },
                )
            }
        };
        let kind_idx = RouteKind::ALL
            .iter()
            .position(|&k| k == entry.kind)
            .unwrap_or(0);
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::select("Kind", kind_options(), kind_idx),
                FormField::text_with("Destination", entry.destination),
                FormField::text_with("Mask", entry.mask),
                FormField::text_with("Next hop", entry.next_hop),
                FormField::text_with("Param", entry.param),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<RouteEntry, CoreError> {
        let kind = RouteKind::ALL[form.select_index(0).min(RouteKind::ALL.len() - 1)];
        let destination = require_nonempty("Destination", &form.value(1))?;
        let mask = require_nonempty("Mask", &form.value(2))?;
        // Only static routes point at a next hop.
        let next_hop = match kind {
            RouteKind::Static => require_nonempty("Next hop", &form.value(3))?,
            _ => form.value(3),
        };
        Ok(RouteEntry {
            kind,
            destination,
            mask,
            next_hop,
            param: form.value(4),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::route)
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
                self.preview = Some(script::route(entry));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for RouteScreen {
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
                                "Route updated"
                            }
                            None => {
                                self.catalog.add(entry);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "Route added"
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
                        "Delete {} route to {}?",
                        entry.kind.label(),
                        entry.destination
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
                return Ok(Some(Action::Notify(Notification::success("Route deleted"))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" Routes ({}) ", self.catalog.len()))
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
            Cell::from("Kind").style(theme::table_header()),
            Cell::from("Destination").style(theme::table_header()),
            Cell::from("Mask").style(theme::table_header()),
            Cell::from("Next hop").style(theme::table_header()),
            Cell::from("Param").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|entry| {
                let next_hop = if entry.next_hop.is_empty() {
                    "-".to_string()
                } else {
                    entry.next_hop.clone()
                };
                Row::new(vec![
                    Cell::from(entry.kind.label()),
                    Cell::from(entry.destination.clone()),
                    Cell::from(entry.mask.clone()),
                    Cell::from(next_hop),
                    Cell::from(entry.param.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(7),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(8),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "Route Script", script);
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
        "Route"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_route_requires_next_hop() {
        let form = FormState::new(
            "Add Route",
            vec![
                FormField::select("Kind", kind_options(), 0),
                FormField::text_with("Destination", "10.2.0.0"),
                FormField::text_with("Mask", "255.255.0.0"),
                FormField::text_with("Next hop", ""),
                FormField::text_with("Param", ""),
            ],
        );
        assert!(RouteScreen::commit_form(&form).is_err());
    }

    #[test]
    fn dynamic_route_does_not() {
        let form = FormState::new(
            "Add Route",
            vec![
                FormField::select("Kind", kind_options(), 2),
                FormField::text_with("Destination", "10.2.0.0"),
                FormField::text_with("Mask", "255.255.0.0"),
                FormField::text_with("Next hop", ""),
                FormField::text_with("Param", ""),
            ],
        );
        let entry = RouteScreen::commit_form(&form).expect("valid OSPF route");
        assert_eq!(entry.kind, RouteKind::Ospf);
    }
}
