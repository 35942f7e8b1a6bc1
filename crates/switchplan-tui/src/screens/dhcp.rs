//! DHCP screen — address pools.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{Catalog, CoreError, DhcpPool, LeaseHours, Script, require_nonempty, script};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<DhcpPool> {
    Catalog::with_entries(
        "DHCP pool",
        vec![
            DhcpPool {
                name: "office".to_string(),
                network: "192.168.10.0".to_string(),
                mask: "255.255.255.0".to_string(),
                gateway: "192.168.10.1".to_string(),
                dns: "8.8.8.8".to_string(),
                lease_hours: LeaseHours::new(24).expect("seed"),
            },
            DhcpPool {
                name: "lab".to_string(),
                network: "10.0.0.0".to_string(),
                mask: "255.255.255.0".to_string(),
                gateway: "10.0.0.254".to_string(),
                dns: "223.5.5.5".to_string(),
                lease_hours: LeaseHours::new(12).expect("seed"),
            },
        ],
    )
}

pub struct DhcpScreen {
    focused: bool,
    catalog: Catalog<DhcpPool>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl DhcpScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &DhcpPool)>) {
        let (title, pool) = match entry {
            Some((idx, pool)) => {
                self.editing = Some(idx);
                ("Edit DHCP Pool", pool.clone())
            }
            None => {
                self.editing = None;
                (
                    "Add DHCP Pool",
                    DhcpPool {
                        name: String::new(),
                        network: String::new(),
                        mask: String::new(),
                        gateway: String::new(),
                        dns: String::new(),
                        lease_hours: LeaseHours::new(24).expect("default lease"),
                    },
                )
            }
        };
        let lease = match self.editing {
            Some(_) => pool.lease_hours.to_string(),
            None => "24".to_string(),
        };
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("Pool name", pool.name),
                FormField::text_with("Network", pool.network),
                FormField::text_with("Mask", pool.mask),
                FormField::text_with("Gateway", pool.gateway),
                FormField::text_with("DNS", pool.dns),
                FormField::text_with("Lease (h)", lease),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<DhcpPool, CoreError> {
        Ok(DhcpPool {
            name: require_nonempty("Pool name", &form.value(0))?,
            network: require_nonempty("Network", &form.value(1))?,
            mask: require_nonempty("Mask", &form.value(2))?,
            gateway: require_nonempty("Gateway", &form.value(3))?,
            dns: form.value(4),
            lease_hours: LeaseHours::parse(&form.value(5))?,
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::dhcp)
                .ok();
        }
    }

    fn toggle_preview(&mut self) -> Option<Action> {
        if self.preview.is_some() {
            self.preview = None;
            return None;
        }
        match self.catalog.selected(self.table_state.selected()) {
            Ok(pool) => {
                self.preview = Some(script::dhcp(pool));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for DhcpScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            return Ok(match form.handle_key(key) {
                FormEvent::Cancelled => {
                    self.form = None;
                    None
                }
                FormEvent::Submitted => match Self::commit_form(form) {
                    Ok(pool) => {
                        let message = match self.editing {
                            Some(idx) => {
                                self.catalog.update(idx, pool)?;
                                "DHCP pool updated"
                            }
                            None => {
                                self.catalog.add(pool);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "DHCP pool added"
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
                    Ok(pool) => {
                        let pool = pool.clone();
                        self.open_form(Some((idx, &pool)));
                        Ok(None)
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                }
            }
            KeyCode::Char('d') => match self.catalog.selected(self.table_state.selected()) {
                Ok(pool) => {
                    self.pending_delete = self.table_state.selected();
                    Ok(Some(Action::ShowConfirm(format!(
                        "Delete pool {}?",
                        pool.name
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
                    "DHCP pool deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" DHCP Pools ({}) ", self.catalog.len()))
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
            Cell::from("Pool").style(theme::table_header()),
            Cell::from("Network").style(theme::table_header()),
            Cell::from("Mask").style(theme::table_header()),
            Cell::from("Gateway").style(theme::table_header()),
            Cell::from("DNS").style(theme::table_header()),
            Cell::from("Lease").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|pool| {
                Row::new(vec![
                    Cell::from(pool.name.clone()),
                    Cell::from(pool.network.clone()),
                    Cell::from(pool.mask.clone()),
                    Cell::from(pool.gateway.clone()),
                    Cell::from(pool.dns.clone()),
                    Cell::from(format!("{}h", pool.lease_hours)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Min(10),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(15),
            Constraint::Length(12),
            Constraint::Length(6),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "DHCP Script", script);
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
        "DHCP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_rejects_lease_out_of_range() {
        let form = FormState::new(
            "Add DHCP Pool",
            vec![
                FormField::text_with("Pool name", "guest"),
                FormField::text_with("Network", "192.168.50.0"),
                FormField::text_with("Mask", "255.255.255.0"),
                FormField::text_with("Gateway", "192.168.50.1"),
                FormField::text_with("DNS", ""),
                FormField::text_with("Lease (h)", "200"),
            ],
        );
        assert!(DhcpScreen::commit_form(&form).is_err());
    }
}
