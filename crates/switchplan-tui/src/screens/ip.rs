//! IP screen — interface address bindings.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, IpBinding, PortRef, PortTag, Script, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> Catalog<IpBinding> {
    Catalog::with_entries(
        "IP binding",
        vec![
            IpBinding {
                address: "192.168.1.1".to_string(),
                mask: "255.255.255.0".to_string(),
                interface: PortRef::new(PortTag::Ge, "1/0/1"),
            },
            IpBinding {
                address: "10.1.1.254".to_string(),
                mask: "255.255.255.0".to_string(),
                interface: PortRef::new(PortTag::Xge, "1/0/5"),
            },
            IpBinding {
                address: "172.16.0.1".to_string(),
                mask: "255.255.0.0".to_string(),
                interface: PortRef::new(PortTag::E, "0/0/2"),
            },
            IpBinding {
                address: "192.168.2.1".to_string(),
                mask: "255.255.255.0".to_string(),
                interface: PortRef::new(PortTag::Fe, "0/1/1"),
            },
        ],
    )
}

fn port_tag_options() -> Vec<&'static str> {
    PortTag::ALL.iter().map(|tag| tag.short()).collect()
}

pub struct IpScreen {
    focused: bool,
    catalog: Catalog<IpBinding>,
    table_state: TableState,
    form: Option<FormState>,
    editing: Option<usize>,
    pending_delete: Option<usize>,
    preview: Option<Script>,
}

impl IpScreen {
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

    fn open_form(&mut self, entry: Option<(usize, &IpBinding)>) {
        let (title, address, mask, tag_idx, number) = match entry {
            Some((idx, e)) => {
                self.editing = Some(idx);
                let tag_idx = PortTag::ALL
                    .iter()
                    .position(|&t| t == e.interface.tag)
                    .unwrap_or(0);
                (
                    "Edit IP Binding",
                    e.address.clone(),
                    e.mask.clone(),
                    tag_idx,
                    e.interface.number.clone(),
                )
            }
            None => {
                self.editing = None;
                (
                    "Add IP Binding",
                    String::new(),
                    String::new(),
                    1,
                    String::new(),
                )
            }
        };
        self.form = Some(FormState::new(
            title,
            vec![
                FormField::text_with("IP address", address),
                FormField::text_with("Mask", mask),
                FormField::select("Port type", port_tag_options(), tag_idx),
                FormField::text_with("Port number", number),
            ],
        ));
    }

    fn commit_form(form: &FormState) -> Result<IpBinding, CoreError> {
        let address = require_nonempty("IP address", &form.value(0))?;
        let mask = require_nonempty("Mask", &form.value(1))?;
        let tag = PortTag::ALL[form.select_index(2).min(PortTag::ALL.len() - 1)];
        let number = require_nonempty("Port number", &form.value(3))?;
        Ok(IpBinding {
            address,
            mask,
            interface: PortRef::new(tag, number),
        })
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self
                .catalog
                .selected(self.table_state.selected())
                .map(script::ip)
                .ok();
        }
    }

    fn toggle_preview(&mut self) -> Option<Action> {
        if self.preview.is_some() {
            self.preview = None;
            return None;
        }
        match self.catalog.selected(self.table_state.selected()) {
            Ok(binding) => {
                self.preview = Some(script::ip(binding));
                None
            }
            Err(err) => Some(Action::Notify(Notification::info(err.to_string()))),
        }
    }
}

impl Component for IpScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(form) = self.form.as_mut() {
            return Ok(match form.handle_key(key) {
                FormEvent::Cancelled => {
                    self.form = None;
                    None
                }
                FormEvent::Submitted => match Self::commit_form(form) {
                    Ok(binding) => {
                        let message = match self.editing {
                            Some(idx) => {
                                self.catalog.update(idx, binding)?;
                                "IP binding updated"
                            }
                            None => {
                                self.catalog.add(binding);
                                self.table_state.select(Some(self.catalog.len() - 1));
                                "IP binding added"
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
                    Ok(binding) => {
                        let binding = binding.clone();
                        self.open_form(Some((idx, &binding)));
                        Ok(None)
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                }
            }
            KeyCode::Char('d') => match self.catalog.selected(self.table_state.selected()) {
                Ok(binding) => {
                    self.pending_delete = self.table_state.selected();
                    Ok(Some(Action::ShowConfirm(format!(
                        "Delete binding {} from {}?",
                        binding.address,
                        binding.interface.canonical()
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
                    "IP binding deleted",
                ))));
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" IP Bindings ({}) ", self.catalog.len()))
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
            Cell::from("Address").style(theme::table_header()),
            Cell::from("Mask").style(theme::table_header()),
            Cell::from("Interface").style(theme::table_header()),
        ]);

        let rows: Vec<Row> = self
            .catalog
            .iter()
            .map(|binding| {
                Row::new(vec![
                    Cell::from(binding.address.clone()),
                    Cell::from(binding.mask.clone()),
                    Cell::from(binding.interface.canonical()),
                ])
                .style(theme::table_row())
            })
            .collect();

        let widths = [
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Min(20),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "Interface Script", script);
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
        "IP"
    }
}
