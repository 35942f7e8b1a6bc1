//! ACL screen — group table on the left, the selected group's rules on
//! the right. `h`/`l` move focus between the two panes; add, edit and
//! delete act on the focused pane. Deleting a group cascades to its
//! rules.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    AclAction, AclGroup, AclKind, AclNumber, AclProtocol, AclRule, Catalog, CoreError, RuleBook,
    RuleSeq, Script, require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> (Catalog<AclGroup>, RuleBook<u16, AclRule>) {
    let groups = Catalog::with_entries(
        "ACL group",
        vec![
            AclGroup {
                number: AclNumber::new(3000).expect("seed"),
                kind: AclKind::Advanced,
                description: "办公区访问控制".to_string(),
            },
            AclGroup {
                number: AclNumber::new(2000).expect("seed"),
                kind: AclKind::Basic,
                description: "外部访问".to_string(),
            },
        ],
    );
    let mut rules = RuleBook::new("ACL rule");
    rules.add_rule(
        3000,
        AclRule {
            seq: RuleSeq::new(5).expect("seed"),
            action: AclAction::Permit,
            protocol: AclProtocol::Tcp,
            source: "192.168.1.0 0.0.0.255".to_string(),
            source_port: "any".to_string(),
            destination: "10.1.1.1".to_string(),
            destination_port: "80".to_string(),
            description: "允许办公区访问Web".to_string(),
        },
    );
    rules.add_rule(
        3000,
        AclRule {
            seq: RuleSeq::new(10).expect("seed"),
            action: AclAction::Deny,
            protocol: AclProtocol::Ip,
            source: "any".to_string(),
            source_port: "any".to_string(),
            destination: "any".to_string(),
            destination_port: "any".to_string(),
            description: "拒绝其他流量".to_string(),
        },
    );
    (groups, rules)
}

fn kind_labels() -> Vec<String> {
    AclKind::ALL.iter().map(ToString::to_string).collect()
}

fn action_labels() -> Vec<String> {
    AclAction::ALL.iter().map(ToString::to_string).collect()
}

fn protocol_labels() -> Vec<String> {
    AclProtocol::ALL.iter().map(ToString::to_string).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pane {
    Groups,
    Rules,
}

enum AclForm {
    Group { editing: Option<usize> },
    Rule { editing: Option<usize> },
}

enum PendingDelete {
    Group(usize),
    Rule(usize),
}

pub struct AclScreen {
    focused: bool,
    pane: Pane,
    groups: Catalog<AclGroup>,
    rules: RuleBook<u16, AclRule>,
    group_state: TableState,
    rule_state: TableState,
    form: Option<(AclForm, FormState)>,
    pending_delete: Option<PendingDelete>,
    preview: Option<Script>,
}

impl AclScreen {
    pub fn new() -> Self {
        let (groups, rules) = seed();
        Self {
            focused: false,
            pane: Pane::Groups,
            groups,
            rules,
            group_state: TableState::default().with_selected(Some(0)),
            rule_state: TableState::default().with_selected(Some(0)),
            form: None,
            pending_delete: None,
            preview: None,
        }
    }

    fn selected_group(&self) -> Result<&AclGroup, CoreError> {
        self.groups.selected(self.group_state.selected())
    }

    fn selected_group_number(&self) -> Option<u16> {
        self.selected_group().ok().map(|g| g.number.get())
    }

    fn current_rules(&self) -> &[AclRule] {
        match self.selected_group_number() {
            Some(number) => self.rules.rules(&number),
            None => &[],
        }
    }

    fn open_group_form(&mut self, entry: Option<(usize, &AclGroup)>) {
        let (title, editing, number, kind, description) = match entry {
            Some((idx, g)) => (
                "Edit ACL Group",
                Some(idx),
                g.number.get().to_string(),
                g.kind,
                g.description.clone(),
            ),
            None => (
                "Add ACL Group",
                None,
                String::new(),
                AclKind::Advanced,
                String::new(),
            ),
        };
        let kind_idx = AclKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
        let form = FormState::new(
            title,
            vec![
                FormField::text_with("Number", number),
                FormField::select_owned("Kind", kind_labels(), kind_idx),
                FormField::text_with("Description", description),
            ],
        );
        self.form = Some((AclForm::Group { editing }, form));
    }

    fn open_rule_form(&mut self, entry: Option<(usize, &AclRule)>) {
        let (title, editing, rule) = match entry {
            Some((idx, r)) => ("Edit ACL Rule", Some(idx), r.clone()),
            None => (
                "Add ACL Rule",
                None,
                AclRule {
                    seq: RuleSeq::new(5).expect("in range"),
                    action: AclAction::Permit,
                    protocol: AclProtocol::Ip,
                    source: "any".to_string(),
                    source_port: "any".to_string(),
                    destination: "any".to_string(),
                    destination_port: "any".to_string(),
                    description: String::new(),
                },
            ),
        };
        let action_idx = AclAction::ALL
            .iter()
            .position(|&a| a == rule.action)
            .unwrap_or(0);
        let protocol_idx = AclProtocol::ALL
            .iter()
            .position(|&p| p == rule.protocol)
            .unwrap_or(0);
        let seq = if entry.is_some() {
            rule.seq.get().to_string()
        } else {
            String::new()
        };
        let form = FormState::new(
            title,
            vec![
                FormField::text_with("Seq", seq),
                FormField::select_owned("Action", action_labels(), action_idx),
                FormField::select_owned("Protocol", protocol_labels(), protocol_idx),
                FormField::text_with("Source", rule.source),
                FormField::text_with("Src port", rule.source_port),
                FormField::text_with("Destination", rule.destination),
                FormField::text_with("Dst port", rule.destination_port),
                FormField::text_with("Description", rule.description),
            ],
        );
        self.form = Some((AclForm::Rule { editing }, form));
    }

    fn commit_group(form: &FormState) -> Result<AclGroup, CoreError> {
        let number = AclNumber::parse(&form.value(0))?;
        let kind = AclKind::ALL[form.select_index(1).min(AclKind::ALL.len() - 1)];
        Ok(AclGroup {
            number,
            kind,
            description: form.value(2),
        })
    }

    fn commit_rule(form: &FormState) -> Result<AclRule, CoreError> {
        let seq = RuleSeq::parse(&form.value(0))?;
        let action = AclAction::ALL[form.select_index(1).min(AclAction::ALL.len() - 1)];
        let protocol = AclProtocol::ALL[form.select_index(2).min(AclProtocol::ALL.len() - 1)];
        let source = require_nonempty("Source", &form.value(3))?;
        let destination = require_nonempty("Destination", &form.value(5))?;
        Ok(AclRule {
            seq,
            action,
            protocol,
            source,
            source_port: form.value(4),
            destination,
            destination_port: form.value(6),
            description: form.value(7),
        })
    }

    fn build_preview(&self) -> Result<Script, CoreError> {
        let group = self.selected_group()?;
        Ok(script::acl(group, self.rules.rules(&group.number.get())))
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self.build_preview().ok();
        }
    }

    fn submit_form(&mut self, kind: &AclForm, form: &FormState) -> Result<Option<Action>, CoreError> {
        match kind {
            AclForm::Group { editing } => {
                let group = Self::commit_group(form)?;
                let message = match editing {
                    Some(idx) => {
                        // Renumbering a group drags its rules along.
                        if let Some(old) = self.groups.get(*idx).map(|g| g.number.get()) {
                            self.rules.rename_group(&old, group.number.get());
                        }
                        self.groups.update(*idx, group)?;
                        "ACL group updated"
                    }
                    None => {
                        self.groups.add(group);
                        self.group_state.select(Some(self.groups.len() - 1));
                        "ACL group added"
                    }
                };
                Ok(Some(Action::Notify(Notification::success(message))))
            }
            AclForm::Rule { editing } => {
                let number = self
                    .selected_group_number()
                    .ok_or_else(|| CoreError::nothing_selected("ACL group"))?;
                let rule = Self::commit_rule(form)?;
                let message = match editing {
                    Some(idx) => {
                        self.rules.update_rule(&number, *idx, rule)?;
                        "ACL rule updated"
                    }
                    None => {
                        self.rules.add_rule(number, rule);
                        self.rule_state
                            .select(Some(self.rules.rules(&number).len() - 1));
                        "ACL rule added"
                    }
                };
                Ok(Some(Action::Notify(Notification::success(message))))
            }
        }
    }
}

impl Component for AclScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some((kind, mut form)) = self.form.take() {
            return match form.handle_key(key) {
                FormEvent::Cancelled => Ok(None),
                FormEvent::Submitted => match self.submit_form(&kind, &form) {
                    Ok(action) => {
                        self.refresh_preview();
                        Ok(action)
                    }
                    Err(err) => {
                        self.form = Some((kind, form));
                        Ok(Some(Action::Notify(Notification::error(err.to_string()))))
                    }
                },
                FormEvent::Edited => {
                    self.form = Some((kind, form));
                    Ok(None)
                }
            };
        }

        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                self.pane = Pane::Groups;
                Ok(None)
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.pane = Pane::Rules;
                Ok(None)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                match self.pane {
                    Pane::Groups => {
                        move_selection(&mut self.group_state, self.groups.len(), 1);
                        let rules = self.current_rules().len();
                        clamp_selection(&mut self.rule_state, rules);
                    }
                    Pane::Rules => {
                        let rules = self.current_rules().len();
                        move_selection(&mut self.rule_state, rules, 1);
                    }
                }
                self.refresh_preview();
                Ok(None)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                match self.pane {
                    Pane::Groups => {
                        move_selection(&mut self.group_state, self.groups.len(), -1);
                        let rules = self.current_rules().len();
                        clamp_selection(&mut self.rule_state, rules);
                    }
                    Pane::Rules => {
                        let rules = self.current_rules().len();
                        move_selection(&mut self.rule_state, rules, -1);
                    }
                }
                self.refresh_preview();
                Ok(None)
            }
            KeyCode::Char('a') => {
                match self.pane {
                    Pane::Groups => self.open_group_form(None),
                    Pane::Rules => {
                        if self.selected_group_number().is_none() {
                            return Ok(Some(Action::Notify(Notification::info(
                                "Select a ACL group entry first",
                            ))));
                        }
                        self.open_rule_form(None);
                    }
                }
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.pane {
                Pane::Groups => {
                    let idx = selected_index(&self.group_state);
                    match self.selected_group() {
                        Ok(group) => {
                            let group = group.clone();
                            self.open_group_form(Some((idx, &group)));
                            Ok(None)
                        }
                        Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                    }
                }
                Pane::Rules => {
                    let idx = selected_index(&self.rule_state);
                    match self.current_rules().get(idx) {
                        Some(rule) => {
                            let rule = rule.clone();
                            self.open_rule_form(Some((idx, &rule)));
                            Ok(None)
                        }
                        None => Ok(Some(Action::Notify(Notification::info(
                            "Select a ACL rule entry first",
                        )))),
                    }
                }
            },
            KeyCode::Char('d') => match self.pane {
                Pane::Groups => match self.selected_group() {
                    Ok(group) => {
                        let number = group.number.get();
                        self.pending_delete =
                            Some(PendingDelete::Group(selected_index(&self.group_state)));
                        Ok(Some(Action::ShowConfirm(format!(
                            "Delete ACL {number} and its rules?"
                        ))))
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                },
                Pane::Rules => {
                    let idx = selected_index(&self.rule_state);
                    match self.current_rules().get(idx) {
                        Some(rule) => {
                            let seq = rule.seq.get();
                            self.pending_delete = Some(PendingDelete::Rule(idx));
                            Ok(Some(Action::ShowConfirm(format!("Delete rule {seq}?"))))
                        }
                        None => Ok(Some(Action::Notify(Notification::info(
                            "Select a ACL rule entry first",
                        )))),
                    }
                }
            },
            KeyCode::Char('p') => {
                if self.preview.is_some() {
                    self.preview = None;
                    return Ok(None);
                }
                match self.build_preview() {
                    Ok(script) => {
                        self.preview = Some(script);
                        Ok(None)
                    }
                    Err(err) => Ok(Some(Action::Notify(Notification::info(err.to_string())))),
                }
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::DeleteConfirmed = action {
            match self.pending_delete.take() {
                Some(PendingDelete::Group(idx)) => {
                    let group = self.groups.remove(idx)?;
                    self.rules.remove_group(&group.number.get());
                    clamp_selection(&mut self.group_state, self.groups.len());
                    let rules = self.current_rules().len();
                    clamp_selection(&mut self.rule_state, rules);
                    self.refresh_preview();
                    return Ok(Some(Action::Notify(Notification::success(
                        "ACL group deleted",
                    ))));
                }
                Some(PendingDelete::Rule(idx)) => {
                    if let Some(number) = self.selected_group_number() {
                        self.rules.remove_rule(&number, idx)?;
                        let rules = self.current_rules().len();
                        clamp_selection(&mut self.rule_state, rules);
                        self.refresh_preview();
                        return Ok(Some(Action::Notify(Notification::success(
                            "ACL rule deleted",
                        ))));
                    }
                }
                None => {}
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let rules = self.current_rules();
        let block = Block::default()
            .title(format!(" ACLs ({} groups) ", self.groups.len()))
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

        let (work_area, preview_area) = if self.preview.is_some() {
            let chunks =
                Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(inner);
            (chunks[0], Some(chunks[1]))
        } else {
            (inner, None)
        };

        let layout =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(work_area);
        let panes = Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[0]);

        // Group pane.
        let group_block = Block::default()
            .title(" Groups ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.pane == Pane::Groups {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let group_inner = group_block.inner(panes[0]);
        frame.render_widget(group_block, panes[0]);

        let group_header = Row::new(vec![
            Cell::from("Number").style(theme::table_header()),
            Cell::from("Kind").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);
        let group_rows: Vec<Row> = self
            .groups
            .iter()
            .map(|group| {
                Row::new(vec![
                    Cell::from(group.number.get().to_string()),
                    Cell::from(group.kind.to_string()),
                    Cell::from(group.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let group_table = Table::new(
            group_rows,
            [
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Min(10),
            ],
        )
        .header(group_header)
        .row_highlight_style(theme::table_selected());
        let mut group_state = self.group_state;
        frame.render_stateful_widget(group_table, group_inner, &mut group_state);

        // Rule pane.
        let rule_block = Block::default()
            .title(format!(" Rules ({}) ", rules.len()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.pane == Pane::Rules {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let rule_inner = rule_block.inner(panes[1]);
        frame.render_widget(rule_block, panes[1]);

        let rule_header = Row::new(vec![
            Cell::from("Seq").style(theme::table_header()),
            Cell::from("Action").style(theme::table_header()),
            Cell::from("Proto").style(theme::table_header()),
            Cell::from("Source").style(theme::table_header()),
            Cell::from("Destination").style(theme::table_header()),
        ]);
        let rule_rows: Vec<Row> = rules
            .iter()
            .map(|rule| {
                Row::new(vec![
                    Cell::from(rule.seq.get().to_string()),
                    Cell::from(rule.action.to_string()),
                    Cell::from(rule.protocol.to_string()),
                    Cell::from(rule.source.clone()),
                    Cell::from(rule.destination.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let rule_table = Table::new(
            rule_rows,
            [
                Constraint::Length(5),
                Constraint::Length(7),
                Constraint::Length(6),
                Constraint::Min(14),
                Constraint::Min(12),
            ],
        )
        .header(rule_header)
        .row_highlight_style(theme::table_selected());
        let mut rule_state = self.rule_state;
        frame.render_stateful_widget(rule_table, rule_inner, &mut rule_state);

        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "ACL Script", script);
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
        "ACL"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn seeded_rules_attach_to_the_advanced_group() {
        let screen = AclScreen::new();
        assert_eq!(screen.current_rules().len(), 2);
        assert_eq!(screen.current_rules()[0].seq.get(), 5);
    }

    #[test]
    fn deleting_a_group_cascades_to_its_rules() -> Result<()> {
        let mut screen = AclScreen::new();
        screen.handle_key_event(key(KeyCode::Char('d')))?;
        screen.update(&Action::DeleteConfirmed)?;
        assert_eq!(screen.groups.len(), 1);
        // Group 2000 is now selected and owns no rules.
        assert!(screen.current_rules().is_empty());
        assert!(screen.rules.rules(&3000).is_empty());
        Ok(())
    }

    #[test]
    fn group_navigation_reclamps_the_rule_selection() -> Result<()> {
        let mut screen = AclScreen::new();
        screen.handle_key_event(key(KeyCode::Char('l')))?;
        screen.handle_key_event(key(KeyCode::Char('j')))?;
        assert_eq!(screen.rule_state.selected(), Some(1));
        // Group 2000 owns no rules, so the rule selection clears.
        screen.handle_key_event(key(KeyCode::Char('h')))?;
        screen.handle_key_event(key(KeyCode::Char('j')))?;
        assert_eq!(screen.group_state.selected(), Some(1));
        assert_eq!(screen.rule_state.selected(), None);
        screen.handle_key_event(key(KeyCode::Char('k')))?;
        assert_eq!(screen.rule_state.selected(), Some(0));
        Ok(())
    }

    #[test]
    fn rule_commit_rejects_empty_source() {
        let form = FormState::new(
            "Add ACL Rule",
            vec![
                FormField::text_with("Seq", "15"),
                FormField::select_owned("Action", action_labels(), 0),
                FormField::select_owned("Protocol", protocol_labels(), 1),
                FormField::text_with("Source", ""),
                FormField::text_with("Src port", "any"),
                FormField::text_with("Destination", "any"),
                FormField::text_with("Dst port", "any"),
                FormField::text_with("Description", ""),
            ],
        );
        assert!(AclScreen::commit_rule(&form).is_err());
    }

    #[test]
    fn renumbering_a_group_moves_its_rules() {
        let mut screen = AclScreen::new();
        let form = FormState::new(
            "Edit ACL Group",
            vec![
                FormField::text_with("Number", "3001"),
                FormField::select_owned("Kind", kind_labels(), 1),
                FormField::text_with("Description", "办公区访问控制"),
            ],
        );
        let action = screen
            .submit_form(&AclForm::Group { editing: Some(0) }, &form)
            .expect("commit succeeds");
        assert!(action.is_some());
        assert!(screen.rules.rules(&3000).is_empty());
        assert_eq!(screen.rules.rules(&3001).len(), 2);
    }
}
