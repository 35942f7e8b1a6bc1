//! QoS screen — policy table plus the selected policy's classifier
//! rules, mirroring the ACL master/detail layout. Rules are keyed by
//! policy name, so renaming a policy drags its rules along.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use switchplan_core::{
    Catalog, CoreError, MatchType, QosAction, QosPolicy, QosRule, RuleBook, RuleSeq, Script,
    require_nonempty, script,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::screens::{catalog_hints, clamp_selection, move_selection, selected_index};
use crate::theme;
use crate::widgets::form::{FormEvent, FormField, FormState};
use crate::widgets::script_view::render_script;

fn seed() -> (Catalog<QosPolicy>, RuleBook<String, QosRule>) {
    let policies = Catalog::with_entries(
        "QoS policy",
        vec![
            QosPolicy {
                name: "limit_web".to_string(),
                description: "限制HTTP带宽".to_string(),
                interface: "GigabitEthernet0/0/1".to_string(),
            },
            QosPolicy {
                name: "voice_priority".to_string(),
                description: "语音优先".to_string(),
                interface: "GigabitEthernet0/0/2".to_string(),
            },
        ],
    );
    let mut rules = RuleBook::new("QoS rule");
    rules.add_rule(
        "limit_web".to_string(),
        QosRule {
            seq: RuleSeq::new(10).expect("seed"),
            match_type: MatchType::Protocol,
            match_value: "tcp/80".to_string(),
            action: QosAction::RateLimit,
            param: "1000kbit".to_string(),
            note: "限制HTTP".to_string(),
        },
    );
    rules.add_rule(
        "limit_web".to_string(),
        QosRule {
            seq: RuleSeq::new(20).expect("seed"),
            match_type: MatchType::SourceAddress,
            match_value: "192.168.1.0/24".to_string(),
            action: QosAction::Priority,
            param: "7".to_string(),
            note: "办公优先".to_string(),
        },
    );
    (policies, rules)
}

fn match_type_labels() -> Vec<&'static str> {
    MatchType::ALL.iter().map(|m| m.label()).collect()
}

fn action_labels() -> Vec<&'static str> {
    QosAction::ALL.iter().map(|a| a.label()).collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Pane {
    Policies,
    Rules,
}

enum QosForm {
    Policy { editing: Option<usize> },
    Rule { editing: Option<usize> },
}

enum PendingDelete {
    Policy(usize),
    Rule(usize),
}

pub struct QosScreen {
    focused: bool,
    pane: Pane,
    policies: Catalog<QosPolicy>,
    rules: RuleBook<String, QosRule>,
    policy_state: TableState,
    rule_state: TableState,
    form: Option<(QosForm, FormState)>,
    pending_delete: Option<PendingDelete>,
    preview: Option<Script>,
}

impl QosScreen {
    pub fn new() -> Self {
        let (policies, rules) = seed();
        Self {
            focused: false,
            pane: Pane::Policies,
            policies,
            rules,
            policy_state: TableState::default().with_selected(Some(0)),
            rule_state: TableState::default().with_selected(Some(0)),
            form: None,
            pending_delete: None,
            preview: None,
        }
    }

    fn selected_policy(&self) -> Result<&QosPolicy, CoreError> {
        self.policies.selected(self.policy_state.selected())
    }

    fn selected_policy_name(&self) -> Option<String> {
        self.selected_policy().ok().map(|p| p.name.clone())
    }

    fn current_rules(&self) -> &[QosRule] {
        match self.selected_policy().ok() {
            Some(policy) => self.rules.rules(&policy.name),
            None => &[],
        }
    }

    fn open_policy_form(&mut self, entry: Option<(usize, &QosPolicy)>) {
        let (title, editing, policy) = match entry {
            Some((idx, p)) => ("Edit QoS Policy", Some(idx), p.clone()),
            None => (
                "Add QoS Policy",
                None,
                QosPolicy {
                    name: String::new(),
                    description: String::new(),
                    interface: String::new(),
                },
            ),
        };
        let form = FormState::new(
            title,
            vec![
                FormField::text_with("Name", policy.name),
                FormField::text_with("Description", policy.description),
                FormField::text_with("Interface", policy.interface),
            ],
        );
        self.form = Some((QosForm::Policy { editing }, form));
    }

    fn open_rule_form(&mut self, entry: Option<(usize, &QosRule)>) {
        let (title, editing, rule) = match entry {
            Some((idx, r)) => ("Edit QoS Rule", Some(idx), r.clone()),
            None => (
                "Add QoS Rule",
                None,
                QosRule {
                    seq: RuleSeq::new(10).expect("in range"),
                    match_type: MatchType::Protocol,
                    match_value: String::new(),
                    action: QosAction::RateLimit,
                    param: String::new(),
                    note: String::new(),
                },
            ),
        };
        let match_idx = MatchType::ALL
            .iter()
            .position(|&m| m == rule.match_type)
            .unwrap_or(0);
        let action_idx = QosAction::ALL
            .iter()
            .position(|&a| a == rule.action)
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
                FormField::select("Match type", match_type_labels(), match_idx),
                FormField::text_with("Match value", rule.match_value),
                FormField::select("Action", action_labels(), action_idx),
                FormField::text_with("Param", rule.param),
                FormField::text_with("Note", rule.note),
            ],
        );
        self.form = Some((QosForm::Rule { editing }, form));
    }

    fn commit_policy(form: &FormState) -> Result<QosPolicy, CoreError> {
        let name = require_nonempty("Name", &form.value(0))?;
        let interface = require_nonempty("Interface", &form.value(2))?;
        Ok(QosPolicy {
            name,
            description: form.value(1),
            interface,
        })
    }

    fn commit_rule(form: &FormState) -> Result<QosRule, CoreError> {
        let seq = RuleSeq::parse(&form.value(0))?;
        let match_type = MatchType::ALL[form.select_index(1).min(MatchType::ALL.len() - 1)];
        let match_value = require_nonempty("Match value", &form.value(2))?;
        let action = QosAction::ALL[form.select_index(3).min(QosAction::ALL.len() - 1)];
        let param = form.value(4);
        // Rate limit and priority both carry their argument in param.
        if action != QosAction::Discard && param.is_empty() {
            return Err(CoreError::validation("Param must not be empty"));
        }
        Ok(QosRule {
            seq,
            match_type,
            match_value,
            action,
            param,
            note: form.value(5),
        })
    }

    fn build_preview(&self) -> Result<Script, CoreError> {
        let policy = self.selected_policy()?;
        Ok(script::qos(policy, self.rules.rules(&policy.name)))
    }

    fn refresh_preview(&mut self) {
        if self.preview.is_some() {
            self.preview = self.build_preview().ok();
        }
    }

    fn submit_form(&mut self, kind: &QosForm, form: &FormState) -> Result<Option<Action>, CoreError> {
        match kind {
            QosForm::Policy { editing } => {
                let policy = Self::commit_policy(form)?;
                let message = match editing {
                    Some(idx) => {
                        if let Some(old) = self.policies.get(*idx).map(|p| p.name.clone()) {
                            self.rules.rename_group(&old, policy.name.clone());
                        }
                        self.policies.update(*idx, policy)?;
                        "QoS policy updated"
                    }
                    None => {
                        self.policies.add(policy);
                        self.policy_state.select(Some(self.policies.len() - 1));
                        "QoS policy added"
                    }
                };
                Ok(Some(Action::Notify(Notification::success(message))))
            }
            QosForm::Rule { editing } => {
                let name = self
                    .selected_policy_name()
                    .ok_or_else(|| CoreError::nothing_selected("QoS policy"))?;
                let rule = Self::commit_rule(form)?;
                let message = match editing {
                    Some(idx) => {
                        self.rules.update_rule(&name, *idx, rule)?;
                        "QoS rule updated"
                    }
                    None => {
                        self.rules.add_rule(name.clone(), rule);
                        self.rule_state.select(Some(self.rules.rules(&name).len() - 1));
                        "QoS rule added"
                    }
                };
                Ok(Some(Action::Notify(Notification::success(message))))
            }
        }
    }
}

impl Component for QosScreen {
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
                self.pane = Pane::Policies;
                Ok(None)
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.pane = Pane::Rules;
                Ok(None)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                match self.pane {
                    Pane::Policies => {
                        move_selection(&mut self.policy_state, self.policies.len(), 1);
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
                    Pane::Policies => {
                        move_selection(&mut self.policy_state, self.policies.len(), -1);
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
                    Pane::Policies => self.open_policy_form(None),
                    Pane::Rules => {
                        if self.selected_policy_name().is_none() {
                            return Ok(Some(Action::Notify(Notification::info(
                                "Select a QoS policy entry first",
                            ))));
                        }
                        self.open_rule_form(None);
                    }
                }
                Ok(None)
            }
            KeyCode::Char('e') | KeyCode::Enter => match self.pane {
                Pane::Policies => {
                    let idx = selected_index(&self.policy_state);
                    match self.selected_policy() {
                        Ok(policy) => {
                            let policy = policy.clone();
                            self.open_policy_form(Some((idx, &policy)));
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
                            "Select a QoS rule entry first",
                        )))),
                    }
                }
            },
            KeyCode::Char('d') => match self.pane {
                Pane::Policies => match self.selected_policy() {
                    Ok(policy) => {
                        let name = policy.name.clone();
                        self.pending_delete =
                            Some(PendingDelete::Policy(selected_index(&self.policy_state)));
                        Ok(Some(Action::ShowConfirm(format!(
                            "Delete policy {name} and its rules?"
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
                            Ok(Some(Action::ShowConfirm(format!(
                                "Delete classifier {seq}?"
                            ))))
                        }
                        None => Ok(Some(Action::Notify(Notification::info(
                            "Select a QoS rule entry first",
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
                Some(PendingDelete::Policy(idx)) => {
                    let policy = self.policies.remove(idx)?;
                    self.rules.remove_group(&policy.name);
                    clamp_selection(&mut self.policy_state, self.policies.len());
                    let rules = self.current_rules().len();
                    clamp_selection(&mut self.rule_state, rules);
                    self.refresh_preview();
                    return Ok(Some(Action::Notify(Notification::success(
                        "QoS policy deleted",
                    ))));
                }
                Some(PendingDelete::Rule(idx)) => {
                    if let Some(name) = self.selected_policy_name() {
                        self.rules.remove_rule(&name, idx)?;
                        let rules = self.current_rules().len();
                        clamp_selection(&mut self.rule_state, rules);
                        self.refresh_preview();
                        return Ok(Some(Action::Notify(Notification::success(
                            "QoS rule deleted",
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
            .title(format!(" QoS Policies ({}) ", self.policies.len()))
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

        let policy_block = Block::default()
            .title(" Policies ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.pane == Pane::Policies {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let policy_inner = policy_block.inner(panes[0]);
        frame.render_widget(policy_block, panes[0]);

        let policy_header = Row::new(vec![
            Cell::from("Name").style(theme::table_header()),
            Cell::from("Interface").style(theme::table_header()),
            Cell::from("Description").style(theme::table_header()),
        ]);
        let policy_rows: Vec<Row> = self
            .policies
            .iter()
            .map(|policy| {
                Row::new(vec![
                    Cell::from(policy.name.clone()),
                    Cell::from(policy.interface.clone()),
                    Cell::from(policy.description.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let policy_table = Table::new(
            policy_rows,
            [
                Constraint::Length(15),
                Constraint::Min(18),
                Constraint::Min(10),
            ],
        )
        .header(policy_header)
        .row_highlight_style(theme::table_selected());
        let mut policy_state = self.policy_state;
        frame.render_stateful_widget(policy_table, policy_inner, &mut policy_state);

        let rule_block = Block::default()
            .title(format!(" Classifiers ({}) ", rules.len()))
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
            Cell::from("Match").style(theme::table_header()),
            Cell::from("Value").style(theme::table_header()),
            Cell::from("Action").style(theme::table_header()),
            Cell::from("Param").style(theme::table_header()),
        ]);
        let rule_rows: Vec<Row> = rules
            .iter()
            .map(|rule| {
                Row::new(vec![
                    Cell::from(rule.seq.get().to_string()),
                    Cell::from(rule.match_type.label()),
                    Cell::from(rule.match_value.clone()),
                    Cell::from(rule.action.label()),
                    Cell::from(rule.param.clone()),
                ])
                .style(theme::table_row())
            })
            .collect();
        let rule_table = Table::new(
            rule_rows,
            [
                Constraint::Length(5),
                Constraint::Length(20),
                Constraint::Min(14),
                Constraint::Length(10),
                Constraint::Min(8),
            ],
        )
        .header(rule_header)
        .row_highlight_style(theme::table_selected());
        let mut rule_state = self.rule_state;
        frame.render_stateful_widget(rule_table, rule_inner, &mut rule_state);

        frame.render_widget(Paragraph::new(catalog_hints()), layout[1]);

        if let (Some(preview_area), Some(script)) = (preview_area, self.preview.as_ref()) {
            render_script(frame, preview_area, "QoS Script", script);
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
        "QoS"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn seeded_rules_attach_to_limit_web() {
        let screen = QosScreen::new();
        assert_eq!(screen.current_rules().len(), 2);
        assert_eq!(screen.current_rules()[1].action, QosAction::Priority);
    }

    #[test]
    fn policy_navigation_reclamps_the_rule_selection() -> Result<()> {
        let mut screen = QosScreen::new();
        screen.handle_key_event(key(KeyCode::Char('l')))?;
        screen.handle_key_event(key(KeyCode::Char('j')))?;
        assert_eq!(screen.rule_state.selected(), Some(1));
        // voice_priority owns no rules, so the rule selection clears.
        screen.handle_key_event(key(KeyCode::Char('h')))?;
        screen.handle_key_event(key(KeyCode::Char('j')))?;
        assert_eq!(screen.policy_state.selected(), Some(1));
        assert_eq!(screen.rule_state.selected(), None);
        screen.handle_key_event(key(KeyCode::Char('k')))?;
        assert_eq!(screen.rule_state.selected(), Some(0));
        Ok(())
    }

    #[test]
    fn rule_commit_requires_param_unless_discard() {
        let missing_param = FormState::new(
            "Add QoS Rule",
            vec![
                FormField::text_with("Seq", "30"),
                FormField::select("Match type", match_type_labels(), 0),
                FormField::text_with("Match value", "udp/53"),
                FormField::select("Action", action_labels(), 0),
                FormField::text_with("Param", ""),
                FormField::text_with("Note", ""),
            ],
        );
        assert!(QosScreen::commit_rule(&missing_param).is_err());

        let discard = FormState::new(
            "Add QoS Rule",
            vec![
                FormField::text_with("Seq", "30"),
                FormField::select("Match type", match_type_labels(), 0),
                FormField::text_with("Match value", "udp/53"),
                FormField::select("Action", action_labels(), 2),
                FormField::text_with("Param", ""),
                FormField::text_with("Note", ""),
            ],
        );
        assert!(QosScreen::commit_rule(&discard).is_ok());
    }

    #[test]
    fn renaming_a_policy_moves_its_rules() {
        let mut screen = QosScreen::new();
        let form = FormState::new(
            "Edit QoS Policy",
            vec![
                FormField::text_with("Name", "limit_http"),
                FormField::text_with("Description", "限制HTTP带宽"),
                FormField::text_with("Interface", "GigabitEthernet0/0/1"),
            ],
        );
        screen
            .submit_form(&QosForm::Policy { editing: Some(0) }, &form)
            .expect("commit succeeds");
        assert!(screen.rules.rules(&"limit_web".to_string()).is_empty());
        assert_eq!(screen.rules.rules(&"limit_http".to_string()).len(), 2);
    }
}
