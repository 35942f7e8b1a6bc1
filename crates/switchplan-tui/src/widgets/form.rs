//! Modal add/edit form overlay.
//!
//! Every screen re-uses this instead of hand-rolling its own edit state:
//! a titled list of fields (free text or closed-enum selects), one
//! focused at a time. The form owns raw text only; validation happens in
//! the owning screen when the form is submitted, so a rejected commit
//! leaves the form open with the operator's input intact.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

use crate::theme;

/// One form field.
pub enum FormField {
    Text {
        label: &'static str,
        value: String,
    },
    Select {
        label: &'static str,
        options: Vec<String>,
        index: usize,
    },
}

impl FormField {
    pub fn text(label: &'static str) -> Self {
        Self::Text {
            label,
            value: String::new(),
        }
    }

    pub fn text_with(label: &'static str, value: impl Into<String>) -> Self {
        Self::Text {
            label,
            value: value.into(),
        }
    }

    pub fn select(label: &'static str, options: Vec<&'static str>, index: usize) -> Self {
        Self::select_owned(label, options.into_iter().map(String::from).collect(), index)
    }

    pub fn select_owned(label: &'static str, options: Vec<String>, index: usize) -> Self {
        let index = index.min(options.len().saturating_sub(1));
        Self::Select {
            label,
            options,
            index,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Text { label, .. } | Self::Select { label, .. } => label,
        }
    }

    fn display_value(&self) -> String {
        match self {
            Self::Text { value, .. } => value.clone(),
            Self::Select { options, index, .. } => {
                options.get(*index).cloned().unwrap_or_default()
            }
        }
    }
}

/// What a key press did to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// Enter — the owning screen should validate and commit.
    Submitted,
    /// Esc — discard the form.
    Cancelled,
    /// Anything else; the form consumed the key.
    Edited,
}

/// Modal form state: fields plus focus position.
pub struct FormState {
    title: String,
    fields: Vec<FormField>,
    field_idx: usize,
}

impl FormState {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            fields,
            field_idx: 0,
        }
    }

    /// Text of field `idx`, trimmed. Valid for both field kinds; selects
    /// yield the active option.
    pub fn value(&self, idx: usize) -> String {
        self.fields
            .get(idx)
            .map(FormField::display_value)
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    /// Index of the active option of a select field.
    pub fn select_index(&self, idx: usize) -> usize {
        match self.fields.get(idx) {
            Some(FormField::Select { index, .. }) => *index,
            _ => 0,
        }
    }

    /// Route a key press. Tab/Down and BackTab/Up move focus, Space and
    /// arrows cycle selects, characters and Backspace edit text fields.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Enter => return FormEvent::Submitted,
            KeyCode::Esc => return FormEvent::Cancelled,
            KeyCode::Tab | KeyCode::Down => {
                self.field_idx = (self.field_idx + 1) % self.fields.len().max(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let count = self.fields.len().max(1);
                self.field_idx = (self.field_idx + count - 1) % count;
            }
            KeyCode::Left => self.cycle_select(-1),
            KeyCode::Char(' ') if self.on_select() => self.cycle_select(1),
            KeyCode::Right => self.cycle_select(1),
            KeyCode::Char(ch) => {
                if let Some(FormField::Text { value, .. }) = self.fields.get_mut(self.field_idx) {
                    value.push(ch);
                }
            }
            KeyCode::Backspace => {
                if let Some(FormField::Text { value, .. }) = self.fields.get_mut(self.field_idx) {
                    value.pop();
                }
            }
            _ => {}
        }
        FormEvent::Edited
    }

    fn on_select(&self) -> bool {
        matches!(self.fields.get(self.field_idx), Some(FormField::Select { .. }))
    }

    fn cycle_select(&mut self, delta: isize) {
        if let Some(FormField::Select { options, index, .. }) =
            self.fields.get_mut(self.field_idx)
        {
            let count = options.len().max(1);
            #[allow(clippy::cast_possible_wrap)]
            let next = (*index as isize + delta).rem_euclid(count as isize);
            #[allow(clippy::cast_sign_loss)]
            {
                *index = next as usize;
            }
        }
    }

    /// Render the form as a centered overlay on top of `area`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let overlay_w = 52u16.min(area.width.saturating_sub(4));
        let overlay_h = (self.fields.len() as u16 + 6).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .title(format!(" {} ", self.title))
            .title_style(Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::ACCENT_BLUE));

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let label = Style::default().fg(theme::DIM_WHITE);
        let value_style = Style::default().fg(theme::TEAL);
        let focused_label = Style::default()
            .fg(theme::AMBER)
            .add_modifier(Modifier::BOLD);

        let mut lines = Vec::with_capacity(self.fields.len() + 2);
        for (idx, field) in self.fields.iter().enumerate() {
            let is_focused = idx == self.field_idx;
            let lbl_style = if is_focused { focused_label } else { label };
            let marker = if is_focused { "▸ " } else { "  " };
            let is_select = matches!(field, FormField::Select { .. });

            let display = if is_select {
                format!("‹ {} ›", field.display_value())
            } else {
                field.display_value()
            };
            let cursor = if is_focused && !is_select { "▎" } else { "" };

            lines.push(Line::from(vec![
                Span::styled(marker, lbl_style),
                Span::styled(format!("{:<14}", field.label()), lbl_style),
                Span::styled(display, value_style),
                Span::styled(cursor, Style::default().fg(theme::AMBER)),
            ]));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("←/→", theme::key_hint_key()),
            Span::styled(" cycle  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    fn sample_form() -> FormState {
        FormState::new(
            "Add VLAN",
            vec![
                FormField::text("VLAN ID"),
                FormField::select("Port type", vec!["GE", "XGE", "FE", "E"], 0),
            ],
        )
    }

    #[test]
    fn typing_edits_the_focused_text_field() {
        let mut form = sample_form();
        form.handle_key(key(KeyCode::Char('1')));
        form.handle_key(key(KeyCode::Char('0')));
        assert_eq!(form.value(0), "10");
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value(0), "1");
    }

    #[test]
    fn arrows_cycle_selects_with_wrap() {
        let mut form = sample_form();
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.value(1), "E");
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.value(1), "GE");
        assert_eq!(form.select_index(1), 0);
    }

    #[test]
    fn enter_and_esc_terminate() {
        let mut form = sample_form();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Submitted);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancelled);
        assert_eq!(
            form.handle_key(key(KeyCode::Char('x'))),
            FormEvent::Edited
        );
    }
}
