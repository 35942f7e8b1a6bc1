//! Read-only script preview pane.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use switchplan_core::Script;

use crate::theme;

/// Render the generated command lines in a bordered pane.
pub fn render_script(frame: &mut Frame, area: Rect, title: &str, script: &Script) {
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = script
        .lines()
        .iter()
        .map(|line| Line::from(Span::styled(line.clone(), theme::script_line())))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
